//! Lifecycle Errors

use salvo::http::StatusError;
use tracing::error;

use tokengate_app::domain::lifecycle::LifecycleError;

/// Map a lifecycle failure to its HTTP status. Internal causes are logged
/// with the workflow and target and never reach the client.
pub(crate) fn into_status_error(error: LifecycleError, action: &str, target: &str) -> StatusError {
    match error {
        LifecycleError::Validation(reason) => {
            StatusError::unprocessable_entity().brief(reason)
        }
        LifecycleError::NotFound => StatusError::not_found().brief("Event not found"),
        LifecycleError::Conflict(reason) => StatusError::conflict().brief(reason),
        LifecycleError::TokenRevoked => {
            StatusError::forbidden().brief("Token is revoked and cannot be used")
        }
        internal @ (LifecycleError::Tokens(_)
        | LifecycleError::Events(_)
        | LifecycleError::Audit(_)) => {
            error!(
                action,
                audit_target = target,
                code = internal.code(),
                "lifecycle failure: {internal:?}"
            );

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use tokengate_app::domain::audit::AuditServiceError;

    use super::*;

    fn status_of(error: LifecycleError) -> StatusCode {
        into_status_error(error, "test", "tok_1").code
    }

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        assert_eq!(
            status_of(LifecycleError::Validation("bad".to_owned())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(LifecycleError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(LifecycleError::Conflict("busy".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(LifecycleError::TokenRevoked), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(LifecycleError::Audit(AuditServiceError::MissingTarget)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
