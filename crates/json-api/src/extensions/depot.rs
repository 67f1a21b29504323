//! Depot helper extensions.

use std::any::{Any, type_name};

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use crate::observability::REQUEST_ID_DEPOT_KEY;

pub(crate) trait DepotExt {
    /// Fetch injected state, failing the request with a 500 when it is absent.
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Request id assigned by the logging middleware, if it ran.
    fn request_id(&self) -> Option<&str>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>().map_err(|_missing| {
            error!(
                request_id = self.request_id().unwrap_or("-"),
                "depot has no {}",
                type_name::<T>()
            );

            StatusError::internal_server_error()
        })
    }

    fn request_id(&self) -> Option<&str> {
        self.get::<String>(REQUEST_ID_DEPOT_KEY).ok().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn missing_state_is_an_internal_error() {
        let depot = Depot::new();

        let error = depot.obtain_or_500::<String>().err();

        assert_eq!(
            error.map(|error| error.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn request_id_is_read_from_the_depot() {
        let mut depot = Depot::new();

        assert!(depot.request_id().is_none(), "nothing inserted yet");

        depot.insert(REQUEST_ID_DEPOT_KEY, "req-7".to_owned());

        assert_eq!(depot.request_id(), Some("req-7"));
    }
}
