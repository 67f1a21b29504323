//! Route templates for span names and metric labels.

use uuid::Uuid;

/// Replace caller-supplied path segments with placeholders so span names and
/// metric labels stay low-cardinality.
pub(super) fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut template = String::new();
    let mut previous = "";

    for segment in path.trim_start_matches('/').split('/') {
        template.push('/');

        match previous {
            "token" => template.push_str("{token_id}"),
            "audit" => template.push_str("{target}"),
            "event" => template.push_str("{event_id}"),
            _ if Uuid::parse_str(segment).is_ok() => template.push_str("{uuid}"),
            _ => template.push_str(segment),
        }

        previous = segment;
    }

    template
}
