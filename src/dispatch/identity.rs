//! Instance identity resolution.

use crate::provider::InstanceId;

/// Header carrying the optional instance qualifier.
pub const INSTANCE_HEADER: &str = "X-Router-Instance";

/// Build the identity of the backend a request addresses.
///
/// A missing qualifier selects the app's single default instance.
pub fn resolve_instance(app_name: &str, instance_name: Option<&str>) -> InstanceId {
    InstanceId::new(app_name, instance_name.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_qualifier_is_default_instance() {
        let id = resolve_instance("web", None);
        assert_eq!(id, InstanceId::app("web"));
        assert!(id.is_default_instance());
    }

    #[test]
    fn resolution_is_deterministic() {
        for (app, instance) in [("web", None), ("web", Some("blue")), ("api", Some(""))] {
            assert_eq!(resolve_instance(app, instance), resolve_instance(app, instance));
        }
        assert_eq!(
            resolve_instance("web", Some("blue")),
            InstanceId::new("web", "blue")
        );
    }
}
