use std::sync::Arc;

use anyhow::Result;
use log::debug;

use crate::server::db::Database;

/// Maps request paths to the registered topic that governs them.
pub struct TopicResolver {
    db: Arc<Database>,
}

impl TopicResolver {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Finds the protected topic governing `path`, reading the current topic
    /// set from the registry. See [`resolve_topic`] for the matching rules.
    pub fn extract_topic(&self, path: &str) -> Result<Option<String>> {
        let topics = self.db.list_topics()?;
        let topic = resolve_topic(&topics, path).map(String::from);
        debug!("Resolve path '{path}' to topic {topic:?}");
        Ok(topic)
    }
}

/// Returns the topic that is the longest string prefix of `path`.
///
/// Matching is not path-segment aware: `admin` governs `admin1` as well as
/// `admin/sub`. Leading slashes are ignored on both sides, so the topic
/// `oapi` governs the forwarded path `/oapi/items`. When two topics only
/// differ in leading slashes the first one in `topics` order wins.
pub fn resolve_topic<'a>(topics: &'a [String], path: &str) -> Option<&'a str> {
    let path = path.trim_start_matches('/');

    let mut found: Option<(&'a str, usize)> = None;
    for topic in topics.iter() {
        let key = topic.trim_start_matches('/');
        if !path.starts_with(key) {
            continue;
        }
        match found {
            Some((_, len)) if len >= key.len() => {}
            _ => found = Some((topic.as_str(), key.len())),
        }
    }

    found.map(|(topic, _)| topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_topic() {
        let list = topics(&["admin", "collections/stations", "oapi"]);

        assert_eq!(resolve_topic(&list, "admin"), Some("admin"));
        assert_eq!(resolve_topic(&list, "admin1"), Some("admin"));
        assert_eq!(resolve_topic(&list, "admin/sub"), Some("admin"));
        assert_eq!(resolve_topic(&list, "/admin/sub"), Some("admin"));
        assert_eq!(resolve_topic(&list, "//admin"), Some("admin"));
        assert_eq!(resolve_topic(&list, "/oapi"), Some("oapi"));
        assert_eq!(
            resolve_topic(&list, "/collections/stations/items"),
            Some("collections/stations")
        );

        assert_eq!(resolve_topic(&list, "adm"), None);
        assert_eq!(resolve_topic(&list, "/collections"), None);
        assert_eq!(resolve_topic(&list, "/Admin"), None);
        assert_eq!(resolve_topic(&list, "/x/admin"), None);
        assert_eq!(resolve_topic(&list, ""), None);
        assert_eq!(resolve_topic(&list, "/"), None);

        assert_eq!(resolve_topic(&[], "/admin"), None);
    }

    #[test]
    fn test_resolve_longest_prefix() {
        let list = topics(&["admin", "admin/secret"]);
        assert_eq!(resolve_topic(&list, "admin/secret/x"), Some("admin/secret"));
        assert_eq!(resolve_topic(&list, "/admin/secret"), Some("admin/secret"));
        assert_eq!(resolve_topic(&list, "admin/public"), Some("admin"));
        assert_eq!(resolve_topic(&list, "admin/secre"), Some("admin"));

        // Order of registration does not matter
        let list = topics(&["admin/secret", "admin"]);
        assert_eq!(resolve_topic(&list, "admin/secret/x"), Some("admin/secret"));
        assert_eq!(resolve_topic(&list, "admin/public"), Some("admin"));
    }

    #[test]
    fn test_resolve_leading_slash_topics() {
        let list = topics(&["/admin", "admin"]);
        assert_eq!(resolve_topic(&list, "admin/x"), Some("/admin"));

        let list = topics(&["/oapi"]);
        assert_eq!(resolve_topic(&list, "oapi"), Some("/oapi"));
        assert_eq!(resolve_topic(&list, "/oapi/items"), Some("/oapi"));

        // A bare slash guards everything, more specific topics still win
        let list = topics(&["/", "oapi"]);
        assert_eq!(resolve_topic(&list, "/anything"), Some("/"));
        assert_eq!(resolve_topic(&list, "/oapi"), Some("oapi"));
    }

    #[test]
    fn test_extract_topic() {
        let db = Arc::new(Database::new_test());
        let resolver = TopicResolver::new(db.clone());

        assert_eq!(resolver.extract_topic("/admin1").unwrap(), None);

        assert!(db.create_token("admin", "k1").unwrap());
        assert_eq!(
            resolver.extract_topic("/admin1").unwrap().as_deref(),
            Some("admin")
        );

        assert!(db.delete_token("admin", None).unwrap());
        assert_eq!(resolver.extract_topic("/admin1").unwrap(), None);
    }
}
