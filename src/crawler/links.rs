//! Ordered link table built during discovery

use crate::columns::Attributes;
use std::collections::HashMap;

/// Links found while walking a listing, keyed by locator
///
/// Iteration follows first-discovery order. Discovering a locator again
/// replaces its metadata in place (last seen wins) without moving it.
#[derive(Debug, Clone, Default)]
pub struct CrawlLinks {
    order: Vec<String>,
    metadata: HashMap<String, Attributes>,
}

impl CrawlLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the metadata of `locator`
    ///
    /// Returns true if the locator was not known before.
    pub fn upsert(&mut self, locator: impl Into<String>, metadata: Attributes) -> bool {
        let locator = locator.into();
        if let Some(existing) = self.metadata.get_mut(&locator) {
            *existing = metadata;
            return false;
        }
        self.order.push(locator.clone());
        self.metadata.insert(locator, metadata);
        true
    }

    pub fn get(&self, locator: &str) -> Option<&Attributes> {
        self.metadata.get(locator)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(locator, metadata)` in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attributes)> + '_ {
        self.order
            .iter()
            .filter_map(|locator| self.metadata.get(locator).map(|m| (locator.as_str(), m)))
    }
}

impl<L: Into<String>> FromIterator<(L, Attributes)> for CrawlLinks {
    fn from_iter<I: IntoIterator<Item = (L, Attributes)>>(iter: I) -> Self {
        let mut links = Self::new();
        for (locator, metadata) in iter {
            links.upsert(locator, metadata);
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Scalar;

    fn meta(value: &str) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("Published".to_string(), Scalar::from(value));
        attrs
    }

    #[test]
    fn test_iteration_follows_discovery_order() {
        let links: CrawlLinks = vec![("c", meta("1")), ("a", meta("2")), ("b", meta("3"))]
            .into_iter()
            .collect();

        let order: Vec<&str> = links.iter().map(|(l, _)| l).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_last_seen_metadata_wins() {
        let mut links = CrawlLinks::new();
        assert!(links.upsert("L", meta("m1")));
        assert!(links.upsert("M", meta("x")));
        assert!(!links.upsert("L", meta("m2")));

        assert_eq!(links.len(), 2);
        assert_eq!(links.get("L"), Some(&meta("m2")));

        let first = links.iter().next().unwrap();
        assert_eq!(first, ("L", &meta("m2")));
    }
}
