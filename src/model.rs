//! Wire model for GReader-style feed items.
//!
//! Read state is not a boolean on the item: it is encoded as membership of
//! the sentinel category tag, exactly as the server reports it.

use serde::{Deserialize, Serialize};

/// Sentinel category tag whose membership marks an item as read.
pub const READ_TAG: &str = "user/-/state/com.google/read";

/// A single feed entry as returned by `/api/unread`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable, unique item id (long-form GReader id).
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// The subscription this item came from.
    #[serde(default)]
    pub origin: Origin,
    /// Item body as an HTML fragment.
    #[serde(default)]
    pub summary: Summary,
    /// Category tags; read state is membership of [`READ_TAG`].
    #[serde(default)]
    pub categories: Vec<String>,
    /// Ordered links; the first is the "open in browser" target.
    #[serde(default)]
    pub canonical: Vec<ItemLink>,
    /// Publish time, seconds since the epoch.
    #[serde(default)]
    pub published: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLink {
    pub href: String,
}

impl Item {
    /// Read state is derived from the category set, never stored separately.
    pub fn is_read(&self) -> bool {
        self.categories.iter().any(|c| c == READ_TAG)
    }

    /// Add the read tag locally. Idempotent: re-marking a read item leaves
    /// the category set unchanged.
    pub fn mark_read_local(&mut self) {
        if !self.is_read() {
            self.categories.push(READ_TAG.to_string());
        }
    }

    /// The external link to open in a browser, if the item has one.
    pub fn external_url(&self) -> Option<&str> {
        self.canonical.first().map(|l| l.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unread_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            title: format!("Item {}", id),
            origin: Origin {
                title: "Example Feed".to_string(),
            },
            summary: Summary {
                content: "<p>hello</p>".to_string(),
            },
            categories: vec!["user/-/state/com.google/fresh".to_string()],
            canonical: vec![ItemLink {
                href: "https://example.com/post".to_string(),
            }],
            published: Some(1700000000),
        }
    }

    #[test]
    fn test_read_state_is_tag_membership() {
        let mut item = unread_item("1");
        assert!(!item.is_read());
        item.categories.push(READ_TAG.to_string());
        assert!(item.is_read());
    }

    #[test]
    fn test_mark_read_local_is_idempotent() {
        let mut item = unread_item("1");
        item.mark_read_local();
        let after_first = item.categories.clone();
        item.mark_read_local();
        assert_eq!(item.categories, after_first);
        assert_eq!(
            item.categories.iter().filter(|c| *c == READ_TAG).count(),
            1
        );
    }

    #[test]
    fn test_external_url_uses_first_canonical_link() {
        let mut item = unread_item("1");
        item.canonical.push(ItemLink {
            href: "https://example.com/alternate".to_string(),
        });
        assert_eq!(item.external_url(), Some("https://example.com/post"));

        item.canonical.clear();
        assert_eq!(item.external_url(), None);
    }

    #[test]
    fn test_deserialize_minimal_item() {
        // Servers may omit optional fields entirely.
        let item: Item = serde_json::from_str(r#"{"id":"tag:google.com,2005:reader/item/00000000000000ab"}"#).unwrap();
        assert_eq!(item.id, "tag:google.com,2005:reader/item/00000000000000ab");
        assert!(item.categories.is_empty());
        assert!(!item.is_read());
        assert_eq!(item.external_url(), None);
    }
}
