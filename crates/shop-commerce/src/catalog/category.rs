//! Product category tree as delivered by the catalog service.

use serde::{Deserialize, Serialize};

use crate::catalog::product::{CategoryRef, ImageRef};
use crate::ids::CategoryId;

/// A top-level product category with its direct children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub children: Vec<CategoryRef>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            image: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: CategoryRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef::new(self.id.clone(), self.name.clone(), self.slug.clone())
    }

    /// Whether `key` names this category by id, slug or case-insensitive name.
    pub fn is_named(&self, key: &str) -> bool {
        names(&self.id, &self.name, &self.slug, key)
    }
}

/// Resolve a category id, slug or name against a category tree.
///
/// Children are searched after their parents. Unknown keys yield `None`.
pub fn find_category(categories: &[Category], key: &str) -> Option<CategoryRef> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    categories
        .iter()
        .find(|c| c.is_named(key))
        .map(Category::to_ref)
        .or_else(|| {
            categories
                .iter()
                .flat_map(|c| c.children.iter())
                .find(|c| names(&c.id, &c.name, &c.slug, key))
                .cloned()
        })
}

fn names(id: &CategoryId, name: &str, slug: &str, key: &str) -> bool {
    id.as_str() == key || slug == key || name.eq_ignore_ascii_case(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<Category> {
        vec![
            Category::new("c1", "Tea", "tea").with_child(CategoryRef::new("c3", "Green Tea", "green-tea")),
            Category::new("c2", "Coffee", "coffee"),
        ]
    }

    #[test]
    fn test_find_by_id_slug_or_name() {
        let categories = tree();
        assert_eq!(find_category(&categories, "c2").unwrap().slug, "coffee");
        assert_eq!(find_category(&categories, "tea").unwrap().id.as_str(), "c1");
        assert_eq!(find_category(&categories, " COFFEE ").unwrap().id.as_str(), "c2");
    }

    #[test]
    fn test_children_are_searched() {
        let found = find_category(&tree(), "green tea").unwrap();
        assert_eq!(found.id.as_str(), "c3");
    }

    #[test]
    fn test_unknown_or_blank_key() {
        assert!(find_category(&tree(), "juice").is_none());
        assert!(find_category(&tree(), "  ").is_none());
    }
}
