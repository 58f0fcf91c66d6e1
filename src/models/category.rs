//! # Category Model
//!
//! A node of the classification tree. Parents are referenced by id only; the
//! tree itself lives in the backing store and is resolved through lookup maps.

use serde::{Deserialize, Serialize};

/// Identity of a category. Unique and immutable once assigned.
pub type CategoryId = i32;

/// A category snapshot as read from the store.
///
/// `parent_id` is a non-owning back-reference. `None` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Classification code from the upstream ERP, if any.
    #[serde(default)]
    pub sap_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

fn default_published() -> bool {
    true
}

impl Category {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Name shown to users, falling back to the classification code and then the id.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if let Some(sap_name) = &self.sap_name {
            sap_name.clone()
        } else {
            format!("Category {}", self.id)
        }
    }
}

/// What callers render for breadcrumbs, badges and filter trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.display_name(),
            parent_id: category.parent_id,
        }
    }
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self::from(&category)
    }
}
