//! # Product Model
//!
//! A catalog product tagged with zero or more categories. The engine only
//! cares about the tag membership; ordering of `category_ids` is the order
//! the tags were attached in.

use serde::{Deserialize, Serialize};

use super::CategoryId;

pub type ProductId = i32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: Option<String>,
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub protects_against: Option<String>,
    pub does_not_protect_against: Option<String>,
    pub notes: Option<String>,
    pub usage_instructions: Option<String>,
    pub distribution: Option<String>,
    pub standards: Option<String>,
    pub image: Option<String>,
    pub category_ids: Vec<CategoryId>,
}

impl Product {
    #[inline]
    pub fn has_categories(&self) -> bool {
        !self.category_ids.is_empty()
    }

    /// Case-insensitive substring match over every searchable text field.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        let contains = |value: Option<&str>| {
            value.is_some_and(|v| v.to_lowercase().contains(needle))
        };

        contains(Some(self.name.as_str()))
            || contains(self.brand.as_deref())
            || contains(self.type_name.as_deref())
            || contains(self.description.as_deref())
            || contains(self.protects_against.as_deref())
            || contains(self.does_not_protect_against.as_deref())
            || contains(self.notes.as_deref())
            || contains(self.usage_instructions.as_deref())
            || contains(self.distribution.as_deref())
            || contains(self.standards.as_deref())
    }
}

/// Anything that carries a set of category tags.
pub trait TaggedEntity {
    fn category_ids(&self) -> &[CategoryId];
}

impl TaggedEntity for Product {
    fn category_ids(&self) -> &[CategoryId] {
        &self.category_ids
    }
}
