//! Target field catalog types.
//!
//! The taxonomy is an ordered list of categories, each holding an ordered list
//! of fields. Field order matters: the auto-mapper walks fields in catalog
//! order and keeps the first field on score ties.

use serde::{Deserialize, Serialize};

/// A field definition as it appears inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Unique identifier stored in records (e.g. `email_address`).
    pub value: String,
    /// Human-readable name, used for similarity scoring.
    pub label: String,
}

/// An ordered group of target fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCategory {
    /// Category key (e.g. `Contact`).
    pub key: String,
    /// Display title (e.g. `Contact Information`).
    pub title: String,
    /// Fields in display order.
    pub fields: Vec<FieldDef>,
}

/// A target field flattened out of its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetField {
    pub value: String,
    pub label: String,
    /// Key of the owning category.
    pub category: String,
}

/// The full catalog of target fields a source column may be mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaxonomyRepr", into = "TaxonomyRepr")]
pub struct Taxonomy {
    categories: Vec<FieldCategory>,
    fields: Vec<TargetField>,
}

#[derive(Serialize, Deserialize)]
struct TaxonomyRepr {
    #[serde(rename = "category", default)]
    categories: Vec<FieldCategory>,
}

impl From<TaxonomyRepr> for Taxonomy {
    fn from(repr: TaxonomyRepr) -> Self {
        Self::new(repr.categories)
    }
}

impl From<Taxonomy> for TaxonomyRepr {
    fn from(taxonomy: Taxonomy) -> Self {
        Self {
            categories: taxonomy.categories,
        }
    }
}

impl Taxonomy {
    /// Builds a taxonomy and its flattened field catalog.
    ///
    /// Uniqueness of field values is not checked here; configuration loaders
    /// validate before constructing.
    pub fn new(categories: Vec<FieldCategory>) -> Self {
        let fields = categories
            .iter()
            .flat_map(|category| {
                category.fields.iter().map(|field| TargetField {
                    value: field.value.clone(),
                    label: field.label.clone(),
                    category: category.key.clone(),
                })
            })
            .collect();
        Self { categories, fields }
    }

    pub fn categories(&self) -> &[FieldCategory] {
        &self.categories
    }

    /// All fields in catalog order.
    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    /// Looks up a field by its value.
    pub fn field(&self, value: &str) -> Option<&TargetField> {
        self.fields.iter().find(|field| field.value == value)
    }

    /// Returns the label for a field value.
    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.field(value).map(|field| field.label.as_str())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.field(value).is_some()
    }

    /// Number of fields across all categories.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str, label: &str) -> FieldDef {
        FieldDef {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn flattens_fields_in_category_order() {
        let taxonomy = Taxonomy::new(vec![
            FieldCategory {
                key: "Soul".to_string(),
                title: "Personal Information".to_string(),
                fields: vec![field("first_name", "First Name")],
            },
            FieldCategory {
                key: "Contact".to_string(),
                title: "Contact Information".to_string(),
                fields: vec![field("city", "City"), field("state", "State")],
            },
        ]);

        let values: Vec<&str> = taxonomy.fields().iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["first_name", "city", "state"]);
        assert_eq!(taxonomy.field("city").unwrap().category, "Contact");
        assert_eq!(taxonomy.label_for("state"), Some("State"));
        assert_eq!(taxonomy.label_for("zip"), None);
        assert_eq!(taxonomy.len(), 3);
    }

    #[test]
    fn empty_taxonomy() {
        let taxonomy = Taxonomy::new(Vec::new());
        assert!(taxonomy.is_empty());
        assert!(!taxonomy.contains("city"));
    }
}
