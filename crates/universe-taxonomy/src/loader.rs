//! Taxonomy configuration loading.
//!
//! A taxonomy file is TOML with one `[[category]]` table per category:
//!
//! ```toml
//! [[category]]
//! key = "Contact"
//! title = "Contact Information"
//! fields = [
//!     { value = "city", label = "City" },
//! ]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use universe_model::{FieldCategory, Taxonomy};

use crate::error::{Result, TaxonomyError};

/// Environment variable naming a taxonomy file to use instead of the default.
pub const TAXONOMY_ENV_VAR: &str = "UNIVERSE_TAXONOMY";

const DEFAULT_TAXONOMY: &str = include_str!("../data/default.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    #[serde(default)]
    category: Vec<FieldCategory>,
}

/// Parses and validates taxonomy TOML.
pub fn parse_taxonomy(text: &str) -> Result<Taxonomy> {
    parse_with_origin(text, "inline text")
}

/// The built-in catalog (Identity, Personal, Contact, Business).
pub fn default_taxonomy() -> Result<Taxonomy> {
    parse_with_origin(DEFAULT_TAXONOMY, "embedded default")
}

/// Loads a taxonomy from a TOML file.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy> {
    let text = std::fs::read_to_string(path).map_err(|e| TaxonomyError::io(path, e))?;
    let taxonomy = parse_with_origin(&text, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        fields = taxonomy.len(),
        "loaded taxonomy"
    );
    Ok(taxonomy)
}

/// Resolves the taxonomy to use.
///
/// Resolution order:
/// 1. `explicit` path
/// 2. `UNIVERSE_TAXONOMY` environment variable
/// 3. the embedded default
pub fn resolve_taxonomy(explicit: Option<&Path>) -> Result<Taxonomy> {
    if let Some(path) = explicit {
        return load_taxonomy(path);
    }
    if let Ok(path) = std::env::var(TAXONOMY_ENV_VAR)
        && !path.trim().is_empty()
    {
        return load_taxonomy(Path::new(&path));
    }
    default_taxonomy()
}

fn parse_with_origin(text: &str, origin: &str) -> Result<Taxonomy> {
    let file: TaxonomyFile = toml::from_str(text).map_err(|source| TaxonomyError::Toml {
        origin: origin.to_string(),
        source,
    })?;
    validate(&file.category)?;
    Ok(Taxonomy::new(file.category))
}

fn validate(categories: &[FieldCategory]) -> Result<()> {
    if categories.is_empty() {
        return Err(TaxonomyError::Empty);
    }
    let mut seen = BTreeSet::new();
    for category in categories {
        if category.fields.is_empty() {
            return Err(TaxonomyError::EmptyCategory {
                key: category.key.clone(),
            });
        }
        for field in &category.fields {
            if field.value.trim().is_empty() {
                return Err(TaxonomyError::EmptyValue {
                    category: category.key.clone(),
                });
            }
            if field.label.trim().is_empty() {
                return Err(TaxonomyError::EmptyLabel {
                    value: field.value.clone(),
                });
            }
            if !seen.insert(field.value.as_str()) {
                return Err(TaxonomyError::DuplicateField {
                    value: field.value.clone(),
                });
            }
        }
    }
    Ok(())
}
