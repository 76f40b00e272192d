use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy TOML from {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("taxonomy defines no categories")]
    Empty,

    #[error("category '{key}' has no fields")]
    EmptyCategory { key: String },

    #[error("category '{category}' has a field with an empty value")]
    EmptyValue { category: String },

    #[error("field '{value}' has an empty label")]
    EmptyLabel { value: String },

    #[error("field value '{value}' is defined more than once")]
    DuplicateField { value: String },
}

impl TaxonomyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaxonomyError>;
