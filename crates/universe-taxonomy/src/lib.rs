//! Target field taxonomy configuration.
//!
//! The catalog of target fields is data, not code: it is loaded from TOML so
//! new target schemas can be added without touching scoring or mapping logic.
//! An embedded default reproduces the stock Identity / Personal / Contact /
//! Business catalog.

#![deny(unsafe_code)]

mod error;
mod loader;

pub use error::{Result, TaxonomyError};
pub use loader::{
    TAXONOMY_ENV_VAR, default_taxonomy, load_taxonomy, parse_taxonomy, resolve_taxonomy,
};
