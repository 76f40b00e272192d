#![deny(unsafe_code)]

pub mod collection;
pub mod mapping;
pub mod record;
pub mod taxonomy;

pub use collection::{Collection, CollectionId, NewCollection};
pub use mapping::{Mapping, MappingEntry};
pub use record::{RawRow, TargetRecord};
pub use taxonomy::{FieldCategory, FieldDef, TargetField, Taxonomy};
