//! Typed configuration persistence backed by INI files

pub mod ini;
pub mod loader;
mod schema;
mod store;
mod value;

pub use ini::{IniDocument, Section};
pub use loader::{load, save, Records};
pub use schema::*;
pub use store::ConfigStore;
pub use value::{FieldKind, FieldValue};
