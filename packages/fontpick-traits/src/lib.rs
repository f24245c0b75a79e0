//! Shared types and provider traits for fontpick
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//! the [`Font`] data model and its catalog metadata, the [`CatalogProvider`]
//! trait implemented by network backends, and the [`StyleRegistry`] trait
//! over the process-wide ledger of per-font stylesheet slots.
//!
//! An in-memory reference ledger, [`MemoryRegistry`], is included for tests
//! and headless hosts. Implementations backed by a real document head are
//! left to integrators.

mod catalog;
mod registry;
mod types;

pub use catalog::{CatalogError, CatalogProvider};
pub use registry::{MemoryRegistry, ResourceState, StyleRegistry, StylesheetKind};
pub use types::{
    Category, Font, FontList, Script, SortOption, Variant, font_id, is_valid_picker_id,
};
