//! Font picker state coordination for web font catalogs
//!
//! This crate keeps track of which remotely-hosted fonts a host application
//! may pick from, which of them already have a stylesheet resource in the
//! process, and which one is currently applied. It handles:
//! - Building and filtering the candidate font set from catalog metadata
//! - De-duplicating stylesheet fetches across picker instances
//! - Promoting preview-weight stylesheets to full weight on activation
//! - Sequencing active-font declarations so fallback rendering and caller
//!   notification happen in the right order
//!
//! # Architecture
//!
//! The network and stylesheet sinks are trait seams
//! ([`CatalogProvider`] and [`StyleRegistry`] from `fontpick-traits`):
//! the [`FontManager`] facade owns one instance's working set and delegates
//! resource decisions to the [`ResourceCoordinator`], which drives the
//! shared registry through an explicit per-font state machine
//! ([`ResourceState`]). Registry mutation is strictly synchronous; only
//! catalog fetches suspend. Creating a slot *before* the first await is the
//! discipline that lets concurrent instances observe each other's in-flight
//! loads and skip re-fetching.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fontpick::{FontManager, PickerConfig};
//! use fontpick_net::WebfontsCatalog;
//!
//! # async fn example() -> Result<(), fontpick::PickerError> {
//! let catalog = Arc::new(WebfontsCatalog::new("API_KEY")?);
//! let mut picker = FontManager::new(catalog, "Open Sans", PickerConfig::default(), None)?;
//!
//! // Fetch the catalog, build the working set, and preload previews.
//! picker.init().await?;
//!
//! picker.set_active_font("Roboto", true).await?;
//! log::info!("active font: {}", picker.active_font()?.family);
//! # Ok(())
//! # }
//! ```

pub mod css;

mod config;
mod coordinator;
mod error;
mod manager;
mod set_builder;

pub use config::{FontFilter, OnChange, PickerConfig, PickerOptions};
pub use coordinator::ResourceCoordinator;
pub use error::{PickerError, PickerResult};
pub use manager::FontManager;
pub use set_builder::build_font_list;

// Re-export the shared vocabulary so most hosts only import this crate.
pub use fontpick_traits::{
    CatalogError, CatalogProvider, Category, Font, FontList, MemoryRegistry, ResourceState,
    Script, SortOption, StyleRegistry, StylesheetKind, Variant, font_id,
};

/// Family applied when the host does not name one
pub const FONT_FAMILY_DEFAULT: &str = "Open Sans";
