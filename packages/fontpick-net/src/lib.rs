//! Webfonts catalog client for fontpick
//!
//! Provides [`WebfontsCatalog`], an implementation of the
//! [`fontpick_traits::CatalogProvider`] trait speaking the Google-Fonts-style
//! webfonts v1 API: a JSON list endpoint for catalog metadata and a CSS
//! endpoint returning `@font-face` rules for a batch of families.

mod catalog;

pub use catalog::{CatalogConfig, WebfontsCatalog};
