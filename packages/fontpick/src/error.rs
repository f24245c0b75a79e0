use thiserror::Error;

use fontpick_traits::CatalogError;

/// Errors surfaced by the picker core
///
/// Per-item problems (a font id missing from a batch stylesheet response)
/// are logged and skipped rather than represented here; only structural
/// problems reach the caller. Nothing in this layer retries.
#[derive(Error, Debug)]
pub enum PickerError {
    /// Picker ids become part of CSS selectors and element ids
    #[error("invalid picker id \"{0}\": only ASCII letters and digits are allowed")]
    InvalidPickerId(String),

    /// The named family is not in this instance's working set
    #[error("font \"{0}\" is not in the font list")]
    FontNotFound(String),

    /// Two distinct families may not share a selector id
    #[error("font id \"{id}\" of \"{family}\" collides with existing font \"{existing}\"")]
    DuplicateFontId {
        family: String,
        existing: String,
        id: String,
    },

    /// Catalog transport or decode failure
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type alias for picker operations
pub type PickerResult<T> = Result<T, PickerError>;
