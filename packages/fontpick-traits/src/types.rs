use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Broad typographic category reported by the catalog
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SansSerif,
    Serif,
    Display,
    Handwriting,
    Monospace,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::SansSerif => write!(f, "sans-serif"),
            Category::Serif => write!(f, "serif"),
            Category::Display => write!(f, "display"),
            Category::Handwriting => write!(f, "handwriting"),
            Category::Monospace => write!(f, "monospace"),
        }
    }
}

/// Writing script a font covers ("latin", "cyrillic", "japanese", ...)
///
/// The catalog calls these "subsets". The vocabulary grows with the catalog,
/// so this is an open string wrapper rather than a closed enum.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script(pub String);

impl Script {
    /// The default script requested by pickers
    pub fn latin() -> Self {
        Script("latin".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Script {
    fn from(value: &str) -> Self {
        Script(value.to_string())
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weight/style variant of a family ("regular", "italic", "700", "700italic", ...)
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(pub String);

impl Variant {
    /// The default variant requested by pickers
    pub fn regular() -> Self {
        Variant("regular".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant(value.to_string())
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordering applied by the catalog list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Alphabet,
    Popularity,
}

impl SortOption {
    /// Value of the list endpoint's `sort` query parameter
    pub fn query_value(self) -> &'static str {
        match self {
            SortOption::Alphabet => "alpha",
            SortOption::Popularity => "popularity",
        }
    }
}

/// One loadable font family
///
/// A font is either catalog-sourced (`url` is `None`, metadata filled in from
/// the catalog) or custom (`url` points at a font file and the catalog is
/// bypassed entirely). Both occupy the same registry slots, keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Font {
    /// Display/query name, unique within a working set
    pub family: String,
    /// Selector-safe slug of `family`; always equal to `font_id(&family)`
    pub id: String,
    /// Explicit source for custom fonts
    pub url: Option<Url>,
    pub category: Option<Category>,
    pub scripts: Vec<Script>,
    pub variants: Vec<Variant>,

    // Informational fields carried through from the catalog.
    pub kind: Option<String>,
    pub version: Option<String>,
    pub last_modified: Option<String>,
    pub files: Option<HashMap<Variant, String>>,
}

impl Font {
    /// Create a catalog-sourced font with no metadata yet
    pub fn new(family: impl Into<String>) -> Self {
        let family = family.into();
        let id = font_id(&family);
        Self {
            family,
            id,
            url: None,
            category: None,
            scripts: Vec::new(),
            variants: Vec::new(),
            kind: None,
            version: None,
            last_modified: None,
            files: None,
        }
    }

    /// Create a custom font loaded directly from `url`
    pub fn custom(family: impl Into<String>, url: Url) -> Self {
        let mut font = Self::new(family);
        font.url = Some(url);
        font
    }

    /// Whether this font bypasses the catalog
    pub fn is_custom(&self) -> bool {
        self.url.is_some()
    }
}

impl std::fmt::Display for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} ({url})", self.family),
            None => write!(f, "{}", self.family),
        }
    }
}

/// Working set of one picker instance, keyed by family name
pub type FontList = HashMap<String, Font>;

/// Derive the selector-safe id for a family name
///
/// Lowercases the name and collapses whitespace runs to a single `-`. The
/// result is used in stylesheet ids and CSS selectors, and as the registry
/// key shared by every picker instance in the process.
pub fn font_id(family: &str) -> String {
    let mut id = String::with_capacity(family.len());
    let mut pending_gap = false;
    for ch in family.trim().chars() {
        if ch.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            id.push('-');
            pending_gap = false;
        }
        id.extend(ch.to_lowercase());
    }
    id
}

/// Whether `picker_id` is usable as a selector-suffix source
///
/// Picker ids end up inside CSS class and element ids, so only ASCII
/// letters and digits are allowed. The empty id is valid and means
/// "no suffix".
pub fn is_valid_picker_id(picker_id: &str) -> bool {
    picker_id.chars().all(|c| c.is_ascii_alphanumeric())
}
