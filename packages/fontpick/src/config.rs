use std::sync::Arc;

use fontpick_traits::{
    Category, Font, Script, SortOption, StyleRegistry, Variant, is_valid_picker_id,
};

use crate::error::{PickerError, PickerResult};

/// Admission predicate applied to every catalog candidate
pub type FontFilter = Arc<dyn Fn(&Font) -> bool + Send + Sync>;

/// Callback invoked after an activation settles
pub type OnChange = Box<dyn FnMut(&Font) + Send>;

/// Options used when constructing a [`FontManager`](crate::FontManager)
///
/// Every field is optional; unset fields fall back to the documented
/// defaults when the configuration is resolved at construction.
#[derive(Default)]
pub struct PickerConfig {
    /// Source of the per-instance selector suffix. Must be ASCII
    /// alphanumeric; empty means "no suffix".
    pub picker_id: Option<String>,
    /// Admit only these families (empty: no constraint)
    pub families: Vec<String>,
    /// Admit only fonts in these categories (empty: no constraint)
    pub categories: Vec<Category>,
    /// Scripts every admitted font must cover (default: `["latin"]`)
    pub scripts: Option<Vec<Script>>,
    /// Variants every admitted font must provide (default: `["regular"]`)
    pub variants: Option<Vec<Variant>>,
    /// Custom admission predicate (default: accept everything)
    pub filter: Option<FontFilter>,
    /// Maximum working-set size, pre-existing entries included (default: 50)
    pub limit: Option<usize>,
    /// Catalog ordering (default: alphabetic)
    pub sort: Option<SortOption>,
    /// Stylesheet ledger shared across picker instances
    /// (default: a fresh in-memory registry)
    pub registry: Option<Arc<dyn StyleRegistry>>,
}

impl PickerConfig {
    /// Apply defaults and validate, splitting off the registry handle
    pub(crate) fn resolve(
        self,
    ) -> PickerResult<(PickerOptions, Option<Arc<dyn StyleRegistry>>)> {
        let picker_id = self.picker_id.unwrap_or_default();
        if !is_valid_picker_id(&picker_id) {
            return Err(PickerError::InvalidPickerId(picker_id));
        }

        let options = PickerOptions {
            picker_id,
            families: self.families,
            categories: self.categories,
            scripts: self.scripts.unwrap_or_else(|| vec![Script::latin()]),
            variants: self.variants.unwrap_or_else(|| vec![Variant::regular()]),
            filter: self.filter.unwrap_or_else(|| Arc::new(|_| true)),
            limit: self.limit.unwrap_or(50),
            sort: self.sort.unwrap_or_default(),
        };
        Ok((options, self.registry))
    }
}

/// Resolved per-instance options, immutable after construction
#[derive(Clone)]
pub struct PickerOptions {
    pub picker_id: String,
    pub families: Vec<String>,
    pub categories: Vec<Category>,
    pub scripts: Vec<Script>,
    pub variants: Vec<Variant>,
    pub filter: FontFilter,
    pub limit: usize,
    pub sort: SortOption,
}

impl PickerOptions {
    /// Suffix appended to CSS class and element ids so multiple picker
    /// instances on one page do not clobber each other
    pub fn selector_suffix(&self) -> String {
        if self.picker_id.is_empty() {
            String::new()
        } else {
            format!("-{}", self.picker_id)
        }
    }
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            picker_id: String::new(),
            families: Vec::new(),
            categories: Vec::new(),
            scripts: vec![Script::latin()],
            variants: vec![Variant::regular()],
            filter: Arc::new(|_| true),
            limit: 50,
            sort: SortOption::default(),
        }
    }
}

impl std::fmt::Debug for PickerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerOptions")
            .field("picker_id", &self.picker_id)
            .field("families", &self.families)
            .field("categories", &self.categories)
            .field("scripts", &self.scripts)
            .field("variants", &self.variants)
            .field("limit", &self.limit)
            .field("sort", &self.sort)
            .finish_non_exhaustive()
    }
}
