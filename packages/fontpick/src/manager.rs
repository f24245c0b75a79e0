use std::sync::Arc;

use url::Url;

use fontpick_traits::{CatalogProvider, Font, FontList, MemoryRegistry, font_id};

use crate::config::{OnChange, PickerConfig, PickerOptions};
use crate::coordinator::ResourceCoordinator;
use crate::error::{PickerError, PickerResult};
use crate::set_builder::build_font_list;

/// Facade managing one picker instance's fonts and active selection
///
/// Owns the working set, keeps track of the active font, and delegates all
/// resource decisions to the [`ResourceCoordinator`]. Construction performs
/// no I/O: the default family is inserted and marked active-pending, and its
/// full stylesheet is loaded by [`init`](FontManager::init) (or by the first
/// explicit [`set_active_font`](FontManager::set_active_font)).
pub struct FontManager {
    options: PickerOptions,
    selector_suffix: String,
    fonts: FontList,
    // Name of the currently applied font; pending until its first
    // activation has settled.
    active_family: String,
    active_pending: bool,
    coordinator: ResourceCoordinator,
    on_change: Option<OnChange>,
}

impl std::fmt::Debug for FontManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontManager")
            .field("selector_suffix", &self.selector_suffix)
            .field("active_family", &self.active_family)
            .field("active_pending", &self.active_pending)
            .finish_non_exhaustive()
    }
}

impl FontManager {
    /// Save the relevant options and register the default font
    ///
    /// Fails synchronously with [`PickerError::InvalidPickerId`] if the
    /// configured picker id contains anything but ASCII letters and digits.
    /// Without a registry in `config`, a fresh in-memory registry is used —
    /// hosts that share stylesheet state across instances must inject the
    /// shared one.
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        default_family: impl Into<String>,
        config: PickerConfig,
        on_change: Option<OnChange>,
    ) -> PickerResult<Self> {
        let (options, registry) = config.resolve()?;
        let registry = registry.unwrap_or_else(|| Arc::new(MemoryRegistry::new()));
        let selector_suffix = options.selector_suffix();

        let coordinator = ResourceCoordinator::new(
            catalog,
            registry,
            options.scripts.clone(),
            options.variants.clone(),
            selector_suffix.clone(),
        );

        let default_family = default_family.into();
        let mut manager = Self {
            options,
            selector_suffix,
            fonts: FontList::new(),
            active_family: default_family.clone(),
            active_pending: true,
            coordinator,
            on_change,
        };
        // The working set is empty, so this cannot collide.
        manager.insert_font(default_family, None)?;
        Ok(manager)
    }

    /// Fetch the catalog, build the working set, and preload previews
    ///
    /// Settles the pending default activation first, then admits catalog
    /// fonts per the configured constraints and batch-loads a preview for
    /// every admitted font except the active one (whose full weight is
    /// already loaded). Returns the resulting working set.
    pub async fn init(&mut self) -> PickerResult<&FontList> {
        self.ensure_active_loaded().await?;

        let catalog = self.coordinator.catalog().list_fonts(self.options.sort).await?;
        self.fonts = build_font_list(catalog, &self.options, std::mem::take(&mut self.fonts));

        let to_preview: Vec<Font> = self
            .fonts
            .values()
            .filter(|font| font.family != self.active_family)
            .cloned()
            .collect();
        self.coordinator.load_previews(&to_preview).await?;

        Ok(&self.fonts)
    }

    /// The current working set, keyed by family name
    pub fn fonts(&self) -> &FontList {
        &self.fonts
    }

    /// Selector suffix of this instance (derived from the picker id)
    pub fn selector_suffix(&self) -> &str {
        &self.selector_suffix
    }

    /// Whether the initial activation has not yet settled
    pub fn is_active_pending(&self) -> bool {
        self.active_pending
    }

    /// Add a font to the working set
    ///
    /// A non-empty `url` makes the font custom: its stylesheet is
    /// synthesized from the URL and the catalog is never consulted. With
    /// `download_preview` the font's preview stylesheet is loaded before the
    /// call returns. Re-adding a family replaces its entry; a family whose
    /// id collides with a *different* existing family is rejected.
    pub async fn add_font(
        &mut self,
        family: impl Into<String>,
        download_preview: bool,
        url: Option<Url>,
    ) -> PickerResult<()> {
        let font = self.insert_font(family.into(), url)?;
        if download_preview {
            self.coordinator
                .load_previews(std::slice::from_ref(&font))
                .await?;
        }
        Ok(())
    }

    /// Remove a font from the working set
    ///
    /// Only the working set shrinks. Stylesheets and selector rules already
    /// declared stay in place: registry entries are process-wide and may be
    /// in use by other instances.
    pub fn remove_font(&mut self, family: &str) -> Option<Font> {
        self.fonts.remove(family)
    }

    /// The currently active font
    ///
    /// Fails with [`PickerError::FontNotFound`] if the active family has
    /// been removed from the working set since its activation.
    pub fn active_font(&self) -> PickerResult<&Font> {
        self.fonts
            .get(&self.active_family)
            .ok_or_else(|| PickerError::FontNotFound(self.active_family.clone()))
    }

    /// Make `family` the active font and load its full stylesheet
    ///
    /// Fails fast with [`PickerError::FontNotFound`] — before any registry
    /// mutation — if `family` is not in the working set; the previously
    /// active font then remains in effect. Otherwise the call resolves once
    /// the font is visually available, and the change callback is invoked
    /// iff `run_on_change`.
    pub async fn set_active_font(&mut self, family: &str, run_on_change: bool) -> PickerResult<()> {
        let Some(font) = self.fonts.get(family).cloned() else {
            return Err(PickerError::FontNotFound(family.to_string()));
        };

        let previous_family = std::mem::replace(&mut self.active_family, family.to_string());
        self.active_pending = false;

        self.coordinator
            .activate(&font, Some(&previous_family))
            .await?;

        if run_on_change {
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(&font);
            }
        }
        Ok(())
    }

    /// Replace the change callback used by future activations
    pub fn set_on_change(&mut self, on_change: OnChange) {
        self.on_change = Some(on_change);
    }

    /// Settle the pending activation of the construction-time default font
    async fn ensure_active_loaded(&mut self) -> PickerResult<()> {
        if !self.active_pending {
            return Ok(());
        }
        let font = self
            .fonts
            .get(&self.active_family)
            .cloned()
            .ok_or_else(|| PickerError::FontNotFound(self.active_family.clone()))?;

        // No previous family yet, so the rule carries no fallback; the
        // constructor's callback semantics apply (no notification).
        self.coordinator.activate(&font, None).await?;
        self.active_pending = false;
        Ok(())
    }

    fn insert_font(&mut self, family: String, url: Option<Url>) -> PickerResult<Font> {
        let id = font_id(&family);
        if let Some(existing) = self
            .fonts
            .values()
            .find(|existing| existing.id == id && existing.family != family)
        {
            return Err(PickerError::DuplicateFontId {
                family,
                existing: existing.family.clone(),
                id,
            });
        }

        let font = match url {
            Some(url) => Font::custom(family.clone(), url),
            None => Font::new(family.clone()),
        };
        self.fonts.insert(family, font.clone());
        Ok(font)
    }
}
