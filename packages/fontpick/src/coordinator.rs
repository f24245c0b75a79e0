use std::collections::HashMap;
use std::sync::Arc;

use fontpick_traits::{
    CatalogProvider, Font, ResourceState, Script, StyleRegistry, StylesheetKind, Variant,
};

use crate::css;
use crate::error::PickerResult;

/// Drives the shared stylesheet registry through the per-font state machine
///
/// One coordinator belongs to one picker instance but operates on a registry
/// shared by every instance in the process. The de-dup contract between
/// instances rests on a single discipline: a slot is created or promoted
/// synchronously, before any fetch is awaited, so an interleaved instance
/// observes the slot and skips its own fetch. Registry calls must therefore
/// never be awaited.
pub struct ResourceCoordinator {
    catalog: Arc<dyn CatalogProvider>,
    registry: Arc<dyn StyleRegistry>,
    scripts: Vec<Script>,
    variants: Vec<Variant>,
    selector_suffix: String,
}

impl ResourceCoordinator {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        registry: Arc<dyn StyleRegistry>,
        scripts: Vec<Script>,
        variants: Vec<Variant>,
        selector_suffix: String,
    ) -> Self {
        Self {
            catalog,
            registry,
            scripts,
            variants,
            selector_suffix,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<dyn StyleRegistry> {
        &self.registry
    }

    /// Load preview stylesheets for a batch of fonts
    ///
    /// Fonts whose id already has a slot (from any instance) are not fetched
    /// again. All catalog-sourced fonts that do need fetching share one
    /// batched request with preview character subsetting; custom fonts are
    /// synthesized without any network round trip. Preview selector rules
    /// are declared for every font in the batch, fetched or not.
    ///
    /// A font id missing from the batch response is logged and skipped; its
    /// slot is discarded so a later call may retry. A failed fetch unwinds
    /// every slot this call created, then propagates.
    pub async fn load_previews(&self, fonts: &[Font]) -> PickerResult<()> {
        // Create slots for everything absent before the first await; this is
        // the de-dup guard observed by concurrent instances.
        let mut created: Vec<&Font> = Vec::new();
        for font in fonts {
            if self.registry.state(&font.id) == ResourceState::Absent {
                self.registry
                    .create_stylesheet(&font.id, StylesheetKind::Preview);
                created.push(font);
            }
        }
        log::debug!(
            "preview batch: {} font(s), {} to fetch",
            fonts.len(),
            created.len()
        );

        let needs_catalog: Vec<Font> = created
            .iter()
            .filter(|font| !font.is_custom())
            .map(|font| (*font).clone())
            .collect();

        let mut styles = HashMap::new();
        if !needs_catalog.is_empty() {
            let response = match self
                .catalog
                .fetch_stylesheet(&needs_catalog, &self.scripts, &self.variants, true)
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    // Return the ids this call claimed to Absent so a later
                    // preview load can retry them.
                    for font in &created {
                        self.registry.discard_stylesheet(&font.id);
                    }
                    return Err(err.into());
                }
            };
            styles = css::extract_font_faces(&response);
        }

        // Idempotent: redeclaring a preview selector yields the same rule.
        for font in fonts {
            self.registry
                .append_preview_rule(&css::preview_selector_rule(font, &self.selector_suffix));
        }

        for font in created {
            let text = match &font.url {
                Some(url) => css::font_face_rule(&font.family, url),
                None => match styles.remove(&font.id) {
                    Some(text) => text,
                    None => {
                        log::error!(
                            "missing styles for font \"{}\" (id \"{}\") in catalog response",
                            font.family,
                            font.id
                        );
                        self.registry.discard_stylesheet(&font.id);
                        continue;
                    }
                },
            };
            self.registry.fill_stylesheet(&font.id, &text);
        }

        Ok(())
    }

    /// Load the full weight of one font and declare it active
    ///
    /// If a full-tagged slot already exists, only the active selector rule is
    /// updated. Otherwise the slot is created (or its preview promoted in
    /// place, preserving element identity so nothing flickers), the active
    /// rule is declared immediately with `previous_family` as fallback, and
    /// the full stylesheet is fetched and written. The call resolves only
    /// after that write; callers may treat completion as "the font is now
    /// visually available".
    pub async fn activate(&self, font: &Font, previous_family: Option<&str>) -> PickerResult<()> {
        let active_rule = css::active_selector_rule(font, previous_family, &self.selector_suffix);
        let state = self.registry.state(&font.id);

        if state.kind() == Some(StylesheetKind::Full) {
            // Full weight already requested on this page; only repoint the
            // active selector.
            self.registry
                .set_active_rule(&self.selector_suffix, &active_rule);
            return Ok(());
        }

        let created = state == ResourceState::Absent;
        if created {
            self.registry
                .create_stylesheet(&font.id, StylesheetKind::Full);
        } else {
            self.registry.promote_to_full(&font.id);
        }

        // Declared before the fetch: the fallback family renders while the
        // full weight loads.
        self.registry
            .set_active_rule(&self.selector_suffix, &active_rule);

        let text = match &font.url {
            Some(url) => css::font_face_rule(&font.family, url),
            None => {
                match self
                    .catalog
                    .fetch_stylesheet(
                        std::slice::from_ref(font),
                        &self.scripts,
                        &self.variants,
                        false,
                    )
                    .await
                {
                    Ok(text) => text,
                    Err(err) => {
                        // Only unwind a slot this call created; a promoted
                        // preview slot stays full-tagged (never downgraded).
                        if created {
                            self.registry.discard_stylesheet(&font.id);
                        }
                        return Err(err.into());
                    }
                }
            }
        };
        self.registry.fill_stylesheet(&font.id, &text);

        Ok(())
    }
}
