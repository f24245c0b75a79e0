#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use fontpick::{CatalogError, CatalogProvider, Font, Script, SortOption, Variant};

/// Counting in-memory catalog backend for coordinator and manager tests
///
/// Serves a canned font list and synthesizes one `@font-face` block per
/// requested font. Records every stylesheet request so tests can assert on
/// batch composition, and can be switched into failure mode or told to omit
/// ids from responses (catalog inconsistency).
#[derive(Default)]
pub struct FakeCatalog {
    fonts: Vec<Font>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    recorded_batches: Mutex<Vec<Vec<String>>>,
    fail_fetches: AtomicBool,
    omit_ids: Mutex<HashSet<String>>,
}

impl FakeCatalog {
    pub fn new(fonts: Vec<Font>) -> Self {
        Self {
            fonts,
            ..Default::default()
        }
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Families requested by each stylesheet call, in call order
    pub fn recorded_batches(&self) -> Vec<Vec<String>> {
        self.recorded_batches.lock().unwrap().clone()
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Omit `font_id` from future stylesheet responses
    pub fn omit_id(&self, font_id: &str) {
        self.omit_ids.lock().unwrap().insert(font_id.to_string());
    }

    pub fn clear_omissions(&self) {
        self.omit_ids.lock().unwrap().clear();
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn list_fonts(&self, _sort: SortOption) -> Result<Vec<Font>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.fonts.clone())
    }

    async fn fetch_stylesheet(
        &self,
        fonts: &[Font],
        _scripts: &[Script],
        _variants: &[Variant],
        previews_only: bool,
    ) -> Result<String, CatalogError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.recorded_batches
            .lock()
            .unwrap()
            .push(fonts.iter().map(|font| font.family.clone()).collect());

        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(CatalogError::Network("synthetic outage".to_string()));
        }

        let omitted = self.omit_ids.lock().unwrap();
        let weight = if previews_only { "preview" } else { "full" };
        let mut css = String::new();
        for font in fonts {
            if omitted.contains(&font.id) {
                continue;
            }
            css.push_str(&format!(
                "@font-face {{ font-family: '{}'; src: url(https://fonts.invalid/{}-{weight}.woff2); }}\n",
                font.family, font.id,
            ));
        }
        Ok(css)
    }
}

/// Route skip/discard logs to the test harness output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A catalog-sourced font carrying the default latin/regular metadata
pub fn catalog_font(family: &str) -> Font {
    let mut font = Font::new(family);
    font.scripts = vec![Script::latin()];
    font.variants = vec![Variant::regular()];
    font
}
