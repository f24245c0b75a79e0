use fontpick_traits::{Font, FontList};

use crate::config::PickerOptions;

/// Build the working set for one picker instance from the catalog
///
/// Walks the catalog in its given order and admits every candidate that
/// passes all configured constraints, into `fonts` (which already holds any
/// out-of-band entries such as the default font). Admission stops once the
/// set reaches `options.limit`, pre-existing entries included. The catalog
/// order is preserved; nothing is re-sorted here.
///
/// An empty result is valid; filtering everything out is not an error.
pub fn build_font_list(catalog: Vec<Font>, options: &PickerOptions, mut fonts: FontList) -> FontList {
    for font in catalog {
        if fonts.len() >= options.limit {
            break;
        }
        // Skip entries already present, e.g. the default font.
        if fonts.contains_key(&font.family) {
            continue;
        }
        if !options.families.is_empty() && !options.families.contains(&font.family) {
            continue;
        }
        if !options.categories.is_empty() {
            match font.category {
                Some(category) if options.categories.contains(&category) => {}
                _ => continue,
            }
        }
        // The candidate must cover every configured script and variant.
        if !options.scripts.iter().all(|s| font.scripts.contains(s)) {
            continue;
        }
        if !options.variants.iter().all(|v| font.variants.contains(v)) {
            continue;
        }
        if !(options.filter)(&font) {
            continue;
        }
        if let Some(existing) = fonts.values().find(|existing| existing.id == font.id) {
            log::warn!(
                "skipping \"{}\": id \"{}\" collides with \"{}\"",
                font.family,
                font.id,
                existing.family
            );
            continue;
        }
        fonts.insert(font.family.clone(), font);
    }
    fonts
}
