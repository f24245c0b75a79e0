//! CSS text handling: response splitting and rule synthesis
//!
//! Catalog stylesheet responses arrive as one combined payload of
//! `@font-face` blocks; [`extract_font_faces`] splits them into a per-font-id
//! map so the coordinator can fill each registry slot individually. The
//! remaining functions are the string templates behind the preview and
//! active selector declarations and the synthesized rule for custom fonts.

use std::collections::HashMap;

use url::Url;

use fontpick_traits::{Font, font_id};

/// Split a combined stylesheet response into per-font-id `@font-face` text
///
/// Each block is keyed by the slug of its `font-family` descriptor; multiple
/// blocks of the same family (one per script subset) are concatenated in
/// response order. Blocks without a parseable family are skipped.
pub fn extract_font_faces(css: &str) -> HashMap<String, String> {
    let mut styles: HashMap<String, String> = HashMap::new();
    let mut rest = css;

    while let Some(start) = rest.find("@font-face") {
        let block_and_rest = &rest[start..];
        // Font-face blocks contain no nested braces.
        let Some(end) = block_and_rest.find('}') else {
            log::debug!("unterminated @font-face block in stylesheet response");
            break;
        };
        let block = &block_and_rest[..=end];

        match font_face_family(block) {
            Some(family) => {
                let entry = styles.entry(font_id(&family)).or_default();
                entry.push_str(block);
                entry.push('\n');
            }
            None => {
                log::debug!("skipping @font-face block without a font-family descriptor");
            }
        }
        rest = &block_and_rest[end + 1..];
    }

    styles
}

/// The `font-family` descriptor value of one `@font-face` block
fn font_face_family(block: &str) -> Option<String> {
    let descriptor = &block[block.find("font-family")? + "font-family".len()..];
    let value = &descriptor[descriptor.find(':')? + 1..];
    let value = value[..value.find([';', '}'])?].trim();
    let value = value.trim_matches(['\'', '"']).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Synthesize the `@font-face` rule for a custom font
///
/// Custom fonts never round-trip through the catalog; this rule is their
/// entire stylesheet.
pub fn font_face_rule(family: &str, url: &Url) -> String {
    format!(
        "@font-face {{\n\
         \tfont-family: '{family}';\n\
         \tfont-style: normal;\n\
         \tfont-weight: 400;\n\
         \tsrc: url({url});\n\
         }}\n"
    )
}

/// Selector rule rendering one picker entry in its own family
pub fn preview_selector_rule(font: &Font, selector_suffix: &str) -> String {
    format!(
        "#font-button-{id}{selector_suffix} {{\n\
         \tfont-family: \"{family}\";\n\
         }}\n",
        id = font.id,
        family = font.family,
    )
}

/// Selector rule applying the active font, with an optional fallback on the
/// previously active family while the full weight is still loading
pub fn active_selector_rule(
    font: &Font,
    previous_family: Option<&str>,
    selector_suffix: &str,
) -> String {
    let fallback = match previous_family {
        Some(previous) if !previous.is_empty() => format!(", \"{previous}\""),
        _ => String::new(),
    };
    format!(
        ".apply-font{selector_suffix} {{\n\
         \tfont-family: \"{family}\"{fallback};\n\
         }}\n",
        family = font.family,
    )
}
