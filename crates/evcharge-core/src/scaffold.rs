//! Skeleton generation for new charging-app plugins.
//!
//! A sample screenshot's OCR text seeds the `detect` keywords; `parse` is left
//! for the developer to fill in.

use std::collections::HashMap;

use crate::rules::patterns::KEYWORD;

/// Whether `brand` can name a plugin module: lowercase ASCII letters, digits
/// and underscores, not starting with a digit.
pub fn is_valid_brand(brand: &str) -> bool {
    brand.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
        && brand
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && brand.chars().any(|c| c != '_')
}

/// `electrify_america` → `ElectrifyAmerica`.
pub fn slug_to_type_name(slug: &str) -> String {
    slug.split(['_', '-', ' ', '\t'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Most frequent lowercase words of four or more letters, ties broken by
/// first appearance.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for m in KEYWORD.find_iter(&lowered) {
        let count = counts.entry(m.as_str()).or_insert(0);
        if *count == 0 {
            order.push(m.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(limit).map(str::to_string).collect()
}

/// Rust source for a plugin module named after `brand`.
pub fn render_plugin_source(
    type_name: &str,
    brand: &str,
    display_name: &str,
    keywords: &[String],
) -> String {
    let keyword_list = keywords
        .iter()
        .map(|k| format!("{:?}", k))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"//! {display_name} charge screen.

use super::ChargingAppPlugin;
use crate::models::record::ChargeRecord;

const KEYWORDS: [&str; {count}] = [{keyword_list}];

/// Parser for the {display_name} app.
pub struct {type_name}Plugin;

impl ChargingAppPlugin for {type_name}Plugin {{
    fn brand(&self) -> &'static str {{
        {brand:?}
    }}

    fn display_name(&self) -> &'static str {{
        {display_name:?}
    }}

    fn detect(&self, text: &str) -> bool {{
        let lowered = text.to_lowercase();
        KEYWORDS.iter().any(|k| lowered.contains(k))
    }}

    fn parse(&self, _text: &str) -> ChargeRecord {{
        // TODO: extract {display_name} fields with the helpers in crate::rules
        ChargeRecord::for_brand(self.brand())
    }}
}}
"#,
        count = keywords.len(),
    )
}
