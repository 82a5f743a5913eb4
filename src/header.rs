//! Catalog header synthesis and inspection.

use crate::unit::TranslationUnit;

/// Canonical order of the well-known header fields.
pub const HEADER_ORDER: &[&str] = &[
    "Project-Id-Version",
    "Report-Msgid-Bugs-To",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Last-Translator",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Plural-Forms",
    "X-Generator",
];

/// Options for a freshly synthesized header.
#[derive(Debug, Clone)]
pub struct HeaderOptions {
    /// Charset advertised in `Content-Type`.
    pub charset: String,
    /// `Content-Transfer-Encoding` value.
    pub encoding: String,
    /// Inline accelerator marker advertised as `X-Accelerator-Marker`.
    pub accelerator_marker: Option<char>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self { charset: "UTF-8".to_string(), encoding: "8bit".to_string(), accelerator_marker: None }
    }
}

/// Builds a header unit (empty source, field block as target) in the
/// canonical field order.
#[must_use]
pub fn make_header(options: &HeaderOptions) -> TranslationUnit {
    let mut fields: Vec<(String, String)> = vec![
        ("Project-Id-Version".to_string(), "PACKAGE VERSION".to_string()),
        ("Report-Msgid-Bugs-To".to_string(), String::new()),
        ("POT-Creation-Date".to_string(), "YEAR-MO-DA HO:MI+ZONE".to_string()),
        ("PO-Revision-Date".to_string(), "YEAR-MO-DA HO:MI+ZONE".to_string()),
        ("Last-Translator".to_string(), "FULL NAME <EMAIL@ADDRESS>".to_string()),
        ("Language-Team".to_string(), "LANGUAGE <LL@li.org>".to_string()),
        ("MIME-Version".to_string(), "1.0".to_string()),
        ("Content-Type".to_string(), format!("text/plain; charset={}", options.charset)),
        ("Content-Transfer-Encoding".to_string(), options.encoding.clone()),
        ("Plural-Forms".to_string(), "nplurals=INTEGER; plural=EXPRESSION;".to_string()),
        (
            "X-Generator".to_string(),
            format!("catmerge {}", env!("CARGO_PKG_VERSION")),
        ),
    ];
    if let Some(marker) = options.accelerator_marker {
        fields.push(("X-Accelerator-Marker".to_string(), marker.to_string()));
    }

    TranslationUnit { target: render_fields(&fields), ..TranslationUnit::default() }
}

/// Parses a header field block into ordered key/value pairs. Lines without a
/// colon are skipped.
#[must_use]
pub fn parse_fields(target: &str) -> Vec<(String, String)> {
    target
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Sets `field` to `value` in a header unit's target, preserving field order
/// and appending unknown fields at the end.
pub fn update_field(header: &mut TranslationUnit, field: &str, value: &str) {
    let mut fields = parse_fields(&header.target);
    match fields.iter_mut().find(|(key, _)| key == field) {
        Some(entry) => entry.1 = value.to_string(),
        None => fields.push((field.to_string(), value.to_string())),
    }
    header.target = render_fields(&fields);
}

/// Renders field pairs back into the `Key: value\n` block form.
fn render_fields(fields: &[(String, String)]) -> String {
    let mut target = String::new();
    for (key, value) in fields {
        target.push_str(&format!("{key}: {value}\n"));
    }
    target
}
