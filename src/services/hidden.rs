// src/services/hidden.rs

//! Hidden `<input>` scraping.
//!
//! The portal's confirmation page comes from a stable server template, so a
//! bounded regex scan is enough. Nothing is parsed into a DOM, rendered, or
//! sanitized.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::HiddenFieldSet;

/// A whole `<input ...>` tag; quoted attribute values may contain `>`.
static INPUT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<input\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("input tag pattern")
});

/// One attribute inside a tag: name, then an optional quoted or bare value.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern")
});

/// Collect every hidden input's name and value, in document order.
///
/// Tags without a `name` are skipped; a missing `value` is an empty string;
/// a repeated name keeps the last value.
pub fn extract(html: &str) -> HiddenFieldSet {
    let mut fields = HiddenFieldSet::new();

    for tag in INPUT_TAG.captures_iter(html) {
        let Some(attrs) = tag.get(1) else {
            continue;
        };
        let attrs = attributes(attrs.as_str());

        let is_hidden = attr(&attrs, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
        if !is_hidden {
            continue;
        }

        match attr(&attrs, "name") {
            Some(name) if !name.is_empty() => {
                fields.insert(name, attr(&attrs, "value").unwrap_or(""));
            }
            _ => log::debug!("Skipping hidden input without a name"),
        }
    }

    fields
}

/// Split a tag's attribute text into `(name, value)` pairs.
fn attributes(text: &str) -> Vec<(&str, Option<&str>)> {
    ATTRIBUTE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str());
            Some((name, value))
        })
        .collect()
}

/// First value of an attribute, matched case-insensitively.
fn attr<'a>(attrs: &[(&'a str, Option<&'a str>)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.unwrap_or(""))
}
