//! Display-name lookup from the pack's mod-list HTML
//!
//! CurseForge packs ship a `modlist.html` next to the manifest: one anchor
//! per addon whose href ends in the numeric project identifier and whose
//! text is the human-readable name. This module scans those anchors into a
//! lookup table keyed by the stringified project identifier.
//!
//! A missing or unparseable mod list is not fatal; entries simply download
//! under an empty display name.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Mapping from stringified project identifier to display name
pub type ModNames = HashMap<String, String>;

/// Load and scan a mod-list HTML file
pub fn load(path: &Path) -> Result<ModNames> {
    let html = std::fs::read_to_string(path)?;
    Ok(parse(&html))
}

/// Scan anchors out of mod-list HTML
///
/// Anchors whose href does not end in a numeric path segment are skipped.
pub fn parse(html: &str) -> ModNames {
    let mut names = ModNames::new();
    let mut rest = html;

    while let Some(start) = rest.find("<a ") {
        let tag = &rest[start..];
        let Some(end) = tag.find("</a>") else {
            break;
        };
        let anchor = &tag[..end];

        if let Some((id, name)) = scan_anchor(anchor) {
            names.insert(id.to_string(), name.to_string());
        }

        rest = &tag[end + "</a>".len()..];
    }

    names
}

/// Extract (project id, display name) from one anchor, `</a>` excluded
fn scan_anchor(anchor: &str) -> Option<(&str, &str)> {
    let href_start = anchor.find("href=\"")? + "href=\"".len();
    let href = &anchor[href_start..];
    let href = &href[..href.find('"')?];

    // Project id is the last non-empty path segment, query stripped.
    let path = href.split('?').next().unwrap_or_default();
    let id = path.trim_end_matches('/').rsplit('/').next()?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let text_start = anchor.find('>')? + 1;
    let name = anchor[text_start..].trim();
    if name.is_empty() {
        return None;
    }

    Some((id, name))
}
