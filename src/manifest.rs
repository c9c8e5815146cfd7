//! Modpack manifest parsing
//!
//! The manifest is the ordered download list: each entry names an addon by
//! its numeric project/file identifier pair. Download order equals list
//! order. A manifest that cannot be read or parsed is fatal and aborts the
//! run before any download starts.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::names::ModNames;

/// One addon to download, identified by a project/file identifier pair
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Numeric project identifier
    #[serde(rename = "projectID")]
    pub project_id: u64,
    /// Numeric file identifier within the project
    #[serde(rename = "fileID")]
    pub file_id: u64,
    /// Whether the pack marks this addon as required
    pub required: bool,
    /// Human-readable display name, resolved externally; may be empty
    #[serde(skip)]
    pub display_name: String,
}

/// Mod loader declared by the pack
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModLoader {
    /// Loader identifier, e.g. `forge-40.2.0`
    pub id: String,
    /// Whether this loader is the pack's primary loader
    pub primary: bool,
}

/// Minecraft section of the manifest
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Minecraft {
    /// Minecraft version the pack targets
    pub version: String,
    /// Declared mod loaders; the first entry is the active loader
    #[serde(rename = "modLoaders")]
    pub mod_loaders: Vec<ModLoader>,
}

/// Parsed modpack manifest
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Minecraft version and loader information
    pub minecraft: Minecraft,
    /// Pack name
    pub name: String,
    /// Pack version
    pub version: String,
    /// Pack author
    pub author: String,
    /// Ordered download list
    pub files: Vec<ManifestEntry>,
    /// Overrides directory name (unused by the download engine)
    #[serde(default)]
    pub overrides: String,
}

impl Manifest {
    /// Load and parse a manifest file
    ///
    /// Any read or parse failure is fatal ([`Error::Manifest`]).
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Attach display names from an external name table
    ///
    /// Entries absent from the table keep an empty display name; this is
    /// never an error.
    pub fn attach_names(&mut self, names: &ModNames) {
        for entry in &mut self.files {
            entry.display_name = names
                .get(&entry.project_id.to_string())
                .cloned()
                .unwrap_or_default();
        }
    }

    /// Identifier of the active mod loader (first declared), or empty
    pub fn loader(&self) -> &str {
        self.mod_loaders_first().map(|l| l.id.as_str()).unwrap_or("")
    }

    fn mod_loaders_first(&self) -> Option<&ModLoader> {
        self.minecraft.mod_loaders.first()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE_MANIFEST: &str = r#"{
        "minecraft": {
            "version": "1.19.2",
            "modLoaders": [{"id": "forge-43.2.0", "primary": true}]
        },
        "name": "Example Pack",
        "version": "2.1",
        "author": "packauthor",
        "files": [
            {"projectID": 238222, "fileID": 4593548, "required": true},
            {"projectID": 310806, "fileID": 4442340, "required": false}
        ],
        "overrides": "overrides"
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_parses_all_fields_in_order() {
        let file = write_temp(SAMPLE_MANIFEST);
        let manifest = Manifest::load(file.path()).unwrap();

        assert_eq!(manifest.name, "Example Pack");
        assert_eq!(manifest.minecraft.version, "1.19.2");
        assert_eq!(manifest.loader(), "forge-43.2.0");
        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.files[0].project_id, 238222);
        assert_eq!(manifest.files[1].file_id, 4442340);
        assert!(!manifest.files[1].required);
    }

    #[test]
    fn test_load_without_overrides_field() {
        let stripped = SAMPLE_MANIFEST.replace(",\n        \"overrides\": \"overrides\"", "");
        let file = write_temp(&stripped);
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.overrides, "");
    }

    #[test]
    fn test_load_missing_file_is_manifest_error() {
        let err = Manifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_manifest_error() {
        let file = write_temp("{ not json");
        let err = Manifest::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }

    #[test]
    fn test_attach_names_leaves_unknown_entries_empty() {
        let file = write_temp(SAMPLE_MANIFEST);
        let mut manifest = Manifest::load(file.path()).unwrap();

        let mut names: ModNames = HashMap::new();
        names.insert("238222".to_string(), "Just Enough Items".to_string());
        manifest.attach_names(&names);

        assert_eq!(manifest.files[0].display_name, "Just Enough Items");
        assert_eq!(manifest.files[1].display_name, "");
    }

    #[test]
    fn test_loader_empty_when_no_loaders_declared() {
        let stripped = SAMPLE_MANIFEST.replace(
            r#"[{"id": "forge-43.2.0", "primary": true}]"#,
            "[]",
        );
        let file = write_temp(&stripped);
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.loader(), "");
    }
}
