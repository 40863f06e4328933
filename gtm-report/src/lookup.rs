//! Static lookup tables used by the tag classifier.
//!
//! The tables ship embedded in the binary (`mappings/lookup.toml`) and may be
//! replaced at runtime with a user-supplied TOML file of the same shape.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Display name for a GTM tag type code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagTypeName {
    pub code: String,
    pub name: String,
}

/// Keyword that identifies an ad network when found in a tag's name or type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdNetworkKeyword {
    pub keyword: String,
    pub network: String,
}

/// Integration mode for a (lowercased) ad network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationMode {
    pub network: String,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupTables {
    #[serde(default, rename = "tag_type")]
    pub tag_types: Vec<TagTypeName>,
    /// Order matters: the first matching keyword wins.
    #[serde(default, rename = "ad_network")]
    pub ad_networks: Vec<AdNetworkKeyword>,
    #[serde(default, rename = "integration")]
    pub integrations: Vec<IntegrationMode>,
    #[serde(default = "default_integration")]
    pub default_integration: String,
}

/// Errors returned when loading lookup table files.
#[derive(Debug, Error)]
pub enum LookupLoadError {
    #[error("failed to read lookup tables {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse lookup tables {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl LookupTables {
    /// Display name for a tag type code, if the code is known.
    pub fn tag_type_name(&self, code: &str) -> Option<&str> {
        self.tag_types
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.name.as_str())
    }

    /// First ad network whose keyword occurs in `text` (case-insensitive).
    pub fn ad_network(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.ad_networks
            .iter()
            .find(|entry| lowered.contains(&entry.keyword.to_lowercase()))
            .map(|entry| entry.network.as_str())
    }

    /// Integration mode for an ad network display name.
    pub fn integration(&self, network: &str) -> &str {
        let lowered = network.to_lowercase();
        self.integrations
            .iter()
            .find(|entry| entry.network.to_lowercase() == lowered)
            .map(|entry| entry.mode.as_str())
            .unwrap_or(self.default_integration.as_str())
    }
}

/// Load lookup tables from a TOML file.
pub fn load_lookup_tables(path: &Path) -> Result<LookupTables, LookupLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LookupLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_lookup_tables(&raw, path.display().to_string())
}

/// Built-in lookup tables.
pub fn default_lookup_tables() -> LookupTables {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/mappings/lookup.toml"));
    match parse_lookup_tables(embedded, "embedded lookup tables".to_string()) {
        Ok(tables) if !tables.ad_networks.is_empty() && !tables.tag_types.is_empty() => tables,
        _ => fallback_lookup_tables(),
    }
}

fn parse_lookup_tables(raw: &str, path: String) -> Result<LookupTables, LookupLoadError> {
    toml::from_str(raw).map_err(|source| LookupLoadError::Parse { path, source })
}

fn default_integration() -> String {
    "Pixel".to_string()
}

fn tag_type(code: &str, name: &str) -> TagTypeName {
    TagTypeName {
        code: code.to_string(),
        name: name.to_string(),
    }
}

fn keyword(keyword: &str, network: &str) -> AdNetworkKeyword {
    AdNetworkKeyword {
        keyword: keyword.to_string(),
        network: network.to_string(),
    }
}

fn mode(network: &str, mode: &str) -> IntegrationMode {
    IntegrationMode {
        network: network.to_string(),
        mode: mode.to_string(),
    }
}

fn fallback_lookup_tables() -> LookupTables {
    LookupTables {
        tag_types: vec![
            tag_type("html", "Custom HTML"),
            tag_type("google_ads_remarketing", "Google Ads Remarketing"),
            tag_type("google_ads_conversion_tracking", "Google Ads Conversion Tracking"),
            tag_type("gaawe", "Google Analytics 4"),
            tag_type("ua", "Google Analytics UA"),
            tag_type("conversion_linker", "Conversion Linker"),
            tag_type("pinterest_tag", "Pinterest Tag"),
            tag_type("google_tag", "Google Tag"),
            tag_type("custom_image", "Custom Image"),
            tag_type("awct", "Google Ads"),
            tag_type("pntr", "Pinterest Tag"),
            tag_type("googtag", "Google Tag"),
        ],
        ad_networks: vec![
            keyword("meta", "Meta"),
            keyword("facebook", "Meta"),
            keyword("google ads", "Google"),
            keyword("adwords", "Google"),
            keyword("tiktok", "TikTok"),
            keyword("pinterest", "Pinterest"),
        ],
        integrations: vec![
            mode("meta", "dual"),
            mode("facebook", "dual"),
            mode("pinterest", "dual"),
        ],
        default_integration: default_integration(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{default_lookup_tables, fallback_lookup_tables, load_lookup_tables, LookupLoadError};

    #[test]
    fn embedded_tables_cover_fallback_entries() {
        let embedded = default_lookup_tables();
        let fallback = fallback_lookup_tables();

        for entry in &fallback.tag_types {
            assert_eq!(embedded.tag_type_name(&entry.code), Some(entry.name.as_str()));
        }
        assert_eq!(embedded.ad_networks, fallback.ad_networks);
        assert_eq!(embedded.integrations, fallback.integrations);
        assert_eq!(embedded.default_integration, "Pixel");
    }

    #[test]
    fn ad_network_is_case_insensitive_and_ordered() {
        let tables = default_lookup_tables();

        assert_eq!(tables.ad_network("FACEBOOK Lead"), Some("Meta"));
        assert_eq!(tables.ad_network("Pinterest + Meta retarget"), Some("Meta"));
        assert_eq!(tables.ad_network("Google Ads Conversion"), Some("Google"));
        assert_eq!(tables.ad_network("GA4 - Page View"), None);
    }

    #[test]
    fn integration_falls_back_to_default_mode() {
        let tables = default_lookup_tables();

        assert_eq!(tables.integration("Meta"), "dual");
        assert_eq!(tables.integration("Pinterest"), "dual");
        assert_eq!(tables.integration("Google"), "Pixel");
        assert_eq!(tables.integration("N/A"), "Pixel");
    }

    #[test]
    fn user_file_replaces_tables() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("lookup.toml");
        fs::write(
            &path,
            r#"default_integration = "CAPI"
[[ad_network]]
keyword = "snap"
network = "Snapchat"
"#,
        )
        .expect("write lookup");

        let tables = load_lookup_tables(&path).expect("load lookup");
        assert_eq!(tables.ad_network("Snap Pixel"), Some("Snapchat"));
        assert_eq!(tables.ad_network("Meta Pixel"), None);
        assert_eq!(tables.integration("Snapchat"), "CAPI");
        assert!(tables.tag_types.is_empty());
    }

    #[test]
    fn user_keywords_match_regardless_of_case() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("lookup.toml");
        fs::write(
            &path,
            r#"[[ad_network]]
keyword = "Snap"
network = "Snapchat"
[[integration]]
network = "Snapchat"
mode = "dual"
"#,
        )
        .expect("write lookup");

        let tables = load_lookup_tables(&path).expect("load lookup");
        assert_eq!(tables.ad_network("snap pixel"), Some("Snapchat"));
        assert_eq!(tables.ad_network("SNAP Pixel"), Some("Snapchat"));
        assert_eq!(tables.integration("Snapchat"), "dual");
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[[ad_network]\nkeyword =").expect("write lookup");

        assert!(matches!(
            load_lookup_tables(&path),
            Err(LookupLoadError::Parse { .. })
        ));
        assert!(matches!(
            load_lookup_tables(&dir.path().join("absent.toml")),
            Err(LookupLoadError::Io { .. })
        ));
    }
}
