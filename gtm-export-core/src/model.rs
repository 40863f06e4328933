use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::scanner::{contains_any_variable, contains_variable};

/// Top-level shape of a GTM container export file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerExport {
    /// The exported container version. Absent on malformed exports.
    #[serde(default)]
    pub container_version: Option<ContainerVersion>,
}

/// A single container version: identifiers plus tags, triggers and folders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerVersion {
    #[serde(default, deserialize_with = "lenient::id")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub container: Option<Container>,
    #[serde(default)]
    pub tag: Vec<Tag>,
    #[serde(default)]
    pub trigger: Vec<Trigger>,
    /// Folder list as emitted by the GTM UI export.
    #[serde(default)]
    pub folder: Option<FolderSet>,
}

/// Container metadata nested under `containerVersion.container`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, deserialize_with = "lenient::id")]
    pub public_id: Option<String>,
    #[serde(default)]
    pub folders: Option<FolderSet>,
    #[serde(default)]
    pub folder: Option<FolderSet>,
}

/// Folders appear either as an ordered list or keyed by folder id.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FolderSet {
    List(Vec<Folder>),
    Keyed(BTreeMap<String, Folder>),
}

impl FolderSet {
    /// Iterate folders regardless of the export shape.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Folder> + '_> {
        match self {
            FolderSet::List(list) => Box::new(list.iter()),
            FolderSet::Keyed(map) => Box::new(map.values()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(default, deserialize_with = "lenient::id")]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(default, deserialize_with = "lenient::id")]
    pub trigger_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A configured tag. Keys not modelled explicitly (`parameter`,
/// `monitoringMetadata`, ...) are kept verbatim in [`Tag::config`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, deserialize_with = "lenient::id")]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub tag_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paused: bool,
    #[serde(default, deserialize_with = "lenient::id")]
    pub parent_folder_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub firing_trigger_id: Vec<String>,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub blocking_trigger_id: Vec<String>,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl Tag {
    /// True if any string in the tag configuration contains `variable`.
    pub fn references(&self, variable: &str) -> bool {
        self.config
            .values()
            .any(|value| contains_variable(value, variable))
    }

    /// True if the tag configuration references any of `variables`.
    pub fn references_any(&self, variables: &[&str]) -> bool {
        self.config
            .values()
            .any(|value| contains_any_variable(value, variables))
    }
}

impl ContainerExport {
    pub fn account_id(&self) -> Option<&str> {
        non_empty(self.container_version.as_ref()?.account_id.as_deref())
    }

    pub fn container_id(&self) -> Option<&str> {
        non_empty(self.container_version.as_ref()?.container_id.as_deref())
    }

    pub fn public_id(&self) -> Option<&str> {
        let container = self.container_version.as_ref()?.container.as_ref()?;
        non_empty(container.public_id.as_deref())
    }

    pub fn tags(&self) -> &[Tag] {
        self.container_version
            .as_ref()
            .map(|v| v.tag.as_slice())
            .unwrap_or_default()
    }

    pub fn triggers(&self) -> &[Trigger] {
        self.container_version
            .as_ref()
            .map(|v| v.trigger.as_slice())
            .unwrap_or_default()
    }

    /// All folders from every location an export may carry them in.
    pub fn folders(&self) -> Vec<&Folder> {
        let Some(version) = self.container_version.as_ref() else {
            return Vec::new();
        };
        let container = version.container.as_ref();
        [
            container.and_then(|c| c.folders.as_ref()),
            container.and_then(|c| c.folder.as_ref()),
            version.folder.as_ref(),
        ]
        .into_iter()
        .flatten()
        .flat_map(FolderSet::iter)
        .collect()
    }

    /// Folder id to folder name. Folders missing either field are skipped.
    pub fn folder_names(&self) -> BTreeMap<String, String> {
        self.folders()
            .into_iter()
            .filter_map(|folder| {
                let id = non_empty(folder.folder_id.as_deref())?;
                let name = non_empty(folder.name.as_deref())?;
                Some((id.to_string(), name.to_string()))
            })
            .collect()
    }

    /// Trigger id to trigger name. Triggers missing either field are skipped.
    pub fn trigger_names(&self) -> BTreeMap<String, String> {
        self.triggers()
            .iter()
            .filter_map(|trigger| {
                let id = non_empty(trigger.trigger_id.as_deref())?;
                let name = non_empty(trigger.name.as_deref())?;
                Some((id.to_string(), name.to_string()))
            })
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ContainerExport, Tag};

    #[test]
    fn folders_accept_keyed_and_list_shapes() {
        let keyed: ContainerExport = serde_json::from_value(json!({
            "containerVersion": {
                "container": {
                    "publicId": "GTM-1",
                    "folders": { "10": { "folderId": "10", "name": "Checkout" } }
                }
            }
        }))
        .expect("keyed folders");
        let listed: ContainerExport = serde_json::from_value(json!({
            "containerVersion": {
                "folder": [{ "folderId": "10", "name": "Checkout" }]
            }
        }))
        .expect("listed folders");

        assert_eq!(keyed.folder_names().get("10").map(String::as_str), Some("Checkout"));
        assert_eq!(listed.folder_names().get("10").map(String::as_str), Some("Checkout"));
    }

    #[test]
    fn unmodelled_tag_keys_land_in_config() {
        let tag: Tag = serde_json::from_value(json!({
            "tagId": "7",
            "name": "Purchase",
            "type": "html",
            "parameter": [{ "key": "html", "value": "<script>{{DL - total}}</script>" }]
        }))
        .expect("tag");

        assert!(tag.config.contains_key("parameter"));
        assert!(!tag.config.contains_key("name"));
        assert!(tag.references("{{DL - total}}"));
    }

    #[test]
    fn empty_identifiers_are_treated_as_missing() {
        let export: ContainerExport = serde_json::from_value(json!({
            "containerVersion": { "accountId": "", "containerId": "456" }
        }))
        .expect("export");

        assert_eq!(export.account_id(), None);
        assert_eq!(export.container_id(), Some("456"));
        assert_eq!(export.public_id(), None);
    }

    #[test]
    fn numeric_ids_and_null_fields_are_tolerated() {
        let export: ContainerExport = serde_json::from_value(json!({
            "containerVersion": {
                "accountId": 123,
                "containerId": "456",
                "container": { "publicId": "PUB1" },
                "tag": [{
                    "tagId": 1,
                    "name": "FB - Purchase",
                    "paused": null,
                    "parentFolderId": 10,
                    "firingTriggerId": null,
                    "blockingTriggerId": [41, "42"]
                }],
                "trigger": [{ "triggerId": 41, "name": "Internal Traffic" }]
            }
        }))
        .expect("lenient export");

        assert_eq!(export.account_id(), Some("123"));
        let tag = &export.tags()[0];
        assert_eq!(tag.tag_id.as_deref(), Some("1"));
        assert_eq!(tag.parent_folder_id.as_deref(), Some("10"));
        assert!(!tag.paused);
        assert!(tag.firing_trigger_id.is_empty());
        assert_eq!(tag.blocking_trigger_id, vec!["41".to_string(), "42".to_string()]);
        assert_eq!(
            export.trigger_names().get("41").map(String::as_str),
            Some("Internal Traffic")
        );
    }
}
