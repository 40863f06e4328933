//! Container export to report rows.
//!
//! One [`ContainerReport`] is built per export document. Rows keep whether a
//! folder or trigger id resolved to a name so each emitter can choose its own
//! fallback text.

use std::collections::BTreeMap;

use gtm_export_core::{ContainerExport, Tag};
use thiserror::Error;

use crate::classify::{classify, AdNetworkKey, TagClassification};
use crate::lookup::LookupTables;

/// Workspace id used when the source file name does not carry one.
pub const DEFAULT_WORKSPACE_ID: &str = "1";
/// Fixed "Last Edited" value; exports carry no per-tag edit times.
pub const LAST_EDITED: &str = "a year ago";

const GTM_BASE_URL: &str = "https://tagmanager.google.com/#/container";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("missing {} in {document}", .missing.join(", "))]
    MissingIdentifiers {
        document: String,
        missing: Vec<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub ad_network_key: AdNetworkKey,
}

/// A folder or trigger id, resolved to its display name when possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRef {
    Named(String),
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub tag_id: Option<String>,
    pub name: String,
    pub firing: Vec<NameRef>,
    pub blocking: Vec<NameRef>,
    /// `None` when the tag has no parent folder.
    pub folder: Option<NameRef>,
    pub last_edited: &'static str,
    pub paused: bool,
    pub classification: TagClassification,
    pub deep_link: Option<String>,
}

impl ReportRow {
    pub fn status(&self) -> &'static str {
        if self.paused {
            "Paused"
        } else {
            "Active"
        }
    }
}

/// All rows of one container plus the identifiers they were built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerReport {
    pub document: String,
    pub account_id: String,
    pub container_id: String,
    pub public_id: String,
    pub workspace_id: String,
    pub rows: Vec<ReportRow>,
}

/// Build the report for one export. `document` is the source file name; it
/// names the document in errors and carries the workspace id.
pub fn transform(
    export: &ContainerExport,
    document: &str,
    tables: &LookupTables,
    options: TransformOptions,
) -> Result<ContainerReport, TransformError> {
    let (account_id, container_id, public_id) =
        match (export.account_id(), export.container_id(), export.public_id()) {
            (Some(account), Some(container), Some(public)) => (account, container, public),
            (account, container, public) => {
                let missing = [
                    ("accountId", account.is_none()),
                    ("containerId", container.is_none()),
                    ("publicId", public.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                return Err(TransformError::MissingIdentifiers {
                    document: document.to_string(),
                    missing,
                });
            }
        };

    let folders = export.folder_names();
    let triggers = export.trigger_names();
    let workspace_id = workspace_id_from_file_name(document);
    let link = DeepLink {
        account_id,
        container_id,
        workspace_id: &workspace_id,
    };

    let rows = export
        .tags()
        .iter()
        .map(|tag| build_row(tag, &folders, &triggers, &link, tables, options))
        .collect();

    Ok(ContainerReport {
        document: document.to_string(),
        account_id: account_id.to_string(),
        container_id: container_id.to_string(),
        public_id: public_id.to_string(),
        workspace_id,
        rows,
    })
}

fn build_row(
    tag: &Tag,
    folders: &BTreeMap<String, String>,
    triggers: &BTreeMap<String, String>,
    link: &DeepLink<'_>,
    tables: &LookupTables,
    options: TransformOptions,
) -> ReportRow {
    let tag_id = tag.tag_id.clone().filter(|id| !id.is_empty());
    ReportRow {
        deep_link: tag_id.as_deref().map(|id| link.url(id)),
        tag_id,
        name: tag.name.clone().unwrap_or_default(),
        firing: resolve_all(&tag.firing_trigger_id, triggers),
        blocking: resolve_all(&tag.blocking_trigger_id, triggers),
        folder: tag
            .parent_folder_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| resolve(id, folders)),
        last_edited: LAST_EDITED,
        paused: tag.paused,
        classification: classify(tag, tables, options.ad_network_key),
    }
}

fn resolve(id: &str, names: &BTreeMap<String, String>) -> NameRef {
    match names.get(id) {
        Some(name) => NameRef::Named(name.clone()),
        None => NameRef::Unresolved(id.to_string()),
    }
}

fn resolve_all(ids: &[String], names: &BTreeMap<String, String>) -> Vec<NameRef> {
    ids.iter().map(|id| resolve(id, names)).collect()
}

struct DeepLink<'a> {
    account_id: &'a str,
    container_id: &'a str,
    workspace_id: &'a str,
}

impl DeepLink<'_> {
    fn url(&self, tag_id: &str) -> String {
        tag_url(self.account_id, self.container_id, self.workspace_id, tag_id)
    }
}

/// URL of a tag's edit page in the GTM web UI.
pub fn tag_url(account_id: &str, container_id: &str, workspace_id: &str, tag_id: &str) -> String {
    format!(
        "{GTM_BASE_URL}/accounts/{account_id}/containers/{container_id}/workspaces/{workspace_id}/tags/{tag_id}"
    )
}

/// Digits following the first `workspace` that is followed by a digit.
pub fn workspace_id_from_file_name(file_name: &str) -> String {
    const MARKER: &str = "workspace";

    file_name
        .match_indices(MARKER)
        .map(|(idx, _)| {
            file_name[idx + MARKER.len()..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .find(|digits| !digits.is_empty())
        .unwrap_or_else(|| DEFAULT_WORKSPACE_ID.to_string())
}

#[cfg(test)]
mod tests {
    use gtm_export_core::{parse, ContainerExport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{
        transform, workspace_id_from_file_name, NameRef, TransformError, TransformOptions,
    };
    use crate::lookup::default_lookup_tables;

    fn export(value: serde_json::Value) -> ContainerExport {
        serde_json::from_value(value).expect("export should deserialize")
    }

    #[test]
    fn single_facebook_tag_example() {
        let doc = export(json!({
            "containerVersion": {
                "accountId": "123",
                "containerId": "456",
                "container": { "publicId": "PUB1" },
                "folder": [{ "folderId": "10", "name": "Checkout" }],
                "tag": [{
                    "tagId": "1",
                    "name": "FB - Purchase",
                    "type": "facebook_pixel",
                    "parentFolderId": "10"
                }],
                "trigger": []
            }
        }));

        let report = transform(
            &doc,
            "container.json",
            &default_lookup_tables(),
            TransformOptions::default(),
        )
        .expect("transform");
        let row = &report.rows[0];

        assert_eq!(row.classification.ad_network, "Meta");
        assert_eq!(row.classification.integration, "dual");
        assert_eq!(row.folder, Some(NameRef::Named("Checkout".to_string())));
        assert!(row
            .deep_link
            .as_deref()
            .is_some_and(|url| url.ends_with("/tags/1")));
        assert_eq!(report.workspace_id, "1");
    }

    #[test]
    fn rows_keep_input_order_and_resolve_triggers() {
        let doc = export(json!({
            "containerVersion": {
                "accountId": "1",
                "containerId": "2",
                "container": { "publicId": "GTM-X" },
                "tag": [
                    { "tagId": "9", "name": "B", "firingTriggerId": ["5", "77"], "blockingTriggerId": ["6"] },
                    { "tagId": "3", "name": "A", "parentFolderId": "404", "paused": true }
                ],
                "trigger": [
                    { "triggerId": "5", "name": "All Pages" },
                    { "triggerId": "6", "name": "Internal" }
                ]
            }
        }));

        let report = transform(
            &doc,
            "gtm_workspace42.json",
            &default_lookup_tables(),
            TransformOptions::default(),
        )
        .expect("transform");

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "B");
        assert_eq!(
            report.rows[0].firing,
            vec![
                NameRef::Named("All Pages".to_string()),
                NameRef::Unresolved("77".to_string())
            ]
        );
        assert_eq!(report.rows[0].blocking, vec![NameRef::Named("Internal".to_string())]);
        assert_eq!(report.rows[0].folder, None);
        assert_eq!(report.rows[1].folder, Some(NameRef::Unresolved("404".to_string())));
        assert_eq!(report.rows[1].status(), "Paused");
        assert_eq!(
            report.rows[1].deep_link.as_deref(),
            Some("https://tagmanager.google.com/#/container/accounts/1/containers/2/workspaces/42/tags/3")
        );
    }

    #[test]
    fn tag_without_id_has_no_link() {
        let doc = export(json!({
            "containerVersion": {
                "accountId": "1",
                "containerId": "2",
                "container": { "publicId": "GTM-X" },
                "tag": [{ "name": "No id" }]
            }
        }));

        let report = transform(&doc, "x.json", &default_lookup_tables(), TransformOptions::default())
            .expect("transform");
        assert_eq!(report.rows[0].deep_link, None);
        assert_eq!(report.rows[0].tag_id, None);
    }

    #[test]
    fn missing_identifiers_are_named() {
        let doc = parse(br#"{"containerVersion": {"accountId": "1", "container": {}}}"#)
            .expect("parse");

        let err = transform(&doc, "broken.json", &default_lookup_tables(), TransformOptions::default())
            .expect_err("should fail");
        assert_eq!(
            err,
            TransformError::MissingIdentifiers {
                document: "broken.json".to_string(),
                missing: vec!["containerId", "publicId"],
            }
        );
        assert_eq!(err.to_string(), "missing containerId, publicId in broken.json");
    }

    #[test]
    fn workspace_id_takes_first_numbered_marker() {
        assert_eq!(workspace_id_from_file_name("GTM-ABC_workspace12.json"), "12");
        assert_eq!(workspace_id_from_file_name("workspace_draft_workspace3.json"), "3");
        assert_eq!(workspace_id_from_file_name("Workspace9.json"), "1");
        assert_eq!(workspace_id_from_file_name("export.json"), "1");
    }
}
