//! Report emitters.
//!
//! Every emitter consumes the same [`ContainerReport`]; column sets and
//! fallback text for unresolved folders and triggers are emitter-specific.

pub mod html;
pub mod workbook;

use std::path::PathBuf;

use thiserror::Error;

use crate::transform::{ContainerReport, NameRef};

pub use html::HtmlEmitter;
pub use workbook::WorkbookEmitter;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to render HTML: {0}")]
    Html(#[from] quick_xml::Error),
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("sheet {0} already exists in the workbook")]
    DuplicateSheet(String),
}

/// Consumer of container reports.
pub trait Emitter {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Handle one container. Returns the path written, if any.
    fn emit(&mut self, report: &ContainerReport) -> Result<Option<PathBuf>, EmitError>;

    /// Called once after the last container. Returns the path written, if any.
    fn finish(&mut self) -> Result<Option<PathBuf>, EmitError>;
}

pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

pub(crate) fn join_names(refs: &[NameRef], label: impl Fn(&NameRef) -> String) -> String {
    refs.iter().map(label).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::{flag, join_names};
    use crate::transform::NameRef;

    #[test]
    fn joins_labels_with_comma_space() {
        let refs = vec![
            NameRef::Named("All Pages".to_string()),
            NameRef::Unresolved("77".to_string()),
        ];
        let joined = join_names(&refs, |r| match r {
            NameRef::Named(name) => name.clone(),
            NameRef::Unresolved(id) => format!("#{id}"),
        });

        assert_eq!(joined, "All Pages, #77");
        assert_eq!(join_names(&[], |_| String::new()), "");
        assert_eq!(flag(true), "TRUE");
    }
}
