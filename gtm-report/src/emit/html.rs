//! One self-contained HTML table per container.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{flag, join_names, EmitError, Emitter};
use crate::transform::{ContainerReport, NameRef, ReportRow};

pub const COLUMNS: [&str; 15] = [
    "Tag Name",
    "Tag Type",
    "Triggering Conditions",
    "Folder",
    "Last Edited",
    "Status (Active/Paused)",
    "Ad Network",
    "Integration (CAPI/Pixel/Dual)",
    "User ID",
    "Segment Anonymous ID",
    "City, State, Zip Code, Country",
    "IP Address",
    "Order ID",
    "Order Amount ($)",
    "Product Details (Ecommerce)",
];

const STYLE: &str = "table{border-collapse:collapse;font-family:sans-serif;font-size:13px}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#f2f2f2}";

/// Writes `<output_dir>/<publicId>.html` for every container.
pub struct HtmlEmitter {
    output_dir: PathBuf,
}

impl HtmlEmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self, public_id: &str) -> PathBuf {
        self.output_dir.join(format!("{public_id}.html"))
    }
}

impl Emitter for HtmlEmitter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn emit(&mut self, report: &ContainerReport) -> Result<Option<PathBuf>, EmitError> {
        let bytes = render(report)?;
        let path = self.output_path(&report.public_id);
        write_bytes(&path, &bytes)?;
        Ok(Some(path))
    }

    fn finish(&mut self) -> Result<Option<PathBuf>, EmitError> {
        Ok(None)
    }
}

/// Render a complete HTML document for one container.
pub fn render(report: &ContainerReport) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    open(&mut writer, "html")?;

    open(&mut writer, "head")?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    writer.write_event(Event::Empty(meta))?;
    text_element(&mut writer, "title", &format!("{} Tags", report.public_id))?;
    text_element(&mut writer, "style", STYLE)?;
    close(&mut writer, "head")?;

    open(&mut writer, "body")?;
    let mut table = BytesStart::new("table");
    table.push_attribute(("border", "1"));
    writer.write_event(Event::Start(table))?;

    open(&mut writer, "tr")?;
    for column in COLUMNS {
        text_element(&mut writer, "th", column)?;
    }
    close(&mut writer, "tr")?;

    for row in &report.rows {
        write_row(&mut writer, row)?;
    }

    close(&mut writer, "table")?;
    close(&mut writer, "body")?;
    close(&mut writer, "html")?;
    Ok(writer.into_inner())
}

fn write_row(writer: &mut Writer<Vec<u8>>, row: &ReportRow) -> Result<(), quick_xml::Error> {
    let class = &row.classification;
    open(writer, "tr")?;

    open(writer, "td")?;
    match &row.deep_link {
        Some(url) => {
            let mut link = BytesStart::new("a");
            link.push_attribute(("href", url.as_str()));
            link.push_attribute(("target", "_blank"));
            writer.write_event(Event::Start(link))?;
            text(writer, &row.name)?;
            close(writer, "a")?;
        }
        None => text(writer, &row.name)?,
    }
    close(writer, "td")?;

    text_element(writer, "td", &class.display_type)?;
    write_conditions(writer, row)?;
    let folder = row.folder.as_ref().map(label).unwrap_or_default();
    text_element(writer, "td", &folder)?;
    text_element(writer, "td", row.last_edited)?;
    text_element(writer, "td", row.status())?;
    text_element(writer, "td", &class.ad_network)?;
    text_element(writer, "td", &class.integration)?;
    text_element(writer, "td", flag(class.user_id_present))?;
    text_element(writer, "td", flag(class.anonymous_id_present))?;
    text_element(writer, "td", flag(class.location_applicable))?;
    text_element(writer, "td", flag(true))?;
    text_element(writer, "td", flag(class.order_id_present))?;
    text_element(writer, "td", flag(class.order_amount_present))?;
    text_element(writer, "td", flag(class.product_details_present))?;

    close(writer, "tr")
}

/// Firing trigger names, then a bold "Exceptions:" block of blocking triggers.
fn write_conditions(writer: &mut Writer<Vec<u8>>, row: &ReportRow) -> Result<(), quick_xml::Error> {
    open(writer, "td")?;
    text(writer, &join_names(&row.firing, label))?;
    if !row.blocking.is_empty() {
        if !row.firing.is_empty() {
            line_break(writer)?;
        }
        text_element(writer, "strong", "Exceptions:")?;
        line_break(writer)?;
        text(writer, &join_names(&row.blocking, label))?;
    }
    close(writer, "td")
}

/// Unresolved ids are shown as-is.
fn label(name: &NameRef) -> String {
    match name {
        NameRef::Named(name) | NameRef::Unresolved(name) => name.clone(),
    }
}

fn open(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn close(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text(writer: &mut Writer<Vec<u8>>, value: &str) -> Result<(), quick_xml::Error> {
    if !value.is_empty() {
        writer.write_event(Event::Text(BytesText::new(value)))?;
    }
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, value: &str) -> Result<(), quick_xml::Error> {
    open(writer, tag)?;
    text(writer, value)?;
    close(writer, tag)
}

fn line_break(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Empty(BytesStart::new("br")))?;
    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), EmitError> {
    fs::write(path, bytes).map_err(|source| EmitError::Io {
        path: path.display().to_string(),
        source,
    })
}
