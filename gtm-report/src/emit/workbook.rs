//! Single workbook with one sheet per container.

use std::path::PathBuf;

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};

use super::{join_names, EmitError, Emitter};
use crate::transform::{ContainerReport, NameRef, ReportRow};

pub const WORKBOOK_FILE_NAME: &str = "containers.xlsx";

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
    "Order ID",
    "Order Amount ($)",
    "Product Details (Ecommerce)",
    "URL",
];

const TRIGGERS_COLUMN: u16 = 2;

/// One worksheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Bool(bool),
    Link(String),
}

/// Accumulates one sheet per container and writes
/// `<output_dir>/containers.xlsx` on [`Emitter::finish`].
pub struct WorkbookEmitter {
    output_dir: PathBuf,
    workbook: Workbook,
    sheet_names: Vec<String>,
}

impl WorkbookEmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            workbook: Workbook::new(),
            sheet_names: Vec::new(),
        }
    }

    /// Sheet names in insertion order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(WORKBOOK_FILE_NAME)
    }

    /// Append a sheet named after the container's public id. Sheet names are
    /// unique ignoring case.
    pub fn add_sheet(&mut self, report: &ContainerReport) -> Result<(), EmitError> {
        let wanted = report.public_id.to_lowercase();
        if self.sheet_names.iter().any(|name| name.to_lowercase() == wanted) {
            return Err(EmitError::DuplicateSheet(report.public_id.clone()));
        }

        // Built detached so a failure leaves the workbook untouched.
        let mut sheet = Worksheet::new();
        sheet.set_name(&report.public_id)?;
        write_sheet(&mut sheet, report)?;

        self.workbook.push_worksheet(sheet);
        self.sheet_names.push(report.public_id.clone());
        Ok(())
    }
}

impl Emitter for WorkbookEmitter {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn emit(&mut self, report: &ContainerReport) -> Result<Option<PathBuf>, EmitError> {
        self.add_sheet(report)?;
        Ok(None)
    }

    fn finish(&mut self) -> Result<Option<PathBuf>, EmitError> {
        if self.sheet_names.is_empty() {
            return Ok(None);
        }

        // Pinned so unchanged inputs give an unchanged file.
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        self.workbook
            .set_properties(&DocProperties::new().set_creation_datetime(&created));

        let path = self.output_path();
        self.workbook.save(&path)?;
        Ok(Some(path))
    }
}

/// Data rows for one container, in [`COLUMNS`] order.
pub fn sheet_rows(report: &ContainerReport) -> Vec<Vec<Cell>> {
    report.rows.iter().map(row_cells).collect()
}

fn row_cells(row: &ReportRow) -> Vec<Cell> {
    let class = &row.classification;
    vec![
        Cell::Text(row.name.clone()),
        Cell::Text(class.display_type.clone()),
        Cell::Text(conditions(row)),
        Cell::Text(
            row.folder
                .as_ref()
                .map(folder_label)
                .unwrap_or_default(),
        ),
        Cell::Text(row.last_edited.to_string()),
        Cell::Text(row.status().to_string()),
        Cell::Text(class.ad_network.clone()),
        Cell::Text(class.integration.clone()),
        Cell::Bool(class.user_id_present),
        Cell::Bool(class.anonymous_id_present),
        Cell::Bool(class.location_applicable),
        Cell::Bool(class.order_id_present),
        Cell::Bool(class.order_amount_present),
        Cell::Bool(class.product_details_present),
        row.deep_link
            .clone()
            .map(Cell::Link)
            .unwrap_or_else(|| Cell::Text(String::new())),
    ]
}

fn conditions(row: &ReportRow) -> String {
    let mut out = join_names(&row.firing, trigger_label);
    if !row.blocking.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Exceptions:\n");
        out.push_str(&join_names(&row.blocking, trigger_label));
    }
    out
}

fn trigger_label(name: &NameRef) -> String {
    match name {
        NameRef::Named(name) => name.clone(),
        NameRef::Unresolved(id) => format!("Unknown Trigger ({id})"),
    }
}

fn folder_label(name: &NameRef) -> String {
    match name {
        NameRef::Named(name) => name.clone(),
        NameRef::Unresolved(_) => "Unknown Folder".to_string(),
    }
}

fn write_sheet(sheet: &mut Worksheet, report: &ContainerReport) -> Result<(), EmitError> {
    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();

    for (col, title) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(TRIGGERS_COLUMN, 40)?;

    for (row_idx, cells) in (1u32..).zip(sheet_rows(report)) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(value) if col == TRIGGERS_COLUMN => {
                    sheet.write_string_with_format(row_idx, col, value, &wrap)?;
                }
                Cell::Text(value) => {
                    sheet.write_string(row_idx, col, value)?;
                }
                Cell::Bool(value) => {
                    sheet.write_boolean(row_idx, col, value)?;
                }
                Cell::Link(url) => {
                    sheet.write_url(row_idx, col, url.as_str())?;
                }
            }
        }
    }
    Ok(())
}
