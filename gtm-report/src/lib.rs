//! Google Tag Manager container export reporting.
//!
//! Turns GTM container exports into per-tag report rows and renders them as
//! HTML tables or as sheets of a single spreadsheet workbook.
//!
//! # Architecture
//!
//! - [`lookup`] — Tag type names, ad network keywords and integration modes
//! - [`classify`] — Per-tag ad network, integration and variable flags
//! - [`transform`] — One container export to an ordered set of report rows
//! - [`emit`] — HTML and workbook emitters behind the [`emit::Emitter`] trait
//!
//! # Examples
//!
//! ```ignore
//! use gtm_export_core::parse_file;
//! use gtm_report::emit::{Emitter, HtmlEmitter};
//! use gtm_report::lookup::default_lookup_tables;
//! use gtm_report::transform::{transform, TransformOptions};
//!
//! let export = parse_file("exports/GTM-ABC_workspace3.json".as_ref())?;
//! let report = transform(
//!     &export,
//!     "GTM-ABC_workspace3.json",
//!     &default_lookup_tables(),
//!     TransformOptions::default(),
//! )?;
//! HtmlEmitter::new("output").emit(&report)?;
//! ```
//!
//! # Built on gtm-export-core
//!
//! Parsing and the recursive variable search live in `gtm-export-core`; all
//! report-specific logic is contained in this crate.

pub mod classify;
pub mod emit;
pub mod lookup;
pub mod transform;
