//! Core library for EV charging-session OCR processing.
//!
//! This crate provides:
//! - The charge record model and its CSV projection
//! - Tolerant text rules shared by brand parsers
//! - A plugin trait and registry with one plugin per charging app layout
//! - Dispatch of raw OCR text to the matching plugin
//! - Merge and deduplication of records against an existing CSV
//! - A thin wrapper around the external `tesseract` binary
//! - Batch processing that keeps one bad image from stopping the rest
//! - Source generation for new plugins

pub mod dispatch;
pub mod error;
pub mod merge;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod plugins;
pub mod rules;
pub mod scaffold;
pub mod store;

pub use dispatch::ChargeParser;
pub use error::{ChargeError, Result};
pub use merge::{merge, merge_with_stats, sort_records, MergeOutcome};
pub use models::config::EvChargeConfig;
pub use models::record::{parse_duration_to_minutes, ChargeRecord, IdentityKey, CSV_COLUMNS};
pub use ocr::{OcrEngine, TesseractEngine};
pub use pipeline::{BatchProcessor, BatchReport, ImageOutcome};
pub use plugins::{ChargingAppPlugin, PluginRegistry};
