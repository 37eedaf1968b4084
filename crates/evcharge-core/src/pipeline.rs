//! Per-image batch processing: OCR, then dispatch, then collect.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dispatch::ChargeParser;
use crate::error::PluginError;
use crate::models::record::ChargeRecord;
use crate::ocr::OcrEngine;

/// What happened to one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// A plugin produced a record.
    Parsed { brand: String },
    /// OCR succeeded but no plugin recognised the text.
    NoMatch,
    /// OCR failed; the message is kept for reporting.
    Failed(String),
}

/// Records and per-image outcomes of a batch, both in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<ChargeRecord>,
    pub outcomes: Vec<(PathBuf, ImageOutcome)>,
}

impl BatchReport {
    pub fn parsed(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Parsed { .. }))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|o| *o == ImageOutcome::NoMatch)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ImageOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Runs every image to completion before moving to the next one.
pub struct BatchProcessor<'a, E: OcrEngine> {
    parser: &'a ChargeParser,
    engine: &'a E,
    psm: String,
    forced_plugin: Option<String>,
}

impl<'a, E: OcrEngine> BatchProcessor<'a, E> {
    pub fn new(parser: &'a ChargeParser, engine: &'a E, psm: impl Into<String>) -> Self {
        Self {
            parser,
            engine,
            psm: psm.into(),
            forced_plugin: None,
        }
    }

    /// Skip detection and parse every image with the named plugin.
    pub fn with_plugin(mut self, name: &str) -> Result<Self, PluginError> {
        let plugin = self.parser.registry().require(name)?;
        self.forced_plugin = Some(plugin.brand().to_string());
        Ok(self)
    }

    pub fn process<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        self.process_with(paths, |_, _| {})
    }

    /// Like [`process`](Self::process), calling `on_image` after each image.
    pub fn process_with<P, F>(&self, paths: &[P], mut on_image: F) -> BatchReport
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &ImageOutcome),
    {
        let mut report = BatchReport::default();

        for path in paths {
            let path = path.as_ref();
            let (record, outcome) = self.process_one(path);
            on_image(path, &outcome);

            if let Some(record) = record {
                report.records.push(record);
            }
            report.outcomes.push((path.to_path_buf(), outcome));
        }

        info!(
            "Processed {} images: {} parsed, {} unmatched, {} failed",
            report.outcomes.len(),
            report.parsed(),
            report.unmatched(),
            report.failed()
        );
        report
    }

    fn process_one(&self, path: &Path) -> (Option<ChargeRecord>, ImageOutcome) {
        let text = match self.engine.recognize(path, &self.psm) {
            Ok(text) => text,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                return (None, ImageOutcome::Failed(e.to_string()));
            }
        };

        let record = match &self.forced_plugin {
            Some(name) => self.parser.parse_with(name, &text).ok(),
            None => self.parser.parse_text(&text),
        };

        match record {
            Some(record) => {
                let brand = record.charger_brand.clone().unwrap_or_default();
                (Some(record), ImageOutcome::Parsed { brand })
            }
            None => {
                warn!(
                    "{}: no plugin recognised the text; add one with `evcharge scaffold`",
                    path.display()
                );
                (None, ImageOutcome::NoMatch)
            }
        }
    }
}
