use std::path::Path;
use std::time::{Duration, Instant};

use remit_core::acquire::{
    DocumentFormat, ExtractedText, ExtractionMethod, OcrGuard, TextAcquisition,
};
use remit_core::orchestrator::{InvoiceOrchestrator, ParseOutcome, RetryPolicy};
use remit_core::{RemitError, Result};

use crate::commands::{default_config, history_from_flag};

/// CLI stand-in for a document engine: treats the file bytes as UTF-8
/// text. Real OCR runs behind the same trait in the hosted service.
struct Utf8Acquisition;

impl TextAcquisition for Utf8Acquisition {
    fn extract_text(&self, bytes: &[u8], _format: DocumentFormat) -> Result<ExtractedText> {
        let start = Instant::now();
        let text = std::str::from_utf8(bytes)
            .map_err(|_| RemitError::extraction("document bytes are not valid UTF-8"))?
            .to_string();
        Ok(ExtractedText {
            text,
            method: ExtractionMethod::DirectText,
            elapsed: start.elapsed().max(Duration::from_micros(1)),
        })
    }
}

pub fn run(file: &Path, payer: &str, recent_payments: Option<u32>) -> Result<ParseOutcome> {
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let format = DocumentFormat::from_extension(extension)?;
    let bytes = std::fs::read(file)?;

    let orchestrator = InvoiceOrchestrator::new(
        default_config(),
        history_from_flag(recent_payments),
        Box::new(OcrGuard::new(Utf8Acquisition)),
        RetryPolicy::default(),
    );
    Ok(orchestrator.parse(payer, &bytes, format))
}
