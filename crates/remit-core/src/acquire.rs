//! External text-acquisition collaborators: document OCR and voice
//! transcription. This crate only defines the seams and the guards
//! around them; real engines live outside.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RemitError, Result};

pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_AUDIO_TYPES: [&str; 3] = ["audio/mpeg", "audio/wav", "audio/mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Jpg,
    Png,
    Tiff,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "tiff" | "tif" => Ok(Self::Tiff),
            other => Err(RemitError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    DirectText,
    Ocr,
}

impl ExtractionMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DirectText => "direct_text",
            Self::Ocr => "ocr",
        }
    }
}

/// Text pulled out of a document, with how and how long.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub elapsed: Duration,
}

/// Obtains raw text from document bytes.
///
/// Implementations must fall back to OCR over rendered pages when direct
/// text extraction fails or yields nothing, before surfacing an
/// extraction error. [`FallbackAcquisition`] composes that contract from
/// two single-method engines.
pub trait TextAcquisition: Send + Sync {
    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<ExtractedText>;
}

/// Serializes access to a non-reentrant engine. The underlying engine
/// keeps internal state across calls, so concurrent extraction against
/// one handle must not interleave.
pub struct OcrGuard<E> {
    engine: Mutex<E>,
}

impl<E> OcrGuard<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }
}

impl<E> TextAcquisition for OcrGuard<E>
where
    E: TextAcquisition,
{
    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<ExtractedText> {
        let engine = self
            .engine
            .lock()
            .map_err(|_| RemitError::extraction("ocr engine mutex poisoned"))?;
        engine.extract_text(bytes, format)
    }
}

/// Tries direct text extraction first and falls back to the OCR engine
/// when the direct pass errors or returns empty text.
pub struct FallbackAcquisition<D, O> {
    direct: D,
    ocr: O,
}

impl<D, O> FallbackAcquisition<D, O> {
    pub fn new(direct: D, ocr: O) -> Self {
        Self { direct, ocr }
    }
}

impl<D, O> TextAcquisition for FallbackAcquisition<D, O>
where
    D: TextAcquisition,
    O: TextAcquisition,
{
    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<ExtractedText> {
        match self.direct.extract_text(bytes, format) {
            Ok(extracted) if !extracted.text.trim().is_empty() => Ok(extracted),
            Ok(_) => {
                tracing::debug!("direct extraction empty, falling back to ocr");
                self.ocr.extract_text(bytes, format)
            }
            Err(err) => {
                tracing::debug!(error = %err, "direct extraction failed, falling back to ocr");
                self.ocr.extract_text(bytes, format)
            }
        }
    }
}

/// Turns audio bytes into text. Callers must run [`validate_audio`]
/// before invoking an implementation.
pub trait VoiceTranscription: Send + Sync {
    fn transcribe(&self, bytes: &[u8], content_type: &str) -> Result<String>;
}

/// Enforces the audio allow-list and size cap ahead of any
/// transcription attempt.
pub fn validate_audio(bytes: &[u8], content_type: &str) -> Result<()> {
    let normalized = content_type.trim().to_ascii_lowercase();
    if !ALLOWED_AUDIO_TYPES.contains(&normalized.as_str()) {
        return Err(RemitError::Transcription(format!(
            "content type '{content_type}' is not allowed"
        )));
    }
    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(RemitError::Transcription(format!(
            "audio payload of {} bytes exceeds {MAX_AUDIO_BYTES} byte limit",
            bytes.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct StaticText(&'static str, ExtractionMethod);

    impl TextAcquisition for StaticText {
        fn extract_text(&self, _bytes: &[u8], _format: DocumentFormat) -> Result<ExtractedText> {
            Ok(ExtractedText {
                text: self.0.to_string(),
                method: self.1,
                elapsed: Duration::from_millis(1),
            })
        }
    }

    struct Failing;

    impl TextAcquisition for Failing {
        fn extract_text(&self, _bytes: &[u8], _format: DocumentFormat) -> Result<ExtractedText> {
            Err(RemitError::extraction("no text layer"))
        }
    }

    #[test]
    fn format_from_extension_accepts_known_types() {
        assert_eq!(DocumentFormat::from_extension("PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension("jpeg").unwrap(), DocumentFormat::Jpg);
        assert!(matches!(
            DocumentFormat::from_extension("docx"),
            Err(RemitError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn fallback_prefers_direct_text() {
        let acquisition = FallbackAcquisition::new(
            StaticText("Total: $10.00", ExtractionMethod::DirectText),
            StaticText("ocr text", ExtractionMethod::Ocr),
        );
        let extracted = acquisition.extract_text(b"...", DocumentFormat::Pdf).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::DirectText);
    }

    #[test]
    fn fallback_uses_ocr_on_failure_or_empty_text() {
        let on_failure = FallbackAcquisition::new(
            Failing,
            StaticText("ocr text", ExtractionMethod::Ocr),
        );
        let extracted = on_failure.extract_text(b"...", DocumentFormat::Pdf).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Ocr);

        let on_empty = FallbackAcquisition::new(
            StaticText("   ", ExtractionMethod::DirectText),
            StaticText("ocr text", ExtractionMethod::Ocr),
        );
        let extracted = on_empty.extract_text(b"...", DocumentFormat::Jpg).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Ocr);
    }

    #[test]
    fn ocr_guard_serializes_concurrent_callers() {
        struct Counting(AtomicUsize, AtomicUsize);

        impl TextAcquisition for Counting {
            fn extract_text(&self, _bytes: &[u8], _format: DocumentFormat) -> Result<ExtractedText> {
                let in_flight = self.0.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(in_flight, 1, "engine entered concurrently");
                std::thread::sleep(Duration::from_millis(2));
                self.0.fetch_sub(1, Ordering::SeqCst);
                self.1.fetch_add(1, Ordering::SeqCst);
                Ok(ExtractedText {
                    text: "text".to_string(),
                    method: ExtractionMethod::Ocr,
                    elapsed: Duration::from_millis(2),
                })
            }
        }

        let guard = Arc::new(OcrGuard::new(Counting(
            AtomicUsize::new(0),
            AtomicUsize::new(0),
        )));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || {
                    guard.extract_text(b"page", DocumentFormat::Tiff).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let completed = guard.engine.lock().unwrap().1.load(Ordering::SeqCst);
        assert_eq!(completed, 4);
    }

    #[test]
    fn audio_validation_enforces_allow_list_and_size() {
        assert!(validate_audio(b"abc", "audio/mpeg").is_ok());
        assert!(validate_audio(b"abc", "AUDIO/WAV").is_ok());
        assert!(matches!(
            validate_audio(b"abc", "audio/ogg"),
            Err(RemitError::Transcription(_))
        ));

        let oversized = vec![0_u8; MAX_AUDIO_BYTES + 1];
        assert!(matches!(
            validate_audio(&oversized, "audio/wav"),
            Err(RemitError::Transcription(_))
        ));
    }
}
