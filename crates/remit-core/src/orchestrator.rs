//! Per-modality orchestration. Each orchestrator wires the pipeline
//! stages for one input kind and returns the uniform result envelope;
//! no error ever propagates past this boundary.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::acquire::{DocumentFormat, TextAcquisition, VoiceTranscription};
use crate::builder;
use crate::classifier;
use crate::error::{RemitError, Result};
use crate::risk::{PaymentHistory, RiskConfig, RiskEngine};
use crate::types::{IntentKind, PaymentIntent, RiskAssessment, Source};
use crate::validate;
use crate::{acquire, invoice};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Classified intents below this confidence are treated as not
    /// detected at all.
    pub min_intent_confidence: f64,
    pub risk: RiskConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_intent_confidence: 0.6,
            risk: RiskConfig::default(),
        }
    }
}

/// Bounded exponential backoff around the external acquisition call.
/// Only transient extraction failures are retried; deterministic parse
/// failures never are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    fn run<T>(&self, mut attempt_fn: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            match attempt_fn() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = self.base_delay * 2_u32.pow(attempt);
                    tracing::warn!(error = %err, attempt, delay_ms = delay.as_millis() as u64,
                        "transient acquisition failure, retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// The stable output contract shared by all orchestrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub data: Option<PaymentIntent>,
    pub error: Option<String>,
    pub metadata: serde_json::Value,
}

impl ParseOutcome {
    fn ok(intent: PaymentIntent, assessment: &RiskAssessment, source: Source, elapsed: Duration) -> Self {
        Self {
            success: true,
            data: Some(intent),
            error: None,
            metadata: json!({
                "source": source.to_string(),
                "elapsed_ms": elapsed.as_millis() as u64,
                "risk_score": assessment.score,
                "requires_review": assessment.requires_review,
                "approved": assessment.approved,
                "warnings": assessment.warnings,
            }),
        }
    }

    fn fail(err: &RemitError, source: Source, elapsed: Duration) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            metadata: json!({
                "source": source.to_string(),
                "elapsed_ms": elapsed.as_millis() as u64,
            }),
        }
    }
}

/// Classify → extract → build → validate → score, shared by the chat
/// and voice paths.
fn run_text_stages(
    config: &PipelineConfig,
    history: &dyn PaymentHistory,
    payer: &str,
    text: &str,
    source: Source,
) -> Result<(PaymentIntent, RiskAssessment)> {
    let matched = classifier::classify(text);
    if matched.kind == IntentKind::Unknown {
        return Err(RemitError::IntentNotDetected(
            "text matched no intent pattern".into(),
        ));
    }
    if matched.confidence < config.min_intent_confidence {
        return Err(RemitError::IntentNotDetected(format!(
            "confidence {:.2} below floor {:.2}",
            matched.confidence, config.min_intent_confidence
        )));
    }

    let intent = builder::build_from_text(payer, &matched, text, source)?;
    validate::validate_intent(&intent)?;
    let assessment = RiskEngine::new(config.risk.clone()).assess(&intent, history);
    Ok((intent, assessment))
}

fn risk_stages(
    config: &PipelineConfig,
    history: &dyn PaymentHistory,
    intent: PaymentIntent,
) -> Result<(PaymentIntent, RiskAssessment)> {
    validate::validate_intent(&intent)?;
    let assessment = RiskEngine::new(config.risk.clone()).assess(&intent, history);
    Ok((intent, assessment))
}

pub struct ChatOrchestrator {
    config: PipelineConfig,
    history: Box<dyn PaymentHistory>,
}

impl ChatOrchestrator {
    pub fn new(config: PipelineConfig, history: Box<dyn PaymentHistory>) -> Self {
        Self { config, history }
    }

    pub fn parse(&self, payer: &str, text: &str) -> ParseOutcome {
        let span = tracing::info_span!("parse_chat", payer);
        let _guard = span.enter();
        let start = Instant::now();

        match run_text_stages(&self.config, self.history.as_ref(), payer, text, Source::Chat) {
            Ok((intent, assessment)) => {
                ParseOutcome::ok(intent, &assessment, Source::Chat, start.elapsed())
            }
            Err(err) => {
                tracing::info!(error = %err, "chat parse failed");
                ParseOutcome::fail(&err, Source::Chat, start.elapsed())
            }
        }
    }
}

pub struct InvoiceOrchestrator {
    config: PipelineConfig,
    history: Box<dyn PaymentHistory>,
    acquisition: Box<dyn TextAcquisition>,
    retry: RetryPolicy,
}

impl InvoiceOrchestrator {
    pub fn new(
        config: PipelineConfig,
        history: Box<dyn PaymentHistory>,
        acquisition: Box<dyn TextAcquisition>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            config,
            history,
            acquisition,
            retry,
        }
    }

    pub fn parse(&self, payer: &str, bytes: &[u8], format: DocumentFormat) -> ParseOutcome {
        let span = tracing::info_span!("parse_invoice", payer, format = ?format);
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.run(payer, bytes, format);
        match result {
            Ok((intent, assessment)) => {
                ParseOutcome::ok(intent, &assessment, Source::Invoice, start.elapsed())
            }
            Err(err) => {
                tracing::info!(error = %err, "invoice parse failed");
                ParseOutcome::fail(&err, Source::Invoice, start.elapsed())
            }
        }
    }

    fn run(
        &self,
        payer: &str,
        bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<(PaymentIntent, RiskAssessment)> {
        let extracted = self
            .retry
            .run(|| self.acquisition.extract_text(bytes, format))?;
        let analysis = invoice::analyze(&extracted.text);
        let intent = builder::build_from_invoice(payer, &analysis, extracted.method.as_str())?;
        risk_stages(&self.config, self.history.as_ref(), intent)
    }
}

pub struct VoiceOrchestrator {
    config: PipelineConfig,
    history: Box<dyn PaymentHistory>,
    transcription: Box<dyn VoiceTranscription>,
}

impl VoiceOrchestrator {
    pub fn new(
        config: PipelineConfig,
        history: Box<dyn PaymentHistory>,
        transcription: Box<dyn VoiceTranscription>,
    ) -> Self {
        Self {
            config,
            history,
            transcription,
        }
    }

    pub fn parse(&self, payer: &str, audio: &[u8], content_type: &str) -> ParseOutcome {
        let span = tracing::info_span!("parse_voice", payer, content_type);
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.run(payer, audio, content_type);
        match result {
            Ok((intent, assessment)) => {
                ParseOutcome::ok(intent, &assessment, Source::Voice, start.elapsed())
            }
            Err(err) => {
                tracing::info!(error = %err, "voice parse failed");
                ParseOutcome::fail(&err, Source::Voice, start.elapsed())
            }
        }
    }

    fn run(
        &self,
        payer: &str,
        audio: &[u8],
        content_type: &str,
    ) -> Result<(PaymentIntent, RiskAssessment)> {
        acquire::validate_audio(audio, content_type)?;
        let text = self.transcription.transcribe(audio, content_type)?;
        run_text_stages(&self.config, self.history.as_ref(), payer, &text, Source::Voice)
    }
}
