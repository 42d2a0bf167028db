use std::path::Path;

use remit_core::acquire::VoiceTranscription;
use remit_core::orchestrator::{ParseOutcome, VoiceOrchestrator};
use remit_core::{RemitError, Result};

use crate::commands::{default_config, history_from_flag};

/// CLI stand-in for a speech engine: replays a transcript supplied on
/// the command line. Audio validation still runs against the real bytes.
struct ReplayTranscription {
    transcript: Option<String>,
}

impl VoiceTranscription for ReplayTranscription {
    fn transcribe(&self, _bytes: &[u8], _content_type: &str) -> Result<String> {
        self.transcript.clone().ok_or_else(|| {
            RemitError::Transcription("no transcription engine configured; pass --transcript".into())
        })
    }
}

pub fn run(
    file: &Path,
    payer: &str,
    content_type: &str,
    transcript: Option<String>,
    recent_payments: Option<u32>,
) -> Result<ParseOutcome> {
    let audio = std::fs::read(file)?;
    let orchestrator = VoiceOrchestrator::new(
        default_config(),
        history_from_flag(recent_payments),
        Box::new(ReplayTranscription { transcript }),
    );
    Ok(orchestrator.parse(payer, &audio, content_type))
}
