use remit_core::orchestrator::{ChatOrchestrator, ParseOutcome};

use crate::commands::{default_config, history_from_flag};

pub fn run(payer: &str, text: &str, recent_payments: Option<u32>) -> ParseOutcome {
    let orchestrator = ChatOrchestrator::new(default_config(), history_from_flag(recent_payments));
    orchestrator.parse(payer, text)
}
