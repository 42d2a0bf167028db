pub mod invoice;
pub mod parse;
pub mod voice;

use remit_core::orchestrator::PipelineConfig;
use remit_core::risk::{NoHistory, PaymentHistory};

/// History collaborator for the CLI: a fixed recent-payment count when
/// the operator supplies one, otherwise no history at all.
pub(crate) struct FixedHistory(pub u32);

impl PaymentHistory for FixedHistory {
    fn recent_payment_count(&self, _payer: &str) -> u32 {
        self.0
    }
}

pub(crate) fn history_from_flag(recent_payments: Option<u32>) -> Box<dyn PaymentHistory> {
    match recent_payments {
        Some(count) => Box::new(FixedHistory(count)),
        None => Box::new(NoHistory),
    }
}

pub(crate) fn default_config() -> PipelineConfig {
    PipelineConfig::default()
}
