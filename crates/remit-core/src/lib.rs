//! remit-core turns unstructured payment requests (chat text, voice
//! transcripts, invoice documents) into validated, risk-scored
//! [`PaymentIntent`](types::PaymentIntent) records.

pub mod acquire;
pub mod builder;
pub mod classifier;
pub mod error;
pub mod extract;
pub mod invoice;
pub mod orchestrator;
pub mod risk;
pub mod split;
pub mod tables;
pub mod types;
pub mod validate;

pub use error::{AmountError, RemitError, Result};
