use std::io::IsTerminal;

use colored::Colorize;
use comfy_table::{presets::ASCII_BORDERS_ONLY, ContentArrangement, Table};
use remit_core::orchestrator::ParseOutcome;
use remit_core::types::PaymentIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Human rendering: colored header, recipient table, risk summary.
    Operator,
    /// Machine rendering: the envelope JSON, nothing else.
    Agent,
}

pub struct OutputOptions {
    pub mode: RunMode,
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputOptions {
    /// Agent mode when JSON output is forced or stdout is piped,
    /// operator mode on an interactive terminal.
    pub fn detect(force_json: bool, quiet: bool, no_color: bool) -> Self {
        let mode = if force_json || !std::io::stdout().is_terminal() {
            RunMode::Agent
        } else {
            RunMode::Operator
        };
        Self {
            mode,
            quiet,
            no_color,
        }
    }

    fn paint(&self, text: &str, color: fn(&str) -> colored::ColoredString) -> String {
        if self.no_color {
            text.to_string()
        } else {
            color(text).to_string()
        }
    }
}

/// Renders a parse outcome in the selected mode. Agent mode emits the
/// envelope JSON verbatim so downstream tooling sees the stable shape.
pub fn render(outcome: &ParseOutcome, options: &OutputOptions) -> serde_json::Result<()> {
    match options.mode {
        RunMode::Agent => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        RunMode::Operator => render_operator(outcome, options),
    }
    Ok(())
}

fn render_operator(outcome: &ParseOutcome, options: &OutputOptions) {
    if let Some(intent) = &outcome.data {
        let header = format!(
            "payment intent {} ({}, confidence {:.2})",
            intent.id, intent.source, intent.confidence
        );
        println!("{}", options.paint(&header, |t| t.green()));

        if !options.quiet {
            print_intent_table(intent);
            println!("  purpose: {}", intent.purpose);
            // Validated intents always carry a representable total.
            if let Ok(total) = intent.total() {
                println!("  total:   {} {}", total, intent.currency);
            }
        }

        let requires_review = outcome.metadata["requires_review"]
            .as_bool()
            .unwrap_or(false);
        let score = outcome.metadata["risk_score"].as_u64().unwrap_or(0);
        if requires_review {
            let line = format!("risk score {score}: manual review required");
            println!("{}", options.paint(&line, |t| t.yellow()));
        } else if !options.quiet {
            println!("risk score {score}: approved");
        }

        if let Some(warnings) = outcome.metadata["warnings"].as_array() {
            for warning in warnings {
                if let Some(text) = warning.as_str() {
                    println!("  {}", options.paint(text, |t| t.yellow()));
                }
            }
        }
    } else {
        let message = outcome.error.as_deref().unwrap_or("unknown failure");
        println!("{}", options.paint(message, |t| t.red()));
    }
}

fn print_intent_table(intent: &PaymentIntent) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["recipient", "amount", "share"]);

    for (recipient, amount) in intent.recipients.iter().zip(intent.amounts.iter()) {
        let share = recipient
            .share
            .map(|s| format!("{s:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            recipient.name.clone(),
            amount.to_units_string(),
            share,
        ]);
    }

    println!("{table}");
}
