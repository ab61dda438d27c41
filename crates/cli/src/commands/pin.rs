use std::path::Path;

use podium_client::{MemoryDocument, PinOutcome, PinVerifier};
use podium_interchange::EventId;
use tracing::info;

use super::Context;

pub(crate) fn cmd_check_pin(ctx: &Context, event: u64, pin: &str, response: Option<&Path>) {
    let endpoints = ctx.endpoints();
    let client = ctx.http_client(endpoints.pin_path(), response);
    let verifier = PinVerifier::new(endpoints, ctx.config.messages.clone());
    let mut page = MemoryDocument::new();

    info!(event, offline = response.is_some(), "checking pin");
    let result = ctx
        .runtime()
        .block_on(verifier.check(&*client, EventId(event), pin, &mut page));

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => ctx.fail(&format!("error: {}", e)),
    };

    let summary = match &outcome {
        PinOutcome::Skipped => {
            "skipped: PIN must be exactly 4 characters, nothing was sent".to_string()
        }
        PinOutcome::Found { participant } => format!("found: {}", participant),
        PinOutcome::Rejected { reason } => format!("rejected: {}", reason),
        PinOutcome::Superseded => "superseded".to_string(),
    };

    ctx.print_report(&summary, &outcome, &page);
}
