use std::path::Path;

use podium_client::ui::ids;
use podium_client::{MemoryDocument, PromoOutcome, PromoVerifier};
use podium_interchange::EventId;
use rust_decimal::Decimal;
use tracing::info;

use super::Context;

pub(crate) struct PromoArgs<'a> {
    pub event: u64,
    pub code: &'a str,
    pub default_price: Decimal,
    pub default_label: Option<&'a str>,
    pub response: Option<&'a Path>,
}

pub(crate) fn cmd_check_promo(ctx: &Context, args: PromoArgs<'_>) {
    let endpoints = ctx.endpoints();
    let client = ctx.http_client(endpoints.promo_path(), args.response);
    let verifier = PromoVerifier::new(endpoints, ctx.config.messages.clone());

    // Seed the page with what the payment form would hold.
    let mut page = MemoryDocument::new()
        .with_value(ids::PROMOCODE, args.code)
        .with_value(ids::AMOUNT_SEND, args.default_price.to_string());
    if let Some(label) = args.default_label {
        page = page
            .with_value(ids::DEFAULT_LABEL, label)
            .with_value(ids::LABEL_SEND, label);
    }

    info!(event = args.event, offline = args.response.is_some(), "checking promo code");
    let result = ctx.runtime().block_on(verifier.check(
        &*client,
        EventId(args.event),
        args.default_price,
        &mut page,
    ));

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => ctx.fail(&format!("error: {}", e)),
    };

    let summary = match &outcome {
        PromoOutcome::Applied {
            price,
            promocode_id: Some(id),
        } => format!("applied: price {} (promo code #{})", price, id),
        PromoOutcome::Applied {
            price,
            promocode_id: None,
        } => format!("applied: price {}", price),
        PromoOutcome::Rejected { default_price } => {
            format!("rejected: price stays {}", default_price)
        }
        PromoOutcome::Superseded => "superseded".to_string(),
    };

    ctx.print_report(&summary, &outcome, &page);
}
