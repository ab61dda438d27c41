//! Promo code verification.
//!
//! On the payment page the participant may enter a promo code. The
//! verifier looks it up and either applies the discounted price (and
//! tags the payment label with the code's id) or reverts to the event's
//! default price. The spinner is visible from invocation until the
//! response, whatever it turns out to be.

use podium_interchange::{promo_from_json_str, EventId, PromoResponse};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Messages;
use crate::endpoint::Endpoints;
use crate::error::VerifyError;
use crate::http::{HttpClient, HttpResponse};
use crate::sequence::{RequestSequence, RequestToken};
use crate::ui::{ids, UiPort};

pub const VALID_CLASS: &str = "is-valid";
pub const INVALID_CLASS: &str = "is-invalid";

/// An issued promo lookup awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoRequest {
    pub token: RequestToken,
    pub event_id: EventId,
    pub code: String,
    pub default_price: Decimal,
    /// Value of `id_default_label` at invocation time, when the page has one.
    pub default_label: Option<String>,
    pub url: Url,
}

/// What a promo check did to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromoOutcome {
    Applied {
        price: Decimal,
        promocode_id: Option<u64>,
    },
    Rejected {
        default_price: Decimal,
    },
    /// A newer check was started before this response arrived; ignored.
    Superseded,
}

pub struct PromoVerifier {
    endpoints: Endpoints,
    messages: Messages,
    sequence: RequestSequence,
}

impl PromoVerifier {
    pub fn new(endpoints: Endpoints, messages: Messages) -> Self {
        PromoVerifier {
            endpoints,
            messages,
            sequence: RequestSequence::new(),
        }
    }

    pub fn sequence(&self) -> &RequestSequence {
        &self.sequence
    }

    /// Start a check: read the code and default label, show the spinner
    /// and build the request. There is no length gate; an empty code is
    /// sent too.
    pub fn begin(
        &self,
        event_id: EventId,
        default_price: Decimal,
        ui: &mut dyn UiPort,
    ) -> PromoRequest {
        let token = self.sequence.issue();
        let code = ui.value(ids::PROMOCODE).unwrap_or_default();
        let default_label = ui.value(ids::DEFAULT_LABEL);

        ui.set_visible(ids::SPINNER, true);

        let url = self.endpoints.promo_url(event_id, &code);
        debug!(%event_id, token = token.get(), %url, "promo check issued");

        PromoRequest {
            token,
            event_id,
            code,
            default_price,
            default_label,
            url,
        }
    }

    /// Apply the response to an issued request.
    ///
    /// The spinner is hidden for every current response. Error statuses
    /// and malformed bodies leave the code, price and label untouched.
    pub fn complete(
        &self,
        request: &PromoRequest,
        response: &HttpResponse,
        ui: &mut dyn UiPort,
    ) -> Result<PromoOutcome, VerifyError> {
        if !self.sequence.is_current(request.token) {
            debug!(token = request.token.get(), "stale promo response dropped");
            return Ok(PromoOutcome::Superseded);
        }

        ui.set_visible(ids::SPINNER, false);

        if !response.is_success() {
            warn!(status = response.status, url = %request.url, "promo check failed");
            return Err(VerifyError::Status {
                status: response.status,
                url: request.url.to_string(),
            });
        }

        let decoded = promo_from_json_str(&response.body).map_err(|source| {
            warn!(url = %request.url, error = %source, "malformed promo response");
            VerifyError::Decode {
                url: request.url.to_string(),
                source,
            }
        })?;

        Ok(apply_promo(&decoded, request, &self.messages, ui))
    }

    /// Hide the spinner for a request that will never get a response.
    /// No-op when a newer check owns the spinner.
    pub fn abort(&self, request: &PromoRequest, ui: &mut dyn UiPort) {
        if self.sequence.is_current(request.token) {
            ui.set_visible(ids::SPINNER, false);
        }
    }

    /// Run a full check through `client`.
    pub async fn check<C>(
        &self,
        client: &C,
        event_id: EventId,
        default_price: Decimal,
        ui: &mut dyn UiPort,
    ) -> Result<PromoOutcome, VerifyError>
    where
        C: HttpClient + ?Sized,
    {
        let request = self.begin(event_id, default_price, ui);

        let response = match client.get(request.url.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %request.url, error = %e, "promo check transport failure");
                self.abort(&request, ui);
                return Err(e.into());
            }
        };

        self.complete(&request, &response, ui)
    }
}

/// `<default label><separator><promo id>`, or the plain default label
/// when the server did not send an id.
pub fn compose_label(default_label: &str, separator: &str, promocode_id: Option<u64>) -> String {
    match promocode_id {
        Some(id) => format!("{}{}{}", default_label, separator, id),
        None => default_label.to_string(),
    }
}

/// Rewrite the price fields for a decoded promo response.
pub fn apply_promo(
    response: &PromoResponse,
    request: &PromoRequest,
    messages: &Messages,
    ui: &mut dyn UiPort,
) -> PromoOutcome {
    match response {
        PromoResponse::Applied {
            price,
            promocode_id,
        } => {
            ui.remove_class(ids::PROMOCODE, INVALID_CLASS);
            ui.add_class(ids::PROMOCODE, VALID_CLASS);
            set_price(ui, &price.to_string());

            if let Some(default_label) = &request.default_label {
                let label =
                    compose_label(default_label, &messages.label_separator, *promocode_id);
                ui.set_value(ids::LABEL_SEND, &label);
            }

            debug!(code = %request.code, %price, "promo code applied");
            PromoOutcome::Applied {
                price: *price,
                promocode_id: *promocode_id,
            }
        }
        PromoResponse::Rejected => {
            ui.remove_class(ids::PROMOCODE, VALID_CLASS);
            ui.add_class(ids::PROMOCODE, INVALID_CLASS);
            set_price(ui, &request.default_price.to_string());

            if let Some(default_label) = &request.default_label {
                ui.set_value(ids::LABEL_SEND, default_label);
            }

            debug!(code = %request.code, "promo code rejected");
            PromoOutcome::Rejected {
                default_price: request.default_price,
            }
        }
    }
}

fn set_price(ui: &mut dyn UiPort, price: &str) {
    ui.set_text(ids::AMOUNT, price);
    ui.set_value(ids::AMOUNT_SEND, price);
}
