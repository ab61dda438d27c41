use podium_client::ui::ids;
use podium_client::{
    Endpoints, HttpResponse, Messages, PinRequest, PinVerifier, PromoRequest, PromoVerifier,
    RequestSequence, UiPatch, UiPort,
};
use podium_interchange::EventId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

/// `create_session` input.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Site root, normally `window.location.origin`.
    pub base_url: String,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Debug, Deserialize)]
pub struct PinInput {
    pub event_id: EventId,
    pub pin: String,
}

/// What the shim read from the payment form.
#[derive(Debug, Deserialize)]
pub struct PromoInput {
    pub event_id: EventId,
    pub default_price: Decimal,
    /// Value of `id_promocode`; absent when the page has no such input.
    pub promocode: Option<String>,
    /// Value of `id_default_label`; absent when the page has no such input.
    pub default_label: Option<String>,
}

/// Outcome of the fetch the shim performed for `token`: either
/// `status` + `body`, or `error` when no response arrived at all.
#[derive(Debug, Deserialize)]
pub struct ResponseInput {
    pub token: u64,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub error: Option<String>,
}

impl ResponseInput {
    fn into_response(self) -> Result<HttpResponse, String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.status {
            Some(status) => Ok(HttpResponse::new(status, self.body.unwrap_or_default())),
            None => Err("response has neither 'status' nor 'error'".to_string()),
        }
    }
}

/// Verifiers for one page, plus the request each is waiting on.
pub struct Session {
    pin: PinVerifier,
    promo: PromoVerifier,
    pin_pending: Option<PinRequest>,
    promo_pending: Option<PromoRequest>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, String> {
        let endpoints = Endpoints::new(&config.base_url).map_err(|e| e.to_string())?;
        Ok(Session {
            pin: PinVerifier::new(endpoints.clone(), config.messages.clone()),
            promo: PromoVerifier::new(endpoints, config.messages),
            pin_pending: None,
            promo_pending: None,
        })
    }

    /// `{"token", "url", "patch"}`; `url` is null when the PIN is not sent.
    pub fn pin_request(&mut self, input: PinInput) -> Value {
        let mut patch = UiPatch::new();
        self.pin_pending = self.pin.begin(input.event_id, &input.pin, &mut patch);

        match &self.pin_pending {
            Some(request) => json!({
                "token": request.token,
                "url": request.url.as_str(),
                "patch": patch.ops(),
            }),
            None => json!({
                "token": self.pin.sequence().latest(),
                "url": null,
                "patch": patch.ops(),
            }),
        }
    }

    pub fn pin_response(&mut self, input: ResponseInput) -> Value {
        let request = match self.pin_pending.take() {
            Some(request) if request.token.get() == input.token => request,
            other => {
                self.pin_pending = other;
                return unmatched(self.pin.sequence(), input.token);
            }
        };

        let mut patch = UiPatch::new();
        let response = match input.into_response() {
            Ok(response) => response,
            Err(e) => return error_with_patch(&format!("request failed: {}", e), &patch),
        };

        match self.pin.complete(&request, &response, &mut patch) {
            Ok(outcome) => json!({ "outcome": outcome, "patch": patch.ops() }),
            Err(e) => error_with_patch(&e.to_string(), &patch),
        }
    }

    /// `{"token", "url", "patch"}`; the patch shows the spinner.
    pub fn promo_request(&mut self, input: PromoInput) -> Value {
        let mut page = UiPatch::new();
        if let Some(code) = input.promocode {
            page = page.with_value(ids::PROMOCODE, code);
        }
        if let Some(label) = input.default_label {
            page = page.with_value(ids::DEFAULT_LABEL, label);
        }

        let request = self
            .promo
            .begin(input.event_id, input.default_price, &mut page);
        let value = json!({
            "token": request.token,
            "url": request.url.as_str(),
            "patch": page.ops(),
        });
        self.promo_pending = Some(request);
        value
    }

    pub fn promo_response(&mut self, input: ResponseInput) -> Value {
        let request = match self.promo_pending.take() {
            Some(request) if request.token.get() == input.token => request,
            other => {
                self.promo_pending = other;
                return unmatched(self.promo.sequence(), input.token);
            }
        };

        let mut patch = UiPatch::new();
        let response = match input.into_response() {
            Ok(response) => response,
            Err(e) => {
                self.promo.abort(&request, &mut patch);
                return error_with_patch(&format!("request failed: {}", e), &patch);
            }
        };

        match self.promo.complete(&request, &response, &mut patch) {
            Ok(outcome) => json!({ "outcome": outcome, "patch": patch.ops() }),
            Err(e) => error_with_patch(&e.to_string(), &patch),
        }
    }
}

/// A response for a token that is no longer pending: superseded when an
/// older token, an error otherwise.
fn unmatched(sequence: &RequestSequence, token: u64) -> Value {
    let latest = sequence.latest().map(|t| t.get()).unwrap_or(0);
    if token != 0 && token < latest {
        json!({ "outcome": { "outcome": "superseded" }, "patch": [] })
    } else {
        json!({ "error": format!("unknown request token: {}", token) })
    }
}

fn error_with_patch(msg: &str, patch: &UiPatch) -> Value {
    json!({ "error": msg, "patch": patch.ops() })
}

/// Run `f` on a fresh patch and return its ops.
pub fn patch_with(f: impl FnOnce(&mut dyn UiPort)) -> Value {
    let mut patch = UiPatch::new();
    f(&mut patch);
    json!(patch.ops())
}
