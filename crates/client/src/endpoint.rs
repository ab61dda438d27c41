//! Verification endpoint URLs.
//!
//! Both endpoints live under the site root and take their inputs as
//! query parameters, with the user-entered value first and `event_id`
//! second. Values are form-urlencoded.

use podium_interchange::EventId;
use url::Url;

use crate::error::VerifyError;

pub const PIN_PATH: &str = "ajax/check_pin_code/";
pub const PROMO_PATH: &str = "ajax/check_promo_code/";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Resolved endpoint URLs for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pin: Url,
    promo: Url,
}

impl Endpoints {
    /// Resolve both endpoints against `base_url`.
    ///
    /// A path prefix on the base is kept (`https://host/app` resolves to
    /// `https://host/app/ajax/...`); any query or fragment is dropped.
    pub fn new(base_url: &str) -> Result<Self, VerifyError> {
        let endpoint_error = |message: String| VerifyError::Endpoint {
            url: base_url.to_string(),
            message,
        };

        let mut base = Url::parse(base_url).map_err(|e| endpoint_error(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(endpoint_error("URL cannot be used as a base".to_string()));
        }
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let pin = base
            .join(PIN_PATH)
            .map_err(|e| endpoint_error(e.to_string()))?;
        let promo = base
            .join(PROMO_PATH)
            .map_err(|e| endpoint_error(e.to_string()))?;

        Ok(Endpoints { pin, promo })
    }

    /// `GET <base>/ajax/check_pin_code/?pin=<pin>&event_id=<id>`
    pub fn pin_url(&self, event_id: EventId, pin: &str) -> Url {
        let mut url = self.pin.clone();
        url.query_pairs_mut()
            .append_pair("pin", pin)
            .append_pair("event_id", &event_id.to_string());
        url
    }

    /// `GET <base>/ajax/check_promo_code/?promocode=<code>&event_id=<id>`
    pub fn promo_url(&self, event_id: EventId, code: &str) -> Url {
        let mut url = self.promo.clone();
        url.query_pairs_mut()
            .append_pair("promocode", code)
            .append_pair("event_id", &event_id.to_string());
        url
    }

    /// Path of the PIN endpoint, including any base prefix.
    pub fn pin_path(&self) -> &str {
        self.pin.path()
    }

    /// Path of the promo endpoint, including any base prefix.
    pub fn promo_path(&self) -> &str {
        self.promo.path()
    }
}
