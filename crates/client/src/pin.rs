//! PIN verification.
//!
//! A participant types a 4-character PIN on the result-entry page. The
//! verifier looks it up and either reveals the entry form pre-filled with
//! the participant's previously entered accents, or shows the server's
//! reason for refusing.
//!
//! The cycle is split so it can run with or without an [`HttpClient`]:
//! 1. [`PinVerifier::begin`]: reset the panels, gate on length, build the URL
//! 2. the caller (or [`PinVerifier::check`]) performs the GET
//! 3. [`PinVerifier::complete`]: drop stale responses, decode, apply

use podium_interchange::{
    verification_from_json_str, AccentSheet, EventId, VerificationRequest, VerificationResponse,
};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Messages;
use crate::endpoint::Endpoints;
use crate::error::VerifyError;
use crate::http::{HttpClient, HttpResponse};
use crate::sequence::{RequestSequence, RequestToken};
use crate::ui::{ids, UiPort};

/// PINs of any other length never leave the page.
pub const PIN_LENGTH: usize = 4;

/// An issued PIN lookup awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRequest {
    pub token: RequestToken,
    pub request: VerificationRequest,
    pub url: Url,
}

/// What a PIN check did to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PinOutcome {
    /// Wrong length; no request was sent.
    Skipped,
    /// Participant found; the entry form is shown and pre-filled.
    Found { participant: String },
    /// Lookup refused; the error panel shows `reason`.
    Rejected { reason: String },
    /// A newer check was started before this response arrived; ignored.
    Superseded,
}

pub struct PinVerifier {
    endpoints: Endpoints,
    messages: Messages,
    sequence: RequestSequence,
}

impl PinVerifier {
    pub fn new(endpoints: Endpoints, messages: Messages) -> Self {
        PinVerifier {
            endpoints,
            messages,
            sequence: RequestSequence::new(),
        }
    }

    pub fn sequence(&self) -> &RequestSequence {
        &self.sequence
    }

    /// Start a check: hide both alert panels and, when the PIN has exactly
    /// [`PIN_LENGTH`] characters, return the request to send.
    ///
    /// Every call supersedes earlier in-flight checks, including calls
    /// that send nothing.
    pub fn begin(&self, event_id: EventId, pin: &str, ui: &mut dyn UiPort) -> Option<PinRequest> {
        let token = self.sequence.issue();

        ui.set_visible(ids::ALERT_OK, false);
        ui.set_visible(ids::ALERT_ERROR, false);

        if pin.chars().count() != PIN_LENGTH {
            debug!(%event_id, pin_len = pin.chars().count(), "pin length gate: no request");
            return None;
        }

        let url = self.endpoints.pin_url(event_id, pin);
        debug!(%event_id, token = token.get(), %url, "pin check issued");

        Some(PinRequest {
            token,
            request: VerificationRequest {
                event_id,
                pin: pin.to_string(),
            },
            url,
        })
    }

    /// Apply the response to an issued request.
    ///
    /// Stale responses, error statuses and malformed bodies leave the page
    /// untouched.
    pub fn complete(
        &self,
        request: &PinRequest,
        response: &HttpResponse,
        ui: &mut dyn UiPort,
    ) -> Result<PinOutcome, VerifyError> {
        if !self.sequence.is_current(request.token) {
            debug!(token = request.token.get(), "stale pin response dropped");
            return Ok(PinOutcome::Superseded);
        }

        if !response.is_success() {
            warn!(status = response.status, url = %request.url, "pin check failed");
            return Err(VerifyError::Status {
                status: response.status,
                url: request.url.to_string(),
            });
        }

        let decoded = verification_from_json_str(&response.body).map_err(|source| {
            warn!(url = %request.url, error = %source, "malformed pin response");
            VerifyError::Decode {
                url: request.url.to_string(),
                source,
            }
        })?;

        Ok(apply_verification(&decoded, &self.messages, ui))
    }

    /// Run a full check through `client`.
    pub async fn check<C>(
        &self,
        client: &C,
        event_id: EventId,
        pin: &str,
        ui: &mut dyn UiPort,
    ) -> Result<PinOutcome, VerifyError>
    where
        C: HttpClient + ?Sized,
    {
        let Some(request) = self.begin(event_id, pin, ui) else {
            return Ok(PinOutcome::Skipped);
        };

        let response = client.get(request.url.as_str()).await.map_err(|e| {
            warn!(url = %request.url, error = %e, "pin check transport failure");
            VerifyError::from(e)
        })?;

        self.complete(&request, &response, ui)
    }
}

/// Rewrite the page for a decoded verification response.
pub fn apply_verification(
    response: &VerificationResponse,
    messages: &Messages,
    ui: &mut dyn UiPort,
) -> PinOutcome {
    match response {
        VerificationResponse::Success(found) => {
            ui.set_text(
                ids::ALERT_OK,
                &format!("{}{}", messages.participant_found, found.participant),
            );
            ui.set_visible(ids::ALERT_OK, true);
            ui.set_visible(ids::ALERT_ERROR, false);
            ui.set_visible(ids::ENTER_RESULT_FORM, true);

            if let Some(sheet) = &found.accents {
                fill_accents(sheet, ui);
            }

            if let Some(french) = &found.french_accents {
                for (key, result) in french {
                    ui.set_value(&ids::french_top(key), &result.top.to_string());
                    ui.set_value(&ids::french_zone(key), &result.zone.to_string());
                }
            }

            debug!(participant = %found.participant, "pin matched");
            PinOutcome::Found {
                participant: found.participant.clone(),
            }
        }
        VerificationResponse::Failure { reason } => {
            ui.set_text(ids::ALERT_ERROR, reason);
            ui.set_visible(ids::ALERT_ERROR, true);
            ui.set_visible(ids::ENTER_RESULT_FORM, false);
            ui.set_visible(ids::ALERT_OK, false);

            debug!(%reason, "pin rejected");
            PinOutcome::Rejected {
                reason: reason.clone(),
            }
        }
    }
}

/// Select exactly one of the three radios per route.
fn fill_accents(sheet: &AccentSheet, ui: &mut dyn UiPort) {
    match sheet {
        AccentSheet::Marks(marks) => {
            for (key, mark) in marks {
                let selected = mark.choice();
                if selected.is_none() {
                    warn!(route = %key, marker = mark.as_wire(), "unrecognized accent marker");
                }
                for choice in 0..3 {
                    ui.set_checked(&ids::simple_accent(key, choice), selected == Some(choice));
                }
            }
        }
        AccentSheet::Ranked(routes) => {
            for (key, result) in routes {
                let rank = result.rank();
                for choice in 0..3 {
                    ui.set_checked(&ids::ranked_accent(key, choice), rank == choice);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MemoryDocument, UiPatch};
    use serde_json::json;

    fn verifier() -> PinVerifier {
        PinVerifier::new(
            Endpoints::new("http://localhost:8000").unwrap(),
            Messages::default(),
        )
    }

    #[test]
    fn begin_gates_on_length() {
        let v = verifier();
        let mut ui = UiPatch::new();
        assert!(v.begin(EventId(1), "123", &mut ui).is_none());
        assert!(v.begin(EventId(1), "12345", &mut ui).is_none());
        assert!(v.begin(EventId(1), "", &mut ui).is_none());

        let request = v.begin(EventId(1), "1234", &mut ui).unwrap();
        assert_eq!(request.request.pin, "1234");
        assert_eq!(
            request.url.as_str(),
            "http://localhost:8000/ajax/check_pin_code/?pin=1234&event_id=1"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let v = verifier();
        let mut ui = UiPatch::new();
        assert!(v.begin(EventId(1), "пин1", &mut ui).is_some());
    }

    #[test]
    fn begin_hides_both_panels_even_when_skipped() {
        let v = verifier();
        let mut doc = MemoryDocument::new();
        doc.set_visible(ids::ALERT_OK, true);
        doc.set_visible(ids::ALERT_ERROR, true);

        assert!(v.begin(EventId(1), "12", &mut doc).is_none());
        assert_eq!(doc.is_visible(ids::ALERT_OK), Some(false));
        assert_eq!(doc.is_visible(ids::ALERT_ERROR), Some(false));
    }

    #[test]
    fn ranked_accents_select_one_of_three() {
        let v = verifier();
        let mut doc = MemoryDocument::new();
        let request = v.begin(EventId(1), "0001", &mut doc).unwrap();
        let body = json!({
            "result": true,
            "participant": "Sidorov Petr",
            "accents": {"0": {"top": 0}, "1": {"top": 1, "zone": 1}, "2": {"top": 4, "zone": 2}}
        });

        let outcome = v
            .complete(&request, &HttpResponse::ok_json(&body), &mut doc)
            .unwrap();
        assert_eq!(
            outcome,
            PinOutcome::Found {
                participant: "Sidorov Petr".to_string()
            }
        );

        for (key, expected) in [("0", 0), ("1", 1), ("2", 2)] {
            for choice in 0..3 {
                assert_eq!(
                    doc.is_checked(&ids::ranked_accent(key, choice)),
                    choice == expected,
                    "route {} choice {}",
                    key,
                    choice
                );
            }
        }
    }

    #[test]
    fn french_accents_fill_top_and_zone() {
        let v = verifier();
        let mut doc = MemoryDocument::new();
        let request = v.begin(EventId(4), "4321", &mut doc).unwrap();
        let body = json!({
            "result": true,
            "participant": "Sidorov Petr",
            "french_accents": {"0": {"top": 3, "zone": 1}, "1": {"top": 0, "zone": 0}}
        });

        v.complete(&request, &HttpResponse::ok_json(&body), &mut doc)
            .unwrap();
        assert_eq!(doc.value(&ids::french_top("0")).as_deref(), Some("3"));
        assert_eq!(doc.value(&ids::french_zone("0")).as_deref(), Some("1"));
        assert_eq!(doc.value(&ids::french_top("1")).as_deref(), Some("0"));
        assert_eq!(doc.is_visible(ids::ENTER_RESULT_FORM), Some(true));
    }

    #[test]
    fn unrecognized_marker_clears_all_choices() {
        let v = verifier();
        let mut doc = MemoryDocument::new();
        for choice in 0..3 {
            doc.set_checked(&ids::simple_accent("0", choice), true);
        }
        let request = v.begin(EventId(1), "1111", &mut doc).unwrap();
        let body = json!({"result": true, "participant": "A B", "accents": {"0": "??"}});
        v.complete(&request, &HttpResponse::ok_json(&body), &mut doc)
            .unwrap();
        for choice in 0..3 {
            assert!(!doc.is_checked(&ids::simple_accent("0", choice)));
        }
    }

    #[test]
    fn error_status_leaves_page_untouched() {
        let v = verifier();
        let mut patch = UiPatch::new();
        let request = v.begin(EventId(1), "1234", &mut patch).unwrap();

        let mut after = UiPatch::new();
        let err = v
            .complete(&request, &HttpResponse::new(500, "oops"), &mut after)
            .unwrap_err();
        assert!(matches!(err, VerifyError::Status { status: 500, .. }));
        assert!(after.is_empty());
    }

    #[test]
    fn malformed_body_leaves_page_untouched() {
        let v = verifier();
        let mut patch = UiPatch::new();
        let request = v.begin(EventId(1), "1234", &mut patch).unwrap();

        let mut after = UiPatch::new();
        let err = v
            .complete(&request, &HttpResponse::new(200, "<html>"), &mut after)
            .unwrap_err();
        assert!(matches!(err, VerifyError::Decode { .. }));
        assert!(after.is_empty());
    }
}
