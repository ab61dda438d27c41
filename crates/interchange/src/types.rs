//! Typed structs representing the JSON returned by the AJAX endpoints.
//!
//! The PIN endpoint has two schema variants in the wild: a flat
//! `accents` map of string markers, and a ranked map of `{top, zone}`
//! objects (optionally accompanied by `french_accents`). Both are modelled
//! here; which one a page receives depends on the event's scoring type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric identifier of an event, as used in `event_id` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        EventId(id)
    }
}

/// A single PIN lookup, built fresh per user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    pub event_id: EventId,
    pub pin: String,
}

// ── PIN verification ────────────────────────────────────────────────

/// Decoded body of `GET /ajax/check_pin_code/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResponse {
    /// `result: true`: a participant holds this PIN and may enter results.
    Success(PinMatch),
    /// `result: false`: no participant, or re-entry is not allowed.
    Failure { reason: String },
}

/// Payload of a successful PIN lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinMatch {
    /// Display name of the participant (`"<last> <first>"`).
    pub participant: String,
    /// Previously entered accents, in either schema variant.
    pub accents: Option<AccentSheet>,
    /// French scoring results (`top` / `zone` attempt counts per route).
    pub french_accents: Option<BTreeMap<String, RouteResult>>,
}

/// The `accents` map, keyed by route number (as a string).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", content = "routes", rename_all = "snake_case")]
pub enum AccentSheet {
    /// Simple variant: one three-way marker per route.
    Marks(BTreeMap<String, AccentMark>),
    /// Extended variant: positional rank in `top` (0 none, 1 flash, 2+ redpoint).
    Ranked(BTreeMap<String, RouteResult>),
}

impl AccentSheet {
    pub fn len(&self) -> usize {
        match self {
            AccentSheet::Marks(m) => m.len(),
            AccentSheet::Ranked(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Three-way marker of the simple accents variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentMark {
    /// `"-"`: route not sent.
    None,
    /// `"F"`: flash.
    Flash,
    /// `"RP"`: redpoint.
    Redpoint,
    /// Any other string. Clears all three choices for the route.
    Unrecognized(String),
}

impl AccentMark {
    /// Parse a wire marker. Never fails; unknown markers are preserved.
    pub fn from_wire(marker: &str) -> Self {
        match marker {
            "-" => AccentMark::None,
            "F" => AccentMark::Flash,
            "RP" => AccentMark::Redpoint,
            other => AccentMark::Unrecognized(other.to_string()),
        }
    }

    /// Wire form of the marker.
    pub fn as_wire(&self) -> &str {
        match self {
            AccentMark::None => "-",
            AccentMark::Flash => "F",
            AccentMark::Redpoint => "RP",
            AccentMark::Unrecognized(s) => s,
        }
    }

    /// Zero-based position among the three radio choices, if recognized.
    pub fn choice(&self) -> Option<usize> {
        match self {
            AccentMark::None => Some(0),
            AccentMark::Flash => Some(1),
            AccentMark::Redpoint => Some(2),
            AccentMark::Unrecognized(_) => None,
        }
    }
}

/// Per-route `{top, zone}` result. Missing fields default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub zone: u32,
}

impl RouteResult {
    /// Rank among the three radio choices: 0 none, 1 flash, 2 redpoint.
    ///
    /// Any `top` above 2 still means redpoint.
    pub fn rank(&self) -> usize {
        match self.top {
            0 => 0,
            1 => 1,
            _ => 2,
        }
    }
}

// ── Promo code ──────────────────────────────────────────────────────

/// Decoded body of `GET /ajax/check_promo_code/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromoResponse {
    /// The code is valid and still has applications left.
    Applied {
        price: Decimal,
        /// Present on newer servers; used to compose the payment label.
        promocode_id: Option<u64>,
    },
    /// Unknown or exhausted code. The caller reverts to its default price.
    Rejected,
}

// ── Charts ──────────────────────────────────────────────────────────

/// Aggregate series rendered by the statistics charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}
