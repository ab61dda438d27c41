//! podium-interchange: typed response shapes for the podium AJAX endpoints.
//!
//! The two verification endpoints answer with loosely shaped JSON
//! (`result` flag plus variant-specific fields). This crate turns those
//! bodies into explicit tagged unions ([`VerificationResponse`],
//! [`PromoResponse`]) and rejects anything that does not fit, so consumers
//! never index into an untyped `serde_json::Value`.
//!
//! Chart aggregates (`{labels, data}`) are decoded here as well, since they
//! arrive from the same server-rendered pages.

pub mod deserialize;
pub mod types;

pub use deserialize::{
    chart_data_from_json_str, decode_chart_data, decode_promo, decode_verification, parse_body,
    promo_from_json_str, verification_from_json_str, InterchangeError,
};
pub use types::*;
