//! podium-client: the interactive behaviour of podium event pages.
//!
//! Two verifiers drive AJAX lookups and rewrite the page with the result:
//! - [`PinVerifier`] checks a participant PIN and reveals the pre-filled
//!   result-entry form
//! - [`PromoVerifier`] checks a promo code and rewrites the payment amount
//!   and label
//!
//! Both talk to the page through [`UiPort`] and to the server through
//! [`HttpClient`], and both drop responses that arrive after a newer check
//! was started ([`RequestSequence`]).
//!
//! [`chart`] builds Chart.js configs for the statistics page and [`nav`]
//! carries the small helpers every page shares.

pub mod chart;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod nav;
pub mod pin;
pub mod promo;
pub mod sequence;
pub mod ui;

pub use chart::{chart_config, chart_defaults, palette_for, ChartKind};
pub use config::{ClientConfig, LogFormat, LoggingConfig, Messages, ServerConfig};
pub use endpoint::Endpoints;
pub use error::{ConfigError, HttpError, VerifyError};
pub use http::static_client::StaticClient;
#[cfg(feature = "native")]
pub use http::ureq_client::UreqClient;
pub use http::{HttpClient, HttpResponse};
pub use nav::{Browser, Platform};
pub use pin::{PinOutcome, PinRequest, PinVerifier};
pub use promo::{PromoOutcome, PromoRequest, PromoVerifier};
pub use sequence::{RequestSequence, RequestToken};
pub use ui::{ElementState, MemoryDocument, UiOp, UiPatch, UiPort};
