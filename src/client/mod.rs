//! HTTP client module
//!
//! Builds the shared reqwest client and performs the raw fetches against the
//! three upstream sources. This layer knows nothing about the payloads; it
//! hands back body text (or parsed JSON for the structured APIs) and maps
//! transport failures into [`FogError`]. Retry and fallback policy belong to
//! the caller.

mod http;

pub use http::{build_http_client, fetch_json, fetch_text};
