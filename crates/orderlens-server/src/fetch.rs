//! fetch.rs — Outbound order lookup
//!
//! Issues the single GET the view performs on submit and turns the response
//! into display text. No retries, no timeout, no auth; HTTP status is
//! irrelevant as long as a body arrives.

use orderlens_view::{encode_query_value, format_response};

#[derive(Debug)]
pub enum LookupError {
    /// The request never completed (refused, DNS, reset mid-body, ...)
    Transport(String),
    /// The response arrived but the body could not be read
    Read(String),
    /// content-type claimed JSON but the body did not parse
    Parse(serde_json::Error),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {}", e),
            Self::Read(e) => write!(f, "read body: {}", e),
            Self::Parse(e) => write!(f, "parse body: {}", e),
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Build the lookup URL: `<backend>?order_uid=<percent-encoded uid>`.
pub fn build_lookup_url(backend: &str, order_uid: &str) -> String {
    let sep = if backend.contains('?') { '&' } else { '?' };
    format!("{}{}order_uid={}", backend, sep, encode_query_value(order_uid))
}

/// Perform the lookup and return the text to display in the result panel.
///
/// Non-2xx statuses still carry a displayable body, so they are unwrapped
/// from ureq's status error and handled like any other response.
pub fn fetch_order(backend: &str, order_uid: &str) -> Result<String, LookupError> {
    let url = build_lookup_url(backend, order_uid);
    eprintln!("[lookup] GET {}", url);

    let resp = match ureq::get(&url).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => return Err(LookupError::Transport(e.to_string())),
    };

    let content_type = resp.header("content-type").map(|s| s.to_string());
    let body = resp
        .into_string()
        .map_err(|e| LookupError::Read(e.to_string()))?;

    Ok(format_response(content_type.as_deref(), &body)?)
}
