//! Locale hints carried by a request.

use tiny_http::Request;

/// Owned copies of the headers locale negotiation looks at.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestHints {
    pub cookie: Option<String>,
    pub accept_language: Option<String>,
}

impl RequestHints {
    /// Collect hints from `request`; `cookie_name` names the locale cookie.
    pub fn from_request(request: &Request, cookie_name: &str) -> Self {
        let header = |name: &str| {
            request
                .headers()
                .iter()
                .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                .map(|h| h.value.as_str().to_string())
        };

        Self {
            cookie: header("Cookie").and_then(|c| cookie_value(&c, cookie_name)),
            accept_language: header("Accept-Language"),
        }
    }
}

/// Value of cookie `name` in a `Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"').to_string())
    })
}
