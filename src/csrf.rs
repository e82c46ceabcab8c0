//! CSRF token resolution for the feedback endpoint.
//!
//! The backend accepts the token from a form-embedded field or from the
//! `csrftoken` cookie it sets on the index page. The form token wins when
//! both are present.

pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrfSource {
    /// Token copied from the page form, if any.
    pub form_token: Option<String>,
    /// Raw `Cookie` header value, e.g. `sessionid=abc; csrftoken=xyz`.
    pub cookie_header: Option<String>,
}

impl CsrfSource {
    #[must_use]
    pub fn new(form_token: Option<String>, cookie_header: Option<String>) -> Self {
        Self { form_token, cookie_header }
    }

    /// First match wins: form token, then the `csrftoken` cookie.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        self.form_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                self.cookie_header
                    .as_deref()
                    .and_then(|header| cookie_value(header, CSRF_COOKIE_NAME))
            })
    }

    /// Record a `csrftoken` value captured from a `Set-Cookie` response
    /// header, appending to any cookies already known.
    pub fn absorb_cookie_token(&mut self, token: &str) {
        let pair = format!("{CSRF_COOKIE_NAME}={token}");
        self.cookie_header = Some(match self.cookie_header.take() {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}; {pair}"),
            _ => pair,
        });
    }
}

/// Look up `name` in a `Cookie` header (`a=1; b=2`).
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_owned())
    })
}

/// Extract `name` from a single `Set-Cookie` header value
/// (`csrftoken=xyz; Path=/; SameSite=Lax`).
#[must_use]
pub fn set_cookie_value(set_cookie: &str, name: &str) -> Option<String> {
    let first = set_cookie.split(';').next()?;
    let (key, value) = first.trim().split_once('=')?;
    (key == name && !value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[path = "csrf_test.rs"]
mod tests;
