//! Console connection configuration.
//!
//! An explicit, constructible value owned by the caller; there is no global
//! configuration state. The session cookie doubles as the CSRF token source
//! (the token is re-read from it on every state-changing request).

use std::fmt;

use url::Url;

use crate::error::{ConsoleError, Result};

/// Route the whole page navigates to on a 401/403 response.
pub const LOGIN_PATH: &str = "/login/";

#[derive(Clone)]
pub struct Config {
    /// Origin of the GEM backend, e.g. `https://admin.gem.example`.
    pub base_url: Url,
    /// Raw `Cookie` header value for the authenticated session.
    pub session_cookie: String,
}

impl Config {
    pub fn new(base_url: &str, session_cookie: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConsoleError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::Config(format!(
                "base URL '{base_url}' cannot be used as an origin"
            )));
        }
        Ok(Self {
            base_url,
            session_cookie: session_cookie.into(),
        })
    }

    /// Absolute login URL for the 401/403 navigation signal.
    pub fn login_url(&self) -> String {
        self.base_url
            .join(LOGIN_PATH)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| LOGIN_PATH.to_string())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("session_cookie", &"[REDACTED]")
            .finish()
    }
}
