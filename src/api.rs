//! HTTP client for the GReader-compatible aggregation API.
//!
//! Four remote calls: `login`, `load_unread`, `mark_as_read`,
//! `add_subscription`. Authenticated calls attach
//! `Authorization: GoogleLogin auth=<token>`; an HTTP 403 on any of them is
//! surfaced as [`ApiError::AuthExpired`], the single cross-cutting signal
//! that the session is dead. Other non-OK statuses abort the operation;
//! network and decode failures are left to the caller to log and degrade.

use crate::model::Item;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-request timeout. Without it a hung request would leave the
/// pagination guard set forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 403 on an authenticated call: the token is no longer valid.
    #[error("session expired or unauthorized (HTTP 403)")]
    AuthExpired,
    /// Any other non-OK HTTP status. The operation is abandoned.
    #[error("request failed with HTTP status {0}")]
    Status(u16),
    /// Network-level failure (DNS, connection, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Login response body did not contain a token on its third line.
    #[error("could not parse a token out of the login response")]
    MalformedLogin,
    /// Response body was not valid JSON for the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

/// One page of unread items from `/api/unread`.
///
/// `next_page_offset` is an opaque cursor: absent or empty means no more
/// pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadPage {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub next_page_offset: Option<String>,
}

#[derive(Serialize)]
struct MarkReadRequest<'a> {
    ids: &'a [String],
}

#[derive(Serialize)]
struct AddSubscriptionRequest<'a> {
    link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
}

/// Cheap-to-clone API client: spawned tasks clone it and share the token
/// slot, so a login or forced logout is visible to every in-flight clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Arc<RwLock<Option<String>>>,
    unread_limit: usize,
}

impl ApiClient {
    pub fn new(
        endpoint: Url,
        token: Option<String>,
        unread_limit: usize,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tidings/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token: Arc::new(RwLock::new(token)),
            unread_limit,
        })
    }

    pub fn set_token(&self, token: String) {
        *write_lock(&self.token) = Some(token);
    }

    pub fn clear_token(&self) {
        *write_lock(&self.token) = None;
    }

    fn current_token(&self) -> Option<String> {
        read_lock(&self.token).clone()
    }

    /// Attach the GoogleLogin authorization header when a token is held.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current_token() {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                format!("GoogleLogin auth={}", token),
            ),
            None => request,
        }
    }

    /// POST credentials to `/accounts/ClientLogin` and parse the token out
    /// of the plaintext `SID=\nLSID=\nAuth=` response body.
    ///
    /// On success the token is installed into the shared slot so subsequent
    /// calls on any clone of this client are authenticated. A 403 here is a
    /// credential failure, not an expired session, so it maps to
    /// [`ApiError::Status`].
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = self.endpoint.join("/accounts/ClientLogin")?;
        let response = self
            .http
            .post(url)
            .form(&[("Email", email), ("Passwd", password)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        let token = parse_login_token(&body).ok_or(ApiError::MalformedLogin)?;
        self.set_token(token.clone());
        tracing::debug!("Login succeeded, token installed");
        Ok(token)
    }

    /// Fetch one page of unread items. The page size is fixed at the
    /// configured limit; `offset` is the cursor echoed back from the
    /// previous page, or `None` for the first page.
    pub async fn load_unread(&self, offset: Option<&str>) -> Result<UnreadPage, ApiError> {
        let mut url = self.endpoint.join("/api/unread")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
            query.append_pair("limit", &self.unread_limit.to_string());
        }
        let response = self.authorized(self.http.get(url)).send().await?;
        check_status(&response)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Mark the given items read on the server. Never retried; the caller
    /// logs failures and moves on.
    pub async fn mark_as_read(&self, ids: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint.join("/api/markAsRead")?;
        let response = self
            .authorized(self.http.post(url))
            .json(&MarkReadRequest { ids })
            .send()
            .await?;
        check_status(&response)?;
        Ok(())
    }

    /// Subscribe to a new feed, optionally titled and filed into a folder.
    pub async fn add_subscription(
        &self,
        link: &str,
        title: Option<&str>,
        folder: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint.join("/api/addSubscription")?;
        let response = self
            .authorized(self.http.post(url))
            .json(&AddSubscriptionRequest { link, title, folder })
            .send()
            .await?;
        check_status(&response)?;
        Ok(())
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ApiError::AuthExpired);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(())
}

/// The token is the value after `=` on the third line of the login body
/// (`SID=...\nLSID=...\nAuth=<token>`).
fn parse_login_token(body: &str) -> Option<String> {
    body.lines()
        .nth(2)?
        .splitn(2, '=')
        .nth(1)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

// RwLock poisoning only happens if a holder panicked; the token slot is
// plain data, so the inner value is still usable.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_token() {
        let body = "SID=null\nLSID=null\nAuth=secrettoken";
        assert_eq!(parse_login_token(body).as_deref(), Some("secrettoken"));
    }

    #[test]
    fn test_parse_login_token_rejects_short_body() {
        assert_eq!(parse_login_token("Error=BadAuthentication"), None);
        assert_eq!(parse_login_token(""), None);
    }

    #[test]
    fn test_parse_login_token_rejects_empty_token() {
        assert_eq!(parse_login_token("SID=a\nLSID=b\nAuth="), None);
    }

    #[test]
    fn test_parse_login_token_keeps_equals_in_token() {
        // Tokens are opaque; a base64 '=' pad must survive the split.
        let body = "SID=a\nLSID=b\nAuth=abc=";
        assert_eq!(parse_login_token(body).as_deref(), Some("abc="));
    }

    #[test]
    fn test_unread_page_decodes_camel_case() {
        let page: UnreadPage =
            serde_json::from_str(r#"{"items":[],"nextPageOffset":"42"}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_offset.as_deref(), Some("42"));
    }

    #[test]
    fn test_unread_page_tolerates_missing_offset() {
        let page: UnreadPage = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(page.next_page_offset, None);
    }
}
