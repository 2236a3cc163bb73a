//! REST client for the GEM admin API.
//!
//! All list/retrieve/create/update/delete traffic for both resource kinds
//! goes through `ApiClient`. Every request flows through one choke point
//! (`execute`) so the 401/403 navigation contract and the inline-error
//! contract are applied uniformly: an unauthorized response is turned into
//! `ConsoleError::Unauthorized` before any body processing, and any other
//! non-2xx response surfaces its body text for inline display.
//!
//! Writes carry `X-CSRFToken` read fresh from the session cookie on every
//! call; the token can rotate between page actions, so it is never cached.

use reqwest::header;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::config::Config;
use crate::console::query::QueryState;
use crate::console::stager::StagedFile;
use crate::error::{ConsoleError, Result};
use crate::types::{Category, FormPayload, Metrics, Page, Record, ResourceKind};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Extract a cookie value from a raw `Cookie` header string.
fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|part| {
        let part = part.trim();
        part.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

/// Category listings are paginated in production but some deployments return
/// a bare array; accept both.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CategoryListing {
    Paged(Page<Category>),
    Plain(Vec<Category>),
}

pub struct ApiClient {
    http: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Login URL used for the 401/403 navigation signal.
    pub fn login_url(&self) -> String {
        self.config.login_url()
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(&format!("api/{path}"))?)
    }

    fn collection_url(&self, kind: ResourceKind) -> Result<Url> {
        self.api_url(&format!("{}/", kind.path()))
    }

    fn instance_url(&self, kind: ResourceKind, id: i64) -> Result<Url> {
        self.api_url(&format!("{}/{}/", kind.path(), id))
    }

    /// CSRF token for state-changing requests, read from the session cookie
    /// at call time.
    fn csrf_token(&self) -> String {
        cookie_value(&self.config.session_cookie, CSRF_COOKIE)
            .unwrap_or_default()
            .to_string()
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header(header::COOKIE, self.config.session_cookie.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Global signal: abandon the response body entirely.
            return Err(ConsoleError::Unauthorized {
                login: self.login_url(),
            });
        }
        if !status.is_success() {
            let fallback = format!("HTTP {status}");
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() { fallback } else { body };
            return Err(ConsoleError::Api(message));
        }
        Ok(response)
    }

    fn write_request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(CSRF_HEADER, self.csrf_token())
    }

    /// Fetch one page of records for the current query state.
    pub async fn list(&self, kind: ResourceKind, query: &QueryState) -> Result<Page<Record>> {
        let url = self.collection_url(kind)?;
        tracing::debug!(resource = %kind, page = query.page, "loading list page");
        let response = self
            .execute(self.http.get(url).query(&query.to_params()))
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch a full record by id.
    pub async fn retrieve(&self, kind: ResourceKind, id: i64) -> Result<Record> {
        let url = self.instance_url(kind, id)?;
        let response = self.execute(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Create (no id) or update (id set) a record.
    ///
    /// Encoding is chosen by staged-file presence: plain JSON when no images
    /// are staged, multipart with repeated `images` parts otherwise.
    pub async fn save(
        &self,
        kind: ResourceKind,
        id: Option<i64>,
        payload: &FormPayload,
        files: &[StagedFile],
    ) -> Result<()> {
        let (method, url) = match id {
            Some(id) => (Method::PUT, self.instance_url(kind, id)?),
            None => (Method::POST, self.collection_url(kind)?),
        };
        tracing::debug!(
            resource = %kind,
            update = id.is_some(),
            staged = files.len(),
            "saving record"
        );

        let request = self.write_request(method, url);
        let request = if files.is_empty() {
            request.json(payload)
        } else {
            request.multipart(multipart_body(payload, files)?)
        };
        self.execute(request).await?;
        Ok(())
    }

    /// Delete a record. Confirmation is the caller's responsibility.
    pub async fn delete(&self, kind: ResourceKind, id: i64) -> Result<()> {
        let url = self.instance_url(kind, id)?;
        self.execute(self.write_request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Aggregate KPIs for the screen header. Diagnostic only; callers degrade
    /// to empty state on failure.
    pub async fn metrics(&self, kind: ResourceKind) -> Result<Metrics> {
        let url = self.api_url(&format!("{}/metrics/", kind.path()))?;
        let response = self.execute(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Category lookup, loaded once per screen session, capped at 100.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let url = self.api_url("categories/")?;
        let response = self
            .execute(self.http.get(url).query(&[("page_size", "100")]))
            .await?;
        let listing: CategoryListing = response.json().await?;
        Ok(match listing {
            CategoryListing::Paged(page) => page.results,
            CategoryListing::Plain(items) => items,
        })
    }

    /// CSV export URL carrying the same filters as the list. The download is
    /// triggered by bare navigation, so only the URL is built here.
    pub fn export_url(&self, kind: ResourceKind, query: &QueryState) -> Result<Url> {
        let mut url = self.api_url(&format!("{}/export/", kind.path()))?;
        url.query_pairs_mut()
            .extend_pairs(query.to_params().iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// URL of a declared bulk-action endpoint. No request shape is assumed;
    /// the store screen declares these but never invokes them.
    pub fn bulk_url(&self, kind: ResourceKind, action: &str) -> Result<Url> {
        if !kind.bulk_endpoints().contains(&action) {
            return Err(ConsoleError::Api(format!(
                "unknown bulk action '{action}' for {kind}"
            )));
        }
        self.api_url(&format!("{}/{}/", kind.path(), action))
    }
}

fn multipart_body(payload: &FormPayload, files: &[StagedFile]) -> Result<Form> {
    let mut form = Form::new().text("name", payload.name.clone());
    if let Some(sku) = &payload.sku {
        form = form.text("sku", sku.clone());
    }
    if let Some(code) = &payload.code {
        form = form.text("code", code.clone());
    }
    if let Some(price) = payload.price {
        form = form.text("price", price.to_string());
    }
    if let Some(category) = payload.category {
        form = form.text("category", category.to_string());
    }
    if let Some(status) = payload.status {
        form = form.text("status", status.as_str());
    }
    if let Some(accuracy) = payload.accuracy_rate {
        form = form.text("accuracy_rate", accuracy.to_string());
    }
    if let Some(count) = payload.detection_count {
        form = form.text("detection_count", count.to_string());
    }
    if let Some(address) = &payload.address {
        form = form.text("address", address.clone());
    }
    if let Some(confidence) = payload.confidence {
        form = form.text("confidence", confidence.to_string());
    }
    form = form.text("description", payload.description.clone());
    for file in files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        form = form.part("images", part);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_picks_named_cookie() {
        let header = "sessionid=abc123; csrftoken=tok-9; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken"), Some("tok-9"));
        assert_eq!(cookie_value(header, "sessionid"), Some("abc123"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_value_rejects_prefix_collision() {
        // `csrftokenx` must not satisfy a lookup for `csrftoken`.
        assert_eq!(cookie_value("csrftokenx=nope", "csrftoken"), None);
    }

    #[test]
    fn test_export_url_carries_filters() {
        let config = Config::new("https://admin.gem.example", "csrftoken=t").unwrap();
        let client = ApiClient::new(config);
        let mut query = QueryState::new();
        query.set_filter(crate::console::query::FilterPatch {
            search: Some("trà".into()),
            ..Default::default()
        });
        let url = client.export_url(ResourceKind::Products, &query).unwrap();
        assert!(url.as_str().starts_with("https://admin.gem.example/api/products/export/?"));
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(params.contains(&("search".into(), "trà".into())));
        assert!(params.contains(&("ordering".into(), "-last_updated_at".into())));
    }

    #[test]
    fn test_bulk_url_only_for_declared_actions() {
        let config = Config::new("https://admin.gem.example", "csrftoken=t").unwrap();
        let client = ApiClient::new(config);
        let url = client.bulk_url(ResourceKind::Stores, "bulk_restart").unwrap();
        assert_eq!(
            url.as_str(),
            "https://admin.gem.example/api/stores/bulk_restart/"
        );
        assert!(client.bulk_url(ResourceKind::Products, "bulk_restart").is_err());
        assert!(client.bulk_url(ResourceKind::Stores, "bulk_erase").is_err());
    }
}
