//! HTTP plumbing shared by every catalog.
//!
//! Catalogs only describe requests; sending them and enforcing the
//! abort-on-non-success policy happens here so both pipelines fail the same way.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::CatalogKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestMethod {
    Get,
    PostForm(Vec<(String, String)>),
}

/// Credentials attached to an outgoing catalog request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestAuth {
    None,
    /// Key sent as a query parameter (TMDB style)
    QueryKey { param: &'static str, value: String },
    Bearer(String),
    Basic { username: String, password: String },
}

/// A fully described catalog request, independent of the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub method: RequestMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub auth: RequestAuth,
}

impl CatalogRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            url: url.into(),
            query: Vec::new(),
            auth: RequestAuth::None,
        }
    }

    pub fn post_form(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: RequestMethod::PostForm(form),
            url: url.into(),
            query: Vec::new(),
            auth: RequestAuth::None,
        }
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_auth(mut self, auth: RequestAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Looks up a query parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a catalog response
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends catalog requests
///
/// The only seam between the recommendation pipeline and the network. Calls are
/// awaited one at a time by the pipeline; implementations never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: CatalogRequest) -> AppResult<RawResponse>;
}

/// Production transport backed by reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    /// Creates a transport; without a timeout the client default applies.
    pub fn new(timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: CatalogRequest) -> AppResult<RawResponse> {
        let mut builder = match &request.method {
            RequestMethod::Get => self.http_client.get(&request.url),
            RequestMethod::PostForm(form) => self.http_client.post(&request.url).form(form),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.auth {
            RequestAuth::None => builder,
            RequestAuth::QueryKey { param, value } => builder.query(&[(param, value)]),
            RequestAuth::Bearer(token) => builder.bearer_auth(token),
            RequestAuth::Basic { username, password } => builder.basic_auth(username, Some(password)),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Paged catalog envelope: `{ "results": [...] }`, where `results` may be absent
#[derive(Debug, Deserialize)]
pub struct ResultsEnvelope<T> {
    pub results: Option<Vec<T>>,
}

impl<T> ResultsEnvelope<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

/// Sends a request and decodes its JSON body
///
/// Any non-2xx status aborts with `CatalogUnavailable`; an undecodable 2xx body
/// aborts with `MalformedResponse`. Nothing is retried.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    catalog: CatalogKind,
    operation: &'static str,
    request: CatalogRequest,
) -> AppResult<T> {
    let response = transport.send(request).await?;

    if !response.is_success() {
        tracing::warn!(
            catalog = %catalog,
            operation,
            status = response.status,
            "Catalog returned non-success status"
        );
        return Err(AppError::CatalogUnavailable {
            catalog,
            operation,
            status: response.status,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| {
        tracing::error!(
            catalog = %catalog,
            operation,
            error = %e,
            "Failed to deserialize catalog response"
        );
        AppError::MalformedResponse {
            catalog,
            operation,
            reason: e.to_string(),
        }
    })
}
