//! Client layer: typed CRUD gateway over the lending REST API.

mod observer;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    ApiErrorPayload, Bank, BankDraft, Customer, CustomerDraft, ListQuery, Loan, LoanDraft, Page,
    ValidationError,
};
use crate::transport::{self, TransportError};

pub use observer::{LoadingTracker, Method, NoopObserver, RequestObserver};
use observer::RequestGuard;

/// Used by [`TuCreditoClient::builder`] when no base URL is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    body: Option<String>,
    bearer_token: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self
                .client
                .request(method, request.url)
                .header(reqwest::header::ACCEPT, "application/json");
            if let Some(token) = request.bearer_token {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = request.body {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// A collection exposed by the lending API.
pub trait Resource: DeserializeOwned + Send {
    /// Collection path relative to the API base URL.
    const PATH: &'static str;
    /// Body sent on create and update.
    type Draft: Serialize + Sync;
}

impl Resource for Customer {
    const PATH: &'static str = "clientes";
    type Draft = CustomerDraft;
}

impl Resource for Loan {
    const PATH: &'static str = "prestamos";
    type Draft = LoanDraft;
}

impl Resource for Bank {
    const PATH: &'static str = "bancos";
    type Draft = BankDraft;
}

/// CRUD operations over any [`Resource`].
pub trait DataGateway: Send + Sync {
    fn list<R: Resource>(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Page<R>, ClientError>> + Send;

    fn get<R: Resource>(&self, id: u64) -> impl Future<Output = Result<R, ClientError>> + Send;

    fn create<R: Resource>(
        &self,
        draft: &R::Draft,
    ) -> impl Future<Output = Result<R, ClientError>> + Send;

    fn update<R: Resource>(
        &self,
        id: u64,
        draft: &R::Draft,
    ) -> impl Future<Output = Result<R, ClientError>> + Send;

    fn delete<R: Resource>(&self, id: u64) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TuCreditoClient`].
///
/// Use [`ClientError::user_message`] for the text shown to the user.
pub enum ClientError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status whose body is not a JSON error payload.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Non-successful HTTP status with a JSON error payload.
    #[error("API error (HTTP {status})")]
    Api { status: u16, payload: ApiErrorPayload },

    /// A successful response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[source] TransportError),
}

impl ClientError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Builder for [`TuCreditoClient`].
pub struct TuCreditoClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    bearer_token: Option<String>,
    observer: Arc<dyn RequestObserver>,
}

impl TuCreditoClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: None,
            bearer_token: None,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Build a [`TuCreditoClient`].
    pub fn build(self) -> Result<TuCreditoClient, ClientError> {
        let base_url =
            transport::normalize_base_url(&self.base_url).map_err(ClientError::InvalidUrl)?;
        let bearer_token = self
            .bearer_token
            .map(|token| bearer_token(&token))
            .transpose()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| ClientError::Transport(Box::new(err)))?;

        Ok(TuCreditoClient {
            base_url,
            bearer_token,
            http: Arc::new(ReqwestTransport { client }),
            observer: self.observer,
        })
    }
}

impl Default for TuCreditoClientBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn bearer_token(token: &str) -> Result<String, ValidationError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ValidationError::Empty {
            field: "bearer_token",
        });
    }
    Ok(token.to_owned())
}

#[derive(Clone)]
/// Gateway to the Tu Crédito REST API.
///
/// Error responses are decoded into [`ClientError::Api`] when the body is a
/// JSON error payload, so that [`ClientError::user_message`] can show the
/// server's field messages.
pub struct TuCreditoClient {
    base_url: Url,
    bearer_token: Option<String>,
    http: Arc<dyn HttpTransport>,
    observer: Arc<dyn RequestObserver>,
}

impl TuCreditoClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`TuCreditoClient::builder`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        TuCreditoClientBuilder::new(base_url).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(base_url: impl Into<String>) -> TuCreditoClientBuilder {
        TuCreditoClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<String, ClientError> {
        log::debug!("{method} {url}");
        let mut guard = RequestGuard::start(self.observer.as_ref(), method, url.to_string());

        let request = HttpRequest {
            method,
            url,
            body,
            bearer_token: self.bearer_token.clone(),
        };
        let response = self.http.send(request).await.map_err(|err| {
            log::warn!("{method} request failed: {err}");
            ClientError::Transport(err)
        })?;
        guard.set_status(response.status);

        if !(200..=299).contains(&response.status) {
            log::warn!("{method} returned HTTP {}", response.status);
            return Err(error_from_response(response));
        }
        Ok(response.body)
    }

    fn url(&self, path: &str, id: Option<u64>) -> Result<Url, ClientError> {
        transport::resource_url(&self.base_url, path, id).map_err(ClientError::InvalidUrl)
    }
}

fn error_from_response(response: HttpResponse) -> ClientError {
    if response.body.trim().is_empty() {
        return ClientError::HttpStatus {
            status: response.status,
            body: None,
        };
    }
    match transport::decode_api_error_payload(&response.body) {
        Ok(payload) => ClientError::Api {
            status: response.status,
            payload,
        },
        Err(_) => ClientError::HttpStatus {
            status: response.status,
            body: Some(response.body),
        },
    }
}

fn parse_error(err: TransportError) -> ClientError {
    ClientError::Parse(Box::new(err))
}

impl DataGateway for TuCreditoClient {
    async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, ClientError> {
        let url = transport::list_url(&self.base_url, R::PATH, query)
            .map_err(ClientError::InvalidUrl)?;
        let body = self.execute(Method::Get, url, None).await?;
        transport::decode_page(&body).map_err(parse_error)
    }

    async fn get<R: Resource>(&self, id: u64) -> Result<R, ClientError> {
        let url = self.url(R::PATH, Some(id))?;
        let body = self.execute(Method::Get, url, None).await?;
        transport::decode_json(&body).map_err(parse_error)
    }

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ClientError> {
        let url = self.url(R::PATH, None)?;
        let payload = transport::encode_json(draft).map_err(parse_error)?;
        let body = self.execute(Method::Post, url, Some(payload)).await?;
        transport::decode_json(&body).map_err(parse_error)
    }

    async fn update<R: Resource>(&self, id: u64, draft: &R::Draft) -> Result<R, ClientError> {
        let url = self.url(R::PATH, Some(id))?;
        let payload = transport::encode_json(draft).map_err(parse_error)?;
        let body = self.execute(Method::Put, url, Some(payload)).await?;
        transport::decode_json(&body).map_err(parse_error)
    }

    async fn delete<R: Resource>(&self, id: u64) -> Result<(), ClientError> {
        let url = self.url(R::PATH, Some(id))?;
        self.execute(Method::Delete, url, None).await?;
        Ok(())
    }
}
