use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use super::error::ClientError;

/// Synchronous transform applied to every outgoing request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: Request) -> Request;
}

/// Adds `Authorization: Bearer <token>`.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, mut request: Request) -> Request {
        match HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            Ok(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => tracing::warn!("API token contains invalid header characters, sending unauthenticated"),
        }
        request
    }
}

/// JSON-over-HTTP client rooted at the API base URL (e.g. `http://host/api/`).
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

pub struct ApiClientBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiClientBuilder {
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Interceptors run in registration order.
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http: self.http.unwrap_or_default(),
                base_url,
                interceptors: self.interceptors,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            http: None,
            interceptors: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve `path` (relative, e.g. `tenants/1/`) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Run the interceptor chain over a built request.
    pub fn prepare(&self, request: Request) -> Request {
        self.inner
            .interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.intercept(request))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        let request = self.inner.http.request(Method::GET, url).build()?;
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(Method::PATCH, path, body).await
    }

    /// POST whose response body is ignored (e.g. 204 No Content).
    pub async fn post_empty(&self, path: &str) -> Result<(), ClientError> {
        let request = self
            .inner
            .http
            .request(Method::POST, self.url(path)?)
            .json(&json!({}))
            .build()?;
        self.execute(request).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.inner.http.request(Method::DELETE, self.url(path)?).build()?;
        self.execute(request).await?;
        Ok(())
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self
            .inner
            .http
            .request(method, self.url(path)?)
            .json(body)
            .build()?;
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        let request = self.prepare(request);
        tracing::debug!(method = %request.method(), url = %request.url(), "sending API request");

        let response = self.inner.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(_) if text.is_empty() => Value::Null,
            Err(_) => json!({ "detail": text }),
        };
        tracing::debug!(status = status.as_u16(), "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
