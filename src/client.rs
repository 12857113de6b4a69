use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::api_endpoint;
use crate::config::LanternConfig;
use crate::endpoints::PhotoListRoute;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

/// One call against the gallery backend.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: RequestBody,
    headers: HeaderMap,
    auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach the session token, if there is one.
    pub fn authenticated(mut self) -> Self {
        self.auth = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
    photo_list_route: PhotoListRoute,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            photo_list_route: PhotoListRoute::default(),
        }
    }

    pub fn from_config(config: &LanternConfig, session: Session) -> ApiResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            photo_list_route: config.photo_list_route,
        })
    }

    pub fn with_photo_list_route(mut self, route: PhotoListRoute) -> Self {
        self.photo_list_route = route;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn photo_list_route(&self) -> PhotoListRoute {
        self.photo_list_route
    }

    pub fn url(&self, path: &str) -> String {
        api_endpoint!(self.base_url, "{}", path)
    }

    /// Sends the request and returns the JSON body, or `None` when the server sent nothing.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<Option<serde_json::Value>> {
        let ApiRequest {
            method,
            path,
            body,
            mut headers,
            auth,
        } = request;

        // Multipart bodies get their content type, boundary included, from reqwest.
        if matches!(body, RequestBody::Multipart(_)) {
            headers.remove(CONTENT_TYPE);
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let request_builder = self
            .http
            .request(method.clone(), self.url(&path))
            .headers(headers);
        let mut request_builder = match body {
            RequestBody::Multipart(form) => request_builder.multipart(form),
            RequestBody::Json(value) => request_builder.json(&value),
            RequestBody::Empty => request_builder,
        };
        if auth {
            request_builder = self.session.authorize(request_builder);
        }

        let start = Instant::now();
        let resp = request_builder.send().await?;
        let status = resp.status();
        let log_line = format!(
            "{} {} {} {:.2}ms",
            method,
            path,
            status.as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        match status.as_u16() {
            200..=299 => debug!("{}", log_line),
            400..=499 => warn!("{}", log_line),
            _ => error!("{}", log_line),
        }

        if !status.is_success() {
            // An unreadable error body still reports the status.
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &text));
        }
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Sends the request and decodes the body into `T`; an empty body is an error.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let value = self.send(request).await?.ok_or(ApiError::EmptyResponse)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Like [`fetch`](Self::fetch), but an empty body is `None`.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ApiResult<Option<T>> {
        match self.send(request).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Sends the request and ignores whatever body comes back.
    pub async fn send_discarding(&self, request: ApiRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}
