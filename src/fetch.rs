//! HTTP helpers for making requests to the Zijag Hub API

use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    multipart::Form,
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::auth::AuthSession;
use crate::error::{Error, Result};

enum Body {
    Json(Vec<u8>),
    Multipart(Form),
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Body>,
    pending_error: Option<Error>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
            pending_error: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Attach the session credential; a missing or expired session fails the request before it is sent
    pub fn session(self, session: Option<&AuthSession>) -> Self {
        match session {
            Some(session) if session.is_expired() => {
                self.fail(Error::auth("Session expired, please log in again"))
            }
            Some(session) => {
                let token = session.token().to_string();
                self.bearer_auth(&token)
            }
            None => self.fail(Error::auth("Not logged in")),
        }
    }

    /// Add a query parameter to the request; empty values are skipped
    pub fn query(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.query_params.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(json) => {
                self.headers
                    .insert("Content-Type", HeaderValue::from_static("application/json"));
                self.body = Some(Body::Json(json));
                self
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Add a multipart body to the request
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    fn fail(mut self, err: Error) -> Self {
        if self.pending_error.is_none() {
            self.pending_error = Some(err);
        }
        self
    }

    /// Build the request
    fn build(self) -> Result<RequestBuilder> {
        if let Some(err) = self.pending_error {
            return Err(err);
        }

        let mut url = Url::parse(&self.url)?;
        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!("{} {}", self.method, url);
        let mut req = self.client.request(self.method, url.as_str());
        req = req.headers(self.headers);

        req = match self.body {
            Some(Body::Json(body)) => req.body(body),
            Some(Body::Multipart(form)) => req.multipart(form),
            None => req,
        };

        Ok(req)
    }

    /// Execute the request and return the response if its status is a success
    pub async fn send(self) -> Result<Response> {
        let req = self.build()?;
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request, ignoring any response body
    pub async fn execute_empty(self) -> Result<()> {
        self.send().await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

/// Turn a non-success response into `Error::Api`, preferring the server's `message`
async fn api_error(response: Response) -> Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    warn!("Request failed with status {}: {}", status, message);
    Error::api(status.as_u16(), message)
}

/// Everything an endpoint client needs to reach the API: base URL, HTTP client and credential
#[derive(Debug, Clone)]
pub struct Transport {
    base_url: String,
    client: Client,
    session: Option<AuthSession>,
    client_info: String,
}

impl Transport {
    pub(crate) fn new(
        base_url: &str,
        client: Client,
        session: Option<AuthSession>,
        client_info: &str,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
            client_info: client_info.to_string(),
        }
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The credential attached to requests, if any
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Start an authenticated request
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        self.anonymous(method, path).session(self.session.as_ref())
    }

    /// Start an authenticated request for the record `id` under `resource`
    pub fn record_request(&self, method: Method, resource: &str, id: &str) -> FetchBuilder<'_> {
        match self.record_url(resource, id) {
            Ok(url) => FetchBuilder::new(&self.client, url.as_str(), method)
                .header("X-Client-Info", &self.client_info)
                .session(self.session.as_ref()),
            Err(err) => FetchBuilder::new(&self.client, &self.url(resource), method).fail(err),
        }
    }

    /// URL of one record; `id` is percent-encoded as a single path segment
    pub fn record_url(&self, resource: &str, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(resource))?;
        url.path_segments_mut()
            .map_err(|_| Error::validation(format!("{} cannot address records", self.base_url)))?
            .push(id);
        Ok(url)
    }

    /// Start a request that carries no credential (login)
    pub fn anonymous(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.client, &self.url(path), method)
            .header("X-Client-Info", &self.client_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new("http://localhost:3000/api/", Client::new(), None, "zijag-hub-test")
    }

    #[test]
    fn test_record_url_encodes_identifier() {
        let transport = transport();
        assert_eq!(
            transport.record_url("/expenses", "e1").unwrap().as_str(),
            "http://localhost:3000/api/expenses/e1"
        );
        assert_eq!(
            transport.record_url("/auth/users", "a/b?c#d").unwrap().as_str(),
            "http://localhost:3000/api/auth/users/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_record_request_without_session_fails_before_sending() {
        let err = transport()
            .record_request(Method::DELETE, "/expenses", "e1")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
