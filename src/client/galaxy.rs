//! Galaxy client module
//!
//! Provides `GalaxyClient` for making API requests to a Galaxy server.
//! Paths are given as segments and resolved relative to the configured root,
//! so a server mounted under a prefix (`https://usegalaxy.org/galaxy/`) works
//! unchanged. Each segment is percent-encoded, so an id can never escape
//! into another endpoint.

use super::Auth;
use crate::error::RequestError;
use base64::Engine;
use eyre::Result;
use owo_colors::OwoColorize;
use reqwest::{Client, Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Galaxy client for making API requests.
///
/// Every request either yields a successful (2xx) response or a
/// [`RequestError`]; non-2xx responses never reach the caller as `Ok`.
///
/// # Example
/// ```no_run
/// use galaxy_workflows::client::{Auth, GalaxyClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("http://localhost:8080/")?;
/// let client = GalaxyClient::try_new(url, Auth::Apikey("secret".into()))?;
///
/// let response = client.get(&["api", "workflows"]).await?;
/// let workflows: serde_json::Value = GalaxyClient::json(response).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct GalaxyClient {
    client: Client,
    url: Url,
}

impl GalaxyClient {
    /// Create a new GalaxyClient from a root URL and Auth.
    ///
    /// A root without a trailing slash is treated as a directory, so
    /// `http://host/galaxy` and `http://host/galaxy/` are equivalent.
    ///
    /// # Errors
    /// Returns an error if the auth headers are invalid or the HTTP client
    /// cannot be built
    pub fn try_new(url: Url, auth: Auth) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, "application/json".parse()?);
        match auth {
            Auth::Basic(username, password) => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                headers.append(
                    header::AUTHORIZATION,
                    format!("Basic {}", credentials).parse()?,
                );
            }
            Auth::Apikey(apikey) => {
                headers.append("x-api-key", apikey.parse()?);
            }
            Auth::None => {}
        }
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            url: with_trailing_slash(url),
        })
    }

    /// Get the root URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve API path segments against the root.
    ///
    /// `/` and `%` inside a segment are escaped. Empty, `.` and `..`
    /// segments are rejected rather than silently collapsed.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        if let Some(segment) = segments
            .iter()
            .find(|s| matches!(**s, "" | "." | ".."))
        {
            return Err(RequestError::invalid_request(format!(
                "invalid path segment '{}'",
                segment
            )));
        }

        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RequestError::invalid_request(format!("{} cannot be a base URL", self.url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request to a given path.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path segments, relative to the root
    /// * `body` - Optional JSON body
    pub async fn request(
        &self,
        method: Method,
        path: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, RequestError> {
        let url = self.endpoint(path)?;
        log::debug!("{} {}", method.as_str().green(), url.path());

        let request = self.client.request(method, url);
        let request = match body {
            Some(body) => {
                log::trace!("Sending request with body");
                request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
            }
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            log::trace!("No response received: {}", e);
            RequestError::request_failed()
        })?;

        if !response.status().is_success() {
            return Err(RequestError::from_response(response).await);
        }
        Ok(response)
    }

    /// Helper for GET requests.
    pub async fn get(&self, path: &[&str]) -> Result<reqwest::Response, RequestError> {
        self.request(Method::GET, path, None).await
    }

    /// Helper for POST requests with a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        value: &T,
    ) -> Result<reqwest::Response, RequestError> {
        let body = serde_json::to_vec(value).map_err(RequestError::invalid_request)?;
        self.request(Method::POST, path, Some(body)).await
    }

    /// Helper for PUT requests with a JSON body.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        value: &T,
    ) -> Result<reqwest::Response, RequestError> {
        let body = serde_json::to_vec(value).map_err(RequestError::invalid_request)?;
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Helper for DELETE requests.
    pub async fn delete(&self, path: &[&str]) -> Result<reqwest::Response, RequestError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Decode a successful response body as JSON.
    ///
    /// An empty body decodes as `null`.
    pub async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestError> {
        let bytes = response.bytes().await.map_err(|e| {
            log::trace!("Failed to read response body: {}", e);
            RequestError::request_failed()
        })?;

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(RequestError::invalid_response)?
        };
        serde_json::from_value(value).map_err(RequestError::invalid_response)
    }
}

impl std::fmt::Display for GalaxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
