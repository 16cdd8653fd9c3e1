//! HTTP request primitive shared by every SpendTrack accessor

use log::{debug, error};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::envelope;
use crate::error::{Error, Result};

/// Error body the backend sends with a failing status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<Value>,
}

/// Helper for building and executing one backend request
///
/// Every request carries `Content-Type: application/json`. The bearer token,
/// when one is known, is attached by [`crate::SpendTrack::request`].
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    segments: Vec<String>,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            segments: Vec::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request, replacing any previous value
    ///
    /// Names or values that are not valid HTTP header text are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => debug!("Skipping invalid header {:?}", name),
        }
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(agent) {
            self.headers.insert(USER_AGENT, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Append caller-supplied path segments, each percent-encoded as one segment
    pub fn segments(mut self, segments: &[&str]) -> Self {
        self.segments
            .extend(segments.iter().map(|segment| segment.to_string()));
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Serialize a JSON body for the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;

        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
                .pop_if_empty()
                .extend(&self.segments);
        }

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self
            .client
            .request(self.method.clone(), url.as_str())
            .headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and return the decoded JSON body
    ///
    /// An empty success body decodes to [`Value::Null`].
    pub async fn send(self) -> Result<Value> {
        let result = self.dispatch().await;
        if let Err(err) = &result {
            error!("API request failed: {} {}: {}", self.method, self.url, err);
        }
        result
    }

    /// Execute the request and deserialize the record it returns into `T`
    ///
    /// A `{ success, data }` envelope around the record is unwrapped first.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.send().await?;
        envelope::into_single(value)
    }

    async fn dispatch(&self) -> Result<Value> {
        let req = self.build()?;
        debug!("{} {}", self.method, self.url);

        let response = req.send().await.map_err(Error::Transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Error::Transport)?;

        decode_response(status, &body)
    }
}

/// Turn a status and raw body into the request outcome
pub(crate) fn decode_response(status: u16, body: &[u8]) -> Result<Value> {
    if !(200..300).contains(&status) {
        return Err(Error::http(status, error_message(status, body)));
    }

    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(body)?)
}

fn error_message(status: u16, body: &[u8]) -> String {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();

    parsed
        .and_then(|b| {
            b.message
                .filter(|m| !m.is_empty())
                .or_else(|| match b.error {
                    Some(Value::String(s)) if !s.is_empty() => Some(s),
                    _ => None,
                })
        })
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}
