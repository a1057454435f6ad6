//! HTTP client for the store protocol.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use agora_core::error::{AuthError, Error, InvalidInputError, ProtocolError, TransportError};
use agora_core::{AccessToken, Collection, RecordId, Result, StoreUrl};

use crate::wire::ErrorResponse;

fn transport(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// HTTP client bound to one store and, optionally, one bearer token.
#[derive(Debug, Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    base: StoreUrl,
}

impl RestClient {
    /// Create a client. The token, if any, is sent with every request.
    pub fn new(base: StoreUrl, token: Option<&AccessToken>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| InvalidInputError::Other {
                    message: "access token contains invalid header characters".into(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("agora/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(Self { client, base })
    }

    /// URL of `/v1/{collection}` or `/v1/{collection}/{id}{suffix}`.
    pub fn url(&self, collection: Collection, id: Option<&RecordId>, suffix: &str) -> Result<Url> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::StoreUrl {
                value: self.base.as_str().to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let mut url = Url::parse(&self.base.endpoint("v1")).map_err(|e| invalid(&e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("cannot be a base URL"))?;
            segments.push(collection.as_str());
            if let Some(id) = id {
                segments.push(&format!("{}{}", id.as_str(), suffix));
            }
        }
        Ok(url)
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Store request");
        self.client.request(method, url)
    }

    /// Send a request and decode a JSON body.
    pub async fn fetch<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = self.send(request).await?;
        response.json::<R>().await.map_err(|e| {
            ProtocolError::new(200, Some("InvalidBody".into()), Some(e.to_string())).into()
        })
    }

    /// Send a request whose response body is ignored.
    pub async fn execute(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        trace!(status = %status, "Store response");

        if status.is_success() {
            return Ok(response);
        }

        let error = parse_error_response(response).await;
        Err(match error.status {
            401 => AuthError::Unauthorized(describe(&error)).into(),
            403 => AuthError::Forbidden(describe(&error)).into(),
            _ => error.into(),
        })
    }
}

async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status().as_u16();
    match response.json::<ErrorResponse>().await {
        Ok(body) => ProtocolError::new(status, body.error, body.message),
        Err(_) => ProtocolError::new(status, None, None),
    }
}

fn describe(error: &ProtocolError) -> String {
    error
        .message
        .clone()
        .or_else(|| error.error.clone())
        .unwrap_or_else(|| format!("HTTP {}", error.status))
}
