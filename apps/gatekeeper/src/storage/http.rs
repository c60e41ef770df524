use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use tracing::debug;

use super::{FetchCause, FetchError, KeySource, ObjectLocation};

/// RFC 3986 unreserved characters stay literal; everything else (including `/`) is escaped.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Object-store JSON API client (`GET /storage/v1/b/{bucket}/o/{object}?alt=media`).
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpKeySource {
    pub fn new(
        endpoint: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        // no idle pooling: each fetch opens and closes its own connection
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn object_url(&self, location: &ObjectLocation) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.endpoint,
            utf8_percent_encode(&location.bucket, OBJECT_NAME),
            utf8_percent_encode(&location.key, OBJECT_NAME),
        )
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn load(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError> {
        let url = self.object_url(location);
        debug!(%location, "Fetching key object");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::new(location, e))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::new(location, e))?;
                Ok(body.to_vec())
            }
            StatusCode::NOT_FOUND => Err(FetchError::new(location, FetchCause::NotFound)),
            status => Err(FetchError::new(location, FetchCause::Status(status.as_u16()))),
        }
    }
}
