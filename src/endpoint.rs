use crate::config::Config;
use crate::error::ClientError;
use crate::types::{EndpointResponse, PracticePayload, ResetRequest};
use chrono::Utc;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Apps Script only skips the CORS preflight for plain-text bodies, so JSON
/// is sent under this content type.
const PLAIN_TEXT_UTF8: &str = "text/plain;charset=utf-8";
const LOG_VIA_GET_ACTION: &str = "logViaGet";

/// The log sheet endpoint.
///
/// `post_log` and `fetch_logs` return the parsed reply. `beacon_log` and
/// `reset_season` are one-way: they succeed once the request has been
/// dispatched and never look at the reply.
#[allow(async_fn_in_trait)]
pub trait Endpoint {
    async fn post_log(&self, payload: &PracticePayload) -> Result<EndpointResponse, ClientError>;

    /// All logs when `name` is `None`, otherwise one athlete's.
    async fn fetch_logs(&self, name: Option<&str>) -> Result<EndpointResponse, ClientError>;

    async fn beacon_log(&self, payload: &PracticePayload) -> Result<(), ClientError>;

    async fn reset_season(&self, request: &ResetRequest) -> Result<(), ClientError>;
}

pub struct HttpEndpoint {
    client: Client,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let url = Url::parse(&config.endpoint_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.endpoint_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn logs_url(&self, name: Option<&str>) -> Url {
        let mut url = self.url.clone();
        if let Some(name) = name {
            url.query_pairs_mut().append_pair("name", name);
        }
        url
    }

    fn beacon_url(&self, payload: &PracticePayload) -> Result<Url, ClientError> {
        let data = serde_json::to_string(payload)?;
        let mut url = self.url.clone();
        // Form encoding (space as `+`); Apps Script decodes it like `%20`.
        url.query_pairs_mut()
            .append_pair("action", LOG_VIA_GET_ACTION)
            .append_pair("data", &data)
            .append_pair("_", &Utc::now().timestamp_millis().to_string());
        Ok(url)
    }
}

impl Endpoint for HttpEndpoint {
    async fn post_log(&self, payload: &PracticePayload) -> Result<EndpointResponse, ClientError> {
        let body = serde_json::to_string(payload)?;
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, PLAIN_TEXT_UTF8)
            .body(body)
            .send()
            .await?;

        debug!("Log POST answered with {}", response.status());
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_logs(&self, name: Option<&str>) -> Result<EndpointResponse, ClientError> {
        let response = self.client.get(self.logs_url(name)).send().await?;
        debug!("Log GET answered with {}", response.status());
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn beacon_log(&self, payload: &PracticePayload) -> Result<(), ClientError> {
        let url = self.beacon_url(payload)?;
        let response = self.client.get(url).send().await?;
        info!("Fallback beacon dispatched ({})", response.status());
        Ok(())
    }

    async fn reset_season(&self, request: &ResetRequest) -> Result<(), ClientError> {
        let body = serde_json::to_string(request)?;
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, PLAIN_TEXT_UTF8)
            .body(body)
            .send()
            .await?;
        info!("Season reset dispatched ({})", response.status());
        Ok(())
    }
}
