use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::USER_AGENT;

use crate::config::FetcherConfig;
use crate::errors::FetchError;
use crate::source::{CentralBankOfRussia, IsSource};

/// Retrieves the raw document published for a date.
#[async_trait]
pub trait Fetcher {
    /// Returns the undecoded response body for the given date.
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError>;
}

/// Fetches daily documents from the central bank over HTTP.
pub struct HttpFetcher {
    client: reqwest::Client,
    source: CentralBankOfRussia,
    user_agent: String,
}

impl HttpFetcher {
    /// Builds a fetcher from the given configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Client(err.to_string()))?;

        Ok(Self {
            client,
            source: CentralBankOfRussia::with_base_url(config.base_url.clone()),
            user_agent: config.user_agent.clone(),
        })
    }

    /// The source the fetcher builds its URLs with.
    pub fn source(&self) -> &CentralBankOfRussia {
        &self.source
    }

    /// Issues a `GET` to the given URL and returns the body of a successful response.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|err| FetchError::Request {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|err| FetchError::Body {
                url: url.to_string(),
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let url = self.source.get_url(date);
        self.get(&url).await
    }
}
