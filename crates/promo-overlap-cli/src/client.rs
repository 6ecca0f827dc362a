//! Blocking HTTP source for existing campaigns and the product catalog.

use promo_overlap::{
    parse_list, CampaignKind, CampaignRecord, CampaignSource, OverlapError, ProductRecord,
};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error(transparent)]
    Body(#[from] OverlapError),
}

/// Reads `/{kind}/active`, `/{kind}/pending` and `/products/active`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl HttpSource {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http: Client::new(),
        }
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str, authenticated: bool) -> Result<Vec<T>, ClientError> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self.http.get(&url);
        if authenticated {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        debug!(%url, authenticated, "fetching");
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ClientError::Status { url, status, body });
        }

        Ok(parse_list(&body)?)
    }
}

impl CampaignSource for HttpSource {
    type Error = ClientError;

    fn active_campaigns(&self, kind: CampaignKind) -> Result<Vec<CampaignRecord>, ClientError> {
        self.get_list(&format!("{}/active", kind.path_segment()), true)
    }

    fn pending_campaigns(&self, kind: CampaignKind) -> Result<Vec<CampaignRecord>, ClientError> {
        self.get_list(&format!("{}/pending", kind.path_segment()), true)
    }

    fn active_products(&self) -> Result<Vec<ProductRecord>, ClientError> {
        self.get_list("products/active", false)
    }
}
