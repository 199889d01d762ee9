use std::collections::HashMap;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, StatusCode,
};
use thiserror::Error;
use url::Url;

use crate::structs::game::{GameDetail, GameId, GameSummary};

use super::variable::Config;

pub const DEFAULT_API_URL: &str = "https://www.cheapshark.com/api/1.0";

const GAMES_ENDPOINT: &str = "games";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    UrlError(#[from] url::ParseError),

    #[error("API url cannot be used as a base: {0}")]
    InvalidBase(String),

    #[error("Unexpected response status {0}")]
    StatusError(StatusCode),

    #[error(transparent)]
    DecodeError(#[from] serde_json::Error),

    #[error("No detail found for game {0}")]
    MissingDetail(GameId),
}

/// The two lookups the widget needs from the pricing API.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn search_games(&self, title: &str) -> Result<Vec<GameSummary>, ApiError>;

    async fn game_detail(&self, game_id: &GameId) -> Result<GameDetail, ApiError>;
}

pub struct CheapSharkClient {
    base: Url,
    reqwest_client: Client,
}

impl CheapSharkClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base = Url::parse(&config.api_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBase(config.api_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(CheapSharkClient {
            base,
            reqwest_client: builder.build()?,
        })
    }

    fn endpoint(&self, key: &str, value: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBase(self.base.to_string()))?
            .pop_if_empty()
            .push(GAMES_ENDPOINT);
        url.query_pairs_mut().append_pair(key, value);

        Ok(url)
    }

    pub fn search_url(&self, title: &str) -> Result<Url, ApiError> {
        self.endpoint("title", title)
    }

    pub fn detail_url(&self, game_id: &GameId) -> Result<Url, ApiError> {
        self.endpoint("ids", game_id.as_str())
    }

    async fn request(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self.reqwest_client.get(url.clone()).send().await?;
        info!("Requested: {}", url);

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered with {}", url, status);
            return Err(ApiError::StatusError(status));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl GameApi for CheapSharkClient {
    async fn search_games(&self, title: &str) -> Result<Vec<GameSummary>, ApiError> {
        let body = self.request(self.search_url(title)?).await?;

        Ok(serde_json::from_slice(&body)?)
    }

    async fn game_detail(&self, game_id: &GameId) -> Result<GameDetail, ApiError> {
        let body = self.request(self.detail_url(game_id)?).await?;
        let mut details: HashMap<String, GameDetail> = serde_json::from_slice(&body)?;

        details
            .remove(game_id.as_str())
            .ok_or_else(|| ApiError::MissingDetail(game_id.clone()))
    }
}
