//! Betamax HTTP client
//!
//! Sign-in and catalog lookups against the Betamax backend. Lookups that
//! take parameters are form-encoded POSTs; list endpoints are plain GETs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::BetamaxApi;
use crate::models::{Account, Genre, TvChannel};
use crate::resource::{Classify, ErrorKind};

/// Betamax API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected payload: {0}")]
    Mapping(String),
}

impl Classify for ApiError {
    fn classify(&self) -> ErrorKind {
        match self {
            ApiError::Transport(e) => e.classify(),
            ApiError::Io(_) => ErrorKind::NetworkFailure,
            ApiError::Status(_) | ApiError::InvalidResponse(_) | ApiError::Mapping(_) => {
                ErrorKind::MalformedRequest
            }
        }
    }
}

/// Betamax API client
pub struct BetamaxClient {
    base_url: String,
    client: reqwest::Client,
}

impl BetamaxClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(
            base_url,
            reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        )
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(method = "GET", %endpoint, "betamax request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn post_form<T, F>(&self, endpoint: &str, form: &F) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        F: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(method = "POST", %endpoint, "betamax request");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, ApiError> {
        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            status => Err(ApiError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl BetamaxApi for BetamaxClient {
    async fn signin(&self, imei: &str, email: &str, password: &str) -> Result<AccountDto, ApiError> {
        let form = [("imei", imei), ("email", email), ("password", password)];
        self.post_form("/signin", &form).await
    }

    async fn tv_channel(&self, id: u64) -> Result<TvChannelsDto, ApiError> {
        let id = id.to_string();
        self.post_form("/tvchannel", &[("tvchannel_id", id.as_str())]).await
    }

    async fn tv_genres(&self) -> Result<GenresDto, ApiError> {
        self.get("/tvgenres").await
    }

    async fn tv_channels(&self) -> Result<TvChannelsDto, ApiError> {
        self.get("/tvchannels").await
    }

    async fn tv_channels_by_genre(&self, genre_id: u32) -> Result<TvChannelsDto, ApiError> {
        let genre_id = genre_id.to_string();
        self.post_form("/tvchannels_by_genre", &[("genre_id", genre_id.as_str())])
            .await
    }
}

// =============================================================================
// Transport Payloads
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl AccountDto {
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            name: self.name,
            email: self.email.filter(|e| !e.is_empty()),
            token: self.token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvChannelsDto {
    #[serde(default)]
    pub tvchannels: Vec<TvChannelDto>,
}

impl TvChannelsDto {
    pub fn into_channels(self) -> Vec<TvChannel> {
        self.tvchannels
            .into_iter()
            .map(TvChannelDto::into_channel)
            .collect()
    }

    /// Single-channel lookups answer with a one-element list
    pub fn into_first(self) -> Result<TvChannel, ApiError> {
        self.tvchannels
            .into_iter()
            .next()
            .map(TvChannelDto::into_channel)
            .ok_or_else(|| ApiError::Mapping("empty tvchannels list".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvChannelDto {
    pub tvchannel_id: u64,
    pub title: String,
    #[serde(default)]
    pub banner: Option<String>,
    pub sd_url: String,
    pub hd_url: String,
    pub fhd_url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub genre: Option<u32>,
}

impl TvChannelDto {
    fn into_channel(self) -> TvChannel {
        TvChannel {
            id: self.tvchannel_id,
            title: self.title,
            banner: self.banner.filter(|b| !b.is_empty()),
            sd_url: self.sd_url,
            hd_url: self.hd_url,
            fhd_url: self.fhd_url,
            user_agent: self.user_agent.unwrap_or_default(),
            // 0 is the API's "no genre"
            genre_id: self.genre.filter(|g| *g != 0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenresDto {
    #[serde(default)]
    pub genres: Vec<GenreDto>,
}

impl GenresDto {
    pub fn into_genres(self) -> Vec<Genre> {
        self.genres
            .into_iter()
            .map(|g| Genre {
                id: g.genre_id,
                title: g.title,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreDto {
    pub genre_id: u32,
    pub title: String,
}
