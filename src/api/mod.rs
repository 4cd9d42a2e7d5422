//! Remote API for the Betamax catalog
//!
//! [`BetamaxApi`] is the seam repositories call through; [`BetamaxClient`]
//! is the HTTP implementation.

use async_trait::async_trait;

pub mod betamax;

pub use betamax::{
    AccountDto, ApiError, BetamaxClient, GenreDto, GenresDto, TvChannelDto, TvChannelsDto,
};

/// Remote calls: each accepts typed parameters and returns a transport payload or fails
#[async_trait]
pub trait BetamaxApi: Send + Sync {
    async fn signin(&self, imei: &str, email: &str, password: &str) -> Result<AccountDto, ApiError>;

    async fn tv_channel(&self, id: u64) -> Result<TvChannelsDto, ApiError>;

    async fn tv_genres(&self) -> Result<GenresDto, ApiError>;

    async fn tv_channels(&self) -> Result<TvChannelsDto, ApiError>;

    async fn tv_channels_by_genre(&self, genre_id: u32) -> Result<TvChannelsDto, ApiError>;
}
