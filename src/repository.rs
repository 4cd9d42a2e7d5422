//! Repositories: one state stream per request kind
//!
//! Each method owns its parameters and returns a `'static` stream, so a
//! consumer can move it into a task or drop it to cancel the request.

use std::sync::Arc;

use futures::StreamExt;

use crate::api::{ApiError, BetamaxApi};
use crate::models::{Account, Genre, TvChannel};
use crate::resource::{load, ResourceStream};

/// Sign-in requests
pub struct SigninRepository<A> {
    api: Arc<A>,
}

impl<A: BetamaxApi + 'static> SigninRepository<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn signin(&self, imei: &str, email: &str, password: &str) -> ResourceStream<'static, Account> {
        let api = Arc::clone(&self.api);
        let (imei, email, password) = (imei.to_string(), email.to_string(), password.to_string());

        load(async move {
            let dto = api.signin(&imei, &email, &password).await?;
            Ok::<_, ApiError>(dto.into_account())
        })
        .boxed()
    }
}

impl<A> Clone for SigninRepository<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Channel, genre and related-channel lookups
pub struct TvChannelRepository<A> {
    api: Arc<A>,
}

impl<A: BetamaxApi + 'static> TvChannelRepository<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Look up a single channel; an empty answer is a malformed response
    pub fn tv_channel(&self, id: u64) -> ResourceStream<'static, TvChannel> {
        let api = Arc::clone(&self.api);
        load(async move { api.tv_channel(id).await?.into_first() }).boxed()
    }

    pub fn tv_genres(&self) -> ResourceStream<'static, Vec<Genre>> {
        let api = Arc::clone(&self.api);
        load(async move {
            let dto = api.tv_genres().await?;
            Ok::<_, ApiError>(dto.into_genres())
        })
        .boxed()
    }

    pub fn tv_channels(&self) -> ResourceStream<'static, Vec<TvChannel>> {
        let api = Arc::clone(&self.api);
        load(async move {
            let dto = api.tv_channels().await?;
            Ok::<_, ApiError>(dto.into_channels())
        })
        .boxed()
    }

    pub fn tv_channels_by_genre(&self, genre_id: u32) -> ResourceStream<'static, Vec<TvChannel>> {
        let api = Arc::clone(&self.api);
        load(async move {
            let dto = api.tv_channels_by_genre(genre_id).await?;
            Ok::<_, ApiError>(dto.into_channels())
        })
        .boxed()
    }

    /// Channels shown next to the player: all of them, or one genre
    ///
    /// Genre `0` is the "all" chip and behaves like `None`.
    pub fn related_tv_channels(&self, genre: Option<u32>) -> ResourceStream<'static, Vec<TvChannel>> {
        match genre.filter(|g| *g != 0) {
            Some(genre_id) => self.tv_channels_by_genre(genre_id),
            None => self.tv_channels(),
        }
    }
}

impl<A> Clone for TvChannelRepository<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}
