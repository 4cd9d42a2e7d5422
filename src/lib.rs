//! Betamax - live TV catalog client
//!
//! Signs users in, looks up channels and genres, and hands HLS streams to
//! a local player. Every remote call is exposed as a short stream of
//! [`Resource`] states: loading started, one result, loading ended.
//!
//! # Modules
//!
//! - `resource` - State sequence, error classification, the load pipeline
//! - `models` - Accounts, channels, genres, video quality
//! - `api` - Remote API trait and its HTTP client
//! - `repository` - One state stream per request kind
//! - `player` - VLC/mpv handoff
//! - `config` - Config file and environment overrides
//! - `cli` / `commands` - Command line front end

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod player;
pub mod repository;
pub mod resource;

// Re-export commonly used types
pub use models::{Account, Genre, PlayerContent, TvChannel, VideoQuality};
pub use resource::{load, Classify, ErrorKind, LoadState, Resource, ResourceStream};

pub use api::{ApiError, BetamaxApi, BetamaxClient};
pub use repository::{SigninRepository, TvChannelRepository};
