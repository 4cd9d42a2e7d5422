//! Domain types for Betamax
//!
//! Shapes consumed by the rest of the client after transport mapping:
//! - **Account**: result of a successful sign-in
//! - **Catalog**: TV channels and the genres used to filter them
//! - **Playback**: quality selection and what the player is handed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// Account
// =============================================================================

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub token: Option<String>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}> (#{})", self.name, email, self.id),
            None => write!(f, "{} (#{})", self.name, self.id),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// TV genre, used to narrow the related channel list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub title: String,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// Live TV channel with one HLS URL per quality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvChannel {
    pub id: u64,
    pub title: String,
    pub banner: Option<String>,
    pub sd_url: String,
    pub hd_url: String,
    pub fhd_url: String,
    pub user_agent: String,
    pub genre_id: Option<u32>,
}

impl TvChannel {
    /// Stream URL for the given quality
    pub fn url_for(&self, quality: VideoQuality) -> &str {
        match quality {
            VideoQuality::Sd => &self.sd_url,
            VideoQuality::Hd => &self.hd_url,
            VideoQuality::Fhd => &self.fhd_url,
        }
    }
}

impl fmt::Display for TvChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Stream quality tier; discriminants match the API's integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Sd = 1,
    #[default]
    Hd = 2,
    Fhd = 3,
}

impl VideoQuality {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            VideoQuality::Sd => "SD",
            VideoQuality::Hd => "HD",
            VideoQuality::Fhd => "Full HD",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<u8> for VideoQuality {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(VideoQuality::Sd),
            2 => Ok(VideoQuality::Hd),
            3 => Ok(VideoQuality::Fhd),
            other => Err(format!("Unknown video quality code: {}", other)),
        }
    }
}

impl FromStr for VideoQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sd" | "1" => Ok(VideoQuality::Sd),
            "hd" | "2" => Ok(VideoQuality::Hd),
            "fhd" | "fullhd" | "3" => Ok(VideoQuality::Fhd),
            other => Err(format!("Unknown video quality: {} (expected sd, hd or fhd)", other)),
        }
    }
}

/// Everything the fullscreen player needs to pick up a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContent {
    pub url: String,
    pub user_agent: String,
    pub position: Duration,
}

impl PlayerContent {
    pub fn for_channel(channel: &TvChannel, quality: VideoQuality, position: Duration) -> Self {
        Self {
            url: channel.url_for(quality).to_string(),
            user_agent: channel.user_agent.clone(),
            position,
        }
    }

    /// Switch quality mid-playback, keeping the current position
    pub fn with_quality(&self, channel: &TvChannel, quality: VideoQuality) -> Self {
        Self::for_channel(channel, quality, self.position)
    }
}
