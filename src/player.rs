//! Local Player - VLC/mpv handoff for HLS channels
//!
//! Betamax does not decode video itself. A selected stream URL is handed to
//! an external player along with the channel's user agent and resume position.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};

use crate::models::PlayerContent;

/// Supported local players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerType {
    /// VLC media player (default)
    #[default]
    Vlc,
    /// mpv media player
    Mpv,
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Mpv => "mpv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vlc" => Ok(PlayerType::Vlc),
            "mpv" => Ok(PlayerType::Mpv),
            other => Err(format!("Unknown player: {} (expected vlc or mpv)", other)),
        }
    }
}

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Stream URL is empty")]
    EmptyUrl,
}

/// Local player for HLS channels
pub struct LocalPlayer {
    player_type: PlayerType,
}

impl LocalPlayer {
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        let cmd = self.player_type.command();

        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Command-line arguments for playing `content`
    pub fn args(&self, content: &PlayerContent) -> Vec<String> {
        let start = content.position.as_secs();
        let mut args = vec![content.url.clone()];

        match self.player_type {
            PlayerType::Vlc => {
                if !content.user_agent.is_empty() {
                    args.push(format!("--http-user-agent={}", content.user_agent));
                }
                if start > 0 {
                    args.push(format!("--start-time={}", start));
                }
                args.push("--no-video-title-show".to_string());
            }
            PlayerType::Mpv => {
                if !content.user_agent.is_empty() {
                    args.push(format!("--user-agent={}", content.user_agent));
                }
                if start > 0 {
                    args.push(format!("--start={}", start));
                }
                args.push("--force-window=immediate".to_string());
            }
        }

        args
    }

    /// Spawn the player for `content`
    pub async fn play(&self, content: &PlayerContent) -> Result<Child, PlayerError> {
        if content.url.is_empty() {
            return Err(PlayerError::EmptyUrl);
        }

        tracing::info!(player = %self.player_type, url = %content.url, "starting local player");

        let mut cmd = Command::new(self.player_type.command());
        cmd.args(self.args(content));
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.player_type.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })
    }

    /// Play and wait for the player to close
    pub async fn play_and_wait(&self, content: &PlayerContent) -> Result<(), PlayerError> {
        let mut child = self.play(content).await?;
        child.wait().await?;
        Ok(())
    }
}
