//! CLI - Command Line Interface for Betamax
//!
//! Every request prints the states it goes through. With `--json`, each
//! state is one JSON line on stdout, so scripts can follow a request the
//! same way a screen would.
//!
//! # Examples
//!
//! ```bash
//! betamax signin --email a@b.com --password hunter2
//! betamax channel 12 --quality fhd --json
//! betamax channels --genre 3 --limit 10
//! betamax play 12 --player mpv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::VideoQuality;
use crate::player::PlayerType;
use crate::resource::{ErrorKind, Resource};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Connectivity failure
    NetworkError = 3,
    /// Malformed request or response
    MalformedRequest = 4,
    /// Local player could not be started
    PlayerFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<ErrorKind> for ExitCode {
    fn from(kind: ErrorKind) -> ExitCode {
        match kind {
            ErrorKind::NetworkFailure => ExitCode::NetworkError,
            ErrorKind::MalformedRequest => ExitCode::MalformedRequest,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Betamax - live TV catalog client
#[derive(Parser, Debug)]
#[command(
    name = "betamax",
    version,
    about = "Live TV catalog client with HLS playback handoff",
    after_help = "EXAMPLES:\n\
                  betamax signin -e a@b.com -p secret   Sign in\n\
                  betamax channel 12 -Q fhd             Show a channel and its stream URL\n\
                  betamax channels -g 3                 List channels in a genre\n\
                  betamax play 12 --player mpv          Play a channel locally"
)]
pub struct Cli {
    /// Print every request state as a JSON line (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password
    Signin(SigninCmd),

    /// Show a channel and the stream URL for a quality
    #[command(visible_alias = "ch")]
    Channel(ChannelCmd),

    /// List TV genres
    #[command(visible_alias = "g")]
    Genres(GenresCmd),

    /// List channels, optionally filtered by genre
    #[command(visible_alias = "ls")]
    Channels(ChannelsCmd),

    /// Play a channel in VLC or mpv
    #[command(visible_alias = "p")]
    Play(PlayCmd),
}

/// Sign in to the Betamax API
#[derive(Args, Debug)]
pub struct SigninCmd {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Account password
    #[arg(long, short = 'p')]
    pub password: String,

    /// Device id (defaults to the configured or generated one)
    #[arg(long)]
    pub imei: Option<String>,
}

/// Look up a single channel
#[derive(Args, Debug)]
pub struct ChannelCmd {
    /// Channel id
    #[arg(required = true)]
    pub id: u64,

    /// Stream quality (sd, hd, fhd); defaults to the configured one
    #[arg(long, short = 'Q')]
    pub quality: Option<VideoQuality>,
}

/// List genres
#[derive(Args, Debug)]
pub struct GenresCmd {}

/// List channels
#[derive(Args, Debug)]
pub struct ChannelsCmd {
    /// Genre id (0 or omitted lists every channel)
    #[arg(long, short = 'g')]
    pub genre: Option<u32>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,

    /// Leave this channel out (the one already playing)
    #[arg(long, short = 'x')]
    pub exclude: Option<u64>,
}

/// Play a channel locally
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Channel id
    #[arg(required = true)]
    pub id: u64,

    /// Stream quality (sd, hd, fhd); defaults to the configured one
    #[arg(long, short = 'Q')]
    pub quality: Option<VideoQuality>,

    /// Player to use; defaults to the configured one, then VLC
    #[arg(long, value_enum)]
    pub player: Option<PlayerChoice>,

    /// Start position in seconds
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Return once the player has started instead of waiting for it to close
    #[arg(long)]
    pub detach: bool,
}

/// Player choice for local playback
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    /// VLC media player (default)
    #[default]
    Vlc,
    /// mpv media player
    Mpv,
}

impl From<PlayerChoice> for PlayerType {
    fn from(choice: PlayerChoice) -> PlayerType {
        match choice {
            PlayerChoice::Vlc => PlayerType::Vlc,
            PlayerChoice::Mpv => PlayerType::Mpv,
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Error line printed to stderr in JSON mode
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub error: String,
    pub exit_code: i32,
}

impl JsonError {
    pub fn new(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            error: msg.into(),
            exit_code: code.into(),
        }
    }
}

/// Output handler
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print one request state (JSON mode only)
    pub fn state<T: Serialize>(&self, resource: &Resource<T>) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(resource)?);
        } else if resource.is_loading() {
            self.info("Loading...");
        }
        Ok(())
    }

    /// Print the final result (human mode only; JSON mode already streamed it)
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if !self.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonError::new(msg.as_str(), code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_error_kind_exit_codes() {
        assert_eq!(ExitCode::from(ErrorKind::NetworkFailure), ExitCode::NetworkError);
        assert_eq!(ExitCode::from(ErrorKind::MalformedRequest), ExitCode::MalformedRequest);
        assert_eq!(i32::from(ExitCode::MalformedRequest), 4);
    }

    #[test]
    fn test_json_error_output() {
        let out = JsonError::new("boom", ExitCode::NetworkError);
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"error":"boom","exit_code":3}"#);
    }
}
