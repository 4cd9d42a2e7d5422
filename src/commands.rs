//! CLI Command Handlers
//!
//! Each handler drives one repository stream to completion, printing every
//! state as it arrives, and turns the final state into an ExitCode.

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::api::BetamaxClient;
use crate::cli::{ChannelCmd, ChannelsCmd, ExitCode, GenresCmd, Output, PlayCmd, SigninCmd};
use crate::config::Config;
use crate::models::{PlayerContent, TvChannel, VideoQuality};
use crate::player::{LocalPlayer, PlayerType};
use crate::repository::{SigninRepository, TvChannelRepository};
use crate::resource::{LoadState, Resource};

/// Shared state for one CLI invocation
pub struct Context {
    pub config: Config,
    pub api: Arc<BetamaxClient>,
}

impl Context {
    /// Build the API client; `api_url` wins over env and config
    pub fn new(config: Config, api_url: Option<String>) -> Self {
        let base_url = api_url.unwrap_or_else(|| config.api_url());
        tracing::debug!(%base_url, "using betamax api");
        Self {
            api: Arc::new(BetamaxClient::new(base_url)),
            config,
        }
    }

    fn signin_repository(&self) -> SigninRepository<BetamaxClient> {
        SigninRepository::new(Arc::clone(&self.api))
    }

    fn tv_channel_repository(&self) -> TvChannelRepository<BetamaxClient> {
        TvChannelRepository::new(Arc::clone(&self.api))
    }
}

/// A channel with the stream URL picked for a quality
#[derive(Debug, Clone, Serialize)]
pub struct ChannelView {
    #[serde(flatten)]
    pub channel: TvChannel,
    pub quality: VideoQuality,
    pub url: String,
}

impl ChannelView {
    pub fn new(channel: TvChannel, quality: VideoQuality) -> Self {
        let url = channel.url_for(quality).to_string();
        Self {
            channel,
            quality,
            url,
        }
    }
}

// =============================================================================
// State Handling
// =============================================================================

/// Observe a state stream to the end, echoing each state
async fn drive<T, S>(mut states: S, output: &Output) -> LoadState<T>
where
    T: Serialize,
    S: Stream<Item = Resource<T>> + Unpin,
{
    let mut state = LoadState::new();
    while let Some(resource) = states.next().await {
        if let Err(e) = output.state(&resource) {
            tracing::warn!(error = %e, "failed to print request state");
        }
        state.apply(resource);
    }
    state
}

/// Print the final response or report the classified error
fn finish<T: Serialize>(state: LoadState<T>, output: &Output) -> ExitCode {
    match (state.response, state.error) {
        (Some(value), _) => {
            if let Err(e) = output.print(&value) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        (None, Some(kind)) => output.error(kind.to_string(), kind.into()),
        (None, None) => output.error("Request ended without a result", ExitCode::Error),
    }
}

// =============================================================================
// Sign-in Command
// =============================================================================

pub async fn signin_cmd(cmd: SigninCmd, ctx: &mut Context, output: &Output) -> ExitCode {
    if !cmd.email.contains('@') {
        return output.error("Invalid email address", ExitCode::InvalidArgs);
    }
    if cmd.password.is_empty() {
        return output.error("Password must not be empty", ExitCode::InvalidArgs);
    }

    let imei = match cmd.imei {
        Some(imei) => imei,
        None => ctx.config.imei(),
    };

    output.info(format!("Signing in as {}", cmd.email));

    let states = ctx
        .signin_repository()
        .signin(&imei, &cmd.email, &cmd.password);
    finish(drive(states, output).await, output)
}

// =============================================================================
// Channel Command
// =============================================================================

pub async fn channel_cmd(cmd: ChannelCmd, ctx: &Context, output: &Output) -> ExitCode {
    let quality = cmd.quality.unwrap_or_else(|| ctx.config.video_quality());

    output.info(format!("Fetching channel {} ({})", cmd.id, quality));

    let states = ctx
        .tv_channel_repository()
        .tv_channel(cmd.id)
        .map(|r| r.map(|channel| ChannelView::new(channel, quality)));
    finish(drive(states, output).await, output)
}

// =============================================================================
// Genres Command
// =============================================================================

pub async fn genres_cmd(_cmd: GenresCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Fetching genres...");

    let states = ctx.tv_channel_repository().tv_genres();
    finish(drive(states, output).await, output)
}

// =============================================================================
// Channels Command
// =============================================================================

pub async fn channels_cmd(cmd: ChannelsCmd, ctx: &Context, output: &Output) -> ExitCode {
    match cmd.genre.filter(|g| *g != 0) {
        Some(genre) => output.info(format!("Fetching channels in genre {}", genre)),
        None => output.info("Fetching all channels"),
    }

    let limit = cmd.limit;
    let exclude = cmd.exclude;
    let states = ctx
        .tv_channel_repository()
        .related_tv_channels(cmd.genre)
        .map(move |r| {
            r.map(|mut channels| {
                if let Some(id) = exclude {
                    channels.retain(|c| c.id != id);
                }
                channels.truncate(limit);
                channels
            })
        });

    let state = drive(states, output).await;
    if state.response.as_ref().is_some_and(|c| c.is_empty()) {
        output.info("No channels found");
    }
    finish(state, output)
}

// =============================================================================
// Play Command
// =============================================================================

fn resolve_player(cmd: &PlayCmd, config: &Config) -> PlayerType {
    if let Some(choice) = cmd.player {
        return choice.into();
    }
    config
        .player
        .as_deref()
        .and_then(|p| match p.parse() {
            Ok(player) => Some(player),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring configured player");
                None
            }
        })
        .unwrap_or_default()
}

pub async fn play_cmd(cmd: PlayCmd, ctx: &Context, output: &Output) -> ExitCode {
    let quality = cmd.quality.unwrap_or_else(|| ctx.config.video_quality());
    let player = LocalPlayer::new(resolve_player(&cmd, &ctx.config));
    let player_name = player.player_type().display_name();

    if !player.is_available().await {
        return output.error(
            format!("{} not found. Install it first.", player_name),
            ExitCode::PlayerFailed,
        );
    }

    let start = Duration::from_secs(cmd.start);
    let states = ctx
        .tv_channel_repository()
        .tv_channel(cmd.id)
        .map(|r| r.map(|channel| PlayerContent::for_channel(&channel, quality, start)));

    let state = drive(states, output).await;
    let content = match (state.response, state.error) {
        (Some(content), _) => content,
        (None, Some(kind)) => return output.error(kind.to_string(), kind.into()),
        (None, None) => return output.error("Request ended without a result", ExitCode::Error),
    };

    output.info(format!("Playing {} in {}...", content.url, player_name));

    let result = if cmd.detach {
        player.play(&content).await.map(|_| ())
    } else {
        player.play_and_wait(&content).await
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(e.to_string(), ExitCode::PlayerFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PlayerChoice;

    fn play_args(player: Option<PlayerChoice>) -> PlayCmd {
        PlayCmd {
            id: 1,
            quality: None,
            player,
            start: 0,
            detach: false,
        }
    }

    #[test]
    fn test_resolve_player_prefers_flag() {
        let config = Config {
            player: Some("vlc".to_string()),
            ..Config::default()
        };
        assert_eq!(
            resolve_player(&play_args(Some(PlayerChoice::Mpv)), &config),
            PlayerType::Mpv
        );
    }

    #[test]
    fn test_resolve_player_falls_back_to_config_then_default() {
        let config = Config {
            player: Some("mpv".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_player(&play_args(None), &config), PlayerType::Mpv);

        let config = Config {
            player: Some("winamp".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_player(&play_args(None), &config), PlayerType::Vlc);
    }

    #[test]
    fn test_channel_view_selects_url() {
        let channel = TvChannel {
            id: 3,
            title: "Sports".to_string(),
            banner: None,
            sd_url: "sd.m3u8".to_string(),
            hd_url: "hd.m3u8".to_string(),
            fhd_url: "fhd.m3u8".to_string(),
            user_agent: String::new(),
            genre_id: None,
        };
        let view = ChannelView::new(channel, VideoQuality::Sd);
        assert_eq!(view.url, "sd.m3u8");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["quality"], "sd");
    }

    #[tokio::test]
    async fn test_drive_folds_states() {
        let output = Output {
            json: false,
            quiet: true,
        };
        let states = futures::stream::iter(vec![
            Resource::Loading(true),
            Resource::Success(5u8),
            Resource::Loading(false),
        ]);
        let state = drive(states, &output).await;
        assert!(!state.is_loading);
        assert_eq!(state.response, Some(5));
        assert_eq!(finish(state, &output), ExitCode::Success);
    }
}
