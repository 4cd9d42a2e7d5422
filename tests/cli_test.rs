//! CLI argument parsing tests

use clap::Parser;
use betamax::cli::{Cli, Command, PlayerChoice};
use betamax::models::VideoQuality;
use betamax::player::PlayerType;

#[test]
fn test_signin_command() {
    let cli = Cli::parse_from([
        "betamax", "signin", "--email", "a@b.com", "--password", "x", "--imei", "123",
    ]);
    match cli.command {
        Command::Signin(cmd) => {
            assert_eq!(cmd.email, "a@b.com");
            assert_eq!(cmd.password, "x");
            assert_eq!(cmd.imei.as_deref(), Some("123"));
        }
        _ => panic!("Expected Signin command"),
    }
}

#[test]
fn test_signin_requires_password() {
    let result = Cli::try_parse_from(["betamax", "signin", "--email", "a@b.com"]);
    assert!(result.is_err());
}

#[test]
fn test_channel_command_with_quality() {
    let cli = Cli::parse_from(["betamax", "channel", "12", "-Q", "fhd"]);
    match cli.command {
        Command::Channel(cmd) => {
            assert_eq!(cmd.id, 12);
            assert_eq!(cmd.quality, Some(VideoQuality::Fhd));
        }
        _ => panic!("Expected Channel command"),
    }
}

#[test]
fn test_channel_rejects_unknown_quality() {
    let result = Cli::try_parse_from(["betamax", "channel", "12", "-Q", "8k"]);
    assert!(result.is_err());
}

#[test]
fn test_channel_alias() {
    let cli = Cli::parse_from(["betamax", "ch", "4"]);
    assert!(matches!(cli.command, Command::Channel(ref cmd) if cmd.id == 4 && cmd.quality.is_none()));
}

#[test]
fn test_channels_defaults() {
    let cli = Cli::parse_from(["betamax", "channels"]);
    match cli.command {
        Command::Channels(cmd) => {
            assert_eq!(cmd.genre, None);
            assert_eq!(cmd.limit, 50);
            assert_eq!(cmd.exclude, None);
        }
        _ => panic!("Expected Channels command"),
    }
}

#[test]
fn test_channels_with_genre_and_exclude() {
    let cli = Cli::parse_from(["betamax", "channels", "-g", "3", "-l", "5", "-x", "12"]);
    match cli.command {
        Command::Channels(cmd) => {
            assert_eq!(cmd.genre, Some(3));
            assert_eq!(cmd.limit, 5);
            assert_eq!(cmd.exclude, Some(12));
        }
        _ => panic!("Expected Channels command"),
    }
}

#[test]
fn test_play_command() {
    let cli = Cli::parse_from([
        "betamax", "play", "12", "--player", "mpv", "--start", "120", "--detach",
    ]);
    match cli.command {
        Command::Play(cmd) => {
            assert_eq!(cmd.id, 12);
            assert_eq!(cmd.player, Some(PlayerChoice::Mpv));
            assert_eq!(PlayerType::from(PlayerChoice::Mpv), PlayerType::Mpv);
            assert_eq!(cmd.start, 120);
            assert!(cmd.detach);
        }
        _ => panic!("Expected Play command"),
    }
}

#[test]
fn test_global_flags() {
    let cli = Cli::parse_from([
        "betamax",
        "genres",
        "--json",
        "--quiet",
        "--verbose",
        "--api-url",
        "http://tv.test/api",
        "--config",
        "/tmp/betamax.toml",
    ]);
    assert!(cli.json);
    assert!(cli.quiet);
    assert!(cli.verbose);
    assert_eq!(cli.api_url.as_deref(), Some("http://tv.test/api"));
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/betamax.toml"))
    );
    assert!(matches!(cli.command, Command::Genres(_)));
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["betamax"]).is_err());
}
