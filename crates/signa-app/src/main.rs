//! Signa application binary - composition root.
//!
//! Ties the workspace crates into the `signa` command:
//! 1. Load configuration from TOML
//! 2. Build the lexicon (builtin plus optional overrides file)
//! 3. Dispatch the subcommand: notation tools, avatar playback, video
//!    generation, or API key management

mod cli;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use signa_animation::{FrameClock, PoseRenderer};
use signa_core::config::SignaConfig;
use signa_core::types::{GestureToken, RenderMode};
use signa_notation::{compile, describe, parse, Lexicon, NotationEncoder};
use signa_session::{TranscriptSession, VideoState};
use signa_video::{mask_key, open_store, FalVideoClient, VideoError};

use crate::cli::{expand_home, join_text, CliArgs, Command, KeyAction};
use crate::render::{emoji_timeline, format_cue, TextRenderer, EMOJI_WORD_SECS};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Upper bound on simulated playback, in seconds.
const MAX_PLAY_SECS: f64 = 600.0;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_lexicon(config: &SignaConfig) -> Arc<Lexicon> {
    let Some(path) = config.notation.lexicon_path.as_deref() else {
        return Lexicon::builtin();
    };
    let path = expand_home(path);
    match Lexicon::load_with_overrides(&path) {
        Ok(lexicon) => Arc::new(lexicon),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load lexicon overrides, using builtin"
            );
            Lexicon::builtin()
        }
    }
}

fn cmd_encode(encoder: &NotationEncoder, text: &str, per_word: bool) {
    if per_word {
        for word in encoder.encode_words(text) {
            let marker = if word.known { ' ' } else { '?' };
            println!("{}{:<16} {}", marker, word.word, word.token);
        }
    } else {
        println!("{}", encoder.encode(text));
    }
}

fn cmd_parse(notation: &str) {
    for token in parse(notation) {
        println!("{}", token);
    }
}

fn cmd_compile(token: &str, with_descriptor: bool) -> AppResult<()> {
    let token = GestureToken::from(token);
    let spec = compile(&token);
    let output = if with_descriptor {
        serde_json::to_string_pretty(&serde_json::json!({
            "token": token,
            "descriptor": describe(&token),
            "spec": spec,
        }))?
    } else {
        serde_json::to_string_pretty(&spec)?
    };
    println!("{}", output);
    Ok(())
}

async fn play_emoji(encoder: &NotationEncoder, text: &str, realtime: bool) {
    let cues = emoji_timeline(encoder, text);
    if cues.is_empty() {
        tracing::info!("Nothing to play");
        return;
    }
    let mut ticker = realtime
        .then(|| tokio::time::interval(std::time::Duration::from_secs_f64(EMOJI_WORD_SECS)));
    for cue in &cues {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        println!("{}", format_cue(cue));
    }
    tracing::info!(words = cues.len(), "Playback finished");
}

async fn play_avatar(
    encoder: NotationEncoder,
    text: &str,
    fps: u32,
    word_gap_secs: f64,
    every: u64,
    realtime: bool,
) {
    let mut session = TranscriptSession::new(encoder, word_gap_secs);
    let notation = session.on_transcript(text, 0.0).to_string();
    if session.sequence().is_empty() {
        tracing::info!("Nothing to play");
        return;
    }
    println!("notation: {}", notation);

    let mut clock = FrameClock::new(fps, 0.0);
    let mut renderer = TextRenderer::new(std::io::stdout(), every);
    let mut ticker = realtime.then(|| {
        tokio::time::interval(std::time::Duration::from_secs_f64(clock.frame_secs()))
    });
    let mut shown: Option<usize> = None;

    renderer.render(clock.frame(), clock.now(), session.tick(clock.now()));
    while !session.sequence().is_finished() && clock.now() < MAX_PLAY_SECS {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        let now = clock.advance();
        let index = session.sequence().current_index();
        if index != shown {
            if let Some(item) = session.sequence().current_item() {
                println!("-- {} [{}]", item.word, item.token);
            }
            shown = index;
        }
        let pose = session.tick(now);
        renderer.render(clock.frame(), now, pose);
    }
    tracing::info!(
        frames = clock.frame(),
        secs = clock.now(),
        words = session.sequence().len(),
        "Playback finished"
    );
}

async fn cmd_video(
    config: &SignaConfig,
    encoder: NotationEncoder,
    data_dir: &std::path::Path,
    text: &str,
    with_notation: bool,
) -> AppResult<()> {
    let store = open_store(&config.credentials, data_dir)?;
    let api_key = store
        .get(&config.credentials.key_name)?
        .ok_or(VideoError::MissingCredential)?;

    let mut session = TranscriptSession::new(encoder, config.playback.word_gap_secs);
    session.on_transcript(text, 0.0);
    let job = session.begin_video_request(with_notation || config.video.include_notation)?;

    let client = FalVideoClient::new(&config.video);
    let completion = job.run(&client, &api_key).await;
    session.apply_video_result(completion);

    match session.video_state() {
        VideoState::Ready(output) => {
            println!("{}", output.url);
            Ok(())
        }
        VideoState::Failed(message) => Err(message.clone().into()),
        other => Err(format!("video request ended in unexpected state {:?}", other).into()),
    }
}

fn cmd_key(config: &SignaConfig, data_dir: &std::path::Path, action: KeyAction) -> AppResult<()> {
    let store = open_store(&config.credentials, data_dir)?;
    let name = &config.credentials.key_name;
    match action {
        KeyAction::Set { key } => {
            store.set(name, &key)?;
            println!("API key saved ({})", store.kind());
        }
        KeyAction::Show => match store.get(name)? {
            Some(key) => println!("{}", mask_key(&key)),
            None => println!("No API key stored"),
        },
        KeyAction::Clear => {
            store.clear(name)?;
            println!("API key cleared");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = SignaConfig::load_or_default(&config_file);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    init_tracing(&config.general.log_level);
    tracing::debug!(
        path = %config_file.display(),
        "Starting Signa v{}",
        env!("CARGO_PKG_VERSION")
    );

    let data_dir: PathBuf = expand_home(&config.general.data_dir);
    let encoder = NotationEncoder::new(load_lexicon(&config));

    match args.command {
        Command::Encode { text, words } => cmd_encode(&encoder, &join_text(&text), words),
        Command::Parse { notation } => cmd_parse(&notation),
        Command::Compile {
            token,
            describe: with_descriptor,
        } => cmd_compile(&token, with_descriptor)?,
        Command::Play {
            text,
            fps,
            mode,
            every,
            realtime,
        } => {
            let text = join_text(&text);
            let mode = mode.map(RenderMode::from).unwrap_or(config.playback.render_mode);
            match mode {
                RenderMode::Emoji => play_emoji(&encoder, &text, realtime).await,
                RenderMode::Avatar | RenderMode::Video => {
                    if mode == RenderMode::Video {
                        tracing::info!("Video render mode has no frame loop, playing avatar");
                    }
                    let fps = fps.unwrap_or(config.playback.fps);
                    play_avatar(
                        encoder,
                        &text,
                        fps,
                        config.playback.word_gap_secs,
                        every,
                        realtime,
                    )
                    .await;
                }
            }
        }
        Command::Video {
            text,
            with_notation,
        } => cmd_video(&config, encoder, &data_dir, &join_text(&text), with_notation).await?,
        Command::Key { action } => cmd_key(&config, &data_dir, action)?,
    }

    Ok(())
}
