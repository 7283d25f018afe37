// SPDX-License-Identifier: AGPL-3.0-or-later

mod api;
mod bgp;
mod config;
mod context;
mod supervisor;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bgp::Speaker;
use bgp_wire::{BgpPacket, Direct, ParseOption};
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "BGP speaker", long_about = None)]
struct Arg {
    /// Configuration file; repeat to run one speaker process per file
    #[arg(short, long)]
    config: Vec<PathBuf>,

    /// Decode a hex-encoded BGP message and exit
    #[arg(long)]
    decode: Option<String>,

    /// Control pipe prefix (overridden by SPEAKER_PIPE_PREFIX)
    #[arg(long)]
    pipe: Option<String>,

    /// Log to a file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn tracing_init(log_file: Option<&PathBuf>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let name = path.file_name().unwrap_or_else(|| "speaker-rs.log".as_ref());
            let writer = tracing_appender::rolling::never(dir, name);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
    }
}

fn decode_packet(hex: &str) -> Result<()> {
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(&cleaned).context("invalid hex input")?;
    let opt = ParseOption {
        as4: Direct {
            send: true,
            recv: true,
        },
        ..Default::default()
    };
    let (_, packet) = BgpPacket::parse_packet(&bytes, &opt)
        .map_err(|e| anyhow::anyhow!("decode failed: {}", e))?;
    match packet {
        BgpPacket::Open(p) => print!("{}", p),
        BgpPacket::Update(p) => print!("{}", p),
        BgpPacket::Notification(p) => print!("{}", p),
        BgpPacket::Keepalive(_) => println!("Keepalive Message"),
        BgpPacket::RouteRefresh(p) => print!("{}", p),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let arg = Arg::parse();
    tracing_init(arg.log_file.as_ref());

    // --decode is a pure codec front-end; it wins over --config.
    if let Some(hex) = arg.decode.as_deref() {
        return decode_packet(hex);
    }

    if arg.config.is_empty() {
        bail!("no configuration file given");
    }

    if arg.config.len() > 1 {
        let code = supervisor::run(arg.config).await?;
        std::process::exit(code);
    }

    // Configuration errors surface here, before any peer starts.
    let mut config = Config::load(&arg.config[0])?;
    if config.pipe_prefix.is_none() {
        config.pipe_prefix = arg.pipe;
    }

    let mut speaker = Speaker::new(config)?;
    if let Err(err) = speaker.event_loop().await {
        // Unrecoverable runtime failure, distinct from a config error.
        tracing::error!(error = %err, "speaker failed");
        std::process::exit(2);
    }
    Ok(())
}
