use std::path::Path;

use anyhow::{Context, Result};
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::bgp_warn;
use crate::context::Task;

use super::EventSink;

/// Environment variable naming the control pipe prefix; the speaker
/// reads commands from `<prefix>.in` and writes events to
/// `<prefix>.out`.
pub const PIPE_ENV: &str = "SPEAKER_PIPE_PREFIX";

pub struct ApiChannel {
    pub commands: UnboundedReceiver<String>,
    pub events: EventSink,
    _reader: Task<()>,
    _writer: Task<()>,
}

fn ensure_fifo(path: &Path) -> Result<()> {
    match mkfifo(path, Mode::from_bits_truncate(0o600)) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::EEXIST) => Ok(()),
        Err(e) => Err(e).with_context(|| format!("mkfifo {}", path.display())),
    }
}

/// Open a FIFO read-write so the open never blocks and the reader
/// never sees EOF when the far side closes.
fn open_rdwr(path: &Path) -> Result<File> {
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok(File::from_std(file))
}

pub fn setup(prefix: &str) -> Result<ApiChannel> {
    let in_path = format!("{}.in", prefix);
    let out_path = format!("{}.out", prefix);
    ensure_fifo(Path::new(&in_path))?;
    ensure_fifo(Path::new(&out_path))?;

    let command_file = open_rdwr(Path::new(&in_path))?;
    let event_file = open_rdwr(Path::new(&out_path))?;

    let (command_tx, commands) = mpsc::unbounded_channel::<String>();
    let reader = Task::spawn(command_reader(command_file, command_tx));

    let (event_tx, event_rx) = mpsc::unbounded_channel::<String>();
    let writer = Task::spawn(event_writer(event_file, event_rx));

    Ok(ApiChannel {
        commands,
        events: EventSink::new(event_tx),
        _reader: reader,
        _writer: writer,
    })
}

async fn command_reader(file: File, tx: UnboundedSender<String>) {
    let mut lines = BufReader::new(file).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if tx.send(line).is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                bgp_warn!(error = %e, "control pipe read failed");
                return;
            }
        }
    }
}

async fn event_writer(mut file: File, mut rx: UnboundedReceiver<String>) {
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        if file.write_all(line.as_bytes()).await.is_err() {
            return;
        }
    }
}
