use std::path::PathBuf;
use std::process::ExitStatus;

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use crate::bgp_info;

/// Multiple configurations run as independent speaker processes, one
/// per file; there is no shared routing state.  The supervisor only
/// forwards signals, reaps children, and exits with the worst status.
pub async fn run(configs: Vec<PathBuf>) -> Result<i32> {
    let exe = std::env::current_exe().context("locate current executable")?;
    let mut children: Vec<(PathBuf, Child)> = Vec::new();
    for config in configs {
        let child = Command::new(&exe)
            .arg("--config")
            .arg(&config)
            .spawn()
            .with_context(|| format!("spawn speaker for {}", config.display()))?;
        bgp_info!(config = %config.display(), pid = child.id().unwrap_or_default(), "speaker spawned");
        children.push((config, child));
    }

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    let mut worst = 0;
    while !children.is_empty() {
        tokio::select! {
            _ = sigterm.recv() => forward(&children, Signal::SIGTERM),
            _ = sigint.recv() => forward(&children, Signal::SIGINT),
            status = wait_any(&mut children) => {
                if let Some((config, status)) = status {
                    let code = status.code().unwrap_or(1);
                    bgp_info!(config = %config.display(), code, "speaker exited");
                    worst = worst.max(code);
                }
            }
        }
    }
    Ok(worst)
}

fn forward(children: &[(PathBuf, Child)], signal: Signal) {
    for (_, child) in children.iter() {
        if let Some(pid) = child.id() {
            let _ = kill(Pid::from_raw(pid as i32), signal);
        }
    }
}

/// Wait for any child to exit and remove it from the set.
async fn wait_any(children: &mut Vec<(PathBuf, Child)>) -> Option<(PathBuf, ExitStatus)> {
    let futures = children
        .iter_mut()
        .map(|(_, child)| Box::pin(child.wait()));
    let (result, index, _) = futures::future::select_all(futures).await;
    let (config, _) = children.remove(index);
    result.ok().map(|status| (config, status))
}
