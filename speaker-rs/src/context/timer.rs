use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Debug)]
pub struct Timer {
    tx: UnboundedSender<TimerMessage>,
}

#[derive(Debug)]
pub enum TimerMessage {
    Refresh,
}

#[derive(PartialEq, Clone, Copy)]
enum TimerType {
    Once,
    Repeat,
}

impl Timer {
    fn start<F, Fut>(secs: u64, typ: TimerType, mut callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let duration = Duration::from_secs(secs);
            let mut sleep = Box::pin(tokio::time::sleep(duration));
            loop {
                tokio::select! {
                    _ = &mut sleep => {
                        (callback)().await;
                        if typ == TimerType::Once {
                            break;
                        }
                        sleep = Box::pin(tokio::time::sleep(duration));
                    }
                    msg = rx.recv() => {
                        match msg {
                            Some(TimerMessage::Refresh) => {
                                sleep = Box::pin(tokio::time::sleep(duration));
                            }
                            // Sender dropped: timer cancelled.
                            None => break,
                        }
                    }
                }
            }
        });
        Timer { tx }
    }

    pub fn once<F, Fut>(secs: u64, callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        Self::start(secs, TimerType::Once, callback)
    }

    pub fn repeat<F, Fut>(secs: u64, callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        Self::start(secs, TimerType::Repeat, callback)
    }

    /// Restart the interval from now.
    pub fn refresh(&self) {
        let _ = self.tx.send(TimerMessage::Refresh);
    }
}
