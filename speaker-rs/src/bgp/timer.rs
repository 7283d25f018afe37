use std::cmp::min;

use bgp_wire::{AfiSafi, OpenPacket};
use rand::Rng;

use crate::context::Timer;

use super::inst::Message;
use super::peer::{Event, Peer, State};

/// Cap on the connect-retry backoff (RFC 4271 suggests 120s).
const CONNECT_RETRY_CAP: u64 = 120;

#[derive(Debug, Default, Clone)]
pub struct Config {
    pub idle_hold_time: Option<u16>,
    pub hold_time: Option<u16>,
    pub connect_retry_time: Option<u16>,
    pub min_adv_interval: Option<u16>,
}

impl Config {
    const DEFAULT_IDLE_HOLD_TIME: u64 = 5;
    const DEFAULT_HOLD_TIME: u64 = 90;
    const DEFAULT_CONNECT_RETRY_TIME: u64 = 120;
    const DEFAULT_MIN_ADV_INTERVAL: u64 = 1;

    pub fn idle_hold_time(&self) -> u64 {
        self.idle_hold_time
            .map(u64::from)
            .unwrap_or(Self::DEFAULT_IDLE_HOLD_TIME)
    }

    pub fn hold_time(&self) -> u64 {
        self.hold_time
            .map(u64::from)
            .unwrap_or(Self::DEFAULT_HOLD_TIME)
    }

    pub fn connect_retry_time(&self) -> u64 {
        self.connect_retry_time
            .map(u64::from)
            .unwrap_or(Self::DEFAULT_CONNECT_RETRY_TIME)
    }

    pub fn min_adv_interval(&self) -> u64 {
        self.min_adv_interval
            .map(u64::from)
            .unwrap_or(Self::DEFAULT_MIN_ADV_INTERVAL)
    }
}

#[derive(Debug, Default)]
pub struct PeerTimer {
    pub idle_hold_timer: Option<Timer>,
    pub connect_retry: Option<Timer>,
    pub hold_timer: Option<Timer>,
    pub keepalive: Option<Timer>,
    pub min_route_adv: Option<Timer>,
    pub stale_timer: std::collections::BTreeMap<AfiSafi, Timer>,
}

macro_rules! start_timer {
    ($peer:expr, $time:expr, $ev:expr) => {{
        let ident = $peer.ident;
        let tx = $peer.tx.clone();

        Timer::once($time, move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(Message::Event(ident, $ev)).await;
            }
        })
    }};
}

macro_rules! start_repeater {
    ($peer:expr, $time:expr, $ev:expr) => {{
        let ident = $peer.ident;
        let tx = $peer.tx.clone();

        Timer::repeat($time, move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(Message::Event(ident, $ev)).await;
            }
        })
    }};
}

fn start_idle_hold_timer(peer: &Peer) -> Timer {
    start_timer!(peer, peer.config.timer.idle_hold_time(), Event::Start)
}

/// Exponential backoff with jitter, capped at [`CONNECT_RETRY_CAP`].
pub fn connect_retry_delay(peer: &Peer) -> u64 {
    let base = peer.config.timer.connect_retry_time();
    let shift = peer.retry_count.min(6);
    let delay = min(base.saturating_mul(1 << shift), CONNECT_RETRY_CAP).max(1);
    let jitter = rand::rng().random_range(0..=delay / 4);
    delay - jitter
}

pub fn start_connect_retry_timer(peer: &Peer) -> Timer {
    start_timer!(peer, connect_retry_delay(peer), Event::Start)
}

fn start_hold_timer(peer: &Peer) -> Timer {
    start_timer!(peer, peer.param.hold_time as u64, Event::HoldTimerExpires)
}

fn start_keepalive_timer(peer: &Peer) -> Timer {
    start_repeater!(
        peer,
        peer.param.keepalive as u64,
        Event::KeepaliveTimerExpires
    )
}

pub fn start_min_adv_timer(peer: &Peer) -> Timer {
    start_timer!(
        peer,
        peer.config.timer.min_adv_interval(),
        Event::AdvTimerExpires
    )
}

pub fn start_stale_timer(peer: &Peer, afi_safi: AfiSafi, stale_time: u16) -> Timer {
    let ident = peer.ident;
    let tx = peer.tx.clone();

    Timer::once(stale_time as u64, move || {
        let tx = tx.clone();
        async move {
            let _ = tx
                .send(Message::Event(ident, Event::StaleTimerExpires(afi_safi)))
                .await;
        }
    })
}

pub fn refresh_hold_timer(peer: &Peer) {
    if let Some(hold_timer) = peer.timer.hold_timer.as_ref() {
        hold_timer.refresh();
    }
}

/// Hold time negotiation (RFC 4271 §4.2): the session value is the
/// minimum of both sides, zero disables keepalives entirely, and the
/// keepalive interval is a third of the hold time.
pub fn update_open_timers(peer: &mut Peer, packet: &OpenPacket) {
    peer.param_rx.hold_time = packet.hold_time;
    peer.param_rx.keepalive = packet.hold_time / 3;

    if packet.hold_time == 0 {
        peer.param.hold_time = 0;
        peer.param.keepalive = 0;
    } else {
        let hold_time = peer.config.timer.hold_time() as u16;
        peer.param.hold_time = min(packet.hold_time, hold_time);
        peer.param.keepalive = peer.param.hold_time / 3;
    }
    if peer.param.keepalive > 0 {
        peer.timer.keepalive = Some(start_keepalive_timer(peer));
    }
    if peer.param.hold_time > 0 {
        peer.timer.hold_timer = Some(start_hold_timer(peer));
    }
}

pub fn update_timers(peer: &mut Peer) {
    use State::*;
    match peer.state {
        Idle => {
            if peer.is_passive() {
                // A passive peer sits in Active waiting for the remote
                // side; this is the only state change made outside the
                // FSM proper.
                peer.state = Active;
                peer.timer.idle_hold_timer = None;
            } else if !peer.manual_stop
                && peer.timer.connect_retry.is_none()
                && peer.timer.idle_hold_timer.is_none()
            {
                // An armed connect-retry timer (error paths, with
                // backoff) takes precedence over the idle hold timer.
                peer.timer.idle_hold_timer = Some(start_idle_hold_timer(peer));
            }
            peer.timer.hold_timer = None;
            peer.timer.keepalive = None;
            peer.timer.min_route_adv = None;
            peer.task.reader = None;
        }
        Connect | Active | OpenSent => {
            peer.timer.idle_hold_timer = None;
            peer.timer.hold_timer = None;
            peer.timer.keepalive = None;
            peer.timer.min_route_adv = None;
        }
        // The negotiated hold timer runs from OpenConfirm on.
        OpenConfirm | Established => {
            peer.timer.idle_hold_timer = None;
            peer.timer.connect_retry = None;
            if peer.timer.hold_timer.is_none() && peer.param.hold_time > 0 {
                peer.timer.hold_timer = Some(start_hold_timer(peer));
            }
            if peer.timer.keepalive.is_none() && peer.param.keepalive > 0 {
                peer.timer.keepalive = Some(start_keepalive_timer(peer));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_time_derivation() {
        // min(local, remote) and keepalive = hold / 3.
        let config = Config {
            hold_time: Some(90),
            ..Default::default()
        };
        assert_eq!(config.hold_time(), 90);

        let config = Config::default();
        assert_eq!(config.hold_time(), 90);
        assert_eq!(config.connect_retry_time(), 120);
    }
}
