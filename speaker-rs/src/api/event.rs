use std::net::IpAddr;

use bgp_wire::{AfiSafi, NotifyCode, OpenPacket, UpdatePacket, notify_sub_code_str};
use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;

use crate::bgp::peer::State;
use crate::bgp_info;

/// Writes the line-oriented event stream on the `.out` pipe: one
/// timestamped `key=value` record per protocol event.  Without a pipe
/// the records go to the log only.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<String>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx: Some(tx) }
    }

    fn emit(&self, line: String) {
        bgp_info!("{}", line);
        if let Some(tx) = &self.tx {
            let _ = tx.send(format!("{:.6} {}", Utc::now().timestamp_micros() as f64 / 1e6, line));
        }
    }

    pub fn state(&self, peer: IpAddr, from: State, to: State) {
        self.emit(format!(
            "state neighbor={} from={} to={}",
            peer,
            from.to_str(),
            to.to_str()
        ));
    }

    pub fn open_sent(&self, peer: IpAddr, open: &OpenPacket) {
        self.emit(format!(
            "open direction=send neighbor={} asn={} hold-time={} router-id={}",
            peer,
            open.asn,
            open.hold_time,
            open.bgp_id_addr()
        ));
    }

    pub fn open_received(&self, peer: IpAddr, open: &OpenPacket) {
        self.emit(format!(
            "open direction=receive neighbor={} asn={} hold-time={} router-id={}",
            peer,
            open.asn,
            open.hold_time,
            open.bgp_id_addr()
        ));
    }

    pub fn update_sent(&self, peer: IpAddr, messages: usize) {
        self.emit(format!(
            "update direction=send neighbor={} messages={}",
            peer, messages
        ));
    }

    pub fn update_received(&self, peer: IpAddr, update: &UpdatePacket) {
        let announced = update.updates.len()
            + update
                .mp_reach
                .as_ref()
                .map(|reach| reach.nlris.len())
                .unwrap_or(0);
        let withdrawn = update.withdraws.len()
            + update
                .mp_unreach
                .as_ref()
                .map(|unreach| unreach.nlris.len())
                .unwrap_or(0);
        if update.is_end_of_rib() {
            self.emit(format!("update direction=receive neighbor={} eor=true", peer));
            return;
        }
        self.emit(format!(
            "update direction=receive neighbor={} announced={} withdrawn={}",
            peer, announced, withdrawn
        ));
    }

    pub fn notification_sent(&self, peer: IpAddr, code: NotifyCode, sub_code: u8) {
        self.emit(format!(
            "notification direction=send neighbor={} code={} reason=\"{}\"",
            peer,
            u8::from(code),
            notify_sub_code_str(code, sub_code)
        ));
    }

    pub fn notification_received(&self, peer: IpAddr, code: NotifyCode, sub_code: u8) {
        self.emit(format!(
            "notification direction=receive neighbor={} code={} reason=\"{}\"",
            peer,
            u8::from(code),
            notify_sub_code_str(code, sub_code)
        ));
    }

    pub fn refresh_received(&self, peer: IpAddr, afi_safi: AfiSafi) {
        self.emit(format!(
            "refresh direction=receive neighbor={} family=\"{}\"",
            peer, afi_safi
        ));
    }

    pub fn error(&self, message: &str) {
        self.emit(format!("error message=\"{}\"", message));
    }

    pub fn version(&self, version: &str) {
        self.emit(format!("version speaker-rs={}", version));
    }
}
