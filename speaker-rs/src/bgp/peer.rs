use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Instant;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use bgp_wire::*;

use crate::api::EventSink;
use crate::bgp_debug;
use crate::context::Task;

use super::adj_out::{AdjOut, EncodeCtx};
use super::caps::SessionCaps;
use super::debug::DebugFlags;
use super::inst::Message;
use super::route::RouteStore;
use super::timer::{self, PeerTimer};

pub const BGP_PORT: u16 = 179;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum State {
    Idle,
    Connect,
    Active,
    OpenSent,
    OpenConfirm,
    Established,
}

impl State {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connect => "connect",
            Self::Active => "active",
            Self::OpenSent => "opensent",
            Self::OpenConfirm => "openconfirm",
            Self::Established => "established",
        }
    }

    pub fn is_established(&self) -> bool {
        *self == State::Established
    }
}

#[derive(Debug)]
pub enum Event {
    Start,
    ManualStop,
    HoldTimerExpires,
    KeepaliveTimerExpires,
    AdvTimerExpires,
    StaleTimerExpires(AfiSafi),
    Connected(TcpStream),
    ConnFail,
    Open(OpenPacket),
    KeepaliveMsg,
    UpdateMsg(Box<UpdatePacket>),
    NotifMsg(NotificationPacket),
    RefreshMsg(RouteRefreshPacket),
    DecodeError(WireError),
}

enum FsmEffect {
    None,
    StaleExpire(AfiSafi),
}

#[derive(Debug, Default)]
pub struct PeerTask {
    pub connect: Option<Task<()>>,
    pub reader: Option<Task<()>>,
    pub writer: Option<Task<()>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PeerCounter {
    pub sent: u64,
    pub rcvd: u64,
}

#[derive(Debug, Default, Clone)]
pub struct PeerParam {
    pub hold_time: u16,
    pub keepalive: u16,
    pub local_addr: Option<SocketAddr>,
}

#[derive(Debug, Default, Clone)]
pub struct PeerConfig {
    pub passive: bool,
    pub four_octet: bool,
    pub families: Vec<AfiSafi>,
    pub addpath: BTreeMap<AfiSafi, AddPathDirection>,
    pub route_refresh: bool,
    pub enhanced_refresh: bool,
    pub extended_message: bool,
    pub graceful_restart: Option<u16>,
    pub send_all_withdraws: bool,
    pub md5_password: Option<String>,
    pub ttl_security: Option<u8>,
    pub timer: timer::Config,
}

pub struct Peer {
    pub ident: IpAddr,
    pub address: IpAddr,
    pub local_as: u32,
    pub peer_as: u32,
    pub router_id: Ipv4Addr,
    pub remote_id: Ipv4Addr,
    pub active: bool,
    pub state: State,
    pub manual_stop: bool,
    pub retry_count: u32,
    pub config: PeerConfig,
    pub task: PeerTask,
    pub timer: PeerTimer,
    pub counter: [PeerCounter; BgpType::Max as usize],
    pub param: PeerParam,
    pub param_tx: PeerParam,
    pub param_rx: PeerParam,
    pub packet_tx: Option<UnboundedSender<BytesMut>>,
    pub tx: mpsc::Sender<Message>,
    pub caps_sent: Caps,
    pub caps_recv: Caps,
    pub session: SessionCaps,
    pub opt: ParseOption,
    /// Shares the negotiated parse options with the reader task, which
    /// starts before the OPEN exchange settles them.
    opt_tx: watch::Sender<ParseOption>,
    pub adj_out: AdjOut,
    pub events: EventSink,
    pub debug: DebugFlags,
    pub uptime: Option<Instant>,
}

impl Peer {
    pub fn new(
        ident: IpAddr,
        local_as: u32,
        router_id: Ipv4Addr,
        peer_as: u32,
        address: IpAddr,
        tx: mpsc::Sender<Message>,
        events: EventSink,
    ) -> Self {
        let mut peer = Self {
            ident,
            address,
            local_as,
            peer_as,
            router_id,
            remote_id: Ipv4Addr::UNSPECIFIED,
            active: false,
            state: State::Idle,
            manual_stop: false,
            retry_count: 0,
            config: PeerConfig::default(),
            task: PeerTask::default(),
            timer: PeerTimer::default(),
            counter: [PeerCounter::default(); BgpType::Max as usize],
            param: PeerParam::default(),
            param_tx: PeerParam::default(),
            param_rx: PeerParam::default(),
            packet_tx: None,
            tx,
            caps_sent: Caps::default(),
            caps_recv: Caps::default(),
            session: SessionCaps::default(),
            opt: ParseOption::default(),
            opt_tx: watch::channel(ParseOption::default()).0,
            adj_out: AdjOut::default(),
            events,
            debug: DebugFlags::default(),
            uptime: None,
        };
        peer.config.four_octet = true;
        peer.config.route_refresh = true;
        peer.config
            .families
            .push(AfiSafi::new(Afi::Ip, Safi::Unicast));
        peer
    }

    pub fn start(&mut self) {
        if self.peer_as != 0 && !self.address.is_unspecified() && !self.active {
            timer::update_timers(self);
            self.active = true;
        }
    }

    pub fn is_passive(&self) -> bool {
        self.config.passive
    }

    /// Capabilities this side puts in its OPEN.
    pub fn local_caps(&self) -> Caps {
        let mut caps = Caps::default();
        for afi_safi in self.config.families.iter() {
            caps.mp.insert(*afi_safi, (*afi_safi).into());
        }
        if self.config.four_octet {
            caps.as4 = Some(CapAs4::new(self.local_as));
        }
        if self.config.route_refresh {
            caps.refresh = Some(CapRefresh::default());
        }
        if self.config.enhanced_refresh {
            caps.enhanced_refresh = Some(CapEnhancedRefresh::default());
        }
        if self.config.extended_message {
            caps.extended = Some(CapExtended::default());
        }
        for (afi_safi, direction) in self.config.addpath.iter() {
            caps.addpath.insert(
                *afi_safi,
                AddPathValue {
                    afi: afi_safi.afi,
                    safi: afi_safi.safi,
                    direction: *direction,
                },
            );
        }
        if let Some(restart_time) = self.config.graceful_restart {
            caps.restart_time = Some(restart_time);
            for afi_safi in self.config.families.iter() {
                caps.restart
                    .insert(*afi_safi, RestartValue::new(afi_safi.afi, afi_safi.safi));
            }
        }
        caps
    }

    fn encode_ctx(&self) -> EncodeCtx {
        EncodeCtx {
            as4: self.opt.is_as4(),
            max_size: self.session.max_message_size(),
        }
    }

    /// Serialise one round of pending output, one batch per family.
    pub fn flush_updates(&mut self) {
        if !self.state.is_established() {
            return;
        }
        let ctx = self.encode_ctx();
        let as4 = ctx.as4;
        let mut out: Vec<BytesMut> = Vec::new();
        let mut count = 0usize;
        for (afi_safi, family) in self.adj_out.families.iter_mut() {
            for update in family.flush(*afi_safi, &ctx) {
                out.push(update.emit(as4));
                count += 1;
            }
        }
        if count > 0 {
            self.counter[BgpType::Update as usize].sent += count as u64;
            self.events.update_sent(self.ident, count);
        }
        if let Some(packet_tx) = self.packet_tx.as_ref() {
            for bytes in out {
                let _ = packet_tx.send(bytes);
            }
        }
    }

    /// End-of-RIB for a family: an empty UPDATE for ipv4-unicast, an
    /// empty MP_UNREACH otherwise (RFC 4724).
    pub fn send_end_of_rib(&mut self, afi_safi: AfiSafi) {
        let mut update = UpdatePacket::new();
        if afi_safi != AfiSafi::new(Afi::Ip, Safi::Unicast) {
            update.mp_unreach = Some(MpUnreachAttr::new(afi_safi));
        }
        let as4 = self.opt.is_as4();
        self.counter[BgpType::Update as usize].sent += 1;
        if let Some(packet_tx) = self.packet_tx.as_ref() {
            let _ = packet_tx.send(update.emit(as4));
        }
    }

    /// Full re-advertisement of one family, bracketed by the RFC 7313
    /// markers when enhanced refresh is on.
    pub fn refresh_family(&mut self, afi_safi: AfiSafi) {
        if !self.session.families.contains(&afi_safi) {
            return;
        }
        if self.session.enhanced_refresh {
            self.send_refresh(afi_safi, RefreshSubtype::Begin);
        }
        if let Some(family) = self.adj_out.get_mut(&afi_safi) {
            family.refresh();
        }
        self.flush_updates();
        if self.session.enhanced_refresh {
            self.send_refresh(afi_safi, RefreshSubtype::End);
        }
    }

    pub fn send_refresh(&mut self, afi_safi: AfiSafi, subtype: RefreshSubtype) {
        let Some(packet_tx) = self.packet_tx.as_ref() else {
            return;
        };
        let refresh = RouteRefreshPacket::new(afi_safi, subtype);
        let bytes: BytesMut = refresh.into();
        self.counter[BgpType::RouteRefresh as usize].sent += 1;
        let _ = packet_tx.send(bytes);
    }
}

/// Drive the per-peer state machine: compute the transition, apply the
/// side effects, then reconcile timers with the new state.
pub fn fsm(peers: &mut BTreeMap<IpAddr, Peer>, routes: &RouteStore, id: IpAddr, event: Event) {
    let Some(peer) = peers.get_mut(&id) else {
        return;
    };
    let prev_state = peer.state;
    let (new_state, effect) = fsm_next_state(peer, event);
    peer.state = new_state;

    match effect {
        FsmEffect::None => {}
        FsmEffect::StaleExpire(afi_safi) => {
            if let Some(family) = peer.adj_out.get_mut(&afi_safi) {
                family.stale = false;
            }
            peer.adj_out.clear();
        }
    }

    if prev_state == peer.state {
        return;
    }
    peer.events.state(peer.ident, prev_state, peer.state);
    if peer.debug.fsm {
        bgp_debug!(peer = %peer.ident, from = prev_state.to_str(), to = peer.state.to_str(), "fsm transition");
    }

    if !prev_state.is_established() && peer.state.is_established() {
        peer.uptime = Some(Instant::now());
        peer.retry_count = 0;
        session_sync(peer, routes);
    }
    if prev_state.is_established() && !peer.state.is_established() {
        peer.uptime = Some(Instant::now());
        session_down(peer);
    }
    timer::update_timers(peer);
}

fn fsm_next_state(peer: &mut Peer, event: Event) -> (State, FsmEffect) {
    match event {
        Event::Start => (fsm_start(peer), FsmEffect::None),
        Event::ManualStop => (fsm_manual_stop(peer), FsmEffect::None),
        Event::HoldTimerExpires => (fsm_holdtimer_expires(peer), FsmEffect::None),
        Event::KeepaliveTimerExpires => (fsm_keepalive_expires(peer), FsmEffect::None),
        Event::AdvTimerExpires => (fsm_adv_timer_expires(peer), FsmEffect::None),
        Event::StaleTimerExpires(afi_safi) => {
            peer.timer.stale_timer.remove(&afi_safi);
            (peer.state, FsmEffect::StaleExpire(afi_safi))
        }
        Event::Connected(stream) => (fsm_connected(peer, stream), FsmEffect::None),
        Event::ConnFail => (fsm_conn_fail(peer), FsmEffect::None),
        Event::Open(packet) => (fsm_bgp_open(peer, packet), FsmEffect::None),
        Event::KeepaliveMsg => (fsm_bgp_keepalive(peer), FsmEffect::None),
        Event::UpdateMsg(packet) => (fsm_bgp_update(peer, *packet), FsmEffect::None),
        Event::NotifMsg(packet) => (fsm_bgp_notification(peer, packet), FsmEffect::None),
        Event::RefreshMsg(packet) => (fsm_bgp_refresh(peer, packet), FsmEffect::None),
        Event::DecodeError(err) => (fsm_decode_error(peer, err), FsmEffect::None),
    }
}

fn fsm_start(peer: &mut Peer) -> State {
    if peer.manual_stop {
        return State::Idle;
    }
    if peer.is_passive() {
        return State::Active;
    }
    match peer.state {
        State::Idle | State::Active | State::Connect => {
            peer.task.connect = Some(peer_start_connection(peer));
            State::Connect
        }
        state => state,
    }
}

fn fsm_manual_stop(peer: &mut Peer) -> State {
    peer_send_notification(
        peer,
        NotifyCode::Cease,
        CeaseError::AdministrativeShutdown.into(),
        Vec::new(),
    );
    peer.manual_stop = true;
    peer_close(peer);
    State::Idle
}

fn fsm_connected(peer: &mut Peer, stream: TcpStream) -> State {
    if let Ok(local_addr) = stream.local_addr() {
        peer.param.local_addr = Some(local_addr);
    }
    peer.task.connect = None;
    let (packet_tx, packet_rx) = mpsc::unbounded_channel::<BytesMut>();
    peer.packet_tx = Some(packet_tx);
    let (read_half, write_half) = stream.into_split();
    peer.task.reader = Some(peer_start_reader(peer, read_half));
    peer.task.writer = Some(peer_start_writer(write_half, packet_rx));
    peer_send_open(peer);
    State::OpenSent
}

fn fsm_conn_fail(peer: &mut Peer) -> State {
    peer_close(peer);
    peer.retry_count = peer.retry_count.saturating_add(1);
    peer.timer.connect_retry = Some(timer::start_connect_retry_timer(peer));
    State::Active
}

fn fsm_bgp_open(peer: &mut Peer, packet: OpenPacket) -> State {
    peer.counter[BgpType::Open as usize].rcvd += 1;
    if peer.debug.open {
        bgp_debug!(peer = %peer.ident, "{}", packet);
    }
    peer.events.open_received(peer.ident, &packet);

    if peer.state != State::OpenSent {
        let sub_code = match peer.state {
            State::Established => FsmSubError::UnexpectedMessageInEstablished,
            _ => FsmSubError::UnexpectedMessageInOpenConfirm,
        };
        peer_send_notification(peer, NotifyCode::FsmError, sub_code.into(), Vec::new());
        peer_close(peer);
        return State::Idle;
    }

    if packet.version != BGP_VERSION {
        peer_send_notification(
            peer,
            NotifyCode::OpenMsgError,
            OpenError::UnsupportedVersionNumber.into(),
            vec![0, BGP_VERSION],
        );
        peer_close(peer);
        return State::Idle;
    }
    let asn = open_asn(&packet);
    if asn != peer.peer_as {
        peer_send_notification(
            peer,
            NotifyCode::OpenMsgError,
            OpenError::BadPeerAS.into(),
            Vec::new(),
        );
        peer_close(peer);
        return State::Idle;
    }
    if packet.bgp_id == [0u8; 4] {
        peer_send_notification(
            peer,
            NotifyCode::OpenMsgError,
            OpenError::BadBgpIdentifier.into(),
            Vec::new(),
        );
        peer_close(peer);
        return State::Idle;
    }
    if packet.hold_time == 1 || packet.hold_time == 2 {
        peer_send_notification(
            peer,
            NotifyCode::OpenMsgError,
            OpenError::UnacceptableHoldTime.into(),
            Vec::new(),
        );
        peer_close(peer);
        return State::Idle;
    }
    peer.remote_id = packet.bgp_id_addr();

    timer::update_open_timers(peer, &packet);

    peer.session = SessionCaps::negotiate(&peer.caps_sent, &packet.caps);
    peer.opt = peer.session.parse_option();
    let _ = peer.opt_tx.send(peer.opt.clone());
    peer.caps_recv = packet.caps;

    for afi_safi in peer.session.families.clone() {
        peer.adj_out.enable(afi_safi, peer.config.send_all_withdraws);
    }

    peer_send_keepalive(peer);
    State::OpenConfirm
}

fn fsm_bgp_keepalive(peer: &mut Peer) -> State {
    peer.counter[BgpType::Keepalive as usize].rcvd += 1;
    if peer.debug.keepalive {
        bgp_debug!(peer = %peer.ident, "keepalive received");
    }
    timer::refresh_hold_timer(peer);
    match peer.state {
        State::OpenConfirm | State::Established => State::Established,
        state => state,
    }
}

fn fsm_bgp_update(peer: &mut Peer, packet: UpdatePacket) -> State {
    peer.counter[BgpType::Update as usize].rcvd += 1;
    timer::refresh_hold_timer(peer);
    if peer.state != State::Established {
        peer_send_notification(
            peer,
            NotifyCode::FsmError,
            FsmSubError::UnexpectedMessageInOpenConfirm.into(),
            Vec::new(),
        );
        peer_close(peer);
        return State::Idle;
    }
    if peer.debug.update {
        bgp_debug!(peer = %peer.ident, "{}", packet);
    }
    // This is a speaker, not a router: received routes are passed
    // through to the event pipe, not stored or re-advertised.
    peer.events.update_received(peer.ident, &packet);
    State::Established
}

fn fsm_bgp_notification(peer: &mut Peer, packet: NotificationPacket) -> State {
    peer.counter[BgpType::Notification as usize].rcvd += 1;
    if peer.debug.notification {
        bgp_debug!(peer = %peer.ident, "{}", packet);
    }
    peer.events
        .notification_received(peer.ident, packet.code, packet.sub_code);
    peer_close(peer);
    peer.timer.connect_retry = Some(timer::start_connect_retry_timer(peer));
    State::Idle
}

fn fsm_bgp_refresh(peer: &mut Peer, packet: RouteRefreshPacket) -> State {
    peer.counter[BgpType::RouteRefresh as usize].rcvd += 1;
    timer::refresh_hold_timer(peer);
    if peer.state != State::Established {
        return peer.state;
    }
    let afi_safi = packet.afi_safi();
    peer.events.refresh_received(peer.ident, afi_safi);
    if packet.subtype == RefreshSubtype::Normal {
        peer.refresh_family(afi_safi);
    }
    State::Established
}

fn fsm_decode_error(peer: &mut Peer, err: WireError) -> State {
    let (code, sub_code) = match peer.state {
        // Failures while the OPEN exchange is still in flight use the
        // OPEN error code unless the header itself was bad.
        State::OpenSent | State::OpenConfirm => match err {
            WireError::BadMarker | WireError::BadLength { .. } | WireError::UnknownType { .. } => {
                err.notify_codes()
            }
            WireError::UnsupportedCapability { .. } => err.notify_codes(),
            _ => (
                NotifyCode::OpenMsgError,
                OpenError::UnsupportedOptionalParameter.into(),
            ),
        },
        _ => err.notify_codes(),
    };
    bgp_debug!(peer = %peer.ident, error = %err, "decode error");
    peer_send_notification(peer, code, sub_code, Vec::new());
    peer_close(peer);
    peer.timer.connect_retry = Some(timer::start_connect_retry_timer(peer));
    State::Idle
}

fn fsm_holdtimer_expires(peer: &mut Peer) -> State {
    match peer.state {
        State::OpenConfirm | State::Established => {
            peer_send_notification(peer, NotifyCode::HoldTimerExpired, 0, Vec::new());
            peer_close(peer);
            peer.timer.connect_retry = Some(timer::start_connect_retry_timer(peer));
            State::Idle
        }
        state => state,
    }
}

fn fsm_keepalive_expires(peer: &mut Peer) -> State {
    peer_send_keepalive(peer);
    peer.state
}

fn fsm_adv_timer_expires(peer: &mut Peer) -> State {
    peer.timer.min_route_adv = None;
    peer.flush_updates();
    if peer.adj_out.has_pending() {
        peer.timer.min_route_adv = Some(timer::start_min_adv_timer(peer));
    }
    peer.state
}

pub fn open_asn(packet: &OpenPacket) -> u32 {
    if let Some(as4) = &packet.caps.as4 {
        as4.asn
    } else {
        packet.asn as u32
    }
}

/// Entering Established: fill the Adj-RIB-Out.  After a graceful
/// restart the retained table is re-announced; otherwise the desired
/// routes are loaded fresh.  Each family ends with an End-of-RIB.
fn session_sync(peer: &mut Peer, routes: &RouteStore) {
    let restarting = peer
        .adj_out
        .families
        .values()
        .any(|family| family.stale);
    if restarting {
        for family in peer.adj_out.families.values_mut() {
            family.stale = false;
            family.refresh();
        }
        peer.timer.stale_timer.clear();
    } else {
        for change in routes.changes_for(peer.ident, &peer.session.families) {
            let mut change = change;
            if !peer.session.is_add_path_send(&change.afi_safi) {
                change.nlri.set_path_id(0);
            }
            peer.adj_out.ingest(&change);
        }
    }
    peer.flush_updates();
    for afi_safi in peer.session.families.clone() {
        peer.send_end_of_rib(afi_safi);
    }
}

/// Leaving Established: with graceful restart negotiated the table is
/// kept under a stale timer and re-emitted on re-establishment;
/// without it the table is flushed.
fn session_down(peer: &mut Peer) {
    if !peer.manual_stop && !peer.session.restart.is_empty() {
        peer.adj_out.mark_stale();
        let stale_time = peer.session.restart_time;
        if peer.debug.graceful_restart {
            bgp_debug!(peer = %peer.ident, stale_time, "table retained for restart");
        }
        for afi_safi in peer.session.restart.clone() {
            let stale = timer::start_stale_timer(peer, afi_safi, stale_time);
            peer.timer.stale_timer.insert(afi_safi, stale);
        }
    } else {
        peer.adj_out.clear();
    }
}

fn peer_close(peer: &mut Peer) {
    peer.task.reader = None;
    peer.task.connect = None;
    // Dropping the sender lets the writer drain anything still queued
    // (a final NOTIFICATION in particular) and exit on its own; the
    // task handle is only replaced on the next connection.
    peer.packet_tx = None;
    peer.timer.hold_timer = None;
    peer.timer.keepalive = None;
    peer.timer.min_route_adv = None;
    peer.opt.clear();
    let _ = peer.opt_tx.send(ParseOption::default());
}

async fn peer_packet_parse(
    rx: &[u8],
    ident: IpAddr,
    tx: mpsc::Sender<Message>,
    opt: &ParseOption,
) -> Result<(), WireError> {
    match BgpPacket::parse_packet(rx, opt) {
        Ok((_, packet)) => {
            let event = match packet {
                BgpPacket::Open(p) => Event::Open(*p),
                BgpPacket::Update(p) => Event::UpdateMsg(p),
                BgpPacket::Notification(p) => Event::NotifMsg(p),
                BgpPacket::Keepalive(_) => Event::KeepaliveMsg,
                BgpPacket::RouteRefresh(p) => Event::RefreshMsg(p),
            };
            let _ = tx.send(Message::Event(ident, event)).await;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

pub async fn peer_read(
    ident: IpAddr,
    tx: mpsc::Sender<Message>,
    mut read_half: OwnedReadHalf,
    opt_rx: watch::Receiver<ParseOption>,
    max_len: usize,
) {
    let mut framer = Framer::with_max_len(max_len);
    let mut buf = BytesMut::with_capacity(BGP_PACKET_LEN * 2);
    loop {
        buf.clear();
        match read_half.read_buf(&mut buf).await {
            Ok(0) => {
                let _ = tx.try_send(Message::Event(ident, Event::ConnFail));
                return;
            }
            Ok(_) => {
                framer.input(&buf);
                loop {
                    match framer.next_frame() {
                        Ok(Some(frame)) => {
                            let opt = opt_rx.borrow().clone();
                            if let Err(err) =
                                peer_packet_parse(&frame, ident, tx.clone(), &opt).await
                            {
                                let _ = tx
                                    .send(Message::Event(ident, Event::DecodeError(err)))
                                    .await;
                                return;
                            }
                        }
                        Ok(None) => break,
                        Err(err) => {
                            let _ = tx
                                .send(Message::Event(ident, Event::DecodeError(err)))
                                .await;
                            return;
                        }
                    }
                }
            }
            Err(_) => {
                let _ = tx.send(Message::Event(ident, Event::ConnFail)).await;
                return;
            }
        }
    }
}

pub fn peer_start_reader(peer: &Peer, read_half: OwnedReadHalf) -> Task<()> {
    let ident = peer.ident;
    let tx = peer.tx.clone();
    let opt_rx = peer.opt_tx.subscribe();
    // Be liberal with inbound frame sizes whenever we offered the
    // extended-message capability.
    let max_len = if peer.config.extended_message {
        BGP_EXTENDED_PACKET_LEN
    } else {
        BGP_PACKET_LEN
    };
    Task::spawn(async move {
        peer_read(ident, tx, read_half, opt_rx, max_len).await;
    })
}

pub fn peer_start_writer(
    mut write_half: OwnedWriteHalf,
    mut rx: UnboundedReceiver<BytesMut>,
) -> Task<()> {
    Task::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let _ = write_half.write_all(&msg).await;
        }
    })
}

async fn peer_connect(
    address: IpAddr,
    md5_password: Option<String>,
    ttl_security: bool,
) -> std::io::Result<TcpStream> {
    let addr = SocketAddr::new(address, BGP_PORT);
    let socket = match address {
        IpAddr::V4(_) => tokio::net::TcpSocket::new_v4()?,
        IpAddr::V6(_) => tokio::net::TcpSocket::new_v6()?,
    };
    if let Some(password) = md5_password.as_deref() {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            super::md5::set_md5_sig(socket.as_raw_fd(), &addr, password)?;
        }
    }
    let stream = socket.connect(addr).await?;
    if ttl_security {
        // GTSM (RFC 5082): originate with maximum TTL.
        stream.set_ttl(255)?;
    }
    Ok(stream)
}

pub fn peer_start_connection(peer: &mut Peer) -> Task<()> {
    let ident = peer.ident;
    let tx = peer.tx.clone();
    let address = peer.address;
    let md5_password = peer.config.md5_password.clone();
    let ttl_security = peer.config.ttl_security.is_some();
    Task::spawn(async move {
        match peer_connect(address, md5_password, ttl_security).await {
            Ok(stream) => {
                let _ = tx.try_send(Message::Event(ident, Event::Connected(stream)));
            }
            Err(_) => {
                let _ = tx.try_send(Message::Event(ident, Event::ConnFail));
            }
        }
    })
}

pub fn peer_send_open(peer: &mut Peer) {
    let Some(packet_tx) = peer.packet_tx.as_ref() else {
        return;
    };
    let header = BgpHeader::new(BgpType::Open, BGP_HEADER_LEN + 10);
    let caps = peer.local_caps();
    peer.caps_sent = caps.clone();

    let hold_time = peer.config.timer.hold_time() as u16;
    peer.param_tx.hold_time = hold_time;
    peer.param_tx.keepalive = hold_time / 3;

    // A 2-byte OPEN ASN field cannot carry a 4-byte number; AS_TRANS
    // stands in, the real ASN travels in the capability (RFC 6793).
    let open_asn = if peer.local_as > u16::MAX as u32 {
        AS_TRANS
    } else {
        peer.local_as as u16
    };
    let open = OpenPacket::new(header, open_asn, hold_time, &peer.router_id, caps);
    peer.events.open_sent(peer.ident, &open);
    let bytes: BytesMut = open.into();
    peer.counter[BgpType::Open as usize].sent += 1;
    let _ = packet_tx.send(bytes);
}

pub fn peer_send_notification(peer: &mut Peer, code: NotifyCode, sub_code: u8, data: Vec<u8>) {
    let Some(packet_tx) = peer.packet_tx.as_ref() else {
        return;
    };
    peer.events.notification_sent(peer.ident, code, sub_code);
    let notification = NotificationPacket::new(code, sub_code, data);
    let bytes: BytesMut = notification.into();
    peer.counter[BgpType::Notification as usize].sent += 1;
    let _ = packet_tx.send(bytes);
}

pub fn peer_send_keepalive(peer: &mut Peer) {
    let Some(packet_tx) = peer.packet_tx.as_ref() else {
        return;
    };
    peer.counter[BgpType::Keepalive as usize].sent += 1;
    let _ = packet_tx.send(keepalive_packet());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn test_peer() -> (Peer, mpsc::Receiver<Message>, UnboundedReceiver<BytesMut>) {
        let (tx, rx) = mpsc::channel(64);
        let mut peer = Peer::new(
            "192.0.2.2".parse().unwrap(),
            65001,
            "10.0.0.1".parse().unwrap(),
            65002,
            "192.0.2.2".parse().unwrap(),
            tx,
            EventSink::default(),
        );
        let (packet_tx, packet_rx) = mpsc::unbounded_channel();
        peer.packet_tx = Some(packet_tx);
        (peer, rx, packet_rx)
    }

    fn open_from(peer: &Peer, asn: u16, hold_time: u16, caps: Caps) -> OpenPacket {
        let header = BgpHeader::new(BgpType::Open, BGP_HEADER_LEN);
        let _ = peer;
        OpenPacket::new(header, asn, hold_time, &"192.0.2.2".parse().unwrap(), caps)
    }

    fn sent_notification(packet_rx: &mut UnboundedReceiver<BytesMut>) -> Option<(u8, u8)> {
        while let Ok(bytes) = packet_rx.try_recv() {
            if bytes.len() >= 21 && bytes[18] == BgpType::Notification as u8 {
                return Some((bytes[19], bytes[20]));
            }
        }
        None
    }

    #[tokio::test]
    async fn hold_timer_expiry_sends_code_4() {
        let (mut peer, _rx, mut packet_rx) = test_peer();
        peer.state = State::Established;
        peer.param.hold_time = 9;
        peer.param.keepalive = 3;

        let state = fsm_holdtimer_expires(&mut peer);
        assert_eq!(state, State::Idle);
        let (code, _sub) = sent_notification(&mut packet_rx).unwrap();
        assert_eq!(code, 4);
    }

    #[tokio::test]
    async fn open_negotiates_hold_time_and_caps() {
        let (mut peer, _rx, _packet_rx) = test_peer();
        peer.state = State::OpenSent;
        peer.config.timer.hold_time = Some(90);
        peer.caps_sent = peer.local_caps();

        let mut caps = Caps::default();
        let v4u = AfiSafi::new(Afi::Ip, Safi::Unicast);
        caps.mp.insert(v4u, v4u.into());
        caps.refresh = Some(CapRefresh::default());
        let open = open_from(&peer, 65002, 30, caps);

        let state = fsm_bgp_open(&mut peer, open);
        assert_eq!(state, State::OpenConfirm);
        // min(local 90, remote 30) and a third of it.
        assert_eq!(peer.param.hold_time, 30);
        assert_eq!(peer.param.keepalive, 10);
        assert!(peer.session.families.contains(&v4u));
        assert!(peer.session.route_refresh);
        assert!(!peer.session.as4);

        // The keepalive that confirms the OPEN moves us to Established.
        let state = fsm_bgp_keepalive(&mut peer);
        assert_eq!(state, State::Established);
    }

    #[tokio::test]
    async fn open_with_wrong_asn_rejected() {
        let (mut peer, _rx, mut packet_rx) = test_peer();
        peer.state = State::OpenSent;
        peer.caps_sent = peer.local_caps();

        let open = open_from(&peer, 64999, 90, Caps::default());
        let state = fsm_bgp_open(&mut peer, open);
        assert_eq!(state, State::Idle);
        let (code, sub) = sent_notification(&mut packet_rx).unwrap();
        assert_eq!(code, 2); // OPEN Message Error
        assert_eq!(sub, 2); // Bad Peer AS
    }

    #[tokio::test]
    async fn open_with_low_hold_time_rejected() {
        let (mut peer, _rx, mut packet_rx) = test_peer();
        peer.state = State::OpenSent;
        peer.caps_sent = peer.local_caps();

        let open = open_from(&peer, 65002, 2, Caps::default());
        let state = fsm_bgp_open(&mut peer, open);
        assert_eq!(state, State::Idle);
        let (code, sub) = sent_notification(&mut packet_rx).unwrap();
        assert_eq!(code, 2);
        assert_eq!(sub, 6); // Unacceptable Hold Time
    }

    #[tokio::test]
    async fn manual_stop_sends_administrative_shutdown() {
        let (mut peer, _rx, mut packet_rx) = test_peer();
        peer.state = State::Established;

        let state = fsm_manual_stop(&mut peer);
        assert_eq!(state, State::Idle);
        assert!(peer.manual_stop);
        let (code, sub) = sent_notification(&mut packet_rx).unwrap();
        assert_eq!(code, 6); // Cease
        assert_eq!(sub, 2); // Administrative Shutdown
    }
}
