use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use bgp_wire::{CeaseError, NotificationPacket, NotifyCode};
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;

use crate::api::{ApiChannel, ApiRequest, CommandTable, EventSink, pipe};
use crate::config::Config;
use crate::context::Task;
use crate::{bgp_error, bgp_info, bgp_warn};

use super::change::Change;
use super::debug::DebugFlags;
use super::peer::{BGP_PORT, Event, Peer, State, fsm};
use super::route::RouteStore;
use super::timer;

#[derive(Debug)]
pub enum Message {
    Event(IpAddr, Event),
    Accept(TcpStream, SocketAddr),
}

/// One speaker process: the peers, the desired route set, the control
/// pipe, and the listening sockets, all driven from a single event
/// loop.
pub struct Speaker {
    pub asn: u32,
    pub router_id: std::net::Ipv4Addr,
    pub peers: BTreeMap<IpAddr, Peer>,
    pub routes: RouteStore,
    pub commands: CommandTable,
    pub events: EventSink,
    pub debug_flags: DebugFlags,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    api: Option<ApiChannel>,
    config: Config,
    listen_task: Option<Task<()>>,
    listen_task6: Option<Task<()>>,
    stopping: bool,
}

fn create_ipv6_listener() -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV6, Type::STREAM, Some(Protocol::TCP))?;
    // IPv6-only so it does not shadow the IPv4 bind.
    socket.set_only_v6(true)?;
    socket.set_reuse_address(true)?;
    let addr = SocketAddr::new(IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED), BGP_PORT);
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    let std_listener: std::net::TcpListener = socket.into();
    std_listener.set_nonblocking(true)?;
    TcpListener::from_std(std_listener)
}

impl Speaker {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel(8192);

        // The pipe prefix comes from the environment, falling back to
        // the configuration.
        let prefix = std::env::var(pipe::PIPE_ENV)
            .ok()
            .or_else(|| config.pipe_prefix.clone());
        let api = match prefix {
            Some(prefix) => Some(pipe::setup(&prefix)?),
            None => None,
        };
        let events = api
            .as_ref()
            .map(|channel| channel.events.clone())
            .unwrap_or_default();

        let mut speaker = Self {
            asn: config.asn,
            router_id: config.router_id,
            peers: BTreeMap::new(),
            routes: RouteStore::default(),
            commands: CommandTable::new(),
            events,
            debug_flags: config.debug.clone(),
            tx,
            rx,
            api,
            config: config.clone(),
            listen_task: None,
            listen_task6: None,
            stopping: false,
        };

        for neighbor in config.neighbors.iter() {
            let mut peer = Peer::new(
                neighbor.address,
                config.asn,
                config.router_id,
                neighbor.remote_asn,
                neighbor.address,
                speaker.tx.clone(),
                speaker.events.clone(),
            );
            peer.config.passive = neighbor.passive;
            peer.config.timer.hold_time = neighbor.hold_time;
            peer.config.timer.connect_retry_time = neighbor.connect_retry_time;
            peer.config.families = neighbor
                .families
                .iter()
                .map(|family| (*family).into())
                .collect();
            for (family, direction) in neighbor.add_path.iter() {
                peer.config.addpath.insert((*family).into(), *direction);
            }
            peer.config.route_refresh = neighbor.route_refresh;
            peer.config.enhanced_refresh = neighbor.enhanced_route_refresh;
            peer.config.extended_message = neighbor.extended_message;
            peer.config.graceful_restart = neighbor.graceful_restart;
            peer.config.send_all_withdraws = neighbor.send_all_withdraws;
            peer.config.md5_password = neighbor.md5_password.clone();
            peer.config.ttl_security = neighbor.ttl_security;
            peer.debug = speaker.debug_flags.clone();
            speaker.peers.insert(neighbor.address, peer);
        }

        // Static announcements share the control pipe grammar.  A bad
        // line is a configuration error and fails startup.
        for line in config.announce.iter() {
            let request = speaker
                .commands
                .parse(line)
                .map_err(|e| anyhow::anyhow!("announce '{}': {}", line, e))?;
            let ApiRequest::Change { scope, change } = request else {
                anyhow::bail!("announce '{}': not a route command", line);
            };
            speaker.routes.apply(scope, &change);
        }

        Ok(speaker)
    }

    async fn listen(&mut self) -> anyhow::Result<()> {
        let mut bound = false;

        match TcpListener::bind(("0.0.0.0", BGP_PORT)).await {
            Ok(listener) => {
                bound = true;
                self.apply_listener_md5(&listener);
                let tx = self.tx.clone();
                self.listen_task = Some(Task::spawn(async move {
                    loop {
                        match listener.accept().await {
                            Ok((socket, sockaddr)) => {
                                if tx.send(Message::Accept(socket, sockaddr)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                bgp_warn!(error = %e, "accept failed");
                                // Back off so an FD-exhausted accept
                                // loop cannot spin.
                                tokio::time::sleep(Duration::from_secs(1)).await;
                            }
                        }
                    }
                }));
            }
            Err(e) => bgp_warn!(error = %e, "bind 0.0.0.0:179 failed"),
        }

        match create_ipv6_listener() {
            Ok(listener) => {
                bound = true;
                self.apply_listener_md5(&listener);
                let tx = self.tx.clone();
                self.listen_task6 = Some(Task::spawn(async move {
                    loop {
                        match listener.accept().await {
                            Ok((socket, sockaddr)) => {
                                if tx.send(Message::Accept(socket, sockaddr)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                bgp_warn!(error = %e, "accept failed");
                                tokio::time::sleep(Duration::from_secs(1)).await;
                            }
                        }
                    }
                }));
            }
            Err(e) => bgp_warn!(error = %e, "bind [::]:179 failed"),
        }

        if !bound {
            anyhow::bail!("failed to bind a listening socket");
        }
        Ok(())
    }

    fn apply_listener_md5(&self, listener: &TcpListener) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            for peer in self.peers.values() {
                if let Some(password) = peer.config.md5_password.as_deref() {
                    let addr = SocketAddr::new(peer.address, 0);
                    if let Err(e) =
                        super::md5::set_md5_sig(listener.as_raw_fd(), &addr, password)
                    {
                        bgp_warn!(peer = %peer.ident, error = %e, "TCP MD5 setup failed");
                    }
                }
            }
        }
    }

    fn process_msg(&mut self, msg: Message) {
        if self.debug_flags.event {
            crate::bgp_debug!(?msg, "event");
        }
        match msg {
            Message::Event(id, event) => {
                fsm(&mut self.peers, &self.routes, id, event);
            }
            Message::Accept(socket, sockaddr) => {
                self.accept(socket, sockaddr);
            }
        }
    }

    /// Inbound connection handling, including RFC 4271 §6.8 collision
    /// resolution: while the OPEN exchange is in flight the side with
    /// the numerically higher identifier keeps its outbound connection.
    fn accept(&mut self, stream: TcpStream, sockaddr: SocketAddr) {
        enum AcceptAction {
            Drop,
            Deliver,
            Reject(CeaseError),
        }

        let peer_addr = sockaddr.ip();
        let action = match self.peers.get(&peer_addr) {
            None => AcceptAction::Drop,
            Some(peer) => match peer.state {
                State::Idle => AcceptAction::Drop,
                State::Connect | State::Active => AcceptAction::Deliver,
                State::OpenSent | State::OpenConfirm => {
                    let local = u32::from(peer.router_id);
                    let remote = u32::from(peer.remote_id);
                    if local > remote {
                        AcceptAction::Reject(CeaseError::ConnectionCollisionResolution)
                    } else {
                        // The remote side wins: its inbound connection
                        // replaces ours.
                        AcceptAction::Deliver
                    }
                }
                State::Established => AcceptAction::Reject(CeaseError::ConnectionRejected),
            },
        };

        match action {
            AcceptAction::Drop => drop(stream),
            AcceptAction::Deliver => {
                fsm(
                    &mut self.peers,
                    &self.routes,
                    peer_addr,
                    Event::Connected(stream),
                );
            }
            AcceptAction::Reject(sub_code) => {
                reject_connection(stream, NotifyCode::Cease, sub_code.into())
            }
        }
    }

    fn process_command(&mut self, line: String) {
        let request = match self.commands.parse(&line) {
            Ok(request) => request,
            Err(e) => {
                self.events.error(&e.to_string());
                return;
            }
        };
        match request {
            ApiRequest::Change { scope, change } => self.apply_change(scope, change),
            ApiRequest::Shutdown => {
                bgp_info!("shutdown requested via control pipe");
                self.stopping = true;
            }
            ApiRequest::Restart => {
                let idents: Vec<IpAddr> = self.peers.keys().copied().collect();
                for id in idents {
                    fsm(&mut self.peers, &self.routes, id, Event::ManualStop);
                    if let Some(peer) = self.peers.get_mut(&id) {
                        peer.manual_stop = false;
                        timer::update_timers(peer);
                    }
                }
            }
            ApiRequest::Reload => match Config::load(std::path::Path::new(&self.config_path())) {
                Ok(config) => self.reload_announcements(config),
                Err(e) => self.events.error(&format!("reload failed: {}", e)),
            },
            ApiRequest::Version => {
                self.events.version(env!("CARGO_PKG_VERSION"));
            }
            ApiRequest::Teardown(addr) => {
                fsm(&mut self.peers, &self.routes, addr, Event::ManualStop);
            }
        }
    }

    fn config_path(&self) -> String {
        std::env::args()
            .skip_while(|arg| arg != "--config")
            .nth(1)
            .unwrap_or_default()
    }

    fn reload_announcements(&mut self, config: Config) {
        for line in config.announce.iter() {
            match self.commands.parse(line) {
                Ok(ApiRequest::Change { scope, change }) => self.apply_change(scope, change),
                Ok(_) => {}
                Err(e) => self.events.error(&format!("reload '{}': {}", line, e)),
            }
        }
    }

    /// Fold one change into the desired route set and into every
    /// matching peer's Adj-RIB-Out.
    pub fn apply_change(&mut self, scope: Option<IpAddr>, change: Change) {
        self.routes.apply(scope, &change);

        let targets: Vec<IpAddr> = self
            .peers
            .keys()
            .filter(|addr| scope.is_none_or(|scope| scope == **addr))
            .copied()
            .collect();
        for id in targets {
            let Some(peer) = self.peers.get_mut(&id) else {
                continue;
            };
            if !peer.state.is_established() {
                continue;
            }
            if !peer.session.families.contains(&change.afi_safi) {
                continue;
            }
            let mut change = change.clone();
            if !peer.session.is_add_path_send(&change.afi_safi) {
                change.nlri.set_path_id(0);
            }
            peer.adj_out.ingest(&change);
            if peer.adj_out.has_pending() && peer.timer.min_route_adv.is_none() {
                peer.timer.min_route_adv = Some(timer::start_min_adv_timer(peer));
            }
        }
    }

    /// Administrative shutdown: Cease to every live session, a short
    /// linger for the FINs, then out.
    async fn graceful_shutdown(&mut self) {
        for peer in self.peers.values_mut() {
            if peer.packet_tx.is_some() {
                super::peer::peer_send_notification(
                    peer,
                    NotifyCode::Cease,
                    CeaseError::AdministrativeShutdown.into(),
                    Vec::new(),
                );
            }
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
        for peer in self.peers.values_mut() {
            peer.task.reader = None;
            peer.task.writer = None;
            peer.packet_tx = None;
        }
    }

    pub async fn event_loop(&mut self) -> anyhow::Result<()> {
        if self.config.listen && let Err(err) = self.listen().await {
            bgp_error!(error = %err, "listen failed");
            return Err(err);
        }

        for (id, peer) in self.peers.iter_mut() {
            peer.start();
            let _ = self.tx.send(Message::Event(*id, Event::Start)).await;
        }
        bgp_info!(asn = self.asn, peers = self.peers.len(), "speaker started");

        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

        loop {
            if self.stopping {
                break;
            }
            tokio::select! {
                Some(msg) = self.rx.recv() => {
                    self.process_msg(msg);
                }
                Some(line) = recv_command(&mut self.api) => {
                    self.process_command(line);
                }
                _ = sigterm.recv() => {
                    bgp_info!("SIGTERM received");
                    break;
                }
                _ = sigint.recv() => {
                    bgp_info!("SIGINT received");
                    break;
                }
            }
        }

        self.graceful_shutdown().await;
        Ok(())
    }
}

async fn recv_command(api: &mut Option<ApiChannel>) -> Option<String> {
    match api.as_mut() {
        Some(channel) => channel.commands.recv().await,
        // No control pipe: never resolves, never loops.
        None => std::future::pending().await,
    }
}

/// Reject a connection by sending a NOTIFICATION and closing the
/// socket, bounded so a slow peer cannot pin the FD.
fn reject_connection(stream: TcpStream, code: NotifyCode, sub_code: u8) {
    tokio::spawn(async move {
        let notification = NotificationPacket::new(code, sub_code, Vec::new());
        let bytes: BytesMut = notification.into();
        let mut stream = stream;
        let _ = tokio::time::timeout(Duration::from_secs(5), async {
            let _ = stream.write_all(&bytes).await;
            let _ = stream.shutdown().await;
        })
        .await;
    });
}
