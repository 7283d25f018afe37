use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use bgp_wire::{
    Afi, AfiSafi, AsPath, Attrs, BinaryOp, BinaryOperator, Community, ExtCommunity,
    ExtCommunityValue, FlowspecComponent, FlowspecNlri, Ipv4Nlri, Ipv6Nlri, Label, LabeledNlri,
    LargeCommunity, LocalPref, Med, MpNlri, NumericOp, NumericOperator, Origin,
    RouteDistinguisher, Safi, VpnNlri,
};
use ipnet::IpNet;
use thiserror::Error;

use crate::bgp::change::{Action, Change};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct CommandError(pub String);

fn err(msg: impl Into<String>) -> CommandError {
    CommandError(msg.into())
}

#[derive(Debug)]
pub enum ApiRequest {
    Change {
        scope: Option<IpAddr>,
        change: Change,
    },
    Shutdown,
    Restart,
    Reload,
    Version,
    Teardown(IpAddr),
}

pub struct Tokens {
    items: Vec<String>,
    pos: usize,
}

impl Tokens {
    /// Whitespace tokenizer that splits the flow punctuation
    /// (`{ } ; [ ]`) into their own tokens and keeps a double-quoted
    /// run as one token.
    fn tokenize(line: &str) -> Self {
        let mut items = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        for ch in line.chars() {
            match ch {
                '"' => {
                    quoted = !quoted;
                    if !quoted && !current.is_empty() {
                        items.push(std::mem::take(&mut current));
                    }
                }
                _ if quoted => current.push(ch),
                '{' | '}' | ';' | '[' | ']' => {
                    if !current.is_empty() {
                        items.push(std::mem::take(&mut current));
                    }
                    items.push(ch.to_string());
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        items.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() {
            items.push(current);
        }
        Self { items, pos: 0 }
    }

    fn next(&mut self) -> Option<&str> {
        let item = self.items.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    fn peek(&self) -> Option<&str> {
        self.items.get(self.pos).map(String::as_str)
    }

    fn expect(&mut self, keyword: &str) -> Result<(), CommandError> {
        match self.next() {
            Some(token) if token == keyword => Ok(()),
            Some(token) => Err(err(format!("expected '{}', got '{}'", keyword, token))),
            None => Err(err(format!("expected '{}'", keyword))),
        }
    }

    fn need(&mut self, what: &str) -> Result<String, CommandError> {
        self.next()
            .map(str::to_string)
            .ok_or_else(|| err(format!("missing {}", what)))
    }
}

type Handler = fn(&mut Tokens) -> Result<ApiRequest, CommandError>;

/// Keyword-dispatched command parser for the control pipe; the same
/// table parses static `announce` lines from the configuration.
pub struct CommandTable {
    handlers: HashMap<&'static str, Handler>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        let mut table = Self {
            handlers: HashMap::new(),
        };
        table.register("announce", cmd_announce);
        table.register("withdraw", cmd_withdraw);
        table.register("shutdown", |_| Ok(ApiRequest::Shutdown));
        table.register("restart", |_| Ok(ApiRequest::Restart));
        table.register("reload", |_| Ok(ApiRequest::Reload));
        table.register("version", |_| Ok(ApiRequest::Version));
        table.register("teardown", cmd_teardown);
        table
    }

    fn register(&mut self, keyword: &'static str, handler: Handler) {
        self.handlers.insert(keyword, handler);
    }

    pub fn parse(&self, line: &str) -> Result<ApiRequest, CommandError> {
        let mut tokens = Tokens::tokenize(line);
        let Some(first) = tokens.next().map(str::to_string) else {
            return Err(err("empty command"));
        };

        // `neighbor <ip> announce ...` scopes the change to one peer.
        let (keyword, scope) = if first == "neighbor" {
            let addr: IpAddr = tokens
                .need("neighbor address")?
                .parse()
                .map_err(|_| err("invalid neighbor address"))?;
            (tokens.need("command")?, Some(addr))
        } else {
            (first, None)
        };

        let handler = self
            .handlers
            .get(keyword.as_str())
            .ok_or_else(|| err(format!("unknown command '{}'", keyword)))?;
        let request = handler(&mut tokens)?;

        match (scope, request) {
            (None, request) => Ok(request),
            (scope @ Some(_), ApiRequest::Change { change, .. }) => {
                Ok(ApiRequest::Change { scope, change })
            }
            (Some(_), _) => Err(err("only announce/withdraw may be neighbor-scoped")),
        }
    }
}

fn cmd_announce(tokens: &mut Tokens) -> Result<ApiRequest, CommandError> {
    route_command(tokens, Action::Announce)
}

fn cmd_withdraw(tokens: &mut Tokens) -> Result<ApiRequest, CommandError> {
    route_command(tokens, Action::Withdraw)
}

fn cmd_teardown(tokens: &mut Tokens) -> Result<ApiRequest, CommandError> {
    let addr: IpAddr = tokens
        .need("neighbor address")?
        .parse()
        .map_err(|_| err("invalid neighbor address"))?;
    Ok(ApiRequest::Teardown(addr))
}

fn route_command(tokens: &mut Tokens, action: Action) -> Result<ApiRequest, CommandError> {
    let kind = tokens.need("route kind")?;
    let change = match kind.as_str() {
        "route" => parse_route(tokens, action)?,
        "vpn" => parse_vpn(tokens, action)?,
        "flow" => parse_flow(tokens, action)?,
        other => return Err(err(format!("unknown announcement kind '{}'", other))),
    };
    Ok(ApiRequest::Change {
        scope: None,
        change,
    })
}

/// Shared attribute/NLRI builder for `route` and `vpn` forms.
struct RouteBuilder {
    prefix: IpNet,
    attrs: Attrs,
    labels: Vec<Label>,
    rd: Option<RouteDistinguisher>,
    path_id: u32,
}

impl RouteBuilder {
    fn new(prefix: IpNet) -> Self {
        Self {
            prefix,
            attrs: Attrs::new(),
            labels: Vec::new(),
            rd: None,
            path_id: 0,
        }
    }

    fn consume(&mut self, tokens: &mut Tokens) -> Result<(), CommandError> {
        while let Some(keyword) = tokens.next().map(str::to_string) {
            match keyword.as_str() {
                "next-hop" => {
                    let addr: IpAddr = tokens
                        .need("next-hop address")?
                        .parse()
                        .map_err(|_| err("invalid next-hop"))?;
                    self.attrs.nexthop = Some(addr);
                }
                "origin" => {
                    self.attrs.origin = Some(
                        tokens
                            .need("origin")?
                            .parse::<Origin>()
                            .map_err(|_| err("invalid origin"))?,
                    );
                }
                "med" => {
                    let med: u32 = tokens
                        .need("med")?
                        .parse()
                        .map_err(|_| err("invalid med"))?;
                    self.attrs.med = Some(Med::new(med));
                }
                "local-preference" => {
                    let pref: u32 = tokens
                        .need("local-preference")?
                        .parse()
                        .map_err(|_| err("invalid local-preference"))?;
                    self.attrs.local_pref = Some(LocalPref::new(pref));
                }
                "as-path" => {
                    let values = bracketed_values(tokens, "as-path")?;
                    let path: AsPath = values
                        .join(" ")
                        .parse()
                        .map_err(|_| err("invalid as-path"))?;
                    self.attrs.aspath = Some(path);
                }
                "community" => {
                    let values = bracketed_values(tokens, "community")?;
                    let com: Community = values
                        .join(" ")
                        .parse()
                        .map_err(|_| err("invalid community"))?;
                    self.attrs.com = Some(com);
                }
                "extended-community" => {
                    let values = bracketed_values(tokens, "extended-community")?;
                    let mut ecom = ExtCommunity::new();
                    for value in values {
                        ecom.push(
                            value
                                .parse::<ExtCommunityValue>()
                                .map_err(|_| err("invalid extended-community"))?,
                        );
                    }
                    ecom.sort_uniq();
                    self.attrs.ecom = Some(ecom);
                }
                "large-community" => {
                    let values = bracketed_values(tokens, "large-community")?;
                    let lcom: LargeCommunity = values
                        .join(" ")
                        .parse()
                        .map_err(|_| err("invalid large-community"))?;
                    self.attrs.lcom = Some(lcom);
                }
                "path-information" => {
                    let value = tokens.need("path-information")?;
                    self.path_id = match value.parse::<u32>() {
                        Ok(id) => id,
                        Err(_) => value
                            .parse::<std::net::Ipv4Addr>()
                            .map(u32::from)
                            .map_err(|_| err("invalid path-information"))?,
                    };
                }
                "label" => {
                    let label: u32 = tokens
                        .need("label")?
                        .parse()
                        .map_err(|_| err("invalid label"))?;
                    self.labels.push(Label::new(label, 0, false));
                }
                "rd" => {
                    let rd: RouteDistinguisher = tokens
                        .need("rd")?
                        .parse()
                        .map_err(|_| err("invalid rd"))?;
                    self.rd = Some(rd);
                }
                other => return Err(err(format!("unknown attribute '{}'", other))),
            }
        }
        if let Some(last) = self.labels.last_mut() {
            last.bos = true;
        }
        Ok(())
    }

    fn family(&self) -> AfiSafi {
        let afi = match self.prefix {
            IpNet::V4(_) => Afi::Ip,
            IpNet::V6(_) => Afi::Ip6,
        };
        let safi = if self.rd.is_some() {
            Safi::MplsVpn
        } else if !self.labels.is_empty() {
            Safi::MplsLabel
        } else {
            Safi::Unicast
        };
        AfiSafi::new(afi, safi)
    }

    fn build(mut self, action: Action) -> Result<Change, CommandError> {
        let afi_safi = self.family();
        if action == Action::Announce && self.attrs.nexthop.is_none() {
            return Err(err("announce requires a next-hop"));
        }
        if afi_safi.is_labeled() && self.labels.is_empty() {
            self.labels.push(Label::default());
        }
        let nlri = match afi_safi.safi {
            Safi::MplsVpn => {
                let rd = self.rd.ok_or_else(|| err("vpn route requires rd"))?;
                let mut nlri = VpnNlri::new(self.labels, rd, self.prefix);
                nlri.id = self.path_id;
                MpNlri::Vpn(nlri)
            }
            Safi::MplsLabel => {
                let mut nlri = LabeledNlri::new(self.labels, self.prefix);
                nlri.id = self.path_id;
                MpNlri::Labeled(nlri)
            }
            _ => match self.prefix {
                IpNet::V4(prefix) => {
                    let mut nlri = Ipv4Nlri::new(prefix);
                    nlri.id = self.path_id;
                    MpNlri::Ipv4(nlri)
                }
                IpNet::V6(prefix) => {
                    let mut nlri = Ipv6Nlri::new(prefix);
                    nlri.id = self.path_id;
                    MpNlri::Ipv6(nlri)
                }
            },
        };
        Ok(Change {
            afi_safi,
            nlri,
            attrs: Arc::new(self.attrs),
            action,
        })
    }
}

fn parse_prefix(token: &str) -> Result<IpNet, CommandError> {
    if token.contains('/') {
        token.parse().map_err(|_| err("invalid prefix"))
    } else {
        // Host route shorthand.
        let addr: IpAddr = token.parse().map_err(|_| err("invalid prefix"))?;
        let plen = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        IpNet::new(addr, plen).map_err(|_| err("invalid prefix"))
    }
}

fn parse_route(tokens: &mut Tokens, action: Action) -> Result<Change, CommandError> {
    let prefix = parse_prefix(&tokens.need("prefix")?)?;
    let mut builder = RouteBuilder::new(prefix);
    builder.consume(tokens)?;
    builder.build(action)
}

/// `announce vpn <rd>:<prefix> ...`; the rd may also come as a
/// keyword.
fn parse_vpn(tokens: &mut Tokens, action: Action) -> Result<Change, CommandError> {
    let spec = tokens.need("vpn prefix")?;
    let (rd, prefix) = match spec.splitn(3, ':').collect::<Vec<&str>>()[..] {
        [asn, num, prefix] if prefix.contains('/') && !prefix.contains(':') => {
            let rd: RouteDistinguisher = format!("{}:{}", asn, num)
                .parse()
                .map_err(|_| err("invalid rd"))?;
            (Some(rd), parse_prefix(prefix)?)
        }
        _ => (None, parse_prefix(&spec)?),
    };
    let mut builder = RouteBuilder::new(prefix);
    builder.rd = rd;
    builder.consume(tokens)?;
    if builder.rd.is_none() {
        return Err(err("vpn route requires rd"));
    }
    builder.build(action)
}

/// `announce flow { [rd <rd>;] match { ... } then { ... } }`.
fn parse_flow(tokens: &mut Tokens, action: Action) -> Result<Change, CommandError> {
    tokens.expect("{")?;
    let mut rd: Option<RouteDistinguisher> = None;
    if tokens.peek() == Some("rd") {
        tokens.next();
        rd = Some(
            tokens
                .need("rd")?
                .parse()
                .map_err(|_| err("invalid rd"))?,
        );
        tokens.expect(";")?;
    }
    tokens.expect("match")?;
    tokens.expect("{")?;
    let mut components = Vec::new();
    let mut afi = Afi::Ip;
    while tokens.peek() != Some("}") {
        let component = parse_flow_component(tokens)?;
        match &component {
            FlowspecComponent::DestinationPrefix(prefix)
            | FlowspecComponent::SourcePrefix(prefix) => {
                if matches!(prefix, IpNet::V6(_)) {
                    afi = Afi::Ip6;
                }
            }
            _ => {}
        }
        components.push(component);
    }
    tokens.expect("}")?;

    tokens.expect("then")?;
    tokens.expect("{")?;
    let mut attrs = Attrs::new();
    let mut ecom = ExtCommunity::new();
    while tokens.peek() != Some("}") {
        parse_flow_action(tokens, &mut attrs, &mut ecom)?;
    }
    tokens.expect("}")?;
    tokens.expect("}")?;
    if !ecom.0.is_empty() {
        ecom.sort_uniq();
        attrs.ecom = Some(ecom);
    }

    let mut nlri = FlowspecNlri::new(components);
    nlri.rd = rd;
    let safi = if nlri.rd.is_some() {
        Safi::FlowspecVpn
    } else {
        Safi::Flowspec
    };
    Ok(Change {
        afi_safi: AfiSafi::new(afi, safi),
        nlri: MpNlri::Flowspec(nlri),
        attrs: Arc::new(attrs),
        action,
    })
}

/// `=80`, `>1024`, `>=1024`, `<512`, `<=512`, `&`-prefixed for an
/// AND with the previous term, bare numbers mean equality.
fn numeric_ops(values: &[String]) -> Result<Vec<NumericOp>, CommandError> {
    let mut ops = Vec::new();
    for value in values {
        let mut rest = value.as_str();
        let mut op = NumericOperator::empty();
        if let Some(stripped) = rest.strip_prefix('&') {
            op |= NumericOperator::AND;
            rest = stripped;
        }
        if let Some(stripped) = rest.strip_prefix(">=") {
            op |= NumericOperator::GT | NumericOperator::EQ;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("<=") {
            op |= NumericOperator::LT | NumericOperator::EQ;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('>') {
            op |= NumericOperator::GT;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('<') {
            op |= NumericOperator::LT;
            rest = stripped;
        } else {
            rest = rest.strip_prefix('=').unwrap_or(rest);
            op |= NumericOperator::EQ;
        }
        let value: u64 = rest.parse().map_err(|_| err("invalid numeric value"))?;
        ops.push(NumericOp { op, value });
    }
    if ops.is_empty() {
        return Err(err("empty value list"));
    }
    Ok(ops)
}

fn tcp_flag_bits(token: &str) -> Result<u64, CommandError> {
    Ok(match token {
        "fin" => 0x01,
        "syn" => 0x02,
        "rst" => 0x04,
        "push" => 0x08,
        "ack" => 0x10,
        "urgent" => 0x20,
        other => other
            .parse::<u64>()
            .map_err(|_| err("invalid tcp-flags value"))?,
    })
}

fn fragment_bits(token: &str) -> Result<u64, CommandError> {
    Ok(match token {
        "dont-fragment" => 0x01,
        "is-fragment" => 0x02,
        "first-fragment" => 0x04,
        "last-fragment" => 0x08,
        other => other
            .parse::<u64>()
            .map_err(|_| err("invalid fragment value"))?,
    })
}

fn binary_ops(values: &[String], bits: fn(&str) -> Result<u64, CommandError>)
    -> Result<Vec<BinaryOp>, CommandError>
{
    let mut ops = Vec::new();
    for value in values {
        let mut rest = value.as_str();
        let mut op = BinaryOperator::MATCH;
        if let Some(stripped) = rest.strip_prefix('!') {
            op |= BinaryOperator::NOT;
            rest = stripped;
        }
        ops.push(BinaryOp {
            op,
            value: bits(rest)?,
        });
    }
    if ops.is_empty() {
        return Err(err("empty value list"));
    }
    Ok(ops)
}

fn values_until_semicolon(tokens: &mut Tokens) -> Result<Vec<String>, CommandError> {
    let mut values = Vec::new();
    loop {
        match tokens.next() {
            Some(";") => return Ok(values),
            Some(value) => values.push(value.to_string()),
            None => return Err(err("missing ';'")),
        }
    }
}

fn parse_flow_component(tokens: &mut Tokens) -> Result<FlowspecComponent, CommandError> {
    let keyword = tokens.need("match keyword")?;
    let values = values_until_semicolon(tokens)?;
    let single = || -> Result<&String, CommandError> {
        if values.len() != 1 {
            return Err(err(format!("'{}' takes one value", keyword)));
        }
        Ok(&values[0])
    };
    Ok(match keyword.as_str() {
        "destination" => FlowspecComponent::DestinationPrefix(parse_prefix(single()?)?),
        "source" => FlowspecComponent::SourcePrefix(parse_prefix(single()?)?),
        "protocol" => FlowspecComponent::IpProtocol(numeric_ops(&proto_values(values)?)?),
        "port" => FlowspecComponent::Port(numeric_ops(&values)?),
        "destination-port" => FlowspecComponent::DestinationPort(numeric_ops(&values)?),
        "source-port" => FlowspecComponent::SourcePort(numeric_ops(&values)?),
        "icmp-type" => FlowspecComponent::IcmpType(numeric_ops(&values)?),
        "icmp-code" => FlowspecComponent::IcmpCode(numeric_ops(&values)?),
        "tcp-flags" => FlowspecComponent::TcpFlags(binary_ops(&values, tcp_flag_bits)?),
        "packet-length" => FlowspecComponent::PacketLength(numeric_ops(&values)?),
        "dscp" => FlowspecComponent::Dscp(numeric_ops(&values)?),
        "fragment" => FlowspecComponent::Fragment(binary_ops(&values, fragment_bits)?),
        other => return Err(err(format!("unknown match keyword '{}'", other))),
    })
}

fn proto_values(values: Vec<String>) -> Result<Vec<String>, CommandError> {
    Ok(values
        .into_iter()
        .map(|value| match value.as_str() {
            "icmp" => "1".to_string(),
            "tcp" => "6".to_string(),
            "udp" => "17".to_string(),
            other => other.to_string(),
        })
        .collect())
}

fn parse_flow_action(
    tokens: &mut Tokens,
    attrs: &mut Attrs,
    ecom: &mut ExtCommunity,
) -> Result<(), CommandError> {
    let keyword = tokens.need("action keyword")?;
    match keyword.as_str() {
        "discard" => {
            tokens.expect(";")?;
            ecom.push(ExtCommunityValue::traffic_rate(0, 0.0));
        }
        "rate-limit" => {
            let rate: f32 = tokens
                .need("rate")?
                .parse()
                .map_err(|_| err("invalid rate"))?;
            tokens.expect(";")?;
            ecom.push(ExtCommunityValue::traffic_rate(0, rate));
        }
        "redirect" => {
            let target = tokens.need("redirect target")?;
            tokens.expect(";")?;
            let (asn, num) = target
                .split_once(':')
                .ok_or_else(|| err("invalid redirect target"))?;
            let asn: u16 = asn.parse().map_err(|_| err("invalid redirect target"))?;
            let num: u32 = num.parse().map_err(|_| err("invalid redirect target"))?;
            ecom.push(ExtCommunityValue::redirect(asn, num));
        }
        "mark" => {
            let dscp: u8 = tokens
                .need("dscp")?
                .parse()
                .map_err(|_| err("invalid dscp"))?;
            tokens.expect(";")?;
            ecom.push(ExtCommunityValue::traffic_marking(dscp));
        }
        "community" => {
            let values = bracketed_values(tokens, "community")?;
            tokens.expect(";")?;
            attrs.com = Some(
                values
                    .join(" ")
                    .parse()
                    .map_err(|_| err("invalid community"))?,
            );
        }
        "accept" => {
            tokens.expect(";")?;
        }
        other => return Err(err(format!("unknown action keyword '{}'", other))),
    }
    Ok(())
}

/// One value, or a `[ v1 v2 ... ]` list.
fn bracketed_values(tokens: &mut Tokens, what: &str) -> Result<Vec<String>, CommandError> {
    match tokens.peek() {
        Some("[") => {
            tokens.next();
            let mut values = Vec::new();
            loop {
                match tokens.next() {
                    Some("]") => break,
                    Some(value) => values.push(value.to_string()),
                    None => return Err(err(format!("unterminated {} list", what))),
                }
            }
            Ok(values)
        }
        Some(_) => Ok(vec![tokens.need(what)?]),
        None => Err(err(format!("missing {}", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::new()
    }

    fn change(line: &str) -> Change {
        match table().parse(line).unwrap() {
            ApiRequest::Change { change, .. } => change,
            other => panic!("expected change, got {:?}", other),
        }
    }

    #[test]
    fn announce_route() {
        let change = change(
            "announce route 10.0.0.0/24 next-hop 192.0.2.1 med 100 \
             community [ 65000:1 no-export ] as-path [ 65001 65002 ]",
        );
        assert_eq!(change.action, Action::Announce);
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip, Safi::Unicast));
        assert_eq!(change.attrs.med, Some(Med::new(100)));
        assert_eq!(
            change.attrs.aspath,
            Some(AsPath::sequence(vec![65001, 65002]))
        );
        let MpNlri::Ipv4(nlri) = &change.nlri else {
            panic!("expected ipv4 NLRI");
        };
        assert_eq!(nlri.prefix, "10.0.0.0/24".parse().unwrap());
    }

    #[test]
    fn withdraw_route() {
        let change = change("withdraw route 10.0.0.0/24");
        assert_eq!(change.action, Action::Withdraw);
    }

    #[test]
    fn quoted_as_path() {
        let change =
            change("announce route 10.0.0.0/24 next-hop 192.0.2.1 as-path \"65001 65002\"");
        assert_eq!(
            change.attrs.aspath,
            Some(AsPath::sequence(vec![65001, 65002]))
        );
    }

    #[test]
    fn announce_ipv6_route() {
        let change = change("announce route 2001:db8::/32 next-hop 2001:db8::1");
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip6, Safi::Unicast));
    }

    #[test]
    fn announce_vpn() {
        let change = change(
            "announce vpn 65000:1:10.1.0.0/24 label 16 next-hop 192.0.2.1 \
             extended-community rt:65000:1",
        );
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip, Safi::MplsVpn));
        let MpNlri::Vpn(nlri) = &change.nlri else {
            panic!("expected vpn NLRI");
        };
        assert_eq!(nlri.rd.to_string(), "65000:1");
        assert_eq!(nlri.labels.len(), 1);
        assert_eq!(nlri.labels[0].label, 16);
        assert!(nlri.labels[0].bos);
    }

    #[test]
    fn announce_labeled_unicast() {
        let change = change("announce route 10.0.0.0/24 label 100 next-hop 192.0.2.1");
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip, Safi::MplsLabel));
    }

    #[test]
    fn announce_flow() {
        let change = change(
            "announce flow { match { destination 10.0.0.0/24; protocol tcp; \
             destination-port =443; } then { rate-limit 1000; } }",
        );
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip, Safi::Flowspec));
        let MpNlri::Flowspec(nlri) = &change.nlri else {
            panic!("expected flowspec NLRI");
        };
        assert_eq!(nlri.components.len(), 3);
        // Canonical order regardless of input order.
        assert_eq!(nlri.components[0].component_type(), 1);
        assert!(change.attrs.ecom.is_some());
    }

    #[test]
    fn flow_discard_and_vpn() {
        let change = change(
            "announce flow { rd 65000:1; match { source 192.0.2.0/24; } then { discard; } }",
        );
        assert_eq!(change.afi_safi, AfiSafi::new(Afi::Ip, Safi::FlowspecVpn));
        let ecom = change.attrs.ecom.as_ref().unwrap();
        assert_eq!(ecom.0[0], ExtCommunityValue::traffic_rate(0, 0.0));
    }

    #[test]
    fn neighbor_scoped_announce() {
        let request = table()
            .parse("neighbor 192.0.2.9 announce route 10.0.0.0/24 next-hop 192.0.2.1")
            .unwrap();
        let ApiRequest::Change { scope, .. } = request else {
            panic!("expected change");
        };
        assert_eq!(scope, Some("192.0.2.9".parse().unwrap()));
    }

    #[test]
    fn path_information() {
        let change_1 =
            change("announce route 10.0.0.0/24 next-hop 192.0.2.1 path-information 7");
        assert_eq!(change_1.nlri.path_id(), 7);
        let change_2 =
            change("announce route 10.0.0.0/24 next-hop 192.0.2.1 path-information 0.0.0.1");
        assert_eq!(change_2.nlri.path_id(), 1);
    }

    #[test]
    fn control_commands() {
        assert!(matches!(
            table().parse("shutdown").unwrap(),
            ApiRequest::Shutdown
        ));
        assert!(matches!(
            table().parse("teardown 192.0.2.9").unwrap(),
            ApiRequest::Teardown(_)
        ));
        assert!(table().parse("bogus command").is_err());
        assert!(table().parse("announce route 10.0.0.0/24").is_err());
    }
}
