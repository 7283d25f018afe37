use std::fmt;

use bitflags::bitflags;
use bytes::{BufMut, BytesMut};
use ipnet::IpNet;
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take;
use nom::error::{ErrorKind, make_error};
use nom::number::complete::be_u8;

use crate::{Afi, RouteDistinguisher, attrs::nlri_labeled::parse_prefix};

bitflags! {
    /// Operator byte for numeric component values (RFC 5575 §4).
    /// Length bits are filled in at emit time from the value width.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NumericOperator: u8 {
        const EQ = 0b0000_0001;
        const GT = 0b0000_0010;
        const LT = 0b0000_0100;
        const AND = 0b0100_0000;
        const EOL = 0b1000_0000;
    }
}

bitflags! {
    /// Operator byte for bitmask component values (tcp-flags, fragment).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct BinaryOperator: u8 {
        const MATCH = 0b0000_0001;
        const NOT = 0b0000_0010;
        const AND = 0b0100_0000;
        const EOL = 0b1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericOp {
    pub op: NumericOperator,
    pub value: u64,
}

impl NumericOp {
    pub fn eq(value: u64) -> Self {
        Self {
            op: NumericOperator::EQ,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub value: u64,
}

/// Minimal encodable width of a component value: 1, 2, 4 or 8 bytes.
fn value_width(value: u64) -> u8 {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

fn len_bits(width: u8) -> u8 {
    match width {
        1 => 0,
        2 => 1,
        4 => 2,
        _ => 3,
    }
}

fn width_from_op(op: u8) -> usize {
    1 << ((op & 0x30) >> 4)
}

fn emit_op_value(buf: &mut BytesMut, op: u8, value: u64, last: bool) {
    let width = value_width(value);
    let mut op = (op & !0xB0) | (len_bits(width) << 4);
    if last {
        op |= 0x80;
    }
    buf.put_u8(op);
    match width {
        1 => buf.put_u8(value as u8),
        2 => buf.put_u16(value as u16),
        4 => buf.put_u32(value as u32),
        _ => buf.put_u64(value),
    }
}

fn parse_op_values(input: &[u8]) -> IResult<&[u8], Vec<(u8, u64)>> {
    let mut values = Vec::new();
    let mut input = input;
    loop {
        let (rest, op) = be_u8(input)?;
        let width = width_from_op(op);
        let (rest, bytes) = take(width).parse(rest)?;
        let mut value: u64 = 0;
        for b in bytes {
            value = (value << 8) | *b as u64;
        }
        values.push((op, value));
        input = rest;
        if op & 0x80 != 0 {
            return Ok((input, values));
        }
    }
}

fn numeric_ops(values: Vec<(u8, u64)>) -> Vec<NumericOp> {
    values
        .into_iter()
        .map(|(op, value)| NumericOp {
            op: NumericOperator::from_bits_truncate(op),
            value,
        })
        .collect()
}

fn binary_ops(values: Vec<(u8, u64)>) -> Vec<BinaryOp> {
    values
        .into_iter()
        .map(|(op, value)| BinaryOp {
            op: BinaryOperator::from_bits_truncate(op),
            value,
        })
        .collect()
}

/// Flowspec component (RFC 5575 / RFC 8956).  The discriminant value
/// is the wire component type, which also fixes the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlowspecComponent {
    DestinationPrefix(IpNet),
    SourcePrefix(IpNet),
    IpProtocol(Vec<NumericOp>),
    Port(Vec<NumericOp>),
    DestinationPort(Vec<NumericOp>),
    SourcePort(Vec<NumericOp>),
    IcmpType(Vec<NumericOp>),
    IcmpCode(Vec<NumericOp>),
    TcpFlags(Vec<BinaryOp>),
    PacketLength(Vec<NumericOp>),
    Dscp(Vec<NumericOp>),
    Fragment(Vec<BinaryOp>),
    FlowLabel(Vec<NumericOp>),
}

impl FlowspecComponent {
    pub fn component_type(&self) -> u8 {
        use FlowspecComponent::*;
        match self {
            DestinationPrefix(_) => 1,
            SourcePrefix(_) => 2,
            IpProtocol(_) => 3,
            Port(_) => 4,
            DestinationPort(_) => 5,
            SourcePort(_) => 6,
            IcmpType(_) => 7,
            IcmpCode(_) => 8,
            TcpFlags(_) => 9,
            PacketLength(_) => 10,
            Dscp(_) => 11,
            Fragment(_) => 12,
            FlowLabel(_) => 13,
        }
    }

    fn parse(input: &[u8], afi: Afi) -> IResult<&[u8], Self> {
        use FlowspecComponent::*;
        let (input, typ) = be_u8(input)?;
        match typ {
            1 | 2 => {
                let (input, plen) = be_u8(input)?;
                // IPv6 flowspec prefixes carry an offset byte; only
                // offset zero is produced or accepted here.
                let input = if afi == Afi::Ip6 {
                    let (input, offset) = be_u8(input)?;
                    if offset != 0 {
                        return Err(nom::Err::Error(make_error(input, ErrorKind::Verify)));
                    }
                    input
                } else {
                    input
                };
                let (input, prefix) = parse_prefix(input, afi, plen)?;
                if typ == 1 {
                    Ok((input, DestinationPrefix(prefix)))
                } else {
                    Ok((input, SourcePrefix(prefix)))
                }
            }
            3..=8 | 10 | 11 | 13 => {
                let (input, values) = parse_op_values(input)?;
                let ops = numeric_ops(values);
                let component = match typ {
                    3 => IpProtocol(ops),
                    4 => Port(ops),
                    5 => DestinationPort(ops),
                    6 => SourcePort(ops),
                    7 => IcmpType(ops),
                    8 => IcmpCode(ops),
                    10 => PacketLength(ops),
                    11 => Dscp(ops),
                    _ => FlowLabel(ops),
                };
                Ok((input, component))
            }
            9 | 12 => {
                let (input, values) = parse_op_values(input)?;
                let ops = binary_ops(values);
                if typ == 9 {
                    Ok((input, TcpFlags(ops)))
                } else {
                    Ok((input, Fragment(ops)))
                }
            }
            _ => Err(nom::Err::Error(make_error(input, ErrorKind::NoneOf))),
        }
    }

    fn emit(&self, buf: &mut BytesMut, afi: Afi) {
        use FlowspecComponent::*;
        buf.put_u8(self.component_type());
        match self {
            DestinationPrefix(prefix) | SourcePrefix(prefix) => {
                buf.put_u8(prefix.prefix_len());
                if afi == Afi::Ip6 {
                    buf.put_u8(0); // offset
                }
                let psize = prefix.prefix_len().div_ceil(8) as usize;
                match prefix {
                    IpNet::V4(net) => buf.put(&net.addr().octets()[0..psize]),
                    IpNet::V6(net) => buf.put(&net.addr().octets()[0..psize]),
                }
            }
            IpProtocol(ops) | Port(ops) | DestinationPort(ops) | SourcePort(ops)
            | IcmpType(ops) | IcmpCode(ops) | PacketLength(ops) | Dscp(ops) | FlowLabel(ops) => {
                let last = ops.len().saturating_sub(1);
                for (i, op) in ops.iter().enumerate() {
                    emit_op_value(buf, op.op.bits(), op.value, i == last);
                }
            }
            TcpFlags(ops) | Fragment(ops) => {
                let last = ops.len().saturating_sub(1);
                for (i, op) in ops.iter().enumerate() {
                    emit_op_value(buf, op.op.bits(), op.value, i == last);
                }
            }
        }
    }
}

impl fmt::Display for FlowspecComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FlowspecComponent::*;
        let num = |ops: &Vec<NumericOp>| {
            ops.iter()
                .map(|op| op.value.to_string())
                .collect::<Vec<String>>()
                .join(",")
        };
        let bin = |ops: &Vec<BinaryOp>| {
            ops.iter()
                .map(|op| format!("0x{:x}", op.value))
                .collect::<Vec<String>>()
                .join(",")
        };
        match self {
            DestinationPrefix(prefix) => write!(f, "destination {}", prefix),
            SourcePrefix(prefix) => write!(f, "source {}", prefix),
            IpProtocol(ops) => write!(f, "protocol {}", num(ops)),
            Port(ops) => write!(f, "port {}", num(ops)),
            DestinationPort(ops) => write!(f, "destination-port {}", num(ops)),
            SourcePort(ops) => write!(f, "source-port {}", num(ops)),
            IcmpType(ops) => write!(f, "icmp-type {}", num(ops)),
            IcmpCode(ops) => write!(f, "icmp-code {}", num(ops)),
            TcpFlags(ops) => write!(f, "tcp-flags {}", bin(ops)),
            PacketLength(ops) => write!(f, "packet-length {}", num(ops)),
            Dscp(ops) => write!(f, "dscp {}", num(ops)),
            Fragment(ops) => write!(f, "fragment {}", bin(ops)),
            FlowLabel(ops) => write!(f, "flow-label {}", num(ops)),
        }
    }
}

/// Flowspec NLRI: a rule of components, optionally scoped by a route
/// distinguisher for the VPN families.  Components are kept in the
/// canonical ascending component-type order; equal types compare
/// lexicographically on their encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlowspecNlri {
    pub rd: Option<RouteDistinguisher>,
    pub components: Vec<FlowspecComponent>,
}

impl FlowspecNlri {
    pub fn new(components: Vec<FlowspecComponent>) -> Self {
        let mut nlri = Self {
            rd: None,
            components,
        };
        nlri.canonicalize();
        nlri
    }

    pub fn canonicalize(&mut self) {
        self.components.sort();
    }

    pub fn parse_nlri(input: &[u8], afi: Afi, vpn: bool) -> IResult<&[u8], FlowspecNlri> {
        let (input, length) = be_u8(input)?;
        let (input, length) = if length >= 0xF0 {
            // Two byte length: 0xFnnn.
            let (input, low) = be_u8(input)?;
            (input, (((length as u16 & 0x0F) << 8) | low as u16) as usize)
        } else {
            (input, length as usize)
        };
        if input.len() < length {
            return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
        }
        let (mut rule, input) = input.split_at(length);
        let rd = if vpn {
            let (rest, rd) = RouteDistinguisher::parse_be(rule)?;
            rule = rest;
            Some(rd)
        } else {
            None
        };
        let mut components = Vec::new();
        while !rule.is_empty() {
            let (rest, component) = FlowspecComponent::parse(rule, afi)?;
            components.push(component);
            rule = rest;
        }
        let mut nlri = FlowspecNlri { rd, components };
        nlri.canonicalize();
        Ok((input, nlri))
    }

    pub fn emit(&self, buf: &mut BytesMut, afi: Afi) {
        let mut rule = BytesMut::new();
        if let Some(rd) = &self.rd {
            rd.emit(&mut rule);
        }
        let mut components: Vec<&FlowspecComponent> = self.components.iter().collect();
        components.sort();
        for component in components {
            component.emit(&mut rule, afi);
        }
        if rule.len() < 0xF0 {
            buf.put_u8(rule.len() as u8);
        } else {
            buf.put_u16(0xF000 | rule.len() as u16);
        }
        buf.put(&rule[..]);
    }

    pub fn encoded_len(&self, afi: Afi) -> usize {
        let mut buf = BytesMut::new();
        self.emit(&mut buf, afi);
        buf.len()
    }
}

impl fmt::Display for FlowspecNlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rd) = &self.rd {
            write!(f, "[{}] ", rd)?;
        }
        let v = self
            .components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dst(prefix: &str) -> FlowspecComponent {
        FlowspecComponent::DestinationPrefix(prefix.parse().unwrap())
    }

    fn port(value: u64) -> FlowspecComponent {
        FlowspecComponent::Port(vec![NumericOp::eq(value)])
    }

    #[test]
    fn canonical_component_order() {
        // Built out of order, serialised in ascending type order.
        let nlri = FlowspecNlri::new(vec![port(80), dst("10.0.0.0/24")]);
        assert_eq!(nlri.components[0].component_type(), 1);

        let mut buf = BytesMut::new();
        nlri.emit(&mut buf, Afi::Ip);
        // len, type 1, plen 24, 10 00 00, type 4, op(EOL|EQ|len1), 80
        assert_eq!(
            &buf[..],
            &[0x08, 0x01, 0x18, 0x0A, 0x00, 0x00, 0x04, 0x81, 0x50]
        );
    }

    #[test]
    fn wire_roundtrip() {
        let nlri = FlowspecNlri::new(vec![
            dst("192.0.2.0/24"),
            FlowspecComponent::IpProtocol(vec![NumericOp::eq(6)]),
            FlowspecComponent::DestinationPort(vec![NumericOp::eq(443)]),
        ]);
        let mut buf = BytesMut::new();
        nlri.emit(&mut buf, Afi::Ip);
        let (rest, parsed) = FlowspecNlri::parse_nlri(&buf, Afi::Ip, false).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, nlri);
    }

    #[test]
    fn vpn_rule_carries_rd() {
        let mut nlri = FlowspecNlri::new(vec![dst("10.0.0.0/8")]);
        nlri.rd = Some("65000:1".parse().unwrap());
        let mut buf = BytesMut::new();
        nlri.emit(&mut buf, Afi::Ip);
        let (_, parsed) = FlowspecNlri::parse_nlri(&buf, Afi::Ip, true).unwrap();
        assert_eq!(parsed.rd, nlri.rd);
    }

    #[test]
    fn two_byte_value_width() {
        let nlri = FlowspecNlri::new(vec![port(8080)]);
        let mut buf = BytesMut::new();
        nlri.emit(&mut buf, Afi::Ip);
        // len, type 4, op(EOL|EQ|len2), 0x1F90
        assert_eq!(&buf[..], &[0x04, 0x04, 0x91, 0x1F, 0x90]);
    }
}
