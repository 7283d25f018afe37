use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take;
use nom::error::{ErrorKind, make_error};

use crate::{
    Afi, AfiSafi, FlowspecNlri, Ipv4Nlri, Ipv6Nlri, LabeledNlri, ParseBe, ParseNlri, Safi,
    VpnNlri,
};

/// NLRI of any family carried inside MP_REACH/MP_UNREACH.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum MpNlri {
    Ipv4(Ipv4Nlri),
    Ipv6(Ipv6Nlri),
    Labeled(LabeledNlri),
    Vpn(VpnNlri),
    Flowspec(FlowspecNlri),
}

impl MpNlri {
    pub fn parse_for(
        afi_safi: AfiSafi,
        input: &[u8],
        add_path: bool,
        withdraw: bool,
    ) -> IResult<&[u8], MpNlri> {
        match (afi_safi.afi, afi_safi.safi) {
            (Afi::Ip, Safi::Unicast | Safi::Multicast) => {
                let (input, nlri) = Ipv4Nlri::parse_nlri(input, add_path)?;
                Ok((input, MpNlri::Ipv4(nlri)))
            }
            (Afi::Ip6, Safi::Unicast | Safi::Multicast) => {
                let (input, nlri) = Ipv6Nlri::parse_nlri(input, add_path)?;
                Ok((input, MpNlri::Ipv6(nlri)))
            }
            (afi, Safi::MplsLabel) => {
                let (input, nlri) = LabeledNlri::parse_nlri_afi(input, afi, add_path, withdraw)?;
                Ok((input, MpNlri::Labeled(nlri)))
            }
            (afi, Safi::MplsVpn) => {
                let (input, nlri) = VpnNlri::parse_nlri_afi(input, afi, add_path, withdraw)?;
                Ok((input, MpNlri::Vpn(nlri)))
            }
            (afi, Safi::Flowspec) => {
                let (input, nlri) = FlowspecNlri::parse_nlri(input, afi, false)?;
                Ok((input, MpNlri::Flowspec(nlri)))
            }
            (afi, Safi::FlowspecVpn) => {
                let (input, nlri) = FlowspecNlri::parse_nlri(input, afi, true)?;
                Ok((input, MpNlri::Flowspec(nlri)))
            }
            _ => Err(nom::Err::Error(make_error(input, ErrorKind::NoneOf))),
        }
    }

    pub fn emit(&self, buf: &mut BytesMut, afi_safi: AfiSafi) {
        match self {
            MpNlri::Ipv4(nlri) => nlri.emit(buf),
            MpNlri::Ipv6(nlri) => nlri.emit(buf),
            MpNlri::Labeled(nlri) => nlri.emit(buf),
            MpNlri::Vpn(nlri) => nlri.emit(buf),
            MpNlri::Flowspec(nlri) => nlri.emit(buf, afi_safi.afi),
        }
    }

    pub fn encoded_len(&self, afi_safi: AfiSafi) -> usize {
        match self {
            MpNlri::Ipv4(nlri) => nlri.encoded_len(),
            MpNlri::Ipv6(nlri) => nlri.encoded_len(),
            MpNlri::Labeled(nlri) => nlri.encoded_len(),
            MpNlri::Vpn(nlri) => nlri.encoded_len(),
            MpNlri::Flowspec(nlri) => nlri.encoded_len(afi_safi.afi),
        }
    }

    /// RFC 7911 path identifier; zero when absent.
    pub fn path_id(&self) -> u32 {
        match self {
            MpNlri::Ipv4(nlri) => nlri.id,
            MpNlri::Ipv6(nlri) => nlri.id,
            MpNlri::Labeled(nlri) => nlri.id,
            MpNlri::Vpn(nlri) => nlri.id,
            MpNlri::Flowspec(_) => 0,
        }
    }

    pub fn set_path_id(&mut self, id: u32) {
        match self {
            MpNlri::Ipv4(nlri) => nlri.id = id,
            MpNlri::Ipv6(nlri) => nlri.id = id,
            MpNlri::Labeled(nlri) => nlri.id = id,
            MpNlri::Vpn(nlri) => nlri.id = id,
            MpNlri::Flowspec(_) => {}
        }
    }
}

impl fmt::Display for MpNlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpNlri::Ipv4(nlri) => write!(f, "{}", nlri),
            MpNlri::Ipv6(nlri) => write!(f, "{}", nlri),
            MpNlri::Labeled(nlri) => write!(f, "{}", nlri),
            MpNlri::Vpn(nlri) => write!(f, "{}", nlri),
            MpNlri::Flowspec(nlri) => write!(f, "{}", nlri),
        }
    }
}

/// Next-hop carried inside MP_REACH_NLRI.  VPN next-hops are prefixed
/// with an all-zero route distinguisher on the wire.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub enum MpNexthop {
    #[default]
    None,
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Vpn4(Ipv4Addr),
    Vpn6(Ipv6Addr),
}

impl MpNexthop {
    pub fn for_family(afi_safi: AfiSafi, addr: IpAddr) -> Self {
        match (afi_safi.has_rd(), addr) {
            (true, IpAddr::V4(addr)) => MpNexthop::Vpn4(addr),
            (true, IpAddr::V6(addr)) => MpNexthop::Vpn6(addr),
            (false, IpAddr::V4(addr)) => MpNexthop::Ipv4(addr),
            (false, IpAddr::V6(addr)) => MpNexthop::Ipv6(addr),
        }
    }

    pub fn addr(&self) -> Option<IpAddr> {
        match self {
            MpNexthop::None => None,
            MpNexthop::Ipv4(addr) | MpNexthop::Vpn4(addr) => Some(IpAddr::V4(*addr)),
            MpNexthop::Ipv6(addr) | MpNexthop::Vpn6(addr) => Some(IpAddr::V6(*addr)),
        }
    }

    pub fn parse_be(input: &[u8], nhop_len: u8) -> IResult<&[u8], Self> {
        match nhop_len {
            0 => Ok((input, MpNexthop::None)),
            4 => {
                let (input, addr) = Ipv4Addr::parse_be(input)?;
                Ok((input, MpNexthop::Ipv4(addr)))
            }
            12 => {
                let (input, _rd) = take(8usize).parse(input)?;
                let (input, addr) = Ipv4Addr::parse_be(input)?;
                Ok((input, MpNexthop::Vpn4(addr)))
            }
            16 => {
                let (input, addr) = Ipv6Addr::parse_be(input)?;
                Ok((input, MpNexthop::Ipv6(addr)))
            }
            24 => {
                let (input, _rd) = take(8usize).parse(input)?;
                let (input, addr) = Ipv6Addr::parse_be(input)?;
                Ok((input, MpNexthop::Vpn6(addr)))
            }
            // Global plus link-local; the link-local half is dropped.
            32 => {
                let (input, addr) = Ipv6Addr::parse_be(input)?;
                let (input, _link_local) = take(16usize).parse(input)?;
                Ok((input, MpNexthop::Ipv6(addr)))
            }
            _ => Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue))),
        }
    }

    /// Value length on the wire, excluding the length byte itself.
    pub fn wire_len(&self) -> usize {
        match self {
            MpNexthop::None => 0,
            MpNexthop::Ipv4(_) => 4,
            MpNexthop::Vpn4(_) => 12,
            MpNexthop::Ipv6(_) => 16,
            MpNexthop::Vpn6(_) => 24,
        }
    }

    /// Emit length byte plus value.
    pub fn emit(&self, buf: &mut BytesMut) {
        match self {
            MpNexthop::None => {
                buf.put_u8(0);
            }
            MpNexthop::Ipv4(addr) => {
                buf.put_u8(4);
                buf.put(&addr.octets()[..]);
            }
            MpNexthop::Vpn4(addr) => {
                buf.put_u8(12);
                buf.put(&[0u8; 8][..]);
                buf.put(&addr.octets()[..]);
            }
            MpNexthop::Ipv6(addr) => {
                buf.put_u8(16);
                buf.put(&addr.octets()[..]);
            }
            MpNexthop::Vpn6(addr) => {
                buf.put_u8(24);
                buf.put(&[0u8; 8][..]);
                buf.put(&addr.octets()[..]);
            }
        }
    }
}

impl fmt::Display for MpNexthop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr() {
            Some(addr) => write!(f, "{}", addr),
            None => write!(f, "-"),
        }
    }
}
