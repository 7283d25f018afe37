use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::Parser;
use nom::error::{ErrorKind, make_error};
use nom_derive::*;

use crate::{BgpHeader, CapabilityHeader, CapabilityPacket, Caps, many0_complete};

pub const BGP_VERSION: u8 = 4;

/// Marker value in the one-byte optional parameter length announcing
/// the RFC 9072 extended length encoding.
const EXTENDED_OPT_PARAM: u8 = 255;

#[derive(Debug, PartialEq, NomBE)]
pub struct OpenPacket {
    pub header: BgpHeader,
    pub version: u8,
    pub asn: u16,
    pub hold_time: u16,
    pub bgp_id: [u8; 4],
    pub opt_param_len: u8,
    #[nom(Ignore)]
    pub caps: Caps,
}

#[derive(Debug, PartialEq, NomBE)]
pub struct OpenExtended {
    pub non_ext_op_type: u8,
    pub ext_opt_parm_len: u16,
}

impl OpenPacket {
    pub fn new(
        header: BgpHeader,
        asn: u16,
        hold_time: u16,
        router_id: &Ipv4Addr,
        caps: Caps,
    ) -> OpenPacket {
        OpenPacket {
            header,
            version: BGP_VERSION,
            asn,
            hold_time,
            bgp_id: router_id.octets(),
            opt_param_len: 0,
            caps,
        }
    }

    pub fn bgp_id_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.bgp_id)
    }

    pub fn parse_packet(input: &[u8]) -> IResult<&[u8], OpenPacket> {
        let (input, mut packet) = OpenPacket::parse_be(input)?;
        let (input, opt_len) = if packet.opt_param_len == EXTENDED_OPT_PARAM {
            // RFC 9072 extended optional parameter length.
            let (input, ext) = OpenExtended::parse_be(input)?;
            if ext.non_ext_op_type != EXTENDED_OPT_PARAM {
                return Err(nom::Err::Error(make_error(input, ErrorKind::Tag)));
            }
            (input, ext.ext_opt_parm_len as usize)
        } else {
            (input, packet.opt_param_len as usize)
        };
        if input.len() != opt_len {
            return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
        }
        let (params, rest) = input.split_at(opt_len);
        let (_, caps) = many0_complete(parse_caps).parse(params)?;
        packet.caps = Caps::from(caps);
        Ok((rest, packet))
    }
}

fn parse_caps(input: &[u8]) -> IResult<&[u8], Vec<CapabilityPacket>> {
    let (input, header) = CapabilityHeader::parse_be(input)?;
    if input.len() < header.length as usize {
        return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
    }
    let (value, rest) = input.split_at(header.length as usize);
    let (_, caps) = many0_complete(CapabilityPacket::parse_cap).parse(value)?;
    Ok((rest, caps))
}

impl From<OpenPacket> for BytesMut {
    fn from(open: OpenPacket) -> Self {
        let mut buf = BytesMut::new();
        let header: BytesMut = open.header.into();
        buf.put(&header[..]);
        buf.put_u8(open.version);
        buf.put_u16(open.asn);
        buf.put_u16(open.hold_time);
        buf.put(&open.bgp_id[..]);

        let mut params = BytesMut::new();
        open.caps.emit(&mut params);
        if params.len() < EXTENDED_OPT_PARAM as usize {
            buf.put_u8(params.len() as u8);
        } else {
            // RFC 9072 escape: length 255, type 255, u16 length.
            buf.put_u8(EXTENDED_OPT_PARAM);
            buf.put_u8(EXTENDED_OPT_PARAM);
            buf.put_u16(params.len() as u16);
        }
        buf.put(&params[..]);

        const LENGTH_POS: std::ops::Range<usize> = 16..18;
        let length: u16 = buf.len() as u16;
        buf[LENGTH_POS].copy_from_slice(&length.to_be_bytes());

        buf
    }
}

impl fmt::Display for OpenPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Open Message:")?;
        writeln!(
            f,
            " version {} asn {} hold {} id {}",
            self.version,
            self.asn,
            self.hold_time,
            self.bgp_id_addr()
        )?;
        write!(f, "{}", self.caps)?;
        Ok(())
    }
}
