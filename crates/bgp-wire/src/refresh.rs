use std::fmt;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::number::complete::be_u8;
use nom_derive::*;

use crate::afi::wire_code;
use crate::{Afi, AfiSafi, BGP_HEADER_LEN, BgpHeader, BgpType, Safi};

/// ROUTE-REFRESH message (RFC 2918), with the RFC 7313 demarcation
/// subtypes carried in the reserved byte.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRefreshPacket {
    pub header: BgpHeader,
    pub afi: Afi,
    pub subtype: RefreshSubtype,
    pub safi: Safi,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSubtype {
    Normal = 0,
    Begin = 1,
    End = 2,
    Unknown(u8),
}

wire_code!(RefreshSubtype: u8, {
    Normal = 0,
    Begin = 1,
    End = 2,
});

impl fmt::Display for RefreshSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RefreshSubtype::*;
        match self {
            Normal => write!(f, "refresh"),
            Begin => write!(f, "begin-of-refresh"),
            End => write!(f, "end-of-refresh"),
            Unknown(v) => write!(f, "subtype {}", v),
        }
    }
}

impl RouteRefreshPacket {
    pub fn new(afi_safi: AfiSafi, subtype: RefreshSubtype) -> Self {
        Self {
            header: BgpHeader::new(BgpType::RouteRefresh, BGP_HEADER_LEN + 4),
            afi: afi_safi.afi,
            subtype,
            safi: afi_safi.safi,
        }
    }

    pub fn afi_safi(&self) -> AfiSafi {
        AfiSafi::new(self.afi, self.safi)
    }

    pub fn parse_packet(input: &[u8]) -> IResult<&[u8], RouteRefreshPacket> {
        let (input, header) = BgpHeader::parse_be(input)?;
        let (input, afi) = Afi::parse_be(input)?;
        let (input, subtype) = be_u8(input)?;
        let (input, safi) = Safi::parse_be(input)?;
        Ok((
            input,
            RouteRefreshPacket {
                header,
                afi,
                subtype: subtype.into(),
                safi,
            },
        ))
    }
}

impl From<RouteRefreshPacket> for BytesMut {
    fn from(refresh: RouteRefreshPacket) -> Self {
        let mut buf = BytesMut::new();
        let header: BytesMut = refresh.header.into();
        buf.put(&header[..]);
        buf.put_u16(refresh.afi.into());
        buf.put_u8(refresh.subtype.into());
        buf.put_u8(refresh.safi.into());

        const LENGTH_POS: std::ops::Range<usize> = 16..18;
        let length: u16 = buf.len() as u16;
        buf[LENGTH_POS].copy_from_slice(&length.to_be_bytes());

        buf
    }
}

impl fmt::Display for RouteRefreshPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route Refresh: {}/{} {}", self.afi, self.safi, self.subtype)
    }
}
