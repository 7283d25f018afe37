use bytes::{BufMut, BytesMut};
use nom_derive::*;

use crate::{NotificationPacket, OpenPacket, RouteRefreshPacket, UpdatePacket};

/// Default maximum message size (RFC 4271).
pub const BGP_PACKET_LEN: usize = 4096;
/// Maximum message size when the extended-message capability was
/// negotiated (RFC 8654).
pub const BGP_EXTENDED_PACKET_LEN: usize = 65535;
pub const BGP_HEADER_LEN: u16 = 19;

/// Message types.  `Max` is not a wire value; it sizes the per-type
/// counter arrays.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, NomBE)]
pub enum BgpType {
    Open = 1,
    Update = 2,
    Notification = 3,
    Keepalive = 4,
    RouteRefresh = 5,
    Max = 6,
}

#[derive(Debug, Clone, PartialEq, NomBE)]
pub struct BgpHeader {
    pub marker: [u8; 16],
    pub length: u16,
    pub typ: BgpType,
}

impl BgpHeader {
    pub fn new(typ: BgpType, length: u16) -> Self {
        Self {
            marker: [0xffu8; 16],
            length,
            typ,
        }
    }
}

impl From<BgpHeader> for BytesMut {
    fn from(header: BgpHeader) -> Self {
        let mut buf = BytesMut::with_capacity(BGP_HEADER_LEN as usize);
        buf.put(&header.marker[..]);
        buf.put_u16(header.length);
        buf.put_u8(header.typ as u8);
        buf
    }
}

/// One parsed message of any type.
#[derive(Debug)]
pub enum BgpPacket {
    Open(Box<OpenPacket>),
    Update(Box<UpdatePacket>),
    Notification(NotificationPacket),
    Keepalive(BgpHeader),
    RouteRefresh(RouteRefreshPacket),
}

impl BgpPacket {
    pub fn typ(&self) -> BgpType {
        match self {
            BgpPacket::Open(_) => BgpType::Open,
            BgpPacket::Update(_) => BgpType::Update,
            BgpPacket::Notification(_) => BgpType::Notification,
            BgpPacket::Keepalive(_) => BgpType::Keepalive,
            BgpPacket::RouteRefresh(_) => BgpType::RouteRefresh,
        }
    }
}

/// A KEEPALIVE is a bare header.
pub fn keepalive_packet() -> BytesMut {
    BgpHeader::new(BgpType::Keepalive, BGP_HEADER_LEN).into()
}
