use std::collections::BTreeMap;
use std::convert::TryInto;

use nom::combinator::peek;
use nom_derive::*;

use crate::{
    Afi, AfiSafi, BGP_HEADER_LEN, BgpHeader, BgpPacket, BgpType, NotificationPacket, OpenPacket,
    RouteRefreshPacket, Safi, UpdatePacket, WireError,
};

#[derive(Default, Debug, Clone)]
pub struct Direct {
    pub recv: bool,
    pub send: bool,
}

/// Session context the codec needs: which side negotiated what.
#[derive(Default, Debug, Clone)]
pub struct ParseOption {
    // 4-octet AS numbers
    pub as4: Direct,
    // Add-path per family
    pub add_path: BTreeMap<AfiSafi, Direct>,
    // Extended message size
    pub extended_message: bool,
}

impl ParseOption {
    pub fn is_as4(&self) -> bool {
        self.as4.send && self.as4.recv
    }

    pub fn is_add_path_recv(&self, afi: Afi, safi: Safi) -> bool {
        let key = AfiSafi { afi, safi };
        self.add_path.get(&key).is_some_and(|direct| direct.recv)
    }

    pub fn is_add_path_send(&self, afi: Afi, safi: Safi) -> bool {
        let key = AfiSafi { afi, safi };
        self.add_path.get(&key).is_some_and(|direct| direct.send)
    }

    pub fn clear(&mut self) {
        self.as4 = Direct::default();
        self.add_path.clear();
        self.extended_message = false;
    }
}

/// Packed size of a prefix of the given mask length.
pub fn nlri_psize(plen: u8) -> usize {
    plen.div_ceil(8).into()
}

pub fn peek_bgp_length(input: &[u8]) -> usize {
    if let Some(len) = input.get(16..18) {
        u16::from_be_bytes(len.try_into().unwrap()) as usize
    } else {
        0
    }
}

impl BgpPacket {
    /// Parse one complete message frame into its typed form.
    pub fn parse_packet<'a>(
        input: &'a [u8],
        opt: &ParseOption,
    ) -> Result<(&'a [u8], BgpPacket), WireError> {
        let (_, header) = peek(BgpHeader::parse_be)
            .parse(input)
            .map_err(WireError::from)?;
        match header.typ {
            BgpType::Open => {
                let (input, packet) = OpenPacket::parse_packet(input).map_err(WireError::from)?;
                Ok((input, BgpPacket::Open(Box::new(packet))))
            }
            BgpType::Update => {
                let (input, packet) = UpdatePacket::parse_packet(input, opt)?;
                Ok((input, BgpPacket::Update(Box::new(packet))))
            }
            BgpType::Notification => {
                let (input, packet) =
                    NotificationPacket::parse_packet(input).map_err(WireError::from)?;
                Ok((input, BgpPacket::Notification(packet)))
            }
            BgpType::Keepalive => {
                let (input, header) = BgpHeader::parse_be(input).map_err(WireError::from)?;
                if header.length != BGP_HEADER_LEN {
                    return Err(WireError::BadLength {
                        length: header.length,
                    });
                }
                Ok((input, BgpPacket::Keepalive(header)))
            }
            BgpType::RouteRefresh => {
                let (input, packet) =
                    RouteRefreshPacket::parse_packet(input).map_err(WireError::from)?;
                Ok((input, BgpPacket::RouteRefresh(packet)))
            }
            BgpType::Max => Err(WireError::UnknownType {
                typ: header.typ as u8,
            }),
        }
    }
}
