use std::fmt;

use bytes::{BufMut, BytesMut};
use nom::Parser;
use nom_derive::*;

use crate::{
    Afi, AfiSafi, AttrEmitter, AttrFlags, AttrType, MpNexthop, MpNlri, ParseOption, Safi,
    WireError, many0_complete,
};

#[derive(Clone, Debug, NomBE)]
pub struct MpReachHeader {
    pub afi: Afi,
    pub safi: Safi,
    pub nhop_len: u8,
}

/// MP_REACH_NLRI (RFC 4760): the announce transport for every family
/// other than ipv4-unicast.  One family per attribute; the carried
/// NLRIs are of that family by construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MpReachAttr {
    pub afi_safi: AfiSafi,
    pub nexthop: MpNexthop,
    pub nlris: Vec<MpNlri>,
}

impl MpReachAttr {
    pub fn new(afi_safi: AfiSafi, nexthop: MpNexthop) -> Self {
        Self {
            afi_safi,
            nexthop,
            nlris: Vec::new(),
        }
    }

    pub fn parse_nlri(input: &[u8], opt: &ParseOption) -> Result<Self, WireError> {
        let (input, header) =
            MpReachHeader::parse_be(input).map_err(WireError::from)?;
        let afi_safi = AfiSafi::new(header.afi, header.safi);
        if !family_supported(afi_safi) {
            return Err(WireError::UnsupportedFamily {
                afi: header.afi,
                safi: header.safi,
            });
        }
        let add_path = opt.is_add_path_recv(header.afi, header.safi);
        let (input, nexthop) =
            MpNexthop::parse_be(input, header.nhop_len).map_err(WireError::from)?;
        if input.is_empty() {
            return Err(WireError::ShortRead { needed: 1 });
        }
        // Reserved SNPA byte.
        let input = &input[1..];
        let (_, nlris) =
            many0_complete(|i| MpNlri::parse_for(afi_safi, i, add_path, false))
                .parse(input)
                .map_err(WireError::from)?;
        if nlris.is_empty() {
            return Err(WireError::MalformedNlri("empty MP_REACH".into()));
        }
        Ok(Self {
            afi_safi,
            nexthop,
            nlris,
        })
    }
}

pub(crate) fn family_supported(afi_safi: AfiSafi) -> bool {
    matches!(
        (afi_safi.afi, afi_safi.safi),
        (
            Afi::Ip | Afi::Ip6,
            Safi::Unicast
                | Safi::Multicast
                | Safi::MplsLabel
                | Safi::MplsVpn
                | Safi::Flowspec
                | Safi::FlowspecVpn
        )
    )
}

impl AttrEmitter for MpReachAttr {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::MpReachNlri
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u16(self.afi_safi.afi.into());
        buf.put_u8(self.afi_safi.safi.into());
        self.nexthop.emit(buf);
        buf.put_u8(0); // SNPA
        for nlri in self.nlris.iter() {
            nlri.emit(buf, self.afi_safi);
        }
    }
}

impl fmt::Display for MpReachAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " MP Reach {}: nexthop {}", self.afi_safi, self.nexthop)?;
        for nlri in self.nlris.iter() {
            writeln!(f, "  {}", nlri)?;
        }
        Ok(())
    }
}
