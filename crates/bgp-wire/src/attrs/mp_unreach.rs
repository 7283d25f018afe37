use std::fmt;

use bytes::{BufMut, BytesMut};
use nom::Parser;
use nom_derive::*;

use crate::{
    Afi, AfiSafi, AttrEmitter, AttrFlags, AttrType, MpNlri, ParseOption, Safi, WireError,
    many0_complete,
};

use super::mp_reach::family_supported;

#[derive(Clone, Debug, NomBE)]
pub struct MpUnreachHeader {
    pub afi: Afi,
    pub safi: Safi,
}

/// MP_UNREACH_NLRI (RFC 4760).  An empty NLRI list is the End-of-RIB
/// marker for the family (RFC 4724).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MpUnreachAttr {
    pub afi_safi: AfiSafi,
    pub nlris: Vec<MpNlri>,
}

impl MpUnreachAttr {
    pub fn new(afi_safi: AfiSafi) -> Self {
        Self {
            afi_safi,
            nlris: Vec::new(),
        }
    }

    pub fn is_end_of_rib(&self) -> bool {
        self.nlris.is_empty()
    }

    pub fn parse_nlri(input: &[u8], opt: &ParseOption) -> Result<Self, WireError> {
        let (input, header) =
            MpUnreachHeader::parse_be(input).map_err(WireError::from)?;
        let afi_safi = AfiSafi::new(header.afi, header.safi);
        if !family_supported(afi_safi) {
            return Err(WireError::UnsupportedFamily {
                afi: header.afi,
                safi: header.safi,
            });
        }
        let add_path = opt.is_add_path_recv(header.afi, header.safi);
        let (_, nlris) =
            many0_complete(|i| MpNlri::parse_for(afi_safi, i, add_path, true))
                .parse(input)
                .map_err(WireError::from)?;
        Ok(Self { afi_safi, nlris })
    }
}

impl AttrEmitter for MpUnreachAttr {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::MpUnreachNlri
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u16(self.afi_safi.afi.into());
        buf.put_u8(self.afi_safi.safi.into());
        for nlri in self.nlris.iter() {
            nlri.emit(buf, self.afi_safi);
        }
    }
}

impl fmt::Display for MpUnreachAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_rib() {
            return writeln!(f, " EoR: {}", self.afi_safi);
        }
        writeln!(f, " MP Unreach {}:", self.afi_safi)?;
        for nlri in self.nlris.iter() {
            writeln!(f, "  {}", nlri)?;
        }
        Ok(())
    }
}
