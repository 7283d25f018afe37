use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use nom_derive::*;

use crate::{AttrEmitter, AttrFlags, AttrType, ParseBe};

/// ORIGINATOR_ID (RFC 4456): set by route reflectors, carried through.
#[derive(Clone, Debug, NomBE, PartialEq, Eq, Hash)]
pub struct OriginatorId(pub Ipv4Addr);

impl AttrEmitter for OriginatorId {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::OriginatorId
    }

    fn len(&self) -> Option<usize> {
        Some(4)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put(&self.0.octets()[..]);
    }
}

impl fmt::Display for OriginatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
