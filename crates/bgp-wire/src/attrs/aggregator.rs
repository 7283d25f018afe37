use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::number::complete::{be_u16, be_u32};

use crate::{AS_TRANS, AttrEmitter, AttrFlags, AttrType, ParseBe};

/// AGGREGATOR.  The ASN is held 4-byte; the wire width follows the
/// session's 4-octet-AS negotiation, with AS4_AGGREGATOR backing up a
/// truncated 2-byte rendering (RFC 6793).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Aggregator {
    pub asn: u32,
    pub address: Ipv4Addr,
}

impl Aggregator {
    pub fn new(asn: u32, address: Ipv4Addr) -> Self {
        Self { asn, address }
    }

    pub fn parse_as4(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, asn) = be_u32(input)?;
        let (input, address) = Ipv4Addr::parse_be(input)?;
        Ok((input, Self { asn, address }))
    }

    pub fn parse_as2(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, asn) = be_u16(input)?;
        let (input, address) = Ipv4Addr::parse_be(input)?;
        Ok((
            input,
            Self {
                asn: asn as u32,
                address,
            },
        ))
    }

    pub fn has_as4(&self) -> bool {
        self.asn > u16::MAX as u32
    }
}

impl AttrEmitter for Aggregator {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::Aggregator
    }

    fn len(&self) -> Option<usize> {
        Some(8)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u32(self.asn);
        buf.put(&self.address.octets()[..]);
    }
}

/// 2-byte wire rendering; ASNs above 65535 become AS_TRANS.
pub struct Aggregator2View<'a>(pub &'a Aggregator);

impl AttrEmitter for Aggregator2View<'_> {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::Aggregator
    }

    fn len(&self) -> Option<usize> {
        Some(6)
    }

    fn emit(&self, buf: &mut BytesMut) {
        if self.0.asn > u16::MAX as u32 {
            buf.put_u16(AS_TRANS);
        } else {
            buf.put_u16(self.0.asn as u16);
        }
        buf.put(&self.0.address.octets()[..]);
    }
}

/// AS4_AGGREGATOR companion attribute.
pub struct As4AggregatorView<'a>(pub &'a Aggregator);

impl AttrEmitter for As4AggregatorView<'_> {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::As4Aggregator
    }

    fn len(&self) -> Option<usize> {
        Some(8)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u32(self.0.asn);
        buf.put(&self.0.address.octets()[..]);
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.asn, self.address)
    }
}
