use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::Parser;

use crate::{AttrEmitter, AttrFlags, AttrType, ParseBe, many0_complete};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClusterList(pub Vec<Ipv4Addr>);

impl ClusterList {
    pub fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, ids) = many0_complete(Ipv4Addr::parse_be).parse(input)?;
        Ok((input, Self(ids)))
    }
}

impl AttrEmitter for ClusterList {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::ClusterList
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len() * 4)
    }

    fn emit(&self, buf: &mut BytesMut) {
        for id in self.0.iter() {
            buf.put(&id.octets()[..]);
        }
    }
}

impl fmt::Display for ClusterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self
            .0
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{v}")
    }
}
