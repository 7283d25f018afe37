use std::fmt;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::Parser;

use crate::{AttrEmitter, AttrFlags, AttrType, Label};

/// P-Multicast Service Interface tunnel attribute (RFC 6514).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PmsiTunnel {
    pub flags: u8,
    pub tunnel_type: u8,
    pub label: Label,
    pub tunnel_id: Vec<u8>,
}

impl PmsiTunnel {
    pub fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, flags) = be_u8(input)?;
        let (input, tunnel_type) = be_u8(input)?;
        let (input, label_bytes) = take(3usize).parse(input)?;
        let label = Label::from(label_bytes);
        let tunnel_id = input.to_vec();
        let (input, _) = take(input.len()).parse(input)?;
        Ok((
            input,
            Self {
                flags,
                tunnel_type,
                label,
                tunnel_id,
            },
        ))
    }
}

impl AttrEmitter for PmsiTunnel {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::PmsiTunnel
    }

    fn len(&self) -> Option<usize> {
        Some(5 + self.tunnel_id.len())
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u8(self.flags);
        buf.put_u8(self.tunnel_type);
        buf.put(&self.label.to_bytes()[..]);
        buf.put(&self.tunnel_id[..]);
    }
}

impl fmt::Display for PmsiTunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type:{} label:{} id:{} bytes",
            self.tunnel_type,
            self.label.label,
            self.tunnel_id.len()
        )
    }
}
