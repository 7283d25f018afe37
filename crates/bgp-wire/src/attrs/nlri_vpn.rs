use std::fmt;

use bytes::{BufMut, BytesMut};
use ipnet::IpNet;
use nom::IResult;
use nom::error::{ErrorKind, make_error};
use nom::number::complete::{be_u8, be_u32};

use crate::{Afi, Label, RouteDistinguisher, nlri_psize, parse_label_stack};

use super::nlri_labeled::parse_prefix;

/// VPN unicast NLRI (RFC 4364): label stack, route distinguisher,
/// prefix.  The NLRI length field covers all three.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct VpnNlri {
    pub id: u32,
    pub labels: Vec<Label>,
    pub rd: RouteDistinguisher,
    pub prefix: IpNet,
}

impl VpnNlri {
    pub fn new(labels: Vec<Label>, rd: RouteDistinguisher, prefix: IpNet) -> Self {
        Self {
            id: 0,
            labels,
            rd,
            prefix,
        }
    }

    pub fn parse_nlri_afi(
        input: &[u8],
        afi: Afi,
        add_path: bool,
        withdraw: bool,
    ) -> IResult<&[u8], VpnNlri> {
        let (input, id) = if add_path { be_u32(input)? } else { (input, 0) };
        let (input, plen) = be_u8(input)?;
        let (input, labels) = parse_label_stack(input, withdraw)?;
        let (input, rd) = RouteDistinguisher::parse_be(input)?;
        // Label stack and RD are counted by the prefix length field.
        let overhead = (labels.len() * 24 + 64) as u8;
        if plen < overhead {
            return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
        }
        let plen = plen - overhead;
        let (input, prefix) = parse_prefix(input, afi, plen)?;
        Ok((
            input,
            VpnNlri {
                id,
                labels,
                rd,
                prefix,
            },
        ))
    }

    pub fn emit(&self, buf: &mut BytesMut) {
        if self.id != 0 {
            buf.put_u32(self.id);
        }
        let plen = self.prefix.prefix_len() + (self.labels.len() * 24 + 64) as u8;
        buf.put_u8(plen);
        for label in self.labels.iter() {
            buf.put(&label.to_bytes()[..]);
        }
        self.rd.emit(buf);
        let psize = nlri_psize(self.prefix.prefix_len());
        match self.prefix {
            IpNet::V4(net) => buf.put(&net.addr().octets()[0..psize]),
            IpNet::V6(net) => buf.put(&net.addr().octets()[0..psize]),
        }
    }

    pub fn encoded_len(&self) -> usize {
        let id_len = if self.id != 0 { 4 } else { 0 };
        id_len + 1 + self.labels.len() * 3 + 8 + nlri_psize(self.prefix.prefix_len())
    }
}

impl fmt::Display for VpnNlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self
            .labels
            .iter()
            .map(|l| l.label.to_string())
            .collect::<Vec<String>>()
            .join("/");
        write!(f, "[{}]:{} label {}", self.rd, self.prefix, labels)
    }
}
