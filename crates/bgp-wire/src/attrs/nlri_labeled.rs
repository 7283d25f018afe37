use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{BufMut, BytesMut};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take;
use nom::error::{ErrorKind, make_error};
use nom::number::complete::{be_u8, be_u32};

use crate::{Afi, Label, nlri_psize, parse_label_stack};

/// Labeled unicast NLRI (RFC 8277): label stack followed by the
/// prefix, with the NLRI length field covering both.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct LabeledNlri {
    pub id: u32,
    pub labels: Vec<Label>,
    pub prefix: IpNet,
}

impl LabeledNlri {
    pub fn new(labels: Vec<Label>, prefix: IpNet) -> Self {
        Self {
            id: 0,
            labels,
            prefix,
        }
    }

    pub fn parse_nlri_afi(
        input: &[u8],
        afi: Afi,
        add_path: bool,
        withdraw: bool,
    ) -> IResult<&[u8], LabeledNlri> {
        let (input, id) = if add_path { be_u32(input)? } else { (input, 0) };
        let (input, plen) = be_u8(input)?;
        let (input, labels) = parse_label_stack(input, withdraw)?;
        let label_bits = (labels.len() * 24) as u8;
        if plen < label_bits {
            return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
        }
        let plen = plen - label_bits;
        let (input, prefix) = parse_prefix(input, afi, plen)?;
        Ok((
            input,
            LabeledNlri { id, labels, prefix },
        ))
    }

    pub fn emit(&self, buf: &mut BytesMut) {
        if self.id != 0 {
            buf.put_u32(self.id);
        }
        let plen = self.prefix.prefix_len() + (self.labels.len() * 24) as u8;
        buf.put_u8(plen);
        for label in self.labels.iter() {
            buf.put(&label.to_bytes()[..]);
        }
        let psize = nlri_psize(self.prefix.prefix_len());
        match self.prefix {
            IpNet::V4(net) => buf.put(&net.addr().octets()[0..psize]),
            IpNet::V6(net) => buf.put(&net.addr().octets()[0..psize]),
        }
    }

    pub fn encoded_len(&self) -> usize {
        let id_len = if self.id != 0 { 4 } else { 0 };
        id_len + 1 + self.labels.len() * 3 + nlri_psize(self.prefix.prefix_len())
    }
}

pub(crate) fn parse_prefix(input: &[u8], afi: Afi, plen: u8) -> IResult<&[u8], IpNet> {
    let max = match afi {
        Afi::Ip => 32,
        Afi::Ip6 => 128,
        _ => return Err(nom::Err::Error(make_error(input, ErrorKind::NoneOf))),
    };
    if plen > max {
        return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
    }
    let psize = nlri_psize(plen);
    if input.len() < psize {
        return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
    }
    let (input, bytes) = take(psize).parse(input)?;
    let prefix = match afi {
        Afi::Ip => {
            let mut paddr = [0u8; 4];
            paddr[..psize].copy_from_slice(bytes);
            IpNet::V4(
                Ipv4Net::new(Ipv4Addr::from(paddr), plen)
                    .map_err(|_| nom::Err::Error(make_error(input, ErrorKind::Verify)))?,
            )
        }
        _ => {
            let mut paddr = [0u8; 16];
            paddr[..psize].copy_from_slice(bytes);
            IpNet::V6(
                Ipv6Net::new(Ipv6Addr::from(paddr), plen)
                    .map_err(|_| nom::Err::Error(make_error(input, ErrorKind::Verify)))?,
            )
        }
    };
    Ok((input, prefix))
}

impl fmt::Display for LabeledNlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self
            .labels
            .iter()
            .map(|l| l.label.to_string())
            .collect::<Vec<String>>()
            .join("/");
        write!(f, "{} label {}", self.prefix, labels)
    }
}
