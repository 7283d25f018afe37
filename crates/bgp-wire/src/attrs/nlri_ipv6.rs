use std::fmt;
use std::net::Ipv6Addr;

use bytes::{BufMut, BytesMut};
use ipnet::Ipv6Net;
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take;
use nom::error::{ErrorKind, make_error};
use nom::number::complete::{be_u8, be_u32};

use crate::{ParseNlri, nlri_psize};

#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Ipv6Nlri {
    pub id: u32,
    pub prefix: Ipv6Net,
}

impl Ipv6Nlri {
    pub fn new(prefix: Ipv6Net) -> Self {
        Self { id: 0, prefix }
    }

    pub fn emit(&self, buf: &mut BytesMut) {
        if self.id != 0 {
            buf.put_u32(self.id);
        }
        buf.put_u8(self.prefix.prefix_len());
        let psize = nlri_psize(self.prefix.prefix_len());
        buf.put(&self.prefix.addr().octets()[0..psize]);
    }

    pub fn encoded_len(&self) -> usize {
        let id_len = if self.id != 0 { 4 } else { 0 };
        id_len + 1 + nlri_psize(self.prefix.prefix_len())
    }
}

impl ParseNlri<Ipv6Nlri> for Ipv6Nlri {
    fn parse_nlri(input: &[u8], add_path: bool) -> IResult<&[u8], Ipv6Nlri> {
        let (input, id) = if add_path { be_u32(input)? } else { (input, 0) };
        let (input, plen) = be_u8(input)?;
        if plen > 128 {
            return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
        }
        let psize = nlri_psize(plen);
        if input.len() < psize {
            return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
        }
        let mut paddr = [0u8; 16];
        paddr[..psize].copy_from_slice(&input[..psize]);
        let (input, _) = take(psize).parse(input)?;
        let prefix = Ipv6Net::new(Ipv6Addr::from(paddr), plen)
            .map_err(|_| nom::Err::Error(make_error(input, ErrorKind::Verify)))?;
        Ok((input, Ipv6Nlri { id, prefix }))
    }
}

impl fmt::Display for Ipv6Nlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id != 0 {
            write!(f, "{}:{}", self.id, self.prefix)
        } else {
            write!(f, "{}", self.prefix)
        }
    }
}
