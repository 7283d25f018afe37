use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use ipnet::Ipv4Net;
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take;
use nom::error::{ErrorKind, make_error};
use nom::number::complete::{be_u8, be_u32};

use crate::{ParseNlri, many0_complete, nlri_psize};

/// IPv4 unicast/multicast NLRI.  `id` is the RFC 7911 path identifier;
/// zero means the session did not negotiate add-path for the family.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Ipv4Nlri {
    pub id: u32,
    pub prefix: Ipv4Net,
}

impl Ipv4Nlri {
    pub fn new(prefix: Ipv4Net) -> Self {
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

impl ParseNlri<Ipv4Nlri> for Ipv4Nlri {
    fn parse_nlri(input: &[u8], add_path: bool) -> IResult<&[u8], Ipv4Nlri> {
        let (input, id) = if add_path { be_u32(input)? } else { (input, 0) };
        let (input, plen) = be_u8(input)?;
        if plen > 32 {
            return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue)));
        }
        let psize = nlri_psize(plen);
        if input.len() < psize {
            return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
        }
        let mut paddr = [0u8; 4];
        paddr[..psize].copy_from_slice(&input[..psize]);
        let (input, _) = take(psize).parse(input)?;
        let prefix = Ipv4Net::new(Ipv4Addr::from(paddr), plen)
            .map_err(|_| nom::Err::Error(make_error(input, ErrorKind::Verify)))?;
        Ok((input, Ipv4Nlri { id, prefix }))
    }
}

/// Parse a fixed-length NLRI field (withdrawn routes or the trailing
/// NLRI of an UPDATE).
pub fn parse_ipv4_nlri_field(
    input: &[u8],
    length: u16,
    add_path: bool,
) -> IResult<&[u8], Vec<Ipv4Nlri>> {
    if input.len() < length as usize {
        return Err(nom::Err::Error(make_error(input, ErrorKind::Eof)));
    }
    let (nlri, input) = input.split_at(length as usize);
    let (_, nlris) = many0_complete(|i| Ipv4Nlri::parse_nlri(i, add_path)).parse(nlri)?;
    Ok((input, nlris))
}

impl fmt::Display for Ipv4Nlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id != 0 {
            write!(f, "{}:{}", self.id, self.prefix)
        } else {
            write!(f, "{}", self.prefix)
        }
    }
}
