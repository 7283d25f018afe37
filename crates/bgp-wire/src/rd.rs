use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::Parser;

pub const RD_TYPE_AS2: u16 = 0;
pub const RD_TYPE_IP: u16 = 1;
pub const RD_TYPE_AS4: u16 = 2;

/// 8-byte route distinguisher (RFC 4364): a 2-byte type followed by a
/// 6-byte value whose layout depends on the type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteDistinguisher {
    pub typ: u16,
    pub val: [u8; 6],
}

impl RouteDistinguisher {
    pub fn new_as2(asn: u16, num: u32) -> Self {
        let mut val = [0u8; 6];
        BigEndian::write_u16(&mut val[0..2], asn);
        BigEndian::write_u32(&mut val[2..6], num);
        Self {
            typ: RD_TYPE_AS2,
            val,
        }
    }

    pub fn new_ip(addr: Ipv4Addr, num: u16) -> Self {
        let mut val = [0u8; 6];
        val[0..4].copy_from_slice(&addr.octets());
        BigEndian::write_u16(&mut val[4..6], num);
        Self {
            typ: RD_TYPE_IP,
            val,
        }
    }

    pub fn new_as4(asn: u32, num: u16) -> Self {
        let mut val = [0u8; 6];
        BigEndian::write_u32(&mut val[0..4], asn);
        BigEndian::write_u16(&mut val[4..6], num);
        Self {
            typ: RD_TYPE_AS4,
            val,
        }
    }

    pub fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, typ) = be_u16(input)?;
        let (input, bytes) = take(6usize).parse(input)?;
        let mut val = [0u8; 6];
        val.copy_from_slice(bytes);
        Ok((input, Self { typ, val }))
    }

    pub fn emit(&self, buf: &mut BytesMut) {
        buf.put_u16(self.typ);
        buf.put(&self.val[..]);
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        BigEndian::write_u16(&mut bytes[0..2], self.typ);
        bytes[2..8].copy_from_slice(&self.val);
        bytes
    }
}

impl fmt::Display for RouteDistinguisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.typ {
            RD_TYPE_AS2 => {
                let asn = BigEndian::read_u16(&self.val[0..2]);
                let num = BigEndian::read_u32(&self.val[2..6]);
                write!(f, "{}:{}", asn, num)
            }
            RD_TYPE_IP => {
                let addr = Ipv4Addr::new(self.val[0], self.val[1], self.val[2], self.val[3]);
                let num = BigEndian::read_u16(&self.val[4..6]);
                write!(f, "{}:{}", addr, num)
            }
            RD_TYPE_AS4 => {
                let asn = BigEndian::read_u32(&self.val[0..4]);
                let num = BigEndian::read_u16(&self.val[4..6]);
                write!(f, "{}:{}", asn, num)
            }
            _ => write!(f, "type{}:{:?}", self.typ, self.val),
        }
    }
}

/// `<asn>:<number>` or `<ipv4>:<number>`.  The type is inferred: a
/// dotted left side yields type 1, an ASN above 65535 type 2, anything
/// else type 0.
impl FromStr for RouteDistinguisher {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = s.rsplit_once(':').ok_or(())?;
        if left.contains('.') {
            let addr: Ipv4Addr = left.parse().map_err(|_| ())?;
            let num: u16 = right.parse().map_err(|_| ())?;
            return Ok(Self::new_ip(addr, num));
        }
        let asn: u32 = left.parse().map_err(|_| ())?;
        if asn > u16::MAX as u32 {
            let num: u16 = right.parse().map_err(|_| ())?;
            Ok(Self::new_as4(asn, num))
        } else {
            let num: u32 = right.parse().map_err(|_| ())?;
            Ok(Self::new_as2(asn as u16, num))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let rd: RouteDistinguisher = "65000:1".parse().unwrap();
        assert_eq!(rd.typ, RD_TYPE_AS2);
        assert_eq!(rd.to_bytes(), [0x00, 0x00, 0xFD, 0xE8, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(rd.to_string(), "65000:1");

        let rd: RouteDistinguisher = "192.0.2.1:7".parse().unwrap();
        assert_eq!(rd.typ, RD_TYPE_IP);
        assert_eq!(rd.to_string(), "192.0.2.1:7");

        let rd: RouteDistinguisher = "4200000000:12".parse().unwrap();
        assert_eq!(rd.typ, RD_TYPE_AS4);
        assert_eq!(rd.to_string(), "4200000000:12");
    }

    #[test]
    fn wire_roundtrip() {
        let rd = RouteDistinguisher::new_as2(65000, 1);
        let bytes = rd.to_bytes();
        let (rest, parsed) = RouteDistinguisher::parse_be(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, rd);
    }
}
