use std::net::{Ipv4Addr, Ipv6Addr};

use nom::IResult;
use nom::number::complete::{be_u32, be_u128};

pub trait ParseBe<T> {
    fn parse_be(input: &[u8]) -> IResult<&[u8], T>;
}

/// NLRI parsing needs to know whether the session negotiated add-path
/// in the receive direction for the family being parsed.
pub trait ParseNlri<T> {
    fn parse_nlri(input: &[u8], add_path: bool) -> IResult<&[u8], T>;
}

impl ParseBe<Ipv4Addr> for Ipv4Addr {
    fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        if input.len() < 4 {
            return Err(nom::Err::Incomplete(nom::Needed::new(4)));
        }
        let (input, addr) = be_u32(input)?;
        Ok((input, Self::from(addr)))
    }
}

impl ParseBe<Ipv6Addr> for Ipv6Addr {
    fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        if input.len() < 16 {
            return Err(nom::Err::Incomplete(nom::Needed::new(16)));
        }
        let (input, addr) = be_u128(input)?;
        Ok((input, Self::from(addr)))
    }
}
