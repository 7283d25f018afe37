use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::number::complete::be_u8;

use crate::{AttrEmitter, AttrFlags, AttrType, ParseBe};

/// ORIGIN attribute (RFC 4271 §5.1.1).  Reserved values decode as
/// Incomplete rather than failing; the field is advisory.
#[repr(u8)]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Default, Hash)]
pub enum Origin {
    #[default]
    Igp = 0,
    Egp = 1,
    Incomplete = 2,
}

impl From<Origin> for u8 {
    fn from(value: Origin) -> Self {
        value as u8
    }
}

impl ParseBe<Origin> for Origin {
    fn parse_be(input: &[u8]) -> IResult<&[u8], Origin> {
        let (input, val) = be_u8(input)?;
        let origin = match val {
            0 => Origin::Igp,
            1 => Origin::Egp,
            _ => Origin::Incomplete,
        };
        Ok((input, origin))
    }
}

impl AttrEmitter for Origin {
    fn attr_type(&self) -> AttrType {
        AttrType::Origin
    }

    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_transitive(true)
    }

    fn len(&self) -> Option<usize> {
        Some(1)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u8((*self).into());
    }
}

impl FromStr for Origin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "igp" => Ok(Origin::Igp),
            "egp" => Ok(Origin::Egp),
            "incomplete" => Ok(Origin::Incomplete),
            _ => Err(()),
        }
    }
}

/// The classic single-letter rendering: i, e, ?.
impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Igp => write!(f, "i"),
            Origin::Egp => write!(f, "e"),
            Origin::Incomplete => write!(f, "?"),
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Igp => write!(f, "Origin: IGP"),
            Origin::Egp => write!(f, "Origin: EGP"),
            Origin::Incomplete => write!(f, "Origin: Incomplete"),
        }
    }
}
