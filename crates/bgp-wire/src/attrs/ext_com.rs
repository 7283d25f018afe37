use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::bytes::complete::take;
use nom::Parser;

use crate::{AttrEmitter, AttrFlags, AttrType, many0_complete};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExtCommunity(pub Vec<ExtCommunityValue>);

impl ExtCommunity {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, value: ExtCommunityValue) {
        self.0.push(value)
    }

    pub fn sort_uniq(&mut self) {
        let coms: BTreeSet<ExtCommunityValue> = self.0.iter().cloned().collect();
        self.0 = coms.into_iter().collect();
    }

    pub fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, values) = many0_complete(ExtCommunityValue::parse_be).parse(input)?;
        Ok((input, Self(values)))
    }
}

impl AttrEmitter for ExtCommunity {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::ExtendedCom
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len() * 8)
    }

    fn emit(&self, buf: &mut BytesMut) {
        for val in self.0.iter() {
            buf.put(&val.0[..]);
        }
    }
}

impl fmt::Display for ExtCommunity {
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

/// 8-byte extended community (RFC 4360 plus the flowspec actions of
/// RFC 5575).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtCommunityValue(pub [u8; 8]);

impl ExtCommunityValue {
    pub fn parse_be(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, bytes) = take(8usize).parse(input)?;
        let mut val = [0u8; 8];
        val.copy_from_slice(bytes);
        Ok((input, Self(val)))
    }

    pub fn route_target_as2(asn: u16, num: u32) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x00;
        val[1] = 0x02;
        BigEndian::write_u16(&mut val[2..4], asn);
        BigEndian::write_u32(&mut val[4..8], num);
        Self(val)
    }

    pub fn route_target_as4(asn: u32, num: u16) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x02;
        val[1] = 0x02;
        BigEndian::write_u32(&mut val[2..6], asn);
        BigEndian::write_u16(&mut val[6..8], num);
        Self(val)
    }

    /// Flowspec traffic-rate action (RFC 5575 §7).  Rate 0 discards.
    pub fn traffic_rate(asn: u16, rate: f32) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x80;
        val[1] = 0x06;
        BigEndian::write_u16(&mut val[2..4], asn);
        BigEndian::write_f32(&mut val[4..8], rate);
        Self(val)
    }

    /// Flowspec traffic-action: sample / terminal bits.
    pub fn traffic_action(sample: bool, terminal: bool) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x80;
        val[1] = 0x07;
        val[7] = ((sample as u8) << 1) | terminal as u8;
        Self(val)
    }

    /// Flowspec redirect-to-VRF action.
    pub fn redirect(asn: u16, num: u32) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x80;
        val[1] = 0x08;
        BigEndian::write_u16(&mut val[2..4], asn);
        BigEndian::write_u32(&mut val[4..8], num);
        Self(val)
    }

    /// Flowspec traffic-marking action: rewrite DSCP.
    pub fn traffic_marking(dscp: u8) -> Self {
        let mut val = [0u8; 8];
        val[0] = 0x80;
        val[1] = 0x09;
        val[7] = dscp & 0x3F;
        Self(val)
    }
}

impl fmt::Display for ExtCommunityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.0;
        match (v[0], v[1]) {
            (0x00, 0x02) => {
                let asn = BigEndian::read_u16(&v[2..4]);
                let num = BigEndian::read_u32(&v[4..8]);
                write!(f, "rt:{}:{}", asn, num)
            }
            (0x02, 0x02) => {
                let asn = BigEndian::read_u32(&v[2..6]);
                let num = BigEndian::read_u16(&v[6..8]);
                write!(f, "rt:{}:{}", asn, num)
            }
            (0x01, 0x02) => {
                let num = BigEndian::read_u16(&v[6..8]);
                write!(f, "rt:{}.{}.{}.{}:{}", v[2], v[3], v[4], v[5], num)
            }
            (0x80, 0x06) => {
                let rate = BigEndian::read_f32(&v[4..8]);
                if rate == 0.0 {
                    write!(f, "discard")
                } else {
                    write!(f, "rate-limit {}", rate)
                }
            }
            (0x80, 0x07) => write!(f, "action 0x{:02x}", v[7]),
            (0x80, 0x08) => {
                let asn = BigEndian::read_u16(&v[2..4]);
                let num = BigEndian::read_u32(&v[4..8]);
                write!(f, "redirect:{}:{}", asn, num)
            }
            (0x80, 0x09) => write!(f, "mark {}", v[7]),
            _ => {
                write!(f, "0x")?;
                for b in v.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// `rt:<asn>:<num>` or `target:<asn>:<num>`.
impl FromStr for ExtCommunityValue {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("rt:")
            .or_else(|| s.strip_prefix("target:"))
            .ok_or(())?;
        let (left, right) = rest.rsplit_once(':').ok_or(())?;
        let asn: u32 = left.parse().map_err(|_| ())?;
        if asn > u16::MAX as u32 {
            let num: u16 = right.parse().map_err(|_| ())?;
            Ok(Self::route_target_as4(asn, num))
        } else {
            let num: u32 = right.parse().map_err(|_| ())?;
            Ok(Self::route_target_as2(asn as u16, num))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_target_str() {
        let val: ExtCommunityValue = "rt:65000:1".parse().unwrap();
        assert_eq!(val.0, [0x00, 0x02, 0xFD, 0xE8, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(val.to_string(), "rt:65000:1");
    }

    #[test]
    fn traffic_rate_discard() {
        let val = ExtCommunityValue::traffic_rate(0, 0.0);
        assert_eq!(val.to_string(), "discard");
    }
}
