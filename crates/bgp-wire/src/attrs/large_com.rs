use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use nom_derive::NomBE;

use crate::{AttrEmitter, AttrFlags, AttrType};

/// LARGE_COMMUNITY (RFC 8092): 12-byte global:local1:local2 triples
/// for the 4-byte-ASN world.
#[derive(Clone, Debug, Default, NomBE, PartialEq, Eq, Hash)]
pub struct LargeCommunity(pub Vec<LargeCommunityValue>);

#[derive(Clone, Default, Debug, NomBE, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LargeCommunityValue {
    pub global: u32,
    pub local1: u32,
    pub local2: u32,
}

impl LargeCommunity {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, value: LargeCommunityValue) {
        self.0.push(value)
    }

    pub fn sort_uniq(&mut self) {
        let coms: BTreeSet<LargeCommunityValue> = self.0.iter().cloned().collect();
        self.0 = coms.into_iter().collect();
    }
}

impl AttrEmitter for LargeCommunity {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::LargeCom
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len() * 12)
    }

    fn emit(&self, buf: &mut BytesMut) {
        for value in &self.0 {
            buf.put_u32(value.global);
            buf.put_u32(value.local1);
            buf.put_u32(value.local2);
        }
    }
}

impl fmt::Display for LargeCommunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val = self
            .0
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{val}")
    }
}

impl fmt::Display for LargeCommunityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.global, self.local1, self.local2)
    }
}

impl FromStr for LargeCommunity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coms = LargeCommunity::new();
        for token in s.split_whitespace() {
            coms.push(token.parse()?);
        }
        if coms.0.is_empty() {
            return Err(());
        }
        coms.sort_uniq();
        Ok(coms)
    }
}

impl FromStr for LargeCommunityValue {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let value = Self {
            global: next_u32(&mut parts)?,
            local1: next_u32(&mut parts)?,
            local2: next_u32(&mut parts)?,
        };
        if parts.next().is_some() {
            return Err(());
        }
        Ok(value)
    }
}

fn next_u32(parts: &mut std::str::Split<'_, char>) -> Result<u32, ()> {
    parts.next().ok_or(())?.parse().map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str() {
        let com: LargeCommunity = "65538:655900:14560 100:102:103".parse().unwrap();
        assert_eq!(format!("{}", com), "100:102:103 65538:655900:14560");

        assert!("65538:655900".parse::<LargeCommunity>().is_err());
        assert!("1:2:3:4".parse::<LargeCommunity>().is_err());
    }
}
