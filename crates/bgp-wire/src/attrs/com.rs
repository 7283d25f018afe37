use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use nom_derive::NomBE;

use crate::{AttrEmitter, AttrFlags, AttrType};

/// COMMUNITY attribute (RFC 1997): a set of 32-bit tags, kept sorted
/// and de-duplicated when built from user input.
#[derive(Clone, Debug, Default, NomBE, PartialEq, Eq, Hash)]
pub struct Community(pub Vec<u32>);

impl Community {
    pub fn new() -> Self {
        Community(Vec::new())
    }

    pub fn push(&mut self, value: u32) {
        self.0.push(value)
    }

    pub fn sort_uniq(&mut self) {
        let coms: BTreeSet<u32> = self.0.iter().cloned().collect();
        self.0 = coms.into_iter().collect();
    }

    pub fn contains(&self, val: &u32) -> bool {
        self.0.contains(val)
    }

    pub fn is_no_export(&self) -> bool {
        self.contains(&CommunityValue::NO_EXPORT.value())
    }
}

impl AttrEmitter for Community {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::Community
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len() * 4)
    }

    fn emit(&self, buf: &mut BytesMut) {
        for &community in &self.0 {
            buf.put_u32(community);
        }
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self
            .0
            .iter()
            .map(|x| CommunityValue(*x).to_str())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{v}")
    }
}

impl FromStr for Community {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coms = Community::new();
        for token in s.split_whitespace() {
            match CommunityValue::from_readable_str(token) {
                Some(c) => coms.push(c.value()),
                None => return Err(()),
            }
        }
        if coms.0.is_empty() {
            return Err(());
        }
        coms.sort_uniq();
        Ok(coms)
    }
}

/// One community value, with the RFC 1997 / RFC 7999 / RFC 8326
/// well-known names attached.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct CommunityValue(pub u32);

/// Name table driving both parse and display of well-known values.
const WELL_KNOWN: &[(&str, u32)] = &[
    ("graceful-shutdown", 0xFFFF_0000),
    ("blackhole", 0xFFFF_029A),
    ("no-export", 0xFFFF_FF01),
    ("no-advertise", 0xFFFF_FF02),
    ("no-export-subconfed", 0xFFFF_FF03),
    ("no-peer", 0xFFFF_FF04),
];

impl CommunityValue {
    pub const GRACEFUL_SHUTDOWN: Self = CommunityValue(0xFFFF_0000);
    pub const BLACKHOLE: Self = CommunityValue(0xFFFF_029A);
    pub const NO_EXPORT: Self = CommunityValue(0xFFFF_FF01);
    pub const NO_ADVERTISE: Self = CommunityValue(0xFFFF_FF02);
    pub const NO_EXPORT_SUBCONFED: Self = CommunityValue(0xFFFF_FF03);
    pub const NO_PEER: Self = CommunityValue(0xFFFF_FF04);

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn from_wellknown_str(s: &str) -> Option<Self> {
        // "local-as" is the common alias for no-export-subconfed.
        let s = if s == "local-as" {
            "no-export-subconfed"
        } else {
            s
        };
        WELL_KNOWN
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, value)| CommunityValue(*value))
    }

    fn from_digit_str(s: &str) -> Option<Self> {
        match s.split_once(':') {
            // ASN:NN form.
            Some((hstr, lstr)) => {
                let hval = hstr.parse::<u16>().ok()?;
                let lval = lstr.parse::<u16>().ok()?;
                Some(CommunityValue(((hval as u32) << 16) | lval as u32))
            }
            // Plain u32.
            None => s.parse::<u32>().ok().map(CommunityValue),
        }
    }

    pub fn from_readable_str(s: &str) -> Option<Self> {
        Self::from_wellknown_str(s).or_else(|| Self::from_digit_str(s))
    }

    pub fn to_str(&self) -> String {
        match WELL_KNOWN.iter().find(|(_, value)| *value == self.0) {
            Some((name, _)) => (*name).into(),
            None => format!("{}:{}", self.0 >> 16, self.0 & 0xFFFF),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str() {
        let com: Community = "100:200 no-export 3:4".parse().unwrap();
        assert_eq!(format!("{}", com), "3:4 100:200 no-export");
        assert!(com.is_no_export());

        assert!("100:200 bogus".parse::<Community>().is_err());
        assert!("".parse::<Community>().is_err());
    }

    #[test]
    fn well_known_names() {
        let val = CommunityValue::from_readable_str("local-as").unwrap();
        assert_eq!(val, CommunityValue::NO_EXPORT_SUBCONFED);
        assert_eq!(val.to_str(), "no-export-subconfed");
        assert_eq!(CommunityValue(0xFFFF_029A).to_str(), "blackhole");
    }

    #[test]
    fn sort_uniq() {
        let mut com = Community(vec![7, 7, 3]);
        com.sort_uniq();
        assert_eq!(com.0, vec![3, 7]);
    }
}
