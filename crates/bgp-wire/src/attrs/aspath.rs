use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use nom::IResult;
use nom::multi::count;
use nom::number::complete::{be_u16, be_u32};
use nom::Parser;
use nom_derive::*;

use crate::{AttrEmitter, AttrFlags, AttrType, many0_complete};

pub const AS_SET: u8 = 1;
pub const AS_SEQ: u8 = 2;
pub const AS_CONFED_SEQ: u8 = 3;
pub const AS_CONFED_SET: u8 = 4;

/// Substituted for ASNs above 65535 when the session speaks 2-byte AS
/// numbers (RFC 6793).
pub const AS_TRANS: u16 = 23456;

/// AS Path segment length according to RFC 4271 and RFC 5065:
/// a sequence counts each ASN, a set counts one, confederation
/// segments count zero.
fn segment_length(typ: u8, asn_count: usize) -> u32 {
    match typ {
        AS_SEQ => asn_count as u32,
        AS_SET => 1,
        AS_CONFED_SEQ | AS_CONFED_SET => 0,
        _ => 0,
    }
}

#[derive(Debug, NomBE)]
pub struct AsSegmentHeader {
    pub typ: u8,
    pub length: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AsSegment {
    pub typ: u8,
    pub asn: Vec<u32>,
}

impl AsSegment {
    pub fn new(typ: u8) -> Self {
        Self {
            typ,
            asn: Vec::new(),
        }
    }

    fn emit_as4(&self, buf: &mut BytesMut) {
        buf.put_u8(self.typ);
        buf.put_u8(self.asn.len() as u8);
        self.asn.iter().for_each(|x| buf.put_u32(*x));
    }

    fn emit_as2(&self, buf: &mut BytesMut) {
        buf.put_u8(self.typ);
        buf.put_u8(self.asn.len() as u8);
        self.asn.iter().for_each(|x| {
            if *x > u16::MAX as u32 {
                buf.put_u16(AS_TRANS);
            } else {
                buf.put_u16(*x as u16);
            }
        });
    }
}

pub fn asn_to_string(val: u32) -> String {
    if val > 65535 {
        let hval: u32 = (val & 0xFFFF0000) >> 16;
        let lval: u32 = val & 0x0000FFFF;
        hval.to_string() + "." + &lval.to_string()
    } else {
        val.to_string()
    }
}

impl fmt::Display for AsSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self
            .asn
            .iter()
            .map(|x| asn_to_string(*x))
            .collect::<Vec<String>>()
            .join(" ");
        match self.typ {
            AS_SET => write!(f, "{{{v}}}"),
            AS_CONFED_SEQ => write!(f, "({v})"),
            AS_CONFED_SET => write!(f, "[{v}]"),
            _ => write!(f, "{v}"),
        }
    }
}

/// AS_PATH.  ASNs are held 4-byte internally; the session's 4-octet-AS
/// negotiation decides the wire width on emit.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct AsPath {
    pub segs: VecDeque<AsSegment>,
}

impl AsPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(asns: Vec<u32>) -> Self {
        let mut path = Self::new();
        if !asns.is_empty() {
            path.segs.push_back(AsSegment {
                typ: AS_SEQ,
                asn: asns,
            });
        }
        path
    }

    pub fn length(&self) -> u32 {
        self.segs
            .iter()
            .map(|seg| segment_length(seg.typ, seg.asn.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Leftmost ASN of the path, the neighboring AS on received routes.
    pub fn neighboring_as(&self) -> Option<u32> {
        self.segs
            .front()
            .filter(|seg| seg.typ == AS_SEQ)
            .and_then(|seg| seg.asn.first())
            .copied()
    }

    pub fn prepend(&mut self, asn: u32) {
        match self.segs.front_mut() {
            Some(seg) if seg.typ == AS_SEQ && seg.asn.len() < 255 => {
                seg.asn.insert(0, asn);
            }
            _ => {
                self.segs.push_front(AsSegment {
                    typ: AS_SEQ,
                    asn: vec![asn],
                });
            }
        }
    }

    /// Any ASN that cannot be represented in 2 bytes.
    pub fn has_as4(&self) -> bool {
        self.segs
            .iter()
            .any(|seg| seg.asn.iter().any(|asn| *asn > u16::MAX as u32))
    }

    pub fn parse_as4(input: &[u8]) -> IResult<&[u8], AsPath> {
        let (input, segs) = many0_complete(parse_as4_segment).parse(input)?;
        Ok((input, AsPath { segs: segs.into() }))
    }

    pub fn parse_as2(input: &[u8]) -> IResult<&[u8], AsPath> {
        let (input, segs) = many0_complete(parse_as2_segment).parse(input)?;
        Ok((input, AsPath { segs: segs.into() }))
    }

    /// RFC 6793 §4.2.3: reconcile a 2-byte AS_PATH with the AS4_PATH
    /// attribute.  When the AS4_PATH is no longer than the AS_PATH, the
    /// excess leading ASNs of the AS_PATH are prepended to the
    /// AS4_PATH; otherwise the AS4_PATH is ignored.
    pub fn reconcile(as_path: AsPath, as4_path: Option<AsPath>) -> AsPath {
        let Some(as4_path) = as4_path else {
            return as_path;
        };
        let len2 = as_path.length();
        let len4 = as4_path.length();
        if len4 > len2 {
            return as_path;
        }
        let mut lead = len2 - len4;
        let mut merged = as4_path;
        let mut leading: Vec<u32> = Vec::new();
        'outer: for seg in as_path.segs.iter() {
            if seg.typ != AS_SEQ {
                break;
            }
            for asn in seg.asn.iter() {
                if lead == 0 {
                    break 'outer;
                }
                leading.push(*asn);
                lead -= 1;
            }
        }
        for asn in leading.into_iter().rev() {
            merged.prepend(asn);
        }
        merged
    }
}

fn parse_as2_segment(input: &[u8]) -> IResult<&[u8], AsSegment> {
    let (input, header) = AsSegmentHeader::parse_be(input)?;
    let (input, asns) = count(be_u16, header.length as usize).parse(input)?;
    Ok((
        input,
        AsSegment {
            typ: header.typ,
            asn: asns.into_iter().map(u32::from).collect(),
        },
    ))
}

fn parse_as4_segment(input: &[u8]) -> IResult<&[u8], AsSegment> {
    let (input, header) = AsSegmentHeader::parse_be(input)?;
    let (input, asns) = count(be_u32, header.length as usize).parse(input)?;
    Ok((
        input,
        AsSegment {
            typ: header.typ,
            asn: asns,
        },
    ))
}

impl AttrEmitter for AsPath {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::AsPath
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn emit(&self, buf: &mut BytesMut) {
        self.segs.iter().for_each(|x| x.emit_as4(buf));
    }
}

/// 2-byte wire rendering of an AS_PATH for sessions without the
/// 4-octet-AS capability.  ASNs above 65535 become AS_TRANS.
pub struct As2View<'a>(pub &'a AsPath);

impl AttrEmitter for As2View<'_> {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::AsPath
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn emit(&self, buf: &mut BytesMut) {
        self.0.segs.iter().for_each(|x| x.emit_as2(buf));
    }
}

/// AS4_PATH companion attribute emitted next to a 2-byte AS_PATH when
/// the real path holds 4-byte ASNs.
pub struct As4PathView<'a>(pub &'a AsPath);

impl AttrEmitter for As4PathView<'_> {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true).with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::As4Path
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn emit(&self, buf: &mut BytesMut) {
        self.0.segs.iter().for_each(|x| x.emit_as4(buf));
    }
}

impl fmt::Display for AsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self
            .segs
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{v}")
    }
}

impl fmt::Debug for AsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS Path: {}", self)
    }
}

/// Space separated ASNs; `{..}` opens a set segment.
impl FromStr for AsPath {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut path = AsPath::new();
        let mut set: Option<AsSegment> = None;
        for token in s.split_whitespace() {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some(rest) = token.strip_prefix('{') {
                if set.is_some() {
                    return Err(());
                }
                let mut seg = AsSegment::new(AS_SET);
                let rest = rest.trim_end_matches('}');
                if !rest.is_empty() {
                    seg.asn.push(rest.parse().map_err(|_| ())?);
                }
                if token.ends_with('}') {
                    path.segs.push_back(seg);
                } else {
                    set = Some(seg);
                }
                continue;
            }
            if let Some(rest) = token.strip_suffix('}') {
                let mut seg = set.take().ok_or(())?;
                if !rest.is_empty() {
                    seg.asn.push(rest.parse().map_err(|_| ())?);
                }
                path.segs.push_back(seg);
                continue;
            }
            let asn: u32 = token.parse().map_err(|_| ())?;
            match set.as_mut() {
                Some(seg) => seg.asn.push(asn),
                None => match path.segs.back_mut() {
                    Some(seg) if seg.typ == AS_SEQ => seg.asn.push(asn),
                    _ => path.segs.push_back(AsSegment {
                        typ: AS_SEQ,
                        asn: vec![asn],
                    }),
                },
            }
        }
        if set.is_some() {
            return Err(());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_from_str() {
        let path: AsPath = "65001 65002 {100 200}".parse().unwrap();
        assert_eq!(path.segs.len(), 2);
        assert_eq!(path.segs[0].typ, AS_SEQ);
        assert_eq!(path.segs[0].asn, vec![65001, 65002]);
        assert_eq!(path.segs[1].typ, AS_SET);
        assert_eq!(path.segs[1].asn, vec![100, 200]);
        assert_eq!(path.length(), 3);
    }

    #[test]
    fn as2_emit_substitutes_as_trans() {
        let path = AsPath::sequence(vec![4200000000, 65001]);
        let mut buf = BytesMut::new();
        As2View(&path).emit(&mut buf);
        // type 2, length 2, AS_TRANS, 65001
        assert_eq!(&buf[..], &[2, 2, 0x5B, 0xA0, 0xFD, 0xE9]);
    }

    #[test]
    fn reconcile_prefers_longer_as_path() {
        // AS_PATH: 65001 23456 23456, AS4_PATH: 4200000000 4200000001
        let as_path = AsPath::sequence(vec![65001, AS_TRANS as u32, AS_TRANS as u32]);
        let as4_path = AsPath::sequence(vec![4200000000, 4200000001]);
        let merged = AsPath::reconcile(as_path, Some(as4_path));
        assert_eq!(merged.length(), 3);
        assert_eq!(
            merged.segs[0].asn,
            vec![65001, 4200000000, 4200000001]
        );
    }

    #[test]
    fn reconcile_ignores_oversized_as4_path() {
        let as_path = AsPath::sequence(vec![65001]);
        let as4_path = AsPath::sequence(vec![4200000000, 4200000001]);
        let merged = AsPath::reconcile(as_path.clone(), Some(as4_path));
        assert_eq!(merged, as_path);
    }

    #[test]
    fn wire_roundtrip_as4() {
        let path = AsPath::sequence(vec![65001, 4200000000]);
        let mut buf = BytesMut::new();
        path.emit(&mut buf);
        let (rest, parsed) = AsPath::parse_as4(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, path);
    }
}
