use std::fmt;
use std::net::IpAddr;

use bytes::BytesMut;

use crate::{
    Aggregator, Aggregator2View, As2View, As4AggregatorView, As4PathView, AsPath, AttrEmitter,
    ClusterList, Community, ExtCommunity, LargeCommunity, LocalPref, Med, NexthopAttr, Origin,
    OriginatorId, PmsiTunnel, UnknownAttr,
    attrs::atomic::AtomicAggregate,
};

/// Path attribute collection of one route.  One slot per known type
/// code plus retained unknown optional-transitive attributes; encoding
/// walks the slots in ascending type-code order, so equal collections
/// produce identical bytes.  The collection is hashable and serves as
/// the batching key in the Adj-RIB-Out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attrs {
    /// Origin type (1)
    pub origin: Option<Origin>,
    /// AS path (2), held 4-byte internally
    pub aspath: Option<AsPath>,
    /// Next-hop; rendered as NEXT_HOP (3) for ipv4-unicast, inside
    /// MP_REACH for every other family
    pub nexthop: Option<IpAddr>,
    /// Multi-exit discriminator (4)
    pub med: Option<Med>,
    /// Local preference (5)
    pub local_pref: Option<LocalPref>,
    /// Atomic aggregate (6)
    pub atomic_aggregate: Option<AtomicAggregate>,
    /// Aggregator (7)
    pub aggregator: Option<Aggregator>,
    /// Community (8)
    pub com: Option<Community>,
    /// Originator ID (9)
    pub originator_id: Option<OriginatorId>,
    /// Cluster list (10)
    pub cluster_list: Option<ClusterList>,
    /// Extended community (16)
    pub ecom: Option<ExtCommunity>,
    /// PMSI tunnel (22)
    pub pmsi_tunnel: Option<PmsiTunnel>,
    /// Large community (32)
    pub lcom: Option<LargeCommunity>,
    /// Unknown optional transitive attributes, ascending type code
    pub unknowns: Vec<UnknownAttr>,
}

impl Attrs {
    pub fn new() -> Self {
        Attrs {
            origin: Some(Origin::default()),
            aspath: Some(AsPath::default()),
            ..Default::default()
        }
    }

    pub fn add_unknown(&mut self, attr: UnknownAttr) {
        let pos = self
            .unknowns
            .partition_point(|u| u.type_code <= attr.type_code);
        self.unknowns.insert(pos, attr);
    }

    /// Emit the attribute field in ascending type-code order.  `as4`
    /// selects the AS number wire width; `with_nexthop` is true only
    /// for ipv4-unicast, where the next-hop travels as its own
    /// attribute instead of inside MP_REACH.
    pub fn attr_emit(&self, buf: &mut BytesMut, as4: bool, with_nexthop: bool) {
        let mut next_unknown = 0usize;
        let mut flush_below = |buf: &mut BytesMut, code: u8, next_unknown: &mut usize| {
            while let Some(attr) = self.unknowns.get(*next_unknown) {
                if attr.type_code >= code {
                    break;
                }
                attr.attr_emit(buf);
                *next_unknown += 1;
            }
        };

        flush_below(buf, 1, &mut next_unknown);
        if let Some(v) = &self.origin {
            v.attr_emit(buf);
        }
        flush_below(buf, 2, &mut next_unknown);
        if let Some(v) = &self.aspath {
            if as4 {
                v.attr_emit(buf);
            } else {
                As2View(v).attr_emit(buf);
            }
        }
        flush_below(buf, 3, &mut next_unknown);
        if with_nexthop
            && let Some(IpAddr::V4(addr)) = &self.nexthop
        {
            NexthopAttr(*addr).attr_emit(buf);
        }
        flush_below(buf, 4, &mut next_unknown);
        if let Some(v) = &self.med {
            v.attr_emit(buf);
        }
        flush_below(buf, 5, &mut next_unknown);
        if let Some(v) = &self.local_pref {
            v.attr_emit(buf);
        }
        flush_below(buf, 6, &mut next_unknown);
        if let Some(v) = &self.atomic_aggregate {
            v.attr_emit(buf);
        }
        flush_below(buf, 7, &mut next_unknown);
        if let Some(v) = &self.aggregator {
            if as4 {
                v.attr_emit(buf);
            } else {
                Aggregator2View(v).attr_emit(buf);
            }
        }
        flush_below(buf, 8, &mut next_unknown);
        if let Some(v) = &self.com {
            v.attr_emit(buf);
        }
        flush_below(buf, 9, &mut next_unknown);
        if let Some(v) = &self.originator_id {
            v.attr_emit(buf);
        }
        flush_below(buf, 10, &mut next_unknown);
        if let Some(v) = &self.cluster_list {
            v.attr_emit(buf);
        }
        flush_below(buf, 16, &mut next_unknown);
        if let Some(v) = &self.ecom {
            v.attr_emit(buf);
        }
        flush_below(buf, 17, &mut next_unknown);
        if !as4
            && let Some(v) = &self.aspath
            && v.has_as4()
        {
            As4PathView(v).attr_emit(buf);
        }
        flush_below(buf, 18, &mut next_unknown);
        if !as4
            && let Some(v) = &self.aggregator
            && v.has_as4()
        {
            As4AggregatorView(v).attr_emit(buf);
        }
        flush_below(buf, 22, &mut next_unknown);
        if let Some(v) = &self.pmsi_tunnel {
            v.attr_emit(buf);
        }
        flush_below(buf, 32, &mut next_unknown);
        if let Some(v) = &self.lcom {
            v.attr_emit(buf);
        }
        flush_below(buf, u8::MAX, &mut next_unknown);
        while let Some(attr) = self.unknowns.get(next_unknown) {
            attr.attr_emit(buf);
            next_unknown += 1;
        }
    }

    /// Size of the emitted attribute field.  The packer uses this to
    /// bound UPDATEs to the negotiated maximum message size.
    pub fn encoded_len(&self, as4: bool, with_nexthop: bool) -> usize {
        let mut buf = BytesMut::new();
        self.attr_emit(&mut buf, as4, with_nexthop);
        buf.len()
    }
}

impl fmt::Display for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = &self.origin {
            writeln!(f, " Origin: {}", v)?;
        }
        if let Some(v) = &self.aspath {
            writeln!(f, " AS Path: {}", v)?;
        }
        if let Some(v) = &self.nexthop {
            writeln!(f, " Nexthop: {}", v)?;
        }
        if let Some(v) = &self.med {
            writeln!(f, " MED: {}", v)?;
        }
        if let Some(v) = &self.local_pref {
            writeln!(f, " LocalPref: {}", v)?;
        }
        if self.atomic_aggregate.is_some() {
            writeln!(f, " Atomic Aggregate")?;
        }
        if let Some(v) = &self.aggregator {
            writeln!(f, " Aggregator: {}", v)?;
        }
        if let Some(v) = &self.com {
            writeln!(f, " Community: {}", v)?;
        }
        if let Some(v) = &self.originator_id {
            writeln!(f, " OriginatorId: {}", v)?;
        }
        if let Some(v) = &self.cluster_list {
            writeln!(f, " ClusterList: {}", v)?;
        }
        if let Some(v) = &self.ecom {
            writeln!(f, " ExtCommunity: {}", v)?;
        }
        if let Some(v) = &self.pmsi_tunnel {
            writeln!(f, " PMSI Tunnel: {}", v)?;
        }
        if let Some(v) = &self.lcom {
            writeln!(f, " LargeCommunity: {}", v)?;
        }
        for v in self.unknowns.iter() {
            writeln!(f, " Unknown: {}", v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn deterministic_encode() {
        let mut attrs = Attrs::new();
        attrs.aspath = Some(AsPath::sequence(vec![65001]));
        attrs.nexthop = Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        attrs.com = Some("100:200".parse().unwrap());

        let mut one = BytesMut::new();
        attrs.attr_emit(&mut one, true, true);
        let mut two = BytesMut::new();
        attrs.clone().attr_emit(&mut two, true, true);
        assert_eq!(one, two);
        assert_eq!(one.len(), attrs.encoded_len(true, true));
    }

    #[test]
    fn unknown_attrs_interleave_by_type_code() {
        let mut attrs = Attrs::new();
        attrs.lcom = Some("1:2:3".parse().unwrap());
        attrs.add_unknown(UnknownAttr {
            type_code: 20,
            flags: 0xC0,
            data: vec![1, 2],
        });
        attrs.add_unknown(UnknownAttr {
            type_code: 200,
            flags: 0xC0,
            data: vec![3],
        });

        let mut buf = BytesMut::new();
        attrs.attr_emit(&mut buf, true, true);

        // Collect emitted type codes in order.
        let mut codes = Vec::new();
        let mut rest = &buf[..];
        while !rest.is_empty() {
            let flags = rest[0];
            codes.push(rest[1]);
            let (len, hdr) = if flags & 0x10 != 0 {
                (u16::from_be_bytes([rest[2], rest[3]]) as usize, 4)
            } else {
                (rest[2] as usize, 3)
            };
            rest = &rest[hdr + len..];
        }
        assert_eq!(codes, vec![1, 2, 20, 32, 200]);
    }

    #[test]
    fn as4_path_companion_when_2byte_session() {
        let mut attrs = Attrs::new();
        attrs.aspath = Some(AsPath::sequence(vec![4200000000]));

        let mut buf = BytesMut::new();
        attrs.attr_emit(&mut buf, false, false);
        // AS_PATH with AS_TRANS then AS4_PATH with the real ASN.
        assert!(buf.windows(2).any(|w| w == [0x5B, 0xA0])); // 23456
        let mut codes = Vec::new();
        let mut rest = &buf[..];
        while !rest.is_empty() {
            let flags = rest[0];
            codes.push(rest[1]);
            let (len, hdr) = if flags & 0x10 != 0 {
                (u16::from_be_bytes([rest[2], rest[3]]) as usize, 4)
            } else {
                (rest[2] as usize, 3)
            };
            rest = &rest[hdr + len..];
        }
        assert_eq!(codes, vec![1, 2, 17]);
    }
}
