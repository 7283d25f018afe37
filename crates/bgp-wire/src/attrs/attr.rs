use std::net::IpAddr;

use nom::Parser;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom_derive::*;

use crate::{
    Aggregator, AsPath, Attrs, AttributeFlags, ClusterList, Community, ExtCommunity,
    LargeCommunity, LocalPref, Med, MpReachAttr, MpUnreachAttr, NexthopAttr, Origin, OriginatorId,
    ParseBe, ParseOption, PmsiTunnel, UnknownAttr, WireError, flags_valid,
    attrs::atomic::AtomicAggregate,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AttrType {
    Origin,
    AsPath,
    NextHop,
    Med,
    LocalPref,
    AtomicAggregate,
    Aggregator,
    Community,
    OriginatorId,
    ClusterList,
    MpReachNlri,
    MpUnreachNlri,
    ExtendedCom,
    As4Path,
    As4Aggregator,
    PmsiTunnel,
    LargeCom,
    Unknown(u8),
}

crate::afi::wire_code!(AttrType: u8, {
    Origin = 1,
    AsPath = 2,
    NextHop = 3,
    Med = 4,
    LocalPref = 5,
    AtomicAggregate = 6,
    Aggregator = 7,
    Community = 8,
    OriginatorId = 9,
    ClusterList = 10,
    MpReachNlri = 14,
    MpUnreachNlri = 15,
    ExtendedCom = 16,
    As4Path = 17,
    As4Aggregator = 18,
    PmsiTunnel = 22,
    LargeCom = 32,
});

/// Parsed path attribute.
#[derive(Debug, Clone)]
pub enum Attr {
    Origin(Origin),
    AsPath(AsPath),
    NextHop(NexthopAttr),
    Med(Med),
    LocalPref(LocalPref),
    AtomicAggregate(AtomicAggregate),
    Aggregator(Aggregator),
    Community(Community),
    OriginatorId(OriginatorId),
    ClusterList(ClusterList),
    MpReachNlri(MpReachAttr),
    MpUnreachNlri(MpUnreachAttr),
    ExtendedCom(ExtCommunity),
    As4Path(AsPath),
    As4Aggregator(Aggregator),
    PmsiTunnel(PmsiTunnel),
    LargeCom(LargeCommunity),
    Unknown(UnknownAttr),
}

fn attr_parse_error(attr_type: AttrType) -> impl FnOnce(nom::Err<nom::error::Error<&[u8]>>) -> WireError {
    move |e| WireError::AttributeParse {
        attr_type,
        source: Box::new(WireError::from(e)),
    }
}

fn expect_len(attr_type: AttrType, expected: usize, actual: usize) -> Result<(), WireError> {
    if expected != actual {
        return Err(WireError::AttributeLength {
            attr_type,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Attr {
    /// Parse one attribute off the front of the attribute field.
    pub fn parse_attr<'a>(
        input: &'a [u8],
        as4: bool,
        opt: &ParseOption,
    ) -> Result<(&'a [u8], Attr), WireError> {
        let (input, flags_byte) = be_u8::<_, nom::error::Error<&[u8]>>(input)
            .map_err(|e| WireError::from(e))?;
        let flags = AttributeFlags::from_bits_truncate(flags_byte);
        let (input, type_byte) = be_u8::<_, nom::error::Error<&[u8]>>(input)
            .map_err(|e| WireError::from(e))?;
        let attr_type: AttrType = type_byte.into();

        if !flags_valid(attr_type, &flags) {
            return Err(WireError::AttributeFlags {
                attr_type,
                flags: flags_byte,
            });
        }

        let (input, length_bytes) = if flags.is_extended() {
            take::<_, _, nom::error::Error<&[u8]>>(2usize)
                .parse(input)
                .map_err(|e| WireError::from(e))?
        } else {
            take::<_, _, nom::error::Error<&[u8]>>(1usize)
                .parse(input)
                .map_err(|e| WireError::from(e))?
        };
        let attr_len = if length_bytes.len() == 2 {
            u16::from_be_bytes([length_bytes[0], length_bytes[1]]) as usize
        } else {
            length_bytes[0] as usize
        };

        if input.len() < attr_len {
            return Err(WireError::ShortRead {
                needed: attr_len - input.len(),
            });
        }
        let (payload, input) = input.split_at(attr_len);

        let attr = match attr_type {
            AttrType::Origin => {
                expect_len(attr_type, 1, attr_len)?;
                let (_, v) = Origin::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::Origin(v)
            }
            AttrType::AsPath => {
                let (_, v) = if as4 {
                    AsPath::parse_as4(payload).map_err(attr_parse_error(attr_type))?
                } else {
                    AsPath::parse_as2(payload).map_err(attr_parse_error(attr_type))?
                };
                Attr::AsPath(v)
            }
            AttrType::NextHop => {
                expect_len(attr_type, 4, attr_len)?;
                let (_, v) = NexthopAttr::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::NextHop(v)
            }
            AttrType::Med => {
                expect_len(attr_type, 4, attr_len)?;
                let (_, v) = Med::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::Med(v)
            }
            AttrType::LocalPref => {
                expect_len(attr_type, 4, attr_len)?;
                let (_, v) = LocalPref::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::LocalPref(v)
            }
            AttrType::AtomicAggregate => {
                expect_len(attr_type, 0, attr_len)?;
                Attr::AtomicAggregate(AtomicAggregate {})
            }
            AttrType::Aggregator => {
                let (_, v) = if as4 {
                    expect_len(attr_type, 8, attr_len)?;
                    Aggregator::parse_as4(payload).map_err(attr_parse_error(attr_type))?
                } else {
                    expect_len(attr_type, 6, attr_len)?;
                    Aggregator::parse_as2(payload).map_err(attr_parse_error(attr_type))?
                };
                Attr::Aggregator(v)
            }
            AttrType::Community => {
                if attr_len % 4 != 0 {
                    return Err(WireError::AttributeLength {
                        attr_type,
                        expected: attr_len.next_multiple_of(4),
                        actual: attr_len,
                    });
                }
                let (_, v) = Community::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::Community(v)
            }
            AttrType::OriginatorId => {
                expect_len(attr_type, 4, attr_len)?;
                let (_, v) =
                    OriginatorId::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::OriginatorId(v)
            }
            AttrType::ClusterList => {
                if attr_len % 4 != 0 {
                    return Err(WireError::AttributeLength {
                        attr_type,
                        expected: attr_len.next_multiple_of(4),
                        actual: attr_len,
                    });
                }
                let (_, v) = ClusterList::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::ClusterList(v)
            }
            AttrType::MpReachNlri => Attr::MpReachNlri(MpReachAttr::parse_nlri(payload, opt)?),
            AttrType::MpUnreachNlri => {
                Attr::MpUnreachNlri(MpUnreachAttr::parse_nlri(payload, opt)?)
            }
            AttrType::ExtendedCom => {
                if attr_len % 8 != 0 {
                    return Err(WireError::AttributeLength {
                        attr_type,
                        expected: attr_len.next_multiple_of(8),
                        actual: attr_len,
                    });
                }
                let (_, v) =
                    ExtCommunity::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::ExtendedCom(v)
            }
            AttrType::As4Path => {
                let (_, v) = AsPath::parse_as4(payload).map_err(attr_parse_error(attr_type))?;
                Attr::As4Path(v)
            }
            AttrType::As4Aggregator => {
                expect_len(attr_type, 8, attr_len)?;
                let (_, v) = Aggregator::parse_as4(payload).map_err(attr_parse_error(attr_type))?;
                Attr::As4Aggregator(v)
            }
            AttrType::PmsiTunnel => {
                let (_, v) = PmsiTunnel::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::PmsiTunnel(v)
            }
            AttrType::LargeCom => {
                if attr_len % 12 != 0 {
                    return Err(WireError::AttributeLength {
                        attr_type,
                        expected: attr_len.next_multiple_of(12),
                        actual: attr_len,
                    });
                }
                let (_, v) =
                    LargeCommunity::parse_be(payload).map_err(attr_parse_error(attr_type))?;
                Attr::LargeCom(v)
            }
            AttrType::Unknown(code) => Attr::Unknown(UnknownAttr {
                type_code: code,
                flags: flags_byte,
                data: payload.to_vec(),
            }),
        };

        Ok((input, attr))
    }
}

type ParsedAttributes<'a> = Result<
    (
        &'a [u8],
        Option<Attrs>,
        Option<MpReachAttr>,
        Option<MpUnreachAttr>,
    ),
    WireError,
>;

/// Parse the whole attribute field of an UPDATE into the attribute
/// collection plus the MP transports.  2-byte AS paths are reconciled
/// with AS4_PATH/AS4_AGGREGATOR here (RFC 6793), and unknown
/// attributes are kept only when optional transitive.
pub fn parse_update_attrs<'a>(input: &'a [u8], length: u16, as4: bool, opt: &ParseOption) -> ParsedAttributes<'a> {
    if input.len() < length as usize {
        return Err(WireError::ShortRead {
            needed: length as usize - input.len(),
        });
    }
    let (attr, input) = input.split_at(length as usize);
    let mut remaining = attr;
    let mut attrs = Attrs::default();
    let mut mp_reach: Option<MpReachAttr> = None;
    let mut mp_unreach: Option<MpUnreachAttr> = None;
    let mut as4_path: Option<AsPath> = None;
    let mut as4_aggregator: Option<Aggregator> = None;

    while !remaining.is_empty() {
        let (new_remaining, attr) = Attr::parse_attr(remaining, as4, opt)?;
        match attr {
            Attr::Origin(v) => attrs.origin = Some(v),
            Attr::AsPath(v) => attrs.aspath = Some(v),
            Attr::NextHop(v) => attrs.nexthop = Some(IpAddr::V4(v.0)),
            Attr::Med(v) => attrs.med = Some(v),
            Attr::LocalPref(v) => attrs.local_pref = Some(v),
            Attr::AtomicAggregate(v) => attrs.atomic_aggregate = Some(v),
            Attr::Aggregator(v) => attrs.aggregator = Some(v),
            Attr::Community(v) => attrs.com = Some(v),
            Attr::OriginatorId(v) => attrs.originator_id = Some(v),
            Attr::ClusterList(v) => attrs.cluster_list = Some(v),
            Attr::MpReachNlri(v) => {
                if mp_unreach.is_some() {
                    return Err(WireError::MixedMpPayload);
                }
                attrs.nexthop = v.nexthop.addr();
                mp_reach = Some(v);
            }
            Attr::MpUnreachNlri(v) => {
                if mp_reach.is_some() {
                    return Err(WireError::MixedMpPayload);
                }
                mp_unreach = Some(v);
            }
            Attr::ExtendedCom(v) => attrs.ecom = Some(v),
            Attr::As4Path(v) => as4_path = Some(v),
            Attr::As4Aggregator(v) => as4_aggregator = Some(v),
            Attr::PmsiTunnel(v) => attrs.pmsi_tunnel = Some(v),
            Attr::LargeCom(v) => attrs.lcom = Some(v),
            Attr::Unknown(v) => {
                // Unknown optional transitive attributes transit; the
                // rest are dropped here, the single sanctioned silent
                // drop in the codec.
                if v.is_optional() && v.is_transitive() {
                    attrs.add_unknown(v);
                }
            }
        }
        remaining = new_remaining;
    }

    if !as4 {
        if let Some(aspath) = attrs.aspath.take() {
            attrs.aspath = Some(AsPath::reconcile(aspath, as4_path));
        }
        if let Some(v) = as4_aggregator {
            attrs.aggregator = Some(v);
        }
    }

    Ok((input, Some(attrs), mp_reach, mp_unreach))
}
