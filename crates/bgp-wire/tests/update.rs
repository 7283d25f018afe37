use std::net::IpAddr;

use bgp_wire::*;
use bytes::BytesMut;
use hex_literal::hex;

fn ipv4_announce_attrs() -> Attrs {
    let mut attrs = Attrs::new();
    attrs.aspath = Some(AsPath::sequence(vec![65001]));
    attrs.nexthop = Some("192.0.2.1".parse::<IpAddr>().unwrap());
    attrs.local_pref = Some(LocalPref::new(100));
    attrs
}

// announce 10.0.0.0/24 next-hop 192.0.2.1 origin igp as-path 65001
// local-preference 100, 2-byte AS encoding.
const IPV4_ANNOUNCE: &[u8] = &hex!(
    "
ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff
00 34 02
00 00
00 19
40 01 01 00
40 02 04 02 01 fd e9
40 03 04 c0 00 02 01
40 05 04 00 00 00 64
18 0a 00 00
"
);

#[test]
fn ipv4_announce_encode() {
    let mut update = UpdatePacket::new();
    update.attrs = Some(ipv4_announce_attrs());
    update.updates.push(Ipv4Nlri::new("10.0.0.0/24".parse().unwrap()));

    let bytes = update.emit(false);
    assert_eq!(bytes.len(), 52);
    assert_eq!(&bytes[..], IPV4_ANNOUNCE);
}

#[test]
fn ipv4_announce_decode() {
    let (rest, packet) =
        BgpPacket::parse_packet(IPV4_ANNOUNCE, &ParseOption::default()).unwrap();
    assert!(rest.is_empty());
    let BgpPacket::Update(update) = packet else {
        panic!("packet must be Update");
    };
    assert_eq!(update.updates.len(), 1);
    assert_eq!(update.updates[0].prefix, "10.0.0.0/24".parse().unwrap());
    let attrs = update.attrs.as_ref().unwrap();
    assert_eq!(attrs.origin, Some(Origin::Igp));
    assert_eq!(attrs.aspath, Some(AsPath::sequence(vec![65001])));
    assert_eq!(attrs.nexthop, Some("192.0.2.1".parse::<IpAddr>().unwrap()));
    assert_eq!(attrs.local_pref, Some(LocalPref::new(100)));

    // Full wire roundtrip.
    let bytes = update.emit(false);
    assert_eq!(&bytes[..], IPV4_ANNOUNCE);
}

#[test]
fn ipv4_withdraw_encode() {
    let mut update = UpdatePacket::new();
    update
        .withdraws
        .push(Ipv4Nlri::new("10.0.0.0/24".parse().unwrap()));

    let bytes = update.emit(false);
    // header + withdrawn len (4 bytes of NLRI) + empty attrs
    assert_eq!(
        &bytes[..],
        &hex!(
            "
ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff
00 1b 02
00 04 18 0a 00 00
00 00
"
        )
    );

    let (_, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    assert_eq!(parsed.withdraws, update.withdraws);
    assert!(parsed.updates.is_empty());
}

#[test]
fn vpnv4_announce_layout() {
    let afi_safi = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
    let mut mp_reach = MpReachAttr::new(afi_safi, MpNexthop::Vpn4("192.0.2.1".parse().unwrap()));
    mp_reach.nlris.push(MpNlri::Vpn(VpnNlri::new(
        vec![Label::new(16, 0, true)],
        "65000:1".parse().unwrap(),
        "10.1.0.0/24".parse().unwrap(),
    )));

    let mut buf = BytesMut::new();
    mp_reach.attr_emit(&mut buf);
    assert_eq!(
        &buf[..],
        &hex!(
            "
80 0e 20
00 01 80
0c 00 00 00 00 00 00 00 00 c0 00 02 01
00
70 00 01 01 00 00 fd e8 00 00 00 01 0a 01 00
"
        )
    );
}

#[test]
fn vpnv4_update_roundtrip() {
    let afi_safi = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
    let mut update = UpdatePacket::new();
    let mut attrs = Attrs::new();
    attrs.aspath = Some(AsPath::sequence(vec![65001]));
    attrs.ecom = Some(ExtCommunity(vec![ExtCommunityValue::route_target_as2(
        65000, 1,
    )]));
    update.attrs = Some(attrs);
    let mut mp_reach = MpReachAttr::new(afi_safi, MpNexthop::Vpn4("192.0.2.1".parse().unwrap()));
    mp_reach.nlris.push(MpNlri::Vpn(VpnNlri::new(
        vec![Label::new(16, 0, true)],
        "65000:1".parse().unwrap(),
        "10.1.0.0/24".parse().unwrap(),
    )));
    update.mp_reach = Some(mp_reach);

    let bytes = update.emit(true);
    let (_, packet) = BgpPacket::parse_packet(
        &bytes,
        &ParseOption {
            as4: Direct {
                send: true,
                recv: true,
            },
            ..Default::default()
        },
    )
    .unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    let reach = parsed.mp_reach.as_ref().unwrap();
    assert_eq!(reach.afi_safi, afi_safi);
    assert_eq!(reach.nlris, update.mp_reach.as_ref().unwrap().nlris);
    let bytes_again = parsed.emit(true);
    assert_eq!(&bytes_again[..], &bytes[..]);
}

#[test]
fn vpnv4_withdraw_accepts_dummy_label() {
    let afi_safi = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
    let mut update = UpdatePacket::new();
    let mut mp_unreach = MpUnreachAttr::new(afi_safi);
    mp_unreach.nlris.push(MpNlri::Vpn(VpnNlri::new(
        vec![WITHDRAW_LABEL],
        "65000:1".parse().unwrap(),
        "10.1.0.0/24".parse().unwrap(),
    )));
    update.mp_unreach = Some(mp_unreach);

    let bytes = update.emit(true);
    let (_, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    let unreach = parsed.mp_unreach.as_ref().unwrap();
    let MpNlri::Vpn(nlri) = &unreach.nlris[0] else {
        panic!("NLRI must be VPN");
    };
    assert!(nlri.labels[0].is_withdraw_dummy());
}

#[test]
fn add_path_id_parsed_when_negotiated() {
    let mut update = UpdatePacket::new();
    update.attrs = Some(ipv4_announce_attrs());
    let mut nlri = Ipv4Nlri::new("10.0.0.0/24".parse().unwrap());
    nlri.id = 7;
    update.updates.push(nlri);
    let bytes = update.emit(false);

    let mut opt = ParseOption::default();
    opt.add_path.insert(
        AfiSafi::new(Afi::Ip, Safi::Unicast),
        Direct {
            recv: true,
            send: false,
        },
    );
    let (_, packet) = BgpPacket::parse_packet(&bytes, &opt).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    assert_eq!(parsed.updates[0].id, 7);
    assert_eq!(parsed.updates[0].prefix, "10.0.0.0/24".parse().unwrap());
}

#[test]
fn end_of_rib_markers() {
    let update = UpdatePacket::new();
    assert!(update.is_end_of_rib());
    let bytes = update.emit(true);
    assert_eq!(bytes.len(), 23);

    let mut update = UpdatePacket::new();
    update.mp_unreach = Some(MpUnreachAttr::new(AfiSafi::new(Afi::Ip, Safi::MplsVpn)));
    assert!(update.is_end_of_rib());
    let (_, packet) =
        BgpPacket::parse_packet(&update.emit(true), &ParseOption::default()).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    assert!(parsed.is_end_of_rib());
}

#[test]
fn unknown_transitive_attr_transits_with_partial_bit() {
    // Unknown optional transitive attribute type 77.
    let mut body = BytesMut::new();
    body.extend_from_slice(&hex!("c0 4d 02 be ef"));
    let attrs_known = ipv4_announce_attrs();
    let mut update = UpdatePacket::new();
    update.attrs = Some(attrs_known);
    update.updates.push(Ipv4Nlri::new("10.0.0.0/24".parse().unwrap()));
    let mut bytes = update.emit(false);

    // Splice the unknown attribute into the attribute field.
    let attr_len = u16::from_be_bytes([bytes[21], bytes[22]]);
    let insert_at = 23 + attr_len as usize;
    let mut spliced = BytesMut::new();
    spliced.extend_from_slice(&bytes[..insert_at]);
    spliced.extend_from_slice(&body[..]);
    spliced.extend_from_slice(&bytes[insert_at..]);
    let new_attr_len = attr_len + body.len() as u16;
    spliced[21..23].copy_from_slice(&new_attr_len.to_be_bytes());
    let new_len = (spliced.len() as u16).to_be_bytes();
    spliced[16..18].copy_from_slice(&new_len);
    bytes = spliced;

    let (_, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    let attrs = parsed.attrs.as_ref().unwrap();
    assert_eq!(attrs.unknowns.len(), 1);
    assert_eq!(attrs.unknowns[0].type_code, 77);

    // Re-encoded with the partial bit set.
    let out = parsed.emit(false);
    let mut found = false;
    for window in out.windows(5) {
        if window[1] == 77 {
            assert_eq!(window[0] & 0xE0, 0xE0); // optional|transitive|partial
            found = true;
        }
    }
    assert!(found);
}

#[test]
fn unknown_non_transitive_attr_dropped() {
    // Unknown optional non-transitive attribute type 77.
    let mut update = UpdatePacket::new();
    update.attrs = Some(ipv4_announce_attrs());
    update.updates.push(Ipv4Nlri::new("10.0.0.0/24".parse().unwrap()));
    let bytes = update.emit(false);

    let attr_len = u16::from_be_bytes([bytes[21], bytes[22]]);
    let insert_at = 23 + attr_len as usize;
    let mut spliced = BytesMut::new();
    spliced.extend_from_slice(&bytes[..insert_at]);
    spliced.extend_from_slice(&hex!("80 4d 02 be ef"));
    spliced.extend_from_slice(&bytes[insert_at..]);
    let new_attr_len = attr_len + 5;
    spliced[21..23].copy_from_slice(&new_attr_len.to_be_bytes());
    let new_len = (spliced.len() as u16).to_be_bytes();
    spliced[16..18].copy_from_slice(&new_len);

    let (_, packet) = BgpPacket::parse_packet(&spliced, &ParseOption::default()).unwrap();
    let BgpPacket::Update(parsed) = packet else {
        panic!("packet must be Update");
    };
    assert!(parsed.attrs.as_ref().unwrap().unknowns.is_empty());
}
