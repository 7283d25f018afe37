use bgp_wire::*;
use bytes::BytesMut;
use hex_literal::hex;

// OPEN with no optional parameters: version 4, asn 65002, hold 90,
// identifier 192.168.0.1.
const PLAIN_OPEN: &[u8] = &hex!(
    "
ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff
00 1d 01 04 fd ea 00 5a c0 a8 00 01 00
"
);

#[test]
fn open_decode() {
    let (rest, packet) = BgpPacket::parse_packet(PLAIN_OPEN, &ParseOption::default()).unwrap();
    assert!(rest.is_empty());
    let BgpPacket::Open(open) = packet else {
        panic!("packet must be Open");
    };
    assert_eq!(open.version, 4);
    assert_eq!(open.asn, 65002);
    assert_eq!(open.hold_time, 90);
    assert_eq!(open.bgp_id_addr(), "192.168.0.1".parse::<std::net::Ipv4Addr>().unwrap());
    assert_eq!(open.opt_param_len, 0);
    assert!(open.caps.mp.is_empty());
    assert!(open.caps.as4.is_none());
}

#[test]
fn open_reencode_identical() {
    let (_, packet) = BgpPacket::parse_packet(PLAIN_OPEN, &ParseOption::default()).unwrap();
    let BgpPacket::Open(open) = packet else {
        panic!("packet must be Open");
    };
    let bytes: BytesMut = (*open).into();
    assert_eq!(&bytes[..], PLAIN_OPEN);
}

#[test]
fn open_with_capabilities_roundtrip() {
    let mut caps = Caps::default();
    let v4u = AfiSafi::new(Afi::Ip, Safi::Unicast);
    let v6u = AfiSafi::new(Afi::Ip6, Safi::Unicast);
    caps.mp.insert(v4u, v4u.into());
    caps.mp.insert(v6u, v6u.into());
    caps.refresh = Some(CapRefresh::default());
    caps.as4 = Some(CapAs4::new(65002));
    caps.addpath.insert(
        v4u,
        AddPathValue {
            afi: Afi::Ip,
            safi: Safi::Unicast,
            direction: AddPathDirection::SendReceive,
        },
    );
    caps.restart_time = Some(120);
    caps.restart
        .insert(v4u, RestartValue::new(Afi::Ip, Safi::Unicast));

    let header = BgpHeader::new(BgpType::Open, BGP_HEADER_LEN);
    let open = OpenPacket::new(header, 65002, 90, &"10.0.0.1".parse().unwrap(), caps.clone());
    let bytes: BytesMut = open.into();

    let (rest, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    assert!(rest.is_empty());
    let BgpPacket::Open(parsed) = packet else {
        panic!("packet must be Open");
    };
    assert_eq!(parsed.caps, caps);

    // Determinism: a second encode of the parsed form is identical.
    let again: BytesMut = (*parsed).into();
    assert_eq!(&again[..], &bytes[..]);
}

#[test]
fn unknown_capability_is_ignored() {
    // A single unknown capability code 99, two bytes of value.
    let mut caps_buf = BytesMut::new();
    caps_buf.extend_from_slice(&[0x02, 0x04, 99, 0x02, 0xAA, 0xBB]);

    let mut buf = BytesMut::new();
    let header: BytesMut = BgpHeader::new(BgpType::Open, 29 + 6).into();
    buf.extend_from_slice(&header[..]);
    buf.extend_from_slice(&hex!("04 fd ea 00 5a c0 a8 00 01"));
    buf.extend_from_slice(&[caps_buf.len() as u8]);
    buf.extend_from_slice(&caps_buf[..]);

    let (_, packet) = BgpPacket::parse_packet(&buf, &ParseOption::default()).unwrap();
    let BgpPacket::Open(open) = packet else {
        panic!("packet must be Open");
    };
    assert_eq!(open.caps.unknown.len(), 1);
    assert_eq!(open.caps.unknown[0].code, 99);
    assert!(open.caps.mp.is_empty());
}
