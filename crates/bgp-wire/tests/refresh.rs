use bgp_wire::*;
use bytes::BytesMut;
use hex_literal::hex;

const REFRESH_V4U: &[u8] = &hex!(
    "
ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff ff
00 17 05 00 01 00 01
"
);

#[test]
fn refresh_decode() {
    let (rest, packet) = BgpPacket::parse_packet(REFRESH_V4U, &ParseOption::default()).unwrap();
    assert!(rest.is_empty());
    let BgpPacket::RouteRefresh(refresh) = packet else {
        panic!("packet must be RouteRefresh");
    };
    assert_eq!(refresh.afi, Afi::Ip);
    assert_eq!(refresh.safi, Safi::Unicast);
    assert_eq!(refresh.subtype, RefreshSubtype::Normal);
}

#[test]
fn refresh_encode() {
    let refresh = RouteRefreshPacket::new(
        AfiSafi::new(Afi::Ip, Safi::Unicast),
        RefreshSubtype::Normal,
    );
    let bytes: BytesMut = refresh.into();
    assert_eq!(&bytes[..], REFRESH_V4U);
}

#[test]
fn enhanced_refresh_markers_roundtrip() {
    for subtype in [RefreshSubtype::Begin, RefreshSubtype::End] {
        let refresh =
            RouteRefreshPacket::new(AfiSafi::new(Afi::Ip, Safi::MplsVpn), subtype);
        let bytes: BytesMut = refresh.clone().into();
        let (_, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
        let BgpPacket::RouteRefresh(parsed) = packet else {
            panic!("packet must be RouteRefresh");
        };
        assert_eq!(parsed, refresh);
    }
}

#[test]
fn keepalive_roundtrip() {
    let bytes = keepalive_packet();
    let (rest, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    assert!(rest.is_empty());
    assert!(matches!(packet, BgpPacket::Keepalive(_)));
}

#[test]
fn notification_roundtrip() {
    let notification = NotificationPacket::new(NotifyCode::HoldTimerExpired, 0, Vec::new());
    let bytes: BytesMut = notification.into();
    let (_, packet) = BgpPacket::parse_packet(&bytes, &ParseOption::default()).unwrap();
    let BgpPacket::Notification(parsed) = packet else {
        panic!("packet must be Notification");
    };
    assert_eq!(parsed.code, NotifyCode::HoldTimerExpired);
    assert_eq!(parsed.sub_code, 0);
}
