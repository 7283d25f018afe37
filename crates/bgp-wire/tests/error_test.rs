use bgp_wire::*;
use hex_literal::hex;

#[test]
fn truncated_attribute() {
    let invalid_update = hex!(
        "ffffffffffffffffffffffffffffffff" // marker
        "001f" // length: 31
        "02"   // type: Update
        "0000" // withdrawn routes length: 0
        "0004" // path attributes length: 4
        "4001" // well-known transitive ORIGIN
        "02"   // claims 2 bytes
        "00"   // but only 1 follows
    );

    let result = BgpPacket::parse_packet(&invalid_update, &ParseOption::default());
    match result {
        Err(WireError::ShortRead { needed }) => assert!(needed > 0),
        Err(WireError::AttributeLength { attr_type, .. }) => {
            assert_eq!(attr_type, AttrType::Origin)
        }
        other => panic!("expected decode failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn attribute_flag_mismatch() {
    // ORIGIN marked optional: flags 0xC0 instead of 0x40.
    let invalid_update = hex!(
        "ffffffffffffffffffffffffffffffff"
        "0020"
        "02"
        "0000"
        "0004"
        "c001" "01" "00"
    );

    let result = BgpPacket::parse_packet(&invalid_update, &ParseOption::default());
    let Err(err) = result else {
        panic!("expected flag error");
    };
    assert!(matches!(
        err,
        WireError::AttributeFlags {
            attr_type: AttrType::Origin,
            ..
        }
    ));
    let (code, sub_code) = err.notify_codes();
    assert_eq!(u8::from(code), 3);
    assert_eq!(sub_code, 4);
}

#[test]
fn mixed_mp_payload_rejected() {
    let mut update = UpdatePacket::new();
    let afi_safi = AfiSafi::new(Afi::Ip6, Safi::Unicast);
    let mut mp_reach = MpReachAttr::new(afi_safi, MpNexthop::Ipv6("2001:db8::1".parse().unwrap()));
    mp_reach
        .nlris
        .push(MpNlri::Ipv6(Ipv6Nlri::new("2001:db8::/32".parse().unwrap())));
    update.mp_reach = Some(mp_reach);
    let mut mp_unreach = MpUnreachAttr::new(afi_safi);
    mp_unreach
        .nlris
        .push(MpNlri::Ipv6(Ipv6Nlri::new("2001:db8:1::/48".parse().unwrap())));
    update.mp_unreach = Some(mp_unreach);

    let bytes = update.emit(true);
    let result = BgpPacket::parse_packet(&bytes, &ParseOption::default());
    assert!(matches!(result, Err(WireError::MixedMpPayload)));
}

#[test]
fn unsupported_family_in_mp_reach() {
    // MP_REACH with AFI 25 (L2VPN)/SAFI 70 (EVPN): recognised family
    // codes, but not one this speaker carries.
    let update = hex!(
        "ffffffffffffffffffffffffffffffff"
        "001e"
        "02"
        "0000"
        "0007"
        "800e04" // optional MP_REACH, length 4
        "00194600" // AFI 25, SAFI 70, nexthop length 0
    );

    let result = BgpPacket::parse_packet(&update, &ParseOption::default());
    assert!(matches!(
        result,
        Err(WireError::UnsupportedFamily {
            afi: Afi::L2vpn,
            safi: Safi::Evpn
        })
    ));
}

#[test]
fn error_display_carries_context() {
    let error = WireError::AttributeParse {
        attr_type: AttrType::AsPath,
        source: Box::new(WireError::Nom("test error".to_string())),
    };
    let error_string = format!("{}", error);
    assert!(error_string.contains("AsPath"));
    assert!(error_string.contains("failed to parse attribute"));
}
