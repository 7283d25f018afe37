use std::fmt;
use std::sync::Arc;

use bgp_wire::{AfiSafi, Attrs, MpNlri};
use bytes::BytesMut;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Announce,
    Withdraw,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Announce => write!(f, "announce"),
            Action::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// One route instruction flowing from configuration or the control
/// pipe into the per-peer Adj-RIB-Outs.  Attribute collections are
/// shared; identical attributes hash to the same batch downstream.
#[derive(Debug, Clone)]
pub struct Change {
    pub afi_safi: AfiSafi,
    pub nlri: MpNlri,
    pub attrs: Arc<Attrs>,
    pub action: Action,
}

impl Change {
    pub fn announce(afi_safi: AfiSafi, nlri: MpNlri, attrs: Arc<Attrs>) -> Self {
        Self {
            afi_safi,
            nlri,
            attrs,
            action: Action::Announce,
        }
    }

    pub fn withdraw(afi_safi: AfiSafi, nlri: MpNlri) -> Self {
        Self {
            afi_safi,
            nlri,
            attrs: Arc::new(Attrs::default()),
            action: Action::Withdraw,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::of(&self.nlri, self.afi_safi)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.action, self.afi_safi, self.nlri)
    }
}

/// Identity of a route for replacement purposes: the path identifier
/// plus the canonical NLRI encoding with the identifier zeroed.  The
/// route distinguisher is part of the key; label stacks are not, so an
/// announce with a new label replaces the old entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    pub id: u32,
    bytes: Vec<u8>,
}

impl RouteKey {
    pub fn of(nlri: &MpNlri, afi_safi: AfiSafi) -> Self {
        let id = nlri.path_id();
        let mut keyed = nlri.clone();
        keyed.set_path_id(0);
        if let MpNlri::Labeled(nlri) = &mut keyed {
            nlri.labels.clear();
        }
        if let MpNlri::Vpn(nlri) = &mut keyed {
            nlri.labels.clear();
        }
        let mut buf = BytesMut::new();
        keyed.emit(&mut buf, afi_safi);
        Self {
            id,
            bytes: buf.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgp_wire::{Afi, Ipv4Nlri, Label, Safi, VpnNlri};

    #[test]
    fn same_prefix_distinct_path_ids() {
        let v4u = AfiSafi::new(Afi::Ip, Safi::Unicast);
        let mut one = Ipv4Nlri::new("10.0.0.0/24".parse().unwrap());
        one.id = 1;
        let mut two = one.clone();
        two.id = 2;
        let key_one = RouteKey::of(&MpNlri::Ipv4(one), v4u);
        let key_two = RouteKey::of(&MpNlri::Ipv4(two), v4u);
        assert_ne!(key_one, key_two);
    }

    #[test]
    fn label_change_is_a_replacement() {
        let vpn = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
        let one = VpnNlri::new(
            vec![Label::new(16, 0, true)],
            "65000:1".parse().unwrap(),
            "10.1.0.0/24".parse().unwrap(),
        );
        let mut two = one.clone();
        two.labels = vec![Label::new(17, 0, true)];
        let key_one = RouteKey::of(&MpNlri::Vpn(one), vpn);
        let key_two = RouteKey::of(&MpNlri::Vpn(two), vpn);
        assert_eq!(key_one, key_two);
    }

    #[test]
    fn distinct_rd_distinct_key() {
        let vpn = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
        let one = VpnNlri::new(
            vec![Label::new(16, 0, true)],
            "65000:1".parse().unwrap(),
            "10.1.0.0/24".parse().unwrap(),
        );
        let mut two = one.clone();
        two.rd = "65000:2".parse().unwrap();
        let key_one = RouteKey::of(&MpNlri::Vpn(one), vpn);
        let key_two = RouteKey::of(&MpNlri::Vpn(two), vpn);
        assert_ne!(key_one, key_two);
    }
}
