use std::collections::{BTreeMap, BTreeSet};

use bgp_wire::{
    AfiSafi, BGP_EXTENDED_PACKET_LEN, BGP_PACKET_LEN, Caps, Direct, ParseOption,
};

/// Negotiated session view: the intersection of what we advertised in
/// our OPEN and what the peer advertised in theirs.
#[derive(Debug, Default, Clone)]
pub struct SessionCaps {
    pub families: BTreeSet<AfiSafi>,
    pub route_refresh: bool,
    pub enhanced_refresh: bool,
    pub extended_message: bool,
    pub as4: bool,
    /// Effective add-path direction per family, from our side's point
    /// of view: `send` means we attach path identifiers on output.
    pub add_path: BTreeMap<AfiSafi, Direct>,
    /// Families both sides are restart-capable for.
    pub restart: BTreeSet<AfiSafi>,
    pub restart_time: u16,
}

impl SessionCaps {
    pub fn negotiate(local: &Caps, remote: &Caps) -> Self {
        let mut session = SessionCaps::default();

        for afi_safi in local.mp.keys() {
            if remote.mp.contains_key(afi_safi) {
                session.families.insert(*afi_safi);
            }
        }

        session.route_refresh = local.refresh.is_some() && remote.refresh.is_some();
        session.enhanced_refresh =
            local.enhanced_refresh.is_some() && remote.enhanced_refresh.is_some();
        session.extended_message = local.extended.is_some() && remote.extended.is_some();
        session.as4 = local.as4.is_some() && remote.as4.is_some();

        for (afi_safi, ours) in local.addpath.iter() {
            let Some(theirs) = remote.addpath.get(afi_safi) else {
                continue;
            };
            if !session.families.contains(afi_safi) {
                continue;
            }
            let direct = Direct {
                send: ours.direction.is_send() && theirs.direction.is_receive(),
                recv: ours.direction.is_receive() && theirs.direction.is_send(),
            };
            if direct.send || direct.recv {
                session.add_path.insert(*afi_safi, direct);
            }
        }

        if local.restart_time.is_some() && remote.restart_time.is_some() {
            session.restart_time = remote.restart_time.unwrap_or_default();
            for afi_safi in local.restart.keys() {
                if remote.restart.contains_key(afi_safi)
                    && session.families.contains(afi_safi)
                {
                    session.restart.insert(*afi_safi);
                }
            }
        }

        session
    }

    pub fn max_message_size(&self) -> usize {
        if self.extended_message {
            BGP_EXTENDED_PACKET_LEN
        } else {
            BGP_PACKET_LEN
        }
    }

    pub fn is_add_path_send(&self, afi_safi: &AfiSafi) -> bool {
        self.add_path
            .get(afi_safi)
            .is_some_and(|direct| direct.send)
    }

    /// Codec context for the session.
    pub fn parse_option(&self) -> ParseOption {
        let mut opt = ParseOption {
            extended_message: self.extended_message,
            ..Default::default()
        };
        opt.as4.send = self.as4;
        opt.as4.recv = self.as4;
        for (afi_safi, direct) in self.add_path.iter() {
            opt.add_path.insert(*afi_safi, direct.clone());
        }
        opt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgp_wire::{
        AddPathDirection, AddPathValue, Afi, CapAs4, CapRefresh, Safi,
    };

    fn family(afi: Afi, safi: Safi) -> AfiSafi {
        AfiSafi::new(afi, safi)
    }

    fn mp(caps: &mut Caps, afi_safi: AfiSafi) {
        caps.mp.insert(afi_safi, afi_safi.into());
    }

    #[test]
    fn intersection_of_families_and_flags() {
        // Local: ipv4/ipv6 unicast, 4-octet AS, route refresh.
        let mut local = Caps::default();
        mp(&mut local, family(Afi::Ip, Safi::Unicast));
        mp(&mut local, family(Afi::Ip6, Safi::Unicast));
        local.as4 = Some(CapAs4::new(65001));
        local.refresh = Some(CapRefresh::default());

        // Remote: ipv4 unicast, route refresh, add-path receive.
        let mut remote = Caps::default();
        mp(&mut remote, family(Afi::Ip, Safi::Unicast));
        remote.refresh = Some(CapRefresh::default());
        remote.addpath.insert(
            family(Afi::Ip, Safi::Unicast),
            AddPathValue {
                afi: Afi::Ip,
                safi: Safi::Unicast,
                direction: AddPathDirection::Receive,
            },
        );

        let session = SessionCaps::negotiate(&local, &remote);
        assert_eq!(
            session.families.iter().copied().collect::<Vec<_>>(),
            vec![family(Afi::Ip, Safi::Unicast)]
        );
        assert!(session.route_refresh);
        // We never advertised add-path, so the remote offer is moot.
        assert!(session.add_path.is_empty());
        // 4-octet AS only on our side: 2-byte encoding.
        assert!(!session.as4);
        assert_eq!(session.max_message_size(), 4096);
    }

    #[test]
    fn add_path_direction_intersection() {
        let v4u = family(Afi::Ip, Safi::Unicast);
        let mut local = Caps::default();
        mp(&mut local, v4u);
        local.addpath.insert(
            v4u,
            AddPathValue {
                afi: Afi::Ip,
                safi: Safi::Unicast,
                direction: AddPathDirection::SendReceive,
            },
        );
        let mut remote = Caps::default();
        mp(&mut remote, v4u);
        remote.addpath.insert(
            v4u,
            AddPathValue {
                afi: Afi::Ip,
                safi: Safi::Unicast,
                direction: AddPathDirection::Receive,
            },
        );

        let session = SessionCaps::negotiate(&local, &remote);
        let direct = session.add_path.get(&v4u).unwrap();
        assert!(direct.send);
        assert!(!direct.recv);
        assert!(session.is_add_path_send(&v4u));
    }

    #[test]
    fn graceful_restart_family_intersection() {
        let v4u = family(Afi::Ip, Safi::Unicast);
        let vpn = family(Afi::Ip, Safi::MplsVpn);
        let mut local = Caps::default();
        mp(&mut local, v4u);
        mp(&mut local, vpn);
        local.restart_time = Some(120);
        local
            .restart
            .insert(v4u, bgp_wire::RestartValue::new(Afi::Ip, Safi::Unicast));
        local
            .restart
            .insert(vpn, bgp_wire::RestartValue::new(Afi::Ip, Safi::MplsVpn));
        let mut remote = Caps::default();
        mp(&mut remote, v4u);
        mp(&mut remote, vpn);
        remote.restart_time = Some(90);
        remote
            .restart
            .insert(v4u, bgp_wire::RestartValue::new(Afi::Ip, Safi::Unicast));

        let session = SessionCaps::negotiate(&local, &remote);
        assert_eq!(session.restart_time, 90);
        assert!(session.restart.contains(&v4u));
        assert!(!session.restart.contains(&vpn));
    }
}
