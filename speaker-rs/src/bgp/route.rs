use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use std::sync::Arc;

use bgp_wire::{AfiSafi, Attrs, MpNlri};

use super::change::{Action, Change, RouteKey};

type FamilyRoutes = BTreeMap<AfiSafi, BTreeMap<RouteKey, (MpNlri, Arc<Attrs>)>>;

/// Routes the speaker intends to advertise: the accumulated Change
/// stream from configuration and the control pipe.  Scoped entries
/// (`neighbor <ip> announce ...`) apply to one peer only.  Peers going
/// Established are seeded from here.
#[derive(Debug, Default)]
pub struct RouteStore {
    global: FamilyRoutes,
    scoped: BTreeMap<IpAddr, FamilyRoutes>,
}

impl RouteStore {
    /// Fold one change into the store.  Duplicate keys are last-wins,
    /// matching the treatment of duplicate path identifiers inside a
    /// single add-path UPDATE.
    pub fn apply(&mut self, scope: Option<IpAddr>, change: &Change) {
        let table = match scope {
            Some(addr) => self.scoped.entry(addr).or_default(),
            None => &mut self.global,
        };
        let family = table.entry(change.afi_safi).or_default();
        match change.action {
            Action::Announce => {
                family.insert(change.key(), (change.nlri.clone(), change.attrs.clone()));
            }
            Action::Withdraw => {
                family.remove(&change.key());
            }
        }
    }

    /// Announce changes seeding one peer's Adj-RIB-Out, restricted to
    /// its negotiated families.  Scoped routes shadow global ones with
    /// the same key.
    pub fn changes_for(&self, peer: IpAddr, families: &BTreeSet<AfiSafi>) -> Vec<Change> {
        let mut changes = Vec::new();
        for afi_safi in families.iter() {
            let mut merged: BTreeMap<&RouteKey, &(MpNlri, Arc<Attrs>)> = BTreeMap::new();
            if let Some(family) = self.global.get(afi_safi) {
                merged.extend(family.iter());
            }
            if let Some(family) = self.scoped.get(&peer).and_then(|t| t.get(afi_safi)) {
                merged.extend(family.iter());
            }
            for (nlri, attrs) in merged.into_values() {
                changes.push(Change::announce(*afi_safi, nlri.clone(), attrs.clone()));
            }
        }
        changes
    }

    pub fn count(&self, afi_safi: &AfiSafi) -> usize {
        self.global.get(afi_safi).map(BTreeMap::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgp_wire::{Afi, AsPath, Ipv4Nlri, Safi};

    fn v4u() -> AfiSafi {
        AfiSafi::new(Afi::Ip, Safi::Unicast)
    }

    fn announce(prefix: &str) -> Change {
        let mut attrs = Attrs::new();
        attrs.aspath = Some(AsPath::sequence(vec![65001]));
        attrs.nexthop = Some("192.0.2.1".parse().unwrap());
        Change::announce(
            v4u(),
            MpNlri::Ipv4(Ipv4Nlri::new(prefix.parse().unwrap())),
            Arc::new(attrs),
        )
    }

    #[test]
    fn withdraw_removes_entry() {
        let mut store = RouteStore::default();
        let change = announce("10.0.0.0/24");
        store.apply(None, &change);
        assert_eq!(store.count(&v4u()), 1);

        store.apply(None, &Change::withdraw(v4u(), change.nlri.clone()));
        assert_eq!(store.count(&v4u()), 0);
    }

    #[test]
    fn scoped_routes_only_reach_their_peer(){
        let mut store = RouteStore::default();
        store.apply(None, &announce("10.0.0.0/24"));
        let scoped_peer: IpAddr = "192.0.2.9".parse().unwrap();
        store.apply(Some(scoped_peer), &announce("10.9.0.0/24"));

        let families: BTreeSet<AfiSafi> = [v4u()].into_iter().collect();
        let other: IpAddr = "192.0.2.8".parse().unwrap();
        assert_eq!(store.changes_for(other, &families).len(), 1);
        assert_eq!(store.changes_for(scoped_peer, &families).len(), 2);
    }
}
