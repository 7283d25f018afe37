use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bgp_wire::{
    Afi, AfiSafi, Attrs, MpNexthop, MpNlri, MpReachAttr, MpUnreachAttr, Safi, UpdatePacket,
    WITHDRAW_LABEL,
};

use super::change::{Action, Change, RouteKey};

/// Session parameters the packer needs.
#[derive(Debug, Clone, Copy)]
pub struct EncodeCtx {
    pub as4: bool,
    pub max_size: usize,
}

/// Adj-RIB-Out: per negotiated family, the routes currently advertised
/// to one peer plus the changes not yet serialised.
#[derive(Debug, Default)]
pub struct AdjOut {
    pub families: BTreeMap<AfiSafi, FamilyOut>,
}

impl AdjOut {
    pub fn enable(&mut self, afi_safi: AfiSafi, send_all_withdraws: bool) {
        self.families
            .entry(afi_safi)
            .or_insert_with(|| FamilyOut::new(send_all_withdraws));
    }

    pub fn get_mut(&mut self, afi_safi: &AfiSafi) -> Option<&mut FamilyOut> {
        self.families.get_mut(afi_safi)
    }

    pub fn ingest(&mut self, change: &Change) {
        let Some(family) = self.families.get_mut(&change.afi_safi) else {
            return;
        };
        match change.action {
            Action::Announce => {
                family.announce(change.key(), change.nlri.clone(), change.attrs.clone())
            }
            Action::Withdraw => family.withdraw(change.key(), change.nlri.clone()),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.families.values().any(|family| family.has_pending())
    }

    pub fn mark_stale(&mut self) {
        for family in self.families.values_mut() {
            family.stale = true;
            family.pending_withdraw.clear();
            family.pending_announce.clear();
        }
    }

    pub fn clear(&mut self) {
        for family in self.families.values_mut() {
            family.advertised.clear();
            family.pending_withdraw.clear();
            family.pending_announce.clear();
            family.stale = false;
        }
    }
}

#[derive(Debug, Default)]
pub struct FamilyOut {
    /// Routes the peer has been sent, keyed for replacement.
    advertised: BTreeMap<RouteKey, (MpNlri, Arc<Attrs>)>,
    pending_withdraw: BTreeMap<RouteKey, MpNlri>,
    pending_announce: BTreeMap<RouteKey, (MpNlri, Arc<Attrs>)>,
    pub send_all_withdraws: bool,
    /// Retained across a graceful restart until the stale timer fires.
    pub stale: bool,
}

impl FamilyOut {
    pub fn new(send_all_withdraws: bool) -> Self {
        Self {
            send_all_withdraws,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.advertised.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_withdraw.is_empty() || !self.pending_announce.is_empty()
    }

    /// Replacement insert; a re-announce with structurally equal
    /// attributes produces no wire output.
    pub fn announce(&mut self, key: RouteKey, nlri: MpNlri, attrs: Arc<Attrs>) {
        if self.pending_announce.get(&key).is_none()
            && !self.pending_withdraw.contains_key(&key)
            && self
                .advertised
                .get(&key)
                .is_some_and(|(_, current)| *current == attrs)
        {
            return;
        }
        self.pending_announce.insert(key, (nlri, attrs));
    }

    /// A withdraw for a route the peer was never sent is suppressed
    /// unless send-all-withdraws is configured.
    pub fn withdraw(&mut self, key: RouteKey, nlri: MpNlri) {
        let cancelled = self.pending_announce.remove(&key).is_some();
        if let Some((sent, _)) = self.advertised.get(&key) {
            self.pending_withdraw.insert(key, sent.clone());
        } else if !cancelled && self.send_all_withdraws {
            self.pending_withdraw.insert(key, nlri);
        }
    }

    /// Queue a re-announcement of the whole table (route refresh, or
    /// re-establishment after a graceful restart).
    pub fn refresh(&mut self) {
        for (key, (nlri, attrs)) in self.advertised.iter() {
            self.pending_announce
                .insert(key.clone(), (nlri.clone(), attrs.clone()));
        }
    }

    /// Serialise everything pending into size-bounded UPDATEs.
    /// Withdraws go first so a withdraw-then-announce for the same key
    /// keeps its meaning across packing.
    pub fn flush(&mut self, afi_safi: AfiSafi, ctx: &EncodeCtx) -> Vec<UpdatePacket> {
        let mut updates = Vec::new();
        self.flush_withdraws(afi_safi, ctx, &mut updates);
        self.flush_announces(afi_safi, ctx, &mut updates);
        updates
    }

    fn flush_withdraws(
        &mut self,
        afi_safi: AfiSafi,
        ctx: &EncodeCtx,
        updates: &mut Vec<UpdatePacket>,
    ) {
        if self.pending_withdraw.is_empty() {
            return;
        }
        let v4u = afi_safi == AfiSafi::new(Afi::Ip, Safi::Unicast);
        // Header, withdrawn length, attribute length.
        let base = 23;
        // MP_UNREACH header: attribute header plus AFI/SAFI.
        let mp_base = base + 4 + 3;

        let pending = std::mem::take(&mut self.pending_withdraw);
        let mut packet = UpdatePacket::new();
        let mut size = if v4u { base } else { mp_base };
        for (key, nlri) in pending {
            let nlri = withdraw_form(nlri);
            let nlri_len = nlri.encoded_len(afi_safi);
            let occupied = !packet.withdraws.is_empty() || packet.mp_unreach.is_some();
            if occupied && size + nlri_len > ctx.max_size {
                updates.push(std::mem::take(&mut packet));
                size = if v4u { base } else { mp_base };
            }
            size += nlri_len;
            if v4u {
                if let MpNlri::Ipv4(nlri) = nlri {
                    packet.withdraws.push(nlri);
                }
            } else {
                packet
                    .mp_unreach
                    .get_or_insert_with(|| MpUnreachAttr::new(afi_safi))
                    .nlris
                    .push(nlri);
            }
            self.advertised.remove(&key);
        }
        if !packet.withdraws.is_empty() || packet.mp_unreach.is_some() {
            updates.push(packet);
        }
    }

    fn flush_announces(
        &mut self,
        afi_safi: AfiSafi,
        ctx: &EncodeCtx,
        updates: &mut Vec<UpdatePacket>,
    ) {
        if self.pending_announce.is_empty() {
            return;
        }
        let v4u = afi_safi == AfiSafi::new(Afi::Ip, Safi::Unicast);

        // Batch pending routes by attribute identity, preserving key
        // order within each batch.
        let pending = std::mem::take(&mut self.pending_announce);
        let mut batches: Vec<(Arc<Attrs>, Vec<(RouteKey, MpNlri)>)> = Vec::new();
        let mut index: HashMap<Arc<Attrs>, usize> = HashMap::new();
        for (key, (nlri, attrs)) in pending {
            match index.get(&attrs) {
                Some(pos) => batches[*pos].1.push((key, nlri)),
                None => {
                    index.insert(attrs.clone(), batches.len());
                    batches.push((attrs, vec![(key, nlri)]));
                }
            }
        }

        for (attrs, routes) in batches {
            let attr_len = attrs.encoded_len(ctx.as4, v4u);
            let base = if v4u {
                23 + attr_len
            } else {
                // MP_REACH header: attribute header, AFI/SAFI, next-hop
                // with length byte, SNPA.
                let nexthop_len = mp_nexthop(afi_safi, &attrs).wire_len();
                23 + attr_len + 4 + 3 + 1 + nexthop_len + 1
            };

            let mut packet = announce_packet(afi_safi, &attrs, v4u);
            let mut size = base;
            let mut occupied = false;
            for (key, nlri) in routes {
                let nlri_len = nlri.encoded_len(afi_safi);
                if occupied && size + nlri_len > ctx.max_size {
                    updates.push(std::mem::replace(
                        &mut packet,
                        announce_packet(afi_safi, &attrs, v4u),
                    ));
                    size = base;
                    occupied = false;
                }
                size += nlri_len;
                occupied = true;
                self.advertised
                    .insert(key, (nlri.clone(), attrs.clone()));
                if v4u {
                    if let MpNlri::Ipv4(nlri) = nlri {
                        packet.updates.push(nlri);
                    }
                } else if let Some(mp_reach) = packet.mp_reach.as_mut() {
                    mp_reach.nlris.push(nlri);
                }
            }
            updates.push(packet);
        }
    }
}

fn mp_nexthop(afi_safi: AfiSafi, attrs: &Attrs) -> MpNexthop {
    match attrs.nexthop {
        Some(addr) => MpNexthop::for_family(afi_safi, addr),
        None => MpNexthop::None,
    }
}

fn announce_packet(afi_safi: AfiSafi, attrs: &Arc<Attrs>, v4u: bool) -> UpdatePacket {
    let mut packet = UpdatePacket::new();
    packet.attrs = Some((**attrs).clone());
    if !v4u {
        packet.mp_reach = Some(MpReachAttr::new(afi_safi, mp_nexthop(afi_safi, attrs)));
    }
    packet
}

/// Labeled and VPN withdraws carry the RFC 3107 compatibility label in
/// place of the stack that was announced.
fn withdraw_form(nlri: MpNlri) -> MpNlri {
    match nlri {
        MpNlri::Labeled(mut nlri) => {
            nlri.labels = vec![WITHDRAW_LABEL];
            MpNlri::Labeled(nlri)
        }
        MpNlri::Vpn(mut nlri) => {
            nlri.labels = vec![WITHDRAW_LABEL];
            MpNlri::Vpn(nlri)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgp_wire::{AsPath, Ipv4Nlri, Label, VpnNlri};
    use std::net::IpAddr;

    const V4U: AfiSafi = AfiSafi {
        afi: Afi::Ip,
        safi: Safi::Unicast,
    };

    fn ctx() -> EncodeCtx {
        EncodeCtx {
            as4: true,
            max_size: 4096,
        }
    }

    fn attrs(nexthop: &str) -> Arc<Attrs> {
        let mut attrs = Attrs::new();
        attrs.aspath = Some(AsPath::sequence(vec![65001]));
        attrs.nexthop = Some(nexthop.parse::<IpAddr>().unwrap());
        Arc::new(attrs)
    }

    fn v4(prefix: &str) -> MpNlri {
        MpNlri::Ipv4(Ipv4Nlri::new(prefix.parse().unwrap()))
    }

    fn change(prefix: &str, attrs: &Arc<Attrs>) -> Change {
        Change::announce(V4U, v4(prefix), attrs.clone())
    }

    fn family(adj: &mut AdjOut) -> &mut FamilyOut {
        adj.get_mut(&V4U).unwrap()
    }

    #[test]
    fn announce_then_withdraw_two_updates() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");

        adj.ingest(&change("10.0.0.0/24", &attrs));
        let first = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].updates.len(), 1);
        assert!(first[0].withdraws.is_empty());

        adj.ingest(&Change::withdraw(V4U, v4("10.0.0.0/24")));
        let second = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(second.len(), 1);
        assert!(second[0].updates.is_empty());
        assert_eq!(second[0].withdraws.len(), 1);
        assert_eq!(
            second[0].withdraws[0].prefix,
            "10.0.0.0/24".parse().unwrap()
        );
        assert_eq!(family(&mut adj).count(), 0);
    }

    #[test]
    fn reannounce_same_attrs_is_silent() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");

        adj.ingest(&change("10.0.0.0/24", &attrs));
        family(&mut adj).flush(V4U, &ctx());

        adj.ingest(&change("10.0.0.0/24", &attrs));
        assert!(!adj.has_pending());

        // New attributes replace the entry.
        let replaced = attrs_with_med();
        adj.ingest(&change("10.0.0.0/24", &replaced));
        let updates = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(updates.len(), 1);
        assert_eq!(family(&mut adj).count(), 1);
    }

    fn attrs_with_med() -> Arc<Attrs> {
        let mut attrs = Attrs::new();
        attrs.aspath = Some(AsPath::sequence(vec![65001]));
        attrs.nexthop = Some("192.0.2.1".parse::<IpAddr>().unwrap());
        attrs.med = Some(bgp_wire::Med::new(50));
        Arc::new(attrs)
    }

    #[test]
    fn withdraw_of_unknown_route_suppressed() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        adj.ingest(&Change::withdraw(V4U, v4("10.9.0.0/16")));
        assert!(!adj.has_pending());

        let mut adj = AdjOut::default();
        adj.enable(V4U, true); // send-all-withdraws
        adj.ingest(&Change::withdraw(V4U, v4("10.9.0.0/16")));
        assert!(adj.has_pending());
    }

    #[test]
    fn withdraw_cancels_unsent_announce() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");
        adj.ingest(&change("10.0.0.0/24", &attrs));
        adj.ingest(&Change::withdraw(V4U, v4("10.0.0.0/24")));
        assert!(!adj.has_pending());
    }

    #[test]
    fn withdraw_precedes_replacement_announce() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");
        adj.ingest(&change("10.0.0.0/24", &attrs));
        family(&mut adj).flush(V4U, &ctx());

        adj.ingest(&Change::withdraw(V4U, v4("10.0.0.0/24")));
        adj.ingest(&change("10.0.0.0/24", &attrs));
        let updates = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].withdraws.len(), 1);
        assert_eq!(updates[1].updates.len(), 1);
    }

    #[test]
    fn shared_attrs_pack_into_one_update() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let shared = attrs("192.0.2.1");
        let other = attrs("192.0.2.2");

        adj.ingest(&change("10.0.0.0/24", &shared));
        adj.ingest(&change("10.0.1.0/24", &shared));
        adj.ingest(&change("10.0.2.0/24", &other));
        let updates = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(updates.len(), 2);
        let sizes: Vec<usize> = updates.iter().map(|u| u.updates.len()).collect();
        assert!(sizes.contains(&2));
        assert!(sizes.contains(&1));
    }

    #[test]
    fn updates_respect_max_message_size() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");
        for i in 0..1500u32 {
            let prefix = format!("10.{}.{}.0/24", i / 256, i % 256);
            adj.ingest(&change(&prefix, &attrs));
        }
        let updates = family(&mut adj).flush(V4U, &ctx());
        assert!(updates.len() > 1);
        for update in updates {
            let bytes = update.emit(true);
            assert!(bytes.len() <= 4096);
        }
        assert_eq!(family(&mut adj).count(), 1500);
    }

    #[test]
    fn refresh_reemits_advertised_table() {
        let mut adj = AdjOut::default();
        adj.enable(V4U, false);
        let attrs = attrs("192.0.2.1");
        adj.ingest(&change("10.0.0.0/24", &attrs));
        adj.ingest(&change("10.0.1.0/24", &attrs));
        family(&mut adj).flush(V4U, &ctx());
        assert!(!adj.has_pending());

        family(&mut adj).refresh();
        let updates = family(&mut adj).flush(V4U, &ctx());
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].updates.len(), 2);
    }

    #[test]
    fn vpn_withdraw_uses_dummy_label() {
        let vpn = AfiSafi::new(Afi::Ip, Safi::MplsVpn);
        let mut adj = AdjOut::default();
        adj.enable(vpn, false);
        let nlri = MpNlri::Vpn(VpnNlri::new(
            vec![Label::new(16, 0, true)],
            "65000:1".parse().unwrap(),
            "10.1.0.0/24".parse().unwrap(),
        ));
        adj.ingest(&Change::announce(vpn, nlri.clone(), attrs("192.0.2.1")));
        adj.get_mut(&vpn).unwrap().flush(vpn, &ctx());

        adj.ingest(&Change::withdraw(vpn, nlri));
        let updates = adj.get_mut(&vpn).unwrap().flush(vpn, &ctx());
        assert_eq!(updates.len(), 1);
        let unreach = updates[0].mp_unreach.as_ref().unwrap();
        let MpNlri::Vpn(withdrawn) = &unreach.nlris[0] else {
            panic!("withdraw must be VPN NLRI");
        };
        assert!(withdrawn.labels[0].is_withdraw_dummy());
    }
}

