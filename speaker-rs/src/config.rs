use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use anyhow::{Context, Result, bail};
use bgp_wire::{AddPathDirection, Afi, AfiSafi, Safi};
use serde::{Deserialize, Serialize};

use crate::bgp::debug::DebugFlags;

/// Address family names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    Ipv4Unicast,
    Ipv4Multicast,
    Ipv4LabeledUnicast,
    Ipv4MplsVpn,
    Ipv4Flowspec,
    Ipv4FlowspecVpn,
    Ipv6Unicast,
    Ipv6Multicast,
    Ipv6LabeledUnicast,
    Ipv6MplsVpn,
    Ipv6Flowspec,
    Ipv6FlowspecVpn,
}

impl From<Family> for AfiSafi {
    fn from(family: Family) -> Self {
        use Family::*;
        let (afi, safi) = match family {
            Ipv4Unicast => (Afi::Ip, Safi::Unicast),
            Ipv4Multicast => (Afi::Ip, Safi::Multicast),
            Ipv4LabeledUnicast => (Afi::Ip, Safi::MplsLabel),
            Ipv4MplsVpn => (Afi::Ip, Safi::MplsVpn),
            Ipv4Flowspec => (Afi::Ip, Safi::Flowspec),
            Ipv4FlowspecVpn => (Afi::Ip, Safi::FlowspecVpn),
            Ipv6Unicast => (Afi::Ip6, Safi::Unicast),
            Ipv6Multicast => (Afi::Ip6, Safi::Multicast),
            Ipv6LabeledUnicast => (Afi::Ip6, Safi::MplsLabel),
            Ipv6MplsVpn => (Afi::Ip6, Safi::MplsVpn),
            Ipv6Flowspec => (Afi::Ip6, Safi::Flowspec),
            Ipv6FlowspecVpn => (Afi::Ip6, Safi::FlowspecVpn),
        };
        AfiSafi::new(afi, safi)
    }
}

fn default_true() -> bool {
    true
}

fn default_families() -> Vec<Family> {
    vec![Family::Ipv4Unicast]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NeighborConfig {
    pub address: IpAddr,
    pub remote_asn: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub passive: bool,
    #[serde(default)]
    pub hold_time: Option<u16>,
    #[serde(default)]
    pub connect_retry_time: Option<u16>,
    #[serde(default = "default_families")]
    pub families: Vec<Family>,
    #[serde(default)]
    pub add_path: std::collections::BTreeMap<Family, AddPathDirection>,
    #[serde(default = "default_true")]
    pub route_refresh: bool,
    #[serde(default)]
    pub enhanced_route_refresh: bool,
    #[serde(default)]
    pub extended_message: bool,
    #[serde(default)]
    pub graceful_restart: Option<u16>,
    #[serde(default)]
    pub send_all_withdraws: bool,
    #[serde(default)]
    pub md5_password: Option<String>,
    #[serde(default)]
    pub ttl_security: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub asn: u32,
    pub router_id: Ipv4Addr,
    #[serde(default = "default_true")]
    pub listen: bool,
    #[serde(default)]
    pub pipe_prefix: Option<String>,
    #[serde(default)]
    pub debug: DebugFlags,
    #[serde(default)]
    pub neighbors: Vec<NeighborConfig>,
    /// Static announcements, in control-pipe command syntax.
    #[serde(default)]
    pub announce: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.asn == 0 {
            bail!("asn must be non-zero");
        }
        if self.router_id.is_unspecified() {
            bail!("router-id must be set");
        }
        for neighbor in self.neighbors.iter() {
            if neighbor.remote_asn == 0 {
                bail!("neighbor {}: remote-asn must be non-zero", neighbor.address);
            }
            if neighbor.families.is_empty() {
                bail!("neighbor {}: no families configured", neighbor.address);
            }
            if let Some(hold_time) = neighbor.hold_time
                && (hold_time == 1 || hold_time == 2)
            {
                bail!("neighbor {}: hold-time below 3", neighbor.address);
            }
            for family in neighbor.add_path.keys() {
                if !neighbor.families.contains(family) {
                    bail!(
                        "neighbor {}: add-path for unconfigured family",
                        neighbor.address
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config() {
        let config = parse(
            "
asn: 65001
router-id: 192.0.2.1
neighbors:
  - address: 192.0.2.2
    remote-asn: 65002
",
        )
        .unwrap();
        assert_eq!(config.asn, 65001);
        assert_eq!(config.neighbors.len(), 1);
        assert_eq!(config.neighbors[0].families, vec![Family::Ipv4Unicast]);
        assert!(config.neighbors[0].route_refresh);
    }

    #[test]
    fn full_neighbor() {
        let config = parse(
            "
asn: 65001
router-id: 192.0.2.1
neighbors:
  - address: 192.0.2.2
    remote-asn: 65002
    passive: true
    hold-time: 30
    families: [ipv4-unicast, ipv4-mpls-vpn, ipv4-flowspec]
    add-path:
      ipv4-unicast: send-receive
    graceful-restart: 120
    extended-message: true
    md5-password: secret
announce:
  - announce route 10.0.0.0/24 next-hop 192.0.2.1
",
        )
        .unwrap();
        let neighbor = &config.neighbors[0];
        assert!(neighbor.passive);
        assert_eq!(neighbor.hold_time, Some(30));
        assert_eq!(neighbor.families.len(), 3);
        assert_eq!(
            neighbor.add_path.get(&Family::Ipv4Unicast),
            Some(&AddPathDirection::SendReceive)
        );
        assert_eq!(config.announce.len(), 1);
    }

    #[test]
    fn semantic_errors() {
        assert!(parse("asn: 0\nrouter-id: 192.0.2.1\n").is_err());
        assert!(parse("asn: 65001\nrouter-id: 0.0.0.0\n").is_err());
        assert!(
            parse(
                "
asn: 65001
router-id: 192.0.2.1
neighbors:
  - address: 192.0.2.2
    remote-asn: 65002
    hold-time: 2
",
            )
            .is_err()
        );
    }
}
