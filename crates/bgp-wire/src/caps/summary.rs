use std::collections::BTreeMap;
use std::fmt;

use bytes::BytesMut;

use crate::{AddPathValue, AfiSafi, CapabilityPacket};

use super::{
    CapAddPath, CapAs4, CapEmit, CapEnhancedRefresh, CapExtended, CapMultiProtocol, CapRefresh,
    CapRestart, CapUnknown, RestartValue,
};

/// One side's advertised capability set, collapsed out of the OPEN
/// optional parameters for convenient lookup.  Negotiation of the
/// session view (intersection of two of these) lives with the peer.
#[derive(Default, Debug, PartialEq, Clone)]
pub struct Caps {
    pub mp: BTreeMap<AfiSafi, CapMultiProtocol>,
    pub refresh: Option<CapRefresh>,
    pub enhanced_refresh: Option<CapEnhancedRefresh>,
    pub extended: Option<CapExtended>,
    pub restart_time: Option<u16>,
    pub restart: BTreeMap<AfiSafi, RestartValue>,
    pub as4: Option<CapAs4>,
    pub addpath: BTreeMap<AfiSafi, AddPathValue>,
    pub unknown: Vec<CapUnknown>,
}

impl Caps {
    pub fn emit(&self, buf: &mut BytesMut) {
        for (_, v) in self.mp.iter() {
            v.emit(buf);
        }
        if let Some(v) = &self.refresh {
            v.emit(buf);
        }
        if let Some(v) = &self.enhanced_refresh {
            v.emit(buf);
        }
        if let Some(v) = &self.extended {
            v.emit(buf);
        }
        if let Some(restart_time) = self.restart_time {
            let mut v = CapRestart::new(restart_time);
            for (_, val) in self.restart.iter() {
                v.values.push(val.clone());
            }
            v.emit(buf);
        }
        if let Some(v) = &self.as4 {
            v.emit(buf);
        }
        if !self.addpath.is_empty() {
            let mut v = CapAddPath::default();
            for (_, val) in self.addpath.iter() {
                v.values.push(val.clone());
            }
            v.emit(buf);
        }
    }

    pub fn from(caps: Vec<Vec<CapabilityPacket>>) -> Self {
        let mut summary = Caps::default();
        for cap in caps.into_iter() {
            for c in cap.into_iter() {
                match c {
                    CapabilityPacket::MultiProtocol(v) => {
                        summary.mp.insert(v.afi_safi(), v);
                    }
                    CapabilityPacket::RouteRefresh(v) => {
                        summary.refresh = Some(v);
                    }
                    CapabilityPacket::EnhancedRouteRefresh(v) => {
                        summary.enhanced_refresh = Some(v);
                    }
                    CapabilityPacket::ExtendedMessage(v) => {
                        summary.extended = Some(v);
                    }
                    CapabilityPacket::GracefulRestart(v) => {
                        summary.restart_time = Some(v.restart_time());
                        for restart in v.values.into_iter() {
                            let key = AfiSafi::new(restart.afi, restart.safi);
                            summary.restart.insert(key, restart);
                        }
                    }
                    CapabilityPacket::As4(v) => {
                        summary.as4 = Some(v);
                    }
                    CapabilityPacket::AddPath(v) => {
                        for addpath in v.values.into_iter() {
                            let key = AfiSafi::new(addpath.afi, addpath.safi);
                            summary.addpath.insert(key, addpath);
                        }
                    }
                    CapabilityPacket::Unknown(v) => {
                        // Unknown capabilities never fail the session
                        // (RFC 5492); keep them for display only.
                        summary.unknown.push(v);
                    }
                }
            }
        }
        summary
    }
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, v) in self.mp.iter() {
            writeln!(f, " {}", v)?;
        }
        if let Some(v) = &self.refresh {
            writeln!(f, " {}", v)?;
        }
        if let Some(v) = &self.enhanced_refresh {
            writeln!(f, " {}", v)?;
        }
        if let Some(v) = &self.extended {
            writeln!(f, " {}", v)?;
        }
        if let Some(restart_time) = self.restart_time {
            let mut v = CapRestart::new(restart_time);
            for (_, val) in self.restart.iter() {
                v.values.push(val.clone());
            }
            writeln!(f, " {}", v)?;
        }
        if let Some(v) = &self.as4 {
            writeln!(f, " {}", v)?;
        }
        if !self.addpath.is_empty() {
            let mut v = CapAddPath::default();
            for (_, val) in self.addpath.iter() {
                v.values.push(val.clone());
            }
            writeln!(f, " {}", v)?;
        }
        for v in self.unknown.iter() {
            writeln!(f, " {}", v)?;
        }
        Ok(())
    }
}
