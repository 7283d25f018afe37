use std::fmt;

use bitfield_struct::bitfield;
use bitflags::bitflags;
use serde::Serialize;

use crate::AttrType;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct AttributeFlags: u8 {
        const OPTIONAL = 0x80;
        const TRANSITIVE = 0x40;
        const PARTIAL = 0x20;
        const EXTENDED = 0x10;
    }
}

impl AttributeFlags {
    pub fn is_optional(&self) -> bool {
        self.contains(AttributeFlags::OPTIONAL)
    }

    pub fn is_transitive(&self) -> bool {
        self.contains(AttributeFlags::TRANSITIVE)
    }

    pub fn is_extended(&self) -> bool {
        self.contains(AttributeFlags::EXTENDED)
    }
}

/// Per-type flag constraint (RFC 4271 §5).  The partial and
/// extended-length bits are free; optional/transitive must match the
/// attribute's category.
pub fn flags_valid(attr_type: AttrType, flags: &AttributeFlags) -> bool {
    use AttrType::*;
    let optional = flags.is_optional();
    let transitive = flags.is_transitive();
    match attr_type {
        Origin | AsPath | NextHop | LocalPref | AtomicAggregate => !optional && transitive,
        Med | OriginatorId | ClusterList | MpReachNlri | MpUnreachNlri => optional && !transitive,
        Aggregator | Community | ExtendedCom | As4Path | As4Aggregator | PmsiTunnel | LargeCom => {
            optional && transitive
        }
        Unknown(_) => true,
    }
}

impl fmt::Display for AttributeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut v: Vec<&str> = Vec::new();
        if self.contains(AttributeFlags::OPTIONAL) {
            v.push("OPTIONAL");
        }
        if self.contains(AttributeFlags::TRANSITIVE) {
            v.push("TRANSITIVE");
        }
        if self.contains(AttributeFlags::PARTIAL) {
            v.push("PARTIAL");
        }
        if self.contains(AttributeFlags::EXTENDED) {
            v.push("EXTENDED");
        }
        write!(f, "{}", v.join("|"))
    }
}

/// Emit-side view of the same byte.
#[bitfield(u8, debug = true)]
#[derive(Serialize, PartialEq)]
pub struct AttrFlags {
    #[bits(4)]
    pub resvd: u8,
    pub extended: bool,
    pub partial: bool,
    pub transitive: bool,
    pub optional: bool,
}
