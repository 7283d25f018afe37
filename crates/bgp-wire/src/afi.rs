use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Conversions and a `parse_be` for a wire enum with an `Unknown`
/// catch-all: one table drives both directions.
macro_rules! wire_code {
    ($name:ident : $repr:ty, $reader:path, { $($variant:ident = $value:literal),+ $(,)? }) => {
        wire_code!($name : $repr, { $($variant = $value),+ });

        impl $name {
            pub fn parse_be(input: &[u8]) -> nom::IResult<&[u8], Self> {
                let (input, value) = $reader(input)?;
                Ok((input, value.into()))
            }
        }
    };
    ($name:ident : $repr:ty, { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $value,)+
                    $name::Unknown(code) => code,
                }
            }
        }

        impl From<$repr> for $name {
            fn from(code: $repr) -> Self {
                match code {
                    $($value => $name::$variant,)+
                    code => $name::Unknown(code),
                }
            }
        }
    };
}

pub(crate) use wire_code;

#[repr(u16)]
#[derive(
    Debug, Default, PartialEq, Eq, Ord, PartialOrd, Clone, Copy, Hash, Serialize, Deserialize,
    Display,
)]
pub enum Afi {
    #[default]
    #[strum(serialize = "IPv4")]
    Ip = 1,
    #[strum(serialize = "IPv6")]
    Ip6 = 2,
    #[strum(serialize = "L2VPN")]
    L2vpn = 25,
    #[strum(to_string = "Unknown({0})")]
    Unknown(u16),
}

wire_code!(Afi: u16, nom::number::complete::be_u16, {
    Ip = 1,
    Ip6 = 2,
    L2vpn = 25,
});

#[repr(u8)]
#[derive(
    Debug, Default, PartialEq, Eq, Ord, PartialOrd, Clone, Copy, Hash, Serialize, Deserialize,
    Display,
)]
pub enum Safi {
    #[default]
    Unicast = 1,
    Multicast = 2,
    #[strum(serialize = "Labeled Unicast")]
    MplsLabel = 4,
    #[strum(serialize = "EVPN")]
    Evpn = 70,
    #[strum(serialize = "MPLS VPN")]
    MplsVpn = 128,
    Flowspec = 133,
    #[strum(serialize = "Flowspec VPN")]
    FlowspecVpn = 134,
    #[strum(to_string = "Unknown({0})")]
    Unknown(u8),
}

wire_code!(Safi: u8, nom::number::complete::be_u8, {
    Unicast = 1,
    Multicast = 2,
    MplsLabel = 4,
    Evpn = 70,
    MplsVpn = 128,
    Flowspec = 133,
    FlowspecVpn = 134,
});

/// One routing topology.  Ordered so it can key the per-family tables
/// throughout the speaker.
#[derive(Debug, Default, PartialEq, Eq, Ord, PartialOrd, Clone, Copy, Hash)]
pub struct AfiSafi {
    pub afi: Afi,
    pub safi: Safi,
}

impl AfiSafi {
    pub fn new(afi: Afi, safi: Safi) -> Self {
        Self { afi, safi }
    }

    /// Families whose NLRI carries a label stack on the wire.
    pub fn is_labeled(&self) -> bool {
        matches!(self.safi, Safi::MplsLabel | Safi::MplsVpn)
    }

    /// Families whose NLRI carries a route distinguisher.
    pub fn has_rd(&self) -> bool {
        matches!(self.safi, Safi::MplsVpn | Safi::FlowspecVpn)
    }
}

impl std::fmt::Display for AfiSafi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.afi, self.safi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in [1u8, 2, 4, 70, 128, 133, 134, 200] {
            assert_eq!(u8::from(Safi::from(code)), code);
        }
        assert_eq!(Afi::from(25u16), Afi::L2vpn);
        assert_eq!(Afi::from(999u16), Afi::Unknown(999));
    }
}
