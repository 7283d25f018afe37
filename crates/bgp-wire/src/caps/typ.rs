use crate::afi::wire_code;

/// Capability codes this speaker understands.  Anything else lands in
/// `Unknown` and is ignored during negotiation (RFC 5492).
#[repr(u8)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum CapCode {
    #[default]
    MultiProtocol = 1,
    RouteRefresh = 2,
    ExtendedMessage = 6,
    GracefulRestart = 64,
    As4 = 65,
    AddPath = 69,
    EnhancedRouteRefresh = 70,
    Unknown(u8),
}

wire_code!(CapCode: u8, nom::number::complete::be_u8, {
    MultiProtocol = 1,
    RouteRefresh = 2,
    ExtendedMessage = 6,
    GracefulRestart = 64,
    As4 = 65,
    AddPath = 69,
    EnhancedRouteRefresh = 70,
});
