use std::fmt;

use nom_derive::*;

use super::{CapCode, CapEmit};

/// Route refresh capability (RFC 2918).  Zero-length; advertising it
/// is the whole statement.
#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapRefresh {}

impl CapEmit for CapRefresh {
    fn code(&self) -> CapCode {
        CapCode::RouteRefresh
    }
}

impl fmt::Display for CapRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route Refresh")
    }
}

/// Enhanced route refresh (RFC 7313) adds the begin/end demarcation
/// subtypes to the refresh exchange.
#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapEnhancedRefresh {}

impl CapEmit for CapEnhancedRefresh {
    fn code(&self) -> CapCode {
        CapCode::EnhancedRouteRefresh
    }
}

impl fmt::Display for CapEnhancedRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enhanced Route Refresh")
    }
}
