use std::fmt;

use nom_derive::*;

use super::{CapCode, CapEmit};

/// Extended message capability (RFC 8654).  Both sides advertising it
/// raises the maximum message size from 4096 to 65535 bytes.
#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapExtended {}

impl CapEmit for CapExtended {
    fn code(&self) -> CapCode {
        CapCode::ExtendedMessage
    }
}

impl fmt::Display for CapExtended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extended Message")
    }
}
