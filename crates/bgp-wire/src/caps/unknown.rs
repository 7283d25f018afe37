use std::fmt;

use bytes::{BufMut, BytesMut};

use super::{CapCode, CapEmit};

/// Capability we do not implement, kept as raw bytes for display and
/// diagnostics.  Ignored during negotiation (RFC 5492).
#[derive(Debug, Default, PartialEq, Clone)]
pub struct CapUnknown {
    pub code: u8,
    pub data: Vec<u8>,
}

impl CapEmit for CapUnknown {
    fn code(&self) -> CapCode {
        CapCode::Unknown(self.code)
    }

    fn len(&self) -> u8 {
        self.data.len() as u8
    }

    fn emit_value(&self, buf: &mut BytesMut) {
        buf.put(&self.data[..]);
    }
}

impl fmt::Display for CapUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown: Code {}", self.code)
    }
}
