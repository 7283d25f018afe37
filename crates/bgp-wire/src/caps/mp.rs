use std::fmt;

use bytes::{BufMut, BytesMut};
use nom_derive::*;
use serde::Serialize;

use super::{CapCode, CapEmit};
use crate::{Afi, AfiSafi, Safi};

/// Multiprotocol capability (RFC 4760 §8): one advertised family.  A
/// family is live on the session only when both OPENs carried it.
#[derive(Debug, PartialEq, NomBE, Clone, Eq, Hash, Serialize)]
pub struct CapMultiProtocol {
    pub afi: Afi,
    res: u8,
    pub safi: Safi,
}

impl CapMultiProtocol {
    pub fn afi_safi(&self) -> AfiSafi {
        AfiSafi::new(self.afi, self.safi)
    }
}

impl From<AfiSafi> for CapMultiProtocol {
    fn from(afi_safi: AfiSafi) -> Self {
        Self {
            afi: afi_safi.afi,
            res: 0,
            safi: afi_safi.safi,
        }
    }
}

impl CapEmit for CapMultiProtocol {
    fn code(&self) -> CapCode {
        CapCode::MultiProtocol
    }

    fn len(&self) -> u8 {
        4
    }

    fn emit_value(&self, buf: &mut BytesMut) {
        buf.put_u16(self.afi.into());
        buf.put_u8(0);
        buf.put_u8(self.safi.into());
    }
}

impl fmt::Display for CapMultiProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiProtocol: {}/{}", self.afi, self.safi)
    }
}
