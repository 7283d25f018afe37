use std::fmt;

use bytes::{BufMut, BytesMut};
use nom_derive::*;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::{CapCode, CapEmit};
use crate::afi::wire_code;
use crate::{Afi, Safi};

/// Add-path capability (RFC 7911): per-family send/receive offers.
#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapAddPath {
    pub values: Vec<AddPathValue>,
}

#[derive(Debug, PartialEq, NomBE, Clone, Ord, PartialOrd, Eq)]
pub struct AddPathValue {
    pub afi: Afi,
    pub safi: Safi,
    pub direction: AddPathDirection,
}

#[repr(u8)]
#[derive(
    Debug, Clone, PartialEq, Copy, Ord, PartialOrd, Eq, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AddPathDirection {
    Receive = 1,
    Send = 2,
    #[strum(serialize = "send-receive")]
    #[serde(rename = "send-receive")]
    SendReceive = 3,
    #[strum(to_string = "unknown({0})")]
    #[serde(skip)]
    Unknown(u8),
}

wire_code!(AddPathDirection: u8, nom::number::complete::be_u8, {
    Receive = 1,
    Send = 2,
    SendReceive = 3,
});

impl AddPathDirection {
    pub fn is_receive(&self) -> bool {
        matches!(self, Self::Receive | Self::SendReceive)
    }

    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send | Self::SendReceive)
    }
}

impl CapEmit for CapAddPath {
    fn code(&self) -> CapCode {
        CapCode::AddPath
    }

    fn len(&self) -> u8 {
        (self.values.len() * 4) as u8
    }

    fn emit_value(&self, buf: &mut BytesMut) {
        for val in self.values.iter() {
            buf.put_u16(val.afi.into());
            buf.put_u8(val.safi.into());
            buf.put_u8(val.direction.into());
        }
    }
}

impl fmt::Display for CapAddPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AddPath:")?;
        for value in self.values.iter() {
            write!(f, " {}/{}: {}", value.afi, value.safi, value.direction)?;
        }
        Ok(())
    }
}
