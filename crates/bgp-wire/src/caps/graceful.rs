use std::fmt;

use bitfield_struct::bitfield;
use bytes::{BufMut, BytesMut};
use nom_derive::*;
use serde::{Deserialize, Serialize};

use crate::{Afi, Safi};

use super::{CapCode, CapEmit};

// Graceful restart capability (RFC 4724 §3): one Restart Flags /
// Restart Time word, then a 4-byte (AFI, SAFI, Flags) tuple per
// preserved family.

#[bitfield(u16, debug = true)]
#[derive(Serialize, Deserialize, PartialEq, NomBE)]
pub struct RestartFlagTime {
    #[bits(12)]
    pub restart_time: u16,
    #[bits(2)]
    pub resvd: u8,
    pub n_flag: bool,
    pub r_flag: bool,
}

#[bitfield(u8, debug = true)]
#[derive(Serialize, Deserialize, PartialEq, NomBE)]
pub struct RestartFlags {
    #[bits(7)]
    pub resvd: u8,
    pub f_flag: bool,
}

#[derive(Debug, PartialEq, Clone, NomBE)]
pub struct RestartValue {
    pub afi: Afi,
    pub safi: Safi,
    pub flags: RestartFlags,
}

impl RestartValue {
    pub fn new(afi: Afi, safi: Safi) -> Self {
        Self {
            afi,
            safi,
            flags: RestartFlags::default(),
        }
    }
}

#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapRestart {
    pub flag_time: RestartFlagTime,
    pub values: Vec<RestartValue>,
}

impl CapRestart {
    pub fn new(restart_time: u16) -> Self {
        Self {
            flag_time: RestartFlagTime::new().with_restart_time(restart_time),
            values: Vec::new(),
        }
    }

    pub fn restart_time(&self) -> u16 {
        self.flag_time.restart_time()
    }
}

impl CapEmit for CapRestart {
    fn code(&self) -> CapCode {
        CapCode::GracefulRestart
    }

    fn len(&self) -> u8 {
        (2 + self.values.len() * 4) as u8
    }

    fn emit_value(&self, buf: &mut BytesMut) {
        buf.put_u16(self.flag_time.into());
        for value in self.values.iter() {
            buf.put_u16(value.afi.into());
            buf.put_u8(value.safi.into());
            buf.put_u8(value.flags.into());
        }
    }
}

impl fmt::Display for CapRestart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GracefulRestart: restart time:{} R:{}",
            self.restart_time(),
            self.flag_time.r_flag(),
        )?;
        for value in self.values.iter() {
            write!(f, " {}/{}", value.afi, value.safi)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_layout() {
        let mut cap = CapRestart::new(120);
        cap.values.push(RestartValue::new(Afi::Ip, Safi::Unicast));
        let mut buf = BytesMut::new();
        cap.emit(&mut buf);
        // param type/len, cap code 64, cap len 6, word 0x0078, tuple.
        assert_eq!(&buf[..], &[2, 8, 64, 6, 0x00, 0x78, 0x00, 0x01, 0x01, 0x00]);
    }
}
