use std::fmt;

use bytes::{BufMut, BytesMut};
use nom_derive::*;

use crate::{AttrEmitter, AttrFlags, AttrType};

/// LOCAL_PREF: well-known 32-bit preference, conventionally 100.
#[derive(Clone, NomBE, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPref(pub u32);

impl LocalPref {
    pub fn new(local_pref: u32) -> Self {
        Self(local_pref)
    }
}

impl Default for LocalPref {
    fn default() -> Self {
        Self(100)
    }
}

impl AttrEmitter for LocalPref {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::LocalPref
    }

    fn len(&self) -> Option<usize> {
        Some(4)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u32(self.0);
    }
}

impl fmt::Display for LocalPref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for LocalPref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalPref: {}", self.0)
    }
}
