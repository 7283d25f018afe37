use std::fmt;

use bytes::{BufMut, BytesMut};
use nom_derive::*;

use crate::{AttrEmitter, AttrFlags, AttrType};

/// MULTI_EXIT_DISC: optional non-transitive 32-bit metric.
#[derive(Clone, NomBE, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Med(pub u32);

impl Med {
    pub fn new(med: u32) -> Self {
        Self(med)
    }
}

impl AttrEmitter for Med {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_optional(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::Med
    }

    fn len(&self) -> Option<usize> {
        Some(4)
    }

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u32(self.0);
    }
}

impl fmt::Display for Med {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Med {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Med: {}", self.0)
    }
}
