use std::fmt;

use bytes::BytesMut;
use nom_derive::*;

use crate::{AttrEmitter, AttrFlags, AttrType};

/// ATOMIC_AGGREGATE: well-known, zero-length; presence is the value.
#[derive(Clone, Debug, Default, NomBE, PartialEq, Eq, Hash)]
pub struct AtomicAggregate {}

impl AttrEmitter for AtomicAggregate {
    fn attr_flags(&self) -> AttrFlags {
        AttrFlags::new().with_transitive(true)
    }

    fn attr_type(&self) -> AttrType {
        AttrType::AtomicAggregate
    }

    fn len(&self) -> Option<usize> {
        Some(0)
    }

    fn emit(&self, _buf: &mut BytesMut) {}
}

impl fmt::Display for AtomicAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atomic Aggregate")
    }
}
