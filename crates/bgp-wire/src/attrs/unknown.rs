use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::AttributeFlags;

/// Attribute with a type code we do not implement.  Optional transitive
/// ones are carried through verbatim with the partial bit set on
/// re-encode; everything else is dropped at parse time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnknownAttr {
    pub type_code: u8,
    pub flags: u8,
    pub data: Vec<u8>,
}

impl UnknownAttr {
    pub fn is_optional(&self) -> bool {
        self.flags & AttributeFlags::OPTIONAL.bits() != 0
    }

    pub fn is_transitive(&self) -> bool {
        self.flags & AttributeFlags::TRANSITIVE.bits() != 0
    }

    pub fn attr_emit(&self, buf: &mut BytesMut) {
        let mut flags = self.flags | AttributeFlags::PARTIAL.bits();
        let extended = self.data.len() > 255;
        if extended {
            flags |= AttributeFlags::EXTENDED.bits();
        } else {
            flags &= !AttributeFlags::EXTENDED.bits();
        }
        buf.put_u8(flags);
        buf.put_u8(self.type_code);
        if extended {
            buf.put_u16(self.data.len() as u16);
        } else {
            buf.put_u8(self.data.len() as u8);
        }
        buf.put(&self.data[..]);
    }
}

impl fmt::Display for UnknownAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute {} ({} bytes)", self.type_code, self.data.len())
    }
}
