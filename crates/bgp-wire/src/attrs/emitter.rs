use bytes::{BufMut, BytesMut};

use crate::{AttrFlags, AttrType};

/// Wire rendering of one path attribute: flags, type code, length,
/// payload.  Implementations with a fixed-size payload report it via
/// `len()` and are written straight through; variable-sized ones
/// return `None` and are buffered once to learn their length.
pub trait AttrEmitter {
    fn attr_flags(&self) -> AttrFlags;

    fn attr_type(&self) -> AttrType;

    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    fn emit(&self, buf: &mut BytesMut);

    fn attr_emit(&self, buf: &mut BytesMut) {
        match self.len() {
            Some(len) => {
                self.emit_header(buf, len);
                self.emit(buf);
            }
            None => {
                let mut payload = BytesMut::new();
                self.emit(&mut payload);
                self.emit_header(buf, payload.len());
                buf.put(&payload[..]);
            }
        }
    }

    /// The extended-length bit follows from the payload size alone.
    fn emit_header(&self, buf: &mut BytesMut, len: usize) {
        if len > 255 {
            buf.put_u8(self.attr_flags().with_extended(true).into());
            buf.put_u8(self.attr_type().into());
            buf.put_u16(len as u16);
        } else {
            buf.put_u8(self.attr_flags().into());
            buf.put_u8(self.attr_type().into());
            buf.put_u8(len as u8);
        }
    }
}
