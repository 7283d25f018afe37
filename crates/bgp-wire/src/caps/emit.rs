use bytes::{BufMut, BytesMut};

use super::CapCode;

/// RFC 5492 optional parameter type carrying capabilities.
const PARAM_CAPABILITY: u8 = 2;

/// Wire rendering of one capability.  Each capability goes out wrapped
/// in its own optional parameter, the one-per-parameter layout every
/// implementation accepts.
pub trait CapEmit {
    fn code(&self) -> CapCode;

    fn len(&self) -> u8 {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn emit_value(&self, _buf: &mut BytesMut) {}

    fn emit(&self, buf: &mut BytesMut) {
        buf.put_u8(PARAM_CAPABILITY);
        buf.put_u8(self.len() + 2);
        buf.put_u8(self.code().into());
        buf.put_u8(self.len());
        self.emit_value(buf);
    }
}
