use bytes::BytesMut;

use crate::{BGP_HEADER_LEN, BGP_PACKET_LEN, WireError, peek_bgp_length};

/// Streaming message framer.  Feed raw TCP bytes in, pull complete
/// messages out; a partial trailing message is retained for the next
/// read.  Header validation (marker, length bounds, message type)
/// happens here so the per-message parsers can assume a sane frame.
pub struct Framer {
    buf: BytesMut,
    max_len: usize,
}

impl Framer {
    pub fn new() -> Self {
        Self::with_max_len(BGP_PACKET_LEN)
    }

    /// `max_len` is the negotiated maximum message size: 4096 by
    /// default, 65535 once the extended-message capability is active.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_len * 2),
            max_len,
        }
    }

    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
    }

    pub fn input(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Pop the next complete message frame, header included.
    pub fn next_frame(&mut self) -> Result<Option<BytesMut>, WireError> {
        if self.buf.len() < BGP_HEADER_LEN as usize {
            return Ok(None);
        }
        if self.buf[0..16].iter().any(|b| *b != 0xff) {
            return Err(WireError::BadMarker);
        }
        let length = peek_bgp_length(&self.buf);
        if length < BGP_HEADER_LEN as usize || length > self.max_len {
            return Err(WireError::BadLength {
                length: length as u16,
            });
        }
        let typ = self.buf[18];
        if !(1..=5).contains(&typ) {
            return Err(WireError::UnknownType { typ });
        }
        if self.buf.len() < length {
            return Ok(None);
        }
        Ok(Some(self.buf.split_to(length)))
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keepalive_packet;

    #[test]
    fn frame_reassembly() {
        let keepalive = keepalive_packet();
        let mut framer = Framer::new();

        // First half of the message: nothing to pop yet.
        framer.input(&keepalive[..10]);
        assert!(framer.next_frame().unwrap().is_none());

        // Remainder plus the start of a second message.
        framer.input(&keepalive[10..]);
        framer.input(&keepalive[..5]);
        let frame = framer.next_frame().unwrap().unwrap();
        assert_eq!(&frame[..], &keepalive[..]);
        assert!(framer.next_frame().unwrap().is_none());
        assert_eq!(framer.buffered(), 5);
    }

    #[test]
    fn bad_marker() {
        let mut bytes = keepalive_packet();
        bytes[3] = 0;
        let mut framer = Framer::new();
        framer.input(&bytes);
        assert!(matches!(framer.next_frame(), Err(WireError::BadMarker)));
    }

    #[test]
    fn bad_length() {
        let mut bytes = keepalive_packet();
        bytes[16] = 0;
        bytes[17] = 18; // below the header length
        let mut framer = Framer::new();
        framer.input(&bytes);
        assert!(matches!(
            framer.next_frame(),
            Err(WireError::BadLength { length: 18 })
        ));
    }

    #[test]
    fn unknown_type() {
        let mut bytes = keepalive_packet();
        bytes[18] = 9;
        let mut framer = Framer::new();
        framer.input(&bytes);
        assert!(matches!(
            framer.next_frame(),
            Err(WireError::UnknownType { typ: 9 })
        ));
    }
}
