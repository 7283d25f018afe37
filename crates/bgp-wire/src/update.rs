use std::fmt;

use bytes::{BufMut, BytesMut};
use nom::number::complete::be_u16;
use nom_derive::*;

use crate::{
    AttrEmitter, Attrs, BGP_HEADER_LEN, BgpHeader, BgpType, Ipv4Nlri, MpReachAttr, MpUnreachAttr,
    ParseOption, WireError, parse_ipv4_nlri_field, parse_update_attrs,
};

/// UPDATE message.  The ipv4-unicast withdraws/announces live in the
/// message body; every other family travels inside the MP attributes.
pub struct UpdatePacket {
    pub header: BgpHeader,
    pub attrs: Option<Attrs>,
    pub withdraws: Vec<Ipv4Nlri>,
    pub updates: Vec<Ipv4Nlri>,
    pub mp_reach: Option<MpReachAttr>,
    pub mp_unreach: Option<MpUnreachAttr>,
}

impl UpdatePacket {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty UPDATE is the ipv4-unicast End-of-RIB marker
    /// (RFC 4724); an empty MP_UNREACH marks any other family.
    pub fn is_end_of_rib(&self) -> bool {
        if let Some(mp_unreach) = &self.mp_unreach {
            return mp_unreach.is_end_of_rib()
                && self.updates.is_empty()
                && self.withdraws.is_empty()
                && self.mp_reach.is_none();
        }
        self.attrs.is_none()
            && self.updates.is_empty()
            && self.withdraws.is_empty()
            && self.mp_reach.is_none()
    }

    pub fn parse_packet<'a>(
        input: &'a [u8],
        opt: &ParseOption,
    ) -> Result<(&'a [u8], UpdatePacket), WireError> {
        let as4 = opt.is_as4();
        let add_path = opt.is_add_path_recv(crate::Afi::Ip, crate::Safi::Unicast);

        let (input, header) = BgpHeader::parse_be(input).map_err(WireError::from)?;
        let mut packet = UpdatePacket {
            header,
            ..Default::default()
        };

        let (input, withdraw_len) = be_u16::<_, nom::error::Error<&[u8]>>(input)
            .map_err(WireError::from)?;
        let (input, mut withdraws) =
            parse_ipv4_nlri_field(input, withdraw_len, add_path).map_err(WireError::from)?;
        packet.withdraws.append(&mut withdraws);

        let (input, attr_len) = be_u16::<_, nom::error::Error<&[u8]>>(input)
            .map_err(WireError::from)?;
        let (input, attrs, mp_reach, mp_unreach) = if attr_len > 0 {
            parse_update_attrs(input, attr_len, as4, opt)?
        } else {
            (input, None, None, None)
        };
        packet.attrs = attrs;
        packet.mp_reach = mp_reach;
        packet.mp_unreach = mp_unreach;

        let nlri_len = packet
            .header
            .length
            .checked_sub(BGP_HEADER_LEN + 4)
            .and_then(|body| body.checked_sub(withdraw_len))
            .and_then(|body| body.checked_sub(attr_len))
            .ok_or(WireError::BadLength {
                length: packet.header.length,
            })?;
        let (input, mut updates) =
            parse_ipv4_nlri_field(input, nlri_len, add_path).map_err(WireError::from)?;
        packet.updates.append(&mut updates);

        Ok((input, packet))
    }

    /// Serialise; `as4` selects the AS number width negotiated for the
    /// session.
    pub fn emit(&self, as4: bool) -> BytesMut {
        let mut buf = BytesMut::new();
        let header: BytesMut = self.header.clone().into();
        buf.put(&header[..]);

        // Withdrawn routes.
        let withdraw_len_pos = buf.len();
        buf.put_u16(0u16); // Placeholder.
        for nlri in self.withdraws.iter() {
            nlri.emit(&mut buf);
        }
        let withdraw_len: u16 = (buf.len() - withdraw_len_pos - 2) as u16;
        buf[withdraw_len_pos..withdraw_len_pos + 2]
            .copy_from_slice(&withdraw_len.to_be_bytes());

        // Attributes.  The next-hop rides in MP_REACH when one is
        // present, as its own attribute otherwise.
        let attr_len_pos = buf.len();
        buf.put_u16(0u16); // Placeholder.
        if let Some(attrs) = &self.attrs {
            attrs.attr_emit(&mut buf, as4, self.mp_reach.is_none());
        }
        if let Some(mp_reach) = &self.mp_reach {
            mp_reach.attr_emit(&mut buf);
        }
        if let Some(mp_unreach) = &self.mp_unreach {
            mp_unreach.attr_emit(&mut buf);
        }
        let attr_len: u16 = (buf.len() - attr_len_pos - 2) as u16;
        buf[attr_len_pos..attr_len_pos + 2].copy_from_slice(&attr_len.to_be_bytes());

        // NLRI.
        for nlri in self.updates.iter() {
            nlri.emit(&mut buf);
        }

        const LENGTH_POS: std::ops::Range<usize> = 16..18;
        let length: u16 = buf.len() as u16;
        buf[LENGTH_POS].copy_from_slice(&length.to_be_bytes());

        buf
    }
}

impl Default for UpdatePacket {
    fn default() -> Self {
        Self {
            header: BgpHeader::new(BgpType::Update, BGP_HEADER_LEN),
            attrs: None,
            withdraws: Vec::new(),
            updates: Vec::new(),
            mp_reach: None,
            mp_unreach: None,
        }
    }
}

impl From<UpdatePacket> for BytesMut {
    fn from(update: UpdatePacket) -> Self {
        update.emit(true)
    }
}

impl fmt::Debug for UpdatePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self)
    }
}

impl fmt::Display for UpdatePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Update Message:")?;
        if let Some(attrs) = &self.attrs {
            write!(f, "{}", attrs)?;
        }
        if !self.updates.is_empty() {
            writeln!(f, " IPv4 Updates:")?;
            for update in self.updates.iter() {
                writeln!(f, "  {}", update)?;
            }
        }
        if !self.withdraws.is_empty() {
            writeln!(f, " IPv4 Withdraw:")?;
            for withdraw in self.withdraws.iter() {
                writeln!(f, "  {}", withdraw)?;
            }
        }
        if let Some(mp_reach) = &self.mp_reach {
            write!(f, "{}", mp_reach)?;
        }
        if let Some(mp_unreach) = &self.mp_unreach {
            write!(f, "{}", mp_unreach)?;
        }
        if self.is_end_of_rib() && self.mp_unreach.is_none() {
            writeln!(f, " EoR: IPv4/Unicast")?;
        }
        Ok(())
    }
}
