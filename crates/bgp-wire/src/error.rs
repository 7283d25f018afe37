use thiserror::Error;

use crate::notification::{
    HeaderError, NotifyCode, OpenError, UpdateError,
};
use crate::{Afi, AttrType, Safi};

#[derive(Error, Debug)]
pub enum WireError {
    #[error("short read: need {needed} more bytes")]
    ShortRead { needed: usize },

    #[error("header marker is not all-ones")]
    BadMarker,

    #[error("message length {length} outside allowed bounds")]
    BadLength { length: u16 },

    #[error("unknown message type {typ}")]
    UnknownType { typ: u8 },

    #[error("attribute {attr_type:?} carries flags {flags:#04x} violating its category")]
    AttributeFlags { attr_type: AttrType, flags: u8 },

    #[error("invalid attribute length for {attr_type:?}: expected {expected}, got {actual}")]
    AttributeLength {
        attr_type: AttrType,
        expected: usize,
        actual: usize,
    },

    #[error("failed to parse attribute {attr_type:?}: {source}")]
    AttributeParse {
        attr_type: AttrType,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed NLRI: {0}")]
    MalformedNlri(String),

    #[error("update carries both MP_REACH and MP_UNREACH payloads")]
    MixedMpPayload,

    #[error("unsupported address family {afi}/{safi}")]
    UnsupportedFamily { afi: Afi, safi: Safi },

    #[error("unsupported capability code {code}")]
    UnsupportedCapability { code: u8 },

    #[error("parse error: {0}")]
    Nom(String),
}

impl WireError {
    /// Default NOTIFICATION code/sub-code for this error.  The FSM may
    /// override the mapping where the message context demands a more
    /// specific sub-code (e.g. OPEN parsing failures).
    pub fn notify_codes(&self) -> (NotifyCode, u8) {
        use WireError::*;
        match self {
            BadMarker => (
                NotifyCode::MsgHeaderError,
                HeaderError::ConnectionNotSynced.into(),
            ),
            BadLength { .. } => (
                NotifyCode::MsgHeaderError,
                HeaderError::BadMessageLength.into(),
            ),
            UnknownType { .. } => (
                NotifyCode::MsgHeaderError,
                HeaderError::BadMessageType.into(),
            ),
            AttributeFlags { .. } => (
                NotifyCode::UpdateMsgError,
                UpdateError::AttributeFlagsError.into(),
            ),
            AttributeLength { .. } => (
                NotifyCode::UpdateMsgError,
                UpdateError::AttributeLengthError.into(),
            ),
            AttributeParse { .. } => (
                NotifyCode::UpdateMsgError,
                UpdateError::OptionalAttributeError.into(),
            ),
            MalformedNlri(_) => (
                NotifyCode::UpdateMsgError,
                UpdateError::InvalidNetworkField.into(),
            ),
            MixedMpPayload => (
                NotifyCode::UpdateMsgError,
                UpdateError::MalformedAttributeList.into(),
            ),
            UnsupportedFamily { .. } => (
                NotifyCode::UpdateMsgError,
                UpdateError::OptionalAttributeError.into(),
            ),
            UnsupportedCapability { .. } => (
                NotifyCode::OpenMsgError,
                OpenError::UnsupportedCapability.into(),
            ),
            ShortRead { .. } | Nom(_) => (
                NotifyCode::UpdateMsgError,
                UpdateError::MalformedAttributeList.into(),
            ),
        }
    }
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for WireError {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => {
                let needed = match needed {
                    nom::Needed::Unknown => 0,
                    nom::Needed::Size(size) => size.get(),
                };
                WireError::ShortRead { needed }
            }
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                WireError::Nom(format!("{:?}: {} bytes left", e.code, e.input.len()))
            }
        }
    }
}

impl<I> nom::error::ParseError<I> for WireError {
    fn from_error_kind(_input: I, kind: nom::error::ErrorKind) -> Self {
        WireError::Nom(format!("{:?}", kind))
    }

    fn append(_input: I, kind: nom::error::ErrorKind, other: Self) -> Self {
        match other {
            WireError::Nom(msg) => WireError::Nom(format!("{}, {:?}", msg, kind)),
            _ => other,
        }
    }
}
