use std::fmt::Display;

use bytes::{BufMut, BytesMut};
use nom::bytes::complete::take;
use nom::{IResult, number::complete::be_u8};
use nom_derive::*;
use serde::Serialize;

use crate::afi::wire_code;
use crate::{BGP_HEADER_LEN, BgpHeader, BgpType};

#[derive(Debug, Clone, NomBE)]
pub struct NotificationPacket {
    pub header: BgpHeader,
    pub code: NotifyCode,
    pub sub_code: u8,
    #[nom(Ignore)]
    pub data: Vec<u8>,
}

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyCode {
    MsgHeaderError = 1,
    OpenMsgError = 2,
    UpdateMsgError = 3,
    HoldTimerExpired = 4,
    FsmError = 5,
    Cease = 6,
    RouteRefreshError = 7,
    Unknown(u8),
}

wire_code!(NotifyCode: u8, be_u8, {
    MsgHeaderError = 1,
    OpenMsgError = 2,
    UpdateMsgError = 3,
    HoldTimerExpired = 4,
    FsmError = 5,
    Cease = 6,
    RouteRefreshError = 7,
});

impl Display for NotifyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use NotifyCode::*;
        let name = match self {
            MsgHeaderError => "Message Header Error",
            OpenMsgError => "OPEN Message Error",
            UpdateMsgError => "UPDATE Message Error",
            HoldTimerExpired => "Hold Timer Expired",
            FsmError => "FSM Error",
            Cease => "Cease",
            RouteRefreshError => "ROUTE-REFRESH Message Error",
            Unknown(v) => return write!(f, "Unknown {}", v),
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HeaderError {
    ConnectionNotSynced,
    BadMessageLength,
    BadMessageType,
    Unknown(u8),
}

wire_code!(HeaderError: u8, {
    ConnectionNotSynced = 1,
    BadMessageLength = 2,
    BadMessageType = 3,
});

impl HeaderError {
    fn reason(self) -> String {
        use HeaderError::*;
        match self {
            ConnectionNotSynced => "Connection Not Synchronized".into(),
            BadMessageLength => "Bad Message Length".into(),
            BadMessageType => "Bad Message Type".into(),
            Unknown(v) => format!("Unknown({})", v),
        }
    }
}

// OPEN sub-codes (RFC 4271 plus the RFC 5492 capability code).  Code 5
// is deprecated and deliberately absent.
#[derive(Debug, Clone, Copy)]
pub enum OpenError {
    UnsupportedVersionNumber,
    BadPeerAS,
    BadBgpIdentifier,
    UnsupportedOptionalParameter,
    UnacceptableHoldTime,
    UnsupportedCapability,
    Unknown(u8),
}

wire_code!(OpenError: u8, {
    UnsupportedVersionNumber = 1,
    BadPeerAS = 2,
    BadBgpIdentifier = 3,
    UnsupportedOptionalParameter = 4,
    UnacceptableHoldTime = 6,
    UnsupportedCapability = 7,
});

impl OpenError {
    fn reason(self) -> String {
        use OpenError::*;
        match self {
            UnsupportedVersionNumber => "Unsupported Version Number".into(),
            BadPeerAS => "Bad Peer AS".into(),
            BadBgpIdentifier => "Bad BGP Identifier".into(),
            UnsupportedOptionalParameter => "Unsupported Optional Parameter".into(),
            UnacceptableHoldTime => "Unacceptable Hold Time".into(),
            UnsupportedCapability => "Unsupported Capability".into(),
            Unknown(v) => format!("Unknown({})", v),
        }
    }
}

// UPDATE sub-codes.  Code 7 is deprecated.
#[derive(Debug, Clone, Copy)]
pub enum UpdateError {
    MalformedAttributeList,
    UnrecognizedWellknownAttribute,
    MissingWellknownAttribute,
    AttributeFlagsError,
    AttributeLengthError,
    InvalidOriginAttribute,
    InvalidNexthopAttribute,
    OptionalAttributeError,
    InvalidNetworkField,
    MalformedAspath,
    Unknown(u8),
}

wire_code!(UpdateError: u8, {
    MalformedAttributeList = 1,
    UnrecognizedWellknownAttribute = 2,
    MissingWellknownAttribute = 3,
    AttributeFlagsError = 4,
    AttributeLengthError = 5,
    InvalidOriginAttribute = 6,
    InvalidNexthopAttribute = 8,
    OptionalAttributeError = 9,
    InvalidNetworkField = 10,
    MalformedAspath = 11,
});

impl UpdateError {
    fn reason(self) -> String {
        use UpdateError::*;
        match self {
            MalformedAttributeList => "Malformed Attribute List".into(),
            UnrecognizedWellknownAttribute => "Unrecognized Well-known Attribute".into(),
            MissingWellknownAttribute => "Missing Well-known Attribute".into(),
            AttributeFlagsError => "Attribute Flags Error".into(),
            AttributeLengthError => "Attribute Length Error".into(),
            InvalidOriginAttribute => "Invalid ORIGIN Attribute".into(),
            InvalidNexthopAttribute => "Invalid NEXT_HOP Attribute".into(),
            OptionalAttributeError => "Optional Attribute Error".into(),
            InvalidNetworkField => "Invalid Network Field".into(),
            MalformedAspath => "Malformed AS_PATH".into(),
            Unknown(v) => format!("Unknown({})", v),
        }
    }
}

/// RFC 6608 per-state FSM error sub-codes.
#[derive(Debug, Clone, Copy)]
pub enum FsmSubError {
    UnexpectedMessageInOpenSent,
    UnexpectedMessageInOpenConfirm,
    UnexpectedMessageInEstablished,
    Unknown(u8),
}

wire_code!(FsmSubError: u8, {
    UnexpectedMessageInOpenSent = 1,
    UnexpectedMessageInOpenConfirm = 2,
    UnexpectedMessageInEstablished = 3,
});

/// RFC 4486 / RFC 9003 Cease sub-codes.
#[derive(Debug, Clone, Copy)]
pub enum CeaseError {
    MaximumNumberOfPrefixReached,
    AdministrativeShutdown,
    PeerDeConfigured,
    AdministrativeReset,
    ConnectionRejected,
    OtherConfigChange,
    ConnectionCollisionResolution,
    OutOfResources,
    Unknown(u8),
}

wire_code!(CeaseError: u8, {
    MaximumNumberOfPrefixReached = 1,
    AdministrativeShutdown = 2,
    PeerDeConfigured = 3,
    AdministrativeReset = 4,
    ConnectionRejected = 5,
    OtherConfigChange = 6,
    ConnectionCollisionResolution = 7,
    OutOfResources = 8,
});

impl CeaseError {
    fn reason(self) -> String {
        use CeaseError::*;
        match self {
            MaximumNumberOfPrefixReached => "Maximum Number of Prefixes Reached".into(),
            AdministrativeShutdown => "Administrative Shutdown".into(),
            PeerDeConfigured => "Peer De-configured".into(),
            AdministrativeReset => "Administrative Reset".into(),
            ConnectionRejected => "Connection Rejected".into(),
            OtherConfigChange => "Other Configuration Change".into(),
            ConnectionCollisionResolution => "Connection Collision Resolution".into(),
            OutOfResources => "Out of Resources".into(),
            Unknown(v) => format!("Unknown({})", v),
        }
    }
}

/// Human form of a code/sub-code pair, for logs and the event stream.
pub fn notify_sub_code_str(code: NotifyCode, sub_code: u8) -> String {
    use NotifyCode::*;
    match code {
        MsgHeaderError => HeaderError::from(sub_code).reason(),
        OpenMsgError => OpenError::from(sub_code).reason(),
        UpdateMsgError => UpdateError::from(sub_code).reason(),
        HoldTimerExpired => "Hold Timer Expired".into(),
        FsmError => format!("FSM Error({})", sub_code),
        Cease => CeaseError::from(sub_code).reason(),
        RouteRefreshError => "Invalid Message Length".into(),
        Unknown(v) => format!("Unknown {}", v),
    }
}

impl NotificationPacket {
    pub fn new(code: NotifyCode, sub_code: u8, data: Vec<u8>) -> Self {
        Self {
            header: BgpHeader::new(BgpType::Notification, BGP_HEADER_LEN),
            code,
            sub_code,
            data,
        }
    }

    pub fn parse_packet(input: &[u8]) -> IResult<&[u8], NotificationPacket> {
        let (input, mut packet) = NotificationPacket::parse_be(input)?;
        let len = packet.header.length - BGP_HEADER_LEN - 2;
        let (input, data) = take(len as usize).parse(input)?;
        packet.data = data.to_vec();
        Ok((input, packet))
    }
}

impl From<NotificationPacket> for BytesMut {
    fn from(notification: NotificationPacket) -> Self {
        let mut buf = BytesMut::new();
        let header: BytesMut = notification.header.into();
        buf.put(&header[..]);
        buf.put_u8(notification.code.into());
        buf.put_u8(notification.sub_code);
        buf.put(&notification.data[..]);

        const LENGTH_POS: std::ops::Range<usize> = 16..18;
        let length: u16 = buf.len() as u16;
        buf[LENGTH_POS].copy_from_slice(&length.to_be_bytes());

        buf
    }
}

impl Display for NotificationPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Notification")?;
        writeln!(f, " Code: {}", self.code)?;
        writeln!(
            f,
            " Sub Code: {}",
            notify_sub_code_str(self.code, self.sub_code)
        )?;
        Ok(())
    }
}
