use std::fmt;

use bytes::BytesMut;
use nom::IResult;
use nom_derive::*;

use super::*;

#[derive(Debug, Default, PartialEq, NomBE, Clone)]
pub struct CapabilityHeader {
    pub code: u8,
    pub length: u8,
}

impl CapabilityHeader {
    pub fn new(code: CapCode, length: u8) -> Self {
        Self {
            code: code.into(),
            length,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CapabilityPacket {
    MultiProtocol(CapMultiProtocol),
    RouteRefresh(CapRefresh),
    ExtendedMessage(CapExtended),
    GracefulRestart(CapRestart),
    As4(CapAs4),
    AddPath(CapAddPath),
    EnhancedRouteRefresh(CapEnhancedRefresh),
    Unknown(CapUnknown),
}

impl CapabilityPacket {
    pub fn parse_cap(input: &[u8]) -> IResult<&[u8], CapabilityPacket> {
        let (input, header) = CapabilityHeader::parse_be(input)?;
        if input.len() < header.length as usize {
            return Err(nom::Err::Incomplete(nom::Needed::new(
                header.length as usize - input.len(),
            )));
        }
        let (payload, input) = input.split_at(header.length as usize);
        let cap = match CapCode::from(header.code) {
            CapCode::MultiProtocol => {
                let (_, cap) = CapMultiProtocol::parse_be(payload)?;
                CapabilityPacket::MultiProtocol(cap)
            }
            CapCode::RouteRefresh => CapabilityPacket::RouteRefresh(CapRefresh::default()),
            CapCode::ExtendedMessage => CapabilityPacket::ExtendedMessage(CapExtended::default()),
            CapCode::GracefulRestart => {
                let (_, cap) = CapRestart::parse_be(payload)?;
                CapabilityPacket::GracefulRestart(cap)
            }
            CapCode::As4 => {
                let (_, cap) = CapAs4::parse_be(payload)?;
                CapabilityPacket::As4(cap)
            }
            CapCode::AddPath => {
                let (_, cap) = CapAddPath::parse_be(payload)?;
                CapabilityPacket::AddPath(cap)
            }
            CapCode::EnhancedRouteRefresh => {
                CapabilityPacket::EnhancedRouteRefresh(CapEnhancedRefresh::default())
            }
            CapCode::Unknown(code) => CapabilityPacket::Unknown(CapUnknown {
                code,
                data: payload.to_vec(),
            }),
        };
        Ok((input, cap))
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Self::MultiProtocol(m) => m.emit(buf),
            Self::RouteRefresh(m) => m.emit(buf),
            Self::ExtendedMessage(m) => m.emit(buf),
            Self::GracefulRestart(m) => m.emit(buf),
            Self::As4(m) => m.emit(buf),
            Self::AddPath(m) => m.emit(buf),
            Self::EnhancedRouteRefresh(m) => m.emit(buf),
            Self::Unknown(m) => m.emit(buf),
        }
    }
}

impl fmt::Display for CapabilityPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiProtocol(v) => write!(f, "{}", v),
            Self::RouteRefresh(v) => write!(f, "{}", v),
            Self::ExtendedMessage(v) => write!(f, "{}", v),
            Self::GracefulRestart(v) => write!(f, "{}", v),
            Self::As4(v) => write!(f, "{}", v),
            Self::AddPath(v) => write!(f, "{}", v),
            Self::EnhancedRouteRefresh(v) => write!(f, "{}", v),
            Self::Unknown(v) => write!(f, "{}", v),
        }
    }
}
