use std::fmt;

use nom::error::{ErrorKind, ParseError};
use nom::Needed;

/// Errors raised while decoding headers or pulling frames from a capture source
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// No more frames are available from the capture source
    Eof,
    /// The capture source ended in the middle of a frame record
    UnexpectedEof,
    /// Error while reading from the underlying capture source
    ReadError,
    /// The internal buffer is too small to hold a complete frame
    BufferTooSmall,
    /// The capture stream header was not recognized
    HeaderNotRecognized,
    /// The buffer ends before a required field or computed remainder.
    /// Carries the number of missing bytes, if known (0 otherwise).
    Incomplete(usize),
    /// A structurally present field holds a value inconsistent with protocol rules
    Malformed(&'static str),
    /// Generic parsing error
    NomError(ErrorKind),
}

impl DecodeError {
    /// Flatten a nom error into a `DecodeError`, turning `Incomplete` into the
    /// missing byte count
    pub fn from_nom(err: nom::Err<DecodeError>) -> Self {
        match err {
            nom::Err::Incomplete(Needed::Size(n)) => DecodeError::Incomplete(n.get()),
            nom::Err::Incomplete(Needed::Unknown) => DecodeError::Incomplete(0),
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

impl<I> ParseError<I> for DecodeError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        DecodeError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        DecodeError::NomError(kind)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Eof => write!(f, "end of capture"),
            DecodeError::UnexpectedEof => write!(f, "capture source truncated mid-frame"),
            DecodeError::ReadError => write!(f, "read error on capture source"),
            DecodeError::BufferTooSmall => write!(f, "buffer too small for frame"),
            DecodeError::HeaderNotRecognized => write!(f, "capture stream header not recognized"),
            DecodeError::Incomplete(0) => write!(f, "truncated input"),
            DecodeError::Incomplete(n) => write!(f, "truncated input (missing {} bytes)", n),
            DecodeError::Malformed(reason) => write!(f, "malformed header: {}", reason),
            DecodeError::NomError(kind) => write!(f, "parsing error: {:?}", kind),
        }
    }
}

impl std::error::Error for DecodeError {}

/// The protocol layer a decode operation was working on
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layer {
    Ethernet,
    Ipv4,
    Icmp,
    Tcp,
    Udp,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Layer::Ethernet => "Ethernet",
            Layer::Ipv4 => "IPv4",
            Layer::Icmp => "ICMP",
            Layer::Tcp => "TCP",
            Layer::Udp => "UDP",
        };
        f.write_str(name)
    }
}

/// Decoding failure of a single frame
///
/// Identifies the layer that failed and the number of bytes that were
/// available to its parser. A `LayerError` aborts decoding of the current
/// frame only; the capture loop reports it and moves to the next frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayerError {
    pub layer: Layer,
    pub available: usize,
    pub error: DecodeError,
}

impl LayerError {
    pub(crate) fn new(layer: Layer, available: usize, err: nom::Err<DecodeError>) -> Self {
        LayerError {
            layer,
            available,
            error: DecodeError::from_nom(err),
        }
    }
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} layer: {} ({} bytes available)",
            self.layer, self.error, self.available
        )
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
