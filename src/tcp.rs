//! TCP segment header
//!
//! Bytes 12-13 of a TCP segment form a combined offset/reserved/flags field:
//! the top 4 bits encode the header length in 32-bit words, the low byte
//! carries the control flags. All six flags and the data offset are therefore
//! available after reading only 14 bytes, even though the fixed header is 20.
//! The payload begins at the decoded data offset, past any TCP options.

use std::fmt;

use nom::bytes::streaming::take;
use nom::number::streaming::{be_u16, be_u32};
use nom::IResult;

use crate::error::DecodeError;

/// Length of the fixed TCP header, without options
pub const TCP_MIN_HEADER_LEN: usize = 20;

/// Bytes consumed before the data offset is known
const TCP_FIXED_PREFIX: usize = 14;

const DATA_OFFSET_SHIFT: u16 = 12;
const FLAG_URG: u16 = 0x0020;
const FLAG_ACK: u16 = 0x0010;
const FLAG_PSH: u16 = 0x0008;
const FLAG_RST: u16 = 0x0004;
const FLAG_SYN: u16 = 0x0002;
const FLAG_FIN: u16 = 0x0001;

/// TCP control flags, one boolean per bit of the flags byte
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TcpFlags {
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TcpFlags {
    /// Extract flags from the 16-bit offset/reserved/flags field
    pub fn from_field(field: u16) -> TcpFlags {
        TcpFlags {
            urg: field & FLAG_URG != 0,
            ack: field & FLAG_ACK != 0,
            psh: field & FLAG_PSH != 0,
            rst: field & FLAG_RST != 0,
            syn: field & FLAG_SYN != 0,
            fin: field & FLAG_FIN != 0,
        }
    }
}

impl fmt::Display for TcpFlags {
    /// Set flag names joined by `|`, or `.` when no flag is set
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = [
            (self.urg, "URG"),
            (self.ack, "ACK"),
            (self.psh, "PSH"),
            (self.rst, "RST"),
            (self.syn, "SYN"),
            (self.fin, "FIN"),
        ];
        let mut first = true;
        for (set, name) in names.iter() {
            if *set {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str(".")?;
        }
        Ok(())
    }
}

/// Decoded TCP segment header
///
/// `data_offset` is the header length in bytes, options included.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence: u32,
    pub acknowledgement: u32,
    pub data_offset: usize,
    pub flags: TcpFlags,
}

/// Read a TCP segment header
///
/// Returns the decoded header and the segment payload, starting at
/// `data_offset` bytes from the segment start (the window, checksum and
/// urgent-pointer fields and any options are skipped).
///
/// Fails with `Incomplete` if the buffer is shorter than 14 bytes or the
/// declared data offset, and with `Malformed` if the offset field encodes a
/// header shorter than the fixed 20-byte minimum.
pub fn parse_tcp_header(i: &[u8]) -> IResult<&[u8], TcpHeader, DecodeError> {
    let (i, source_port) = be_u16(i)?;
    let (i, destination_port) = be_u16(i)?;
    let (i, sequence) = be_u32(i)?;
    let (i, acknowledgement) = be_u32(i)?;
    let (i, offset_flags) = be_u16(i)?;
    let data_offset = ((offset_flags >> DATA_OFFSET_SHIFT) as usize) * 4;
    if data_offset < TCP_MIN_HEADER_LEN {
        return Err(nom::Err::Error(DecodeError::Malformed(
            "TCP data offset below minimum header length",
        )));
    }
    let (i, _) = take(data_offset - TCP_FIXED_PREFIX)(i)?;
    let header = TcpHeader {
        source_port,
        destination_port,
        sequence,
        acknowledgement,
        data_offset,
        flags: TcpFlags::from_field(offset_flags),
    };
    Ok((i, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SEGMENT: &[u8] = &hex!(
        "
00 50 01 bb 00 00 00 01 00 00 00 02 50 18 20 00
91 7c 00 00 68 69"
    );

    #[test]
    fn test_parse_tcp_header() {
        let (rem, tcp) = parse_tcp_header(SEGMENT).expect("header parsing failed");
        assert_eq!(tcp.source_port, 80);
        assert_eq!(tcp.destination_port, 443);
        assert_eq!(tcp.sequence, 1);
        assert_eq!(tcp.acknowledgement, 2);
        assert_eq!(tcp.data_offset, 20);
        assert_eq!(rem, &b"hi"[..]);
    }

    #[test]
    fn test_flag_extraction() {
        // offset/flags field 0x5018: data offset 5*4=20, flags byte 0x18
        let flags = TcpFlags::from_field(0x5018);
        assert!(flags.ack);
        assert!(flags.psh);
        assert!(!flags.urg);
        assert!(!flags.rst);
        assert!(!flags.syn);
        assert!(!flags.fin);
        assert_eq!(flags.to_string(), "ACK|PSH");
    }

    #[test]
    fn test_flags_display_empty() {
        assert_eq!(TcpFlags::default().to_string(), ".");
    }

    #[test]
    fn test_options_are_skipped() {
        // data offset 6 words = 24 bytes, 4 bytes of options
        let segment = &hex!(
            "
04 d2 00 50 00 00 00 0a 00 00 00 00 60 02 ff ff
00 00 00 00 02 04 05 b4 58"
        );
        let (rem, tcp) = parse_tcp_header(segment).expect("header parsing failed");
        assert_eq!(tcp.data_offset, 24);
        assert!(tcp.flags.syn);
        assert!(!tcp.flags.ack);
        assert_eq!(rem, &b"X"[..]);
    }

    #[test]
    fn test_truncated_segment() {
        let res = parse_tcp_header(&SEGMENT[..13]);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_truncated_before_data_offset() {
        // header declares 20 bytes but only 16 are available
        let res = parse_tcp_header(&SEGMENT[..16]);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_data_offset_below_minimum() {
        let mut segment = SEGMENT.to_vec();
        segment[12] = 0x40; // 4 words = 16 bytes
        let res = parse_tcp_header(&segment);
        assert_eq!(
            res,
            Err(nom::Err::Error(DecodeError::Malformed(
                "TCP data offset below minimum header length"
            )))
        );
    }
}
