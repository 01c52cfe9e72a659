//! UDP segment header
//!
//! Fixed 8-byte header: source and destination ports, then the total segment
//! length at bytes 6-7. Bytes 4-5 are skipped and not surfaced. The payload
//! begins at byte 8.

use nom::bytes::streaming::take;
use nom::number::streaming::be_u16;
use nom::IResult;

use crate::error::DecodeError;

/// Length of the fixed UDP header
pub const UDP_HEADER_LEN: usize = 8;

/// Decoded UDP segment header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UdpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    /// Total segment length, header included
    pub length: u16,
}

/// Read a UDP segment header
///
/// Returns the decoded header and the segment payload (bytes 8 onward).
/// Fails with `Incomplete` if the buffer is shorter than 8 bytes.
pub fn parse_udp_header(i: &[u8]) -> IResult<&[u8], UdpHeader, DecodeError> {
    let (i, source_port) = be_u16(i)?;
    let (i, destination_port) = be_u16(i)?;
    let (i, _) = take(2usize)(i)?;
    let (i, length) = be_u16(i)?;
    let header = UdpHeader {
        source_port,
        destination_port,
        length,
    };
    Ok((i, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_parse_udp_header() {
        let segment = &hex!("00 35 c0 01 00 00 00 12 ab cd");
        let (rem, udp) = parse_udp_header(segment).expect("header parsing failed");
        assert_eq!(udp.source_port, 53);
        assert_eq!(udp.destination_port, 0xc001);
        assert_eq!(udp.length, 0x12);
        assert_eq!(rem, &hex!("ab cd")[..]);
    }

    #[test]
    fn test_header_only_segment() {
        let segment = &hex!("13 88 13 89 00 00 00 08");
        let (rem, udp) = parse_udp_header(segment).expect("header parsing failed");
        assert_eq!(udp.length, 8);
        assert!(rem.is_empty());
    }

    #[test]
    fn test_truncated_segment() {
        let res = parse_udp_header(&hex!("00 35 c0 01 00 00 00"));
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }
}
