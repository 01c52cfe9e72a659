//! Ethernet II frame header
//!
//! An Ethernet frame starts with a fixed 14-byte header: destination and
//! source hardware addresses (6 bytes each) followed by the EtherType of the
//! payload, in network byte order.

use std::fmt;

use nom::bytes::streaming::take;
use nom::number::streaming::be_u16;
use nom::IResult;

use crate::error::DecodeError;
use crate::ethertype::EtherType;

/// Length of the fixed Ethernet header
pub const ETHERNET_HEADER_LEN: usize = 14;

/// A 6-byte IEEE 802 hardware (MAC) address
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    /// Canonical form: six uppercase hex pairs joined by colons
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Decoded Ethernet frame header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EthernetHeader {
    pub destination: MacAddress,
    pub source: MacAddress,
    pub ethertype: EtherType,
}

/// Read an Ethernet frame header
///
/// Returns the decoded header and the frame payload (bytes 14 onward).
/// Fails with `Incomplete` if the buffer is shorter than 14 bytes.
pub fn parse_ethernet_header(i: &[u8]) -> IResult<&[u8], EthernetHeader, DecodeError> {
    let (i, destination) = mac_address(i)?;
    let (i, source) = mac_address(i)?;
    let (i, ethertype) = be_u16(i)?;
    let header = EthernetHeader {
        destination,
        source,
        ethertype: EtherType(ethertype),
    };
    Ok((i, header))
}

fn mac_address(i: &[u8]) -> IResult<&[u8], MacAddress, DecodeError> {
    let (i, b) = take(6usize)(i)?;
    let mut addr = [0u8; 6];
    addr.copy_from_slice(b);
    Ok((i, MacAddress(addr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const FRAME: &[u8] = &hex!("00 1b 21 3c 9d f2 f0 de f1 12 34 56 08 00 45 00");

    #[test]
    fn test_parse_ethernet_header() {
        let (rem, eth) = parse_ethernet_header(FRAME).expect("header parsing failed");
        assert_eq!(eth.destination, MacAddress([0x00, 0x1b, 0x21, 0x3c, 0x9d, 0xf2]));
        assert_eq!(eth.source, MacAddress([0xf0, 0xde, 0xf1, 0x12, 0x34, 0x56]));
        assert_eq!(eth.ethertype, EtherType::IPV4);
        assert_eq!(rem, &hex!("45 00")[..]);
    }

    #[test]
    fn test_exact_header_empty_remainder() {
        let (rem, eth) = parse_ethernet_header(&FRAME[..14]).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(eth.ethertype, EtherType::IPV4);
    }

    #[test]
    fn test_truncated_frame() {
        for len in 0..14 {
            let res = parse_ethernet_header(&FRAME[..len]);
            assert!(matches!(res, Err(nom::Err::Incomplete(_))), "len {}", len);
        }
    }

    #[test]
    fn test_mac_display() {
        let mac = MacAddress([0x00, 0x1b, 0x21, 0x3c, 0x9d, 0xf2]);
        let s = mac.to_string();
        assert_eq!(s, "00:1B:21:3C:9D:F2");
        assert_eq!(s.len(), 17);
    }

    #[test]
    fn test_mac_display_injective() {
        let a = MacAddress([0, 0, 0, 0, 0, 0x01]).to_string();
        let b = MacAddress([0, 0, 0, 0, 0x01, 0]).to_string();
        assert_ne!(a, b);
    }
}
