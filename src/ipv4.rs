//! IPv4 datagram header
//!
//! The IPv4 header is variable-length: the low nibble of the first byte (IHL)
//! gives the header length in 32-bit words, so a datagram carrying options has
//! a header longer than the fixed 20-byte core. The payload begins exactly at
//! that length, and the length must be read from the packet itself: a
//! fixed-size skip would misparse any datagram with options.

use std::fmt;

use nom::bytes::streaming::take;
use nom::number::streaming::be_u8;
use nom::IResult;

use crate::error::DecodeError;
use crate::ipproto::IpProto;

/// Length of the fixed IPv4 header core, without options
pub const IPV4_MIN_HEADER_LEN: usize = 20;

const VERSION_SHIFT: u8 = 4;
const IHL_MASK: u8 = 0x0f;

/// A 4-byte IPv4 address
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ipv4Address(pub [u8; 4]);

impl fmt::Display for Ipv4Address {
    /// Canonical form: four dot-separated decimal octets
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = &self.0;
        write!(f, "{}.{}.{}.{}", b[0], b[1], b[2], b[3])
    }
}

impl From<Ipv4Address> for std::net::Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        std::net::Ipv4Addr::from(addr.0)
    }
}

/// Decoded IPv4 datagram header
///
/// `header_len` is the full header length in bytes, options included. The
/// version field is recorded as found in the packet; callers inspecting
/// non-IPv4 values are expected to do their own validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ipv4Header {
    pub version: u8,
    pub header_len: usize,
    pub ttl: u8,
    pub protocol: IpProto,
    pub source: Ipv4Address,
    pub destination: Ipv4Address,
}

/// Read an IPv4 datagram header
///
/// Returns the decoded header and the datagram payload, starting at
/// `header_len` bytes from the datagram start (options are skipped).
///
/// Fails with `Incomplete` if the buffer is shorter than the fixed core or
/// the declared header length, and with `Malformed` if the IHL field encodes
/// a header shorter than 20 bytes.
pub fn parse_ipv4_header(i: &[u8]) -> IResult<&[u8], Ipv4Header, DecodeError> {
    let (i, ver_ihl) = be_u8(i)?;
    let version = ver_ihl >> VERSION_SHIFT;
    let header_len = ((ver_ihl & IHL_MASK) as usize) * 4;
    if header_len < IPV4_MIN_HEADER_LEN {
        return Err(nom::Err::Error(DecodeError::Malformed(
            "IPv4 header length below minimum",
        )));
    }
    // tos, total length, identification, flags/fragment offset
    let (i, _) = take(7usize)(i)?;
    let (i, ttl) = be_u8(i)?;
    let (i, protocol) = be_u8(i)?;
    let (i, _checksum) = take(2usize)(i)?;
    let (i, source) = ipv4_address(i)?;
    let (i, destination) = ipv4_address(i)?;
    let (i, _options) = take(header_len - IPV4_MIN_HEADER_LEN)(i)?;
    let header = Ipv4Header {
        version,
        header_len,
        ttl,
        protocol: IpProto(protocol),
        source,
        destination,
    };
    Ok((i, header))
}

fn ipv4_address(i: &[u8]) -> IResult<&[u8], Ipv4Address, DecodeError> {
    let (i, b) = take(4usize)(i)?;
    let mut addr = [0u8; 4];
    addr.copy_from_slice(b);
    Ok((i, Ipv4Address(addr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const DATAGRAM: &[u8] = &hex!(
        "
45 00 00 3c 1c 46 40 00 40 06 b1 e6 ac 10 0a 63
ac 10 0a 0c de ad be ef"
    );

    #[test]
    fn test_parse_ipv4_header() {
        let (rem, ip) = parse_ipv4_header(DATAGRAM).expect("header parsing failed");
        assert_eq!(ip.version, 4);
        assert_eq!(ip.header_len, 20);
        assert_eq!(ip.ttl, 64);
        assert_eq!(ip.protocol, IpProto::TCP);
        assert_eq!(ip.source, Ipv4Address([172, 16, 10, 99]));
        assert_eq!(ip.destination, Ipv4Address([172, 16, 10, 12]));
        assert_eq!(rem, &hex!("de ad be ef")[..]);
    }

    #[test]
    fn test_options_are_skipped() {
        // IHL = 6: 4 bytes of options (a NOP-padded EOL) before the payload
        let datagram = &hex!(
            "
46 00 00 20 00 01 00 00 40 11 00 00 0a 00 00 01
0a 00 00 02 01 01 01 00 ca fe"
        );
        let (rem, ip) = parse_ipv4_header(datagram).expect("header parsing failed");
        assert_eq!(ip.header_len, 24);
        assert_eq!(ip.protocol, IpProto::UDP);
        assert_eq!(rem, &hex!("ca fe")[..]);
        assert_eq!(rem.len(), datagram.len() - ip.header_len);
    }

    #[test]
    fn test_truncated_core() {
        let res = parse_ipv4_header(&DATAGRAM[..19]);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_truncated_options() {
        // IHL = 7 (28 bytes) but only 20 bytes available
        let mut datagram = DATAGRAM[..20].to_vec();
        datagram[0] = 0x47;
        let res = parse_ipv4_header(&datagram);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_header_len_below_minimum() {
        let mut datagram = DATAGRAM.to_vec();
        datagram[0] = 0x44; // IHL = 4, 16 bytes
        let res = parse_ipv4_header(&datagram);
        assert_eq!(
            res,
            Err(nom::Err::Error(DecodeError::Malformed(
                "IPv4 header length below minimum"
            )))
        );
    }

    #[test]
    fn test_address_display_roundtrip() {
        let addr = Ipv4Address([192, 168, 1, 254]);
        let s = addr.to_string();
        assert_eq!(s, "192.168.1.254");
        let octets: Vec<u8> = s.split('.').map(|o| o.parse().unwrap()).collect();
        assert_eq!(&octets[..], &addr.0[..]);
    }
}
