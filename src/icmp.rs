//! ICMP message header
//!
//! Only the fixed 4-byte prefix common to all ICMP messages is decoded: type,
//! code and checksum. The rest-of-header word and any payload are left in the
//! remainder. The checksum is surfaced as-is, not validated.

use nom::number::streaming::{be_u16, be_u8};
use nom::IResult;

use crate::error::DecodeError;

/// Length of the fixed ICMP header prefix
pub const ICMP_HEADER_LEN: usize = 4;

/// Decoded ICMP message header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IcmpHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
}

/// Read an ICMP message header
///
/// Returns the decoded header and the remainder (bytes 4 onward). Fails with
/// `Incomplete` if the buffer is shorter than 4 bytes.
pub fn parse_icmp_header(i: &[u8]) -> IResult<&[u8], IcmpHeader, DecodeError> {
    let (i, icmp_type) = be_u8(i)?;
    let (i, code) = be_u8(i)?;
    let (i, checksum) = be_u16(i)?;
    let header = IcmpHeader {
        icmp_type,
        code,
        checksum,
    };
    Ok((i, header))
}
