//! Legacy pcap file replay
//!
//! [`PcapReplaySource`] turns a legacy pcap stream into a [`FrameSource`], so
//! captured traffic can be replayed through the decode pipeline without a
//! live interface. It is a streaming reader over a circular buffer: memory
//! usage is constant, and any input providing `Read` works, files and pipes
//! alike.
//!
//! Only the legacy pcap format is handled, in both byte orders. The stream
//! must carry Ethernet frames (link type 1); other link types are rejected
//! at construction.

use std::io::Read;

use circular::Buffer;
use nom::bytes::streaming::take;
use nom::number::streaming::{be_i32, be_u16, be_u32, le_i32, le_u16, le_u32};
use nom::{IResult, Needed};

use crate::capture::FrameSource;
use crate::error::DecodeError;

const LINKTYPE_ETHERNET: i32 = 1;

/// Legacy pcap global header, reduced to what replay needs
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PcapFileHeader {
    big_endian: bool,
    snaplen: u32,
    network: i32,
}

/// Size of the legacy pcap global header
const PCAP_FILE_HEADER_LEN: usize = 24;

type RecordParseFn = for<'a> fn(&'a [u8]) -> IResult<&'a [u8], &'a [u8], DecodeError>;

/// Replay source over a legacy pcap stream
///
/// ## Example
///
/// ```rust,no_run
/// use std::fs::File;
/// use frame_parser::{CaptureLoop, PcapReplaySource};
/// # use frame_parser::{DecodedFrame, FrameSink, LayerError};
/// # struct Printer;
/// # impl FrameSink for Printer {
/// #     fn frame(&mut self, frame: &DecodedFrame) { println!("{:?}", frame); }
/// #     fn decode_error(&mut self, error: &LayerError) { eprintln!("{}", error); }
/// # }
///
/// # fn main() {
/// let file = File::open("capture.pcap").unwrap();
/// let source = PcapReplaySource::new(65536, file).expect("not a pcap stream");
/// let stats = CaptureLoop::new(source).run(&mut Printer).unwrap();
/// println!("{} frames", stats.frames);
/// # }
/// ```
pub struct PcapReplaySource<R: Read> {
    header: PcapFileHeader,
    reader: R,
    buffer: Buffer,
    last_offset: usize,
    reader_exhausted: bool,
    parse: RecordParseFn,
}

impl<R: Read> PcapReplaySource<R> {
    /// Create a replay source with the given buffer capacity
    ///
    /// Reads and checks the pcap global header immediately. The capacity
    /// must be large enough for the longest record in the stream; the
    /// stream's snaplen (see [`snaplen`](Self::snaplen)) is an upper bound
    /// when it is set.
    pub fn new(capacity: usize, mut reader: R) -> Result<PcapReplaySource<R>, DecodeError> {
        let mut buffer = Buffer::with_capacity(capacity);
        let sz = reader.read(buffer.space()).or(Err(DecodeError::ReadError))?;
        buffer.fill(sz);
        let header = match parse_file_header(buffer.data()) {
            Ok((_, header)) => header,
            Err(e) => return Err(DecodeError::from_nom(e)),
        };
        if header.network != LINKTYPE_ETHERNET {
            return Err(DecodeError::Malformed("pcap link type is not Ethernet"));
        }
        buffer.consume(PCAP_FILE_HEADER_LEN);
        let parse: RecordParseFn = if header.big_endian {
            parse_record_be
        } else {
            parse_record_le
        };
        Ok(PcapReplaySource {
            header,
            reader,
            buffer,
            last_offset: 0,
            reader_exhausted: false,
            parse,
        })
    }

    /// Maximum captured length per record, as declared by the stream
    pub fn snaplen(&self) -> u32 {
        self.header.snaplen
    }
}

impl<R: Read> FrameSource for PcapReplaySource<R> {
    fn next(&mut self) -> Result<&[u8], DecodeError> {
        if self.buffer.available_data() == 0 && self.reader_exhausted {
            return Err(DecodeError::Eof);
        }
        let data = self.buffer.data();
        match (self.parse)(data) {
            Ok((rem, frame)) => {
                self.last_offset = data.len() - rem.len();
                Ok(frame)
            }
            Err(nom::Err::Incomplete(needed)) => {
                if self.reader_exhausted {
                    // expected more bytes but the reader is done, truncated stream
                    Err(DecodeError::UnexpectedEof)
                } else {
                    match needed {
                        Needed::Size(n) => {
                            if self.buffer.available_data() + n.get() >= self.buffer.capacity() {
                                Err(DecodeError::BufferTooSmall)
                            } else {
                                Err(DecodeError::Incomplete(n.get()))
                            }
                        }
                        Needed::Unknown => Err(DecodeError::Incomplete(0)),
                    }
                }
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        }
    }

    fn consume(&mut self) {
        self.buffer.consume(self.last_offset);
        self.last_offset = 0;
    }

    fn refill(&mut self) -> Result<(), DecodeError> {
        self.buffer.shift();
        let space = self.buffer.space();
        // distinguish a read() returning 0 because of EOF from one where we
        // requested 0 bytes
        if space.is_empty() {
            return Ok(());
        }
        let sz = self.reader.read(space).or(Err(DecodeError::ReadError))?;
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}

/// Read the pcap global header, determining byte order from the magic number
fn parse_file_header(i: &[u8]) -> IResult<&[u8], PcapFileHeader, DecodeError> {
    let (i, magic_number) = le_u32(i)?;
    match magic_number {
        // microsecond and nanosecond timestamp variants; resolution does not
        // matter for replay
        0xa1b2_c3d4 | 0xa1b2_3c4d => {
            let (i, _version_major) = le_u16(i)?;
            let (i, _version_minor) = le_u16(i)?;
            let (i, _thiszone) = le_i32(i)?;
            let (i, _sigfigs) = le_u32(i)?;
            let (i, snaplen) = le_u32(i)?;
            let (i, network) = le_i32(i)?;
            let header = PcapFileHeader {
                big_endian: false,
                snaplen,
                network,
            };
            Ok((i, header))
        }
        0xd4c3_b2a1 | 0x4d3c_b2a1 => {
            let (i, _version_major) = be_u16(i)?;
            let (i, _version_minor) = be_u16(i)?;
            let (i, _thiszone) = be_i32(i)?;
            let (i, _sigfigs) = be_u32(i)?;
            let (i, snaplen) = be_u32(i)?;
            let (i, network) = be_i32(i)?;
            let header = PcapFileHeader {
                big_endian: true,
                snaplen,
                network,
            };
            Ok((i, header))
        }
        _ => Err(nom::Err::Error(DecodeError::HeaderNotRecognized)),
    }
}

/// Read one record header and return the captured frame data
fn parse_record_le(i: &[u8]) -> IResult<&[u8], &[u8], DecodeError> {
    let (i, _ts_sec) = le_u32(i)?;
    let (i, _ts_usec) = le_u32(i)?;
    let (i, caplen) = le_u32(i)?;
    let (i, _origlen) = le_u32(i)?;
    take(caplen as usize)(i)
}

/// Read one record header and return the captured frame data (big-endian)
fn parse_record_be(i: &[u8]) -> IResult<&[u8], &[u8], DecodeError> {
    let (i, _ts_sec) = be_u32(i)?;
    let (i, _ts_usec) = be_u32(i)?;
    let (i, caplen) = be_u32(i)?;
    let (i, _origlen) = be_u32(i)?;
    take(caplen as usize)(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // little-endian header, snaplen 262144, network 1 (Ethernet)
    const PCAP_HDR: &[u8] = &hex!(
        "
d4 c3 b2 a1 02 00 04 00 00 00 00 00 00 00 00 00
00 00 04 00 01 00 00 00"
    );

    #[test]
    fn test_parse_file_header() {
        let (rem, hdr) = parse_file_header(PCAP_HDR).expect("header parsing failed");
        assert!(rem.is_empty());
        assert!(!hdr.big_endian);
        assert_eq!(hdr.snaplen, 262_144);
        assert_eq!(hdr.network, LINKTYPE_ETHERNET);
    }

    #[test]
    fn test_bad_magic() {
        let res = parse_file_header(&hex!("00 11 22 33 44 55 66 77"));
        assert_eq!(
            res,
            Err(nom::Err::Error(DecodeError::HeaderNotRecognized))
        );
    }

    #[test]
    fn test_empty_input() {
        let empty: &[u8] = &[];
        let res = PcapReplaySource::new(1024, empty);
        assert!(matches!(res, Err(DecodeError::Incomplete(_))));
    }

    #[test]
    fn test_non_ethernet_linktype() {
        let mut hdr = PCAP_HDR.to_vec();
        hdr[20] = 101; // LINKTYPE_RAW
        let res = PcapReplaySource::new(1024, &hdr[..]);
        assert_eq!(
            res.err(),
            Some(DecodeError::Malformed("pcap link type is not Ethernet"))
        );
    }

    #[test]
    fn test_parse_record() {
        let record = &hex!(
            "
a2 b5 5c 5a 10 d7 08 00 04 00 00 00 04 00 00 00
de ad be ef 99"
        );
        let (rem, frame) = parse_record_le(record).expect("record parsing failed");
        assert_eq!(frame, &hex!("de ad be ef")[..]);
        assert_eq!(rem, &hex!("99")[..]);
    }
}
