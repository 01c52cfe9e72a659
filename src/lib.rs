//! # Ethernet/IPv4 header parsers
//!
//! This crate contains parsers for the nested protocol headers found in raw
//! link-layer frames: Ethernet, IPv4, and the ICMP, TCP and UDP headers
//! carried inside IPv4 datagrams.
//!
//! It is a decoder only (no packet injection), designed for inspecting live
//! or replayed traffic: each parser consumes the prefix of a byte buffer,
//! returns a typed header record plus the unconsumed remainder, and never
//! copies packet data (zero-copy). Multi-byte fields are read in network
//! byte order, variable-length headers (IPv4 options, TCP options) are
//! skipped using the length encoded in the packet itself, and a truncated
//! buffer is always reported rather than padded.
//!
//! # Example: decoding a single frame
//!
//! ```rust
//! use frame_parser::*;
//! use hex_literal::hex;
//!
//! # fn main() {
//! // Ethernet / IPv4 / TCP, no payload
//! let frame = &hex!(
//!     "
//! 00 1b 21 3c 9d f2 f0 de f1 12 34 56 08 00 45 00
//! 00 28 00 01 00 00 40 06 00 00 c0 a8 01 02 c0 a8
//! 01 03 00 50 01 bb 00 00 00 01 00 00 00 02 50 18
//! 20 00 91 7c 00 00"
//! );
//! let decoded = decode_frame(frame).expect("decoding failed");
//! assert_eq!(decoded.ethernet.ethertype, EtherType::IPV4);
//! match decoded.network {
//!     NetworkData::Ipv4(ip, TransportData::Tcp(tcp, payload)) => {
//!         assert_eq!(ip.protocol, IpProto::TCP);
//!         assert_eq!(tcp.destination_port, 443);
//!         assert!(tcp.flags.ack);
//!         assert!(payload.is_empty());
//!     }
//!     other => panic!("unexpected layers: {:?}", other),
//! }
//! # }
//! ```
//!
//! # Example: capture loop
//!
//! To decode a stream of frames, attach a [`FrameSource`] (live socket, pcap
//! replay, in-memory list) and a [`FrameSink`] (display, reporting) to a
//! [`CaptureLoop`]. A frame that fails to decode is reported with the name
//! of the failing layer and the byte count available at that point, and the
//! loop continues with the next frame. See [`CaptureLoop`] for a complete
//! example, and [`PcapReplaySource`] for replaying a capture file.

mod error;
pub use error::*;

mod ethertype;
mod ipproto;
pub use ethertype::*;
pub use ipproto::*;

pub mod ethernet;
pub mod icmp;
pub mod ipv4;
pub mod tcp;
pub mod udp;
pub use ethernet::*;
pub use icmp::*;
pub use ipv4::*;
pub use tcp::*;
pub use udp::*;

mod decode;
pub use decode::*;

mod capture;
mod replay;
pub use capture::*;
pub use replay::*;
