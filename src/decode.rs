//! Layered frame decoding
//!
//! Drives the parsers from [`crate::ethernet`] downward: raw bytes are split
//! into an Ethernet header and payload; an IPv4 payload is split again into a
//! datagram header and payload; the IP protocol number then selects the
//! ICMP, TCP or UDP parser, any other value falling through to an opaque
//! remainder. Every step is a pure function of its input buffer, and a
//! failure at any layer aborts decoding of that frame only.

use nom::IResult;

use crate::error::{DecodeError, Layer, LayerError};
use crate::ethernet::{parse_ethernet_header, EthernetHeader};
use crate::ethertype::EtherType;
use crate::icmp::{parse_icmp_header, IcmpHeader};
use crate::ipproto::IpProto;
use crate::ipv4::{parse_ipv4_header, Ipv4Header};
use crate::tcp::{parse_tcp_header, TcpHeader};
use crate::udp::{parse_udp_header, UdpHeader};

/// Transport-layer content of an IPv4 datagram
///
/// The slice in each variant is the unconsumed remainder after the header,
/// passed through unmodified for display or further inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportData<'a> {
    Icmp(IcmpHeader, &'a [u8]),
    Tcp(TcpHeader, &'a [u8]),
    Udp(UdpHeader, &'a [u8]),
    /// Protocol number with no decoder; payload returned unchanged
    Opaque(&'a [u8]),
}

/// Network-layer content of an Ethernet frame
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkData<'a> {
    Ipv4(Ipv4Header, TransportData<'a>),
    /// Non-IPv4 EtherType; payload returned unchanged
    Opaque(EtherType, &'a [u8]),
}

/// A fully decoded frame: the Ethernet header plus whatever deeper layers
/// could be decoded from its payload
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedFrame<'a> {
    pub ethernet: EthernetHeader,
    pub network: NetworkData<'a>,
}

/// Decode a raw link-layer frame through all applicable layers
///
/// On failure, the returned [`LayerError`] names the layer that failed and
/// the number of bytes that were available to it.
pub fn decode_frame(frame: &[u8]) -> Result<DecodedFrame<'_>, LayerError> {
    let (payload, ethernet) = run_layer(Layer::Ethernet, frame, parse_ethernet_header)?;
    let network = match ethernet.ethertype {
        EtherType::IPV4 => {
            let (payload, ipv4) = run_layer(Layer::Ipv4, payload, parse_ipv4_header)?;
            let transport = decode_transport(ipv4.protocol, payload)?;
            NetworkData::Ipv4(ipv4, transport)
        }
        ethertype => NetworkData::Opaque(ethertype, payload),
    };
    Ok(DecodedFrame { ethernet, network })
}

/// Route an IPv4 payload to the parser for its protocol number
///
/// ICMP (1), TCP (6) and UDP (17) are decoded; any other protocol number
/// returns `Opaque` with the payload unchanged. Failures of the delegated
/// parser are propagated.
pub fn decode_transport(
    protocol: IpProto,
    payload: &[u8],
) -> Result<TransportData<'_>, LayerError> {
    match protocol {
        IpProto::ICMP => run_layer(Layer::Icmp, payload, parse_icmp_header)
            .map(|(rem, header)| TransportData::Icmp(header, rem)),
        IpProto::TCP => run_layer(Layer::Tcp, payload, parse_tcp_header)
            .map(|(rem, header)| TransportData::Tcp(header, rem)),
        IpProto::UDP => run_layer(Layer::Udp, payload, parse_udp_header)
            .map(|(rem, header)| TransportData::Udp(header, rem)),
        _ => Ok(TransportData::Opaque(payload)),
    }
}

fn run_layer<'a, O, F>(layer: Layer, i: &'a [u8], parser: F) -> Result<(&'a [u8], O), LayerError>
where
    F: Fn(&'a [u8]) -> IResult<&'a [u8], O, DecodeError>,
{
    parser(i).map_err(|e| LayerError::new(layer, i.len(), e))
}
