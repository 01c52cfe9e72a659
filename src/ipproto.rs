use rusticata_macros::newtype_enum;

/// IP protocol number
///
/// The protocol field of an IPv4 header identifies the next-level protocol
/// carried in the datagram payload.
///
/// See <https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IpProto(pub u8);

newtype_enum! {
impl display IpProto {
    ICMP = 1,
    TCP = 6,
    UDP = 17,
}
}
