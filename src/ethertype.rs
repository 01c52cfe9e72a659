use rusticata_macros::newtype_enum;

/// Ethernet protocol identifier
///
/// The EtherType field of an Ethernet frame identifies the protocol carried
/// in the payload. Values are read in network byte order.
///
/// See <https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EtherType(pub u16);

newtype_enum! {
impl display EtherType {
    IPV4 = 0x0800,
    ARP = 0x0806,
    IPV6 = 0x86dd,
}
}
