//! Decoded protocol layers handed to encoders.
//!
//! The packet-decoding library upstream produces one [`DecodedLayer`] per
//! protocol header it recognizes. Field values borrow from the packet
//! buffer wherever possible, so handing a layer to an encoder copies
//! nothing until a record is actually written.

mod decoded;
mod field;

pub use decoded::{DecodedLayer, FieldEntry};
pub use field::FieldValue;

/// Identifier of a protocol layer that can be encoded.
///
/// The declaration order is the catalog order: encoders are resolved,
/// built and reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum LayerType {
    Tcp,
    Udp,
    Ipv4,
    Ipv6,
    Dhcpv4,
    Dhcpv6,
    Icmpv4,
    Icmpv6,
    Icmpv6Echo,
    Icmpv6NeighborSolicitation,
    Icmpv6RouterSolicitation,
    Dns,
    Arp,
    Ethernet,
    Dot1Q,
    Dot11,
    Ntp,
    Sip,
    Igmp,
    Llc,
    Ipv6HopByHop,
    Sctp,
    Snap,
    LinkLayerDiscovery,
    Icmpv6NeighborAdvertisement,
    Icmpv6RouterAdvertisement,
    EthernetCtp,
    EthernetCtpReply,
    LinkLayerDiscoveryInfo,
}

impl LayerType {
    /// Number of layer types.
    pub const COUNT: usize = 29;

    /// Every layer type, in catalog order.
    pub const ALL: [LayerType; Self::COUNT] = [
        LayerType::Tcp,
        LayerType::Udp,
        LayerType::Ipv4,
        LayerType::Ipv6,
        LayerType::Dhcpv4,
        LayerType::Dhcpv6,
        LayerType::Icmpv4,
        LayerType::Icmpv6,
        LayerType::Icmpv6Echo,
        LayerType::Icmpv6NeighborSolicitation,
        LayerType::Icmpv6RouterSolicitation,
        LayerType::Dns,
        LayerType::Arp,
        LayerType::Ethernet,
        LayerType::Dot1Q,
        LayerType::Dot11,
        LayerType::Ntp,
        LayerType::Sip,
        LayerType::Igmp,
        LayerType::Llc,
        LayerType::Ipv6HopByHop,
        LayerType::Sctp,
        LayerType::Snap,
        LayerType::LinkLayerDiscovery,
        LayerType::Icmpv6NeighborAdvertisement,
        LayerType::Icmpv6RouterAdvertisement,
        LayerType::EthernetCtp,
        LayerType::EthernetCtpReply,
        LayerType::LinkLayerDiscoveryInfo,
    ];

    /// Encoder name, used in configuration and output file names.
    pub fn name(&self) -> &'static str {
        match self {
            LayerType::Tcp => "TCP",
            LayerType::Udp => "UDP",
            LayerType::Ipv4 => "IPv4",
            LayerType::Ipv6 => "IPv6",
            LayerType::Dhcpv4 => "DHCPv4",
            LayerType::Dhcpv6 => "DHCPv6",
            LayerType::Icmpv4 => "ICMPv4",
            LayerType::Icmpv6 => "ICMPv6",
            LayerType::Icmpv6Echo => "ICMPv6Echo",
            LayerType::Icmpv6NeighborSolicitation => "ICMPv6NeighborSolicitation",
            LayerType::Icmpv6RouterSolicitation => "ICMPv6RouterSolicitation",
            LayerType::Dns => "DNS",
            LayerType::Arp => "ARP",
            LayerType::Ethernet => "Ethernet",
            LayerType::Dot1Q => "Dot1Q",
            LayerType::Dot11 => "Dot11",
            LayerType::Ntp => "NTP",
            LayerType::Sip => "SIP",
            LayerType::Igmp => "IGMP",
            LayerType::Llc => "LLC",
            LayerType::Ipv6HopByHop => "IPv6HopByHop",
            LayerType::Sctp => "SCTP",
            LayerType::Snap => "SNAP",
            LayerType::LinkLayerDiscovery => "LinkLayerDiscovery",
            LayerType::Icmpv6NeighborAdvertisement => "ICMPv6NeighborAdvertisement",
            LayerType::Icmpv6RouterAdvertisement => "ICMPv6RouterAdvertisement",
            LayerType::EthernetCtp => "EthernetCTP",
            LayerType::EthernetCtpReply => "EthernetCTPReply",
            LayerType::LinkLayerDiscoveryInfo => "LinkLayerDiscoveryInfo",
        }
    }

    /// Look up a layer type by its encoder name (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Position in catalog order, usable as a table index.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
