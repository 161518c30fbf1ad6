//! Per-protocol decode-and-encode handlers.
//!
//! Each supported protocol has one unit struct implementing
//! [`LayerHandler`]. The struct declares the protocol's record schema and
//! decides whether a given decoded layer is worth a record at all.
//! Handlers are dispatched through [`BuiltinHandler`], an enum over every
//! built-in handler, so the per-packet path never goes through a vtable.

mod application;
mod link;
mod network;
mod transport;

pub use application::{Dhcpv4Handler, Dhcpv6Handler, DnsHandler, NtpHandler, SipHandler};
pub use link::{
    ArpHandler, Dot11Handler, Dot1QHandler, EthernetCtpHandler, EthernetCtpReplyHandler,
    EthernetHandler, LinkLayerDiscoveryHandler, LinkLayerDiscoveryInfoHandler, LlcHandler,
    SnapHandler,
};
pub use network::{
    Icmpv4Handler, Icmpv6EchoHandler, Icmpv6Handler, Icmpv6NeighborAdvertisementHandler,
    Icmpv6NeighborSolicitationHandler, Icmpv6RouterAdvertisementHandler,
    Icmpv6RouterSolicitationHandler, IgmpHandler, Ipv4Handler, Ipv6Handler, Ipv6HopByHopHandler,
};
pub use transport::{SctpHandler, TcpHandler, UdpHandler};

use crate::layer::{DecodedLayer, LayerType};
use crate::record::Record;
use crate::schema::RecordSchema;

/// Capability every protocol encoder implements.
pub trait LayerHandler: Send + Sync {
    /// The layer type this handler encodes.
    fn layer_type(&self) -> LayerType;

    /// The record schema this handler produces.
    fn schema(&self) -> RecordSchema;

    /// Protocol-specific sanity check on a decoded layer.
    ///
    /// Layers failing the check are skipped rather than written.
    fn applies_to(&self, _layer: &DecodedLayer<'_>) -> bool {
        true
    }

    /// Turn a decoded layer into a record.
    ///
    /// Returns `None` for layers that cannot or should not be encoded:
    /// decode errors, a foreign layer type, failed sanity checks, or
    /// missing required columns. `None` is not an error.
    fn encode(&self, layer: &DecodedLayer<'_>, timestamp_us: i64) -> Option<Record> {
        if !layer.is_ok() || layer.layer_type != self.layer_type() || !self.applies_to(layer) {
            return None;
        }
        Record::project(&self.schema(), layer, timestamp_us)
    }
}

/// True if the named field is present and satisfies `check`.
pub(crate) fn field_matches(
    layer: &DecodedLayer<'_>,
    name: &str,
    check: impl FnOnce(u64) -> bool,
) -> bool {
    layer.get_u64(name).map_or(false, check)
}

/// True if the named field is absent, or present and satisfies `check`.
pub(crate) fn field_allows(
    layer: &DecodedLayer<'_>,
    name: &str,
    check: impl FnOnce(u64) -> bool,
) -> bool {
    layer.get_u64(name).map_or(true, check)
}

/// Enum of all built-in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinHandler {
    Tcp(TcpHandler),
    Udp(UdpHandler),
    Ipv4(Ipv4Handler),
    Ipv6(Ipv6Handler),
    Dhcpv4(Dhcpv4Handler),
    Dhcpv6(Dhcpv6Handler),
    Icmpv4(Icmpv4Handler),
    Icmpv6(Icmpv6Handler),
    Icmpv6Echo(Icmpv6EchoHandler),
    Icmpv6NeighborSolicitation(Icmpv6NeighborSolicitationHandler),
    Icmpv6RouterSolicitation(Icmpv6RouterSolicitationHandler),
    Dns(DnsHandler),
    Arp(ArpHandler),
    Ethernet(EthernetHandler),
    Dot1Q(Dot1QHandler),
    Dot11(Dot11Handler),
    Ntp(NtpHandler),
    Sip(SipHandler),
    Igmp(IgmpHandler),
    Llc(LlcHandler),
    Ipv6HopByHop(Ipv6HopByHopHandler),
    Sctp(SctpHandler),
    Snap(SnapHandler),
    LinkLayerDiscovery(LinkLayerDiscoveryHandler),
    Icmpv6NeighborAdvertisement(Icmpv6NeighborAdvertisementHandler),
    Icmpv6RouterAdvertisement(Icmpv6RouterAdvertisementHandler),
    EthernetCtp(EthernetCtpHandler),
    EthernetCtpReply(EthernetCtpReplyHandler),
    LinkLayerDiscoveryInfo(LinkLayerDiscoveryInfoHandler),
}

impl BuiltinHandler {
    /// Static dispatch table: the handler for each layer type.
    pub const fn for_layer(layer_type: LayerType) -> Self {
        match layer_type {
            LayerType::Tcp => BuiltinHandler::Tcp(TcpHandler),
            LayerType::Udp => BuiltinHandler::Udp(UdpHandler),
            LayerType::Ipv4 => BuiltinHandler::Ipv4(Ipv4Handler),
            LayerType::Ipv6 => BuiltinHandler::Ipv6(Ipv6Handler),
            LayerType::Dhcpv4 => BuiltinHandler::Dhcpv4(Dhcpv4Handler),
            LayerType::Dhcpv6 => BuiltinHandler::Dhcpv6(Dhcpv6Handler),
            LayerType::Icmpv4 => BuiltinHandler::Icmpv4(Icmpv4Handler),
            LayerType::Icmpv6 => BuiltinHandler::Icmpv6(Icmpv6Handler),
            LayerType::Icmpv6Echo => BuiltinHandler::Icmpv6Echo(Icmpv6EchoHandler),
            LayerType::Icmpv6NeighborSolicitation => {
                BuiltinHandler::Icmpv6NeighborSolicitation(Icmpv6NeighborSolicitationHandler)
            }
            LayerType::Icmpv6RouterSolicitation => {
                BuiltinHandler::Icmpv6RouterSolicitation(Icmpv6RouterSolicitationHandler)
            }
            LayerType::Dns => BuiltinHandler::Dns(DnsHandler),
            LayerType::Arp => BuiltinHandler::Arp(ArpHandler),
            LayerType::Ethernet => BuiltinHandler::Ethernet(EthernetHandler),
            LayerType::Dot1Q => BuiltinHandler::Dot1Q(Dot1QHandler),
            LayerType::Dot11 => BuiltinHandler::Dot11(Dot11Handler),
            LayerType::Ntp => BuiltinHandler::Ntp(NtpHandler),
            LayerType::Sip => BuiltinHandler::Sip(SipHandler),
            LayerType::Igmp => BuiltinHandler::Igmp(IgmpHandler),
            LayerType::Llc => BuiltinHandler::Llc(LlcHandler),
            LayerType::Ipv6HopByHop => BuiltinHandler::Ipv6HopByHop(Ipv6HopByHopHandler),
            LayerType::Sctp => BuiltinHandler::Sctp(SctpHandler),
            LayerType::Snap => BuiltinHandler::Snap(SnapHandler),
            LayerType::LinkLayerDiscovery => {
                BuiltinHandler::LinkLayerDiscovery(LinkLayerDiscoveryHandler)
            }
            LayerType::Icmpv6NeighborAdvertisement => {
                BuiltinHandler::Icmpv6NeighborAdvertisement(Icmpv6NeighborAdvertisementHandler)
            }
            LayerType::Icmpv6RouterAdvertisement => {
                BuiltinHandler::Icmpv6RouterAdvertisement(Icmpv6RouterAdvertisementHandler)
            }
            LayerType::EthernetCtp => BuiltinHandler::EthernetCtp(EthernetCtpHandler),
            LayerType::EthernetCtpReply => {
                BuiltinHandler::EthernetCtpReply(EthernetCtpReplyHandler)
            }
            LayerType::LinkLayerDiscoveryInfo => {
                BuiltinHandler::LinkLayerDiscoveryInfo(LinkLayerDiscoveryInfoHandler)
            }
        }
    }
}

/// Macro to delegate LayerHandler trait methods to inner types.
macro_rules! delegate_handler {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinHandler::Tcp(h) => h.$method($($arg),*),
            BuiltinHandler::Udp(h) => h.$method($($arg),*),
            BuiltinHandler::Ipv4(h) => h.$method($($arg),*),
            BuiltinHandler::Ipv6(h) => h.$method($($arg),*),
            BuiltinHandler::Dhcpv4(h) => h.$method($($arg),*),
            BuiltinHandler::Dhcpv6(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv4(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6Echo(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6NeighborSolicitation(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6RouterSolicitation(h) => h.$method($($arg),*),
            BuiltinHandler::Dns(h) => h.$method($($arg),*),
            BuiltinHandler::Arp(h) => h.$method($($arg),*),
            BuiltinHandler::Ethernet(h) => h.$method($($arg),*),
            BuiltinHandler::Dot1Q(h) => h.$method($($arg),*),
            BuiltinHandler::Dot11(h) => h.$method($($arg),*),
            BuiltinHandler::Ntp(h) => h.$method($($arg),*),
            BuiltinHandler::Sip(h) => h.$method($($arg),*),
            BuiltinHandler::Igmp(h) => h.$method($($arg),*),
            BuiltinHandler::Llc(h) => h.$method($($arg),*),
            BuiltinHandler::Ipv6HopByHop(h) => h.$method($($arg),*),
            BuiltinHandler::Sctp(h) => h.$method($($arg),*),
            BuiltinHandler::Snap(h) => h.$method($($arg),*),
            BuiltinHandler::LinkLayerDiscovery(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6NeighborAdvertisement(h) => h.$method($($arg),*),
            BuiltinHandler::Icmpv6RouterAdvertisement(h) => h.$method($($arg),*),
            BuiltinHandler::EthernetCtp(h) => h.$method($($arg),*),
            BuiltinHandler::EthernetCtpReply(h) => h.$method($($arg),*),
            BuiltinHandler::LinkLayerDiscoveryInfo(h) => h.$method($($arg),*),
        }
    };
}

impl LayerHandler for BuiltinHandler {
    #[inline]
    fn layer_type(&self) -> LayerType {
        delegate_handler!(self, layer_type)
    }

    #[inline]
    fn schema(&self) -> RecordSchema {
        delegate_handler!(self, schema)
    }

    #[inline]
    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        delegate_handler!(self, applies_to, layer)
    }

    #[inline]
    fn encode(&self, layer: &DecodedLayer<'_>, timestamp_us: i64) -> Option<Record> {
        delegate_handler!(self, encode, layer, timestamp_us)
    }
}
