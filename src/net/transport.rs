//! Transport-layer metadata carried by packets.

/// Packet transport metadata.
///
/// `Packet` is a network-layer carrier; transport metadata enables
/// protocol simulation without coupling the network to protocol
/// implementations.
#[derive(Debug, Clone, Default)]
pub enum Transport {
    /// No transport metadata (default).
    #[default]
    None,
    /// TCP-like segment (simplified).
    Tcp(TcpSegment),
}

/// TCP-like segment (minimal fields for simulation).
#[derive(Debug, Clone)]
pub enum TcpSegment {
    /// Data segment: `seq` is byte sequence number, `len` is payload bytes.
    Data { seq: u64, len: u32 },
    /// ACK segment: `ack` is next expected byte (cumulative); `ece`
    /// echoes the receiver's congestion-experienced state.
    Ack { ack: u64, ece: bool },
}
