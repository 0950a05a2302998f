use no_std_net::SocketAddr;

/// Default maximum datagram size; a 1024-byte payload plus
/// headroom for the header, token and options.
///
/// See [RFC7252 section 4.6](https://datatracker.ietf.org/doc/html/rfc7252#section-4.6)
pub const DEFAULT_MTU: usize = 1152;

/// Kind of transport used to reach a peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionType {
  /// Datagrams over UDP (optionally secured by the session)
  Udp,
  /// CoAP over TCP (RFC 8323); not supported
  Tcp,
  /// LoRaWAN; not supported
  LoraWan,
  /// SMS; not supported
  Sms,
}

/// Coarse state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
  /// Not connected
  Disconnected,
  /// Handshake in progress (e.g. DTLS)
  Connecting,
  /// Ready to send & receive
  Connected,
  /// Torn down; the peer owning the session is being deleted
  Undefined,
}

/// Result of receiving a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recvd {
  /// Number of bytes written to the buffer
  pub len: usize,
  /// The datagram did not fit in the buffer and was cut off
  pub truncated: bool,
}

/// A connection to exactly one remote endpoint.
///
/// This is where transport and security (e.g. DTLS) live;
/// `newt` only ever sees plaintext datagrams.
///
/// `send` and `recv` must not block; they yield
/// [`nb::Error::WouldBlock`] when there is nothing to do.
pub trait Session {
  /// The error yielded by session operations
  type Error: ::core::fmt::Debug;

  /// Current state of the session
  fn state(&self) -> SessionState;

  /// Establish the session with a remote address
  fn connect(&mut self, addr: SocketAddr) -> Result<(), Self::Error>;

  /// Tear down the session
  fn disconnect(&mut self) -> Result<(), Self::Error>;

  /// Send one datagram, yielding the number of bytes sent
  fn send(&mut self, dgram: &[u8]) -> nb::Result<usize, Self::Error>;

  /// Pull one datagram into `buf`.
  ///
  /// Bytes that don't fit in `buf` are dropped, and reported with [`Recvd::truncated`].
  fn recv(&mut self, buf: &mut [u8]) -> nb::Result<Recvd, Self::Error>;

  /// Largest datagram this session can send
  fn mtu(&self) -> usize {
    DEFAULT_MTU
  }
}
