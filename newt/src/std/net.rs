use ::std::io;
use ::std::net::UdpSocket;

use no_std_net::SocketAddr;

use crate::net::{Recvd, Session, SessionState, DEFAULT_MTU};

pub(crate) fn io_to_nb(err: io::Error) -> nb::Error<io::Error> {
  match err.kind() {
    | io::ErrorKind::WouldBlock => nb::Error::WouldBlock,
    | _ => nb::Error::Other(err),
  }
}

pub(crate) mod convert {
  use ::std::net as yes_std;

  use no_std_net as no_std;

  pub(crate) fn to_std(addr: no_std::SocketAddr) -> yes_std::SocketAddr {
    match addr {
      | no_std::SocketAddr::V4(v4) => {
        let ip = yes_std::Ipv4Addr::from(v4.ip().octets());
        yes_std::SocketAddr::V4(yes_std::SocketAddrV4::new(ip, v4.port()))
      },
      | no_std::SocketAddr::V6(v6) => {
        let ip = yes_std::Ipv6Addr::from(v6.ip().octets());
        yes_std::SocketAddr::V6(yes_std::SocketAddrV6::new(ip,
                                                           v6.port(),
                                                           v6.flowinfo(),
                                                           v6.scope_id()))
      },
    }
  }

  pub(crate) fn from_std(addr: yes_std::SocketAddr) -> no_std::SocketAddr {
    match addr {
      | yes_std::SocketAddr::V4(v4) => {
        let ip = no_std::Ipv4Addr::from(v4.ip().octets());
        no_std::SocketAddr::V4(no_std::SocketAddrV4::new(ip, v4.port()))
      },
      | yes_std::SocketAddr::V6(v6) => {
        let ip = no_std::Ipv6Addr::from(v6.ip().octets());
        no_std::SocketAddr::V6(no_std::SocketAddrV6::new(ip,
                                                         v6.port(),
                                                         v6.flowinfo(),
                                                         v6.scope_id()))
      },
    }
  }
}

/// A [`Session`] over a connected, non-blocking [`UdpSocket`]
///
/// ```no_run
/// use newt::net::{ConnectionType, Session};
/// use newt::std::{Clock, UdpSession};
/// use newt::Context;
///
/// let mut ctx = Context::new(Clock::new(), Default::default());
/// let session = UdpSession::new("0.0.0.0:0".parse().unwrap());
/// let peer = ctx.connect("127.0.0.1:5683".parse().unwrap(), ConnectionType::Udp, session)
///               .unwrap();
/// ```
#[derive(Debug)]
pub struct UdpSession {
  bind: SocketAddr,
  sock: Option<UdpSocket>,
  state: SessionState,
  mtu: usize,
  scratch: Vec<u8>,
}

fn not_connected() -> io::Error {
  io::Error::new(io::ErrorKind::NotConnected, "session is not connected")
}

impl UdpSession {
  /// Create a session that will bind to `bind` when connected
  pub fn new(bind: SocketAddr) -> Self {
    Self { bind,
           sock: None,
           state: SessionState::Disconnected,
           mtu: DEFAULT_MTU,
           scratch: Vec::new() }
  }

  /// Override the MTU (default [`DEFAULT_MTU`])
  pub fn with_mtu(self, mtu: usize) -> Self {
    Self { mtu, ..self }
  }

  /// The local address, once connected
  pub fn local_addr(&self) -> Option<SocketAddr> {
    self.sock
        .as_ref()
        .and_then(|s| s.local_addr().ok())
        .map(convert::from_std)
  }

  fn sock(&self) -> Result<&UdpSocket, io::Error> {
    self.sock.as_ref().ok_or_else(not_connected)
  }
}

impl Session for UdpSession {
  type Error = io::Error;

  fn state(&self) -> SessionState {
    self.state
  }

  fn connect(&mut self, addr: SocketAddr) -> Result<(), io::Error> {
    self.state = SessionState::Connecting;

    let sock = match self.sock.take() {
                 | Some(sock) => Ok(sock),
                 | None => UdpSocket::bind(convert::to_std(self.bind)).and_then(|sock| {
                                                                          sock.set_nonblocking(true)?;
                                                                          Ok(sock)
                                                                        }),
               };
    let sock = sock.and_then(|sock| sock.connect(convert::to_std(addr)).map(|_| sock));

    match sock {
      | Ok(sock) => {
        self.sock = Some(sock);
        self.state = SessionState::Connected;
        Ok(())
      },
      | Err(e) => {
        self.state = SessionState::Undefined;
        Err(e)
      },
    }
  }

  fn disconnect(&mut self) -> Result<(), io::Error> {
    self.sock = None;
    self.state = SessionState::Disconnected;
    Ok(())
  }

  fn send(&mut self, dgram: &[u8]) -> nb::Result<usize, io::Error> {
    self.sock()
        .map_err(nb::Error::Other)?
        .send(dgram)
        .map_err(io_to_nb)
  }

  /// Datagrams longer than `buf` are cut off and flagged `truncated`;
  /// one that exactly fills `buf` is not.
  fn recv(&mut self, buf: &mut [u8]) -> nb::Result<Recvd, io::Error> {
    // one spare byte tells a full buffer apart from an overflowing one
    self.scratch.resize(buf.len() + 1, 0);

    let sock = self.sock.as_ref().ok_or_else(not_connected).map_err(nb::Error::Other)?;
    let len = sock.recv(&mut self.scratch).map_err(io_to_nb)?;

    let kept = len.min(buf.len());
    buf[..kept].copy_from_slice(&self.scratch[..kept]);
    Ok(Recvd { len: kept,
               truncated: len > buf.len() })
  }

  fn mtu(&self) -> usize {
    self.mtu
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn addr_conversion() {
    let addr: SocketAddr = "192.168.0.1:5683".parse().unwrap();
    assert_eq!(convert::to_std(addr), "192.168.0.1:5683".parse().unwrap());
    assert_eq!(convert::from_std(convert::to_std(addr)), addr);

    let addr: SocketAddr = "[::1]:5684".parse().unwrap();
    assert_eq!(convert::from_std(convert::to_std(addr)), addr);
  }

  fn recv_eventually(sess: &mut UdpSession, buf: &mut [u8]) -> Option<Recvd> {
    (0..100).find_map(|_| match sess.recv(buf) {
              | Ok(r) => Some(r),
              | Err(_) => {
                ::std::thread::sleep(::std::time::Duration::from_millis(10));
                None
              },
            })
  }

  #[test]
  fn loopback() {
    let mut a = UdpSession::new("127.0.0.1:0".parse().unwrap());
    let mut b = UdpSession::new("127.0.0.1:0".parse().unwrap());

    match a.send(&[1]) {
      | Err(nb::Error::Other(e)) => assert_eq!(e.kind(), io::ErrorKind::NotConnected),
      | other => panic!("{:?}", other),
    }

    a.connect("127.0.0.1:9".parse().unwrap()).unwrap();
    b.connect(a.local_addr().unwrap()).unwrap();
    a.connect(b.local_addr().unwrap()).unwrap();
    assert_eq!(a.state(), SessionState::Connected);

    let mut buf = [0u8; 8];
    assert!(matches!(a.recv(&mut buf), Err(nb::Error::WouldBlock)));

    b.send(&[1, 2, 3]).unwrap();

    assert_eq!(recv_eventually(&mut a, &mut buf),
               Some(Recvd { len: 3,
                            truncated: false }));
    assert_eq!(&buf[..3], &[1, 2, 3]);

    b.send(&[7; 8]).unwrap();
    assert_eq!(recv_eventually(&mut a, &mut buf),
               Some(Recvd { len: 8,
                            truncated: false }));
    assert_eq!(buf, [7; 8]);

    b.send(&[9; 9]).unwrap();
    assert_eq!(recv_eventually(&mut a, &mut buf),
               Some(Recvd { len: 8,
                            truncated: true }));
    assert_eq!(buf, [9; 8]);

    a.disconnect().unwrap();
    assert_eq!(a.state(), SessionState::Disconnected);
    assert_eq!(a.local_addr(), None);
  }
}
