use ::core::fmt;

use embedded_time::duration::Milliseconds;
use newt_msg::opt::known::no_repeat::SIZE1;
use newt_msg::{parse_header,
               Code,
               CodeKind,
               Header,
               Id,
               Message,
               Opt,
               Token,
               TryFromBytes,
               TryIntoBytes,
               Type};
use no_std_net::SocketAddr;
use std_alloc::boxed::Box;
use std_alloc::vec::Vec;

mod error;
#[doc(inline)]
pub use error::*;

mod exchange;
mod peer;
mod transaction;


use exchange::Exchange;
use peer::Peer;
use transaction::{AckEntry, Completion, Transaction};

use crate::config::Config;
use crate::logging::{msg_summary, TARGET};
use crate::net::{ConnectionType, Recvd, Session, SessionState};
use crate::retry::{RetryTimer, YouShould};
use crate::time::{self, Clock, Millis};

/// Identifies a peer within a [`Context`]
///
/// Ids are never reused, so a stale id held by a callback
/// simply stops resolving once the peer is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(u32);

/// Invoked exactly once when a message we sent is resolved.
///
/// The [`Code`] is the code of the reply, [`Code::REQUEST_ENTITY_TOO_LARGE`]
/// when the reply was truncated, or [`Code::SERVICE_UNAVAILABLE`] with no
/// message when the peer never answered or was deleted.
pub type Callback<C, S> = Box<dyn FnOnce(&mut Context<C, S>, PeerId, Code, Option<&Message<'_>>)>;

/// Invoked for every request a peer sends us
pub type RequestHandler<C, S> = Box<dyn FnMut(&mut Context<C, S>, PeerId, &Message<'_>)>;

/// A message that was handed to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
  /// The id assigned to the message
  pub id: Id,
  /// The token of the message (possibly generated)
  pub token: Token,
}

/// The CoAP message engine
///
/// Owns every peer and everything in flight with them.
/// Nothing here blocks or spawns; see [`Context::step`].
pub struct Context<C: Clock, S: Session> {
  clock: C,
  config: Config,
  peers: Vec<Peer<C, S>>,
  next_peer_id: u32,
  /// Millis; the soonest deadline noticed since the last `step`
  timeout: Option<u64>,
  waker: Option<Box<dyn FnMut()>>,
}

impl<C: Clock, S: Session> fmt::Debug for Context<C, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Context")
     .field("config", &self.config)
     .field("peers", &self.peers)
     .field("timeout", &self.timeout)
     .finish_non_exhaustive()
  }
}

impl<C: Clock, S: Session> Context<C, S> {
  /// Create a context with no peers
  pub fn new(clock: C, config: Config) -> Self {
    Self { clock,
           config,
           peers: Vec::new(),
           next_peer_id: 0,
           timeout: None,
           waker: None }
  }

  /// The runtime config
  pub fn config(&self) -> Config {
    self.config
  }

  /// The clock
  pub fn clock(&self) -> &C {
    &self.clock
  }

  /// Set a function to invoke when a new Confirmable message
  /// makes the next deadline sooner than the host may be waiting for.
  ///
  /// The host should call [`Context::step`] soon after.
  pub fn set_waker(&mut self, waker: impl FnMut() + 'static) {
    self.waker = Some(Box::new(waker));
  }

  /// Ids of every peer
  pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
    self.peers.iter().map(|p| p.id)
  }

  /// State of a peer's session, or `None` if the peer does not exist
  pub fn peer_state(&self, peer: PeerId) -> Option<SessionState> {
    self.peer(peer).map(|p| p.session.state())
  }

  /// Address of a peer
  pub fn peer_addr(&self, peer: PeerId) -> Option<SocketAddr> {
    self.peer(peer).map(|p| p.addr)
  }

  /// Connection type of a peer
  pub fn peer_type(&self, peer: PeerId) -> Option<ConnectionType> {
    self.peer(peer).map(|p| p.ty)
  }

  /// Borrow a peer's session
  pub fn session(&self, peer: PeerId) -> Option<&S> {
    self.peer(peer).map(|p| &p.session)
  }

  /// Mutably borrow a peer's session
  pub fn session_mut(&mut self, peer: PeerId) -> Option<&mut S> {
    self.peer_mut(peer).map(|p| &mut p.session)
  }

  fn peer(&self, peer: PeerId) -> Option<&Peer<C, S>> {
    self.peers.iter().find(|p| p.id == peer)
  }

  fn peer_mut(&mut self, peer: PeerId) -> Option<&mut Peer<C, S>> {
    self.peers.iter_mut().find(|p| p.id == peer)
  }

  fn now(&self, when: When) -> Result<u64, Error> {
    time::since_epoch(&self.clock).map(|Milliseconds(ms)| ms)
                                  .ok_or(when.what(What::ClockError))
  }

  fn tighten(&mut self, ms: u64) {
    self.timeout = Some(self.timeout.map_or(ms, |t| t.min(ms)));
  }

  /// Create a peer and connect its session.
  ///
  /// Only [`ConnectionType::Udp`] is supported; other types
  /// fail with [`What::NotImplemented`].
  pub fn connect(&mut self,
                 addr: SocketAddr,
                 ty: ConnectionType,
                 mut session: S)
                 -> Result<PeerId, Error> {
    if ty != ConnectionType::Udp {
      return Err(When::Connecting.what(What::NotImplemented(ty)));
    }

    session.connect(addr).map_err(|e| {
                            log::warn!(target: TARGET, "connecting to {} failed: {:?}", addr, e);
                            When::Connecting.what(What::SessionError)
                          })?;

    let id = PeerId(self.next_peer_id);
    self.next_peer_id = self.next_peer_id.wrapping_add(1);
    self.peers
        .push(Peer::new(id, addr, ty, session, self.config.first_message_id));

    log::debug!(target: TARGET, "{:?} created for {}", id, addr);
    Ok(id)
  }

  /// Connect an existing peer's session again
  pub fn reconnect(&mut self, peer: PeerId) -> Result<(), Error> {
    let when = When::Connecting;
    let p = self.peer_mut(peer)
                .ok_or(when.what(What::NoSuchPeer(peer)))?;
    let addr = p.addr;
    p.session.connect(addr).map_err(|e| {
                              log::warn!(target: TARGET, "reconnecting {:?} failed: {:?}", peer, e);
                              when.what(What::SessionError)
                            })
  }

  /// Disconnect a peer's session, keeping the peer and
  /// everything in flight with it
  pub fn disconnect(&mut self, peer: PeerId) -> Result<(), Error> {
    let when = When::Disconnecting(peer);
    let p = self.peer_mut(peer)
                .ok_or(when.what(What::NoSuchPeer(peer)))?;
    p.session.disconnect().map_err(|e| {
                            log::warn!(target: TARGET, "disconnecting {:?} failed: {:?}", peer, e);
                            when.what(What::SessionError)
                          })
  }

  /// Set the function invoked for requests from a peer
  pub fn set_request_handler(&mut self,
                             peer: PeerId,
                             handler: impl FnMut(&mut Self, PeerId, &Message<'_>) + 'static)
                             -> Result<(), Error> {
    let p = self.peer_mut(peer)
                .ok_or(When::Receiving(peer).what(What::NoSuchPeer(peer)))?;
    p.on_request = Some(Box::new(handler));
    Ok(())
  }

  /// Delete a peer.
  ///
  /// The session is disconnected, and every callback still waiting on the
  /// peer is invoked with [`Code::SERVICE_UNAVAILABLE`] and no message.
  pub fn delete_peer(&mut self, peer: PeerId) -> Result<(), Error> {
    let when = When::Disconnecting(peer);
    let ix = self.peers
                 .iter()
                 .position(|p| p.id == peer)
                 .ok_or(when.what(What::NoSuchPeer(peer)))?;
    let mut p = self.peers.remove(ix);

    if let Err(e) = p.session.disconnect() {
      log::warn!(target: TARGET, "disconnecting {:?} failed: {:?}", peer, e);
    }

    log::debug!(target: TARGET,
                "deleting {:?} with {} exchanges and {} transactions pending",
                peer,
                p.exchanges.len(),
                p.transactions.len());

    let exchanges = ::core::mem::take(&mut p.exchanges);
    let transactions = ::core::mem::take(&mut p.transactions);
    drop(p);

    exchanges.into_iter()
             .for_each(|ex| (ex.callback)(self, peer, Code::SERVICE_UNAVAILABLE, None));
    transactions.into_iter().for_each(|tx| {
                              if let Completion::Callback(cb) = tx.completion {
                                cb(self, peer, Code::SERVICE_UNAVAILABLE, None)
                              }
                            });

    Ok(())
  }

  /// Delete every peer
  pub fn close(&mut self) {
    let ids = self.peers().collect::<Vec<_>>();
    ids.into_iter().for_each(|id| {
                     self.delete_peer(id).ok();
                   });
  }

  /// Generate a token of `len` bytes (at most 8) for a request to `peer`,
  /// seeded by the peer's address, `salt` and the current time.
  ///
  /// The token is perturbed until it differs from the token of every
  /// request awaiting a response from the peer. If every value of that
  /// length is taken, the last candidate is returned anyway.
  pub fn generate_token(&self, peer: PeerId, len: u8, salt: &[u8]) -> Result<Token, Error> {
    let when = When::GeneratingToken(peer);
    let now = self.now(when)?;
    let p = self.peer(peer).ok_or(when.what(What::NoSuchPeer(peer)))?;

    let mut seed = Vec::with_capacity(16 + 2 + salt.len() + 8);
    match p.addr {
      | SocketAddr::V4(addr) => seed.extend(addr.ip().octets()),
      | SocketAddr::V6(addr) => seed.extend(addr.ip().octets()),
    }
    seed.extend(p.addr.port().to_be_bytes());
    seed.extend_from_slice(salt);
    seed.extend(now.to_be_bytes());

    let mut token = Token::opaque(&seed);
    token.0.truncate((len as usize).min(8));

    for _ in 0..=p.exchanges.len() {
      if !p.exchanges.iter().any(|ex| ex.token == token) {
        break;
      }

      exchange::increment(&mut token.0);
    }

    Ok(token)
  }

  /// Send a message to a peer.
  ///
  /// Confirmable and Non-confirmable messages get the peer's next message id;
  /// ACKs and RSTs keep theirs. A request sent with a callback and
  /// no token gets a generated token, and the callback is invoked with
  /// the response. Any other message sent with a callback invokes it:
  /// - when a Confirmable message is acknowledged or reset,
  /// - immediately for everything else.
  ///
  /// Confirmable messages are retransmitted until acknowledged;
  /// if that never happens the callback gets [`Code::SERVICE_UNAVAILABLE`].
  ///
  /// A message larger than the session's MTU is not sent and fails with
  /// [`What::TooLarge`]; if it was a response, a 4.13 response
  /// is sent in its place.
  ///
  /// When this returns `Err`, the callback is dropped without being invoked.
  pub fn send(&mut self,
              peer: PeerId,
              mut msg: Message<'_>,
              callback: Option<Callback<C, S>>)
              -> Result<Sent, Error> {
    let cfg = self.config;
    let p = self.peer_mut(peer)
                .ok_or(When::SendingMessage(peer, msg.id).what(What::NoSuchPeer(peer)))?;

    if matches!(msg.ty, Type::Con | Type::Non) {
      msg.id = p.next_id();
    }

    let when = When::SendingMessage(peer, msg.id);
    let expects_response = msg.is_request() && callback.is_some();

    if expects_response && p.exchanges.len() >= cfg.max_exchanges {
      return Err(when.what(What::TooManyExchanges));
    }

    if expects_response && msg.token.0.is_empty() {
      msg.token = self.generate_token(peer, cfg.token_len, &msg.id.0.to_be_bytes())?;
    }

    self.transmit(peer, msg, callback, expects_response)
  }

  /// Send an empty Confirmable message to check that a peer is alive.
  ///
  /// The callback gets the code of the ACK or RST,
  /// or [`Code::SERVICE_UNAVAILABLE`] if the peer never answers.
  pub fn ping(&mut self, peer: PeerId, callback: Callback<C, S>) -> Result<Sent, Error> {
    let msg = Message::new(Type::Con, Code::EMPTY, Id(0), Token::default());
    self.send(peer, msg, Some(callback))
  }

  fn transmit(&mut self,
              peer: PeerId,
              msg: Message<'_>,
              callback: Option<Callback<C, S>>,
              expects_response: bool)
              -> Result<Sent, Error> {
    let when = When::SendingMessage(peer, msg.id);
    let cfg = self.config;

    let bytes = (&msg).try_into_bytes()
                      .map_err(|e| when.what(What::ToBytes(e)))?;

    let mtu = self.peer(peer)
                  .map(|p| p.session.mtu())
                  .ok_or(when.what(What::NoSuchPeer(peer)))?;
    if bytes.len() > mtu {
      log::warn!(target: TARGET,
                 "{} is {} bytes, larger than the MTU of {}",
                 msg_summary(&msg).as_str(),
                 bytes.len(),
                 mtu);

      if msg.is_response() {
        let reply = too_large(msg.header(), mtu);
        if let Err(e) = self.transmit(peer, reply, None, false) {
          log::warn!(target: TARGET, "failed to send 4.13 in place of a response: {:?}", e);
        }
      }

      return Err(when.what(What::TooLarge { size: bytes.len(),
                                            mtu }));
    }

    let now = self.now(when)?;
    self.send_dgram(peer, &bytes, when)?;

    log::debug!(target: TARGET,
                "{:?} <- {} (id {}, token {:?})",
                peer,
                msg_summary(&msg).as_str(),
                msg.id.0,
                msg.token.as_bytes());

    let sent = Sent { id: msg.id,
                      token: msg.token };
    let p = self.peer_mut(peer)
                .ok_or(when.what(What::NoSuchPeer(peer)))?;

    let fire_now = match (msg.ty, callback) {
      | (Type::Con, callback) => {
        let completion = match callback {
          | Some(callback) if expects_response => {
            p.exchanges.push(Exchange { token: msg.token,
                                        callback });
            Completion::Exchange(msg.token)
          },
          | Some(callback) => Completion::Callback(callback),
          | None => Completion::None,
        };

        p.transactions.push(Transaction { id: msg.id,
                                          bytes,
                                          timer: RetryTimer::new(Milliseconds(now),
                                                                 cfg.ack_timeout,
                                                                 cfg.max_retransmit),
                                          completion });

        self.tighten(cfg.ack_timeout.0);
        if let Some(wake) = self.waker.as_mut() {
          wake();
        }

        None
      },
      | (ty, callback) => {
        if matches!(ty, Type::Ack | Type::Reset) {
          p.acks.push(AckEntry { id: msg.id,
                                 bytes,
                                 expires_at: now.saturating_add(cfg.max_transmit_wait.0) });
        }

        match callback {
          | Some(callback) if expects_response => {
            p.exchanges.push(Exchange { token: msg.token,
                                        callback });
            None
          },
          | callback => callback,
        }
      },
    };

    if let Some(callback) = fire_now {
      callback(self, peer, msg.code, Some(&msg));
    }

    Ok(sent)
  }

  fn send_dgram(&mut self, peer: PeerId, dgram: &[u8], when: When) -> Result<(), Error> {
    let p = self.peer_mut(peer)
                .ok_or(when.what(What::NoSuchPeer(peer)))?;

    match p.session.send(dgram) {
      | Ok(_) => Ok(()),
      | Err(nb::Error::WouldBlock) => Err(when.what(What::SessionBusy)),
      | Err(nb::Error::Other(e)) => {
        log::warn!(target: TARGET, "{:?} failed to send: {:?}", peer, e);
        Err(when.what(What::SessionError))
      },
    }
  }

  /// Handle a datagram received from a peer.
  ///
  /// `truncated` means the datagram was cut off by the receive buffer.
  ///
  /// Datagrams that cannot be parsed yield [`What::FromBytes`]
  /// after any reply they warrant has been sent:
  /// - a request cut off in its options is answered with 4.13
  /// - any other Confirmable message is answered with RST
  pub fn handle_datagram(&mut self, peer: PeerId, dgram: &[u8], truncated: bool) -> Result<(), Error> {
    let when = When::Receiving(peer);
    if self.peer(peer).is_none() {
      return Err(when.what(What::NoSuchPeer(peer)));
    }

    match Message::try_from_bytes(dgram) {
      | Ok(msg) => self.handle_message(peer, &msg, truncated),
      | Err(e) => {
        log::warn!(target: TARGET,
                   "{:?} sent a malformed datagram ({} bytes, truncated: {}): {:?}",
                   peer,
                   dgram.len(),
                   truncated,
                   e);

        match parse_header(dgram) {
          | Ok(hdr) if truncated && hdr.code.kind() == CodeKind::Request => {
            if hdr.ty == Type::Con {
              let ack = Message::new(Type::Ack, Code::EMPTY, hdr.id, Token::default());
              self.send(peer, ack, None)?;
            }
            self.reply_too_large(peer, hdr)?;
          },
          | Ok(hdr) if !truncated && hdr.ty == Type::Con => {
            let reset = Message::new(Type::Reset, Code::EMPTY, hdr.id, Token::default());
            self.send(peer, reset, None)?;
          },
          | _ => (),
        }

        Err(when.what(What::FromBytes(e)))
      },
    }
  }

  fn handle_message(&mut self, peer: PeerId, msg: &Message<'_>, truncated: bool) -> Result<(), Error> {
    log::trace!(target: TARGET,
                "{:?} -> {} (id {}, token {:?})",
                peer,
                msg_summary(msg).as_str(),
                msg.id.0,
                msg.token.as_bytes());

    match msg.ty {
      | Type::Con => {
        let cached = self.peer(peer)
                         .and_then(|p| p.cached_ack(msg.id))
                         .map(|bytes| bytes.to_vec());

        if let Some(bytes) = cached {
          log::debug!(target: TARGET,
                      "{:?} repeated message {}, replaying our reply",
                      peer,
                      msg.id.0);
          return self.send_dgram(peer, &bytes, When::Receiving(peer));
        }

        if !msg.is_response() {
          self.send(peer, msg.ack(), None)?;
        }

        self.handle_exchange(peer, msg, truncated)?;

        if msg.is_response() && self.peer(peer).is_some() {
          self.send(peer, msg.ack(), None)?;
        }

        Ok(())
      },
      | Type::Non => self.handle_exchange(peer, msg, truncated),
      | Type::Ack => {
        let tx = self.peer_mut(peer)
                     .and_then(|p| p.take_transaction(msg.id));

        if let Some(Transaction { completion: Completion::Callback(callback),
                                  .. }) = tx
        {
          let code = match truncated {
            | true => Code::REQUEST_ENTITY_TOO_LARGE,
            | false => msg.code,
          };
          callback(self, peer, code, Some(msg));
        }

        match self.peer(peer) {
          | Some(_) => self.handle_exchange(peer, msg, truncated),
          | None => Ok(()),
        }
      },
      | Type::Reset => match self.peer_mut(peer)
                                 .and_then(|p| p.take_transaction(msg.id))
      {
        | Some(tx) => {
          self.resolve(peer, tx.completion, msg.code, Some(msg));
          Ok(())
        },
        | None => self.handle_exchange(peer, msg, truncated),
      },
    }
  }

  fn handle_exchange(&mut self, peer: PeerId, msg: &Message<'_>, truncated: bool) -> Result<(), Error> {
    match msg.code.kind() {
      | CodeKind::Empty => {
        log::trace!(target: TARGET, "ignoring empty {:?} {}", msg.ty, msg.id.0);
        Ok(())
      },
      | CodeKind::Response => {
        let code = match truncated {
          | true => Code::REQUEST_ENTITY_TOO_LARGE,
          | false => msg.code,
        };

        match self.peer_mut(peer)
                  .and_then(|p| p.take_exchange(&msg.token))
        {
          | Some(ex) => (ex.callback)(self, peer, code, Some(msg)),
          | None => log::debug!(target: TARGET,
                                "{:?} sent a response matching no request (token {:?})",
                                peer,
                                msg.token.as_bytes()),
        }

        Ok(())
      },
      | CodeKind::Request if truncated => self.reply_too_large(peer, msg.header()),
      | CodeKind::Request => {
        let handler = self.peer_mut(peer).and_then(|p| p.on_request.take());

        match handler {
          | Some(mut handler) => {
            handler(self, peer, msg);

            if let Some(p) = self.peer_mut(peer) {
              p.on_request.get_or_insert(handler);
            }
          },
          | None => log::debug!(target: TARGET, "no request handler for {:?}", peer),
        }

        Ok(())
      },
    }
  }

  fn reply_too_large(&mut self, peer: PeerId, hdr: Header) -> Result<(), Error> {
    let mtu = self.peer(peer)
                  .map(|p| p.session.mtu())
                  .unwrap_or(crate::net::DEFAULT_MTU);
    let mut reply = too_large(hdr, mtu);
    reply.ty = Type::Non;
    self.send(peer, reply, None).map(|_| ())
  }

  fn resolve(&mut self,
             peer: PeerId,
             completion: Completion<C, S>,
             code: Code,
             msg: Option<&Message<'_>>) {
    match completion {
      | Completion::None => (),
      | Completion::Callback(callback) => callback(self, peer, code, msg),
      | Completion::Exchange(token) => {
        if let Some(ex) = self.peer_mut(peer).and_then(|p| p.take_exchange(&token)) {
          (ex.callback)(self, peer, code, msg)
        }
      },
    }
  }

  /// Forget expired ACKs, retransmit Confirmable messages that are due,
  /// and give up on those out of attempts.
  ///
  /// Yields how long the host may wait before calling this again;
  /// at most `timeout`.
  pub fn poll_transactions(&mut self, timeout: Millis) -> Result<Millis, Error> {
    let now = self.now(When::Polling)?;
    let mut next = self.timeout.take().map_or(timeout.0, |t| t.min(timeout.0));
    let mut resend = Vec::new();
    let mut expired = Vec::new();

    for p in self.peers.iter_mut() {
      p.acks.retain(|ack| ack.expires_at > now);

      let mut ix = 0;
      while ix < p.transactions.len() {
        let tx = &mut p.transactions[ix];
        match tx.timer.what_should_i_do(Milliseconds(now)) {
          | Err(nb::Error::WouldBlock) => {
            next = next.min(tx.timer.remaining(Milliseconds(now)).0);
            ix += 1;
          },
          | Ok(YouShould::Retry) => {
            log::debug!(target: TARGET,
                        "{:?} retransmitting {} (attempt {})",
                        p.id,
                        tx.id.0,
                        tx.timer.attempts().0);
            resend.push((p.id, tx.bytes.clone()));
            next = next.min(tx.timer.remaining(Milliseconds(now)).0);
            ix += 1;
          },
          | Ok(YouShould::Cry) => {
            log::warn!(target: TARGET, "{:?} never acknowledged {}", p.id, tx.id.0);
            let tx = p.transactions.remove(ix);
            expired.push((p.id, tx.completion));
          },
          | Err(nb::Error::Other(never)) => match never {},
        }
      }
    }

    for (peer, bytes) in resend {
      if let Err(e) = self.send_dgram(peer, &bytes, When::Polling) {
        log::warn!(target: TARGET, "retransmission failed: {:?}", e);
      }
    }

    for (peer, completion) in expired {
      self.resolve(peer, completion, Code::SERVICE_UNAVAILABLE, None);
    }

    Ok(Milliseconds(self.timeout.take().map_or(next, |t| t.min(next))))
  }

  /// Do all pending work: retransmit, then drain every peer's
  /// session into `buf` and handle what arrived.
  ///
  /// Yields how long the host may wait for session activity before
  /// calling this again; at most `timeout`.
  pub fn step(&mut self, buf: &mut [u8], timeout: Millis) -> Result<Millis, Error> {
    let next = self.poll_transactions(timeout)?;
    let peers = self.peers().collect::<Vec<_>>();

    for peer in peers {
      loop {
        let recvd = match self.peer_mut(peer) {
          | Some(p) => p.session.recv(buf),
          | None => break,
        };

        match recvd {
          | Ok(Recvd { len, truncated }) => {
            let len = len.min(buf.len());
            match self.handle_datagram(peer, &buf[..len], truncated) {
              | Err(e @ Error { what: What::ClockError,
                                .. }) => return Err(e),
              | Err(Error { what: What::FromBytes(_),
                            .. })
              | Ok(()) => (),
              | Err(e) => log::warn!(target: TARGET, "handling datagram failed: {:?}", e),
            }
          },
          | Err(nb::Error::WouldBlock) => break,
          | Err(nb::Error::Other(e)) => {
            log::warn!(target: TARGET, "{:?} failed to receive: {:?}", peer, e);
            break;
          },
        }
      }
    }

    Ok(Milliseconds(self.timeout.take().map_or(next.0, |t| t.min(next.0))))
  }
}

/// A bare 4.13 answer to a message; same type, id and token,
/// with Size1 set to the largest size we accept
fn too_large(hdr: Header, mtu: usize) -> Message<'static> {
  let mut reply = Message::new(hdr.ty, Code::REQUEST_ENTITY_TOO_LARGE, hdr.id, hdr.token);
  reply.add_opt(Opt::new(SIZE1, mtu as u32));
  reply
}
