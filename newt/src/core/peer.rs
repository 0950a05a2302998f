use ::core::fmt;

use newt_msg::{Id, Token};
use no_std_net::SocketAddr;
use std_alloc::vec::Vec;

use super::exchange::Exchange;
use super::transaction::{AckEntry, Transaction};
use super::{PeerId, RequestHandler};
use crate::net::{ConnectionType, Session};
use crate::time::Clock;

/// One remote endpoint, and everything in flight with it
pub(crate) struct Peer<C: Clock, S: Session> {
  pub(crate) id: PeerId,
  pub(crate) addr: SocketAddr,
  pub(crate) ty: ConnectionType,
  pub(crate) session: S,
  pub(crate) next_id: Id,
  pub(crate) exchanges: Vec<Exchange<C, S>>,
  pub(crate) transactions: Vec<Transaction<C, S>>,
  pub(crate) acks: Vec<AckEntry>,
  pub(crate) on_request: Option<RequestHandler<C, S>>,
}

impl<C: Clock, S: Session> Peer<C, S> {
  pub(crate) fn new(id: PeerId, addr: SocketAddr, ty: ConnectionType, session: S, first_id: Id) -> Self {
    Self { id,
           addr,
           ty,
           session,
           next_id: match first_id {
             | Id(0) => Id(1),
             | id => id,
           },
           exchanges: Vec::new(),
           transactions: Vec::new(),
           acks: Vec::new(),
           on_request: None }
  }

  /// Yield the next message id, advancing the counter
  pub(crate) fn next_id(&mut self) -> Id {
    let id = self.next_id;
    self.next_id = id.next();
    id
  }

  /// Unlink the first exchange waiting on `token`
  pub(crate) fn take_exchange(&mut self, token: &Token) -> Option<Exchange<C, S>> {
    self.exchanges
        .iter()
        .position(|ex| &ex.token == token)
        .map(|ix| self.exchanges.remove(ix))
  }

  /// Unlink the transaction for message `id`
  pub(crate) fn take_transaction(&mut self, id: Id) -> Option<Transaction<C, S>> {
    self.transactions
        .iter()
        .position(|tx| tx.id == id)
        .map(|ix| self.transactions.remove(ix))
  }

  /// The ACK or RST we already sent for message `id`
  pub(crate) fn cached_ack(&self, id: Id) -> Option<&[u8]> {
    self.acks
        .iter()
        .find(|ack| ack.id == id)
        .map(|ack| ack.bytes.as_slice())
  }
}

impl<C: Clock, S: Session> fmt::Debug for Peer<C, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Peer")
     .field("id", &self.id)
     .field("addr", &self.addr)
     .field("ty", &self.ty)
     .field("state", &self.session.state())
     .field("next_id", &self.next_id)
     .field("exchanges", &self.exchanges)
     .field("transactions", &self.transactions)
     .field("acks", &self.acks.len())
     .finish_non_exhaustive()
  }
}
