//! Connection handle owned by a session.
//!
//! A [`Conn`] carries already-decoded packets. Whatever produces them (the TCP
//! transport, or a test) drives the other end through a [`ConnPeer`].

use std::net::SocketAddr;

use mc_rs_proto::packets::{IdentityData, Packet};
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch, Mutex};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnError {
    #[error("connection closed")]
    Closed,

    #[error("peer disconnected")]
    Disconnected,
}

/// Session side of a connection.
pub struct Conn {
    addr: SocketAddr,
    identity: IdentityData,
    inbound: Mutex<mpsc::UnboundedReceiver<Packet>>,
    outbound: mpsc::UnboundedSender<Packet>,
    closed: watch::Sender<bool>,
}

/// Transport side of a connection.
pub struct ConnPeer {
    inbound: Option<mpsc::UnboundedSender<Packet>>,
    outbound: mpsc::UnboundedReceiver<Packet>,
    closed: watch::Receiver<bool>,
}

/// Create a connected pair.
pub fn pipe(addr: SocketAddr, identity: IdentityData) -> (Conn, ConnPeer) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (closed_tx, closed_rx) = watch::channel(false);
    let conn = Conn {
        addr,
        identity,
        inbound: Mutex::new(in_rx),
        outbound: out_tx,
        closed: closed_tx,
    };
    let peer = ConnPeer {
        inbound: Some(in_tx),
        outbound: out_rx,
        closed: closed_rx,
    };
    (conn, peer)
}

impl Conn {
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn identity_data(&self) -> &IdentityData {
        &self.identity
    }

    /// Wait for the next packet from the peer.
    ///
    /// Fails with [`ConnError::Closed`] once [`Conn::close`] is called, even
    /// while a read is pending.
    pub async fn read_packet(&self) -> Result<Packet, ConnError> {
        let mut closed = self.closed.subscribe();
        if self.is_closed() {
            return Err(ConnError::Closed);
        }
        let mut inbound = self.inbound.lock().await;
        tokio::select! {
            biased;
            _ = closed_signal(&mut closed) => Err(ConnError::Closed),
            pk = inbound.recv() => pk.ok_or(ConnError::Disconnected),
        }
    }

    /// Queue a packet for the peer. Never blocks.
    pub fn write_packet(&self, packet: Packet) -> Result<(), ConnError> {
        if self.is_closed() {
            return Err(ConnError::Closed);
        }
        self.outbound
            .send(packet)
            .map_err(|_| ConnError::Disconnected)
    }

    /// Close the connection. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

/// Resolves once the flag turns true or its sender is gone.
async fn closed_signal(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

impl ConnPeer {
    /// Deliver a packet to the session.
    pub fn send(&self, packet: Packet) -> Result<(), ConnError> {
        match &self.inbound {
            Some(tx) => tx.send(packet).map_err(|_| ConnError::Closed),
            None => Err(ConnError::Disconnected),
        }
    }

    /// Next packet written by the session.
    ///
    /// Packets queued before the session closed the connection are still
    /// delivered; `None` follows once the queue is drained.
    pub async fn recv(&mut self) -> Option<Packet> {
        loop {
            match self.outbound.try_recv() {
                Ok(pk) => return Some(pk),
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => {}
            }
            if *self.closed.borrow_and_update() {
                return None;
            }
            tokio::select! {
                pk = self.outbound.recv() => return pk,
                res = self.closed.changed() => {
                    if res.is_err() {
                        return None;
                    }
                }
            }
        }
    }

    /// Everything the session has written so far.
    pub fn drain(&mut self) -> Vec<Packet> {
        let mut packets = Vec::new();
        while let Ok(pk) = self.outbound.try_recv() {
            packets.push(pk);
        }
        packets
    }

    /// Simulate the client going away: the session's next read fails.
    pub fn disconnect(&mut self) {
        self.inbound = None;
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}
