//! Peer registry.
//!
//! The single source of truth for live peers. Iteration order is insertion
//! order; the matcher relies on it for deterministic first-match selection
//! and the evictor for its arrival-order staleness heuristic. No component
//! caches peer state outside of this container.

use crate::peer::{Peer, PeerId};

/// Insertion-ordered set of live peers plus the id allocator.
#[derive(Debug, Default)]
pub struct Registry {
    peers: Vec<Peer>,
    next_id: u64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next peer id. Ids are never reused while the process
    /// runs, even after the peer they were assigned to is gone.
    pub fn allocate_id(&mut self) -> PeerId {
        let id = PeerId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// The id the next connection will be assigned. The evictor measures
    /// staleness against this value.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Add a peer. Ids are unique by construction of [`allocate_id`].
    ///
    /// [`allocate_id`]: Registry::allocate_id
    pub fn add(&mut self, peer: Peer) {
        debug_assert!(self.get(peer.id).is_none(), "duplicate peer id");
        self.peers.push(peer);
    }

    /// Remove a peer by id. Idempotent: removing an absent id is a no-op.
    pub fn remove(&mut self, id: PeerId) -> Option<Peer> {
        let index = self.peers.iter().position(|p| p.id == id)?;
        Some(self.peers.remove(index))
    }

    /// Look up a peer by id.
    pub fn get(&self, id: PeerId) -> Option<&Peer> {
        self.peers.iter().find(|p| p.id == id)
    }

    /// Look up a peer by id, mutably.
    pub fn get_mut(&mut self, id: PeerId) -> Option<&mut Peer> {
        self.peers.iter_mut().find(|p| p.id == id)
    }

    /// Iterate peers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Keep only the peers the predicate accepts, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&Peer) -> bool) {
        self.peers.retain(keep);
    }

    /// Number of live peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
