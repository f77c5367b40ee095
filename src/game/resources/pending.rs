//! Busy flag serializing game-mutating gateway requests
//!
//! At most one move, batch, undo or new-game request may be in flight.
//! `request` refuses a second one instead of queueing it. Each accepted
//! request gets a ticket; a reply is only applied if its ticket is still the
//! one in flight, so a reply arriving after a timeout is dropped.

use std::time::Instant;

use crate::game::types::{PlayedMove, PlayerColor};

/// What the in-flight request will change once it resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    /// Immediate-mode move, already resolved against the local position
    Move(PlayedMove),
    /// Batched moves sent for coaching
    Batch { moves: usize },
    Undo,
    NewGame(PlayerColor),
}

#[derive(Debug, Clone)]
pub struct InFlight {
    pub ticket: u64,
    pub op: PendingOp,
    pub started: Instant,
}

#[derive(Debug, Default)]
pub struct PendingRequest {
    pending: Option<InFlight>,
    next_ticket: u64,
}

impl PendingRequest {
    /// Claim the busy flag; `None` if something is already in flight
    pub fn request(&mut self, op: PendingOp) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        self.next_ticket += 1;
        self.pending = Some(InFlight {
            ticket: self.next_ticket,
            op,
            started: Instant::now(),
        });
        Some(self.next_ticket)
    }

    /// Release the flag if `ticket` is the request in flight
    pub fn take(&mut self, ticket: u64) -> Option<InFlight> {
        match &self.pending {
            Some(in_flight) if in_flight.ticket == ticket => self.pending.take(),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&InFlight> {
        self.pending.as_ref()
    }
}
