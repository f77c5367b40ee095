//! Async glue between a [`GameSession`] and a [`CoachingGateway`]
//!
//! The session only describes round trips. This module performs them,
//! bounds each one with `tokio::time::timeout`, and feeds the result back.
//! An expired call resolves as [`GatewayError::Timeout`], which releases
//! the busy flag; if the real reply shows up later its ticket is stale and
//! the session drops it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{self, JoinSet};
use tracing::{error, warn};

use super::{perform, CoachingGateway, GatewayError, GatewayResponse, GatewayResult};
use crate::game::{GameResult, GameSession, GatewayCall, InputEvent, Outcome, Step, Ticket};

/// Default bound on a single gateway round trip
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A finished round trip, ready for [`GameSession::resolve`]
pub type Completed = (Ticket, GatewayResult<GatewayResponse>);

/// Perform `call` against `gateway`, giving up after `limit`
pub async fn run_call(
    gateway: Arc<dyn CoachingGateway>,
    call: GatewayCall,
    limit: Duration,
) -> Completed {
    let kind = call.request.kind();
    let result = match tokio::time::timeout(limit, perform(gateway.as_ref(), call.request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("[GATEWAY] {} request timed out after {:?}", kind, limit);
            Err(GatewayError::Timeout(limit))
        }
    };
    (call.ticket, result)
}

/// Round trips running in the background, keyed by the ticket they carry
///
/// A task that dies before producing its [`Completed`] (a panic inside the
/// gateway, or an abort) still resolves as a transport failure on its own
/// ticket, so a broken chat call never fails an in-flight move and the
/// slot it held is released.
#[derive(Default)]
pub struct InFlightCalls {
    tasks: JoinSet<Completed>,
    tickets: HashMap<task::Id, Ticket>,
}

impl InFlightCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        gateway: Arc<dyn CoachingGateway>,
        call: GatewayCall,
        limit: Duration,
    ) {
        let ticket = call.ticket;
        let handle = self.tasks.spawn(run_call(gateway, call, limit));
        self.tickets.insert(handle.id(), ticket);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for the next round trip to finish
    ///
    /// Returns `None` once nothing is left in flight. Cancel safe, so it can
    /// sit in a `tokio::select!` branch.
    pub async fn next(&mut self) -> Option<Completed> {
        loop {
            match self.tasks.join_next_with_id().await? {
                Ok((id, completed)) => {
                    self.tickets.remove(&id);
                    return Some(completed);
                }
                Err(join_err) => {
                    let Some(ticket) = self.tickets.remove(&join_err.id()) else {
                        error!("[GATEWAY] Untracked task failed: {}", join_err);
                        continue;
                    };
                    error!("[GATEWAY] Task for {:?} failed: {}", ticket, join_err);
                    return Some((ticket, Err(GatewayError::Transport(join_err.to_string()))));
                }
            }
        }
    }

    pub fn abort_all(&mut self) {
        self.tasks.abort_all();
    }
}

/// Session plus the gateway it talks to
pub struct SessionDriver {
    session: GameSession,
    gateway: Arc<dyn CoachingGateway>,
    timeout: Duration,
}

impl SessionDriver {
    pub fn new(session: GameSession, gateway: Arc<dyn CoachingGateway>, timeout: Duration) -> Self {
        Self {
            session,
            gateway,
            timeout,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle `event` and, if it needs the gateway, wait for the answer
    pub async fn dispatch(&mut self, event: InputEvent) -> GameResult<Outcome> {
        match self.session.handle(event)? {
            Step::Done(outcome) => Ok(outcome),
            Step::Send(call) => {
                let (ticket, result) = run_call(self.gateway.clone(), call, self.timeout).await;
                self.session.resolve(ticket, result)
            }
        }
    }

    /// Handle `event` without waiting; any round trip is spawned onto `calls`
    ///
    /// Used by the interactive loop so input keeps flowing while a request
    /// is in flight.
    pub fn dispatch_detached(
        &mut self,
        event: InputEvent,
        calls: &mut InFlightCalls,
    ) -> GameResult<Option<Outcome>> {
        match self.session.handle(event)? {
            Step::Done(outcome) => Ok(Some(outcome)),
            Step::Send(call) => {
                calls.spawn(self.gateway.clone(), call, self.timeout);
                Ok(None)
            }
        }
    }

    /// Apply a round trip finished by [`SessionDriver::dispatch_detached`]
    pub fn complete(&mut self, (ticket, result): Completed) -> GameResult<Outcome> {
        self.session.resolve(ticket, result)
    }
}
