//! Game session - the single state container behind the board
//!
//! Owns the position, selection, move buffer, busy flag and chat log, and
//! exposes one mutation entry point per operation. Every operation is
//! synchronous: anything that needs the gateway returns [`Step::Send`] with
//! a ticketed [`GatewayCall`], and the caller later feeds the gateway's
//! answer (or a timeout) back through [`GameSession::resolve`].
//!
//! # Dispatch
//!
//! | Operation       | Immediate mode            | Batched mode                   |
//! |-----------------|---------------------------|--------------------------------|
//! | move            | sent, gateway FEN adopted | applied locally, buffered      |
//! | undo            | sent to gateway           | local replay while buffer has moves |
//! | get coaching    | nothing buffered          | whole buffer sent as one batch |
//!
//! # Failure
//!
//! A failed operation leaves position, selection and buffer untouched and
//! always releases the busy flag. The failure's user-facing text becomes
//! the session feedback.

use shakmaty::Square;
use tracing::{debug, info, warn};

use shared::protocol::{
    BatchMovesReply, BatchMovesRequest, ChatRequest, MoveReply, MoveRequest, NewGameReply,
    NewGameRequest, UndoReply,
};

use crate::game::error::{GameError, GameResult};
use crate::game::events::InputEvent;
use crate::game::resources::{
    ChatLog, ChatRole, ClickResult, GameStatus, HighlightState, MoveHistoryBuffer, PendingOp,
    PendingRequest, PositionStore, Selection,
};
use crate::game::types::{
    player_color, CoachingIntensity, CoachingParams, GamePhase, MoveInput, PlayedMove,
    PlayerColor, SessionMode,
};
use crate::networking::{GatewayError, GatewayRequest, GatewayResponse};

/// Identifies which in-flight slot a gateway call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ticket {
    /// Game-mutating request holding the busy flag
    Game(u64),
    /// Chat question holding the chat slot
    Chat(u64),
}

/// A gateway round trip the session is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub ticket: Ticket,
    pub request: GatewayRequest,
}

/// Result of a move that was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Batched mode: applied and buffered, the gateway has not seen it
    LocalOnly(PlayedMove),
    /// Immediate mode: the gateway played it and its position was adopted
    Reconciled { played: PlayedMove, fen: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// Last buffered move dropped by local replay
    Local { undone: PlayedMove },
    /// Gateway took back its last move
    Reconciled { undone: String, fen: String },
}

/// What an operation ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Move(MoveOutcome),
    Selection(ClickResult),
    BatchCoached { moves: usize },
    Undone(UndoOutcome),
    ModeChanged(SessionMode),
    /// Switching modes would drop this many unsent moves
    ConfirmationRequired { unsaved: usize },
    DiscardDeclined,
    GameStarted(PlayerColor),
    ChatAnswered,
    SettingsChanged(CoachingParams),
    /// Nothing happened (stale reply, empty question, stray confirmation)
    Ignored,
}

/// Immediate outcome, or a request that must go out first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Done(Outcome),
    Send(GatewayCall),
}

/// Read-only view for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub fen: String,
    pub turn: PlayerColor,
    pub phase: GamePhase,
    pub status: GameStatus,
    pub highlight: HighlightState,
    pub mode: SessionMode,
    pub buffered: usize,
    pub pending: bool,
    pub chat_waiting: bool,
    pub awaiting_confirmation: bool,
    pub feedback: String,
    /// Bumped on every position replacement
    pub revision: u64,
    pub params: CoachingParams,
}

#[derive(Debug, Default)]
pub struct GameSession {
    position: PositionStore,
    selection: Selection,
    buffer: MoveHistoryBuffer,
    mode: SessionMode,
    pending: PendingRequest,
    last_move: Option<PlayedMove>,
    phase: GamePhase,
    feedback: String,
    params: CoachingParams,
    awaiting_discard: bool,
    chat: ChatLog,
}

impl GameSession {
    pub fn new(params: CoachingParams, mode: SessionMode) -> Self {
        Self {
            params,
            mode,
            ..Self::default()
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Apply one inbound event
    pub fn handle(&mut self, event: InputEvent) -> GameResult<Step> {
        if self.awaiting_discard && !event.is_confirmation() {
            debug!("[DISPATCH] Discard prompt abandoned by {:?}", event);
            self.awaiting_discard = false;
        }

        let result = match event {
            InputEvent::SquareClicked(square) => self.click(square),
            InputEvent::NotationSubmitted(text) => self.submit(MoveInput::Notation(text)),
            InputEvent::UndoRequested => self.undo(),
            InputEvent::BatchSubmitRequested => self.get_coaching(),
            InputEvent::ModeToggled => self.toggle_mode(),
            InputEvent::DiscardConfirmed(confirmed) => self.confirm_discard(confirmed),
            InputEvent::NewGameRequested => self.new_game(),
            InputEvent::ChatSubmitted(question) => self.ask(&question),
            InputEvent::RatingChanged(rating) => {
                self.params.player_rating = rating;
                Ok(Step::Done(Outcome::SettingsChanged(self.params)))
            }
            InputEvent::IntensityChanged(intensity) => self.set_intensity(intensity),
        };

        result.inspect_err(|err| self.record_failure(err))
    }

    /// Feed back the gateway's answer for an earlier [`Step::Send`]
    ///
    /// Replies whose ticket is no longer in flight (superseded, or already
    /// expired by a timeout) are dropped without touching any state.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<GatewayResponse, GatewayError>,
    ) -> GameResult<Outcome> {
        match ticket {
            Ticket::Chat(id) => self.resolve_chat(id, result),
            Ticket::Game(id) => {
                let Some(in_flight) = self.pending.take(id) else {
                    warn!("[DISPATCH] Dropping reply for stale ticket {}", id);
                    return Ok(Outcome::Ignored);
                };
                debug!(
                    "[DISPATCH] Ticket {} resolved after {:?}",
                    id,
                    in_flight.started.elapsed()
                );

                let outcome = result
                    .map_err(GameError::from)
                    .and_then(|response| self.reconcile(in_flight.op, response));
                outcome.inspect_err(|err| self.record_failure(err))
            }
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Feed a board click through the selection state machine
    ///
    /// Selecting is always allowed; completing a move while a request is in
    /// flight is refused and leaves the selection as it was.
    pub fn click(&mut self, square: Square) -> GameResult<Step> {
        if self.pending.is_pending() && self.selection.completes_move(square) {
            return Err(GameError::Busy);
        }

        match self.selection.click(self.position.current(), square) {
            ClickResult::Completed { from, to } => self.submit(MoveInput::Squares { from, to }),
            other => Ok(Step::Done(Outcome::Selection(other))),
        }
    }

    /// Move dispatcher: local in batched mode, remote in immediate mode
    pub fn submit(&mut self, input: MoveInput) -> GameResult<Step> {
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }

        let (next, played) = PositionStore::apply_move(self.position.current(), &input)?;
        self.selection.clear();

        match self.mode {
            SessionMode::Batched => {
                let before = self.position.current().clone();
                self.buffer.push(&before, played.clone());
                self.position.replace(next);
                self.last_move = Some(played.clone());
                self.feedback = format!(
                    "Multi-move: {} move(s) made. Request coaching when ready.",
                    self.buffer.len()
                );
                info!("[DISPATCH] Buffered {} ({} pending)", played, self.buffer.len());
                Ok(Step::Done(Outcome::Move(MoveOutcome::LocalOnly(played))))
            }
            SessionMode::Immediate => {
                let request = GatewayRequest::Move(MoveRequest {
                    notation: played.notation.clone(),
                    player_elo: self.params.player_rating,
                    coaching_intensity: self.params.intensity,
                });
                info!("[DISPATCH] Sending {} to the coach", played);
                self.send(PendingOp::Move(played), request)
            }
        }
    }

    /// Send every buffered move as one coaching batch
    pub fn get_coaching(&mut self) -> GameResult<Step> {
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }
        if self.buffer.is_empty() {
            return Err(GameError::EmptyBuffer);
        }

        let moves = self.buffer.notations();
        let count = moves.len();
        let request = GatewayRequest::BatchMoves(BatchMovesRequest {
            moves,
            analyze_move: count,
            player_elo: self.params.player_rating,
            coaching_intensity: self.params.intensity,
        });
        info!("[DISPATCH] Sending batch of {} moves", count);
        self.send(PendingOp::Batch { moves: count }, request)
    }

    /// Undo controller
    pub fn undo(&mut self) -> GameResult<Step> {
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }

        if self.mode == SessionMode::Batched {
            if let Some(restored) = self.buffer.replay_without_last() {
                let restored = restored?;
                if let Some(undone) = self.buffer.pop() {
                    self.position.replace(restored);
                    self.last_move = self.buffer.last_move().cloned();
                    self.selection.clear();
                    self.feedback = format!(
                        "Undid move: {} ({} moves remaining)",
                        undone,
                        self.buffer.len()
                    );
                    info!("[UNDO] Local undo of {}", undone);
                    return Ok(Step::Done(Outcome::Undone(UndoOutcome::Local { undone })));
                }
            }
        }

        info!("[UNDO] Asking the coach to take back the last move");
        self.send(PendingOp::Undo, GatewayRequest::Undo)
    }

    /// Flip between immediate and batched coaching
    ///
    /// Leaving batched mode with unsent moves only asks for confirmation;
    /// the switch happens in [`GameSession::confirm_discard`].
    pub fn toggle_mode(&mut self) -> GameResult<Step> {
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }

        if self.mode == SessionMode::Batched && !self.buffer.is_empty() {
            self.awaiting_discard = true;
            let unsaved = self.buffer.len();
            self.feedback = format!(
                "You have {unsaved} unsent move(s). Switching modes discards them. Continue?"
            );
            return Ok(Step::Done(Outcome::ConfirmationRequired { unsaved }));
        }

        self.mode = self.mode.toggled();
        self.selection.clear();
        self.feedback = match self.mode {
            SessionMode::Batched => {
                "Multi-move mode: make several moves, then request coaching.".to_string()
            }
            SessionMode::Immediate => "Single-move mode: every move is coached.".to_string(),
        };
        info!("[DISPATCH] Mode switched to {}", self.mode);
        Ok(Step::Done(Outcome::ModeChanged(self.mode)))
    }

    /// Answer the discard prompt raised by [`GameSession::toggle_mode`]
    ///
    /// Confirming reverts the board to where the batch started, since the
    /// gateway never saw the discarded moves.
    pub fn confirm_discard(&mut self, confirmed: bool) -> GameResult<Step> {
        if !std::mem::take(&mut self.awaiting_discard) {
            return Ok(Step::Done(Outcome::Ignored));
        }
        if !confirmed {
            self.feedback = "Kept your unsent moves.".to_string();
            return Ok(Step::Done(Outcome::DiscardDeclined));
        }
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }

        let discarded = self.buffer.len();
        if let Some(base) = self.buffer.base().cloned() {
            self.position.replace(base);
        }
        self.buffer.clear();
        self.last_move = None;
        self.selection.clear();
        self.mode = SessionMode::Immediate;
        self.feedback = "Single-move mode: unsent moves were discarded.".to_string();
        info!("[DISPATCH] Discarded {} unsent moves", discarded);
        Ok(Step::Done(Outcome::ModeChanged(self.mode)))
    }

    /// Ask the gateway for a fresh game as the configured colour
    pub fn new_game(&mut self) -> GameResult<Step> {
        if self.pending.is_pending() {
            return Err(GameError::Busy);
        }

        let color = self.params.player_color;
        info!("[DISPATCH] Starting new game as {:?}", color);
        self.send(
            PendingOp::NewGame(color),
            GatewayRequest::NewGame(NewGameRequest {
                player_color: color,
            }),
        )
    }

    /// Follow-up question to the coach
    ///
    /// Chat does not hold the busy flag, so moves may be made while an
    /// answer is outstanding.
    pub fn ask(&mut self, question: &str) -> GameResult<Step> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Step::Done(Outcome::Ignored));
        }

        let ticket = self.chat.begin().ok_or(GameError::ChatBusy)?;
        self.chat.push(ChatRole::User, question);
        debug!("[CHAT] Question {} sent", ticket);

        Ok(Step::Send(GatewayCall {
            ticket: Ticket::Chat(ticket),
            request: GatewayRequest::Chat(ChatRequest {
                question: question.to_string(),
                recent_coaching: self.feedback.clone(),
                player_elo: self.params.player_rating,
            }),
        }))
    }

    fn set_intensity(&mut self, intensity: CoachingIntensity) -> GameResult<Step> {
        self.params.intensity = intensity;
        Ok(Step::Done(Outcome::SettingsChanged(self.params)))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        let current = self.position.current();
        SessionSnapshot {
            fen: self.position.fen(),
            turn: player_color(PositionStore::turn(current)),
            phase: self.phase,
            status: self.position.status(),
            highlight: self.highlight(),
            mode: self.mode,
            buffered: self.buffer.len(),
            pending: self.pending.is_pending(),
            chat_waiting: self.chat.is_waiting(),
            awaiting_confirmation: self.awaiting_discard,
            feedback: self.feedback.clone(),
            revision: self.position.revision(),
            params: self.params,
        }
    }

    pub fn highlight(&self) -> HighlightState {
        HighlightState::derive(self.last_move.as_ref(), &self.selection)
    }

    pub fn position(&self) -> &PositionStore {
        &self.position
    }

    pub fn buffer(&self) -> &MoveHistoryBuffer {
        &self.buffer
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn params(&self) -> CoachingParams {
        self.params
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    fn send(&mut self, op: PendingOp, request: GatewayRequest) -> GameResult<Step> {
        let ticket = self.pending.request(op).ok_or(GameError::Busy)?;
        debug!("[DISPATCH] Ticket {} -> {}", ticket, request.kind());
        Ok(Step::Send(GatewayCall {
            ticket: Ticket::Game(ticket),
            request,
        }))
    }

    fn reconcile(&mut self, op: PendingOp, response: GatewayResponse) -> GameResult<Outcome> {
        match (op, response) {
            (PendingOp::Move(played), GatewayResponse::Move(reply)) => {
                self.reconcile_move(played, reply)
            }
            (PendingOp::Batch { moves }, GatewayResponse::BatchMoves(reply)) => {
                self.reconcile_batch(moves, reply)
            }
            (PendingOp::Undo, GatewayResponse::Undo(reply)) => self.reconcile_undo(reply),
            (PendingOp::NewGame(color), GatewayResponse::NewGame(reply)) => {
                self.reconcile_new_game(color, reply)
            }
            (op, response) => Err(GameError::TransportFailure(format!(
                "reply {response:?} does not answer {op:?}"
            ))),
        }
    }

    fn reconcile_move(&mut self, played: PlayedMove, reply: MoveReply) -> GameResult<Outcome> {
        let position = PositionStore::load(&reply.board_state.fen)?;
        self.position.replace(position);

        let played = if reply.san.is_empty() {
            played
        } else {
            PlayedMove {
                notation: reply.san,
                ..played
            }
        };

        self.phase = reply.game_phase;
        self.feedback = reply.coaching_feedback;
        self.last_move = Some(played.clone());
        self.selection.clear();
        info!("[DISPATCH] {} reconciled ({:?})", played, self.phase);

        Ok(Outcome::Move(MoveOutcome::Reconciled {
            played,
            fen: reply.board_state.fen,
        }))
    }

    fn reconcile_batch(&mut self, sent: usize, reply: BatchMovesReply) -> GameResult<Outcome> {
        let position = PositionStore::load(&reply.board_state.fen)?;
        let diverged = PositionStore::to_fen(&position) != self.position.fen();
        if diverged {
            warn!(
                "[DISPATCH] Coach applied {} of {} moves; adopting its position",
                reply.moves_played, sent
            );
            self.last_move = None;
        }

        self.phase = PositionStore::phase_of(&position, reply.board_state.moves.len());
        self.position.replace(position);
        self.buffer.clear();
        self.selection.clear();
        self.feedback = reply
            .coaching_feedback
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "Moves submitted successfully!".to_string());

        Ok(Outcome::BatchCoached {
            moves: reply.moves_played,
        })
    }

    fn reconcile_undo(&mut self, reply: UndoReply) -> GameResult<Outcome> {
        let position = PositionStore::load(&reply.board_state.fen)?;
        self.position.replace(position);
        self.last_move = None;
        self.selection.clear();
        self.phase = reply.game_phase;
        self.feedback = format!("Undid move: {}", reply.undone_move);
        info!("[UNDO] Coach took back {}", reply.undone_move);

        Ok(Outcome::Undone(UndoOutcome::Reconciled {
            undone: reply.undone_move,
            fen: reply.board_state.fen,
        }))
    }

    fn reconcile_new_game(
        &mut self,
        color: PlayerColor,
        reply: NewGameReply,
    ) -> GameResult<Outcome> {
        let position = PositionStore::load(&reply.board_state.fen)?;
        self.position.replace(position);
        self.buffer.clear();
        self.selection.clear();
        self.chat.reset();
        self.last_move = None;
        self.phase = GamePhase::Opening;
        self.params.player_color = color;
        self.feedback = "New game started! Make your first move.".to_string();
        info!("[DISPATCH] New game started");

        Ok(Outcome::GameStarted(color))
    }

    fn resolve_chat(
        &mut self,
        ticket: u64,
        result: Result<GatewayResponse, GatewayError>,
    ) -> GameResult<Outcome> {
        if !self.chat.finish(ticket) {
            warn!("[CHAT] Dropping answer for stale question {}", ticket);
            return Ok(Outcome::Ignored);
        }

        let err = match result {
            Ok(GatewayResponse::Chat(reply)) => {
                self.chat.push(ChatRole::Coach, reply.answer);
                return Ok(Outcome::ChatAnswered);
            }
            Ok(other) => GameError::TransportFailure(format!("unexpected chat reply {other:?}")),
            Err(err) => GameError::from(err),
        };

        warn!("[CHAT] Question failed: {}", err);
        self.chat.push(ChatRole::Error, err.user_message());
        Err(err)
    }

    fn record_failure(&mut self, err: &GameError) {
        if !err.replaces_feedback() {
            debug!("[DISPATCH] {}", err);
            return;
        }
        warn!("[DISPATCH] {}", err);
        self.feedback = err.user_message();
    }
}
