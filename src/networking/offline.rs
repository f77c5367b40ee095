//! In-process coaching gateway
//!
//! Keeps its own authoritative board the way the coaching backend does
//! (position, SAN history, undo stack) and answers with short canned
//! feedback instead of generated coaching. Used for `--offline` play and
//! as a realistic gateway in tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use shakmaty::Chess;
use tracing::debug;

use shared::protocol::{
    BatchMovesReply, BatchMovesRequest, BoardState, ChatReply, ChatRequest, CoachingIntensity,
    GamePhase, MoveReply, MoveRequest, NewGameReply, NewGameRequest, PlayerColor, UndoReply,
};

use super::{CoachingGateway, GatewayError, GatewayResult};
use crate::game::resources::{GameStatus, PositionStore};
use crate::game::types::{player_color, MoveInput};

#[derive(Debug, Default)]
struct OfflineBoard {
    position: Chess,
    moves: Vec<String>,
    /// Position before each entry of `moves`
    previous: Vec<Chess>,
}

impl OfflineBoard {
    fn play(&mut self, notation: &str) -> GatewayResult<String> {
        let (next, played) = PositionStore::apply_move(&self.position, &MoveInput::notation(notation))
            .map_err(|_| GatewayError::Rejected(format!("Invalid move: {notation}")))?;

        self.previous.push(std::mem::replace(&mut self.position, next));
        self.moves.push(played.notation.clone());
        Ok(played.notation)
    }

    fn take_back(&mut self) -> Option<String> {
        let undone = self.moves.pop()?;
        if let Some(previous) = self.previous.pop() {
            self.position = previous;
        }
        Some(undone)
    }

    fn phase(&self) -> GamePhase {
        PositionStore::phase_of(&self.position, self.moves.len())
    }

    fn state(&self) -> BoardState {
        let status = PositionStore::status_of(&self.position);
        BoardState {
            fen: PositionStore::to_fen(&self.position),
            turn: player_color(PositionStore::turn(&self.position)),
            move_number: self.moves.len(),
            moves: self.moves.clone(),
            is_check: matches!(status, GameStatus::Check | GameStatus::Checkmate),
            is_checkmate: status == GameStatus::Checkmate,
            is_stalemate: status == GameStatus::Stalemate,
            is_game_over: status.is_game_over(),
        }
    }
}

/// Gateway that never leaves the process
#[derive(Debug, Default)]
pub struct OfflineGateway {
    board: Mutex<OfflineBoard>,
}

impl OfflineGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// FEN of the gateway's own board
    pub fn fen(&self) -> String {
        PositionStore::to_fen(&self.board.lock().position)
    }

    /// SAN history of the gateway's own board
    pub fn moves(&self) -> Vec<String> {
        self.board.lock().moves.clone()
    }
}

fn canned_feedback(san: &str, phase: GamePhase, intensity: CoachingIntensity) -> String {
    let headline = match phase {
        GamePhase::Opening => {
            format!("{san}: in the opening, develop pieces and fight for the centre.")
        }
        GamePhase::Middlegame => {
            format!("{san}: look for active plans and keep your king safe.")
        }
        GamePhase::Endgame => {
            format!("{san}: activate your king and push passed pawns.")
        }
    };

    match intensity {
        CoachingIntensity::Low => headline,
        CoachingIntensity::Medium => {
            format!("{headline} Check what your opponent threatens before each move.")
        }
        CoachingIntensity::High => format!(
            "{headline} Check what your opponent threatens before each move, \
             and compare at least two candidate moves."
        ),
    }
}

#[async_trait]
impl CoachingGateway for OfflineGateway {
    async fn new_game(&self, request: NewGameRequest) -> GatewayResult<NewGameReply> {
        let mut board = self.board.lock();
        *board = OfflineBoard::default();

        let color = match request.player_color {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        };
        debug!("[OFFLINE] New game as {}", color);

        Ok(NewGameReply {
            message: format!("New game started. You are playing as {color}."),
            board_state: board.state(),
        })
    }

    async fn submit_move(&self, request: MoveRequest) -> GatewayResult<MoveReply> {
        if request.notation.trim().is_empty() {
            return Err(GatewayError::Rejected("No move provided".to_string()));
        }

        let mut board = self.board.lock();
        let san = board.play(request.notation.trim())?;
        let state = board.state();
        let phase = board.phase();
        debug!("[OFFLINE] Played {}", san);

        Ok(MoveReply {
            coaching_feedback: canned_feedback(&san, phase, request.coaching_intensity),
            san,
            game_phase: phase,
            is_check: state.is_check,
            is_checkmate: state.is_checkmate,
            is_game_over: state.is_game_over,
            board_state: state,
        })
    }

    /// Applies the whole batch or none of it
    async fn batch_moves(&self, request: BatchMovesRequest) -> GatewayResult<BatchMovesReply> {
        if request.moves.is_empty() {
            return Err(GatewayError::Rejected("No moves provided".to_string()));
        }

        let mut board = self.board.lock();
        let checkpoint = board.moves.len();
        let mut played = Vec::with_capacity(request.moves.len());

        for notation in &request.moves {
            match board.play(notation) {
                Ok(san) => played.push(san),
                Err(err) => {
                    while board.moves.len() > checkpoint {
                        board.take_back();
                    }
                    return Err(err);
                }
            }
        }

        let feedback = request
            .analyze_move
            .checked_sub(1)
            .and_then(|idx| played.get(idx))
            .map(|san| canned_feedback(san, board.phase(), CoachingIntensity::High));

        Ok(BatchMovesReply {
            moves_played: played.len(),
            board_state: board.state(),
            coaching_feedback: feedback,
        })
    }

    async fn undo(&self) -> GatewayResult<UndoReply> {
        let mut board = self.board.lock();
        let undone = board
            .take_back()
            .ok_or_else(|| GatewayError::Rejected("No moves to undo".to_string()))?;

        Ok(UndoReply {
            message: format!("Undid move: {undone}"),
            undone_move: undone,
            board_state: board.state(),
            game_phase: board.phase(),
        })
    }

    async fn chat(&self, request: ChatRequest) -> GatewayResult<ChatReply> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(GatewayError::Rejected("No question provided".to_string()));
        }

        let board = self.board.lock();
        let phase = match board.phase() {
            GamePhase::Opening => "opening",
            GamePhase::Middlegame => "middlegame",
            GamePhase::Endgame => "endgame",
        };

        Ok(ChatReply {
            answer: format!(
                "The coach is offline. You are {} moves into the {phase}; \
                 review the last feedback and compare candidate moves.",
                board.moves.len()
            ),
        })
    }
}
