//! Follow-up question transcript
//!
//! Chat never touches the board, so it has its own in-flight ticket instead
//! of sharing the game's busy flag.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatRole {
    User,
    Coach,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl ChatLog {
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.entries.push(ChatEntry {
            role,
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Empty the transcript and abandon any outstanding question
    ///
    /// The ticket counter keeps running, so an answer to the abandoned
    /// question no longer matches and is dropped by [`ChatLog::finish`].
    pub fn reset(&mut self) {
        self.entries.clear();
        self.in_flight = None;
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Claim the in-flight slot for a new question
    pub fn begin(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_ticket += 1;
        self.in_flight = Some(self.next_ticket);
        self.in_flight
    }

    /// Release the in-flight slot if it belongs to `ticket`
    pub fn finish(&mut self, ticket: u64) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}
