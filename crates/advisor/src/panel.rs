//! Result panel state: one slot per backend operation.
//!
//! Each slot follows the same cycle: [`ResultPanel::begin`] sets the loading
//! flag, clears the previous outcome and issues a generation ticket;
//! [`ResultPanel::complete`] applies a response only if its ticket is still
//! current. Overlapping requests of the same kind therefore resolve to the
//! newest one, whatever order the responses arrive in.

use runtime::generation::{Generation, Ticket};
use serde::Serialize;
use tracing::debug;

use crate::client::AdvisorError;
use crate::markdown::render_markdown;
use crate::protocol::AdvisorResponse;

/// Shown when a request fails before a JSON answer is available.
pub const REQUEST_FAILED_MESSAGE: &str = "Erreur lors de la requête à l'API.";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Recommendation,
    FollowUp,
    ClimateImpact,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::Recommendation,
        Operation::FollowUp,
        Operation::ClimateImpact,
    ];

    /// Shown when the backend answers with neither `result` nor `error`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Recommendation => "Unknown error",
            Operation::FollowUp => "Erreur lors de la réponse",
            Operation::ClimateImpact => "Erreur lors de l'analyse climatique",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Answer { markdown: String, html: String },
    Error { message: String },
}

impl Outcome {
    pub fn answer(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let html = render_markdown(&markdown);
        Outcome::Answer { markdown, html }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error {
            message: message.into(),
        }
    }

    /// Maps a finished request to what the panel shows.
    pub fn from_result(op: Operation, result: Result<AdvisorResponse, AdvisorError>) -> Self {
        match result {
            Ok(resp) => {
                let present = |s: Option<String>| s.filter(|s| !s.is_empty());
                if let Some(answer) = present(resp.result) {
                    Outcome::answer(answer)
                } else if let Some(error) = present(resp.error) {
                    Outcome::error(error)
                } else {
                    Outcome::error(op.fallback_message())
                }
            }
            Err(_) => Outcome::error(REQUEST_FAILED_MESSAGE),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Slot {
    loading: bool,
    outcome: Option<Outcome>,
    #[serde(skip)]
    generation: Generation,
}

impl Slot {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultPanel {
    recommendation: Slot,
    follow_up: Slot,
    climate_impact: Slot,
}

impl ResultPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, op: Operation) -> &Slot {
        match op {
            Operation::Recommendation => &self.recommendation,
            Operation::FollowUp => &self.follow_up,
            Operation::ClimateImpact => &self.climate_impact,
        }
    }

    fn slot_mut(&mut self, op: Operation) -> &mut Slot {
        match op {
            Operation::Recommendation => &mut self.recommendation,
            Operation::FollowUp => &mut self.follow_up,
            Operation::ClimateImpact => &mut self.climate_impact,
        }
    }

    /// Starts a request: loading on, previous outcome cleared.
    pub fn begin(&mut self, op: Operation) -> Ticket {
        let slot = self.slot_mut(op);
        slot.loading = true;
        slot.outcome = None;
        slot.generation.issue()
    }

    /// Applies a finished request. Returns `false` if it was stale.
    pub fn complete(&mut self, op: Operation, ticket: Ticket, outcome: Outcome) -> bool {
        let slot = self.slot_mut(op);
        if !slot.generation.is_current(ticket) {
            debug!(?op, ticket = ticket.value(), "discarding stale response");
            return false;
        }
        slot.loading = false;
        slot.outcome = Some(outcome);
        true
    }

    /// Clears one slot and retires any request in flight for it.
    pub fn dismiss(&mut self, op: Operation) {
        let slot = self.slot_mut(op);
        slot.generation.invalidate();
        slot.loading = false;
        slot.outcome = None;
    }

    /// Clears every slot; used when the selected location changes.
    pub fn clear_all(&mut self) {
        for op in Operation::ALL {
            self.dismiss(op);
        }
    }

    pub fn is_loading(&self, op: Operation) -> bool {
        self.slot(op).loading
    }

    pub fn outcome(&self, op: Operation) -> Option<&Outcome> {
        self.slot(op).outcome.as_ref()
    }
}
