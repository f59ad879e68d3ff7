//! Resolution tracker: records declaration state transitions
//!
//! Every declaration task owns a [`StateCursor`] and reports its own
//! transitions through an unbounded channel. Nothing is shared between
//! tasks except the sending half; the log is drained into a
//! [`ResolutionReport`] once the resolution has settled.

use chain_types::{DeclarationState, Name, ResolutionId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A single recorded state change
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Declaration (or external name) that changed state
    pub name: Name,
    pub from: DeclarationState,
    pub to: DeclarationState,
    /// Extra context, e.g. the failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

/// Sending side, cloned into every declaration task
#[derive(Clone, Debug)]
pub struct ResolutionTracker {
    resolution_id: ResolutionId,
    sender: Option<mpsc::UnboundedSender<TransitionRecord>>,
}

impl ResolutionTracker {
    /// A tracker that records transitions into the returned log
    pub fn channel(resolution_id: ResolutionId) -> (Self, TransitionLog) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let tracker = Self {
            resolution_id: resolution_id.clone(),
            sender: Some(sender),
        };
        (
            tracker,
            TransitionLog {
                resolution_id,
                receiver,
            },
        )
    }

    /// A tracker that only keeps the resolution id for log context
    pub fn disabled(resolution_id: ResolutionId) -> Self {
        Self {
            resolution_id,
            sender: None,
        }
    }

    pub fn resolution_id(&self) -> &ResolutionId {
        &self.resolution_id
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Start tracking a declaration in the `Unresolved` state
    pub fn cursor(&self, name: Name) -> StateCursor {
        StateCursor {
            name,
            state: DeclarationState::Unresolved,
            tracker: self.clone(),
        }
    }

    fn record(&self, record: TransitionRecord) {
        tracing::debug!(
            resolution = %self.resolution_id.short(),
            declaration = %record.name,
            from = %record.from,
            to = %record.to,
            "Declaration transition"
        );
        if let Some(sender) = &self.sender {
            // The log may already be drained; late transitions are dropped
            let _ = sender.send(record);
        }
    }
}

/// Current state of one declaration, advanced only along legal edges
#[derive(Debug)]
pub struct StateCursor {
    name: Name,
    state: DeclarationState,
    tracker: ResolutionTracker,
}

impl StateCursor {
    pub fn state(&self) -> DeclarationState {
        self.state
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Move to `next`; illegal transitions are logged and ignored
    pub fn advance(&mut self, next: DeclarationState, detail: Option<String>) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                declaration = %self.name,
                from = %self.state,
                to = %next,
                "Illegal declaration transition ignored"
            );
            return false;
        }
        self.tracker.record(TransitionRecord {
            name: self.name.clone(),
            from: self.state,
            to: next,
            detail,
            at: Utc::now(),
        });
        self.state = next;
        true
    }
}

/// Receiving side, turned into a report once the resolution settles
#[derive(Debug)]
pub struct TransitionLog {
    resolution_id: ResolutionId,
    receiver: mpsc::UnboundedReceiver<TransitionRecord>,
}

impl TransitionLog {
    /// Drain every transition recorded so far
    ///
    /// `declared` seeds the report so declarations that never moved show
    /// up as `Unresolved`.
    pub fn into_report<'a>(mut self, declared: impl IntoIterator<Item = &'a Name>) -> ResolutionReport {
        let mut states: IndexMap<Name, DeclarationState> = declared
            .into_iter()
            .map(|name| (name.clone(), DeclarationState::Unresolved))
            .collect();

        let mut transitions = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            states.insert(record.name.clone(), record.to);
            transitions.push(record);
        }

        ResolutionReport {
            resolution_id: self.resolution_id,
            states,
            transitions,
        }
    }
}

/// Final per-declaration states and the ordered transition history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub resolution_id: ResolutionId,
    /// Last known state of every declared (and external) name
    pub states: IndexMap<Name, DeclarationState>,
    /// Transitions in the order they were recorded
    pub transitions: Vec<TransitionRecord>,
}

impl ResolutionReport {
    pub fn state(&self, name: &str) -> Option<DeclarationState> {
        self.states.get(name).copied()
    }

    /// Names that reached `Resolved`
    pub fn resolved(&self) -> Vec<&Name> {
        self.names_in(DeclarationState::Resolved)
    }

    /// Names that reached `Failed`
    pub fn failed(&self) -> Vec<&Name> {
        self.names_in(DeclarationState::Failed)
    }

    /// Transitions recorded for a single name
    pub fn transitions_for(&self, name: &str) -> Vec<&TransitionRecord> {
        self.transitions
            .iter()
            .filter(|record| record.name.as_str() == name)
            .collect()
    }

    fn names_in(&self, state: DeclarationState) -> Vec<&Name> {
        self.states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeclarationState::*;

    #[test]
    fn test_cursor_records_legal_path() {
        let (tracker, log) = ResolutionTracker::channel(ResolutionId::new("run-1"));
        let mut cursor = tracker.cursor(Name::new("a"));

        assert!(cursor.advance(Pending, None));
        assert!(cursor.advance(Running, None));
        assert!(cursor.advance(Resolved, None));
        assert_eq!(cursor.state(), Resolved);

        let report = log.into_report([&Name::new("a"), &Name::new("b")]);
        assert_eq!(report.state("a"), Some(Resolved));
        assert_eq!(report.state("b"), Some(Unresolved));
        assert_eq!(report.transitions_for("a").len(), 3);
        assert_eq!(report.resolved(), vec![&Name::new("a")]);
        assert!(report.failed().is_empty());
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let (tracker, log) = ResolutionTracker::channel(ResolutionId::new("run-2"));
        let mut cursor = tracker.cursor(Name::new("a"));

        assert!(!cursor.advance(Running, None));
        assert_eq!(cursor.state(), Unresolved);
        assert!(cursor.advance(Failed, Some("lookup".into())));
        assert!(!cursor.advance(Resolved, None));

        let report = log.into_report([cursor.name()]);
        assert_eq!(report.transitions.len(), 1);
        assert_eq!(report.transitions[0].detail.as_deref(), Some("lookup"));
        assert_eq!(report.failed(), vec![&Name::new("a")]);
    }

    #[test]
    fn test_disabled_tracker_still_advances() {
        let tracker = ResolutionTracker::disabled(ResolutionId::new("run-3"));
        assert!(!tracker.is_enabled());
        let mut cursor = tracker.cursor(Name::new("x"));
        assert!(cursor.advance(Resolved, None));
        assert_eq!(cursor.state(), Resolved);
    }

    #[test]
    fn test_report_serializes() {
        let (tracker, log) = ResolutionTracker::channel(ResolutionId::new("run-4"));
        tracker.cursor(Name::new("svc")).advance(Resolved, None);
        let report = log.into_report(std::iter::empty());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["states"]["svc"], "Resolved");
        assert_eq!(json["resolution_id"], "run-4");
    }
}
