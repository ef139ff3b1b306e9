//! The interface an external visualizer drives against. The core solver
//! only ever calls into a `&mut dyn VisualSink`; it never renders anything
//! itself, and a `()` sink costs nothing when nobody is watching.

use crate::cnf::{ClauseId, Literal, VarId};

#[derive(Debug, Clone, PartialEq)]
pub enum VisualEvent {
    Decision {
        var: VarId,
        value: bool,
        level: usize,
    },
    Implication {
        lit: Literal,
        level: usize,
        antecedent: ClauseId,
    },
    Conflict {
        lits: Vec<Literal>,
    },
    Restart,
    Solution,
}

pub trait VisualSink {
    fn on_event(&mut self, event: VisualEvent);
}

/// Swallows every event. The default when a caller passes `None`.
impl VisualSink for () {
    fn on_event(&mut self, _event: VisualEvent) {}
}
