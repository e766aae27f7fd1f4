//! Export lifecycle

use std::fmt;

/// Stage of a single export call
///
/// `Idle -> Capturing -> Restoring -> Paginating -> Saved`, with `Failed`
/// reachable from any non-terminal stage. Nothing persists between calls,
/// so both terminal stages are followed by a fresh `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Capturing,
    Restoring,
    Paginating,
    Saved,
    Failed,
}

impl ExportStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportStage::Saved | ExportStage::Failed)
    }

    pub fn can_transition_to(&self, next: ExportStage) -> bool {
        use ExportStage::*;
        match (self, next) {
            (Idle, Capturing) => true,
            (Capturing, Restoring) => true,
            (Restoring, Paginating) => true,
            (Paginating, Saved) => true,
            (Saved | Failed, Idle) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Idle => "idle",
            ExportStage::Capturing => "capturing",
            ExportStage::Restoring => "restoring",
            ExportStage::Paginating => "paginating",
            ExportStage::Saved => "saved",
            ExportStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the stage of one export call and logs each transition
#[derive(Debug)]
pub(crate) struct StageTracker {
    region: String,
    current: ExportStage,
}

impl StageTracker {
    pub(crate) fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            current: ExportStage::Idle,
        }
    }

    pub(crate) fn current(&self) -> ExportStage {
        self.current
    }

    pub(crate) fn advance(&mut self, next: ExportStage) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal export transition {} -> {}",
            self.current,
            next
        );
        tracing::debug!(region = %self.region, from = %self.current, to = %next, "export stage");
        self.current = next;
    }

    /// Move to `Failed` unless already terminal
    pub(crate) fn fail(&mut self) {
        if !self.current.is_terminal() {
            self.advance(ExportStage::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            ExportStage::Idle,
            ExportStage::Capturing,
            ExportStage::Restoring,
            ExportStage::Paginating,
            ExportStage::Saved,
            ExportStage::Idle,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_any_active_stage_can_fail() {
        for stage in [
            ExportStage::Idle,
            ExportStage::Capturing,
            ExportStage::Restoring,
            ExportStage::Paginating,
        ] {
            assert!(stage.can_transition_to(ExportStage::Failed));
        }
        assert!(!ExportStage::Saved.can_transition_to(ExportStage::Failed));
        assert!(ExportStage::Failed.can_transition_to(ExportStage::Idle));
    }

    #[test]
    fn test_no_skipping_restore() {
        assert!(!ExportStage::Capturing.can_transition_to(ExportStage::Paginating));
        assert!(!ExportStage::Idle.can_transition_to(ExportStage::Saved));
    }

    #[test]
    fn test_tracker_fail_is_idempotent() {
        let mut tracker = StageTracker::new("invoice");
        tracker.advance(ExportStage::Capturing);
        tracker.fail();
        tracker.fail();
        assert_eq!(tracker.current(), ExportStage::Failed);
    }
}
