//! # Workflow State Machine
//!
//! The six-step study flow a front end walks through:
//!
//! ```text
//! Upload → Mesh → Material → Configure → Run → Results
//! ```
//!
//! Moves are one step at a time. Entering `Run` requires at least one
//! configured scenario in the session.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::session::Session;
//! use pack_core::workflow::{Step, StepStatus, Workflow};
//!
//! let session = Session::default();
//! let mut flow = Workflow::new();
//! flow.advance(&session).unwrap();
//! assert_eq!(flow.current(), Step::Mesh);
//! assert_eq!(flow.status(Step::Upload), StepStatus::Completed);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Upload,
    Mesh,
    Material,
    Configure,
    Run,
    Results,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Upload,
        Step::Mesh,
        Step::Material,
        Step::Configure,
        Step::Run,
        Step::Results,
    ];

    /// Zero-based position in the flow
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Step::Upload => "Upload",
            Step::Mesh => "Mesh",
            Step::Material => "Material",
            Step::Configure => "Configure",
            Step::Run => "Run",
            Step::Results => "Results",
        }
    }

    fn next(&self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    fn previous(&self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Workflow {
    current: Step,
}

impl Workflow {
    pub fn new() -> Self {
        Workflow::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Move forward one step.
    ///
    /// # Errors
    ///
    /// * `InvalidTransition` - already at `Results`
    /// * `NoTestsSelected` - entering `Run` with nothing configured
    pub fn advance(&mut self, session: &Session) -> SimResult<Step> {
        let next = self.current.next().ok_or_else(|| {
            SimError::invalid_transition(self.current.display_name(), "Results is the final step")
        })?;
        if next == Step::Run && session.tests.is_empty() {
            return Err(SimError::NoTestsSelected);
        }
        log::debug!("workflow {} -> {}", self.current, next);
        self.current = next;
        Ok(next)
    }

    /// Move back one step.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when already at `Upload`.
    pub fn back(&mut self) -> SimResult<Step> {
        let previous = self.current.previous().ok_or_else(|| {
            SimError::invalid_transition(self.current.display_name(), "Upload is the first step")
        })?;
        log::debug!("workflow {} <- {}", previous, self.current);
        self.current = previous;
        Ok(previous)
    }

    /// Return to `Upload`.
    pub fn reset(&mut self) {
        self.current = Step::Upload;
    }

    /// Where `step` stands relative to the current step
    pub fn status(&self, step: Step) -> StepStatus {
        match step.cmp(&self.current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::TestConfig;
    use crate::scenarios::TestType;

    fn configured() -> Session {
        let mut session = Session::default();
        session.tests.push(TestConfig::default_for(TestType::Drop));
        session
    }

    #[test]
    fn test_full_walk() {
        let session = configured();
        let mut flow = Workflow::new();
        for expected in &Step::ALL[1..] {
            assert_eq!(flow.advance(&session).unwrap(), *expected);
        }
        assert_eq!(flow.current(), Step::Results);

        let err = flow.advance(&session).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(flow.current(), Step::Results);
    }

    #[test]
    fn test_run_needs_tests() {
        let empty = Session::default();
        let mut flow = Workflow::new();
        for _ in 0..3 {
            flow.advance(&empty).unwrap();
        }
        assert_eq!(flow.current(), Step::Configure);
        assert_eq!(flow.advance(&empty).unwrap_err(), SimError::NoTestsSelected);
        assert_eq!(flow.current(), Step::Configure);

        assert_eq!(flow.advance(&configured()).unwrap(), Step::Run);
    }

    #[test]
    fn test_back_and_reset() {
        let session = configured();
        let mut flow = Workflow::new();
        assert!(flow.back().is_err());

        flow.advance(&session).unwrap();
        flow.advance(&session).unwrap();
        assert_eq!(flow.back().unwrap(), Step::Mesh);

        flow.reset();
        assert_eq!(flow.current(), Step::Upload);
    }

    #[test]
    fn test_status() {
        let session = configured();
        let mut flow = Workflow::new();
        flow.advance(&session).unwrap();
        flow.advance(&session).unwrap();

        assert_eq!(flow.status(Step::Upload), StepStatus::Completed);
        assert_eq!(flow.status(Step::Mesh), StepStatus::Completed);
        assert_eq!(flow.status(Step::Material), StepStatus::Current);
        assert_eq!(flow.status(Step::Results), StepStatus::Pending);
    }

    #[test]
    fn test_index_roundtrip() {
        for step in Step::ALL {
            assert_eq!(Step::from_index(step.index()), Some(step));
        }
        assert_eq!(Step::from_index(6), None);
    }
}
