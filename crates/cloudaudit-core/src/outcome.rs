//! Run outcome and the exit-code contract.

use serde::Serialize;

/// Exit code for a run that failed before a report could be produced.
pub const EXIT_ERROR: i32 = 1;

/// Outcome of one audit run, derived solely from the violation count.
///
/// The exit-code contract is uniform across every rule:
/// `0` compliant, `2` violations found, `1` unrecoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Compliant,
    ViolationsFound { count: usize },
}

impl RunOutcome {
    pub fn from_violations(count: usize) -> Self {
        if count == 0 {
            RunOutcome::Compliant
        } else {
            RunOutcome::ViolationsFound { count }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Compliant => 0,
            RunOutcome::ViolationsFound { .. } => 2,
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, RunOutcome::Compliant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_violations_exits_zero() {
        let outcome = RunOutcome::from_violations(0);
        assert_eq!(outcome, RunOutcome::Compliant);
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_violations_exit_two() {
        let outcome = RunOutcome::from_violations(3);
        assert_eq!(outcome, RunOutcome::ViolationsFound { count: 3 });
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn test_error_exit_code_is_one() {
        assert_eq!(EXIT_ERROR, 1);
    }
}
