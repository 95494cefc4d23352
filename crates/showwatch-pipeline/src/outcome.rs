use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    NoMatches,
    Failure,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::NoMatches => write!(f, "no_matches"),
            RunStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Summary of one pipeline run, for the scheduler or CLI to log.
///
/// A `Failure` with a non-zero `match_count` means the matches were real and
/// only delivery (or formatting) failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub match_count: usize,
    pub error_detail: Option<String>,
    pub delivery_id: Option<String>,
}

impl RunOutcome {
    #[must_use]
    pub fn success(run_id: Uuid, match_count: usize, delivery_id: Option<String>) -> Self {
        Self {
            run_id,
            status: RunStatus::Success,
            match_count,
            error_detail: None,
            delivery_id,
        }
    }

    #[must_use]
    pub fn no_matches(run_id: Uuid) -> Self {
        Self {
            run_id,
            status: RunStatus::NoMatches,
            match_count: 0,
            error_detail: None,
            delivery_id: None,
        }
    }

    #[must_use]
    pub fn failure(run_id: Uuid, match_count: usize, error_detail: impl Into<String>) -> Self {
        Self {
            run_id,
            status: RunStatus::Failure,
            match_count,
            error_detail: Some(error_detail.into()),
            delivery_id: None,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == RunStatus::Failure
    }
}
