use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Nothing submitted yet, or the last attempt was cleared.
    Idle,
    Pending,
    Success,
    Failure,
}

/// What the form shows to the user after (or during) a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStatus {
    pub outcome: Outcome,
    pub message: String,
}

impl SubmissionStatus {
    pub fn idle() -> Self {
        Self {
            outcome: Outcome::Idle,
            message: String::new(),
        }
    }

    pub fn pending() -> Self {
        Self {
            outcome: Outcome::Pending,
            message: String::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == Outcome::Pending
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::idle()
    }
}
