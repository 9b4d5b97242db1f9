use serde::{Deserialize, Serialize};

/// A vote the caller wishes to cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub candidate: String,
}
