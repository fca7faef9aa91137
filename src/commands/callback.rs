use serde::{Deserialize, Serialize};

use crate::error::UserInputError;

/// Selector carried by an inline button. Encoded as compact JSON, which keeps
/// it well under the 64 byte callback data limit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CallbackPayload {
    DeleteTask { position: usize },
}

impl CallbackPayload {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("Callback payload always serializes.")
    }

    pub fn decode(data: &str) -> Result<Self, UserInputError> {
        serde_json::from_str(data).map_err(|_| UserInputError::SelectorStale)
    }
}
