//! Response bodies shared by handlers.

use axum::Json;
use serde::{Deserialize, Serialize};

/// `{"message": "..."}`, used by status replies and every error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn message(text: &str) -> Json<MessageBody> {
    Json(MessageBody::new(text))
}
