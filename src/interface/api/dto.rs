//! API request/response bodies

use serde::{Deserialize, Serialize};

/// Envelope used for errors and auxiliary endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Body of a successful `POST /outbound` or `POST /inbound_call`
#[derive(Debug, Serialize, Deserialize)]
pub struct CallCreatedResponse {
    pub conversation_id: String,
}
