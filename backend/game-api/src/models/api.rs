use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::GameError;

/// Uniform `{ success, data, error }` body used for everything that talks to the remote API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: error.into(),
        }
    }
}

impl<T> From<Result<T, GameError>> for ApiResponse<T> {
    fn from(result: Result<T, GameError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failure(e.user_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub eth_address: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub expiry: String,
    pub user: User,
}

/// Request to link an account with a one-time code
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginOtpRequest {
    #[validate(length(min = 1, max = 64, message = "Code must be between 1 and 64 characters"))]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameplayCreated {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KymQuestion {
    pub id: u64,
    pub gameplay_id: u64,
    pub token_id: u64,
    pub image_url: String,
    pub blurhash: String,
    pub color: String,
    pub title_options: String,
    pub artist_options: String,
    pub supply_options: String,
    pub season_options: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KymRevealedQuestion {
    #[serde(flatten)]
    pub question: KymQuestion,
    pub score: i64,
    pub title: String,
    pub artist: String,
    pub supply: u64,
    pub season: u32,
    pub title_answer: String,
    pub artist_answer: String,
    pub supply_answer: u64,
    pub season_answer: u32,
    pub created_at: String,
    pub updated_at: String,
    pub gameplay: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KymGameplaySummary {
    pub id: u64,
    pub score: i64,
    #[serde(default)]
    pub questions: Vec<KymRevealedQuestion>,
}

/// Player answers for one backend-issued question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KymAnswers {
    pub title: String,
    pub artist: String,
    pub supply: u64,
    pub season: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u64,
}

#[derive(Debug, Deserialize)]
pub struct SelectTagRequest {
    pub tag_id: String,
}
