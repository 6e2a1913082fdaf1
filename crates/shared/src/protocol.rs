use serde::{Deserialize, Serialize};

use crate::domain::{AnswerVerdict, QuestionId, Team};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const CATEGORIES_PATH: &str = "/api/game/categories";
pub const START_GAME_PATH: &str = "/api/game/start";
pub const GAME_STATE_PATH: &str = "/api/game/state";
pub const RANDOM_QUESTION_PATH: &str = "/api/game/random-question";
pub const ANSWER_PATH: &str = "/api/game/answer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub team_names: Vec<String>,
}

/// Body of both `POST /api/game/start` and `GET /api/game/state`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateResponse {
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: QuestionId,
    pub team_name: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub correct: bool,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl AnswerResponse {
    pub fn verdict(&self) -> AnswerVerdict {
        AnswerVerdict {
            correct: self.correct,
            correct_answer: self.correct_answer.clone(),
        }
    }
}
