use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AnswerVerdict, Question, QuestionId, Team},
    error::GameError,
    protocol::{
        AnswerRequest, AnswerResponse, GameStateResponse, LoginRequest, LoginResponse,
        StartGameRequest, ANSWER_PATH, CATEGORIES_PATH, GAME_STATE_PATH, LOGIN_PATH,
        RANDOM_QUESTION_PATH, START_GAME_PATH,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod controller;
pub mod requests;
pub mod session;
pub mod teams;

pub use controller::GameController;
pub use session::{Resolution, Session};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Adjudication plus the scoreboard the server recorded after applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub verdict: AnswerVerdict,
    pub teams: Vec<Team>,
}

/// The remote scoring authority. Each call is one request with no retry.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Transport failures surface as `AuthRejected("Unable to reach server")`.
    async fn login(&self, username: &str, password: &str) -> Result<(), GameError>;
    async fn start_game(&self, team_names: &[String]) -> Result<Vec<Team>, GameError>;
    async fn fetch_categories(&self) -> Result<Vec<String>, GameError>;
    /// A 404 is `CategoryExhausted`, never a transport failure.
    async fn fetch_random_question(&self, category: &str) -> Result<Question, GameError>;
    async fn submit_answer(
        &self,
        question_id: QuestionId,
        team_name: &str,
        answer: &str,
    ) -> Result<AnswerOutcome, GameError>;
    async fn fetch_scoreboard(&self) -> Result<Vec<Team>, GameError>;
}

#[async_trait]
impl<T> GameApi for std::sync::Arc<T>
where
    T: GameApi + ?Sized,
{
    async fn login(&self, username: &str, password: &str) -> Result<(), GameError> {
        (**self).login(username, password).await
    }

    async fn start_game(&self, team_names: &[String]) -> Result<Vec<Team>, GameError> {
        (**self).start_game(team_names).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, GameError> {
        (**self).fetch_categories().await
    }

    async fn fetch_random_question(&self, category: &str) -> Result<Question, GameError> {
        (**self).fetch_random_question(category).await
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        team_name: &str,
        answer: &str,
    ) -> Result<AnswerOutcome, GameError> {
        (**self).submit_answer(question_id, team_name, answer).await
    }

    async fn fetch_scoreboard(&self) -> Result<Vec<Team>, GameError> {
        (**self).fetch_scoreboard().await
    }
}

fn transport(err: reqwest::Error) -> GameError {
    GameError::transport(err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GameError> {
    response
        .error_for_status()
        .map_err(transport)?
        .json()
        .await
        .map_err(transport)
}

/// `reqwest`-backed [`GameApi`] talking to the JSON game server.
#[derive(Clone)]
pub struct HttpGameClient {
    http: Client,
    server_url: String,
}

impl HttpGameClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "unsupported server url scheme '{}'; expected http or https",
                parsed.scheme()
            ));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

#[async_trait]
impl GameApi for HttpGameClient {
    async fn login(&self, username: &str, password: &str) -> Result<(), GameError> {
        let unreachable = |err: reqwest::Error| {
            warn!(error = %err, "login request failed");
            GameError::auth(session::UNREACHABLE_SERVER)
        };
        let response = self
            .http
            .post(self.endpoint(LOGIN_PATH))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            // Rejections still carry a `{success, message}` body.
            let message = response
                .json::<LoginResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| session::LOGIN_FAILED.to_string());
            debug!(%status, "login rejected");
            return Err(GameError::auth(message));
        }

        let body: LoginResponse = response.json().await.map_err(unreachable)?;
        if body.success {
            Ok(())
        } else {
            Err(GameError::auth(
                body.message
                    .unwrap_or_else(|| session::LOGIN_FAILED.to_string()),
            ))
        }
    }

    async fn start_game(&self, team_names: &[String]) -> Result<Vec<Team>, GameError> {
        if team_names.is_empty() {
            return Err(GameError::validation(session::NO_TEAM_NAMES));
        }
        let response = self
            .http
            .post(self.endpoint(START_GAME_PATH))
            .json(&StartGameRequest {
                team_names: team_names.to_vec(),
            })
            .send()
            .await
            .map_err(transport)?;
        let body: GameStateResponse = read_json(response).await?;
        Ok(body.teams)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, GameError> {
        let response = self
            .http
            .get(self.endpoint(CATEGORIES_PATH))
            .send()
            .await
            .map_err(transport)?;
        let categories: Option<Vec<String>> = read_json(response).await?;
        Ok(categories.unwrap_or_default())
    }

    async fn fetch_random_question(&self, category: &str) -> Result<Question, GameError> {
        let response = self
            .http
            .get(self.endpoint(RANDOM_QUESTION_PATH))
            .query(&[("category", category)])
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(category, "category exhausted");
            return Err(GameError::CategoryExhausted(category.to_string()));
        }

        read_json(response).await
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        team_name: &str,
        answer: &str,
    ) -> Result<AnswerOutcome, GameError> {
        let response = self
            .http
            .post(self.endpoint(ANSWER_PATH))
            .json(&AnswerRequest {
                question_id,
                team_name: team_name.to_string(),
                answer: answer.to_string(),
            })
            .send()
            .await
            .map_err(transport)?;
        let body: AnswerResponse = read_json(response).await?;
        Ok(AnswerOutcome {
            verdict: body.verdict(),
            teams: body.teams,
        })
    }

    async fn fetch_scoreboard(&self) -> Result<Vec<Team>, GameError> {
        let response = self
            .http
            .get(self.endpoint(GAME_STATE_PATH))
            .send()
            .await
            .map_err(transport)?;
        let body: GameStateResponse = read_json(response).await?;
        Ok(body.teams)
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
