//! In-process game server used by the HTTP and controller tests.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{Question, QuestionId, Team},
    protocol::{
        AnswerRequest, AnswerResponse, GameStateResponse, LoginRequest, LoginResponse,
        StartGameRequest,
    },
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
pub struct Recorded {
    pub logins: usize,
    pub started_with: Vec<Vec<String>>,
    pub question_categories: Vec<String>,
    pub answers: Vec<AnswerRequest>,
    pub teams: Vec<Team>,
}

#[derive(Clone, Default)]
pub struct MockGameServer {
    pub recorded: Arc<Mutex<Recorded>>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: String,
}

async fn handle_login(
    State(server): State<MockGameServer>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    server.recorded.lock().await.logins += 1;
    if request.username == "teacher" && request.password == "password" {
        (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: Some("Login successful".to_string()),
            }),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: Some("Invalid username or password".to_string()),
            }),
        )
    }
}

async fn handle_categories() -> Json<Vec<String>> {
    Json(vec!["Math".to_string(), "History".to_string()])
}

async fn handle_start(
    State(server): State<MockGameServer>,
    Json(request): Json<StartGameRequest>,
) -> Json<GameStateResponse> {
    let mut recorded = server.recorded.lock().await;
    recorded.teams = request
        .team_names
        .iter()
        .map(|name| Team::new(name.clone(), 0))
        .collect();
    recorded.started_with.push(request.team_names);
    Json(GameStateResponse {
        teams: recorded.teams.clone(),
    })
}

async fn handle_state(State(server): State<MockGameServer>) -> Json<GameStateResponse> {
    Json(GameStateResponse {
        teams: server.recorded.lock().await.teams.clone(),
    })
}

async fn handle_random_question(
    State(server): State<MockGameServer>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Question>, StatusCode> {
    server
        .recorded
        .lock()
        .await
        .question_categories
        .push(query.category.clone());
    match query.category.as_str() {
        "Math" => Ok(Json(Question {
            id: QuestionId(7),
            category: "Math".to_string(),
            text: "What is six times seven?".to_string(),
        })),
        "Arts & Crafts" => Ok(Json(Question {
            id: QuestionId(11),
            category: query.category,
            text: "Name a primary color.".to_string(),
        })),
        "History" => Err(StatusCode::NOT_FOUND),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn handle_answer(
    State(server): State<MockGameServer>,
    Json(request): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    let mut recorded = server.recorded.lock().await;
    let correct = request.answer.trim() == "42";
    let delta = if correct { 5 } else { -1 };
    for team in recorded.teams.iter_mut() {
        if team.name == request.team_name {
            team.score += delta;
        }
    }
    recorded.answers.push(request);
    Json(AnswerResponse {
        correct,
        correct_answer: "42".to_string(),
        teams: recorded.teams.clone(),
    })
}

impl MockGameServer {
    pub async fn spawn() -> Result<(String, Self)> {
        let server = Self::default();
        let app = Router::new()
            .route("/api/auth/login", post(handle_login))
            .route("/api/game/categories", get(handle_categories))
            .route("/api/game/start", post(handle_start))
            .route("/api/game/state", get(handle_state))
            .route("/api/game/random-question", get(handle_random_question))
            .route("/api/game/answer", post(handle_answer))
            .with_state(server.clone());
        let url = serve(app).await?;
        Ok((url, server))
    }
}

/// A server that answers every request with a non-JSON 200 body.
pub async fn spawn_garbage_server() -> Result<String> {
    let app = Router::new().fallback(|| async { "<html>maintenance</html>" });
    serve(app).await
}

/// An address nothing listens on.
pub async fn closed_server_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn serve(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}
