//! Runs presenter intents through the session and the remote game API.

use shared::error::GameError;
use tracing::{debug, info, warn};

use crate::{
    session::{Resolution, Session},
    GameApi,
};

fn log_stale(operation: &'static str, resolution: Resolution) {
    if resolution == Resolution::Stale {
        debug!(operation, "discarded stale response");
    }
}

/// Session state worth logging after a resolve; a stale response changed nothing.
fn applied<T>(resolution: Resolution, state: Option<T>) -> Option<T> {
    (resolution == Resolution::Applied).then_some(state).flatten()
}

pub struct GameController<A: GameApi> {
    api: A,
    session: Session,
}

impl<A: GameApi> GameController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), GameError> {
        let ticket = self.session.begin_login()?;
        let outcome = self.api.login(username, password).await;
        match self.session.resolve_login(&ticket, outcome) {
            Ok(resolution) => {
                log_stale("login", resolution);
                if resolution == Resolution::Applied {
                    info!(username, "presenter logged in");
                }
                Ok(())
            }
            Err(err) => {
                warn!(username, error = %err, "login rejected");
                Err(err)
            }
        }
    }

    pub fn set_team_count(&mut self, count: usize) -> Result<(), GameError> {
        self.session.set_team_count(count)
    }

    pub fn set_team_name(&mut self, index: usize, name: &str) -> Result<(), GameError> {
        self.session.set_team_name(index, name)
    }

    /// Starts a game with the trimmed, non-blank team names, then loads the
    /// category list. A failed category load does not undo the start.
    pub async fn start_game(&mut self) -> Result<(), GameError> {
        let ticket = self.session.begin_start_game()?;
        info!(teams = ?ticket.team_names, "starting game");
        let outcome = self.api.start_game(&ticket.team_names).await;
        match self.session.resolve_start_game(&ticket, outcome) {
            Ok(Resolution::Applied) => {}
            Ok(Resolution::Stale) => {
                log_stale("start_game", Resolution::Stale);
                return Ok(());
            }
            Err(err) => {
                warn!(error = %err, "start game failed");
                return Err(err);
            }
        }

        if let Err(err) = self.load_categories().await {
            warn!(error = %err, "category load failed; keeping previous categories");
        }
        Ok(())
    }

    pub async fn load_categories(&mut self) -> Result<(), GameError> {
        let ticket = self.session.begin_categories()?;
        let outcome = self.api.fetch_categories().await;
        let resolution = self.session.resolve_categories(&ticket, outcome)?;
        log_stale("fetch_categories", resolution);
        if resolution == Resolution::Applied {
            info!(count = self.session.categories().len(), "categories loaded");
        }
        Ok(())
    }

    pub async fn select_category(&mut self, category: &str) -> Result<(), GameError> {
        let ticket = self.session.begin_question(category)?;
        self.fetch_question(ticket).await
    }

    pub async fn next_question(&mut self) -> Result<(), GameError> {
        let ticket = self.session.begin_next_question()?;
        self.fetch_question(ticket).await
    }

    async fn fetch_question(
        &mut self,
        ticket: crate::session::QuestionTicket,
    ) -> Result<(), GameError> {
        let outcome = self.api.fetch_random_question(&ticket.category).await;
        match self.session.resolve_question(&ticket, outcome) {
            Ok(resolution) => {
                log_stale("fetch_random_question", resolution);
                if let Some(question) = applied(resolution, self.session.active_question()) {
                    info!(
                        question_id = question.id.0,
                        category = %question.category,
                        "question displayed"
                    );
                }
                Ok(())
            }
            Err(err @ GameError::CategoryExhausted(_)) => {
                info!(category = %ticket.category, "category has no questions left");
                Err(err)
            }
            Err(err) => {
                warn!(category = %ticket.category, error = %err, "question fetch failed");
                Err(err)
            }
        }
    }

    pub fn choose_answer_team(&mut self, team_name: &str) -> Result<(), GameError> {
        self.session.choose_answer_team(team_name)
    }

    pub fn edit_answer(&mut self, answer: &str) -> Result<(), GameError> {
        self.session.edit_answer(answer)
    }

    pub async fn submit_answer(&mut self) -> Result<(), GameError> {
        let ticket = self.session.begin_submit_answer()?;
        let outcome = self
            .api
            .submit_answer(ticket.question_id, &ticket.team_name, &ticket.answer)
            .await;
        match self.session.resolve_answer(&ticket, outcome) {
            Ok(resolution) => {
                log_stale("submit_answer", resolution);
                if let Some(result) = applied(resolution, self.session.answer_result()) {
                    info!(
                        question_id = ticket.question_id.0,
                        team = %ticket.team_name,
                        correct = result.correct,
                        "answer adjudicated"
                    );
                }
                Ok(())
            }
            Err(err) => {
                warn!(question_id = ticket.question_id.0, error = %err, "answer submission failed");
                Err(err)
            }
        }
    }

    pub async fn refresh_scoreboard(&mut self) -> Result<(), GameError> {
        let ticket = self.session.begin_refresh_scoreboard()?;
        let outcome = self.api.fetch_scoreboard().await;
        match self.session.resolve_scoreboard(&ticket, outcome) {
            Ok(resolution) => {
                log_stale("fetch_scoreboard", resolution);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "scoreboard refresh failed");
                Err(err)
            }
        }
    }

    pub fn return_to_setup(&mut self) -> Result<(), GameError> {
        self.session.return_to_setup()?;
        info!("returned to team setup");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
