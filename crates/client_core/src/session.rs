//! Presenter session state machine.
//!
//! Network-backed transitions come in pairs: a `begin_*` method checks the
//! local guards, marks the matching request slot in flight and hands back a
//! ticket; the `resolve_*` method takes that ticket plus the remote outcome and
//! applies it only if the ticket still describes the current state. Anything
//! superseded in between is reported as [`Resolution::Stale`] and dropped.

use shared::{
    domain::{AnswerVerdict, Phase, Question, QuestionId, Team, MAX_TEAMS, MIN_TEAMS},
    error::{GameError, Notice},
};

use crate::{
    requests::{RequestSlot, RequestTag, TagIssuer},
    teams::{derive_team_names, trimmed_team_names},
    AnswerOutcome,
};

pub const DEFAULT_TEAM_COUNT: usize = 2;

pub const UNREACHABLE_SERVER: &str = "Unable to reach server";
pub const LOGIN_FAILED: &str = "Login failed";
pub const NO_TEAM_NAMES: &str = "Please provide at least one team name.";
pub const NO_ANSWERING_TEAM: &str = "Please choose a team answering.";
pub const BLANK_ANSWER: &str = "Please type an answer.";
pub const START_FAILED: &str = "Could not start game. Check backend server.";
pub const QUESTION_FAILED: &str = "Failed to fetch question.";
pub const CATEGORY_EXHAUSTED: &str = "No questions remaining for this category.";
pub const ANSWER_FAILED: &str = "Failed to submit answer.";
pub const SCOREBOARD_FAILED: &str = "Failed to refresh scoreboard.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The response no longer matches the session and was discarded.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTicket {
    pub tag: RequestTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    pub tag: RequestTag,
    pub team_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoriesTicket {
    pub tag: RequestTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTicket {
    pub tag: RequestTag,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerTicket {
    pub tag: RequestTag,
    pub question_id: QuestionId,
    pub team_name: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardTicket {
    pub tag: RequestTag,
}

/// Answer input for the active question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerDraft {
    pub team_name: String,
    pub answer_text: String,
}

#[derive(Debug, Default)]
struct Slots {
    login: RequestSlot,
    start: RequestSlot,
    categories: RequestSlot,
    question: RequestSlot,
    answer: RequestSlot,
    scoreboard: RequestSlot,
}

impl Slots {
    fn reset_all(&mut self) {
        self.login.reset();
        self.start.reset();
        self.categories.reset();
        self.question.reset();
        self.answer.reset();
        self.scoreboard.reset();
    }
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    team_count: usize,
    team_names: Vec<String>,
    teams: Vec<Team>,
    categories: Vec<String>,
    active_question: Option<Question>,
    answer_draft: AnswerDraft,
    answer_result: Option<AnswerVerdict>,
    login_error: Option<String>,
    notice: Option<Notice>,
    slots: Slots,
    tags: TagIssuer,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::LoggedOut,
            team_count: DEFAULT_TEAM_COUNT,
            team_names: derive_team_names(&[], DEFAULT_TEAM_COUNT),
            teams: Vec::new(),
            categories: Vec::new(),
            active_question: None,
            answer_draft: AnswerDraft::default(),
            answer_result: None,
            login_error: None,
            notice: None,
            slots: Slots::default(),
            tags: TagIssuer::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn team_names(&self) -> &[String] {
        &self.team_names
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.active_question.as_ref()
    }

    pub fn answer_draft(&self) -> &AnswerDraft {
        &self.answer_draft
    }

    pub fn answer_result(&self) -> Option<&AnswerVerdict> {
        self.answer_result.as_ref()
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn login_pending(&self) -> bool {
        self.slots.login.is_busy()
    }

    pub fn start_pending(&self) -> bool {
        self.slots.start.is_busy()
    }

    pub fn categories_loading(&self) -> bool {
        self.slots.categories.is_busy()
    }

    pub fn question_loading(&self) -> bool {
        self.slots.question.is_busy()
    }

    pub fn answer_submitting(&self) -> bool {
        self.slots.answer.is_busy()
    }

    pub fn scoreboard_loading(&self) -> bool {
        self.slots.scoreboard.is_busy()
    }

    pub fn any_busy(&self) -> bool {
        self.login_pending()
            || self.start_pending()
            || self.categories_loading()
            || self.question_loading()
            || self.answer_submitting()
            || self.scoreboard_loading()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -- login -------------------------------------------------------------

    pub fn begin_login(&mut self) -> Result<LoginTicket, GameError> {
        self.require_phase(Phase::LoggedOut, "Logging in")?;
        if self.slots.login.is_busy() {
            return Err(self.reject(GameError::validation("A login is already in progress.")));
        }
        self.login_error = None;
        self.notice = None;
        let tag = self.tags.next();
        self.slots.login.start(tag);
        Ok(LoginTicket { tag })
    }

    pub fn resolve_login(
        &mut self,
        ticket: &LoginTicket,
        outcome: Result<(), GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.login.resolve(ticket.tag) || self.phase != Phase::LoggedOut {
            return Ok(Resolution::Stale);
        }
        match outcome {
            Ok(()) => {
                self.login_error = None;
                self.phase = Phase::SettingUp;
                Ok(Resolution::Applied)
            }
            Err(err) => {
                let message = match &err {
                    GameError::AuthRejected(message) if !message.trim().is_empty() => {
                        message.clone()
                    }
                    GameError::AuthRejected(_) => LOGIN_FAILED.to_string(),
                    _ => UNREACHABLE_SERVER.to_string(),
                };
                self.login_error = Some(message.clone());
                Err(GameError::AuthRejected(message))
            }
        }
    }

    // -- team setup --------------------------------------------------------

    pub fn set_team_count(&mut self, count: usize) -> Result<(), GameError> {
        self.require_phase(Phase::SettingUp, "Changing the team count")?;
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&count) {
            return Err(self.reject(GameError::validation(format!(
                "Team count must be between {MIN_TEAMS} and {MAX_TEAMS}."
            ))));
        }
        self.team_count = count;
        self.team_names = derive_team_names(&self.team_names, count);
        self.notice = None;
        Ok(())
    }

    pub fn set_team_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), GameError> {
        self.require_phase(Phase::SettingUp, "Renaming a team")?;
        if index >= self.team_names.len() {
            return Err(self.reject(GameError::validation(format!(
                "There is no team {}.",
                index + 1
            ))));
        }
        self.team_names[index] = name.into();
        self.notice = None;
        Ok(())
    }

    pub fn begin_start_game(&mut self) -> Result<StartTicket, GameError> {
        self.require_phase(Phase::SettingUp, "Starting a game")?;
        if self.slots.start.is_busy() {
            return Err(self.reject(GameError::validation("The game is already starting.")));
        }
        let team_names = trimmed_team_names(&self.team_names);
        if team_names.is_empty() {
            return Err(self.reject(GameError::validation(NO_TEAM_NAMES)));
        }
        self.notice = None;
        let tag = self.tags.next();
        self.slots.start.start(tag);
        Ok(StartTicket { tag, team_names })
    }

    pub fn resolve_start_game(
        &mut self,
        ticket: &StartTicket,
        outcome: Result<Vec<Team>, GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.start.resolve(ticket.tag) || self.phase != Phase::SettingUp {
            return Ok(Resolution::Stale);
        }
        match outcome {
            Ok(teams) => {
                self.teams = teams;
                self.active_question = None;
                self.answer_result = None;
                self.answer_draft = AnswerDraft::default();
                self.phase = Phase::Playing;
                Ok(Resolution::Applied)
            }
            Err(err) => Err(self.fail(err, START_FAILED)),
        }
    }

    // -- categories --------------------------------------------------------

    pub fn begin_categories(&mut self) -> Result<CategoriesTicket, GameError> {
        self.require_phase(Phase::Playing, "Loading categories")?;
        if self.slots.categories.is_busy() {
            return Err(self.reject(GameError::validation("Categories are already loading.")));
        }
        let tag = self.tags.next();
        self.slots.categories.start(tag);
        Ok(CategoriesTicket { tag })
    }

    /// Category loading is best effort: on failure the previous list stays
    /// and no notice is raised.
    pub fn resolve_categories(
        &mut self,
        ticket: &CategoriesTicket,
        outcome: Result<Vec<String>, GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.categories.resolve(ticket.tag) || self.phase != Phase::Playing {
            return Ok(Resolution::Stale);
        }
        let mut categories = outcome?;
        let mut seen = std::collections::HashSet::new();
        categories.retain(|label| seen.insert(label.clone()));
        self.categories = categories;
        Ok(Resolution::Applied)
    }

    // -- questions ---------------------------------------------------------

    /// Requests a question for `category`. A request already in flight is
    /// superseded: its response will resolve as stale.
    pub fn begin_question(&mut self, category: impl Into<String>) -> Result<QuestionTicket, GameError> {
        self.require_phase(Phase::Playing, "Selecting a category")?;
        let category = category.into();
        if category.trim().is_empty() {
            return Err(self.reject(GameError::validation("Please pick a category.")));
        }
        self.answer_result = None;
        self.notice = None;
        let tag = self.tags.next();
        self.slots.question.start(tag);
        Ok(QuestionTicket { tag, category })
    }

    pub fn begin_next_question(&mut self) -> Result<QuestionTicket, GameError> {
        let Some(category) = self.active_question.as_ref().map(|q| q.category.clone()) else {
            return Err(self.reject(GameError::validation("There is no active question.")));
        };
        self.begin_question(category)
    }

    pub fn resolve_question(
        &mut self,
        ticket: &QuestionTicket,
        outcome: Result<Question, GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.question.resolve(ticket.tag) || self.phase != Phase::Playing {
            return Ok(Resolution::Stale);
        }
        match outcome {
            Ok(question) => {
                self.answer_draft = AnswerDraft {
                    team_name: self
                        .teams
                        .first()
                        .map(|team| team.name.clone())
                        .unwrap_or_default(),
                    answer_text: String::new(),
                };
                self.answer_result = None;
                self.active_question = Some(question);
                Ok(Resolution::Applied)
            }
            Err(err @ GameError::CategoryExhausted(_)) => {
                self.active_question = None;
                Err(self.fail(err, CATEGORY_EXHAUSTED))
            }
            Err(err) => Err(self.fail(err, QUESTION_FAILED)),
        }
    }

    // -- answers -----------------------------------------------------------

    pub fn choose_answer_team(&mut self, team_name: impl Into<String>) -> Result<(), GameError> {
        self.require_active_question()?;
        self.answer_draft.team_name = team_name.into();
        self.notice = None;
        Ok(())
    }

    pub fn edit_answer(&mut self, answer_text: impl Into<String>) -> Result<(), GameError> {
        self.require_active_question()?;
        self.answer_draft.answer_text = answer_text.into();
        self.notice = None;
        Ok(())
    }

    pub fn begin_submit_answer(&mut self) -> Result<AnswerTicket, GameError> {
        self.require_phase(Phase::Playing, "Submitting an answer")?;
        let question_id = self.require_active_question()?;
        if self.slots.answer.is_busy() {
            return Err(self.reject(GameError::validation("An answer is already being checked.")));
        }
        if self.answer_draft.team_name.trim().is_empty() {
            return Err(self.reject(GameError::validation(NO_ANSWERING_TEAM)));
        }
        if self.answer_draft.answer_text.trim().is_empty() {
            return Err(self.reject(GameError::validation(BLANK_ANSWER)));
        }
        self.notice = None;
        let tag = self.tags.next();
        self.slots.answer.start(tag);
        Ok(AnswerTicket {
            tag,
            question_id,
            team_name: self.answer_draft.team_name.clone(),
            answer: self.answer_draft.answer_text.clone(),
        })
    }

    pub fn resolve_answer(
        &mut self,
        ticket: &AnswerTicket,
        outcome: Result<AnswerOutcome, GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.answer.resolve(ticket.tag) {
            return Ok(Resolution::Stale);
        }
        let still_active = self
            .active_question
            .as_ref()
            .is_some_and(|question| question.id == ticket.question_id);
        if !still_active || self.phase != Phase::Playing {
            return Ok(Resolution::Stale);
        }
        match outcome {
            Ok(outcome) => {
                self.answer_result = Some(outcome.verdict);
                self.teams = outcome.teams;
                Ok(Resolution::Applied)
            }
            Err(err) => Err(self.fail(err, ANSWER_FAILED)),
        }
    }

    // -- scoreboard --------------------------------------------------------

    pub fn begin_refresh_scoreboard(&mut self) -> Result<ScoreboardTicket, GameError> {
        self.require_phase(Phase::Playing, "Refreshing the scoreboard")?;
        if self.slots.scoreboard.is_busy() {
            return Err(self.reject(GameError::validation("The scoreboard is already refreshing.")));
        }
        let tag = self.tags.next();
        self.slots.scoreboard.start(tag);
        Ok(ScoreboardTicket { tag })
    }

    pub fn resolve_scoreboard(
        &mut self,
        ticket: &ScoreboardTicket,
        outcome: Result<Vec<Team>, GameError>,
    ) -> Result<Resolution, GameError> {
        if !self.slots.scoreboard.resolve(ticket.tag) || self.phase != Phase::Playing {
            return Ok(Resolution::Stale);
        }
        match outcome {
            Ok(teams) => {
                self.teams = teams;
                Ok(Resolution::Applied)
            }
            Err(err) => Err(self.fail(err, SCOREBOARD_FAILED)),
        }
    }

    // -- leaving the board -------------------------------------------------

    /// Back to team setup. The finished game's scoreboard is left in place
    /// until the next start response replaces it.
    pub fn return_to_setup(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Playing, "Returning to setup")?;
        self.phase = Phase::SettingUp;
        self.active_question = None;
        self.answer_result = None;
        self.answer_draft = AnswerDraft::default();
        self.notice = None;
        self.slots.reset_all();
        Ok(())
    }

    fn require_phase(&mut self, expected: Phase, action: &str) -> Result<(), GameError> {
        if self.phase == expected {
            return Ok(());
        }
        let phase = self.phase;
        Err(self.reject(GameError::validation(format!(
            "{action} is not possible while {phase}."
        ))))
    }

    fn require_active_question(&mut self) -> Result<QuestionId, GameError> {
        if let Some(question) = &self.active_question {
            return Ok(question.id);
        }
        Err(self.reject(GameError::validation("There is no active question.")))
    }

    fn reject(&mut self, err: GameError) -> GameError {
        self.notice = Some(Notice::new(err.kind(), err.to_string()));
        err
    }

    fn fail(&mut self, err: GameError, message: &str) -> GameError {
        self.notice = Some(Notice::new(err.kind(), message));
        err
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
