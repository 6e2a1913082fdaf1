//! Text projection of a [`Session`]. Reads state only.

use std::fmt::Write as _;

use client_core::Session;
use shared::domain::{AnswerVerdict, Phase};

pub const TITLE: &str = "Career Jeopardy";
pub const SCORING_RULE: &str = "5 points for correct · -1 point for wrong";

pub fn render(session: &Session) -> String {
    let mut out = String::new();
    match session.phase() {
        Phase::LoggedOut => render_login(session, &mut out),
        Phase::SettingUp => render_setup(session, &mut out),
        Phase::Playing => render_board(session, &mut out),
    }
    if let Some(notice) = session.notice() {
        let _ = writeln!(out, "! {}", notice.message);
    }
    out
}

pub fn result_banner(verdict: &AnswerVerdict) -> String {
    if verdict.correct {
        "✅ Correct! +5 points".to_string()
    } else {
        format!(
            "❌ Not quite. The expected answer was: {} (-1 point)",
            verdict.correct_answer
        )
    }
}

fn render_login(session: &Session, out: &mut String) {
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "Teacher Login");
    if session.login_pending() {
        let _ = writeln!(out, "Signing in…");
    }
    if let Some(error) = session.login_error() {
        let _ = writeln!(out, "error: {error}");
    }
    let _ = writeln!(out, "Hint: teacher / password  (login <user> <pass>)");
}

fn render_setup(session: &Session, out: &mut String) {
    let _ = writeln!(out, "Set Up Your Game");
    let _ = writeln!(out, "Number of teams: {}", session.team_count());
    for (index, name) in session.team_names().iter().enumerate() {
        let _ = writeln!(out, "  Team {} name: {name}", index + 1);
    }
    if session.start_pending() {
        let _ = writeln!(out, "Starting…");
    }
}

fn render_board(session: &Session, out: &mut String) {
    let _ = writeln!(out, "{TITLE} | {SCORING_RULE}");

    let scoreboard = session
        .teams()
        .iter()
        .map(|team| format!("{}: {}", team.name, team.score))
        .collect::<Vec<_>>()
        .join("  |  ");
    let _ = writeln!(out, "Scores: {scoreboard}");

    let _ = writeln!(out, "Categories:");
    if session.categories_loading() {
        let _ = writeln!(out, "  Loading categories…");
    } else {
        let active_category = session.active_question().map(|q| q.category.as_str());
        for category in session.categories() {
            let marker = if active_category == Some(category.as_str()) {
                "*"
            } else {
                "-"
            };
            let _ = writeln!(out, "  {marker} {category}");
        }
    }

    let _ = writeln!(out, "Question:");
    if session.question_loading() {
        let _ = writeln!(out, "  Fetching a question…");
        return;
    }
    let Some(question) = session.active_question() else {
        let _ = writeln!(out, "  Select a category to begin.");
        return;
    };

    let _ = writeln!(out, "  [{}] {}", question.category, question.text);
    let draft = session.answer_draft();
    let team = if draft.team_name.is_empty() {
        "-- choose team --"
    } else {
        draft.team_name.as_str()
    };
    let _ = writeln!(out, "  Answering team: {team}");
    let _ = writeln!(out, "  Your answer: {}", draft.answer_text);
    if session.answer_submitting() {
        let _ = writeln!(out, "  Checking…");
    }
    if let Some(verdict) = session.answer_result() {
        let _ = writeln!(out, "  {}", result_banner(verdict));
        let _ = writeln!(out, "  (next) Next {} question", question.category);
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
