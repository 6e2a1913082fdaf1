//! Presenter console commands, parsed from one input line each.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCommand {
    Login { username: String, password: String },
    TeamCount(usize),
    /// Zero-based index; the console shows and accepts one-based numbers.
    TeamName { index: usize, name: String },
    Start,
    Category(String),
    Next,
    AnsweringTeam(String),
    Answer(String),
    Submit,
    Scores,
    Setup,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  login <user> <pass>   sign in as the presenter
  teams <1-6>           set the number of teams
  name <n> <text>       rename team n (text may be empty)
  start                 start the game
  category <label>      get a question from a category
  next                  another question from the same category
  team <name>           choose the answering team
  answer <text>         type the answer
  submit                submit the answer
  scores                refresh the scoreboard
  setup                 back to team setup
  show                  redraw the screen
  help                  this list
  quit                  leave";

pub fn parse_command(line: &str) -> Result<PresenterCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "login" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), None) => PresenterCommand::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err("usage: login <user> <pass>".to_string()),
            }
        }
        "teams" => rest
            .parse::<usize>()
            .map(PresenterCommand::TeamCount)
            .map_err(|_| "usage: teams <1-6>".to_string())?,
        "name" => {
            let (number, name) = match rest.split_once(char::is_whitespace) {
                Some((number, name)) => (number, name.trim()),
                None => (rest, ""),
            };
            match number.parse::<usize>() {
                Ok(number) if number >= 1 => PresenterCommand::TeamName {
                    index: number - 1,
                    name: name.to_string(),
                },
                _ => return Err("usage: name <n> <text>".to_string()),
            }
        }
        "start" => PresenterCommand::Start,
        "category" | "cat" if !rest.is_empty() => PresenterCommand::Category(rest.to_string()),
        "category" | "cat" => return Err("usage: category <label>".to_string()),
        "next" => PresenterCommand::Next,
        "team" => PresenterCommand::AnsweringTeam(rest.to_string()),
        "answer" => PresenterCommand::Answer(rest.to_string()),
        "submit" => PresenterCommand::Submit,
        "scores" => PresenterCommand::Scores,
        "setup" => PresenterCommand::Setup,
        "show" | "" => PresenterCommand::Show,
        "help" | "?" => PresenterCommand::Help,
        "quit" | "exit" => PresenterCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type help")),
    };
    Ok(command)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
