use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{GameApi, GameController, HttpGameClient};
use shared::error::GameError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{parse_command, PresenterCommand, HELP};
use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Career Jeopardy presenter console")]
struct Args {
    /// Game server base address; overrides the settings file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long, requires = "password")]
    username: Option<String>,
    #[arg(long, requires = "username")]
    password: Option<String>,
}

enum Flow {
    Continue,
    Quit,
}

async fn dispatch<A: GameApi>(
    controller: &mut GameController<A>,
    command: PresenterCommand,
) -> Result<Flow, GameError> {
    match command {
        PresenterCommand::Login { username, password } => {
            controller.login(&username, &password).await?
        }
        PresenterCommand::TeamCount(count) => controller.set_team_count(count)?,
        PresenterCommand::TeamName { index, name } => controller.set_team_name(index, &name)?,
        PresenterCommand::Start => controller.start_game().await?,
        PresenterCommand::Category(category) => controller.select_category(&category).await?,
        PresenterCommand::Next => controller.next_question().await?,
        PresenterCommand::AnsweringTeam(team) => controller.choose_answer_team(&team)?,
        PresenterCommand::Answer(text) => controller.edit_answer(&text)?,
        PresenterCommand::Submit => controller.submit_answer().await?,
        PresenterCommand::Scores => controller.refresh_scoreboard().await?,
        PresenterCommand::Setup => controller.return_to_setup()?,
        PresenterCommand::Show => {}
        PresenterCommand::Help => println!("{HELP}"),
        PresenterCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    info!(server_url = %settings.server_url, "presenter starting");

    let client = HttpGameClient::with_timeout(&settings.server_url, settings.request_timeout)
        .context("failed to configure game server client")?;
    let mut controller = GameController::new(client);

    if let (Some(username), Some(password)) = (args.username, args.password) {
        // The session keeps the rejection message; the screen below shows it.
        let _ = controller.login(&username, &password).await;
    }

    println!("{}", render::render(controller.session()));
    println!("type help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };
        match dispatch(&mut controller, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => tracing::debug!(error = %err, kind = ?err.kind(), "command rejected"),
        }
        println!("{}", render::render(controller.session()));
    }

    info!("presenter exiting");
    Ok(())
}
