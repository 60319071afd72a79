use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use practice_log::coach::{CoachPanel, RESET_CONFIRMATION};
use practice_log::progress::ProgressViewer;
use practice_log::submitter::{LogPanel, PracticeForm, PracticeSubmitter};
use practice_log::ui::TabController;
use practice_log::{config, render, Cli, CoachCommand, Command, HttpEndpoint};
use simple_logger::SimpleLogger;
use std::io::{self, BufRead, Write};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .context("Failed to initialise logging")?;

    info!("Starting practice-log");

    let config = config::load_config(&cli)?;
    let endpoint = HttpEndpoint::new(&config).context("Failed to set up the log endpoint")?;
    info!("Using endpoint {}", endpoint.url());

    let mut tabs = TabController::new(["log", "progress", "coach"]);
    let pane = match &cli.command {
        Command::Log { .. } => "log",
        Command::Progress { .. } => "progress",
        Command::Coach { .. } => "coach",
    };
    tabs.activate(pane);
    println!("{}\n", render::tab_bar(&tabs));

    let lines = match cli.command {
        Command::Log {
            name,
            event,
            minutes,
            notes,
        } => {
            let form = PracticeForm {
                name,
                event,
                minutes,
                notes,
            };
            let submitter = PracticeSubmitter::new(&endpoint);
            let mut panel = LogPanel::new(form, config.reduce_motion);
            panel.submit(&submitter).await;

            render::log_panel(&panel)
        }

        Command::Progress { name } => {
            let view = ProgressViewer::new(&endpoint).load(&name).await;
            render::progress(&view)
        }

        Command::Coach { action } => {
            let mut panel = CoachPanel::new(&endpoint, &config);
            match action {
                CoachCommand::Unlock { pin } => render::status(&panel.unlock(&pin)).into_iter().collect(),
                CoachCommand::Lock => render::status(&panel.lock()).into_iter().collect(),
                CoachCommand::All => render::coach(&panel.load_all().await),
                CoachCommand::Reset { pin, confirm } => {
                    let phrase = match confirm {
                        Some(phrase) => phrase,
                        None if panel.is_unlocked() => prompt_confirmation()?,
                        None => String::new(),
                    };
                    render::status(&panel.reset_season(&pin, &phrase).await)
                        .into_iter()
                        .collect()
                }
            }
        }
    };

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

fn prompt_confirmation() -> Result<String> {
    print!(
        "This deletes every logged practice this season. Type {} to continue: ",
        RESET_CONFIRMATION
    );
    io::stdout().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}
