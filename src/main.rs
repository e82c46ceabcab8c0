use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use audience_console::backend::HttpBackend;
use audience_console::command::{HELP, PromptCommand};
use audience_console::config::ConsoleConfig;
use audience_console::csrf::CsrfSource;
use audience_console::feedback::FeedbackSubmitter;
use audience_console::orchestrator::{GenerationOrchestrator, SubmitOutcome};
use audience_console::page::Page;
use audience_console::render::render_page;
use audience_console::ticker::ProgressTicker;
use audience_console::ConsoleError;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const PROGRESS_POLL_MS: u64 = 200;

#[derive(Parser, Debug)]
#[command(name = "audience-console", about = "Generate audience filter clauses from plain-language goals")]
struct Cli {
    /// Backend base URL (overrides AUDIENCE_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Form-embedded CSRF token (overrides AUDIENCE_CSRF_TOKEN).
    #[arg(long)]
    csrf_token: Option<String>,

    /// Raw Cookie header searched for `csrftoken` (overrides AUDIENCE_CSRF_COOKIE).
    #[arg(long)]
    cookie: Option<String>,

    /// Milliseconds between progress messages (overrides AUDIENCE_PROGRESS_INTERVAL_MS).
    #[arg(long)]
    progress_interval_ms: Option<u64>,

    /// Skip loading the index page to obtain a CSRF cookie.
    #[arg(long, default_value_t = false)]
    no_prime_csrf: bool,

    /// Run a single generation for this goal and exit.
    goal: Vec<String>,
}

impl Cli {
    fn apply(&self, config: &mut ConsoleConfig) -> Result<(), ConsoleError> {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(token) = &self.csrf_token {
            config.csrf_token = Some(token.clone());
        }
        if let Some(cookie) = &self.cookie {
            config.csrf_cookie = Some(cookie.clone());
        }
        if let Some(ms) = self.progress_interval_ms {
            config.progress_interval = Duration::from_millis(ms);
        }
        config.normalize()
    }
}

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::from_env()?;
    cli.apply(&mut config)?;

    let backend = Arc::new(HttpBackend::new(&config)?);
    let mut csrf = CsrfSource::new(config.csrf_token.clone(), config.csrf_cookie.clone());
    if !cli.no_prime_csrf && csrf.resolve().is_none() {
        match backend.fetch_csrf_cookie().await {
            Ok(Some(token)) => csrf.absorb_cookie_token(&token),
            Ok(None) => warn!("index page did not set a CSRF cookie"),
            Err(e) => warn!(error = %e, "could not load index page for CSRF cookie"),
        }
    }

    let page = Page::new(config.source_table.clone());
    let ticker = ProgressTicker::new(page.clone(), config.progress_interval);
    let orchestrator = Arc::new(GenerationOrchestrator::new(backend.clone(), page.clone(), ticker));
    let feedback = FeedbackSubmitter::new(backend, page, csrf);
    info!(base_url = %config.base_url, "audience console ready");

    if !cli.goal.is_empty() {
        run_generation(&orchestrator, &cli.goal.join(" ")).await;
        return Ok(());
    }
    run_prompt(&orchestrator, &feedback).await
}

async fn run_prompt(orchestrator: &Arc<GenerationOrchestrator>, feedback: &FeedbackSubmitter) -> Result<(), ConsoleError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    println!("{HELP}");

    loop {
        print!("\ngoal> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match PromptCommand::parse(&line) {
            PromptCommand::Goal(goal) => run_generation(orchestrator, &goal).await,
            PromptCommand::Feedback { kind, comment } => {
                let page = orchestrator.page();
                if !page.snapshot().feedback_controls_visible {
                    println!("Feedback is available once a generation has completed.");
                    continue;
                }
                if let Some(comment) = comment {
                    page.set_feedback_input(comment);
                }
                pending.retain(|handle| !handle.is_finished());
                pending.push(feedback.submit(kind, &orchestrator.last_generation()));
                print!("{}", render_page(&page.snapshot()));
            }
            PromptCommand::Show => print!("{}", render_page(&orchestrator.page().snapshot())),
            PromptCommand::Help => println!("{HELP}"),
            PromptCommand::Quit => break,
            PromptCommand::Unknown(name) => println!("Unknown command ':{name}'. Type :help for commands."),
        }
    }

    for handle in pending {
        if let Err(e) = handle.await {
            error!(error = %e, "feedback task failed");
        }
    }
    Ok(())
}

/// Submit one goal, echoing progress lines until the request settles.
async fn run_generation(orchestrator: &Arc<GenerationOrchestrator>, goal: &str) {
    let mut task = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let goal = goal.to_owned();
        async move { orchestrator.submit_goal(&goal).await }
    });

    let mut poll = tokio::time::interval(Duration::from_millis(PROGRESS_POLL_MS));
    let mut shown: Option<String> = None;
    let outcome = loop {
        tokio::select! {
            joined = &mut task => break joined,
            _ = poll.tick() => {
                let state = orchestrator.page().snapshot();
                if state.loading && state.progress_message != shown {
                    if let Some(message) = &state.progress_message {
                        println!("... {message}");
                    }
                    shown = state.progress_message;
                }
            }
        }
    };

    match outcome {
        Ok(SubmitOutcome::Ignored) => return,
        Ok(SubmitOutcome::Busy) => println!("A generation is already running."),
        Ok(_) => {}
        Err(e) => error!(error = %e, "generation task failed"),
    }
    print!("{}", render_page(&orchestrator.page().snapshot()));
}
