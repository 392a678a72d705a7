//! CLI entry point for weatherbuddy.

mod cli;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weatherbuddy::build_info;
use weatherbuddy::config::{load_config_with_diagnostics, Config};
use weatherbuddy::orchestrator::Orchestrator;
use weatherbuddy::outcome::{QueryOutcome, QueryStatus};
use weatherbuddy::render::{quota_line, reply_text, Renderer};
use weatherbuddy::session::{CredentialChange, Session};

const LOG_ENV: &str = "WEATHERBUDDY_LOG";
const DEFAULT_LOG_FILTER: &str = "weatherbuddy=warn";
const EMPTY_QUERY: &str = "Please enter your question!";
const KEY_REMOVED: &str = "API key has been removed. You're now using limited access.";
const HELP_TEXT: &str =
    "Ask about the weather anywhere. Commands: /key <KEY>, /key, /status, /quit.";

#[tokio::main]
async fn main() {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = cli::Args::parse();

    let loaded = match load_config_with_diagnostics(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut config = loaded.config;
    apply_cli_overrides(&mut config, &args);

    let renderer = Renderer::new(config.display.color && !args.no_color);
    // Warnings about the default key only matter when nobody brings their own.
    if args.api_key.is_none() {
        for warning in &loaded.diagnostics.warnings {
            renderer.warn(warning);
        }
    }

    let orchestrator = Orchestrator::new(&config);
    let mut session = Session::with_usage(args.usage_count);
    if let Some(key) = args.api_key.as_deref() {
        session.set_credential(key);
    }
    tracing::debug!(session = %session.id, "session started");

    let mut shell = Shell {
        orchestrator: &orchestrator,
        session: &mut session,
        renderer,
        json: args.json,
    };

    if let Some(prompt) = args.prompt.as_deref() {
        let status = shell.ask(prompt).await;
        if !matches!(status, Some(QueryStatus::Ok)) {
            std::process::exit(1);
        }
        return;
    }

    renderer.header(&config.api.model, &build_info::banner_metadata());
    renderer.info(HELP_TEXT);
    if let Err(e) = shell.run_interactive().await {
        renderer.error(&format!("failed to read input: {e}"));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn apply_cli_overrides(config: &mut Config, args: &cli::Args) {
    if let Some(model) = args.model.as_deref() {
        config.api.model = model.to_string();
    }
    if let Some(base_url) = args.base_url.as_deref() {
        config.api.base_url = base_url.to_string();
    }
    if args.no_color {
        config.display.color = false;
    }
}

struct Shell<'a> {
    orchestrator: &'a Orchestrator,
    session: &'a mut Session,
    renderer: Renderer,
    json: bool,
}

impl Shell<'_> {
    async fn run_interactive(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.renderer.prompt();
            let Some(line) = lines.next_line().await? else {
                eprintln!();
                return Ok(());
            };
            match ShellCommand::parse(&line) {
                ShellCommand::Quit => return Ok(()),
                ShellCommand::Status => self.show_status(),
                ShellCommand::SetKey(key) => self.update_key(&key),
                ShellCommand::Unknown(name) => self
                    .renderer
                    .warn(&format!("unknown command: {name}. {HELP_TEXT}")),
                ShellCommand::Ask(query) => {
                    self.ask(&query).await;
                }
            }
        }
    }

    /// Charge, ask, settle, display. Returns `None` when nothing was sent.
    async fn ask(&mut self, query: &str) -> Option<QueryStatus> {
        let query = query.trim();
        if query.is_empty() {
            self.renderer.warn(EMPTY_QUERY);
            return None;
        }

        let used_before = self.session.begin_query();
        let outcome = self
            .orchestrator
            .handle_query(query, self.session.credential.as_deref(), used_before)
            .await;
        let settlement = self.session.settle(&outcome);
        tracing::debug!(
            usage_count = self.session.usage_count,
            refunded = settlement.refunded,
            "query settled"
        );

        if self.json {
            print_json(&outcome);
        } else {
            self.show_outcome(&outcome);
            if settlement.credential_dropped {
                self.renderer.info(KEY_REMOVED);
            }
        }
        Some(outcome.status)
    }

    fn show_outcome(&self, outcome: &QueryOutcome) {
        match (outcome.reply(), outcome.error_message()) {
            (Some(reply), _) => {
                self.renderer.assistant_message(reply_text(reply));
                self.renderer.info(&quota_line(self.remaining()));
            }
            (None, Some(message)) => self.renderer.error(message),
            (None, None) => {}
        }
    }

    fn show_status(&self) {
        self.renderer.field("session", &self.session.id);
        self.renderer
            .field("queries used", &self.session.usage_count.to_string());
        self.renderer.field("remaining", &self.remaining().to_string());
    }

    fn update_key(&mut self, key: &str) {
        let message = match self.session.set_credential(key) {
            CredentialChange::Added => "API key saved. You now have unlimited access.",
            CredentialChange::Replaced => "API key updated.",
            CredentialChange::Removed => KEY_REMOVED,
            CredentialChange::Unchanged if key.trim().is_empty() => "No API key is set.",
            CredentialChange::Unchanged => "API key unchanged.",
        };
        self.renderer.info(message);
    }

    fn remaining(&self) -> weatherbuddy::quota::RemainingQuota {
        self.orchestrator
            .quota()
            .remaining(self.session.has_credential(), self.session.usage_count)
    }
}

fn print_json(outcome: &QueryOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to encode result: {e}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Ask(String),
    SetKey(String),
    Status,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Ask(trimmed.to_string());
        };
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map(|(name, arg)| (name, arg.trim()))
            .unwrap_or((rest, ""));
        match name {
            "key" => Self::SetKey(arg.to_string()),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(format!("/{name}")),
        }
    }
}
