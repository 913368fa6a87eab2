use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use market360::agents::openrouter::ping;
use market360::agents::prompts::{agent_user_prompt, DEFAULT_REPORT_TEMPLATE};
use market360::agents::{OpenRouterClient, Orchestrator};
use market360::models::{
    LayoutMode, Market360Config, Region, ReportContext, Scenario, TimeHorizon, ViewMode,
};
use market360::store::{IndustryCatalog, OpenRouterSettings, SqliteSettingsStore};
use market360::{resolve_connection, run_agents, run_report, ResolvedConnection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "market360", about = "Market 360 industry intelligence with multi-agent LLM analysis")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/market360.toml")]
    config: PathBuf,

    /// Pretty-print the output JSON
    #[arg(long, global = true)]
    pretty: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the industries in the catalog
    Industries,

    /// Run every agent preset against one shared prompt
    Agents {
        #[command(flatten)]
        conn: ConnectionArgs,

        /// Audience the output is tuned for
        #[arg(long, value_parser = parse_label::<ViewMode>, default_value = "Executive")]
        view_mode: ViewMode,

        #[arg(long, value_parser = parse_label::<LayoutMode>, default_value = "Dashboard")]
        layout: LayoutMode,

        /// Use this prompt instead of the one built from view mode and layout
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Narrative report for one industry, with a structured snapshot alongside
    Report {
        #[command(flatten)]
        conn: ConnectionArgs,

        /// Industry id from the catalog
        #[arg(short, long)]
        industry: String,

        #[arg(long, value_parser = parse_label::<Region>, default_value = "Global")]
        region: Region,

        #[arg(long, value_parser = parse_label::<TimeHorizon>, default_value = "Short-term")]
        horizon: TimeHorizon,

        #[arg(long, value_parser = parse_label::<Scenario>, default_value = "Baseline")]
        scenario: Scenario,

        /// Optional question for Q&A mode
        #[arg(long, default_value = "")]
        question: String,

        /// Read the prompt template from a file
        #[arg(long)]
        template: Option<PathBuf>,

        /// Skip the structured snapshot request
        #[arg(long)]
        no_insight: bool,
    },

    /// Check that the key, endpoint and model answer
    Ping {
        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Manage persisted connection settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Show persisted settings (the key is masked)
    Show,
    /// Persist any of key, base URL and model
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Remove all persisted settings
    Clear,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completions base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Model id, e.g. anthropic/claude-3.5-sonnet
    #[arg(long)]
    model: Option<String>,

    /// Persist the effective connection settings for later runs
    #[arg(long)]
    save: bool,
}

impl ConnectionArgs {
    fn overrides(&self) -> OpenRouterSettings {
        OpenRouterSettings {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
        }
    }
}

/// Parse a display label ("North America", "Short-term", ...) into its enum.
fn parse_label<T: DeserializeOwned>(label: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(label.to_string()))
        .map_err(|_| format!("unknown value: {label}"))
}

#[derive(Serialize)]
struct MaskedSettings {
    api_key: Option<&'static str>,
    base_url: Option<String>,
    model: Option<String>,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

fn open_settings(config: &Market360Config) -> Result<SqliteSettingsStore> {
    if let Some(parent) = std::path::Path::new(&config.store.settings_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    SqliteSettingsStore::open(&config.store.settings_path)
        .with_context(|| format!("Failed to open settings: {}", config.store.settings_path))
}

fn connection(
    config: &Market360Config,
    store: &SqliteSettingsStore,
    conn: &ConnectionArgs,
) -> Result<ResolvedConnection> {
    let stored = OpenRouterSettings::load(store).context("Failed to load settings")?;
    let resolved = resolve_connection(&config.openrouter, &stored, &conn.overrides());

    if conn.save {
        OpenRouterSettings {
            api_key: Some(resolved.credentials.api_key.clone()).filter(|k| !k.is_empty()),
            base_url: resolved.credentials.base_url.clone(),
            model: Some(resolved.model.clone()),
        }
        .save(store)
        .context("Failed to save settings")?;
    }
    Ok(resolved)
}

/// Cancellation token that fires on Ctrl-C.
fn ctrl_c_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received interrupt, cancelling in-flight agents");
        trigger.cancel();
    });
    cancel
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (respects RUST_LOG env var)
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let config = market360::load_config(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    let client = OpenRouterClient::from_config(&config.openrouter);

    match &cli.command {
        Command::Industries => {
            let catalog = IndustryCatalog::load_dir(&config.store.data_dir)
                .context("Failed to load industry catalog")?;
            print_json(&catalog.list(), cli.pretty)?;
        }

        Command::Agents {
            conn,
            view_mode,
            layout,
            prompt,
        } => {
            let store = open_settings(&config)?;
            let resolved = connection(&config, &store, conn)?;
            let user_prompt = prompt
                .clone()
                .unwrap_or_else(|| agent_user_prompt(*view_mode, *layout));

            let orchestrator = Orchestrator::new(Arc::new(client));
            let report = run_agents(
                &orchestrator,
                &config.agents.presets,
                Some(resolved.model.as_str()),
                &user_prompt,
                &resolved.credentials,
                &ctrl_c_token(),
            )
            .await;
            print_json(&report, cli.pretty)?;
        }

        Command::Report {
            conn,
            industry,
            region,
            horizon,
            scenario,
            question,
            template,
            no_insight,
        } => {
            let store = open_settings(&config)?;
            let resolved = connection(&config, &store, conn)?;
            let catalog = IndustryCatalog::load_dir(&config.store.data_dir)
                .context("Failed to load industry catalog")?;
            let bundle = catalog.bundle(industry)?;

            let template = match template {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template: {}", path.display()))?,
                None => DEFAULT_REPORT_TEMPLATE.to_string(),
            };
            let context = ReportContext {
                region: *region,
                time_horizon: *horizon,
                scenario: *scenario,
                question: question.clone(),
            };

            let outcome = run_report(&client, &resolved, &template, &bundle, &context, !*no_insight)
                .await
                .map_err(|e| anyhow::anyhow!("Report failed: {e}"))?;
            print_json(&outcome, cli.pretty)?;
        }

        Command::Ping { conn } => {
            let store = open_settings(&config)?;
            let resolved = connection(&config, &store, conn)?;
            let reply = ping(&client, &resolved.model, &resolved.credentials)
                .await
                .map_err(|e| anyhow::anyhow!("Connection test failed: {e}"))?;
            print_json(
                &serde_json::json!({"status": "ok", "model": resolved.model, "reply": reply}),
                cli.pretty,
            )?;
        }

        Command::Settings { action } => {
            let store = open_settings(&config)?;
            match action {
                SettingsAction::Show => {
                    let stored = OpenRouterSettings::load(&store)?;
                    let masked = MaskedSettings {
                        api_key: stored.api_key.as_ref().map(|_| "<set>"),
                        base_url: stored.base_url,
                        model: stored.model,
                    };
                    print_json(&masked, cli.pretty)?;
                }
                SettingsAction::Set {
                    api_key,
                    base_url,
                    model,
                } => {
                    OpenRouterSettings {
                        api_key: api_key.clone(),
                        base_url: base_url.clone(),
                        model: model.clone(),
                    }
                    .save(&store)?;
                    tracing::info!("Settings saved");
                }
                SettingsAction::Clear => {
                    OpenRouterSettings::clear(&store)?;
                    tracing::info!("Settings cleared");
                }
            }
        }
    }

    Ok(())
}
