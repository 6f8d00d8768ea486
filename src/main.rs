use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use whispervault::clock::SystemClock;
use whispervault::config::Config;
use whispervault::confession::{AdminSettings, Tone};
use whispervault::gemini::rate_limiter::RateLimiter;
use whispervault::gemini::GeminiClient;
use whispervault::moderation::gemini::GeminiClassifier;
use whispervault::moderation::{DisabledClassifier, ModerationClassifier, ModerationClient};
use whispervault::service::ConfessionService;
use whispervault::store::{ConfessionStore, MemoryStore};
use whispervault::tone::gemini::GeminiToneModel;
use whispervault::tone::{DisabledToneModel, ToneModel, ToneRewriter};

/// WhisperVault: anonymous confessions with AI moderation.
///
/// Every submission is graded by an external classifier before it can
/// appear in the feed. Anything the classifier can't vouch for waits for
/// a human.
#[derive(Parser)]
#[command(name = "whispervault", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (data is in-memory and lost on exit)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8080)
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Start with a handful of sample confessions
        #[arg(long)]
        seed_demo: bool,
    },

    /// Grade a piece of text without storing it
    Moderate {
        /// The text to grade
        text: String,
    },

    /// Rewrite text into a tone
    Rewrite {
        /// The text to rewrite
        text: String,

        /// Caustic | Poetic | "Dark Humor" | "Brutally Honest" | Academic
        #[arg(long)]
        tone: Tone,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("whispervault=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve {
            port,
            bind,
            seed_demo,
        } => {
            let config = Config::load()?;
            if !config.has_gemini() {
                warn!("GEMINI_API_KEY not set: every submission will wait for manual review");
            }

            let store: Arc<dyn ConfessionStore> = if seed_demo {
                let seed = whispervault::demo::seed_confessions(chrono::Utc::now());
                info!(count = seed.len(), "Seeded demo confessions");
                Arc::new(MemoryStore::with_confessions(seed))
            } else {
                Arc::new(MemoryStore::new())
            };

            let service = Arc::new(build_service(&config, store)?);
            let sweep_status = Arc::new(tokio::sync::RwLock::new(
                whispervault::retention::SweepStatus::default(),
            ));

            let sweeper = whispervault::retention::spawn_retention_sweeper(
                service.clone(),
                sweep_status.clone(),
                config.sweep_interval,
            );
            info!(
                retention_days = config.retention_days,
                interval_secs = config.sweep_interval.as_secs(),
                "Retention sweeper started"
            );

            let state = whispervault::web::AppState {
                service,
                sweep_status,
            };
            let result = whispervault::web::run_server(state, port, &bind).await;
            sweeper.abort();
            result?;
        }

        Commands::Moderate { text } => {
            let config = Config::load()?;
            config.require_gemini()?;
            let (classifier, _) = create_backends(&config)?;
            let client = ModerationClient::new(classifier, config.moderation_timeout);

            let result = client.moderate(&text).await;
            whispervault::output::terminal::display_moderation(&text, &result);
        }

        Commands::Rewrite { text, tone } => {
            let config = Config::load()?;
            config.require_gemini()?;
            let (_, tone_model) = create_backends(&config)?;
            let rewriter = ToneRewriter::new(tone_model, config.rewrite_timeout);

            let rewritten = rewriter.rewrite(&text, tone).await;
            whispervault::output::terminal::display_rewrite(&text, tone, &rewritten);
            if rewritten == whispervault::tone::error_placeholder(tone) {
                println!("\n{}", "Rewrite failed, see the log output above.".dimmed());
            }
        }
    }

    Ok(())
}

/// Pick the AI backends based on configuration.
/// Without an API key both fall back to the disabled implementations.
fn create_backends(
    config: &Config,
) -> Result<(Arc<dyn ModerationClassifier>, Arc<dyn ToneModel>)> {
    if !config.has_gemini() {
        let classifier: Arc<dyn ModerationClassifier> = Arc::new(DisabledClassifier);
        let tone_model: Arc<dyn ToneModel> = Arc::new(DisabledToneModel);
        return Ok((classifier, tone_model));
    }

    let client = Arc::new(GeminiClient::new(
        &config.gemini_api_url,
        &config.gemini_model,
        config.gemini_api_key.clone(),
        RateLimiter::new(config.gemini_max_qps),
    )?);
    info!(model = client.model(), "Using Gemini backend");

    let classifier: Arc<dyn ModerationClassifier> = Arc::new(GeminiClassifier::new(client.clone()));
    let tone_model: Arc<dyn ToneModel> = Arc::new(GeminiToneModel::new(client));
    Ok((classifier, tone_model))
}

#[cfg_attr(not(feature = "web"), allow(dead_code))]
fn build_service(config: &Config, store: Arc<dyn ConfessionStore>) -> Result<ConfessionService> {
    let (classifier, tone_model) = create_backends(config)?;
    Ok(ConfessionService::new(
        store,
        ModerationClient::new(classifier, config.moderation_timeout),
        ToneRewriter::new(tone_model, config.rewrite_timeout),
        Arc::new(SystemClock),
        AdminSettings {
            retention_days: config.retention_days,
        },
    )
    .with_max_content_chars(config.max_content_chars))
}
