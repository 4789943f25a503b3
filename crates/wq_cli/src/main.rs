mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use config::Config;
use wq_core::{ArticleScraper, QuizGenerator, QuizStorage};
use wq_generator::LlmQuizGenerator;
use wq_scraper::WikipediaScraper;
use wq_storage::SqliteStorage;
use wq_web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "wikiquiz", about = "Generate multiple-choice quizzes from Wikipedia articles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8000
        #[arg(long)]
        bind: Option<String>,
        /// Path to the SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Generate (or fetch the cached) quiz for one article URL
    Generate {
        /// Wikipedia article URL
        url: String,
        /// Path to the SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List stored quizzes, newest first
    History {
        /// Path to the SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { bind: None, db: None }) {
        Commands::Serve { bind, db } => {
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());
            let state = build_state(&config, db).await?;
            let app = create_app(state).await;

            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Commands::Generate { url, db } => {
            let state = build_state(&config, db).await?;
            let (quiz_id, quiz) = wq_web::service::create_quiz(&state, &url).await?;
            println!("quiz {} for {}", quiz_id, url);
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
        Commands::History { db } => {
            let storage = open_storage(&config, db).await?;
            let summaries = storage.list_all().await?;
            if summaries.is_empty() {
                println!("No quizzes stored yet.");
            }
            for summary in summaries {
                println!("{}\t{}\t{}\t{}", summary.id, summary.created_at, summary.title, summary.url);
            }
        }
    }

    Ok(())
}

async fn open_storage(config: &Config, db: Option<PathBuf>) -> Result<Arc<SqliteStorage>> {
    let db_path = db.unwrap_or_else(|| config.db_path.clone());
    Ok(Arc::new(SqliteStorage::new_with_path(&db_path).await?))
}

async fn build_state(config: &Config, db: Option<PathBuf>) -> Result<AppState> {
    let storage = open_storage(config, db).await?;

    let mut generator = LlmQuizGenerator::new(config.llm_api_key.clone())?;
    if let Some(base_url) = &config.llm_base_url {
        generator = generator.with_base_url(base_url);
    }
    if let Some(model) = &config.llm_model {
        generator = generator.with_model(model);
    }

    Ok(AppState {
        storage: storage as Arc<dyn QuizStorage>,
        scraper: Arc::new(WikipediaScraper::new()?) as Arc<dyn ArticleScraper>,
        generator: Arc::new(generator) as Arc<dyn QuizGenerator>,
    })
}
