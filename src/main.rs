use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use reviewbot::application::engine::ConversationEngine;
use reviewbot::infrastructure::in_memory::InMemoryConversationStore;
use reviewbot::infrastructure::open_review_store;
use reviewbot::interfaces::csv::message_reader::MessageReader;
use reviewbot::interfaces::csv::reply_writer::ReplyWriter;
use reviewbot::interfaces::csv::review_writer::ReviewWriter;
use reviewbot::interfaces::http::{AppState, create_router};
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "REVIEWBOT_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the messaging webhook, status callback and review listing
    Serve {
        /// Address to listen on
        #[arg(long, env = "REVIEWBOT_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Feed a `sender,body` CSV file through the conversation engine
    Replay {
        /// Input messages CSV file
        input: PathBuf,
    },
    /// Write every stored review to stdout as CSV, newest first
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reviewbot=info,tower_http=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let reviews = open_review_store(cli.db_path.as_deref()).into_diagnostic()?;

    match cli.command {
        Command::Serve { bind } => {
            let state = AppState::new(Box::new(InMemoryConversationStore::new()), reviews);

            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            let app = create_router(state)
                .layer(TraceLayer::new_for_http())
                .layer(cors);

            let listener = tokio::net::TcpListener::bind(bind).await.into_diagnostic()?;
            tracing::info!("Review bot listening on {}", bind);
            axum::serve(listener, app).await.into_diagnostic()?;
        }
        Command::Replay { input } => {
            let engine =
                ConversationEngine::new(Box::new(InMemoryConversationStore::new()), reviews);

            let file = File::open(input).into_diagnostic()?;
            let reader = MessageReader::new(file);
            let stdout = io::stdout();
            let mut writer = ReplyWriter::new(stdout.lock()).into_diagnostic()?;
            let mut recorded = 0usize;

            for message in reader.messages() {
                match message {
                    Ok(message) => {
                        match engine.handle_message(&message.sender, &message.body).await {
                            Ok(reply) => {
                                if reply.record.is_some() {
                                    recorded += 1;
                                }
                                writer
                                    .write_reply(&message.sender, &reply.text)
                                    .into_diagnostic()?;
                            }
                            Err(e) => {
                                eprintln!("Error processing message: {}", e);
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Error reading message: {}", e);
                    }
                }
            }

            writer.flush().into_diagnostic()?;
            tracing::info!(recorded, "Replay finished");
        }
        Command::Export => {
            let records = reviews.list().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = ReviewWriter::new(stdout.lock());
            writer.write_reviews(records).into_diagnostic()?;
        }
    }

    Ok(())
}
