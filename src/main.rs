use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use insightify::analysis::{compose_dashboard, profile_dataset, DashboardTemplate};
use insightify::backend::{HttpBackend, InsightBackend};
use insightify::chat::{ChatSession, ChatView, Speaker};
use insightify::loader::{load_path, UploadFile};
use insightify::session::{FileStore, Session};
use insightify::utils::init_logger;
use insightify::{create_router, AppState, Config, Dataset};

#[derive(Parser, Debug)]
#[command(name = "insightify")]
#[command(about = "Profile datasets, compose dashboards and chat with your data")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the JSON API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the column profile of a file or the cached dataset
    Profile { file: Option<PathBuf> },
    /// Print the dashboard charts of a file or the cached dataset
    Dashboard {
        file: Option<PathBuf>,
        #[arg(long, default_value = "sales")]
        template: DashboardTemplate,
    },
    /// Send a file to the cleaning backend and cache the cleaned rows
    Upload { file: PathBuf },
    /// Ask a question about the cached dataset
    Ask {
        question: String,
        /// Template to apply when the question opens the dashboard picker
        #[arg(long)]
        template: Option<DashboardTemplate>,
    },
    /// Export the cached dataset's dashboard as a PDF through the backend
    Export {
        /// JSON file holding the cleaning report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    Login {
        #[arg(long)]
        user: String,
    },
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    let config = Config::from_env()?;
    let session = Session::new(Arc::new(FileStore::with_path(config.session.dir.clone())));

    match cli.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Profile { file } => {
            let dataset = resolve_dataset(file, &config, &session).await?;
            print_json(&profile_dataset(&dataset))
        }
        Command::Dashboard { file, template } => {
            let dataset = resolve_dataset(file, &config, &session).await?;
            print_json(&template.compose(&dataset))
        }
        Command::Upload { file } => {
            session.require_auth().await?;
            let upload = UploadFile::from_path(&file, &config.limits).await?;
            let backend = HttpBackend::new(&config.backend)?;
            let response = backend.upload(&upload).await?;
            session.cache_dataset(&response.preview).await?;
            println!(
                "Uploaded {}: {} rows, {} columns",
                upload.file_name,
                response.rows,
                response.columns.len()
            );
            Ok(())
        }
        Command::Ask { question, template } => {
            session.require_auth().await?;
            let dataset = cached_dataset(&session).await?;
            let backend = HttpBackend::new(&config.backend)?;
            let mut chat = ChatSession::new(dataset)?;
            let mut replies = chat.ask(&question, &backend).await.to_vec();
            if let (true, Some(template)) = (chat.is_template_picker_open(), template) {
                replies.extend_from_slice(chat.select_template(template));
            }
            for message in replies.iter().filter(|m| m.from == Speaker::Ai) {
                println!("{}", message.text);
            }
            if chat.view() != &ChatView::Empty {
                print_json(chat.view())?;
            }
            Ok(())
        }
        Command::Export { report } => {
            session.require_auth().await?;
            let dataset = cached_dataset(&session).await?;
            let report = match report {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&raw)?
                }
                None => serde_json::json!({}),
            };
            let charts = compose_dashboard(&dataset);
            let backend = HttpBackend::new(&config.backend)?;
            let exported = backend.export(&report, &charts).await?;
            println!("Report exported: {}", exported.file);
            Ok(())
        }
        Command::Login { user } => {
            session.sign_in(&user).await?;
            println!("Signed in as {}", user.trim());
            Ok(())
        }
        Command::Logout => {
            session.sign_out().await?;
            session.clear_dataset().await?;
            println!("Signed out");
            Ok(())
        }
    }
}

async fn serve(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid HOST: {}", config.server.host))?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    let app = create_router(AppState { config, backend });

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn resolve_dataset(
    file: Option<PathBuf>,
    config: &Config,
    session: &Session,
) -> anyhow::Result<Dataset> {
    match file {
        Some(path) => Ok(load_path(&path, &config.limits).await?),
        None => cached_dataset(session).await,
    }
}

async fn cached_dataset(session: &Session) -> anyhow::Result<Dataset> {
    session
        .dataset()
        .await?
        .ok_or_else(|| anyhow!("No dataset loaded. Upload a file first."))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
