/// Faultline - issue tracking server
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    Router,
};
use clap::{Parser, Subcommand};
use faultline_core::validation;
use faultline_server::{api, config::ServerConfig, services::AuthService, state::AppState};
use faultline_storage::{users, Database};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "faultline-server")]
#[command(about = "Faultline issue tracking server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Register a user from the command line
    AddUser {
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,
        /// Optional display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faultline_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config.as_deref()).await?;
        }
        Commands::AddUser {
            email,
            password,
            name,
        } => {
            add_user(&email, &password, name.as_deref()).await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<&str>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    tracing::info!("Starting Faultline server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = faultline_storage::create_pool(&config.storage.database_url).await?;
    faultline_storage::run_migrations(&pool).await?;
    let db = Arc::new(Database::new(pool));
    tracing::info!("Database connected");

    // Initialize auth service
    let auth = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_days,
        config.auth.bcrypt_cost,
    ));
    tracing::info!("Auth service initialized");

    // Build application state and router
    let app_state = AppState::new(db, auth);
    let app = create_app(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    // Static file serving for the web client (SPA with fallback to index.html)
    let web_dir =
        PathBuf::from(std::env::var("FAULTLINE_WEB_DIR").unwrap_or_else(|_| "./web".to_string()));

    let spa_fallback = move |req: Request<Body>| {
        let web_dir = web_dir.clone();
        async move {
            let path = req.uri().path().trim_start_matches('/');
            let file_path = web_dir.join(path);

            if file_path.is_file() {
                // Serve the actual file
                match ServeDir::new(&web_dir).oneshot(req).await {
                    Ok(res) => res.into_response(),
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                }
            } else {
                // SPA fallback: serve index.html for client-side routes
                match tokio::fs::read(web_dir.join("index.html")).await {
                    Ok(contents) => (
                        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                        contents,
                    )
                        .into_response(),
                    Err(_) => StatusCode::NOT_FOUND.into_response(),
                }
            }
        }
    };

    api::router(state)
        .fallback(spa_fallback)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}

async fn add_user(email: &str, password: &str, name: Option<&str>) -> anyhow::Result<()> {
    let config = ServerConfig::load(None)?;

    validation::validate_email(email)?;
    validation::validate_password(password)?;

    let pool = faultline_storage::create_pool(&config.storage.database_url).await?;
    faultline_storage::run_migrations(&pool).await?;

    let auth = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_days,
        config.auth.bcrypt_cost,
    );

    let password_hash = auth.hash_password(password)?;
    let user = users::create(&pool, email, &password_hash, name).await?;

    println!("Created user {} ({})", user.id, user.email);

    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load(None)?;

    let pool = faultline_storage::create_pool(&config.storage.database_url).await?;
    faultline_storage::run_migrations(&pool).await?;

    let all = users::list(&pool).await?;

    println!("Users:");
    for user in all {
        println!(
            "  {} - {} ({})",
            user.id,
            user.email,
            user.name.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
