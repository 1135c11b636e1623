use std::rc::Rc;

use clap::{Parser, Subcommand};
use simsyn_session::app::{ActionError, App};
use simsyn_session::config::{ClientConfig, ConfigError};
use simsyn_session::net::api::HttpAuthApi;
use simsyn_session::state::language::{Language, UnknownLanguage};
use simsyn_session::util::forms::RegisterForm;
use simsyn_session::util::route_guard::RouteDecision;
use simsyn_session::util::storage::FileStorage;
use simsyn_session::{AuthError, AuthState};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] AuthError),
    #[error("{0}")]
    Action(#[from] ActionError),
    #[error(transparent)]
    Language(#[from] UnknownLanguage),
}

#[derive(Parser, Debug)]
#[command(name = "simsyn", about = "SimSynAI session CLI")]
struct Cli {
    /// Overrides `SIMSYN_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `SIMSYN_STORAGE_PATH`.
    #[arg(long)]
    storage_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the stored session and print who is logged in.
    Status,
    Login {
        username: String,
        #[arg(long, env = "SIMSYN_PASSWORD")]
        password: String,
        #[arg(long, default_value_t = false)]
        remember: bool,
    },
    Logout,
    /// Create an account. Does not log in.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SIMSYN_PASSWORD")]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Print the stored language, or set it to `zh` / `en`.
    Language { code: Option<String> },
    /// Print the route guard decision for a path.
    Route { path: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim_end_matches('/').to_owned();
    }
    if let Some(storage_path) = cli.storage_path {
        config.storage_path = storage_path;
    }

    let api = Rc::new(HttpAuthApi::from_config(&config)?);
    let storage = Rc::new(FileStorage::new(&config.storage_path));
    tracing::debug!(base_url = %api.base_url(), storage = %storage.path().display(), "cli configured");
    let app = App::new(storage, api);

    match cli.command {
        Command::Status => run_status(&app).await,
        Command::Login { username, password, remember } => run_login(&app, &username, &password, remember).await,
        Command::Logout => {
            let target = app.logout();
            println!("logged out; next: {target}");
            Ok(())
        }
        Command::Register { username, email, password, confirm_password } => {
            let form = RegisterForm { username, email, password, confirm_password };
            let target = app.register(&form).await?;
            println!("registered; next: {target}");
            Ok(())
        }
        Command::Language { code } => run_language(&app, code.as_deref()),
        Command::Route { path } => {
            app.boot().await;
            print_decision(&app.navigate(&path));
            Ok(())
        }
    }
}

async fn run_status(app: &App) -> Result<(), CliError> {
    match app.boot().await {
        AuthState::Authenticated(identity) => {
            println!("authenticated as {}", identity.display_name());
            if let Some(email) = identity.email {
                println!("email: {email}");
            }
        }
        other => println!("{:?}", other.status()),
    }
    Ok(())
}

async fn run_login(app: &App, username: &str, password: &str, remember: bool) -> Result<(), CliError> {
    app.boot().await;
    let target = app.login(username, password, remember).await?;
    let name = app.identity().map(|identity| identity.display_name().to_owned()).unwrap_or_default();
    println!("logged in as {name}; next: {target}");
    Ok(())
}

fn run_language(app: &App, code: Option<&str>) -> Result<(), CliError> {
    match code {
        Some(code) => {
            let language: Language = code.parse()?;
            app.change_language(language);
            println!("language set to {language} ({})", language.locale_tag());
        }
        None => println!("{}", app.credentials().language()),
    }
    Ok(())
}

fn print_decision(decision: &RouteDecision) {
    match decision {
        RouteDecision::Render(route) => println!("render {route:?}"),
        RouteDecision::Redirect { target, from: Some(from) } => println!("redirect {target} (return to {from})"),
        RouteDecision::Redirect { target, from: None } => println!("redirect {target}"),
    }
}
