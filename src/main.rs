use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use isp_portal::commands;
use isp_portal::config::{AppConfig, StoreBackend, DEFAULT_API_URL};
use isp_portal::forms::RegistrationForm;
use isp_portal::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "isp-portal", version, about = "ISP account portal client")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "ISP_PORTAL_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "ISP_PORTAL_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Where the session token is stored
    #[arg(long, env = "ISP_PORTAL_STORE", value_enum, default_value_t = StoreBackend::File)]
    store: StoreBackend,

    /// Token file location (file store only)
    #[arg(long, env = "ISP_PORTAL_STORE_PATH")]
    store_path: Option<PathBuf>,

    /// Minimum duration of the startup session check, in milliseconds
    #[arg(long, env = "ISP_PORTAL_SPLASH_MS", default_value_t = 3000)]
    splash_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the stored session against the backend
    Status,
    /// Log in with phone number and password
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Exactly 6 characters
        #[arg(long)]
        password: String,
        #[arg(long)]
        address: String,
    },
    /// Show account summary and notifications
    Dashboard,
    /// Show the full profile
    Profile,
    /// Forget the stored session
    Logout,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            store: self.store,
            store_path: self.store_path.clone(),
            splash: Duration::from_millis(self.splash_ms),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up ISP_PORTAL_* settings from a local .env if present
    let _ = dotenvy::dotenv();

    env_logger::init();

    let cli = Cli::parse();

    let state = match AppState::new(cli.config()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Status => {
            println!("Checking session...");
            commands::status(&state).await
        }
        Command::Login { phone, password } => commands::login(&state, phone, password).await,
        Command::Register {
            name,
            phone,
            password,
            address,
        } => {
            let form = RegistrationForm {
                name,
                phone,
                password,
                address,
            };
            commands::register(&state, form).await
        }
        Command::Dashboard => commands::dashboard(&state).await,
        Command::Profile => commands::profile(&state).await,
        Command::Logout => commands::logout(&state),
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
