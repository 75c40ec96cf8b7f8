mod cli;
mod config;
mod console;
mod error;
mod notify;
mod session;
mod validation;

use chinchilla::TokenGateway;
use clap::Parser;
use cli::Command;
use error::BankError;
use notify::ConsoleNotifier;
use session::SessionController;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    let config = match config::chain_config(&cli.chain, |key| std::env::var(key).ok()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let gateway = match TokenGateway::from_config(&config) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!(error = %e, "failed to set up wallet provider");
            std::process::exit(1);
        }
    };

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    info!(
        contract = %gateway.contract_address(),
        wallet = config.wallet_rpc_url.as_deref().unwrap_or("<none>"),
        "bank starting"
    );
    let controller = SessionController::start(gateway, ConsoleNotifier).await;

    let command = cli.command.unwrap_or(Command::Console);
    let result = match command {
        Command::Console => console::run(&controller, cancel).await,
        one_shot => {
            tokio::select! {
                _ = cancel.cancelled() => Ok(()),
                r = run_once(&controller, one_shot) => r,
            }
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "bank exited with an error");
        std::process::exit(1);
    }
}

async fn run_once(
    controller: &SessionController<TokenGateway<chinchilla::InjectedProvider>, ConsoleNotifier>,
    command: Command,
) -> Result<(), BankError> {
    let command = match command {
        Command::Console => return Ok(()),
        Command::Info => console::ConsoleCommand::Info,
        Command::Transfer { to, amount } => console::ConsoleCommand::Transfer { to, amount },
        Command::Burn { amount } => console::ConsoleCommand::Burn(amount),
        Command::Mint { amount } => console::ConsoleCommand::Mint(amount),
    };
    controller.snapshot().ensure_ready()?;
    console::execute(controller, command).await.map(|_| ())
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
