//! Line-oriented interactive console.
//!
//! Each input line is parsed into a [`ConsoleCommand`], written into the
//! session's form inputs, and submitted. Outcomes reach the user through the
//! notification sink, so the console only prints token info and help.

use std::io::Write;
use std::str::FromStr;

use chinchilla::ChainGateway;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::BankError;
use crate::notify::NotificationSink;
use crate::session::{SessionController, SessionState};

const HELP: &str = "\
commands:
  info                      show token name, symbol, supply and owner
  transfer <to> <amount>    send tokens (at most 10 per transfer)
  burn <amount>             destroy tokens (owner only)
  mint <amount>             create tokens for the owner (owner only)
  refresh                   reload token info
  connect                   reconnect the wallet and reload token info
  help                      show this text
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Info,
    Transfer { to: String, amount: Decimal },
    Burn(Decimal),
    Mint(Decimal),
    Refresh,
    Connect,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".into());
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("info", []) => Self::Info,
            ("transfer", [to, amount]) => Self::Transfer {
                to: to.to_string(),
                amount: parse_amount(amount)?,
            },
            ("burn", [amount]) => Self::Burn(parse_amount(amount)?),
            ("mint", [amount]) => Self::Mint(parse_amount(amount)?),
            ("refresh", []) => Self::Refresh,
            ("connect", []) => Self::Connect,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            ("transfer", _) => return Err("usage: transfer <to> <amount>".into()),
            ("burn" | "mint", _) => return Err(format!("usage: {verb} <amount>")),
            _ => return Err(format!("unknown command {line:?}, try `help`")),
        };
        Ok(command)
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("{raw:?} is not a number"))
}

/// Write the token section of the front-end.
pub fn render_info<W: Write>(state: &SessionState, out: &mut W) -> std::io::Result<()> {
    let Some(wallet) = state.wallet.filter(|_| state.is_wallet_connected()) else {
        return writeln!(out, "wallet not connected (try `connect`)");
    };
    writeln!(out, "wallet:        {wallet}")?;

    let Some(token) = &state.token else {
        return writeln!(out, "token info not loaded (try `refresh`)");
    };
    writeln!(out, "name:          {}", token.name)?;
    writeln!(out, "symbol:        {}", token.symbol)?;
    writeln!(out, "total supply:  {} {}", token.total_supply, token.symbol)?;
    writeln!(out, "owner:         {}", token.owner)?;
    if state.is_owner() {
        writeln!(out, "you own this token: burn and mint are available")?;
    }
    Ok(())
}

fn print_info(state: &SessionState) {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = render_info(state, &mut lock);
}

/// Execute one command. Returns `false` when the console should exit.
pub async fn execute<G: ChainGateway, N: NotificationSink>(
    controller: &SessionController<G, N>,
    command: ConsoleCommand,
) -> Result<bool, BankError> {
    match command {
        ConsoleCommand::Info => print_info(&controller.snapshot()),
        ConsoleCommand::Transfer { to, amount } => {
            controller.set_transfer_destination(to);
            controller.set_transfer_amount(amount);
            let receipt = controller.request_transfer().await?;
            println!(
                "tx {} included in block {}",
                receipt.tx_hash, receipt.block_number
            );
        }
        ConsoleCommand::Burn(amount) => {
            controller.set_burn_amount(amount);
            let supply = controller.request_burn().await?;
            println!("total supply is now {supply}");
        }
        ConsoleCommand::Mint(amount) => {
            controller.set_mint_amount(amount);
            let supply = controller.request_mint().await?;
            println!("total supply is now {supply}");
        }
        ConsoleCommand::Refresh => {
            controller.load_token_info().await?;
            print_info(&controller.snapshot());
        }
        ConsoleCommand::Connect => {
            controller.initialize().await?;
            print_info(&controller.snapshot());
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Log session transitions until the controller goes away.
async fn log_transitions(mut rx: watch::Receiver<SessionState>) {
    let mut last = rx.borrow_and_update().clone();
    while rx.changed().await.is_ok() {
        let next = rx.borrow_and_update().clone();
        if next.phase != last.phase {
            debug!(from = ?last.phase, to = ?next.phase, "session phase changed");
        }
        if next.in_flight != last.in_flight {
            debug!(operation = ?next.in_flight, "in-flight operation changed");
        }
        last = next;
    }
}

/// Run the console until `quit`, end of input, or cancellation.
pub async fn run<G: ChainGateway, N: NotificationSink>(
    controller: &SessionController<G, N>,
    cancel: CancellationToken,
) -> Result<(), BankError> {
    let watcher = tokio::spawn(log_transitions(controller.subscribe()));

    print_info(&controller.snapshot());
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                watcher.abort();
                return Err(e.into());
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = execute(controller, command) => outcome,
        };
        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            // Already reported through the notification sink.
            Err(e) => debug!(error = %e, "command failed"),
        }
    }

    watcher.abort();
    info!("console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chinchilla::{Address, TokenInfo};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::session::Phase;

    // ---- parsing ----

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("info".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Info));
        assert_eq!("  REFRESH ".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Refresh));
        assert_eq!("connect".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Connect));
        assert_eq!("?".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Help));
        assert_eq!("exit".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_amount_commands() {
        assert_eq!(
            "transfer 0xabc 2.5".parse::<ConsoleCommand>(),
            Ok(ConsoleCommand::Transfer {
                to: "0xabc".into(),
                amount: dec!(2.5)
            })
        );
        assert_eq!("burn 11".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Burn(dec!(11))));
        assert_eq!("mint 0.001".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Mint(dec!(0.001))));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<ConsoleCommand>().is_err());
        assert!("transfer 0xabc".parse::<ConsoleCommand>().is_err());
        assert!("burn ten".parse::<ConsoleCommand>().is_err());
        assert!("mint".parse::<ConsoleCommand>().is_err());
        assert!("dance".parse::<ConsoleCommand>().is_err());
    }

    // ---- rendering ----

    fn rendered(state: &SessionState) -> String {
        let mut buf = Vec::new();
        render_info(state, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_disconnected() {
        let out = rendered(&SessionState::default());
        assert!(out.contains("not connected"));
    }

    #[test]
    fn test_render_owner_view() {
        let owner: Address = "0x00000000000000000000000000000000000000bb".parse().unwrap();
        let state = SessionState {
            phase: Phase::Connected,
            wallet: Some(owner),
            token: Some(TokenInfo {
                name: "ChinchillaCoin".into(),
                symbol: "CHIN".into(),
                total_supply: dec!(105),
                owner,
            }),
            ..Default::default()
        };
        let out = rendered(&state);
        assert!(out.contains("ChinchillaCoin"));
        assert!(out.contains("105 CHIN"));
        assert!(out.contains("you own this token"));
    }

    #[test]
    fn test_render_connected_without_info() {
        let state = SessionState {
            phase: Phase::Connected,
            wallet: Some(Address::ZERO),
            ..Default::default()
        };
        let out = rendered(&state);
        assert!(out.contains("not loaded"));
        assert!(!out.contains("you own"));
    }
}
