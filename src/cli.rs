use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// bank: wallet front-end for the ChinchillaCoin token.
#[derive(Parser, Debug)]
#[command(name = "bank", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub chain: ChainArgs,

    /// Defaults to the interactive console.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Connection settings. Each flag overrides its environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct ChainArgs {
    /// Wallet JSON-RPC endpoint [env: WALLET_RPC_URL]
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Token contract address [env: CONTRACT_ADDRESS]
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// Receipt polling interval in milliseconds [env: RECEIPT_POLL_MS]
    #[arg(long, global = true)]
    pub poll_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive console
    Console,

    /// Print token name, symbol, supply and owner
    Info,

    /// Send tokens to another address (at most 10 per transfer)
    Transfer {
        /// Destination address (0x-prefixed hex)
        to: String,
        /// Amount in whole tokens, e.g. 2.5
        amount: Decimal,
    },

    /// Destroy tokens from the owner's balance (owner only)
    Burn {
        /// Amount in whole tokens
        amount: Decimal,
    },

    /// Create new tokens for the owner (owner only)
    Mint {
        /// Amount in whole tokens
        amount: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_subcommand_means_console() {
        let cli = Cli::try_parse_from(["bank"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_transfer_parses_decimal_amount() {
        let cli = Cli::try_parse_from([
            "bank",
            "transfer",
            "0x00000000000000000000000000000000000000aa",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Transfer { to, amount }) => {
                assert_eq!(to, "0x00000000000000000000000000000000000000aa");
                assert_eq!(amount, dec!(2.5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_chain_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bank",
            "mint",
            "5",
            "--rpc-url",
            "http://localhost:8545",
            "--poll-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.chain.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(cli.chain.poll_ms, Some(250));
        assert!(matches!(cli.command, Some(Command::Mint { .. })));
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        assert!(Cli::try_parse_from(["bank", "burn", "lots"]).is_err());
    }
}
