use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use wallet_bridge::config::Config;
use wallet_bridge::domains::account::TransactionFilters;
use wallet_bridge::domains::envelope::CallOutcome;
use wallet_bridge::error::Result;
use wallet_bridge::services::transport::connect_tcp;
use wallet_bridge::WalletClient;

#[derive(Parser, Debug)]
#[command(name = "wallet-bridge")]
#[command(about = "Wallet backend diagnostic CLI")]
struct Cli {
    #[arg(long, env = "WALLET_BRIDGE_CONFIG")]
    config: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend answers at all
    Ping,
    /// List accounts known to the backend
    Accounts,
    /// List currencies and balances
    Currencies,
    /// Show the backend's current gas price
    GasPrice,
    /// List sent transactions
    Transactions {
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Rename an account
    Rename { address: String, name: String },
    /// Remove an account
    Remove { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wallet_bridge=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.host.is_some() {
        config.host = cli.host.clone();
    }
    if cli.port.is_some() {
        config.port = cli.port;
    }

    let stream = connect_tcp(config.host(), config.port()).await?;
    let client = WalletClient::from_stream(stream, config.request_timeout());

    match cli.command {
        Command::Ping => {
            let outcome = client.ping().await?;
            println!("{}", style("backend is up").green());
            if let Some(data) = outcome.data {
                println!("{data}");
            }
        }
        Command::Accounts => {
            let outcome = client.account_list().await?;
            for account in outcome.data.unwrap_or_default() {
                println!("{}  {}", style(&account.address).cyan(), account.name);
            }
        }
        Command::Currencies => {
            let outcome = client.currency_list().await?;
            for currency in outcome.data.unwrap_or_default() {
                println!(
                    "{}  {}  balance {}",
                    style(&currency.symbol).cyan(),
                    currency.name,
                    currency.balance
                );
            }
        }
        Command::GasPrice => {
            let outcome = client.gas_price().await?;
            if let Some(price) = outcome.data {
                println!("{price}");
            }
        }
        Command::Transactions {
            currency,
            from,
            to,
            limit,
            offset,
        } => {
            let filters = TransactionFilters {
                currency_address: currency,
                from_address: from,
                to_address: to,
                time_start: None,
                time_end: None,
            };
            let outcome = client
                .transaction_list(Some(&filters), Some(limit), Some(offset))
                .await?;
            for tx in outcome.data.unwrap_or_default() {
                println!(
                    "{}  {} -> {}  {}",
                    style(&tx.hash).cyan(),
                    tx.from_address,
                    tx.to_address,
                    tx.amount
                );
            }
        }
        Command::Rename { address, name } => {
            let outcome = client.rename_account(&address, &name).await?;
            report_flag("renamed", &outcome);
        }
        Command::Remove { address } => {
            let outcome = client.remove_account(&address).await?;
            report_flag("removed", &outcome);
        }
    }

    Ok(())
}

fn report_flag(action: &str, outcome: &CallOutcome<bool>) {
    if outcome.data == Some(true) {
        println!("{}", style(action).green());
    } else {
        println!("{}", style("rejected").red());
    }
    for (field, message) in outcome.validation_messages() {
        println!("  {}: {}", style(&field).yellow(), message);
    }
}
