// stake - command-line front-end for a persisted staking pool

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use stakeledger::config::NodeConfig;
use stakeledger::identity::{Address, Keypair};
use stakeledger::ledger::Amount;
use stakeledger::pool::StakingPool;
use stakeledger::storage::LedgerStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stake")]
#[command(about = "Deposit and withdraw a native asset against a staking ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the ledger database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Largest amount a single faucet request may mint
    #[arg(long, global = true, conflicts_with = "unlimited_faucet")]
    faucet_limit: Option<Amount>,

    /// Remove the faucet limit
    #[arg(long, global = true)]
    unlimited_faucet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a keypair and store it under a label
    Keygen { label: String },

    /// Print the address of a labelled account
    Address { label: String },

    /// List every labelled account with its balances
    Accounts,

    /// Mint native funds into an account's wallet
    Fund { label: String, amount: Amount },

    /// Stake funds from an account's wallet
    Deposit { label: String, amount: Amount },

    /// Withdraw staked funds back to an account's wallet
    Withdraw { label: String, amount: Amount },

    /// Show the staked balance of an account
    Balance { label: String },

    /// Show the total staked value
    Total,

    /// Show the number of active depositors
    Count,

    /// Print the event log
    Events,

    /// Show pool statistics
    Stats,

    /// Make an account refuse incoming transfers
    Reject { label: String },

    /// Let an account receive transfers again
    Accept { label: String },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Fund { .. }
                | Commands::Deposit { .. }
                | Commands::Withdraw { .. }
                | Commands::Reject { .. }
                | Commands::Accept { .. }
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = NodeConfig::new();
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if cli.verbose {
        config = config.with_log_filter("stakeledger=debug,stake=debug");
    }
    if cli.unlimited_faucet {
        config = config.with_faucet_limit(None);
    } else if let Some(limit) = cli.faucet_limit {
        config = config.with_faucet_limit(Some(limit));
    }
    config.validate()?;

    init_logging(&config);

    let store = LedgerStore::open(&config.data_dir)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let mut pool = store.load_pool()?.unwrap_or_default();
    pool.bank_mut().set_faucet_limit(config.faucet_limit);

    run(&cli.command, &store, &mut pool)?;

    if cli.command.mutates() {
        store.save_pool(&pool)?;
    }
    store.flush()?;
    Ok(())
}

fn init_logging(config: &NodeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: &Commands, store: &LedgerStore, pool: &mut StakingPool) -> Result<()> {
    match command {
        Commands::Keygen { label } => {
            let keypair = Keypair::generate();
            store.save_keypair(label, &keypair)?;
            info!(%label, address = %keypair.address(), "generated keypair");
            println!("{}", keypair.address());
        }
        Commands::Address { label } => {
            println!("{}", resolve(store, label)?);
        }
        Commands::Accounts => {
            for label in store.labels()? {
                let address = resolve(store, &label)?;
                println!(
                    "{:<16} {}  staked {:>24}  wallet {:>24}",
                    label,
                    address,
                    pool.balance_of(&address),
                    pool.wallet_balance(&address)
                );
            }
        }
        Commands::Fund { label, amount } => {
            let address = resolve(store, label)?;
            pool.fund(address, *amount)
                .with_context(|| format!("funding {}", label))?;
            info!(%label, %amount, "funded wallet");
            println!("wallet {}", pool.wallet_balance(&address));
        }
        Commands::Deposit { label, amount } => {
            let address = resolve(store, label)?;
            pool.stake(address, *amount)
                .with_context(|| format!("deposit by {}", label))?;
            print_last_event(pool);
        }
        Commands::Withdraw { label, amount } => {
            let address = resolve(store, label)?;
            pool.withdraw(address, *amount)
                .with_context(|| format!("withdrawal by {}", label))?;
            print_last_event(pool);
        }
        Commands::Balance { label } => {
            let address = resolve(store, label)?;
            println!("{}", pool.balance_of(&address));
        }
        Commands::Total => println!("{}", pool.total_value()),
        Commands::Count => println!("{}", pool.depositor_count()),
        Commands::Events => {
            for record in pool.events().records() {
                println!("#{:<6} {}", record.seq(), record.event());
            }
        }
        Commands::Stats => {
            let stats = pool.statistics();
            println!("total staked    {}", stats.total_value);
            println!("depositors      {}", stats.depositor_count);
            println!("custody         {}", stats.custody);
            println!("total minted    {}", stats.total_minted);
            let deposits = pool.events().iter().filter(|e| e.is_deposit()).count();
            println!("events          {} ({} deposits, {} withdrawals)",
                stats.event_count, deposits, stats.event_count - deposits);
            match pool.bank().faucet_limit() {
                Some(limit) => println!("faucet limit    {}", limit),
                None => println!("faucet limit    none"),
            }
            let storage = store.stats();
            println!("store keys      {}", storage.key_count);
            println!("store bytes     {}", storage.disk_size_bytes);
        }
        Commands::Reject { label } => {
            let address = resolve(store, label)?;
            pool.reject_incoming(address);
            info!(%label, "account now rejects incoming transfers");
        }
        Commands::Accept { label } => {
            let address = resolve(store, label)?;
            pool.accept_incoming(&address);
            info!(%label, "account accepts incoming transfers");
        }
    }
    Ok(())
}

/// Look up a labelled keypair, or accept a raw `0x` address
fn resolve(store: &LedgerStore, label: &str) -> Result<Address> {
    if let Some(keypair) = store.load_keypair(label)? {
        return Ok(keypair.address());
    }
    Address::parse(label).map_err(|_| anyhow!("unknown account '{}'", label))
}

fn print_last_event(pool: &StakingPool) {
    if let Some(event) = pool.events().last() {
        println!("{}", event);
    }
}
