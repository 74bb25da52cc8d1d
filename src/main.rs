use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use obs_ledger::engine::{
    Account, AccountSnapshot, Ledger, LedgerStore, Session, StatementRecord, parse_amount,
};
use obs_ledger::storage::FileStore;
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

/// Online banking demo backed by a local JSON store.
#[derive(Parser, Debug)]
#[command(name = "obs", version)]
struct Cli {
    /// File holding the persisted key-value store
    #[arg(long, env = "OBS_STORE", default_value = "obs_store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    user: String,

    #[arg(long)]
    pin: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the demo accounts if either is missing
    Seed,
    /// Overwrite everything with fresh demo accounts
    ResetDemo,
    /// Check credentials
    Login(Credentials),
    /// Show the account balance
    Balance(Credentials),
    /// Show the transaction history, newest first
    History(Credentials),
    Deposit {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        amount: String,
    },
    Withdraw {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        amount: String,
    },
    Transfer {
        #[command(flatten)]
        auth: Credentials,
        /// Recipient account
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Permanently delete the transaction history
    ClearHistory {
        #[command(flatten)]
        auth: Credentials,
        /// Confirm, the history cannot be restored
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    SimpleLogger::new().env().init()?;

    log::debug!("Application started");

    let cli = Cli::parse();
    log::debug!("Using store at {:?}", cli.store);

    let mut store = LedgerStore::new(FileStore::new(&cli.store));
    run(&mut store, cli.command)?;

    log::debug!("Application finished");

    Ok(())
}

fn run(store: &mut LedgerStore<FileStore>, command: Command) -> Result<()> {
    // Every other command starts from a seeded ledger
    let ledger = match command {
        Command::ResetDemo => store.reset_demo().context("failed to create demo accounts")?,
        _ => store.ensure_seeded().context("failed to load ledger")?,
    };

    match command {
        Command::Seed | Command::ResetDemo => write_snapshots(&ledger),
        Command::Login(auth) | Command::Balance(auth) => {
            let (_, account) = login(store, &auth)?;
            write_accounts(&[account])
        }
        Command::History(auth) => {
            let (session, _) = login(store, &auth)?;
            let statement = session.statement(store)?;
            if statement.is_empty() {
                log::info!("No transactions yet.");
                return write_header(&StatementRecord::HEADERS);
            }
            write_to_std_out(statement)
        }
        Command::Deposit { auth, amount } => {
            let (session, _) = login(store, &auth)?;
            let amount = parse_amount(&amount)?;
            let account = session.deposit(store, amount)?;
            write_accounts(&[account])
        }
        Command::Withdraw { auth, amount } => {
            let (session, _) = login(store, &auth)?;
            let amount = parse_amount(&amount)?;
            let account = session.withdraw(store, amount)?;
            write_accounts(&[account])
        }
        Command::Transfer { auth, to, amount } => {
            let (session, _) = login(store, &auth)?;
            let to = to.trim();
            if to.is_empty() {
                bail!("Enter valid recipient and amount");
            }
            let amount = parse_amount(&amount)?;
            let (sender, recipient) = session.transfer(store, to, amount)?;
            write_accounts(&[sender, recipient])
        }
        Command::ClearHistory { auth, yes } => {
            let (session, _) = login(store, &auth)?;
            if !yes {
                bail!("Clearing the transaction history cannot be undone, pass --yes to confirm");
            }
            let account = session.clear_history(store)?;
            write_accounts(&[account])
        }
    }
}

fn login(store: &LedgerStore<FileStore>, auth: &Credentials) -> Result<(Session, Account)> {
    let user = auth.user.trim();
    log::debug!("Authenticating {user}");
    Ok(Session::login(store, user, auth.pin.trim())?)
}

fn write_snapshots(ledger: &Ledger) -> Result<()> {
    write_to_std_out(ledger.accounts().map(AccountSnapshot::from))
}

fn write_accounts(accounts: &[Account]) -> Result<()> {
    write_to_std_out(accounts.iter().map(AccountSnapshot::from))
}

fn write_header(headers: &[&str]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(headers)?;
    wtr.flush()?;
    Ok(())
}

fn write_to_std_out<R: Serialize>(records: impl IntoIterator<Item = R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());

    log::debug!("Starting record serialisation");
    for record in records {
        wtr.serialize(record)?;
    }

    log::debug!("Record serialisation done -> Flushing to stdout");
    wtr.flush()?;

    Ok(())
}
