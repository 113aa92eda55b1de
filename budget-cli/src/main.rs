//! Budget CLI
//!
//! Edits a budget project directory from the command line.

mod config;
mod settings;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budget_repo::{Project, Projects};
use budget_types::{
    AccountId, Amount, BankAccount, CategoryId, CounterPart, CounterpartId, CsvField, Currency,
    EntityLookup, Iban, MappingId, TaggedItem, Transaction, TransactionCategory,
    TransactionCsvMapping, TransactionId, TransactionRecord,
};

use config::Config;
use settings::AppSettings;

#[derive(Parser)]
#[command(name = "budget")]
#[command(author, version, about = "Budget project editor", long_about = None)]
struct Cli {
    /// Project directory (defaults to BUDGET_PROJECT_DIR)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Settings file (defaults to BUDGET_SETTINGS_PATH, then settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the project
    Show,
    /// Bank account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Counterpart operations
    Counterpart {
        #[command(subcommand)]
        action: CounterpartCommands,
    },
    /// Transaction category operations
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Transaction operations
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
    /// CSV import mapping operations
    Mapping {
        #[command(subcommand)]
        action: MappingCommands,
    },
    /// Import transactions from a CSV file
    Import {
        /// Mapping describing the CSV columns
        #[arg(long)]
        mapping: MappingId,
        /// CSV file with a header row
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create a bank account
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        iban: Option<Iban>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List bank accounts with their balances
    List,
    /// Remove a bank account no transaction refers to
    Remove { id: AccountId },
}

#[derive(Subcommand)]
enum CounterpartCommands {
    /// Create a counterpart
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        iban: Option<Iban>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List counterparts
    List,
    /// Remove a counterpart no transaction refers to
    Remove { id: CounterpartId },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a transaction category
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List transaction categories
    List,
    /// Remove a category no transaction refers to
    Remove { id: CategoryId },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Booking date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Amount, rounded to cents; negative for expenses
        #[arg(long, allow_hyphen_values = true, value_parser = Amount::parse_input)]
        amount: Amount,
        /// Defaults to the first account
        #[arg(long)]
        account: Option<AccountId>,
        #[arg(long)]
        counterpart: Option<CounterpartId>,
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List transactions
    List {
        /// Only transactions booked on this account
        #[arg(long)]
        account: Option<AccountId>,
    },
    /// Duplicate a transaction
    Copy { id: TransactionId },
    /// Remove a transaction
    Remove { id: TransactionId },
    /// Replace the note of a transaction
    RenameNote { id: TransactionId, note: String },
}

#[derive(Subcommand)]
enum MappingCommands {
    /// Create a CSV mapping; columns are zero-based
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<usize>,
        #[arg(long)]
        amount: Option<usize>,
        #[arg(long)]
        counterpart: Option<usize>,
        #[arg(long)]
        account: Option<usize>,
        #[arg(long)]
        note: Option<usize>,
    },
    /// List CSV mappings
    List,
}

impl Commands {
    /// Whether the project has to be saved after the command ran.
    fn mutates(&self) -> bool {
        match self {
            Commands::Show => false,
            Commands::Account { action } => !matches!(action, AccountCommands::List),
            Commands::Counterpart { action } => !matches!(action, CounterpartCommands::List),
            Commands::Category { action } => !matches!(action, CategoryCommands::List),
            Commands::Transaction { action } => {
                !matches!(action, TransactionCommands::List { .. })
            }
            Commands::Mapping { action } => !matches!(action, MappingCommands::List),
            Commands::Import { .. } => true,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    let settings_path = cli.settings.unwrap_or(config.settings_path);
    let settings = AppSettings::load(&settings_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let directory = cli
        .project
        .or(config.project_dir)
        .context("No project directory given; pass --project or set BUDGET_PROJECT_DIR")?;

    let mut projects = Projects::new();
    let project = projects
        .create_new_project(&directory, true)
        .with_context(|| format!("Failed to open project in {}", directory.display()))?;

    let save = cli.command.mutates();
    run(cli.command, project, settings.general.currency)?;

    if save {
        project
            .save(&directory)
            .with_context(|| format!("Failed to save project in {}", directory.display()))?;
    }
    Ok(())
}

fn run(command: Commands, project: &mut Project, currency: Currency) -> Result<()> {
    match command {
        Commands::Show => {
            println!("Project {} ({})", project.folder_name(), project.directory().display());
            println!("  accounts:     {}", project.bank_accounts().len());
            println!("  counterparts: {}", project.counterparts().len());
            println!("  categories:   {}", project.transaction_categories().len());
            println!("  transactions: {}", project.transactions().len());
            println!("  csv mappings: {}", project.csv_mappings().len());
            print_accounts(project, currency);
        }

        Commands::Account { action } => match action {
            AccountCommands::Add { name, iban, note } => {
                let account = project.create::<BankAccount>(None, None)?;
                if let Some(name) = name {
                    account.name = name;
                }
                account.iban = iban;
                account.note = note;
                println!("{}", serde_json::to_string_pretty(&account.to_record())?);
            }
            AccountCommands::List => print_accounts(project, currency),
            AccountCommands::Remove { id } => {
                let removed = project.delete::<BankAccount>(id)?;
                info!(account = %id, name = %removed.name, "Removed bank account");
            }
        },

        Commands::Counterpart { action } => match action {
            CounterpartCommands::Add { name, iban, note } => {
                let counterpart = project.create::<CounterPart>(None, None)?;
                if let Some(name) = name {
                    counterpart.name = name;
                }
                counterpart.iban = iban;
                counterpart.note = note;
                println!("{}", serde_json::to_string_pretty(&counterpart.to_record())?);
            }
            CounterpartCommands::List => {
                println!("{:>4}  {:<24}  {:<34}  NOTE", "ID", "NAME", "IBAN");
                for counterpart in project.counterparts().values() {
                    println!(
                        "{:>4}  {:<24}  {:<34}  {}",
                        counterpart.id(),
                        counterpart.name,
                        counterpart.iban.as_ref().map(Iban::to_string).unwrap_or_default(),
                        counterpart.note
                    );
                }
            }
            CounterpartCommands::Remove { id } => {
                let removed = project.delete::<CounterPart>(id)?;
                info!(counterpart = %id, name = %removed.name, "Removed counterpart");
            }
        },

        Commands::Category { action } => match action {
            CategoryCommands::Add { name, note } => {
                let category = project.create::<TransactionCategory>(None, None)?;
                if let Some(name) = name {
                    category.name = name;
                }
                category.note = note;
                println!("{}", serde_json::to_string_pretty(&category.to_record())?);
            }
            CategoryCommands::List => {
                println!("{:>4}  {:<24}  NOTE", "ID", "NAME");
                for category in project.transaction_categories().values() {
                    println!("{:>4}  {:<24}  {}", category.id(), category.name, category.note);
                }
            }
            CategoryCommands::Remove { id } => {
                let removed = project.delete::<TransactionCategory>(id)?;
                info!(category = %id, name = %removed.name, "Removed category");
            }
        },

        Commands::Transaction { action } => match action {
            TransactionCommands::Add {
                date,
                amount,
                account,
                counterpart,
                category,
                note,
            } => {
                let id = project.transactions().get_new_identifier();
                let record = TransactionRecord {
                    identifier: id,
                    date: date
                        .unwrap_or_else(|| chrono::Local::now().date_naive())
                        .format("%Y-%m-%d")
                        .to_string(),
                    counterpart,
                    amount: amount.to_string(),
                    account: account.or_else(|| project.first_account()),
                    category,
                    note,
                };
                let tx = project.create::<Transaction>(Some(id), Some(record))?;
                println!("{}", serde_json::to_string_pretty(&tx.to_record())?);
            }
            TransactionCommands::List { account } => {
                println!(
                    "{:>4}  {:<10}  {:>12}  {:<20}  {:<20}  {:<16}  NOTE",
                    "ID", "DATE", "AMOUNT", "ACCOUNT", "COUNTERPART", "CATEGORY"
                );
                let rows = project
                    .transactions()
                    .values()
                    .filter(|tx| account.is_none() || tx.account() == account);
                for tx in rows {
                    println!(
                        "{:>4}  {:<10}  {:>12}  {:<20}  {:<20}  {:<16}  {}",
                        tx.id(),
                        tx.date,
                        tx.amount.display_in(currency),
                        project.account_of(tx).map(|a| a.name.as_str()).unwrap_or("-"),
                        project.counterpart_of(tx).map(|c| c.name.as_str()).unwrap_or("-"),
                        project.category_of(tx).map(|c| c.name.as_str()).unwrap_or("-"),
                        tx.note
                    );
                }
            }
            TransactionCommands::Copy { id } => {
                let copy = project.copy::<Transaction>(id)?;
                println!("{}", serde_json::to_string_pretty(&copy.to_record())?);
            }
            TransactionCommands::Remove { id } => {
                project.delete::<Transaction>(id)?;
                info!(transaction = %id, "Removed transaction");
            }
            TransactionCommands::RenameNote { id, note } => {
                project
                    .get_mut::<Transaction>(id)
                    .with_context(|| format!("No transaction {id}"))?
                    .note = note;
            }
        },

        Commands::Mapping { action } => match action {
            MappingCommands::Add {
                name,
                date,
                amount,
                counterpart,
                account,
                note,
            } => {
                let mapping = project.create::<TransactionCsvMapping>(None, None)?;
                if let Some(name) = name {
                    mapping.name = name;
                }
                mapping.set_column(CsvField::Date, date);
                mapping.set_column(CsvField::Amount, amount);
                mapping.set_column(CsvField::Counterpart, counterpart);
                mapping.set_column(CsvField::Account, account);
                mapping.set_column(CsvField::Note, note);
                println!("{}", serde_json::to_string_pretty(&mapping.to_record())?);
            }
            MappingCommands::List => {
                let records: Vec<_> = project.csv_mappings().values().map(|m| m.to_record()).collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        },

        Commands::Import { mapping, file } => {
            let reader = File::open(&file)
                .map(BufReader::new)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let summary = project.import_csv(mapping, reader)?;
            println!(
                "Imported {} transactions, created {} counterparts",
                summary.transactions.len(),
                summary.created_counterparts.len()
            );
        }
    }
    Ok(())
}

fn print_accounts(project: &Project, currency: Currency) {
    println!("{:>4}  {:<24}  {:<34}  {:>12}", "ID", "NAME", "IBAN", "BALANCE");
    for account in project.bank_accounts().values() {
        let balance = project
            .balance(account.id())
            .map(|amount| amount.display_in(currency))
            .unwrap_or_else(|| "overflow".to_string());
        println!(
            "{:>4}  {:<24}  {:<34}  {:>12}",
            account.id(),
            account.name,
            account.iban.as_ref().map(Iban::to_string).unwrap_or_default(),
            balance
        );
    }
}
