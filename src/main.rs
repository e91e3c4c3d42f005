use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, LevelFilter};
use payoff::amortization::Loan;
use payoff::input::{parse_amount_or_zero, parse_priority, DebtForm};
use payoff::report::{format_comparison, format_schedule, format_text, write_csv};
use payoff::store::{DebtStore, JsonFileStore};
use payoff::{
    compare_strategies, simulate_from_today, Debt, PayoffError, SimulationInput, StoreError, Strategy,
    ValidationError,
};
use simple_logger::SimpleLogger;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "payoff")]
#[command(about = "Plan debt payoff with avalanche, snowball or custom ordering")]
struct Cli {
    /// JSON file holding saved debts
    #[arg(long, env = "PAYOFF_DATA", default_value = "payoff.json", global = true)]
    data: PathBuf,

    /// User whose debts are read and written
    #[arg(long, env = "PAYOFF_USER", default_value = "local", global = true)]
    user: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "PAYOFF_LOG", default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save a new debt
    Add(DebtArgs),
    /// Show saved debts
    List,
    /// Change fields of a saved debt
    Update {
        id: u64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Remove a saved debt
    Delete { id: u64 },
    /// Simulate payoff of the saved debts
    Simulate {
        #[arg(long, value_enum, default_value_t = CliStrategy::Avalanche)]
        strategy: CliStrategy,
        /// Extra amount paid each month on top of minimums
        #[arg(long, default_value = "0")]
        extra: String,
        /// Also write the payoff records as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compare avalanche and snowball on the saved debts
    Compare {
        #[arg(long, default_value = "0")]
        extra: String,
    },
    /// Print an amortization schedule for a fixed-rate loan
    Amortize {
        #[arg(long)]
        principal: f64,
        /// APR in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        months: u32,
        /// Defaults to one month from today
        #[arg(long)]
        first_payment: Option<NaiveDate>,
        #[arg(long, default_value_t = 2)]
        decimals: i32,
    },
}

#[derive(Args, Debug)]
struct DebtArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    balance: String,
    /// APR in percent
    #[arg(long, default_value = "")]
    rate: String,
    #[arg(long, default_value = "")]
    minimum: String,
    #[arg(long, default_value = "")]
    priority: String,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    balance: Option<String>,
    #[arg(long)]
    rate: Option<String>,
    #[arg(long)]
    minimum: Option<String>,
    #[arg(long)]
    priority: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    Avalanche,
    Snowball,
    Custom,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Avalanche => Strategy::Avalanche,
            CliStrategy::Snowball => Strategy::Snowball,
            CliStrategy::Custom => Strategy::Custom,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Payoff(#[from] PayoffError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not create {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl AppError {
    /// Message shown to the user; storage details only go to the log.
    fn user_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Io(_)) | AppError::Store(StoreError::Serialization(_)) => {
                "Could not access saved debts. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = SimpleLogger::new().with_level(cli.log_level).init() {
        eprintln!("logger already initialised: {}", err);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let user = cli.user.as_str();
    match cli.command {
        Command::Add(args) => {
            let debt = DebtForm {
                account_name: args.name,
                balance: args.balance,
                annual_rate_percent: args.rate,
                minimum_payment: args.minimum,
                priority_order: args.priority,
            }
            .into_debt()?;
            let mut store = JsonFileStore::open(&cli.data)?;
            let record = store.create(user, debt)?;
            info!(
                "saved debt {} for {} to {}",
                record.id,
                user,
                store.path().display()
            );
            println!("{}", record);
        }
        Command::List => {
            let store = JsonFileStore::open(&cli.data)?;
            let records = store.list(user)?;
            if records.is_empty() {
                println!("No debts saved for {}.", user);
            }
            for record in records {
                println!("{}", record);
            }
        }
        Command::Update { id, fields } => {
            let mut store = JsonFileStore::open(&cli.data)?;
            let current = store.get(id)?;
            if current.user_id != user {
                return Err(StoreError::NotFound(id).into());
            }
            let debt = apply_update(current.debt, fields);
            let record = store.update(id, debt)?;
            println!("{}", record);
        }
        Command::Delete { id } => {
            let mut store = JsonFileStore::open(&cli.data)?;
            if store.get(id)?.user_id != user {
                return Err(StoreError::NotFound(id).into());
            }
            store.delete(id)?;
            println!("Deleted debt {}.", id);
        }
        Command::Simulate {
            strategy,
            extra,
            csv,
        } => {
            let debts = load_debts(&cli.data, user)?;
            let strategy = Strategy::from(strategy);
            let extra = parse_amount_or_zero(&extra);
            let input = SimulationInput::new(debts, strategy, extra);
            let result = simulate_from_today(&input)?;
            print!("{}", format_text(&result, strategy, extra));
            if let Some(path) = csv {
                let file = File::create(&path).map_err(|source| AppError::Output {
                    path: path.clone(),
                    source,
                })?;
                write_csv(&result, file)?;
                info!("wrote payoff records to {}", path.display());
            }
        }
        Command::Compare { extra } => {
            let debts = load_debts(&cli.data, user)?;
            let extra = parse_amount_or_zero(&extra);
            let comparison = compare_strategies(&debts, extra, Local::now().date_naive())?;
            print!("{}", format_comparison(&comparison));
        }
        Command::Amortize {
            principal,
            rate,
            months,
            first_payment,
            decimals,
        } => {
            let first_payment = first_payment.unwrap_or_else(|| {
                let today = Local::now().date_naive();
                today
                    .checked_add_months(chrono::Months::new(1))
                    .unwrap_or(today)
            });
            let loan = Loan::new(principal, months, rate, first_payment, decimals);
            print!("{}", format_schedule(&loan));
        }
    }
    Ok(())
}

fn load_debts(path: &Path, user: &str) -> Result<Vec<Debt>, StoreError> {
    let store = JsonFileStore::open(path)?;
    Ok(store.list(user)?.into_iter().map(|r| r.debt).collect())
}

fn apply_update(mut debt: Debt, fields: UpdateArgs) -> Debt {
    if let Some(name) = fields.name {
        debt.account_name = name.trim().to_string();
    }
    if let Some(balance) = fields.balance {
        debt.balance = parse_amount_or_zero(&balance);
    }
    if let Some(rate) = fields.rate {
        debt.annual_rate_percent = parse_amount_or_zero(&rate);
    }
    if let Some(minimum) = fields.minimum {
        debt.minimum_payment = parse_amount_or_zero(&minimum);
    }
    if let Some(priority) = fields.priority {
        debt.priority_order = parse_priority(&priority);
    }
    debt
}
