use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fintrack::AppCommand;
use fintrack::core::log::init_logging;
use fintrack::core::models::{AccountType, CategoryType, ConfidenceLevel, TransactionKind};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display balances, income and expense totals, recent activity and budgets
    Dashboard,
    /// List accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountAction>,
    },
    /// List transactions, newest first
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionAction>,
    },
    /// List categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoryAction>,
    },
    /// List budgets with their usage
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Open a new account
    Add {
        #[arg(long)]
        name: String,
        /// checking, savings, credit-card or cash
        #[arg(long = "type", default_value = "checking")]
        account_type: AccountType,
        /// Defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
    },
}

#[derive(Subcommand)]
enum TransactionAction {
    /// Record a transaction
    Add {
        #[arg(long = "account")]
        account_id: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// income, expense or transfer
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionKind,
    },
    /// Assign a category to a transaction
    Categorize {
        transaction_id: String,
        #[arg(long = "category")]
        category_id: String,
        #[arg(long, default_value = "manual")]
        confidence: ConfidenceLevel,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Add {
        #[arg(long)]
        name: String,
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        category_type: CategoryType,
        /// Hex color, #RRGGBB
        #[arg(long, default_value = "#6B7280")]
        color: String,
        #[arg(long)]
        icon: Option<String>,
    },
}

#[derive(Subcommand)]
enum BudgetAction {
    /// Set a monthly spending limit for an expense category
    Add {
        #[arg(long = "category")]
        category_id: String,
        #[arg(long)]
        limit: Decimal,
        /// YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Dashboard => AppCommand::Dashboard,
            Commands::Accounts { action: None } => AppCommand::Accounts,
            Commands::Accounts {
                action:
                    Some(AccountAction::Add {
                        name,
                        account_type,
                        currency,
                    }),
            } => AppCommand::AddAccount {
                name,
                account_type,
                currency,
            },
            Commands::Transactions { action: None } => AppCommand::Transactions,
            Commands::Transactions {
                action:
                    Some(TransactionAction::Add {
                        account_id,
                        amount,
                        description,
                        date,
                        kind,
                    }),
            } => AppCommand::AddTransaction {
                account_id,
                amount,
                description,
                date,
                kind,
            },
            Commands::Transactions {
                action:
                    Some(TransactionAction::Categorize {
                        transaction_id,
                        category_id,
                        confidence,
                    }),
            } => AppCommand::Categorize {
                transaction_id,
                category_id,
                confidence,
            },
            Commands::Categories { action: None } => AppCommand::Categories,
            Commands::Categories {
                action:
                    Some(CategoryAction::Add {
                        name,
                        category_type,
                        color,
                        icon,
                    }),
            } => AppCommand::AddCategory {
                name,
                category_type,
                color,
                icon,
            },
            Commands::Budgets { action: None } => AppCommand::Budgets,
            Commands::Budgets {
                action:
                    Some(BudgetAction::Add {
                        category_id,
                        limit,
                        month,
                    }),
            } => AppCommand::AddBudget {
                category_id,
                limit,
                month,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fintrack::cli::setup::setup_at_path(path),
            None => fintrack::cli::setup::setup(),
        },
        Some(cmd) => fintrack::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
