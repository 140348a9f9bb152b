pub mod cli;
pub mod core;
pub mod providers;

use crate::core::FinanceStore;
use crate::core::config::AppConfig;
use crate::core::models::{AccountType, CategoryType, ConfidenceLevel, TransactionKind};
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// A screen to show, or a write to issue followed by a reload of its screen.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Dashboard,
    Accounts,
    AddAccount {
        name: String,
        account_type: AccountType,
        currency: Option<String>,
    },
    Transactions,
    AddTransaction {
        account_id: String,
        amount: Decimal,
        description: String,
        date: Option<String>,
        kind: TransactionKind,
    },
    Categorize {
        transaction_id: String,
        category_id: String,
        confidence: ConfidenceLevel,
    },
    Categories,
    AddCategory {
        name: String,
        category_type: CategoryType,
        color: String,
        icon: Option<String>,
    },
    Budgets,
    AddBudget {
        category_id: String,
        limit: Decimal,
        month: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fintrack starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = Arc::new(providers::HttpStore::new(&config.store)?);
    let output = execute(command, store, &config).await?;
    println!("{output}");
    Ok(())
}

/// Runs a command against any store and returns the rendered screen.
pub async fn execute(
    command: AppCommand,
    store: Arc<dyn FinanceStore>,
    config: &AppConfig,
) -> Result<String> {
    match command {
        AppCommand::Dashboard => cli::dashboard::run(store, &config.currency).await,
        AppCommand::Accounts => cli::accounts::run(store.as_ref(), &config.currency).await,
        AppCommand::AddAccount {
            name,
            account_type,
            currency,
        } => {
            let request = crate::core::models::NewAccount {
                name,
                account_type,
                currency: currency.unwrap_or_else(|| config.currency.clone()),
            };
            cli::accounts::add(store.as_ref(), request, &config.currency).await
        }
        AppCommand::Transactions => cli::transactions::run(store.as_ref()).await,
        AppCommand::AddTransaction {
            account_id,
            amount,
            description,
            date,
            kind,
        } => {
            let form = cli::transactions::TransactionForm {
                account_id,
                amount,
                description,
                date,
                kind,
            };
            cli::transactions::add(store.as_ref(), form, &config.currency).await
        }
        AppCommand::Categorize {
            transaction_id,
            category_id,
            confidence,
        } => {
            let request = crate::core::models::Categorization {
                category_id,
                confidence_level: confidence,
            };
            cli::transactions::categorize(store.as_ref(), &transaction_id, request).await
        }
        AppCommand::Categories => cli::categories::run(store.as_ref()).await,
        AppCommand::AddCategory {
            name,
            category_type,
            color,
            icon,
        } => {
            let request = crate::core::models::NewCategory {
                name,
                category_type,
                color,
                icon,
            };
            cli::categories::add(store.as_ref(), request).await
        }
        AppCommand::Budgets => cli::budgets::run(store.as_ref()).await,
        AppCommand::AddBudget {
            category_id,
            limit,
            month,
        } => {
            let month = match month {
                Some(month) => month.parse()?,
                None => crate::core::budget::PeriodMonth::current(),
            };
            let request = crate::core::models::NewBudget {
                category_id,
                limit_amount: limit,
                currency: config.currency.clone(),
                period_month: month.to_string(),
            };
            cli::budgets::add(store.as_ref(), request).await
        }
    }
}
