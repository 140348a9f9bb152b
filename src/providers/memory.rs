//! In-process [`FinanceStore`] implementing the store side of the contract.
//!
//! Budgets report `spent` as the sum of categorized expenses within their
//! month and derive their status from the documented thresholds, so the
//! client-side evaluation can be exercised end to end without a server.
use crate::core::budget::{self, PeriodMonth};
use crate::core::lookup::{self, Lookup};
use crate::core::models::{
    Account, Budget, BudgetStatus, Categorization, Category, CategoryType, NewAccount,
    NewBudget, NewCategory, NewTransaction, Transaction, TransactionKind,
};
use crate::core::store::FinanceStore;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct State {
    next_id: u64,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn budget_with_running_totals(&self, budget: &Budget) -> Budget {
        let spent = budget
            .period_month
            .parse::<PeriodMonth>()
            .map(|month| budget::contract_spent(&budget.category_id, &month, &self.transactions))
            .unwrap_or(Decimal::ZERO);
        Budget {
            spent,
            status: budget::contract_status(spent, budget.limit_amount),
            ..budget.clone()
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account with an opening balance.
    pub async fn insert_account(&self, account: Account) {
        self.state.lock().await.accounts.push(account);
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.state.lock().await.accounts.clone())
    }

    async fn get_account(&self, id: &str) -> Result<Account> {
        let state = self.state.lock().await;
        match lookup::find(&state.accounts, id) {
            Lookup::Found(account) => Ok(account.clone()),
            Lookup::NotFound => Err(anyhow!("Account not found: {}", id)),
        }
    }

    async fn create_account(&self, request: &NewAccount) -> Result<Account> {
        if request.name.trim().is_empty() {
            bail!("Account name must not be blank");
        }
        let mut state = self.state.lock().await;
        let account = Account {
            id: state.next_id("acc"),
            name: request.name.clone(),
            account_type: request.account_type,
            currency: request.currency.clone(),
            balance: Decimal::ZERO,
            closed: false,
            created_at: timestamp(),
        };
        debug!(id = %account.id, "Created account");
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.state.lock().await.transactions.clone())
    }

    async fn create_transaction(&self, request: &NewTransaction) -> Result<Transaction> {
        if request.amount <= Decimal::ZERO {
            bail!("Transaction amount must be positive");
        }
        if request.description.trim().is_empty() {
            bail!("Transaction description must not be blank");
        }
        NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid transaction date: {}", request.date))?;

        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == request.account_id)
            .ok_or_else(|| anyhow!("Account not found: {}", request.account_id))?;
        if account.closed {
            bail!("Cannot operate on a closed account");
        }
        if account.currency != request.currency {
            bail!(
                "Expected currency {} but got {}",
                account.currency,
                request.currency
            );
        }
        // Expenses may take a balance below zero; credit cards live there.
        let balance = match request.kind {
            TransactionKind::Income => account.balance.checked_add(request.amount),
            TransactionKind::Expense => account.balance.checked_sub(request.amount),
            TransactionKind::Transfer => Some(account.balance),
        };
        account.balance =
            balance.ok_or_else(|| anyhow!("Balance of account {} overflowed", account.id))?;

        let transaction = Transaction {
            id: state.next_id("tx"),
            account_id: request.account_id.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            description: request.description.clone(),
            date: request.date.clone(),
            kind: request.kind,
            category_id: None,
            confidence_level: None,
            created_at: timestamp(),
        };
        debug!(id = %transaction.id, "Created transaction");
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn categorize_transaction(
        &self,
        id: &str,
        request: &Categorization,
    ) -> Result<Transaction> {
        let mut state = self.state.lock().await;
        if matches!(
            lookup::find(&state.categories, &request.category_id),
            Lookup::NotFound
        ) {
            bail!("Category not found: {}", request.category_id);
        }
        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow!("Transaction not found: {}", id))?;
        transaction.category_id = Some(request.category_id.clone());
        transaction.confidence_level = Some(request.confidence_level);
        Ok(transaction.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.state.lock().await.categories.clone())
    }

    async fn create_category(&self, request: &NewCategory) -> Result<Category> {
        if request.name.trim().is_empty() {
            bail!("Category name must not be blank");
        }
        if !is_hex_color(&request.color) {
            bail!(
                "Color must be a valid hex code (#RRGGBB), got: {}",
                request.color
            );
        }
        let mut state = self.state.lock().await;
        let category = Category {
            id: state.next_id("cat"),
            name: request.name.clone(),
            category_type: request.category_type,
            color: request.color.clone(),
            icon: request.icon.clone().filter(|icon| !icon.is_empty()),
            created_at: timestamp(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let state = self.state.lock().await;
        Ok(state
            .budgets
            .iter()
            .map(|b| state.budget_with_running_totals(b))
            .collect())
    }

    async fn create_budget(&self, request: &NewBudget) -> Result<Budget> {
        if request.limit_amount <= Decimal::ZERO {
            bail!("Budget limit must be positive");
        }
        let month: PeriodMonth = request.period_month.parse()?;

        let mut state = self.state.lock().await;
        match lookup::find(&state.categories, &request.category_id) {
            Lookup::NotFound => bail!("Category not found: {}", request.category_id),
            Lookup::Found(category) if category.category_type != CategoryType::Expense => {
                bail!("Budgets can only track expense categories")
            }
            Lookup::Found(_) => {}
        }
        if state
            .budgets
            .iter()
            .any(|b| b.category_id == request.category_id && b.period_month == month.to_string())
        {
            bail!(
                "A budget already exists for category {} and period {}",
                request.category_id,
                month
            );
        }

        let created = Budget {
            id: state.next_id("budget"),
            category_id: request.category_id.clone(),
            limit_amount: request.limit_amount,
            spent: Decimal::ZERO,
            currency: request.currency.clone(),
            period_month: month.to_string(),
            status: BudgetStatus::OnTrack,
            created_at: timestamp(),
        };
        state.budgets.push(created.clone());
        Ok(state.budget_with_running_totals(&created))
    }
}
