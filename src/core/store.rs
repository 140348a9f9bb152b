//! Remote finance store abstraction

use crate::core::models::{
    Account, Budget, Categorization, Category, NewAccount, NewBudget, NewCategory,
    NewTransaction, Transaction,
};
use anyhow::Result;
use async_trait::async_trait;

/// Request/response access to the store that owns every entity.
///
/// List calls return the full, unpaginated collection.
#[async_trait]
pub trait FinanceStore: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>>;
    async fn get_account(&self, id: &str) -> Result<Account>;
    async fn create_account(&self, request: &NewAccount) -> Result<Account>;

    async fn list_transactions(&self) -> Result<Vec<Transaction>>;
    async fn create_transaction(&self, request: &NewTransaction) -> Result<Transaction>;
    async fn categorize_transaction(
        &self,
        id: &str,
        request: &Categorization,
    ) -> Result<Transaction>;

    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, request: &NewCategory) -> Result<Category>;

    async fn list_budgets(&self) -> Result<Vec<Budget>>;
    async fn create_budget(&self, request: &NewBudget) -> Result<Budget>;
}
