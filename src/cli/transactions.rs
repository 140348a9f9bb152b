use super::ui;
use crate::core::analytics;
use crate::core::lookup;
use crate::core::models::{
    Account, Categorization, Category, NewTransaction, Transaction, TransactionKind,
};
use crate::core::sequence::ListScreen;
use crate::core::FinanceStore;
use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Cell;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// User input for a new transaction, before the account's currency is known.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    pub account_id: String,
    pub amount: Decimal,
    pub description: String,
    pub date: Option<String>,
    pub kind: TransactionKind,
}

pub struct TransactionsScreen {
    transactions: ListScreen<Transaction>,
    accounts: ListScreen<Account>,
    categories: ListScreen<Category>,
}

impl Default for TransactionsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsScreen {
    pub fn new() -> Self {
        Self {
            transactions: ListScreen::new("transactions"),
            accounts: ListScreen::new("accounts"),
            categories: ListScreen::new("categories"),
        }
    }

    /// Reloads every collection the screen displays.
    pub async fn load_all(&mut self, store: &dyn FinanceStore) {
        let Self {
            transactions,
            accounts,
            categories,
        } = self;
        futures::join!(
            transactions.reload(store.list_transactions()),
            accounts.reload(store.list_accounts()),
            categories.reload(store.list_categories()),
        );
    }

    fn accounts(&self) -> &[Account] {
        self.accounts.items().value().map(Vec::as_slice).unwrap_or_default()
    }

    fn categories(&self) -> &[Category] {
        self.categories.items().value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Transactions newest first.
    pub fn sorted_transactions(&self) -> Vec<Transaction> {
        let mut transactions = self.transactions.items().value().cloned().unwrap_or_default();
        analytics::sort_by_date_desc(&mut transactions);
        transactions
    }

    pub fn render(&self) -> String {
        let mut output = format!("{}\n\n", ui::style_text("Transactions", ui::StyleType::Title));
        for notice in [
            ui::slice_notice("transactions", self.transactions.items()),
            ui::slice_notice("accounts", self.accounts.items()),
            ui::slice_notice("categories", self.categories.items()),
        ]
        .into_iter()
        .flatten()
        {
            output.push_str(&format!("{notice}\n"));
        }

        let transactions = self.sorted_transactions();
        if transactions.is_empty() {
            output.push_str(&ui::style_text("No transactions", ui::StyleType::Subtle));
            return output;
        }

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Description"),
            ui::header_cell("Account"),
            ui::header_cell("Category"),
            ui::header_cell("Type"),
            ui::header_cell("Amount"),
            ui::header_cell("Id"),
        ]);
        let (accounts, categories) = (self.accounts(), self.categories());
        for tx in &transactions {
            let category_id = tx.category_id.as_deref();
            table.add_row(vec![
                Cell::new(&tx.date),
                Cell::new(&tx.description),
                Cell::new(lookup::account_name(accounts, &tx.account_id)),
                ui::color_token_cell(
                    lookup::category_name(categories, category_id),
                    lookup::category_color(categories, category_id),
                ),
                Cell::new(tx.kind),
                ui::transaction_amount_cell(tx.amount, &tx.currency, tx.kind),
                Cell::new(&tx.id),
            ]);
        }
        output.push_str(&table.to_string());
        output
    }
}

pub async fn run(store: &dyn FinanceStore) -> Result<String> {
    let mut screen = TransactionsScreen::new();
    screen.load_all(store).await;
    Ok(screen.render())
}

/// Creates a transaction and reloads the list. The currency follows the
/// selected account, or `default_currency` when the account is unknown.
pub async fn add(
    store: &dyn FinanceStore,
    form: TransactionForm,
    default_currency: &str,
) -> Result<String> {
    let mut screen = TransactionsScreen::new();
    screen.load_all(store).await;

    let request = NewTransaction {
        currency: lookup::account_currency(screen.accounts(), &form.account_id, default_currency)
            .to_string(),
        account_id: form.account_id,
        amount: form.amount,
        description: form.description,
        date: form
            .date
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string()),
        kind: form.kind,
    };
    if !request.is_submittable() {
        debug!(?request, "Transaction form incomplete, not submitting");
        return Ok(screen.render());
    }

    let created = store
        .create_transaction(&request)
        .await
        .context("Failed to create transaction")?;
    info!(id = %created.id, "Created transaction");

    screen.load_all(store).await;
    Ok(screen.render())
}

pub async fn categorize(
    store: &dyn FinanceStore,
    transaction_id: &str,
    request: Categorization,
) -> Result<String> {
    let mut screen = TransactionsScreen::new();
    if !request.is_submittable() {
        debug!(?request, "Categorization incomplete, not submitting");
        screen.load_all(store).await;
        return Ok(screen.render());
    }

    store
        .categorize_transaction(transaction_id, &request)
        .await
        .with_context(|| format!("Failed to categorize transaction {transaction_id}"))?;
    info!(id = %transaction_id, "Categorized transaction");

    screen.load_all(store).await;
    Ok(screen.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AccountType, CategoryType, ConfidenceLevel, NewAccount, NewCategory};
    use crate::providers::MemoryStore;

    async fn store_with_account(currency: &str) -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let account = store
            .create_account(&NewAccount {
                name: "Travel card".to_string(),
                account_type: AccountType::CreditCard,
                currency: currency.to_string(),
            })
            .await
            .unwrap();
        (store, account.id)
    }

    fn form(account_id: &str, amount: i64, description: &str, date: &str) -> TransactionForm {
        TransactionForm {
            account_id: account_id.to_string(),
            amount: Decimal::from(amount),
            description: description.to_string(),
            date: Some(date.to_string()),
            kind: TransactionKind::Expense,
        }
    }

    #[tokio::test]
    async fn test_add_uses_account_currency_and_reloads() {
        let (store, account_id) = store_with_account("USD").await;

        let output = add(&store, form(&account_id, 25, "Taxi", "2024-05-03"), "EUR")
            .await
            .unwrap();

        let transactions = store.list_transactions().await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].currency, "USD");
        assert!(output.contains("Taxi"));
        assert!(output.contains("Travel card"));
        assert!(output.contains(lookup::UNCATEGORIZED_LABEL));
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_submitted() {
        let (store, account_id) = store_with_account("EUR").await;

        add(&store, form(&account_id, 0, "Nothing", "2024-05-03"), "EUR")
            .await
            .unwrap();
        add(&store, form(&account_id, 5, "   ", "2024-05-03"), "EUR")
            .await
            .unwrap();
        add(&store, form("", 5, "No account", "2024-05-03"), "EUR")
            .await
            .unwrap();

        assert!(store.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_rejection_is_an_error() {
        let (store, _) = store_with_account("EUR").await;
        let result = add(&store, form("acc-missing", 5, "Ghost", "2024-05-03"), "EUR").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let (store, account_id) = store_with_account("EUR").await;
        for (date, description) in [
            ("2024-01-05", "January"),
            ("2024-03-01", "March"),
            ("2024-02-15", "February"),
        ] {
            store
                .create_transaction(&NewTransaction {
                    account_id: account_id.clone(),
                    amount: Decimal::ONE,
                    currency: "EUR".to_string(),
                    description: description.to_string(),
                    date: date.to_string(),
                    kind: TransactionKind::Expense,
                })
                .await
                .unwrap();
        }

        let mut screen = TransactionsScreen::new();
        screen.load_all(&store).await;
        let dates: Vec<_> = screen
            .sorted_transactions()
            .into_iter()
            .map(|t| t.date)
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-15", "2024-01-05"]);

        let output = screen.render();
        let march = output.find("March").unwrap();
        let january = output.find("January").unwrap();
        assert!(march < january);
    }

    #[tokio::test]
    async fn test_categorize_shows_category_name() {
        let (store, account_id) = store_with_account("EUR").await;
        let tx = store
            .create_transaction(&NewTransaction {
                account_id,
                amount: Decimal::from(40),
                currency: "EUR".to_string(),
                description: "Supermarket".to_string(),
                date: "2024-05-04".to_string(),
                kind: TransactionKind::Expense,
            })
            .await
            .unwrap();
        let category = store
            .create_category(&NewCategory {
                name: "Groceries".to_string(),
                category_type: CategoryType::Expense,
                color: "#3B82F6".to_string(),
                icon: None,
            })
            .await
            .unwrap();

        let output = categorize(
            &store,
            &tx.id,
            Categorization {
                category_id: category.id,
                confidence_level: ConfidenceLevel::Manual,
            },
        )
        .await
        .unwrap();

        assert!(output.contains("Groceries"));
        let stored = store.list_transactions().await.unwrap();
        assert!(stored[0].has_consistent_categorization());
    }
}
