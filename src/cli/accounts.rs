use super::ui;
use crate::core::FinanceStore;
use crate::core::analytics;
use crate::core::models::{Account, NewAccount};
use crate::core::sequence::ListScreen;
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::{debug, info};

fn render(screen: &ListScreen<Account>, currency: &str) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Accounts", ui::StyleType::Title));
    if let Some(notice) = ui::slice_notice("accounts", screen.items()) {
        output.push_str(&format!("{notice}\n"));
    }
    let Some(accounts) = screen.items().value() else {
        return output;
    };
    if accounts.is_empty() {
        output.push_str(&ui::style_text("No accounts", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Type"),
        ui::header_cell("Balance"),
        ui::header_cell("Status"),
        ui::header_cell("Id"),
    ]);
    for account in accounts {
        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(account.account_type.label()),
            ui::money_cell(account.balance, &account.currency),
            Cell::new(if account.closed { "Closed" } else { "Open" }),
            Cell::new(&account.id),
        ]);
    }
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\nTotal balance: {}",
        ui::style_text(
            &ui::format_money(analytics::total_balance(accounts), currency),
            ui::StyleType::TotalValue
        )
    ));
    output
}

pub async fn run(store: &dyn FinanceStore, currency: &str) -> Result<String> {
    let mut screen = ListScreen::new("accounts");
    screen.reload(store.list_accounts()).await;
    Ok(render(&screen, currency))
}

pub async fn add(store: &dyn FinanceStore, request: NewAccount, currency: &str) -> Result<String> {
    if !request.is_submittable() {
        debug!(?request, "Account form incomplete, not submitting");
        return run(store, currency).await;
    }

    let created = store
        .create_account(&request)
        .await
        .context("Failed to create account")?;
    info!(id = %created.id, name = %created.name, "Created account");

    run(store, currency).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::AccountType;
    use crate::core::models::fixtures;
    use crate::providers::MemoryStore;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_lists_accounts_with_total() {
        let store = MemoryStore::new();
        store.insert_account(fixtures::account("acc-1", Decimal::from(1200), false)).await;
        store.insert_account(fixtures::account("acc-2", Decimal::from(-200), true)).await;

        let output = run(&store, "EUR").await.unwrap();

        assert!(output.contains("acc-1"));
        assert!(output.contains("Closed"));
        assert!(output.contains("1000.00 EUR"));
    }

    #[tokio::test]
    async fn test_add_creates_and_reloads() {
        let store = MemoryStore::new();
        let request = NewAccount {
            name: "Savings pot".to_string(),
            account_type: AccountType::Savings,
            currency: "EUR".to_string(),
        };

        let output = add(&store, request, "EUR").await.unwrap();

        assert!(output.contains("Savings pot"));
        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_blank_name_is_not_submitted() {
        let store = MemoryStore::new();
        let request = NewAccount {
            name: "  ".to_string(),
            account_type: AccountType::Cash,
            currency: "EUR".to_string(),
        };

        let output = add(&store, request, "EUR").await.unwrap();

        assert!(output.contains("No accounts"));
        assert!(store.list_accounts().await.unwrap().is_empty());
    }
}
