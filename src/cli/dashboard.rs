//! Overview screen.
//!
//! Accounts, transactions and budgets are requested concurrently. Each
//! completion is sent over a channel to a single reducer loop that owns the
//! summary snapshot, so arrival order never affects what is shown.
use super::ui;
use crate::core::analytics::PeriodTotals;
use crate::core::models::{Account, Budget, Transaction};
use crate::core::{DashboardSummary, FinanceStore, SummaryUpdate, budget, lookup};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

fn spawn_source(
    tx: &mpsc::Sender<SummaryUpdate>,
    fetch: impl Future<Output = SummaryUpdate> + Send + 'static,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let update = fetch.await;
        if tx.send(update).await.is_err() {
            debug!("Dashboard closed before update arrived");
        }
    });
}

/// Fetches the three sources and folds them into a summary, reporting every
/// intermediate snapshot to `on_update`.
pub async fn load_summary(
    store: Arc<dyn FinanceStore>,
    mut on_update: impl FnMut(&DashboardSummary),
) -> DashboardSummary {
    let (tx, mut rx) = mpsc::channel(3);

    spawn_source(&tx, {
        let store = Arc::clone(&store);
        async move { SummaryUpdate::accounts(store.list_accounts().await) }
    });
    spawn_source(&tx, {
        let store = Arc::clone(&store);
        async move { SummaryUpdate::transactions(store.list_transactions().await) }
    });
    spawn_source(&tx, {
        let store = Arc::clone(&store);
        async move { SummaryUpdate::budgets(store.list_budgets().await) }
    });
    drop(tx);

    let mut summary = DashboardSummary::new();
    while let Some(update) = rx.recv().await {
        summary = summary.apply(update);
        on_update(&summary);
    }
    summary
}

pub async fn run(store: Arc<dyn FinanceStore>, currency: &str) -> Result<String> {
    let pb = ui::new_progress_bar(3);
    pb.set_message("Fetching overview...");
    let summary = load_summary(store, |_| pb.inc(1)).await;
    pb.finish_and_clear();
    Ok(render(&summary, currency))
}

fn render_totals(
    output: &mut String,
    total_balance: Option<&Decimal>,
    totals: Option<&PeriodTotals>,
    currency: &str,
) {
    if let Some(total) = total_balance {
        output.push_str(&format!(
            "Total balance: {}\n",
            ui::style_text(&ui::format_money(*total, currency), ui::StyleType::TotalValue)
        ));
    }
    if let Some(totals) = totals {
        output.push_str(&format!(
            "Income: {}  Expenses: {}  Net: {}\n",
            ui::format_money(totals.income, currency),
            ui::format_money(totals.expense, currency),
            ui::format_money(totals.net(), currency),
        ));
    }
}

fn recent_table(transactions: &[Transaction], accounts: &[Account]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Account"),
        ui::header_cell("Amount"),
    ]);
    for tx in transactions {
        table.add_row(vec![
            Cell::new(&tx.date),
            Cell::new(&tx.description),
            Cell::new(lookup::account_name(accounts, &tx.account_id)),
            ui::transaction_amount_cell(tx.amount, &tx.currency, tx.kind),
        ]);
    }
    table.to_string()
}

fn budgets_table(budgets: &[Budget]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Spent"),
        ui::header_cell("Limit"),
        ui::header_cell("Usage"),
        ui::header_cell("Status"),
    ]);
    for b in budgets {
        let usage = budget::evaluate(b);
        table.add_row(vec![
            Cell::new(&b.period_month),
            ui::money_cell(b.spent, &b.currency),
            ui::money_cell(b.limit_amount, &b.currency),
            ui::percentage_cell(usage.percent),
            ui::status_cell(&usage.status, budget::status_label(&usage.status)),
        ]);
    }
    table.to_string()
}

/// Renders whatever the summary holds; pending or failed slices are shown as
/// notices without hiding the others.
pub fn render(summary: &DashboardSummary, currency: &str) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Overview", ui::StyleType::Title));

    for notice in [
        ui::slice_notice("accounts", &summary.accounts),
        ui::slice_notice("transactions", &summary.recent_transactions),
    ]
    .into_iter()
    .flatten()
    {
        output.push_str(&format!("{notice}\n"));
    }
    render_totals(
        &mut output,
        summary.total_balance.value(),
        summary.totals.value(),
        currency,
    );

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("Recent transactions", ui::StyleType::TotalLabel)
    ));
    if let Some(recent) = summary.recent_transactions.value() {
        if recent.is_empty() {
            output.push_str(&ui::style_text("No transactions yet", ui::StyleType::Subtle));
        } else {
            let accounts = summary.accounts.value().map(Vec::as_slice).unwrap_or(&[]);
            output.push_str(&recent_table(recent, accounts));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("Budgets", ui::StyleType::TotalLabel)
    ));
    if let Some(notice) = ui::slice_notice("budgets", &summary.budgets) {
        output.push_str(&format!("{notice}\n"));
    }
    if let Some(budgets) = summary.budgets.value() {
        if budgets.is_empty() {
            output.push_str(&ui::style_text("No budgets yet", ui::StyleType::Subtle));
        } else {
            output.push_str(&budgets_table(budgets));
        }
        output.push('\n');
    }

    output
}
