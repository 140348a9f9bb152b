//! Aggregations over entity collections: total balance and period totals.
//!
//! All sums are taken in a single reporting currency. No exchange rates are
//! applied, so collections mixing currencies produce a nominal total.
use crate::core::budget::PeriodMonth;
use crate::core::models::{Account, Transaction, TransactionKind};
use rust_decimal::Decimal;
use tracing::debug;

/// Number of transactions surfaced on the overview.
pub const RECENT_TRANSACTIONS: usize = 5;

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl PeriodTotals {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

/// Sums the balance of every account, closed ones included. Saturates at the
/// bounds of `Decimal`.
pub fn total_balance(accounts: &[Account]) -> Decimal {
    let total = accounts
        .iter()
        .fold(Decimal::ZERO, |total, a| total.saturating_add(a.balance));
    debug!(accounts = accounts.len(), %total, "Computed total balance");
    total
}

/// Partitions transactions by kind and sums their amounts at face value.
///
/// Transfers count towards neither side. Any windowing must already be
/// reflected in the supplied collection. Sums saturate instead of overflowing.
pub fn period_totals(transactions: &[Transaction]) -> PeriodTotals {
    transactions
        .iter()
        .fold(PeriodTotals::default(), |mut totals, tx| {
            match tx.kind {
                TransactionKind::Income => {
                    totals.income = totals.income.saturating_add(tx.amount)
                }
                TransactionKind::Expense => {
                    totals.expense = totals.expense.saturating_add(tx.amount)
                }
                TransactionKind::Transfer => {}
            }
            totals
        })
}

/// Transactions dated within the given month. Unparseable dates are skipped.
pub fn transactions_in_month<'a>(
    transactions: &'a [Transaction],
    month: &PeriodMonth,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.parsed_date().is_some_and(|date| month.contains(date)))
        .collect()
}

/// Sorts by date, newest first. ISO dates of the same format order
/// correctly as plain strings.
pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The first few transactions in the order the store returned them.
pub fn recent_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .take(RECENT_TRANSACTIONS)
        .cloned()
        .collect()
}
