//! Read-model for the overview screen.
//!
//! The three source collections arrive independently and in any order. Each
//! arrival is a [`SummaryUpdate`] that [`DashboardSummary::apply`] folds into a
//! new snapshot, touching only the slices derived from that collection.
use crate::core::analytics::{self, PeriodTotals};
use crate::core::models::{Account, Budget, Transaction};
use rust_decimal::Decimal;
use tracing::debug;

/// Load state of one part of the summary.
#[derive(Debug, Clone, PartialEq)]
pub enum Slice<T> {
    Pending,
    Loaded(T),
    /// The last load failed. `stale` holds the previous value, if any.
    Failed { error: String, stale: Option<T> },
}

impl<T> Slice<T> {
    /// The value to display: fresh when loaded, stale after a failure.
    pub fn value(&self) -> Option<&T> {
        match self {
            Slice::Pending => None,
            Slice::Loaded(value) => Some(value),
            Slice::Failed { stale, .. } => stale.as_ref(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slice::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Slice::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub(crate) fn fail(self, error: String) -> Self {
        let stale = match self {
            Slice::Pending => None,
            Slice::Loaded(value) => Some(value),
            Slice::Failed { stale, .. } => stale,
        };
        Slice::Failed { error, stale }
    }
}

/// Completion of one source request.
#[derive(Debug, Clone)]
pub enum SummaryUpdate {
    Accounts(Result<Vec<Account>, String>),
    Transactions(Result<Vec<Transaction>, String>),
    Budgets(Result<Vec<Budget>, String>),
}

impl SummaryUpdate {
    pub fn accounts(result: anyhow::Result<Vec<Account>>) -> Self {
        SummaryUpdate::Accounts(result.map_err(|e| format!("{e:#}")))
    }

    pub fn transactions(result: anyhow::Result<Vec<Transaction>>) -> Self {
        SummaryUpdate::Transactions(result.map_err(|e| format!("{e:#}")))
    }

    pub fn budgets(result: anyhow::Result<Vec<Budget>>) -> Self {
        SummaryUpdate::Budgets(result.map_err(|e| format!("{e:#}")))
    }

    pub fn source(&self) -> &'static str {
        match self {
            SummaryUpdate::Accounts(_) => "accounts",
            SummaryUpdate::Transactions(_) => "transactions",
            SummaryUpdate::Budgets(_) => "budgets",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub accounts: Slice<Vec<Account>>,
    pub total_balance: Slice<Decimal>,
    pub totals: Slice<PeriodTotals>,
    pub recent_transactions: Slice<Vec<Transaction>>,
    pub budgets: Slice<Vec<Budget>>,
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self {
            accounts: Slice::Pending,
            total_balance: Slice::Pending,
            totals: Slice::Pending,
            recent_transactions: Slice::Pending,
            budgets: Slice::Pending,
        }
    }
}

impl DashboardSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one completed request into a new snapshot.
    pub fn apply(self, update: SummaryUpdate) -> Self {
        debug!(source = update.source(), "Applying summary update");
        match update {
            SummaryUpdate::Accounts(Ok(accounts)) => Self {
                total_balance: Slice::Loaded(analytics::total_balance(&accounts)),
                accounts: Slice::Loaded(accounts),
                ..self
            },
            SummaryUpdate::Accounts(Err(error)) => Self {
                total_balance: self.total_balance.fail(error.clone()),
                accounts: self.accounts.fail(error),
                ..self
            },
            SummaryUpdate::Transactions(Ok(transactions)) => Self {
                totals: Slice::Loaded(analytics::period_totals(&transactions)),
                recent_transactions: Slice::Loaded(analytics::recent_transactions(&transactions)),
                ..self
            },
            SummaryUpdate::Transactions(Err(error)) => Self {
                totals: self.totals.fail(error.clone()),
                recent_transactions: self.recent_transactions.fail(error),
                ..self
            },
            SummaryUpdate::Budgets(Ok(budgets)) => Self {
                budgets: Slice::Loaded(budgets),
                ..self
            },
            SummaryUpdate::Budgets(Err(error)) => Self {
                budgets: self.budgets.fail(error),
                ..self
            },
        }
    }

    /// True once every source has reported, successfully or not.
    pub fn is_settled(&self) -> bool {
        !(self.accounts.is_pending()
            || self.recent_transactions.is_pending()
            || self.budgets.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::fixtures::{account, budget, transaction};
    use crate::core::models::{BudgetStatus, TransactionKind};

    fn updates() -> Vec<SummaryUpdate> {
        vec![
            SummaryUpdate::Accounts(Ok(vec![
                account("a", Decimal::from(1000), false),
                account("b", Decimal::from(-250), true),
            ])),
            SummaryUpdate::Transactions(Ok(vec![
                transaction("1", TransactionKind::Income, Decimal::from(2000), "2024-05-01"),
                transaction("2", TransactionKind::Expense, Decimal::from(300), "2024-05-02"),
                transaction("3", TransactionKind::Expense, Decimal::from(450), "2024-05-03"),
            ])),
            SummaryUpdate::Budgets(Ok(vec![budget(
                "b1",
                Decimal::from(200),
                Decimal::from(260),
                BudgetStatus::Exceeded,
            )])),
        ]
    }

    #[test]
    fn test_partial_summary_renders_loaded_slices_only() {
        let mut all = updates();
        let summary = DashboardSummary::new().apply(all.remove(1));

        assert!(summary.accounts.is_pending());
        assert!(summary.total_balance.is_pending());
        assert!(summary.budgets.is_pending());
        assert_eq!(
            summary.totals.value(),
            Some(&PeriodTotals {
                income: Decimal::from(2000),
                expense: Decimal::from(750),
            })
        );
        assert!(!summary.is_settled());
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let forward = updates()
            .into_iter()
            .fold(DashboardSummary::new(), DashboardSummary::apply);
        let backward = updates()
            .into_iter()
            .rev()
            .fold(DashboardSummary::new(), DashboardSummary::apply);

        assert_eq!(forward, backward);
        assert!(forward.is_settled());
        assert_eq!(forward.total_balance.value(), Some(&Decimal::from(750)));
        assert_eq!(forward.budgets.value().map(Vec::len), Some(1));
        assert_eq!(
            forward.budgets.value().unwrap()[0].status,
            BudgetStatus::Exceeded
        );
    }

    #[test]
    fn test_failure_keeps_stale_value_and_other_slices() {
        let summary = updates()
            .into_iter()
            .fold(DashboardSummary::new(), DashboardSummary::apply)
            .apply(SummaryUpdate::accounts(Err(anyhow::anyhow!("connection refused"))));

        assert_eq!(summary.accounts.error(), Some("connection refused"));
        assert_eq!(summary.total_balance.value(), Some(&Decimal::from(750)));
        assert!(summary.totals.error().is_none());
        assert!(summary.is_settled());
    }

    #[test]
    fn test_failure_before_any_load_is_distinct_from_empty() {
        let failed = DashboardSummary::new()
            .apply(SummaryUpdate::budgets(Err(anyhow::anyhow!("timeout"))));
        assert!(failed.budgets.value().is_none());
        assert_eq!(failed.budgets.error(), Some("timeout"));

        let empty = DashboardSummary::new().apply(SummaryUpdate::Budgets(Ok(vec![])));
        assert_eq!(empty.budgets, Slice::Loaded(vec![]));
    }

    #[test]
    fn test_recent_transactions_capped_at_five() {
        let transactions: Vec<_> = (0..8)
            .map(|i| transaction(&i.to_string(), TransactionKind::Expense, Decimal::ONE, "2024-01-01"))
            .collect();
        let summary = DashboardSummary::new().apply(SummaryUpdate::Transactions(Ok(transactions)));
        assert_eq!(summary.recent_transactions.value().map(Vec::len), Some(5));
        assert_eq!(
            summary.totals.value().map(|t| t.expense),
            Some(Decimal::from(8))
        );
    }
}
