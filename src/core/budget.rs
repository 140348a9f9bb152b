//! Budget usage and status.
//!
//! The store reports both a running `spent` total and a discrete status for
//! each budget. The status is taken as given and never recomputed from the
//! usage ratio for display; [`contract_status`] only documents the thresholds
//! a store is expected to apply.
use crate::core::analytics;
use crate::core::models::{Budget, BudgetStatus, Transaction, TransactionKind};
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Usage at or above this fraction of the limit puts a budget in WARNING.
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// Calendar month a budget applies to, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodMonth {
    year: i32,
    month: u32,
}

impl PeriodMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Invalid month: {}", month));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for PeriodMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid period month: {}", s))?;
        let year = year
            .parse()
            .with_context(|| format!("Invalid year in period month: {s}"))?;
        let month = month
            .parse()
            .with_context(|| format!("Invalid month in period month: {s}"))?;
        Self::new(year, month)
    }
}

impl Display for PeriodMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Fraction of the limit consumed, clamped to `[0, 1]`.
///
/// A zero limit reads as unconsumed. Overshoot is communicated by the status,
/// not by the ratio.
pub fn usage_ratio(budget: &Budget) -> Decimal {
    if budget.limit_amount.is_zero() {
        return Decimal::ZERO;
    }
    // Only a huge spend against a tiny limit overflows; that is full usage.
    budget
        .spent
        .checked_div(budget.limit_amount)
        .unwrap_or(Decimal::ONE)
        .clamp(Decimal::ZERO, Decimal::ONE)
}

/// Usage ratio as a percentage in `[0, 100]`.
pub fn usage_percent(budget: &Budget) -> Decimal {
    usage_ratio(budget) * Decimal::ONE_HUNDRED
}

/// Amount left before the limit is reached. Negative once exceeded.
pub fn remaining(budget: &Budget) -> Decimal {
    budget.limit_amount.saturating_sub(budget.spent)
}

pub fn status_label(status: &BudgetStatus) -> &str {
    match status {
        BudgetStatus::OnTrack => "On track",
        BudgetStatus::Warning => "Warning",
        BudgetStatus::Exceeded => "Exceeded",
        BudgetStatus::Unrecognized(raw) => raw,
    }
}

/// Status a store is expected to report for the given totals: EXCEEDED at or
/// above the limit, WARNING from [`WARNING_THRESHOLD`], ON_TRACK otherwise.
pub fn contract_status(spent: Decimal, limit: Decimal) -> BudgetStatus {
    if limit.is_zero() {
        return BudgetStatus::OnTrack;
    }
    let Some(usage) = spent.checked_div(limit) else {
        return BudgetStatus::Exceeded;
    };
    if usage >= Decimal::ONE {
        BudgetStatus::Exceeded
    } else if usage >= WARNING_THRESHOLD {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    }
}

/// Running total a store is expected to report as `spent`: expenses
/// categorized to the budget's category and dated within its month.
pub fn contract_spent(
    category_id: &str,
    month: &PeriodMonth,
    transactions: &[Transaction],
) -> Decimal {
    analytics::transactions_in_month(transactions, month)
        .into_iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
        .filter(|tx| tx.category_id.as_deref() == Some(category_id))
        .fold(Decimal::ZERO, |total, tx| total.saturating_add(tx.amount))
}

/// Display-ready evaluation of a single budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub ratio: Decimal,
    pub percent: Decimal,
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

/// Evaluates a budget for display, keeping the store's status as is.
///
/// A store status that disagrees with the documented thresholds is logged
/// but still shown.
pub fn evaluate(budget: &Budget) -> BudgetUsage {
    let expected = contract_status(budget.spent, budget.limit_amount);
    if !matches!(budget.status, BudgetStatus::Unrecognized(_)) && budget.status != expected {
        warn!(
            budget = %budget.id,
            reported = ?budget.status,
            ?expected,
            "Store status disagrees with threshold contract"
        );
    }

    BudgetUsage {
        ratio: usage_ratio(budget),
        percent: usage_percent(budget),
        remaining: remaining(budget),
        status: budget.status.clone(),
    }
}
