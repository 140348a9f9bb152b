//! Entity snapshots and create-requests exchanged with the finance store.
//!
//! Every entity is an immutable snapshot owned by the remote store. The client
//! never mutates them; it only issues the create-requests defined at the
//! bottom of this module.

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Cash,
}

impl AccountType {
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::CreditCard => "Credit card",
            AccountType::Cash => "Cash",
        }
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "CHECKING" => Ok(AccountType::Checking),
            "SAVINGS" => Ok(AccountType::Savings),
            "CREDIT_CARD" => Ok(AccountType::CreditCard),
            "CASH" => Ok(AccountType::Cash),
            _ => Err(anyhow!("Invalid account type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Direction of a transaction. Amounts are always positive magnitudes; the
/// kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            "TRANSFER" => Ok(TransactionKind::Transfer),
            _ => Err(anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionKind::Income => "Income",
                TransactionKind::Expense => "Expense",
                TransactionKind::Transfer => "Transfer",
            }
        )
    }
}

/// How a category assignment was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    Manual,
}

impl FromStr for ConfidenceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HIGH" => Ok(ConfidenceLevel::High),
            "MEDIUM" => Ok(ConfidenceLevel::Medium),
            "LOW" => Ok(ConfidenceLevel::Low),
            "MANUAL" => Ok(ConfidenceLevel::Manual),
            _ => Err(anyhow!("Invalid confidence level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    /// ISO 8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default)]
    pub created_at: String,
}

impl Transaction {
    /// The category assignment, only when both halves of the pair are present.
    pub fn categorization(&self) -> Option<(&str, ConfidenceLevel)> {
        match (&self.category_id, self.confidence_level) {
            (Some(category_id), Some(level)) => Some((category_id.as_str(), level)),
            _ => None,
        }
    }

    /// A category id is present if and only if a confidence level is.
    pub fn has_consistent_categorization(&self) -> bool {
        self.category_id.is_some() == self.confidence_level.is_some()
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl FromStr for CategoryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(CategoryType::Income),
            "EXPENSE" => Ok(CategoryType::Expense),
            _ => Err(anyhow!("Invalid category type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Health of a budget as reported by the store.
///
/// Values the client does not know are kept verbatim so they can be shown
/// as-is instead of failing the whole budget list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Exceeded,
    Unrecognized(String),
}

impl From<String> for BudgetStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ON_TRACK" => BudgetStatus::OnTrack,
            "WARNING" => BudgetStatus::Warning,
            "EXCEEDED" => BudgetStatus::Exceeded,
            _ => BudgetStatus::Unrecognized(value),
        }
    }
}

impl From<BudgetStatus> for String {
    fn from(status: BudgetStatus) -> Self {
        match status {
            BudgetStatus::OnTrack => "ON_TRACK".to_string(),
            BudgetStatus::Warning => "WARNING".to_string(),
            BudgetStatus::Exceeded => "EXCEEDED".to_string(),
            BudgetStatus::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spent: Decimal,
    pub currency: String,
    /// Year-month token, `YYYY-MM`.
    pub period_month: String,
    pub status: BudgetStatus,
    #[serde(default)]
    pub created_at: String,
}

// Create-requests. Each one knows whether it may be dispatched at all; a
// request that fails its precondition is dropped without contacting the store.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
}

impl NewAccount {
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn is_submittable(&self) -> bool {
        !self.account_id.is_empty() && !self.amount.is_zero() && !self.description.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    pub category_id: String,
    pub confidence_level: ConfidenceLevel,
}

impl Categorization {
    pub fn is_submittable(&self) -> bool {
        !self.category_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,
}

impl NewCategory {
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit_amount: Decimal,
    pub currency: String,
    pub period_month: String,
}

impl NewBudget {
    pub fn is_submittable(&self) -> bool {
        !self.category_id.is_empty() && !self.limit_amount.is_zero()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserialization() {
        let json = r#"{
            "id": "tx-1",
            "accountId": "acc-1",
            "amount": 42.5,
            "currency": "EUR",
            "description": "Groceries",
            "date": "2024-05-03",
            "type": "EXPENSE",
            "categoryId": "cat-1",
            "confidenceLevel": "HIGH",
            "createdAt": "2024-05-03T10:00:00"
        }"#;

        let tx: Transaction = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, Decimal::new(425, 1));
        assert_eq!(tx.categorization(), Some(("cat-1", ConfidenceLevel::High)));
        assert!(tx.has_consistent_categorization());
        assert_eq!(tx.parsed_date(), NaiveDate::from_ymd_opt(2024, 5, 3));
    }

    #[test]
    fn test_uncategorized_transaction_with_nulls() {
        let json = r#"{
            "id": "tx-2",
            "accountId": "acc-1",
            "amount": 10,
            "currency": "EUR",
            "description": "Coffee",
            "date": "2024-05-04",
            "type": "EXPENSE",
            "categoryId": null,
            "confidenceLevel": null,
            "createdAt": "2024-05-04T08:00:00"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert!(tx.categorization().is_none());
        assert!(tx.has_consistent_categorization());
    }

    #[test]
    fn test_half_categorized_transaction_is_inconsistent() {
        let mut tx = fixtures::transaction("tx", TransactionKind::Expense, Decimal::ONE, "2024-01-01");
        tx.category_id = Some("cat-1".to_string());
        assert!(!tx.has_consistent_categorization());
        assert!(tx.categorization().is_none());
    }

    #[test]
    fn test_budget_status_passthrough() {
        let json = r#"{
            "id": "b-1",
            "categoryId": "cat-1",
            "limitAmount": 200,
            "spent": 260,
            "currency": "EUR",
            "periodMonth": "2024-05",
            "status": "FROZEN",
            "createdAt": "2024-05-01T00:00:00"
        }"#;

        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.status, BudgetStatus::Unrecognized("FROZEN".to_string()));

        let value = serde_json::to_value(&budget).unwrap();
        assert_eq!(value["status"], "FROZEN");

        let known: BudgetStatus = serde_json::from_str(r#""EXCEEDED""#).unwrap();
        assert_eq!(known, BudgetStatus::Exceeded);
    }

    #[test]
    fn test_account_type_wire_names() {
        let value = serde_json::to_value(AccountType::CreditCard).unwrap();
        assert_eq!(value, "CREDIT_CARD");
        assert_eq!("credit-card".parse::<AccountType>().unwrap(), AccountType::CreditCard);
        assert!("loan".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_new_transaction_body_uses_numbers() {
        let request = NewTransaction {
            account_id: "acc-1".to_string(),
            amount: Decimal::new(1250, 2),
            currency: "EUR".to_string(),
            description: "Lunch".to_string(),
            date: "2024-05-03".to_string(),
            kind: TransactionKind::Expense,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["accountId"], "acc-1");
        assert_eq!(value["amount"], 12.5);
        assert_eq!(value["type"], "EXPENSE");
    }

    #[test]
    fn test_create_request_preconditions() {
        let account = NewAccount {
            name: "   ".to_string(),
            account_type: AccountType::Cash,
            currency: "EUR".to_string(),
        };
        assert!(!account.is_submittable());

        let mut tx = NewTransaction {
            account_id: "acc-1".to_string(),
            amount: Decimal::ZERO,
            currency: "EUR".to_string(),
            description: "Rent".to_string(),
            date: "2024-05-01".to_string(),
            kind: TransactionKind::Expense,
        };
        assert!(!tx.is_submittable());
        tx.amount = Decimal::from(900);
        assert!(tx.is_submittable());
        tx.description = String::new();
        assert!(!tx.is_submittable());

        let budget = NewBudget {
            category_id: String::new(),
            limit_amount: Decimal::from(100),
            currency: "EUR".to_string(),
            period_month: "2024-05".to_string(),
        };
        assert!(!budget.is_submittable());

        let category = NewCategory {
            name: "Food".to_string(),
            category_type: CategoryType::Expense,
            color: "#10B981".to_string(),
            icon: None,
        };
        assert!(category.is_submittable());
        let body = serde_json::to_value(&category).unwrap();
        assert!(body.get("icon").is_none());
    }
}
