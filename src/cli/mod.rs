pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod setup;
pub mod transactions;
pub mod ui;
