//! Budgets screen.
//!
//! Only expense categories are loaded here since budgets never track income.
use super::ui;
use crate::core::FinanceStore;
use crate::core::budget;
use crate::core::lookup;
use crate::core::models::{Budget, Category, CategoryType, NewBudget};
use crate::core::sequence::ListScreen;
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::{debug, info};

struct BudgetsScreen {
    budgets: ListScreen<Budget>,
    categories: ListScreen<Category>,
}

impl BudgetsScreen {
    fn new() -> Self {
        Self {
            budgets: ListScreen::new("budgets"),
            categories: ListScreen::new("categories"),
        }
    }

    async fn load_all(&mut self, store: &dyn FinanceStore) {
        let expense_categories = async {
            store.list_categories().await.map(|categories| {
                categories
                    .into_iter()
                    .filter(|c| c.category_type == CategoryType::Expense)
                    .collect::<Vec<_>>()
            })
        };
        let Self {
            budgets,
            categories,
        } = self;
        futures::join!(
            budgets.reload(store.list_budgets()),
            categories.reload(expense_categories),
        );
    }

    fn render(&self) -> String {
        let mut output = format!("{}\n\n", ui::style_text("Budgets", ui::StyleType::Title));
        for notice in [
            ui::slice_notice("budgets", self.budgets.items()),
            ui::slice_notice("categories", self.categories.items()),
        ]
        .into_iter()
        .flatten()
        {
            output.push_str(&format!("{notice}\n"));
        }

        let Some(budgets) = self.budgets.items().value() else {
            return output;
        };
        if budgets.is_empty() {
            output.push_str(&ui::style_text("No budgets", ui::StyleType::Subtle));
            return output;
        }

        let categories = self
            .categories
            .items()
            .value()
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell("Month"),
            ui::header_cell("Spent"),
            ui::header_cell("Limit"),
            ui::header_cell("Remaining"),
            ui::header_cell("Used"),
            ui::header_cell("Status"),
        ]);
        for b in budgets {
            let usage = budget::evaluate(b);
            let category_id = Some(b.category_id.as_str());
            table.add_row(vec![
                ui::color_token_cell(
                    lookup::category_name(categories, category_id),
                    lookup::category_color(categories, category_id),
                ),
                Cell::new(&b.period_month),
                ui::money_cell(b.spent, &b.currency),
                ui::money_cell(b.limit_amount, &b.currency),
                ui::money_cell(usage.remaining, &b.currency),
                ui::percentage_cell(usage.percent),
                ui::status_cell(&usage.status, budget::status_label(&usage.status)),
            ]);
        }
        output.push_str(&table.to_string());
        output
    }
}

pub async fn run(store: &dyn FinanceStore) -> Result<String> {
    let mut screen = BudgetsScreen::new();
    screen.load_all(store).await;
    Ok(screen.render())
}

pub async fn add(store: &dyn FinanceStore, request: NewBudget) -> Result<String> {
    if !request.is_submittable() {
        debug!(?request, "Budget form incomplete, not submitting");
        return run(store).await;
    }

    let created = store
        .create_budget(&request)
        .await
        .context("Failed to create budget")?;
    info!(id = %created.id, month = %created.period_month, "Created budget");

    run(store).await
}
