use super::ui;
use crate::core::FinanceStore;
use crate::core::models::{Category, CategoryType, NewCategory};
use crate::core::sequence::ListScreen;
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::{debug, info};

fn render_group(output: &mut String, title: &str, categories: &[&Category]) {
    output.push_str(&format!("{}\n", ui::style_text(title, ui::StyleType::TotalLabel)));
    if categories.is_empty() {
        output.push_str(&format!("{}\n", ui::style_text("None", ui::StyleType::Subtle)));
        return;
    }
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Color"),
        ui::header_cell("Icon"),
        ui::header_cell("Id"),
    ]);
    for category in categories {
        table.add_row(vec![
            ui::color_token_cell(&category.name, &category.color),
            ui::color_token_cell(&category.color, &category.color),
            Cell::new(category.icon.as_deref().unwrap_or("")),
            Cell::new(&category.id),
        ]);
    }
    output.push_str(&format!("{table}\n"));
}

fn render(screen: &ListScreen<Category>) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Categories", ui::StyleType::Title));
    if let Some(notice) = ui::slice_notice("categories", screen.items()) {
        output.push_str(&format!("{notice}\n"));
    }
    let Some(categories) = screen.items().value() else {
        return output;
    };

    let (expense, income): (Vec<&Category>, Vec<&Category>) = categories
        .iter()
        .partition(|c| c.category_type == CategoryType::Expense);
    render_group(&mut output, "Expense", &expense);
    output.push('\n');
    render_group(&mut output, "Income", &income);
    output
}

pub async fn run(store: &dyn FinanceStore) -> Result<String> {
    let mut screen = ListScreen::new("categories");
    screen.reload(store.list_categories()).await;
    Ok(render(&screen))
}

pub async fn add(store: &dyn FinanceStore, request: NewCategory) -> Result<String> {
    if !request.is_submittable() {
        debug!(?request, "Category form incomplete, not submitting");
        return run(store).await;
    }

    let created = store
        .create_category(&request)
        .await
        .context("Failed to create category")?;
    info!(id = %created.id, name = %created.name, "Created category");

    run(store).await
}
