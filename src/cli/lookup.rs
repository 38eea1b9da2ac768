use super::ui;
use crate::core::RateResult;
use crate::source::RateSource;
use anyhow::Result;
use comfy_table::Cell;

impl RateResult {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Date"),
            ui::header_cell("Value"),
        ]);
        table.add_row(vec![
            Cell::new(&self.currency),
            Cell::new(&self.date),
            ui::value_cell(self.value),
        ]);

        format!(
            "{}\n\n{}",
            ui::style_text("Reference rate", ui::StyleType::Title),
            table
        )
    }
}

/// Resolves a single rate and prints it, either as a table or as the same
/// JSON body the HTTP route returns.
pub async fn run(source: &RateSource, date: &str, currency: &str, json: bool) -> Result<()> {
    let spinner = ui::new_spinner("Loading reference rates...");
    let result = source.lookup(date, currency).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) if json => println!("{}", serde_json::to_string(&result)?),
        Ok(result) => println!("{}", result.display_as_table()),
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            if !e.is_validation() {
                eprintln!(
                    "{}",
                    ui::style_text("Check the configured source url", ui::StyleType::Subtle)
                );
            }
            return Err(e.into());
        }
    }
    Ok(())
}
