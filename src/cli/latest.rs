use super::ui;
use crate::core::rates::ExchangeRateSnapshot;
use crate::service::RateService;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(service: &RateService, base: &str, json: bool) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching latest rates for {base}"));
    let result = service.get_latest(base).await;
    pb.finish_and_clear();
    let snapshot = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render(&snapshot));
    }
    Ok(())
}

pub fn render(snapshot: &ExchangeRateSnapshot) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {})", snapshot.base)),
    ]);
    for (currency, rate) in &snapshot.rates {
        table.add_row(vec![Cell::new(currency), ui::rate_cell(*rate)]);
    }

    format!(
        "{} {}\n{}",
        ui::style_text(&format!("Rates for {}", snapshot.base), ui::StyleType::Title),
        ui::style_text(&format!("as of {}", snapshot.as_of), ui::StyleType::Subtle),
        table
    )
}
