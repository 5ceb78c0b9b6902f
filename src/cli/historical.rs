use super::ui;
use crate::service::{HistoricalPage, HistoricalRequest, RateService};
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeSet;

pub async fn run(service: &RateService, request: &HistoricalRequest, json: bool) -> Result<()> {
    let pb = ui::new_spinner(&format!(
        "Fetching {} rates from {}",
        request.base, request.start_date
    ));
    let result = service.get_historical(request).await;
    pb.finish_and_clear();
    let page = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", render(&page));
    }
    Ok(())
}

/// One row per date, one column per currency seen on this page.
pub fn render(page: &HistoricalPage) -> String {
    let currencies: BTreeSet<&str> = page
        .rates
        .items
        .iter()
        .flat_map(|(_, rates)| rates.keys().map(String::as_str))
        .collect();

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Date")];
    header.extend(currencies.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    for (date, rates) in &page.rates.items {
        let mut row = vec![Cell::new(date)];
        row.extend(currencies.iter().map(|c| match rates.get(*c) {
            Some(rate) => ui::rate_cell(*rate),
            None => ui::missing_cell(),
        }));
        table.add_row(row);
    }

    let title = ui::style_text(
        &format!(
            "{} rates {}..{}",
            page.base, page.start_date, page.end_date
        ),
        ui::StyleType::Title,
    );
    let footer = ui::style_text(
        &format!(
            "Page {} of {} ({} dates)",
            page.rates.current_page, page.rates.total_pages, page.rates.total_count
        ),
        ui::StyleType::Subtle,
    );

    if page.rates.items.is_empty() {
        return format!("{title}\nNo rates on this page\n{footer}");
    }
    format!("{title}\n{table}\n{footer}")
}
