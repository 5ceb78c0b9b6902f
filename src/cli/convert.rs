use super::ui;
use crate::core::rates::ExchangeRateSnapshot;
use crate::service::{ConversionRequest, RateService};
use anyhow::Result;

pub async fn run(service: &RateService, request: &ConversionRequest, json: bool) -> Result<()> {
    let pb = ui::new_spinner(&format!("Converting {} to {}", request.from, request.to));
    let result = service.convert(request).await;
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
    let converted = snapshot
        .rates
        .iter()
        .map(|(currency, value)| format!("{} {currency}", value.normalize()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} = {}  {}",
        ui::style_text(
            &format!("{} {}", snapshot.amount.normalize(), snapshot.base),
            ui::StyleType::Label
        ),
        ui::style_text(&converted, ui::StyleType::Title),
        ui::style_text(&format!("(as of {})", snapshot.as_of), ui::StyleType::Subtle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::validate_code;
    use crate::core::rates::RateMap;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_conversion() {
        let snapshot = ExchangeRateSnapshot {
            amount: dec!(100.0),
            base: validate_code("EUR").unwrap(),
            as_of: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            rates: RateMap::from([("USD".to_string(), dec!(108.920))]),
        };

        let output = console::strip_ansi_codes(&render(&snapshot)).to_string();

        assert_eq!(output, "100 EUR = 108.92 USD  (as of 2024-03-15)");
    }
}
