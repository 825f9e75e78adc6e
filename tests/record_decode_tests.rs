use chrono::NaiveDate;
use serde_json::json;

use fingrid::data::record::{load_records, IncomeStatement};

/// The endpoint returns far more fields than the grid shows, and smaller
/// tickers legitimately omit some numerics. Decoding must tolerate both.
#[test]
fn test_decode_full_payload() {
    let payload = json!([
        {
            "date": "2023-09-30",
            "symbol": "AAPL",
            "reportedCurrency": "USD",
            "cik": "0000320193",
            "fillingDate": "2023-11-03",
            "calendarYear": "2023",
            "period": "FY",
            "revenue": 383285000000.0,
            "costOfRevenue": 214137000000.0,
            "grossProfit": 169148000000.0,
            "grossProfitRatio": 0.4413112958,
            "operatingIncome": 114301000000.0,
            "netIncome": 96995000000.0,
            "eps": 6.16,
            "epsdiluted": 6.13
        },
        {
            "date": "2022-09-24",
            "symbol": "AAPL",
            "revenue": 394328000000.0,
            "netIncome": null,
            "grossProfit": 170782000000.0
        }
    ]);

    let statements: Vec<IncomeStatement> = serde_json::from_value(payload).unwrap();
    assert_eq!(statements.len(), 2);

    let records = load_records(statements);

    assert_eq!(records[0].id, 0);
    assert_eq!(records[0].fiscal_date, NaiveDate::from_ymd_opt(2023, 9, 30));
    assert_eq!(records[0].revenue, Some(383_285_000_000.0));
    assert_eq!(records[0].eps, Some(6.16));

    // Null and absent numerics both load as missing, not as zero.
    assert_eq!(records[1].id, 1);
    assert_eq!(records[1].net_income, None);
    assert_eq!(records[1].eps, None);
    assert_eq!(records[1].operating_income, None);
    assert_eq!(records[1].revenue, Some(394_328_000_000.0));
}

#[test]
fn test_decode_empty_payload() {
    let statements: Vec<IncomeStatement> = serde_json::from_value(json!([])).unwrap();
    assert!(load_records(statements).is_empty());
}

#[test]
fn test_missing_values_render_as_empty_cells() {
    let statements: Vec<IncomeStatement> =
        serde_json::from_value(json!([{ "date": "2021-12-31", "revenue": null }])).unwrap();
    let records = load_records(statements);

    let values = records[0].display_values();
    assert_eq!(values[0], "2021-12-31");
    for cell in &values[1..] {
        assert_eq!(cell, "");
    }
}
