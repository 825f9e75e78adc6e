use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

/// Column headers for the six displayed fields, in grid order.
pub const DISPLAY_COLUMNS: [&str; 6] = [
    "Date",
    "Revenue",
    "Net Income",
    "Gross Profit",
    "EPS",
    "Operating Income",
];

/// One income-statement object as returned by the API.
///
/// The endpoint returns many more fields than we use; serde skips the rest.
/// Numeric fields are sometimes null or absent for smaller tickers, so every
/// one of them is optional rather than defaulting to zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub gross_profit: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
}

/// One reporting period after loading: id assigned from sequence position,
/// date parsed once for chronological comparison. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRecord {
    pub id: usize,
    /// Date string as reported, kept verbatim for display and export.
    pub date: String,
    /// Parsed form of `date`; None when the string is not a calendar date.
    pub fiscal_date: Option<NaiveDate>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_profit: Option<f64>,
    pub eps: Option<f64>,
    pub operating_income: Option<f64>,
}

impl StatementRecord {
    pub fn from_wire(id: usize, raw: IncomeStatement) -> Self {
        let fiscal_date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").ok();
        if fiscal_date.is_none() {
            warn!(target: "load", "record {}: unparseable date '{}'", id, raw.date);
        }

        Self {
            id,
            date: raw.date,
            fiscal_date,
            revenue: raw.revenue,
            net_income: raw.net_income,
            gross_profit: raw.gross_profit,
            eps: raw.eps,
            operating_income: raw.operating_income,
        }
    }

    /// Cell values in `DISPLAY_COLUMNS` order.
    pub fn display_values(&self) -> [String; 6] {
        [
            self.date.clone(),
            format_amount(self.revenue),
            format_amount(self.net_income),
            format_amount(self.gross_profit),
            format_amount(self.eps),
            format_amount(self.operating_income),
        ]
    }
}

/// Convert a fetched payload into records, assigning ids by sequence position.
pub fn load_records(raw: Vec<IncomeStatement>) -> Vec<StatementRecord> {
    raw.into_iter()
        .enumerate()
        .map(|(id, statement)| StatementRecord::from_wire(id, statement))
        .collect()
}

/// Render an optional amount for a grid cell or CSV field.
///
/// Missing values render as empty, never as zero. Whole amounts drop the
/// trailing ".0" the float formatter would add.
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 9e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
    }
}
