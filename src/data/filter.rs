use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::data::record::StatementRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The parsed constraint set: up to six optional bounds combined with AND.
///
/// A bound is active iff it is `Some`. `Some(0.0)` is an active bound; an
/// empty input never reaches this type. There is no OR mode and no bound on
/// gross profit, EPS, or operating income.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub revenue_min: Option<f64>,
    pub revenue_max: Option<f64>,
    pub net_income_min: Option<f64>,
    pub net_income_max: Option<f64>,
}

impl FilterSet {
    /// True when no bound is active; such a set is identity on any record set.
    pub fn is_empty(&self) -> bool {
        self.date_start.is_none()
            && self.date_end.is_none()
            && self.revenue_min.is_none()
            && self.revenue_max.is_none()
            && self.net_income_min.is_none()
            && self.net_income_max.is_none()
    }

    /// True when every active bound holds for `record`.
    ///
    /// A record whose field is missing (or whose date failed to parse) fails
    /// any active bound on that field, and is unaffected by inert bounds.
    pub fn matches(&self, record: &StatementRecord) -> bool {
        date_in_range(record.fiscal_date, self.date_start, self.date_end)
            && value_in_range(record.revenue, self.revenue_min, self.revenue_max)
            && value_in_range(record.net_income, self.net_income_min, self.net_income_max)
    }
}

fn value_in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(v) = value else {
        return false;
    };
    if let Some(lo) = min {
        if v < lo {
            return false;
        }
    }
    if let Some(hi) = max {
        if v > hi {
            return false;
        }
    }
    true
}

fn date_in_range(
    date: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(d) = date else {
        return false;
    };
    if let Some(s) = start {
        if d < s {
            return false;
        }
    }
    if let Some(e) = end {
        if d > e {
            return false;
        }
    }
    true
}

/// Raw text of the six filter inputs, exactly as typed.
///
/// Kept separate from `FilterSet` so that "unset" and "set to zero" stay
/// distinguishable: blank text parses to an inert bound, "0" to an active one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInput {
    pub date_start: String,
    pub date_end: String,
    pub revenue_min: String,
    pub revenue_max: String,
    pub net_income_min: String,
    pub net_income_max: String,
}

impl FilterInput {
    pub const FIELD_KEYS: [&'static str; 6] = [
        "date-start",
        "date-end",
        "revenue-min",
        "revenue-max",
        "net-income-min",
        "net-income-max",
    ];

    /// Set a field by its CLI key, e.g. `--filter revenue-min=50`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "date-start" => &mut self.date_start,
            "date-end" => &mut self.date_end,
            "revenue-min" => &mut self.revenue_min,
            "revenue-max" => &mut self.revenue_max,
            "net-income-min" => &mut self.net_income_min,
            "net-income-max" => &mut self.net_income_max,
            other => {
                return Err(anyhow!(
                    "unknown filter field '{}' (expected one of: {})",
                    other,
                    Self::FIELD_KEYS.join(", ")
                ))
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Parse into a `FilterSet`, reporting the first offending field instead
    /// of coercing bad input.
    pub fn parse(&self) -> Result<FilterSet> {
        Ok(FilterSet {
            date_start: parse_date_bound("date-start", &self.date_start)?,
            date_end: parse_date_bound("date-end", &self.date_end)?,
            revenue_min: parse_numeric_bound("revenue-min", &self.revenue_min)?,
            revenue_max: parse_numeric_bound("revenue-max", &self.revenue_max)?,
            net_income_min: parse_numeric_bound("net-income-min", &self.net_income_min)?,
            net_income_max: parse_numeric_bound("net-income-max", &self.net_income_max)?,
        })
    }
}

fn parse_numeric_bound(field: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| anyhow!("{}: '{}' is not a number", field, trimmed))
}

fn parse_date_bound(field: &str, raw: &str) -> Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| anyhow!("{}: '{}' is not a YYYY-MM-DD date", field, trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{load_records, IncomeStatement};

    fn sample_records() -> Vec<StatementRecord> {
        load_records(vec![
            IncomeStatement {
                date: "2020-01-01".to_string(),
                revenue: Some(100.0),
                net_income: Some(10.0),
                gross_profit: Some(40.0),
                eps: Some(1.0),
                operating_income: Some(20.0),
            },
            IncomeStatement {
                date: "2021-01-01".to_string(),
                revenue: Some(200.0),
                net_income: Some(-5.0),
                gross_profit: Some(80.0),
                eps: Some(-0.5),
                operating_income: Some(-2.0),
            },
        ])
    }

    fn matching_ids(records: &[StatementRecord], filters: &FilterSet) -> Vec<usize> {
        records
            .iter()
            .filter(|r| filters.matches(r))
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_empty_set_is_identity() {
        let records = sample_records();
        let filters = FilterSet::default();
        assert!(filters.is_empty());
        assert_eq!(matching_ids(&records, &filters), vec![0, 1]);
    }

    #[test]
    fn test_net_income_min_zero_excludes_negative() {
        let records = sample_records();
        let filters = FilterSet {
            net_income_min: Some(0.0),
            ..Default::default()
        };
        assert!(!filters.is_empty());
        assert_eq!(matching_ids(&records, &filters), vec![0]);
    }

    #[test]
    fn test_date_start_bound() {
        let records = sample_records();
        let filters = FilterSet {
            date_start: NaiveDate::from_ymd_opt(2021, 1, 1),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &filters), vec![1]);
    }

    #[test]
    fn test_date_bound_is_inclusive_both_ends() {
        let records = sample_records();
        let filters = FilterSet {
            date_start: NaiveDate::from_ymd_opt(2020, 1, 1),
            date_end: NaiveDate::from_ymd_opt(2021, 1, 1),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &filters), vec![0, 1]);
    }

    #[test]
    fn test_revenue_window() {
        let records = sample_records();
        let filters = FilterSet {
            revenue_min: Some(50.0),
            revenue_max: Some(150.0),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &filters), vec![0]);
    }

    #[test]
    fn test_zero_revenue_included_by_zero_min() {
        let records = load_records(vec![
            IncomeStatement {
                date: "2019-12-31".to_string(),
                revenue: Some(0.0),
                net_income: None,
                gross_profit: None,
                eps: None,
                operating_income: None,
            },
            IncomeStatement {
                date: "2020-12-31".to_string(),
                revenue: Some(-25.0),
                net_income: None,
                gross_profit: None,
                eps: None,
                operating_income: None,
            },
        ]);
        let filters = FilterSet {
            revenue_min: Some(0.0),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &filters), vec![0]);
    }

    #[test]
    fn test_missing_field_fails_active_bound_only() {
        let records = load_records(vec![IncomeStatement {
            date: "2020-01-01".to_string(),
            revenue: None,
            net_income: Some(5.0),
            gross_profit: None,
            eps: None,
            operating_income: None,
        }]);

        let revenue_bound = FilterSet {
            revenue_min: Some(0.0),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &revenue_bound), Vec::<usize>::new());

        let income_bound = FilterSet {
            net_income_min: Some(0.0),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &income_bound), vec![0]);
    }

    #[test]
    fn test_unparseable_date_fails_active_date_bound() {
        let records = load_records(vec![IncomeStatement {
            date: "FY-2020".to_string(),
            revenue: Some(1.0),
            net_income: None,
            gross_profit: None,
            eps: None,
            operating_income: None,
        }]);

        let unbounded = FilterSet::default();
        assert_eq!(matching_ids(&records, &unbounded), vec![0]);

        let bounded = FilterSet {
            date_start: NaiveDate::from_ymd_opt(2000, 1, 1),
            ..Default::default()
        };
        assert_eq!(matching_ids(&records, &bounded), Vec::<usize>::new());
    }

    #[test]
    fn test_parse_blank_is_inert_zero_is_active() {
        let input = FilterInput::default();
        let filters = input.parse().unwrap();
        assert!(filters.is_empty());

        let input = FilterInput {
            revenue_min: "0".to_string(),
            ..Default::default()
        };
        let filters = input.parse().unwrap();
        assert_eq!(filters.revenue_min, Some(0.0));
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_parse_reports_offending_field() {
        let input = FilterInput {
            revenue_max: "lots".to_string(),
            ..Default::default()
        };
        let err = input.parse().unwrap_err().to_string();
        assert!(err.contains("revenue-max"), "unexpected error: {}", err);

        let input = FilterInput {
            date_start: "01/02/2020".to_string(),
            ..Default::default()
        };
        let err = input.parse().unwrap_err().to_string();
        assert!(err.contains("date-start"), "unexpected error: {}", err);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let input = FilterInput {
            revenue_min: "  50 ".to_string(),
            date_end: " 2021-01-01 ".to_string(),
            ..Default::default()
        };
        let filters = input.parse().unwrap();
        assert_eq!(filters.revenue_min, Some(50.0));
        assert_eq!(filters.date_end, NaiveDate::from_ymd_opt(2021, 1, 1));
    }

    #[test]
    fn test_set_by_key() {
        let mut input = FilterInput::default();
        input.set("revenue-min", "50").unwrap();
        input.set("net-income-max", "10").unwrap();
        assert_eq!(input.revenue_min, "50");
        assert_eq!(input.net_income_max, "10");
        assert!(input.set("eps-min", "1").is_err());
    }
}
