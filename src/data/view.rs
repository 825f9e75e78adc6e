use std::sync::Arc;

use crate::data::filter::FilterSet;
use crate::data::record::StatementRecord;

/// A view over the loaded record set that filters and paginates without
/// modifying the underlying data.
///
/// The source is immutable after load; filtering produces a fresh list of
/// visible row indices, recomputed wholesale from the full source on every
/// apply. Original relative order is always preserved.
#[derive(Debug, Clone)]
pub struct StatementView {
    source: Arc<Vec<StatementRecord>>,
    visible_rows: Vec<usize>,
    filtered: bool,
    page_size: usize,
    page: usize,
}

impl StatementView {
    /// Create a view showing all records.
    pub fn new(source: Arc<Vec<StatementRecord>>, page_size: usize) -> Self {
        let row_count = source.len();
        Self {
            source,
            visible_rows: (0..row_count).collect(),
            filtered: false,
            page_size: page_size.max(1),
            page: 0,
        }
    }

    /// Recompute visibility from the full source, resetting to the first
    /// page. Passing an empty set restores the unfiltered view, so applying
    /// the same set any number of times yields the same result.
    pub fn apply_filters(&self, filters: &FilterSet) -> Self {
        let visible_rows = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, record)| filters.matches(record))
            .map(|(idx, _)| idx)
            .collect();

        Self {
            source: Arc::clone(&self.source),
            visible_rows,
            filtered: !filters.is_empty(),
            page_size: self.page_size,
            page: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn source_count(&self) -> usize {
        self.source.len()
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Get a visible record by its position in the view.
    pub fn get_record(&self, index: usize) -> Option<&StatementRecord> {
        let row_idx = *self.visible_rows.get(index)?;
        self.source.get(row_idx)
    }

    /// All visible records in view order.
    pub fn records(&self) -> impl Iterator<Item = &StatementRecord> {
        self.visible_rows.iter().filter_map(|&idx| self.source.get(idx))
    }

    pub fn contains_id(&self, id: usize) -> bool {
        self.records().any(|record| record.id == id)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page index, always within `0..page_count()`.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages; an empty view still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.row_count().div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count() - 1;
    }

    /// Records on the current page, in view order.
    pub fn page_records(&self) -> Vec<&StatementRecord> {
        let start = self.page * self.page_size;
        self.visible_rows
            .iter()
            .skip(start)
            .take(self.page_size)
            .filter_map(|&idx| self.source.get(idx))
            .collect()
    }

    /// Number of rows on the current page.
    pub fn page_row_count(&self) -> usize {
        let start = self.page * self.page_size;
        self.row_count().saturating_sub(start).min(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterInput;
    use crate::data::record::{load_records, IncomeStatement};

    fn statement(date: &str, revenue: f64) -> IncomeStatement {
        IncomeStatement {
            date: date.to_string(),
            revenue: Some(revenue),
            net_income: Some(revenue / 10.0),
            gross_profit: None,
            eps: None,
            operating_income: None,
        }
    }

    fn view_of(count: usize, page_size: usize) -> StatementView {
        let raw = (0..count)
            .map(|i| statement(&format!("20{:02}-01-01", i), (i as f64) * 100.0))
            .collect();
        StatementView::new(Arc::new(load_records(raw)), page_size)
    }

    fn visible_ids(view: &StatementView) -> Vec<usize> {
        view.records().map(|r| r.id).collect()
    }

    #[test]
    fn test_new_view_shows_all_rows() {
        let view = view_of(7, 5);
        assert_eq!(view.row_count(), 7);
        assert_eq!(view.source_count(), 7);
        assert!(!view.is_filtered());
        assert_eq!(visible_ids(&view), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_filtering_preserves_order() {
        let view = view_of(7, 5);
        let filters = FilterInput {
            revenue_min: "150".to_string(),
            ..Default::default()
        }
        .parse()
        .unwrap();

        let filtered = view.apply_filters(&filters);
        assert_eq!(visible_ids(&filtered), vec![2, 3, 4, 5, 6]);
        assert!(filtered.is_filtered());
        // Source untouched.
        assert_eq!(filtered.source_count(), 7);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let view = view_of(7, 5);
        let filters = FilterInput {
            revenue_max: "300".to_string(),
            ..Default::default()
        }
        .parse()
        .unwrap();

        let once = view.apply_filters(&filters);
        let twice = once.apply_filters(&filters);
        assert_eq!(visible_ids(&once), visible_ids(&twice));
    }

    #[test]
    fn test_refilter_recomputes_from_full_source() {
        let view = view_of(7, 5);
        let narrow = FilterInput {
            revenue_min: "500".to_string(),
            ..Default::default()
        }
        .parse()
        .unwrap();
        let narrowed = view.apply_filters(&narrow);
        assert_eq!(visible_ids(&narrowed), vec![5, 6]);

        // Widening again must bring back rows the narrow filter dropped.
        let wide = FilterInput::default().parse().unwrap();
        let widened = narrowed.apply_filters(&wide);
        assert_eq!(widened.row_count(), 7);
        assert!(!widened.is_filtered());
    }

    #[test]
    fn test_empty_source_is_empty_under_any_filters() {
        let view = view_of(0, 5);
        let filters = FilterInput {
            revenue_min: "0".to_string(),
            date_start: "2000-01-01".to_string(),
            ..Default::default()
        }
        .parse()
        .unwrap();
        let filtered = view.apply_filters(&filters);
        assert_eq!(filtered.row_count(), 0);
        assert_eq!(filtered.page_count(), 1);
    }

    #[test]
    fn test_pagination() {
        let mut view = view_of(12, 5);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page(), 0);
        assert_eq!(view.page_records().len(), 5);

        view.next_page();
        view.next_page();
        assert_eq!(view.page(), 2);
        assert_eq!(view.page_records().len(), 2);
        assert_eq!(view.page_row_count(), 2);

        // Clamped at the last page.
        view.next_page();
        assert_eq!(view.page(), 2);

        view.prev_page();
        assert_eq!(view.page(), 1);
        view.first_page();
        assert_eq!(view.page(), 0);
        view.prev_page();
        assert_eq!(view.page(), 0);
        view.last_page();
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_apply_resets_page() {
        let mut view = view_of(12, 5);
        view.last_page();
        let filtered = view.apply_filters(&FilterSet::default());
        assert_eq!(filtered.page(), 0);
    }

    #[test]
    fn test_contains_id_tracks_visibility() {
        let view = view_of(4, 5);
        let filters = FilterInput {
            revenue_min: "250".to_string(),
            ..Default::default()
        }
        .parse()
        .unwrap();
        let filtered = view.apply_filters(&filters);
        assert!(filtered.contains_id(3));
        assert!(!filtered.contains_id(0));
    }
}
