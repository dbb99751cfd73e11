//! History records and trend aggregation
//!
//! Records arrive from the persistence gateway newest first. Everything in
//! this module works on that ordering and never fails: empty or
//! single-record histories produce zero values or the `--` placeholder.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::health_metrics::{format_bmi, MetricsResult, ProfileInput, StatusTone};
use crate::types::FormPrefill;
use crate::units::FeetInchesHeight;

/// Records averaged by [`recent_trends`] unless configured otherwise
pub const DEFAULT_TREND_WINDOW: usize = 10;
/// Records per page in the history timeline
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Points plotted on the trend chart
pub const DEFAULT_CHART_POINTS: usize = 50;

/// Exclusive calculation mode tag saved with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordMode {
    #[default]
    Standard,
    Indian,
    Athlete,
}

impl RecordMode {
    /// Collapse the two toggles into one tag; athlete wins over indian
    pub fn from_flags(flags: ModeFlags) -> Self {
        if flags.athlete {
            RecordMode::Athlete
        } else if flags.indian {
            RecordMode::Indian
        } else {
            RecordMode::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMode::Standard => "standard",
            RecordMode::Indian => "indian",
            RecordMode::Athlete => "athlete",
        }
    }
}

impl std::str::FromStr for RecordMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(RecordMode::Standard),
            "indian" => Ok(RecordMode::Indian),
            "athlete" => Ok(RecordMode::Athlete),
            _ => Err(format!("Unknown record mode: {}", s)),
        }
    }
}

/// Both calculator toggles as they were when the record was saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModeFlags {
    pub indian: bool,
    pub athlete: bool,
}

/// A saved calculation, before the gateway assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub bmi: f64,
    pub weight: f64,
    pub height: f64,
    pub flags: ModeFlags,
    pub status: String,
}

impl NewHistoryRecord {
    /// Snapshot a committed calculation
    pub fn from_metrics(profile: &ProfileInput, result: &MetricsResult) -> Self {
        Self {
            bmi: result.bmi,
            weight: profile.weight_kg(),
            height: profile.height_cm(),
            flags: ModeFlags {
                indian: profile.indian_mode(),
                athlete: profile.athlete_mode(),
            },
            status: result.status_label().to_string(),
        }
    }

    /// Stamp with an identity, producing the stored form
    pub fn into_record(self, id: Uuid, timestamp: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id,
            timestamp,
            bmi: self.bmi,
            weight: self.weight,
            height: self.height,
            mode: RecordMode::from_flags(self.flags),
            flags: self.flags,
            status: self.status,
        }
    }
}

/// Persisted, append-only history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub bmi: f64,
    pub weight: f64,
    pub height: f64,
    pub mode: RecordMode,
    pub flags: ModeFlags,
    pub status: String,
}

impl HistoryRecord {
    /// ISO-8601 timestamp with millisecond precision, e.g. `2024-03-01T09:30:00.000Z`
    pub fn date_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Timeline date label, e.g. `01 Mar 2024`
    pub fn display_date(&self) -> String {
        self.timestamp.format("%d %b %Y").to_string()
    }

    /// Form defaults restored from this record
    pub fn prefill(&self) -> FormPrefill {
        FormPrefill {
            height_cm: self.height.round() as i64,
            height_ft_in: FeetInchesHeight::from_cm(self.height),
            weight: self.weight.to_string(),
            athlete_mode: self.flags.athlete,
        }
    }

    /// True when any searchable field contains the (lower-cased) needle
    fn matches(&self, needle: &str) -> bool {
        self.date_string().to_lowercase().contains(needle)
            || self.bmi.to_string().contains(needle)
            || self.status.to_lowercase().contains(needle)
    }
}

// ============================================================================
// Trends
// ============================================================================

/// Summary shown above the history chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentTrends {
    pub avg_bmi: f64,
    pub weight_change: f64,
}

impl RecentTrends {
    /// Average BMI text, `--` when there is no history
    pub fn avg_bmi_display(&self) -> String {
        if self.avg_bmi > 0.0 {
            self.avg_bmi.to_string()
        } else {
            "--".to_string()
        }
    }

    /// Weight change text with an explicit `+` for gains
    pub fn weight_change_display(&self) -> String {
        if self.weight_change > 0.0 {
            format!("+{}", self.weight_change)
        } else {
            self.weight_change.to_string()
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average BMI over the newest `window` records and newest-vs-oldest weight change
///
/// The average only looks at the window, but the weight change compares
/// the newest record with the oldest record of the whole history.
pub fn recent_trends(records: &[HistoryRecord], window: usize) -> RecentTrends {
    let (Some(newest), Some(oldest)) = (records.first(), records.last()) else {
        return RecentTrends::default();
    };

    let recent = &records[..records.len().min(window.max(1))];
    let avg_bmi = recent.iter().map(|r| r.bmi).sum::<f64>() / recent.len() as f64;

    RecentTrends {
        avg_bmi: round1(avg_bmi),
        weight_change: round1(newest.weight - oldest.weight),
    }
}

// ============================================================================
// Search and Pagination
// ============================================================================

/// Case-insensitive substring search over date, BMI and status
///
/// A blank query keeps every record; otherwise the query is matched as
/// typed, surrounding spaces included. Order is preserved.
pub fn filter_by_search<'a>(records: &'a [HistoryRecord], query: &str) -> Vec<&'a HistoryRecord> {
    if query.trim().is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// Cumulative prefix of the first `page × page_size` items (infinite scroll)
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let end = page.saturating_mul(page_size).min(items.len());
    &items[..end]
}

/// Whether another page can be loaded
pub fn has_more(shown: usize, total: usize) -> bool {
    shown < total
}

// ============================================================================
// Timeline and Chart
// ============================================================================

/// One row of the history timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub date: String,
    pub bmi: String,
    pub weight_kg: f64,
    pub status: String,
    pub tone: StatusTone,
    pub is_latest: bool,
}

/// Build timeline rows; the first row is flagged as the latest entry
pub fn timeline<'a, I>(records: I) -> Vec<TimelineEntry>
where
    I: IntoIterator<Item = &'a HistoryRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| TimelineEntry {
            id: r.id,
            date: r.display_date(),
            bmi: format!("{} BMI", format_bmi(r.bmi)),
            weight_kg: r.weight,
            status: r.status.clone(),
            tone: StatusTone::from_status(&r.status),
            is_latest: i == 0,
        })
        .collect()
}

/// Pixel layout of the trend chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// Drawable height of the line area
    pub height: f64,
    /// Horizontal distance between points
    pub width_step: f64,
    /// X of the first point
    pub start_x: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            height: 140.0,
            width_step: 60.0,
            start_x: 10.0,
        }
    }
}

/// A plotted point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
    pub bmi: f64,
    pub recorded_at: DateTime<Utc>,
    /// Draw a month label under this point
    pub month_label: Option<String>,
}

/// Chart data, oldest point first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub min_bmi: f64,
    pub max_bmi: f64,
    pub points: Vec<TrendPoint>,
}

/// Build the BMI trend chart from the newest `max_points` records
///
/// The vertical range always spans at least 15–30 so the reference bands
/// stay visible. Returns `None` with fewer than two records.
pub fn trend_chart(
    records: &[HistoryRecord],
    max_points: usize,
    layout: ChartLayout,
) -> Option<TrendChart> {
    if records.len() < 2 {
        return None;
    }

    let plotted: Vec<&HistoryRecord> = records.iter().take(max_points).rev().collect();
    let max_bmi = plotted.iter().map(|r| r.bmi).fold(30.0, f64::max);
    let min_bmi = plotted.iter().map(|r| r.bmi).fold(15.0, f64::min);
    let range = if max_bmi - min_bmi == 0.0 {
        1.0
    } else {
        max_bmi - min_bmi
    };

    let mut previous: Option<DateTime<Utc>> = None;
    let points = plotted
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let new_month = previous.map_or(true, |p| {
                p.month() != r.timestamp.month() || p.year() != r.timestamp.year()
            });
            previous = Some(r.timestamp);
            TrendPoint {
                x: layout.start_x + i as f64 * layout.width_step,
                y: layout.height - ((r.bmi - min_bmi) / range) * layout.height,
                bmi: r.bmi,
                recorded_at: r.timestamp,
                month_label: new_month.then(|| r.timestamp.format("%b %y").to_string()),
            }
        })
        .collect();

    Some(TrendChart {
        min_bmi,
        max_bmi,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rstest::rstest;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn record(bmi: f64, weight: f64, status: &str, age_days: i64) -> HistoryRecord {
        NewHistoryRecord {
            bmi,
            weight,
            height: 175.0,
            flags: ModeFlags::default(),
            status: status.to_string(),
        }
        .into_record(Uuid::new_v4(), base_time() - Duration::days(age_days))
    }

    /// Newest first, one day apart
    fn history_from_weights(weights: &[f64]) -> Vec<HistoryRecord> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| record(w / 3.0625, *w, "Normal", i as i64))
            .collect()
    }

    // =========================================================================
    // Mode Tests
    // =========================================================================

    #[rstest]
    #[case(false, false, RecordMode::Standard)]
    #[case(true, false, RecordMode::Indian)]
    #[case(false, true, RecordMode::Athlete)]
    #[case(true, true, RecordMode::Athlete)]
    fn test_mode_collapse(#[case] indian: bool, #[case] athlete: bool, #[case] expected: RecordMode) {
        assert_eq!(RecordMode::from_flags(ModeFlags { indian, athlete }), expected);
    }

    #[test]
    fn test_both_flags_survive_collapse() {
        let stored = NewHistoryRecord {
            bmi: 24.0,
            weight: 73.5,
            height: 175.0,
            flags: ModeFlags {
                indian: true,
                athlete: true,
            },
            status: "Overweight".to_string(),
        }
        .into_record(Uuid::new_v4(), base_time());
        assert_eq!(stored.mode, RecordMode::Athlete);
        assert!(stored.flags.indian);
    }

    #[test]
    fn test_date_string_format() {
        let r = record(22.0, 70.0, "Normal", 0);
        assert_eq!(r.date_string(), "2024-03-01T09:30:00.000Z");
        assert_eq!(r.display_date(), "01 Mar 2024");
    }

    #[test]
    fn test_prefill_from_record() {
        let mut r = record(22.9, 70.5, "Normal", 0);
        r.height = 175.26;
        r.flags.athlete = true;
        let prefill = r.prefill();
        assert_eq!(prefill.height_cm, 175);
        assert_eq!(prefill.height_ft_in, FeetInchesHeight { feet: 5, inches: 9 });
        assert_eq!(prefill.weight, "70.5");
        assert!(prefill.athlete_mode);
    }

    // =========================================================================
    // Trend Tests
    // =========================================================================

    #[test]
    fn test_recent_trends_empty() {
        let trends = recent_trends(&[], DEFAULT_TREND_WINDOW);
        assert_eq!(trends, RecentTrends { avg_bmi: 0.0, weight_change: 0.0 });
        assert_eq!(trends.avg_bmi_display(), "--");
    }

    #[test]
    fn test_recent_trends_single_record() {
        let trends = recent_trends(&[record(22.857, 70.0, "Normal", 0)], DEFAULT_TREND_WINDOW);
        assert_eq!(trends.avg_bmi, 22.9);
        assert_eq!(trends.weight_change, 0.0);
    }

    #[test]
    fn test_scenario_e_weight_change_uses_global_oldest() {
        let weights: Vec<f64> = (70..=80).map(f64::from).collect();
        let history = history_from_weights(&weights);
        assert_eq!(history.len(), 11);

        let trends = recent_trends(&history, DEFAULT_TREND_WINDOW);
        assert_eq!(trends.weight_change, -10.0);
        assert_eq!(trends.weight_change_display(), "-10");

        // Average only covers the newest ten (70..=79)
        let expected_avg = round1((70..=79).map(|w| w as f64 / 3.0625).sum::<f64>() / 10.0);
        assert_eq!(trends.avg_bmi, expected_avg);
    }

    #[test]
    fn test_weight_gain_display() {
        let history = history_from_weights(&[72.4, 70.0]);
        let trends = recent_trends(&history, DEFAULT_TREND_WINDOW);
        assert_eq!(trends.weight_change, 2.4);
        assert_eq!(trends.weight_change_display(), "+2.4");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: average BMI stays within the window's min and max
        #[test]
        fn prop_avg_within_window_bounds(weights in prop::collection::vec(20.0f64..300.0, 1..40)) {
            let history = history_from_weights(&weights);
            let trends = recent_trends(&history, DEFAULT_TREND_WINDOW);
            let window = &history[..history.len().min(DEFAULT_TREND_WINDOW)];
            let lo = window.iter().map(|r| r.bmi).fold(f64::INFINITY, f64::min);
            let hi = window.iter().map(|r| r.bmi).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(trends.avg_bmi >= round1(lo) - 0.05 && trends.avg_bmi <= round1(hi) + 0.05);
        }
    }

    // =========================================================================
    // Search and Pagination Tests
    // =========================================================================

    #[test]
    fn test_filter_by_status_case_insensitive() {
        let history = vec![
            record(22.0, 70.0, "Normal", 0),
            record(27.0, 82.0, "Overweight", 1),
            record(21.5, 68.0, "Normal", 2),
        ];
        let found = filter_by_search(&history, "NORMAL");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, history[0].id);
        assert_eq!(found[1].id, history[2].id);
    }

    #[test]
    fn test_filter_by_bmi_and_date() {
        let history = vec![record(22.5, 70.0, "Normal", 0), record(27.0, 82.0, "Overweight", 40)];
        assert_eq!(filter_by_search(&history, "22.5").len(), 1);
        assert_eq!(filter_by_search(&history, "2024-03").len(), 1);
        assert_eq!(filter_by_search(&history, "t09:30").len(), 2);
        assert_eq!(filter_by_search(&history, "   ").len(), 2);
        assert!(filter_by_search(&history, "obese").is_empty());
    }

    #[test]
    fn test_filter_keeps_spaces_in_query() {
        let history = vec![record(31.0, 95.0, "Obese Class I", 0), record(22.0, 70.0, "Normal", 1)];
        assert_eq!(filter_by_search(&history, "class i").len(), 1);
        assert_eq!(filter_by_search(&history, " class").len(), 1);
        // Trailing space is part of the needle, so "normal " matches nothing
        assert!(filter_by_search(&history, "normal ").is_empty());
    }

    #[test]
    fn test_paginate_is_cumulative_prefix() {
        let items: Vec<u32> = (0..45).collect();
        assert_eq!(paginate(&items, 1, 20).len(), 20);
        assert_eq!(paginate(&items, 2, 20), &items[..40]);
        assert_eq!(paginate(&items, 3, 20).len(), 45);
        assert!(paginate(&items, 0, 20).is_empty());
        assert!(has_more(40, 45));
        assert!(!has_more(45, 45));
    }

    // =========================================================================
    // Timeline and Chart Tests
    // =========================================================================

    #[test]
    fn test_timeline_rows() {
        let history = vec![record(22.04, 70.0, "Normal", 0), record(31.0, 95.0, "Obese Class I", 1)];
        let rows = timeline(&history);
        assert_eq!(rows[0].bmi, "22.0 BMI");
        assert!(rows[0].is_latest);
        assert!(!rows[1].is_latest);
        assert_eq!(rows[1].tone, StatusTone::Danger);
    }

    #[test]
    fn test_chart_requires_two_records() {
        assert!(trend_chart(&[], DEFAULT_CHART_POINTS, ChartLayout::default()).is_none());
        let one = vec![record(22.0, 70.0, "Normal", 0)];
        assert!(trend_chart(&one, DEFAULT_CHART_POINTS, ChartLayout::default()).is_none());
    }

    #[test]
    fn test_chart_is_oldest_first_with_reference_range() {
        let history = vec![record(24.0, 75.0, "Normal", 0), record(20.0, 62.0, "Normal", 1)];
        let chart = trend_chart(&history, DEFAULT_CHART_POINTS, ChartLayout::default()).unwrap();

        assert_eq!(chart.min_bmi, 15.0);
        assert_eq!(chart.max_bmi, 30.0);
        assert_eq!(chart.points[0].bmi, 20.0);
        assert_eq!(chart.points[1].bmi, 24.0);
        assert_eq!(chart.points[0].x, 10.0);
        assert_eq!(chart.points[1].x, 70.0);
        // (20 - 15) / 15 of 140 from the bottom
        assert!((chart.points[0].y - (140.0 - 140.0 / 3.0)).abs() < 1e-9);
        assert_eq!(chart.points[0].month_label.as_deref(), Some("Feb 24"));
        assert_eq!(chart.points[1].month_label.as_deref(), Some("Mar 24"));
    }

    #[test]
    fn test_chart_labels_only_month_changes() {
        let history = history_from_weights(&[70.0, 71.0, 72.0]);
        // 1 Mar, 29 Feb, 28 Feb -> oldest first: 28 Feb, 29 Feb, 1 Mar
        let chart = trend_chart(&history, DEFAULT_CHART_POINTS, ChartLayout::default()).unwrap();
        let labels: Vec<bool> = chart.points.iter().map(|p| p.month_label.is_some()).collect();
        assert_eq!(labels, vec![true, false, true]);
    }

    #[test]
    fn test_chart_limits_points() {
        let weights: Vec<f64> = (0..60).map(|i| 60.0 + i as f64 * 0.1).collect();
        let history = history_from_weights(&weights);
        let chart = trend_chart(&history, DEFAULT_CHART_POINTS, ChartLayout::default()).unwrap();
        assert_eq!(chart.points.len(), 50);
        // Last plotted point is the newest record
        assert_eq!(chart.points.last().unwrap().recorded_at, history[0].timestamp);
    }
}
