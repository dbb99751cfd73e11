//! History screen service
//!
//! Provides business logic for the history screen including:
//! - Recent trends over the full history
//! - Search, infinite-scroll pagination and timeline rows
//! - Trend chart data
//! - Form pre-fill from the latest calculation

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use bmigo_shared::{
    filter_by_search, has_more, paginate, recent_trends, timeline, trend_chart, ChartLayout,
    FormPrefill, RecentTrends, TimelineEntry, TrendChart,
};

use crate::config::HistoryConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::HistoryRepository;

/// Everything the history screen renders
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOverview {
    pub trends: RecentTrends,
    pub avg_bmi_display: String,
    pub weight_change_display: String,
    /// Records in the whole history
    pub total: usize,
    /// Records matching the search query
    pub matched: usize,
    pub entries: Vec<TimelineEntry>,
    pub has_more: bool,
    /// Present once there are at least two records
    pub chart: Option<TrendChart>,
}

/// History service for business logic
pub struct HistoryService;

impl HistoryService {
    /// Build the history screen for a search query and page number
    ///
    /// Trends and the chart always use the full history; the query only
    /// narrows the timeline.
    pub async fn overview(
        repo: &dyn HistoryRepository,
        config: &HistoryConfig,
        query: &str,
        page: usize,
    ) -> ServiceResult<HistoryOverview> {
        let records = repo.list().await?;

        let trends = recent_trends(&records, config.trend_window);
        let chart = trend_chart(&records, config.chart_points, ChartLayout::default());

        let matched = filter_by_search(&records, query);
        let shown = paginate(&matched, page, config.page_size);

        Ok(HistoryOverview {
            avg_bmi_display: trends.avg_bmi_display(),
            weight_change_display: trends.weight_change_display(),
            trends,
            total: records.len(),
            matched: matched.len(),
            has_more: has_more(shown.len(), matched.len()),
            entries: timeline(shown.iter().copied()),
            chart,
        })
    }

    /// Delete one record
    pub async fn delete(repo: &dyn HistoryRepository, id: Uuid) -> ServiceResult<()> {
        if !repo.delete(id).await? {
            return Err(ServiceError::NotFound(format!("History record {}", id)));
        }
        info!(%id, "History record deleted");
        Ok(())
    }

    /// Delete every record
    pub async fn clear(repo: &dyn HistoryRepository) -> ServiceResult<u64> {
        let removed = repo.clear().await?;
        info!(removed, "History cleared");
        Ok(removed)
    }

    /// Form defaults from the most recent record, if any
    pub async fn prefill(repo: &dyn HistoryRepository) -> ServiceResult<Option<FormPrefill>> {
        Ok(repo.latest().await?.map(|r| r.prefill()))
    }
}
