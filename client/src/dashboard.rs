//! Dashboard controller
//!
//! Holds the locally cached varieties and derives the visible page by
//! running the query pipeline and pagination over them. Deletes are applied
//! optimistically and can be undone once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    apply_query, page_window, paginate, DashboardStats, HealthFilter, NewVariety, QueryParams,
    SortOrder, Variety, DEFAULT_PAGE_SIZE,
};
use uuid::Uuid;

use crate::api::{ApiError, ApiResult, VarietyApi};
use crate::notification::Notification;

/// Identifies one list fetch; only the newest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// A local change not yet confirmed by the server
#[derive(Debug, Clone)]
struct TentativeDelete {
    correlation_id: Uuid,
    variety: Variety,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub items: Vec<Variety>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
    pub total_matches: usize,
    pub stats: DashboardStats,
}

pub struct DashboardController<A: VarietyApi> {
    api: A,
    records: Vec<Variety>,
    params: QueryParams,
    current_page: usize,
    page_size: usize,
    loading: bool,
    api_error: Option<String>,
    last_deleted: Option<Variety>,
    tentative: Vec<TentativeDelete>,
    fetch_seq: u64,
    notifications: Vec<Notification>,
}

impl<A: VarietyApi> DashboardController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: Vec::new(),
            params: QueryParams::default(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            api_error: None,
            last_deleted: None,
            tentative: Vec::new(),
            fetch_seq: 0,
            notifications: Vec::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn records(&self) -> &[Variety] {
        &self.records
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn last_deleted(&self) -> Option<&Variety> {
        self.last_deleted.as_ref()
    }

    /// Number of local changes still awaiting the server
    pub fn pending_mutations(&self) -> usize {
        self.tentative.len()
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Reload all varieties from the server
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.api.list_varieties().await;
        self.complete_fetch(ticket, result);
    }

    /// Start a fetch and mark the dashboard as loading
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        FetchTicket(self.fetch_seq)
    }

    /// Apply a fetch result. Returns false and changes nothing when a newer
    /// fetch has started since `ticket` was issued.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: ApiResult<Vec<Variety>>) -> bool {
        if ticket.0 != self.fetch_seq {
            tracing::debug!(ticket = ticket.0, latest = self.fetch_seq, "discarding stale fetch");
            return false;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "varieties loaded");
                self.records = records;
                self.api_error = None;
                self.clamp_page();
            }
            Err(e) => {
                tracing::warn!("Failed to load varieties: {}", e);
                self.api_error = Some(e.to_string());
                self.notifications.push(Notification::error(
                    "Error",
                    "Failed to load crop varieties. Please try again.",
                ));
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Query inputs
    // ------------------------------------------------------------------

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.params.search_text = text.into();
        self.current_page = 1;
    }

    pub fn set_health_filter(&mut self, filter: HealthFilter) {
        self.params.health_filter = filter;
        self.current_page = 1;
    }

    pub fn set_yield_range(&mut self, min: Decimal, max: Decimal) {
        self.params.yield_min = min;
        self.params.yield_max = max;
        self.current_page = 1;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.params.sort_order = order;
        self.current_page = 1;
    }

    /// Reset every query input to its default
    pub fn clear_filters(&mut self) {
        self.params = QueryParams::default();
        self.current_page = 1;
    }

    /// Move to `page`, clamped to the pages that exist
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    fn filtered(&self) -> Vec<Variety> {
        apply_query(&self.records, &self.params)
    }

    fn total_pages(&self) -> usize {
        shared::total_pages(self.filtered().len(), self.page_size)
    }

    fn clamp_page(&mut self) {
        self.set_page(self.current_page);
    }

    /// Current page of the filtered, sorted list plus summary counts
    pub fn view(&self, today: NaiveDate) -> DashboardView {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.page_size, self.current_page);

        DashboardView {
            items: page.items,
            current_page: self.current_page,
            total_pages: page.total_pages,
            page_window: page_window(self.current_page, page.total_pages),
            total_matches: filtered.len(),
            stats: DashboardStats::compute(&self.records, today),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Delete a variety, removing it locally before the server confirms.
    ///
    /// On failure every tentative change is dropped and the list is
    /// reloaded from the server.
    pub async fn delete(&mut self, id: &str) -> ApiResult<()> {
        let correlation_id = Uuid::new_v4();

        if let Some(index) = self.records.iter().position(|v| v.id == id) {
            let variety = self.records.remove(index);
            self.tentative.push(TentativeDelete {
                correlation_id,
                variety,
            });
            self.clamp_page();
        }

        match self.api.delete_variety(id).await {
            Ok(()) => {
                let confirmed = self
                    .tentative
                    .iter()
                    .position(|t| t.correlation_id == correlation_id)
                    .map(|index| self.tentative.remove(index).variety);

                // Undo can only restore a record whose values were cached
                let notification = match &confirmed {
                    Some(v) => Notification::success(
                        "Variety deleted",
                        format!("{} - {} has been removed", v.crop_name, v.variety_name),
                    )
                    .with_undo(),
                    None => Notification::success("Variety deleted", "The variety has been removed"),
                };
                self.last_deleted = confirmed;

                tracing::info!(id = %id, %correlation_id, "variety deleted");
                self.notifications.push(notification);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %id, %correlation_id, "Failed to delete variety: {}", e);
                self.tentative.clear();
                self.notifications.push(Notification::error(
                    "Error",
                    "Failed to delete variety. Please try again.",
                ));
                self.refresh().await;
                Err(e)
            }
        }
    }

    /// Re-create the most recently deleted variety under a new id.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. The undo slot is
    /// emptied even if the server rejects the re-create.
    pub async fn undo_delete(&mut self) -> ApiResult<Option<Variety>> {
        let Some(variety) = self.last_deleted.take() else {
            return Ok(None);
        };

        match self.api.create_variety(&NewVariety::from(&variety)).await {
            Ok(restored) => {
                tracing::info!(old_id = %variety.id, new_id = %restored.id, "variety restored");
                self.notifications.push(Notification::success(
                    "Variety restored",
                    format!("{} - {} has been restored", restored.crop_name, restored.variety_name),
                ));
                self.refresh().await;
                Ok(Some(restored))
            }
            Err(e) => {
                tracing::warn!(id = %variety.id, "Failed to restore variety: {}", e);
                self.notifications.push(Notification::error(
                    "Error",
                    "Failed to restore variety. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Text summary of a variety for the clipboard
    pub fn copy_summary(&mut self, id: &str) -> Result<String, ApiError> {
        let variety = self
            .records
            .iter()
            .find(|v| v.id == id)
            .ok_or(ApiError::NotFound)?;

        let summary = variety.summary();
        self.notifications.push(Notification::info(
            "Copied to clipboard",
            format!("{} - {} details copied", variety.crop_name, variety.variety_name),
        ));
        Ok(summary)
    }

    /// Drain queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::testing::{variety, FakeApi};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    async fn loaded(api: Arc<FakeApi>) -> DashboardController<Arc<FakeApi>> {
        let mut dashboard = DashboardController::new(api);
        dashboard.refresh().await;
        dashboard
    }

    fn ids(view: &DashboardView) -> Vec<&str> {
        view.items.iter().map(|v| v.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_loads_records() {
        let dashboard = loaded(Arc::new(FakeApi::numbered(3))).await;
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.records().len(), 3);
        assert_eq!(dashboard.api_error(), None);
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_error_and_clears_loading() {
        let api = Arc::new(FakeApi::numbered(3));
        FakeApi::set(&api.fail_list, true);

        let mut dashboard = loaded(api).await;
        assert!(!dashboard.is_loading());
        assert!(dashboard.api_error().is_some());
        assert_eq!(dashboard.take_notifications()[0].kind, NotificationKind::Error);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut dashboard = DashboardController::new(FakeApi::default());
        let first = dashboard.begin_fetch();
        let second = dashboard.begin_fetch();

        let newer = vec![variety("new", "Kale", 1, (2025, 3, 30), 50, 4)];
        assert!(dashboard.complete_fetch(second, Ok(newer.clone())));

        let older = vec![variety("old", "Kale", 1, (2025, 3, 30), 50, 4)];
        assert!(!dashboard.complete_fetch(first, Ok(older)));
        assert_eq!(dashboard.records(), newer.as_slice());
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn test_view_paginates_filtered_records() {
        let mut dashboard = loaded(Arc::new(FakeApi::numbered(25))).await;

        let view = dashboard.view(today());
        assert_eq!(view.items.len(), 10);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.total_matches, 25);
        assert_eq!(view.page_window, vec![1, 2, 3]);

        dashboard.set_page(3);
        assert_eq!(dashboard.view(today()).items.len(), 5);

        dashboard.set_page(99);
        assert_eq!(dashboard.current_page(), 3);
        dashboard.set_page(0);
        assert_eq!(dashboard.current_page(), 1);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut dashboard = loaded(Arc::new(FakeApi::numbered(25))).await;
        dashboard.set_page(2);

        dashboard.set_yield_range(Decimal::from(10), Decimal::from(25));
        dashboard.set_sort_order(SortOrder::YieldDesc);
        assert_eq!(dashboard.current_page(), 1);

        let view = dashboard.view(today());
        assert_eq!(view.total_matches, 16);
        assert_eq!(view.items[0].id, "25");

        dashboard.set_search_text("no such crop");
        assert_eq!(dashboard.view(today()).total_matches, 0);
        assert_eq!(dashboard.view(today()).total_pages, 0);

        dashboard.clear_filters();
        assert_eq!(dashboard.view(today()).total_matches, 25);
    }

    #[tokio::test]
    async fn test_stats_cover_all_records() {
        let api = Arc::new(FakeApi::with_records(vec![
            variety("ready", "Tomato", 5, (2025, 3, 15), 70, 4),
            variety("growing", "Lettuce", 5, (2025, 4, 1), 70, 4),
            variety("overdue", "Spinach", 5, (2025, 3, 20), 40, 4),
            variety("planted", "Potato", 5, (2025, 4, 20), 100, 1),
        ]));
        let mut dashboard = loaded(api).await;
        dashboard.set_health_filter(HealthFilter::Rating(1));

        let view = dashboard.view(today());
        assert_eq!(ids(&view), vec!["planted"]);
        assert_eq!(view.stats.total_varieties, 4);
        assert_eq!(view.stats.ready_to_harvest, 1);
        assert_eq!(view.stats.growing, 1);
        assert_eq!(view.stats.overdue, 1);
    }

    #[tokio::test]
    async fn test_delete_then_undo() {
        let api = Arc::new(FakeApi::numbered(3));
        let mut dashboard = loaded(api.clone()).await;
        let removed = dashboard.records()[1].clone();

        dashboard.delete("2").await.unwrap();
        assert!(dashboard.records().iter().all(|v| v.id != "2"));
        assert_eq!(dashboard.last_deleted(), Some(&removed));
        assert_eq!(dashboard.pending_mutations(), 0);
        assert!(dashboard.take_notifications()[0].undo);

        let restored = dashboard.undo_delete().await.unwrap().unwrap();
        assert_ne!(restored.id, "2");
        assert_eq!(NewVariety::from(&restored), NewVariety::from(&removed));
        assert!(dashboard.records().iter().any(|v| v.id == restored.id));
        assert_eq!(api.snapshot().len(), 3);

        assert_eq!(dashboard.undo_delete().await.unwrap(), None);
        assert_eq!(api.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_second_delete_replaces_undo_slot() {
        let mut dashboard = loaded(Arc::new(FakeApi::numbered(3))).await;
        dashboard.delete("1").await.unwrap();
        dashboard.delete("3").await.unwrap();
        assert_eq!(dashboard.last_deleted().unwrap().id, "3");
    }

    #[tokio::test]
    async fn test_delete_of_uncached_record_offers_no_undo() {
        let api = Arc::new(FakeApi::numbered(3));
        let mut dashboard = loaded(api.clone()).await;
        api.records
            .lock()
            .unwrap()
            .push(variety("4", "Onion", 22, (2025, 3, 10), 90, 2));

        dashboard.delete("1").await.unwrap();
        dashboard.take_notifications();
        dashboard.delete("4").await.unwrap();

        let notifications = dashboard.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert!(!notifications[0].undo);
        assert_eq!(dashboard.last_deleted(), None);
        assert_eq!(dashboard.undo_delete().await.unwrap(), None);
        assert!(api.snapshot().iter().all(|v| v.id != "1" && v.id != "4"));
    }

    #[tokio::test]
    async fn test_failed_delete_resyncs_from_server() {
        let api = Arc::new(FakeApi::numbered(3));
        let mut dashboard = loaded(api.clone()).await;
        FakeApi::set(&api.fail_delete, true);

        let calls_before = api.list_calls.load(Ordering::SeqCst);
        assert!(dashboard.delete("2").await.is_err());

        assert_eq!(api.list_calls.load(Ordering::SeqCst), calls_before + 1);
        assert_eq!(dashboard.records(), api.snapshot().as_slice());
        assert_eq!(dashboard.pending_mutations(), 0);
        assert_eq!(dashboard.last_deleted(), None);

        let kinds: Vec<_> = dashboard.take_notifications().into_iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Error]);
    }

    #[tokio::test]
    async fn test_failed_undo_clears_slot() {
        let api = Arc::new(FakeApi::numbered(2));
        let mut dashboard = loaded(api.clone()).await;
        dashboard.delete("1").await.unwrap();
        FakeApi::set(&api.fail_create, true);

        assert!(dashboard.undo_delete().await.is_err());
        assert_eq!(dashboard.last_deleted(), None);
        assert_eq!(dashboard.undo_delete().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_on_last_page_moves_back() {
        let mut dashboard = loaded(Arc::new(FakeApi::numbered(11))).await;
        dashboard.set_page(2);
        dashboard.delete("11").await.unwrap();
        assert_eq!(dashboard.current_page(), 1);
    }

    #[tokio::test]
    async fn test_copy_summary() {
        let mut dashboard = loaded(Arc::new(FakeApi::numbered(2))).await;

        let summary = dashboard.copy_summary("2").unwrap();
        assert!(summary.starts_with("Crop: Kale\n"));
        assert!(summary.contains("Expected Yield: 2 kg"));
        assert_eq!(dashboard.take_notifications()[0].kind, NotificationKind::Info);
        assert_eq!(dashboard.copy_summary("missing"), Err(ApiError::NotFound));
    }
}
