//! CycleStore - reactive cache and CRUD façade for project cycles.
//!
//! - `state` - immutable snapshot type and change descriptions
//! - `projections` - pure derived views over a snapshot
//! - `memo` - per-version memoization of those views
//! - `store` - the observable store and its read API
//! - `fetch` / `mutations` - async actions against the remote ports

mod fetch;
mod memo;
mod mutations;
pub mod projections;
mod state;
mod store;

pub use state::{CycleState, StoreChange};
pub use store::{CycleStore, CycleStoreDeps};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::adapters::{
        FixedClock, InMemoryCycleService, StaticEstimateFlags, StaticFilterSource,
        StaticRouterContext,
    };
    use crate::domain::foundation::{ProjectId, WorkspaceSlug};

    use super::{CycleStore, CycleStoreDeps};

    pub(crate) struct Harness {
        pub store: CycleStore,
        pub backend: Arc<InMemoryCycleService>,
        pub ws: WorkspaceSlug,
        pub project: ProjectId,
    }

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Store wired to an empty in-memory backend with the project open.
    pub(crate) fn harness() -> Harness {
        let ws = WorkspaceSlug::new("acme").unwrap();
        let project = ProjectId::new();
        let backend = Arc::new(InMemoryCycleService::new());
        let store = CycleStore::new(CycleStoreDeps {
            cycle_service: backend.clone(),
            archive_service: backend.clone(),
            router: Arc::new(StaticRouterContext::new(ws.clone(), project)),
            filters: Arc::new(StaticFilterSource::new()),
            estimates: Arc::new(StaticEstimateFlags::new()),
            clock: Arc::new(FixedClock::new(today())),
        });
        Harness {
            store,
            backend,
            ws,
            project,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate};

    use super::test_support::{harness, today, Harness};
    use super::*;
    use crate::adapters::{
        FixedClock, InMemoryCycleService, StaticEstimateFlags, StaticFilterSource,
        StaticRouterContext,
    };
    use crate::domain::cycle::{
        CycleFilters, CyclePatch, CyclePlotType, CycleRecord, OrderingPolicy,
    };
    use crate::domain::foundation::{CycleId, CycleStatus, ProjectId, WorkspaceSlug};
    use crate::ports::Clock;

    struct Wired {
        store: CycleStore,
        backend: Arc<InMemoryCycleService>,
        router: Arc<StaticRouterContext>,
        filters: Arc<StaticFilterSource>,
        estimates: Arc<StaticEstimateFlags>,
        clock: Arc<FixedClock>,
        ws: WorkspaceSlug,
        project: ProjectId,
    }

    /// Like `harness`, but keeps handles to every context port.
    fn wired() -> Wired {
        let ws = WorkspaceSlug::new("acme").unwrap();
        let project = ProjectId::new();
        let backend = Arc::new(InMemoryCycleService::new());
        let router = Arc::new(StaticRouterContext::new(ws.clone(), project));
        let filters = Arc::new(StaticFilterSource::new());
        let estimates = Arc::new(StaticEstimateFlags::new());
        let clock = Arc::new(FixedClock::new(today()));
        let store = CycleStore::new(CycleStoreDeps {
            cycle_service: backend.clone(),
            archive_service: backend.clone(),
            router: router.clone(),
            filters: filters.clone(),
            estimates: estimates.clone(),
            clock: clock.clone(),
        });
        Wired {
            store,
            backend,
            router,
            filters,
            estimates,
            clock,
            ws,
            project,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Notification
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn subscribers_see_each_settled_write() {
        let Harness { store, backend, ws, project } = harness();
        backend.seed(CycleRecord::new(CycleId::new(), project, "a"));
        let mut rx = store.subscribe();

        store.fetch_all_cycles(&ws, &project).await;

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(
            seen.last_change(),
            Some(&StoreChange::ProjectCyclesLoaded { project_id: project, count: 1 })
        );
    }

    #[tokio::test]
    async fn snapshots_are_immutable() {
        let Harness { store, backend, ws, project } = harness();
        let cycle = CycleRecord::new(CycleId::new(), project, "Sprint 1");
        backend.seed(cycle.clone());
        store.fetch_all_cycles(&ws, &project).await;
        let before = store.snapshot();

        store.update_cycle_local(&cycle.id, &CyclePatch::new().name("Sprint 2"));

        assert_eq!(before.cycle(&cycle.id).unwrap().name, "Sprint 1");
        assert_eq!(store.cycle_name_by_id(&cycle.id).as_deref(), Some("Sprint 2"));
    }

    #[tokio::test]
    async fn no_op_write_does_not_notify() {
        let Harness { store, .. } = harness();
        let version = store.snapshot().version();

        assert!(!store.update_cycle_local(&CycleId::new(), &CyclePatch::new()));

        assert_eq!(store.snapshot().version(), version);
    }

    // ───────────────────────────────────────────────────────────────
    // Views
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn views_follow_the_router() {
        let w = wired();
        w.backend.seed(CycleRecord::new(CycleId::new(), w.project, "a"));
        w.store.fetch_all_cycles(&w.ws, &w.project).await;
        assert_eq!(w.store.current_project_cycle_ids().map(|v| v.len()), Some(1));

        w.router.set_project(Some(ProjectId::new()));
        assert_eq!(w.store.current_project_cycle_ids(), None);

        w.router.set_project(None);
        assert_eq!(w.store.current_project_draft_cycle_ids(), None);
    }

    #[tokio::test]
    async fn date_views_track_the_clock() {
        let w = wired();
        let next = CycleRecord::new(CycleId::new(), w.project, "next").with_dates(
            Some(today() + Duration::days(1)),
            Some(today() + Duration::days(14)),
        );
        w.backend.seed(next.clone());
        w.store.fetch_all_cycles(&w.ws, &w.project).await;
        assert_eq!(w.store.current_project_upcoming_cycle_ids(), Some(vec![next.id]));

        w.clock.advance(1);
        assert_eq!(w.store.current_project_upcoming_cycle_ids(), Some(vec![]));
        assert_eq!(w.store.current_project_incomplete_cycle_ids(), Some(vec![next.id]));

        w.clock.advance(14);
        assert_eq!(w.store.current_project_completed_cycle_ids(), Some(vec![next.id]));
    }

    /// Reports `start` on the first read and the following day afterwards.
    struct RolloverClock {
        start: NaiveDate,
        reads: AtomicUsize,
    }

    impl Clock for RolloverClock {
        fn today(&self) -> NaiveDate {
            if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
                self.start
            } else {
                self.start + Duration::days(1)
            }
        }
    }

    #[tokio::test]
    async fn midnight_rollover_between_reads_reclassifies() {
        let backend = Arc::new(InMemoryCycleService::new());
        let ws = WorkspaceSlug::new("acme").unwrap();
        let project = ProjectId::new();
        let store = CycleStore::new(CycleStoreDeps {
            cycle_service: backend.clone(),
            archive_service: backend.clone(),
            router: Arc::new(StaticRouterContext::new(ws.clone(), project)),
            filters: Arc::new(StaticFilterSource::new()),
            estimates: Arc::new(StaticEstimateFlags::new()),
            clock: Arc::new(RolloverClock {
                start: today(),
                reads: AtomicUsize::new(0),
            }),
        });
        let ending = CycleRecord::new(CycleId::new(), project, "ending")
            .with_dates(Some(today() - Duration::days(13)), Some(today()));
        backend.seed(ending.clone());
        store.fetch_all_cycles(&ws, &project).await;

        assert_eq!(store.current_project_completed_cycle_ids(), Some(vec![]));
        assert_eq!(
            store.current_project_completed_cycle_ids(),
            Some(vec![ending.id])
        );
    }

    /// Orders by descending sort order regardless of mode.
    struct DescendingPolicy;

    impl OrderingPolicy for DescendingPolicy {
        fn order(&self, records: &mut [&CycleRecord], _manual: bool) {
            records.sort_by(|a, b| b.sort_order.total_cmp(&a.sort_order));
        }
    }

    #[tokio::test]
    async fn swapping_the_ordering_policy_reorders_filtered_views() {
        let w = wired();
        let a = CycleRecord::new(CycleId::new(), w.project, "a").with_sort_order(1.0);
        let b = CycleRecord::new(CycleId::new(), w.project, "b").with_sort_order(2.0);
        w.backend.seed(a.clone());
        w.backend.seed(b.clone());
        w.store.fetch_all_cycles(&w.ws, &w.project).await;
        assert_eq!(w.store.filtered_cycle_ids(&w.project, true), Some(vec![a.id, b.id]));

        w.filters.set_ordering_policy(Arc::new(DescendingPolicy));

        assert_eq!(w.store.filtered_cycle_ids(&w.project, true), Some(vec![b.id, a.id]));
    }

    #[tokio::test]
    async fn filtered_views_read_the_filter_source() {
        let w = wired();
        let live = CycleRecord::new(CycleId::new(), w.project, "Platform live")
            .with_status(CycleStatus::Current);
        let later = CycleRecord::new(CycleId::new(), w.project, "Platform later")
            .with_status(CycleStatus::Upcoming);
        let done = CycleRecord::new(CycleId::new(), w.project, "Mobile done")
            .with_status(CycleStatus::Completed);
        for r in [&live, &later, &done] {
            w.backend.seed(r.clone());
        }
        w.store.fetch_all_cycles(&w.ws, &w.project).await;

        w.filters.set_search_query("platform");
        assert_eq!(
            w.store.filtered_cycle_ids(&w.project, false),
            Some(vec![live.id, later.id])
        );

        w.filters.set_search_query("");
        w.filters
            .set_filters(w.project, CycleFilters::none().with_status(CycleStatus::Upcoming));
        assert_eq!(w.store.filtered_cycle_ids(&w.project, false), Some(vec![later.id]));

        w.filters.set_filters(w.project, CycleFilters::none());
        assert_eq!(
            w.store.filtered_completed_cycle_ids(&w.project),
            Some(vec![done.id])
        );
    }

    #[tokio::test]
    async fn active_cycle_requires_fetched_project() {
        let w = wired();
        let live = CycleRecord::new(CycleId::new(), w.project, "live")
            .with_status(CycleStatus::Current);
        w.backend.seed(live.clone());

        w.store.fetch_active_cycle(&w.ws, &w.project).await;
        assert_eq!(w.store.current_project_active_cycle_id(), None);

        w.store.fetch_all_cycles(&w.ws, &w.project).await;
        assert_eq!(w.store.current_project_active_cycle_id(), Some(live.id));
        assert_eq!(w.store.current_project_active_cycle(), Some(live));
    }

    #[tokio::test]
    async fn project_cycle_details_mirror_ids() {
        let Harness { store, backend, ws, project } = harness();
        let a = CycleRecord::new(CycleId::new(), project, "a").with_sort_order(2.0);
        let b = CycleRecord::new(CycleId::new(), project, "b").with_sort_order(1.0);
        backend.seed(a.clone());
        backend.seed(b.clone());
        assert_eq!(store.project_cycle_details(&project), None);

        store.fetch_all_cycles(&ws, &project).await;

        assert_eq!(store.project_cycle_details(&project), Some(vec![b, a]));
    }

    // ───────────────────────────────────────────────────────────────
    // Plot type
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn plot_type_is_gated_by_estimates() {
        let w = wired();
        let cycle = CycleId::new();
        w.store.set_plot_type(cycle, CyclePlotType::Points);
        assert_eq!(w.store.cycle_plot_type(&cycle), CyclePlotType::Burndown);

        w.estimates.set_enabled(w.project, true);
        assert_eq!(w.store.cycle_plot_type(&cycle), CyclePlotType::Points);
        assert_eq!(w.store.cycle_plot_type(&CycleId::new()), CyclePlotType::Burndown);
    }
}
