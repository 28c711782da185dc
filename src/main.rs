//! cycle-store - loads one project's cycles and reports the derived views.

use std::process::ExitCode;
use std::sync::Arc;

use cycle_store::adapters::{
    HttpCycleService, HttpCycleServiceConfig, StaticEstimateFlags, StaticFilterSource,
    StaticRouterContext, SystemClock,
};
use cycle_store::application::{CycleStore, CycleStoreDeps};
use cycle_store::config::AppConfig;
use cycle_store::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    telemetry::init_tracing(&config.logging);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let workspace = config.scope.workspace_slug()?;
    let project_id = config.scope.project()?;

    let service = Arc::new(HttpCycleService::new(
        HttpCycleServiceConfig::new(config.api.base_url.clone(), config.api.api_key.clone())
            .with_timeout(config.api.timeout()),
    )?);
    let store = CycleStore::new(CycleStoreDeps {
        cycle_service: service.clone(),
        archive_service: service,
        router: Arc::new(StaticRouterContext::new(workspace.clone(), project_id)),
        filters: Arc::new(StaticFilterSource::new()),
        estimates: Arc::new(StaticEstimateFlags::with_projects(
            config.features.estimate_project_ids()?,
        )),
        clock: Arc::new(SystemClock),
    });

    tracing::info!(workspace = %workspace, project_id = %project_id, "Loading cycles");
    if store.fetch_all_cycles(&workspace, &project_id).await.is_none() {
        return Err("could not fetch project cycles".into());
    }
    store.fetch_active_cycle(&workspace, &project_id).await;
    store.fetch_archived_cycles(&workspace, &project_id).await;

    let count = |ids: Option<Vec<_>>| ids.map_or(0, |ids| ids.len());
    tracing::info!(
        all = count(store.current_project_cycle_ids()),
        completed = count(store.current_project_completed_cycle_ids()),
        upcoming = count(store.current_project_upcoming_cycle_ids()),
        incomplete = count(store.current_project_incomplete_cycle_ids()),
        draft = count(store.current_project_draft_cycle_ids()),
        archived = count(store.current_project_archived_cycle_ids()),
        "Cycle views"
    );

    match store.current_project_active_cycle() {
        Some(active) => {
            match store
                .fetch_active_cycle_progress(&workspace, &project_id, &active.id)
                .await
            {
                Ok(progress) => tracing::info!(
                    cycle = %active.name,
                    percent = progress.completion_percent(),
                    "Active cycle"
                ),
                Err(e) => tracing::warn!(cycle = %active.name, "No progress for active cycle: {}", e),
            }
        }
        None => tracing::info!("No active cycle"),
    }

    store.settle().await;
    Ok(())
}
