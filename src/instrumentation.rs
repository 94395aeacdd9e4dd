//! Query timing and plan inspection

use bson::Document;
use std::time::{Duration, Instant};
use tracing::info;

use crate::db::{MongoClient, PlannedQuery};
use crate::types::Result;

/// Plan returned by `explain` together with how long it took to obtain
#[derive(Debug, Clone)]
pub struct QueryTiming {
    pub plan: Document,
    pub elapsed: Duration,
}

/// Build the query with `query_fn`, ask the server to explain it, and log
/// the wall-clock time taken. Returns the plan.
pub async fn explain_and_time<F>(db: &MongoClient, query_fn: F) -> Result<Document>
where
    F: FnOnce() -> PlannedQuery,
{
    Ok(explain_with_timing(db, query_fn).await?.plan)
}

/// Like [`explain_and_time`] but also hands back the measured duration
pub async fn explain_with_timing<F>(db: &MongoClient, query_fn: F) -> Result<QueryTiming>
where
    F: FnOnce() -> PlannedQuery,
{
    let started = Instant::now();
    let query = query_fn();
    let plan = db.run_command(query.explain_command()).await?;
    let elapsed = started.elapsed();

    info!(
        "Execution time on '{}': {:.4} seconds",
        query.collection(),
        elapsed.as_secs_f64()
    );

    Ok(QueryTiming { plan, elapsed })
}

/// Pull the winning plan's top stage name out of an explain document, when
/// the server reports one (e.g. `IXSCAN`, `COLLSCAN`)
pub fn winning_stage(plan: &Document) -> Option<&str> {
    let planner = plan.get_document("queryPlanner").ok().or_else(|| {
        // Aggregations nest the planner under the first pipeline stage
        plan.get_array("stages")
            .ok()?
            .first()?
            .as_document()?
            .get_document("$cursor")
            .ok()?
            .get_document("queryPlanner")
            .ok()
    })?;

    let mut stage = planner.get_document("winningPlan").ok()?;
    // Descend through FETCH/PROJECTION wrappers to the access stage
    while let Ok(input) = stage.get_document("inputStage") {
        stage = input;
    }
    stage.get_str("stage").ok()
}
