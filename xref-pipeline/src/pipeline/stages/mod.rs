use common::{
    error::AppError,
    storage::types::index_document::IndexDocument,
};
use rand::Rng;
use state_machines::core::GuardError;
use tracing::{debug, info, instrument, warn};

use crate::{
    report::{ExampleReport, QueryOutcome},
    sampler,
};

use super::{
    context::QueryContext,
    state::{CacheChecked, CacheReady, LookedUp, Loaded, QueryMachine, Ready, Reported, Sampled},
};

type StageResult<S> = Result<QueryMachine<(), S>, AppError>;

#[instrument(level = "trace", skip_all, fields(cache = %ctx.store.path().display()))]
pub async fn check_cache(
    machine: QueryMachine<(), Ready>,
    ctx: &mut QueryContext<'_>,
) -> StageResult<CacheChecked> {
    if ctx.request.force_refresh {
        ctx.needs_refresh = true;
        info!("refresh forced by request");
    } else if ctx.store.exists().await {
        let age = ctx.store.age().await?;
        ctx.cache_age = Some(age);
        ctx.needs_refresh = age > ctx.config.max_age;
        debug!(
            age_secs = age.as_secs(),
            max_age_secs = ctx.config.max_age.as_secs(),
            stale = ctx.needs_refresh,
            "cache record found"
        );
    } else {
        ctx.needs_refresh = true;
        debug!("no cache record on disk");
    }

    machine
        .check_cache()
        .map_err(|(_, guard)| map_guard_error("check_cache", &guard))
}

#[instrument(level = "trace", skip_all, fields(url = %ctx.config.index_url))]
pub async fn refresh_cache(
    machine: QueryMachine<(), CacheChecked>,
    ctx: &mut QueryContext<'_>,
) -> StageResult<CacheReady> {
    if !ctx.needs_refresh {
        return machine
            .reuse_cache()
            .map_err(|(_, guard)| map_guard_error("reuse_cache", &guard));
    }

    let body = match ctx.fetcher.fetch(&ctx.config.index_url).await {
        Ok(body) => body,
        Err(err) => {
            if ctx.config.serve_stale_on_error && ctx.store.exists().await {
                warn!(
                    url = %ctx.config.index_url,
                    age_secs = ctx.cache_age.map(|age| age.as_secs()),
                    error = %err,
                    "index refresh failed; serving stale cache record"
                );
                return machine
                    .reuse_cache()
                    .map_err(|(_, guard)| map_guard_error("reuse_cache", &guard));
            }
            return Err(err);
        }
    };

    ctx.store.write(&body).await?;
    info!(
        url = %ctx.config.index_url,
        bytes = body.len(),
        cache = %ctx.store.path().display(),
        "index refreshed"
    );

    machine
        .refresh()
        .map_err(|(_, guard)| map_guard_error("refresh", &guard))
}

#[instrument(level = "trace", skip_all, fields(cache = %ctx.store.path().display()))]
pub async fn load(
    machine: QueryMachine<(), CacheReady>,
    ctx: &mut QueryContext<'_>,
) -> StageResult<Loaded> {
    let raw = ctx.store.read().await?;
    let document = IndexDocument::load(&raw)?;
    debug!(
        classes = document.class_count(),
        bytes = raw.len(),
        "index document loaded"
    );
    ctx.document = Some(document);

    machine
        .load()
        .map_err(|(_, guard)| map_guard_error("load", &guard))
}

pub fn lookup(
    machine: QueryMachine<(), Loaded>,
    ctx: &mut QueryContext<'_>,
) -> StageResult<LookedUp> {
    let found = ctx
        .document()?
        .lookup(&ctx.request.class_name, ctx.language);
    debug!(
        class = %ctx.request.class_name,
        language = %ctx.language,
        total = found.as_ref().map(|lookup| lookup.total),
        "index lookup finished"
    );
    ctx.lookup = found;

    machine
        .lookup()
        .map_err(|(_, guard)| map_guard_error("lookup", &guard))
}

pub fn sample<R>(
    machine: QueryMachine<(), LookedUp>,
    ctx: &mut QueryContext<'_>,
    rng: &mut R,
) -> StageResult<Sampled>
where
    R: Rng + ?Sized,
{
    if let Some(found) = ctx.lookup.take() {
        ctx.total = found.total;
        ctx.examples = sampler::sample(
            found.entries,
            ctx.request.max_count,
            ctx.request.take_all,
            rng,
        );
    }

    machine
        .sample()
        .map_err(|(_, guard)| map_guard_error("sample", &guard))
}

pub fn report(
    machine: QueryMachine<(), Sampled>,
    ctx: &mut QueryContext<'_>,
) -> StageResult<Reported> {
    let sampled = !ctx.request.take_all && ctx.total > ctx.request.max_count;
    ctx.outcome = Some(QueryOutcome::Found(ExampleReport {
        class_name: ctx.request.class_name.clone(),
        language: ctx.language,
        total: ctx.total,
        requested: ctx.request.max_count,
        examples: std::mem::take(&mut ctx.examples),
        sampled,
    }));

    machine
        .report()
        .map_err(|(_, guard)| map_guard_error("report", &guard))
}

fn map_guard_error(event: &str, guard: &GuardError) -> AppError {
    AppError::InternalError(format!(
        "invalid example lookup transition during {event}: {guard:?}"
    ))
}
