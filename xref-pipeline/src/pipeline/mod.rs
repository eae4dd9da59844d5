mod config;
mod context;
mod stages;
mod state;


pub use config::{PipelineConfig, QueryRequest, DEFAULT_SAMPLE_SIZE};

use std::sync::Arc;

use common::{
    error::AppError,
    storage::{cache_store::CacheStore, types::language::Language},
    utils::config::AppConfig,
};
use rand::Rng;
use tracing::{info, instrument};

use crate::{
    fetcher::{HttpFetcher, IndexFetcher},
    report::QueryOutcome,
};

use self::{context::QueryContext, state::ready};

/// Ensure-fresh-cache, load, lookup, sample and report for a single query.
pub struct XrefPipeline {
    config: PipelineConfig,
    store: CacheStore,
    fetcher: Arc<dyn IndexFetcher>,
}

impl XrefPipeline {
    pub fn new(app_config: &AppConfig) -> Result<Self, AppError> {
        let config = PipelineConfig::from_app_config(app_config)?;
        let store = CacheStore::for_url(app_config.resolved_cache_dir(), &config.index_url)?;
        let fetcher = HttpFetcher::new(app_config.request_timeout())?;

        Ok(Self::with_fetcher(config, store, Arc::new(fetcher)))
    }

    pub fn with_fetcher(
        config: PipelineConfig,
        store: CacheStore,
        fetcher: Arc<dyn IndexFetcher>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.store
    }

    /// Run one query. An unsupported language or a missing (class, language)
    /// pair is a normal outcome; transport, parse and I/O failures are errors.
    #[instrument(
        skip_all,
        fields(class = %request.class_name, language = %request.language)
    )]
    pub async fn run<R>(&self, request: &QueryRequest, rng: &mut R) -> Result<QueryOutcome, AppError>
    where
        R: Rng + ?Sized,
    {
        let language = match request.language.parse::<Language>() {
            Ok(language) => language,
            Err(AppError::UnsupportedLanguage { requested, .. }) => {
                info!(%requested, "language not supported; skipping lookup");
                return Ok(QueryOutcome::UnsupportedLanguage {
                    requested,
                    supported: Language::ALL.to_vec(),
                });
            }
            Err(err) => return Err(err),
        };

        if request.max_count == 0 {
            return Err(AppError::Validation(
                "the number of examples to show must be at least 1".into(),
            ));
        }

        let mut ctx = QueryContext::new(
            request,
            language,
            &self.config,
            &self.store,
            self.fetcher.as_ref(),
        );

        match Self::drive(&mut ctx, rng).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => Err(ctx.abort(err)),
        }
    }

    async fn drive<R>(ctx: &mut QueryContext<'_>, rng: &mut R) -> Result<QueryOutcome, AppError>
    where
        R: Rng + ?Sized,
    {
        let machine = ready();
        let machine = stages::check_cache(machine, ctx).await?;
        let machine = stages::refresh_cache(machine, ctx).await?;
        let machine = stages::load(machine, ctx).await?;
        let machine = stages::lookup(machine, ctx)?;

        if ctx.lookup.is_none() {
            info!(
                class = %ctx.request.class_name,
                language = %ctx.language,
                "no examples for this combination"
            );
            return Ok(QueryOutcome::NoExamples {
                class_name: ctx.request.class_name.clone(),
                language: ctx.language,
            });
        }

        let machine = stages::sample(machine, ctx, rng)?;
        let machine = stages::report(machine, ctx)?;

        drop(machine);

        let outcome = ctx.take_outcome()?;
        info!(
            total = outcome.total(),
            shown = outcome.examples().len(),
            refreshed = ctx.needs_refresh,
            "example lookup complete"
        );
        Ok(outcome)
    }
}
