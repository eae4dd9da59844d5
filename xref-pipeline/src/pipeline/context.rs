use std::time::Duration;

use common::{
    error::AppError,
    storage::{
        cache_store::CacheStore,
        types::{
            index_document::{IndexDocument, Lookup},
            language::Language,
        },
    },
};
use tracing::error;

use crate::{fetcher::IndexFetcher, report::QueryOutcome};

use super::config::{PipelineConfig, QueryRequest};

pub struct QueryContext<'a> {
    pub request: &'a QueryRequest,
    pub language: Language,
    pub config: &'a PipelineConfig,
    pub store: &'a CacheStore,
    pub fetcher: &'a dyn IndexFetcher,
    pub cache_age: Option<Duration>,
    pub needs_refresh: bool,
    pub document: Option<IndexDocument>,
    pub lookup: Option<Lookup>,
    pub total: usize,
    pub examples: Vec<String>,
    pub outcome: Option<QueryOutcome>,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        request: &'a QueryRequest,
        language: Language,
        config: &'a PipelineConfig,
        store: &'a CacheStore,
        fetcher: &'a dyn IndexFetcher,
    ) -> Self {
        Self {
            request,
            language,
            config,
            store,
            fetcher,
            cache_age: None,
            needs_refresh: false,
            document: None,
            lookup: None,
            total: 0,
            examples: Vec::new(),
            outcome: None,
        }
    }

    pub fn document(&self) -> Result<&IndexDocument, AppError> {
        self.document
            .as_ref()
            .ok_or_else(|| AppError::InternalError("index document expected to be loaded".into()))
    }

    pub fn take_outcome(&mut self) -> Result<QueryOutcome, AppError> {
        self.outcome
            .take()
            .ok_or_else(|| AppError::InternalError("query outcome expected after report".into()))
    }

    pub fn abort(&mut self, err: AppError) -> AppError {
        error!(
            class = %self.request.class_name,
            language = %self.language,
            cache = %self.store.path().display(),
            error = %err,
            "example lookup aborted"
        );
        err
    }
}
