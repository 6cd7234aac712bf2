use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::Result;
use crate::types::{Context, Neighborhood};

pub mod alias_resolver;
pub mod alias_writer;
pub mod boundary_source;
pub mod name_extractor;

/// One stage of the alias job. Each step takes the context the previous one
/// produced.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    async fn execute(&self, ctx: Context) -> Result<Context>;

    fn step_name(&self) -> &'static str;
}

pub struct BoundarySourceStep {
    http: Arc<dyn HttpClientPort>,
    endpoint: String,
    cache_path: PathBuf,
    refresh: bool,
}

impl BoundarySourceStep {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        endpoint: String,
        cache_path: PathBuf,
        refresh: bool,
    ) -> Self {
        Self { http, endpoint, cache_path, refresh }
    }
}

#[async_trait]
impl PipelineStep for BoundarySourceStep {
    async fn execute(&self, _ctx: Context) -> Result<Context> {
        boundary_source::obtain(&*self.http, &self.endpoint, &self.cache_path, self.refresh).await
    }

    fn step_name(&self) -> &'static str {
        "boundary_source"
    }
}

pub struct NameExtractStep;

#[async_trait]
impl PipelineStep for NameExtractStep {
    async fn execute(&self, ctx: Context) -> Result<Context> {
        name_extractor::extract(ctx).await
    }

    fn step_name(&self) -> &'static str {
        "name_extract"
    }
}

pub struct AliasResolveStep {
    pub source_path: PathBuf,
}

#[async_trait]
impl PipelineStep for AliasResolveStep {
    async fn execute(&self, ctx: Context) -> Result<Context> {
        // the csv reader is synchronous; keep it off the async workers
        let source_path = self.source_path.clone();
        tokio::task::spawn_blocking(move || alias_resolver::resolve(&source_path, ctx)).await?
    }

    fn step_name(&self) -> &'static str {
        "alias_resolve"
    }
}

pub struct AliasWriteStep {
    pub final_path: PathBuf,
}

#[async_trait]
impl PipelineStep for AliasWriteStep {
    async fn execute(&self, ctx: Context) -> Result<Context> {
        alias_writer::write(&self.final_path, ctx).await
    }

    fn step_name(&self) -> &'static str {
        "alias_write"
    }
}

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub final_path: Option<PathBuf>,
    pub neighborhoods: Vec<Neighborhood>,
    pub aliased: usize,
    pub unaliased: usize,
}

impl PipelineResult {
    pub fn unaliased_names(&self) -> Vec<&str> {
        self.neighborhoods
            .iter()
            .filter(|n| !n.has_alias())
            .map(|n| n.name.as_str())
            .collect()
    }
}

pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn PipelineStep>>) -> Self {
        Self { steps }
    }

    /// Boundary source, name extraction, one resolve pass per configured
    /// source file in order, then the writer.
    pub fn from_config(config: &Config, http: Arc<dyn HttpClientPort>, refresh: bool) -> Self {
        let mut steps: Vec<Box<dyn PipelineStep>> = vec![
            Box::new(BoundarySourceStep::new(
                http,
                config.endpoint(),
                config.cache_path.clone(),
                refresh,
            )),
            Box::new(NameExtractStep),
        ];
        for source_path in &config.source_paths {
            steps.push(Box::new(AliasResolveStep {
                source_path: source_path.clone(),
            }));
        }
        steps.push(Box::new(AliasWriteStep {
            final_path: config.output_path.clone(),
        }));
        Self::new(steps)
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    /// Runs every step in order; the first failure aborts the run.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineResult> {
        info!("Pipeline steps: {}", self.step_names().join(" -> "));
        let mut ctx = Context::default();
        for (i, step) in self.steps.iter().enumerate() {
            info!("Step {}/{}: {}", i + 1, self.steps.len(), step.step_name());
            ctx = step.execute(ctx).await?;
        }

        let aliased = ctx.aliased_count();
        let unaliased = ctx.neighborhoods.len() - aliased;
        info!("Pipeline finished: {} aliased, {} without alias", aliased, unaliased);

        Ok(PipelineResult {
            final_path: ctx.final_path,
            neighborhoods: ctx.neighborhoods,
            aliased,
            unaliased,
        })
    }
}
