use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::models::Dataset;
use crate::parsing::json_parser;
use crate::pipeline::config::PipelineConfig;

/// Result of running a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub dataset: Dataset,
    pub steps_applied: usize,
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Applies the steps of a [`PipelineConfig`] in order
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    config: PipelineConfig,
}

impl TransformPipeline {
    /// Create a pipeline from a parsed configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Create a pipeline from a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = PipelineConfig::from_file(path).context("Failed to load pipeline config")?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step on `dataset`
    ///
    /// # Returns
    /// PipelineResult with the final dataset and row counts
    pub fn run(&self, dataset: &Dataset) -> Result<PipelineResult> {
        let pipeline_name = self.config.name.as_deref().unwrap_or("unnamed");
        let rows_in = dataset.height();
        info!(
            "Running pipeline '{}': {} steps on {} rows x {} columns",
            pipeline_name,
            self.config.steps.len(),
            rows_in,
            dataset.width()
        );

        let mut current = dataset.clone();
        for (idx, step) in self.config.steps.iter().enumerate() {
            let (rows_before, cols_before) = (current.height(), current.width());
            current = step
                .apply(&current)
                .with_context(|| format!("Step {} ('{}') failed", idx, step.name()))?;
            info!(
                "Step {} '{}': {}x{} -> {}x{}",
                idx,
                step.name(),
                rows_before,
                cols_before,
                current.height(),
                current.width()
            );
        }

        let rows_out = current.height();
        Ok(PipelineResult {
            dataset: current,
            steps_applied: self.config.steps.len(),
            rows_in,
            rows_out,
        })
    }

    /// Parse a JSON dataset and run the pipeline on it
    pub fn process_json_str(&self, json_str: &str) -> Result<PipelineResult> {
        let dataset = json_parser::parse_dataset_json_str(json_str)
            .context("Failed to parse dataset JSON")?;
        self.run(&dataset)
    }

    /// Load a JSON dataset file and run the pipeline on it
    pub fn process_file(&self, dataset_path: &Path) -> Result<PipelineResult> {
        let dataset = json_parser::parse_dataset_json(dataset_path)?;
        self.run(&dataset)
    }
}
