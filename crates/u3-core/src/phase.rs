// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Phase Series
// ─────────────────────────────────────────────────────────────────────
//! Runs the field pipeline once per phase.
//!
//! Every phase is an isolated unit of work: it gets its own evaluator,
//! its own normalization scope and its own `Result`. An invalid phase is
//! reported in its outcome and never stops the phases after it.

use rayon::prelude::*;
use serde::Serialize;

use u3_physics::DensityEvaluator;
use u3_types::{Phase, U3Result};

use crate::pipeline::{FieldPipeline, RadialProfile, RenderFrame};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseResult {
    pub frame: RenderFrame,
    /// `None` when the pipeline has no profile axis.
    pub profile: Option<RadialProfile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub index: usize,
    pub name: String,
    pub result: U3Result<PhaseResult>,
}

impl PhaseOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// An ordered list of phases bound to one pipeline.
#[derive(Debug, Clone)]
pub struct PhaseSeries {
    pipeline: FieldPipeline,
    phases: Vec<Phase>,
}

impl PhaseSeries {
    pub fn new(pipeline: FieldPipeline, phases: Vec<Phase>) -> Self {
        Self { pipeline, phases }
    }

    pub fn pipeline(&self) -> &FieldPipeline {
        &self.pipeline
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// One outcome per phase, in input order.
    pub fn run(&self) -> Vec<PhaseOutcome> {
        let parallel = self.pipeline.config().parallel;
        log::info!(
            "phase series: {} phases, parallel={parallel}",
            self.phases.len()
        );
        let outcomes: Vec<PhaseOutcome> = if parallel {
            self.phases
                .par_iter()
                .enumerate()
                .map(|(index, phase)| self.run_phase(index, phase))
                .collect()
        } else {
            self.phases
                .iter()
                .enumerate()
                .map(|(index, phase)| self.run_phase(index, phase))
                .collect()
        };

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        log::info!(
            "phase series done: {} phases, {} failed",
            outcomes.len(),
            failed
        );
        outcomes
    }

    /// Run a single phase outside the series.
    pub fn run_phase(&self, index: usize, phase: &Phase) -> PhaseOutcome {
        let result = self.evaluate_phase(phase);
        match &result {
            Ok(res) => log::debug!(
                "phase {index} '{}': {} ({} points, degenerate={})",
                phase.name,
                phase.params.describe(),
                res.frame.field.len(),
                res.frame.field.degenerate
            ),
            Err(e) => log::error!("phase {index} '{}' failed: {e}", phase.name),
        }
        PhaseOutcome {
            index,
            name: phase.name.clone(),
            result,
        }
    }

    fn evaluate_phase(&self, phase: &Phase) -> U3Result<PhaseResult> {
        let evaluator = DensityEvaluator::from_parameters(&phase.params)?
            .with_parallel(self.pipeline.config().parallel);
        let frame = self.pipeline.render_with(&evaluator)?;
        let profile = self.pipeline.profile_with(&evaluator)?;
        Ok(PhaseResult { frame, profile })
    }
}
