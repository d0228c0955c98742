//! Human- and machine-readable description of a declared pipeline.
//!
//! [`Stream::explain`] never pulls from the source; it only inspects the
//! declared stages. The result prints as a boxed report via `Display` and
//! serializes to JSON for tooling.

use crate::Stream;
use crate::stage::StageClass;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// A declared pipeline, stage by stage.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineExplanation {
    /// Description of the source.
    pub source: String,
    /// Whether the source never reports exhaustion on its own.
    pub infinite_source: bool,
    /// Stages in pull order.
    pub steps: Vec<ExplainStep>,
    /// Stateful stages that would never terminate, rendered as messages.
    pub hazards: Vec<String>,
    pub stateless_stages: usize,
    pub stateful_stages: usize,
}

/// One stage in a [`PipelineExplanation`].
#[derive(Debug, Clone, Serialize)]
pub struct ExplainStep {
    /// Zero-based position after the source.
    pub step: usize,
    pub kind: &'static str,
    pub class: StageClass,
    pub detail: String,
}

impl PipelineExplanation {
    /// JSON form of the explanation.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// True if no stage is a termination hazard.
    pub fn is_safe(&self) -> bool {
        self.hazards.is_empty()
    }
}

impl<T: 'static> Stream<T> {
    /// Describe the declared pipeline without evaluating it.
    ///
    /// ```
    /// use ironstream::Stream;
    /// let s = Stream::iterate(1, |x| x + 1).distinct().limit(3);
    /// let plan = s.explain();
    /// assert_eq!(plan.steps.len(), 2);
    /// assert!(!plan.is_safe());
    /// ```
    #[must_use]
    pub fn explain(&self) -> PipelineExplanation {
        let pipeline = &self.pipeline;
        let mut stateless_stages = 0;
        let mut stateful_stages = 0;
        let steps = pipeline
            .stages()
            .iter()
            .enumerate()
            .map(|(step, stage)| {
                if stage.is_stateless() {
                    stateless_stages += 1;
                } else {
                    stateful_stages += 1;
                }
                ExplainStep {
                    step,
                    kind: stage.name(),
                    class: stage.class(),
                    detail: stage.detail(),
                }
            })
            .collect();
        PipelineExplanation {
            source: pipeline.source_description(),
            infinite_source: pipeline.is_source_infinite(),
            steps,
            hazards: pipeline.hazards().iter().map(ToString::to_string).collect(),
            stateless_stages,
            stateful_stages,
        }
    }
}

impl Display for PipelineExplanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(
            f,
            "╔═══════════════════════════════════════════════════════════════╗"
        )?;
        writeln!(
            f,
            "║                    PIPELINE EXPLANATION                       ║"
        )?;
        writeln!(
            f,
            "╚═══════════════════════════════════════════════════════════════╝"
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "┌─ SOURCE ─────────────────────────────────────────────────────┐"
        )?;
        writeln!(f, "│ {}", self.source)?;
        writeln!(
            f,
            "│ Infinite:          {:>10}",
            if self.infinite_source { "yes" } else { "no" }
        )?;
        writeln!(f, "│ Stateless Stages:  {:>10}", self.stateless_stages)?;
        writeln!(f, "│ Stateful Stages:   {:>10}", self.stateful_stages)?;
        writeln!(
            f,
            "└──────────────────────────────────────────────────────────────┘"
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "┌─ STAGES ─────────────────────────────────────────────────────┐"
        )?;
        for step in &self.steps {
            let marker = match step.class {
                StageClass::Stateful => " [STATEFUL]",
                StageClass::ShortCircuit => " [SHORT-CIRCUIT]",
                StageClass::Stateless => "",
            };
            writeln!(f, "│")?;
            writeln!(f, "│ Step {}: {}{}", step.step, step.kind, marker)?;
            writeln!(f, "│   {}", step.detail)?;
        }
        writeln!(f, "│")?;
        writeln!(
            f,
            "└──────────────────────────────────────────────────────────────┘"
        )?;

        if !self.hazards.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "┌─ HAZARDS ────────────────────────────────────────────────────┐"
            )?;
            for h in &self.hazards {
                writeln!(f, "│ • {h}")?;
            }
            writeln!(
                f,
                "└──────────────────────────────────────────────────────────────┘"
            )?;
        }
        Ok(())
    }
}
