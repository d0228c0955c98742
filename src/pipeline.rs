use crate::error::StreamError;
use crate::options::{HazardPolicy, StreamOptions};
use crate::source::DynSource;
use crate::stage::Stage;
use crate::type_token::Element;
use anyhow::Result;
use tracing::{debug, trace, warn};

/// -------- Pipeline: a source plus an ordered chain of stages --------
///
/// Each [`Stream`](crate::Stream) value owns exactly one pipeline and hands it
/// to the next value when an intermediate operation is declared, so stage
/// buffers are never reachable from two places.
pub struct Pipeline {
    source: Box<dyn DynSource>,
    source_done: bool,
    stages: Vec<Stage>,
    /// `stage.{index}.{name}.outputs`, one per stage.
    stage_counters: Vec<String>,
    options: StreamOptions,
    primed: bool,
    exhausted: bool,
}

impl Pipeline {
    pub(crate) fn new(source: Box<dyn DynSource>) -> Self {
        Self {
            source,
            source_done: false,
            stages: Vec::new(),
            stage_counters: Vec::new(),
            options: StreamOptions::default(),
            primed: false,
            exhausted: false,
        }
    }

    pub(crate) fn options(&self) -> &StreamOptions {
        &self.options
    }

    pub(crate) fn set_options(&mut self, options: StreamOptions) {
        self.options = options;
    }

    /// Append a stage, logging it and any infinite-source hazard it creates.
    pub(crate) fn push(&mut self, stage: Stage) {
        let index = self.stages.len();
        debug!(index, stage = stage.name(), "stage appended");
        self.stage_counters.push(format!("stage.{index}.{}.outputs", stage.name()));
        self.stages.push(stage);
        if self.options.hazard_policy == HazardPolicy::Warn
            && let Some(err) = self.hazards().into_iter().find(|h| {
                matches!(h, StreamError::UnboundedStatefulStage { index: i, .. } if *i == index)
            })
        {
            warn!(%err, "stateful stage will never terminate on this source");
        }
    }

    /// Number of stages after the source.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn is_source_infinite(&self) -> bool {
        self.source.is_infinite()
    }

    /// True if pulling to exhaustion never ends.
    ///
    /// That is the case when the source is infinite and no stage bounds it,
    /// and also when a stateful stage waits on an unbounded prefix even if a
    /// later `limit` follows it.
    pub fn is_unbounded(&self) -> bool {
        (self.source.is_infinite() && !self.stages.iter().any(Stage::is_short_circuit))
            || !self.hazards().is_empty()
    }

    /// `source -> stage -> stage` summary.
    pub fn describe(&self) -> String {
        let mut out = self.source.describe();
        for s in &self.stages {
            out.push_str(" -> ");
            out.push_str(s.name());
        }
        out
    }

    /// Stateful stages that sit behind an infinite source with no limit before them.
    pub fn hazards(&self) -> Vec<StreamError> {
        let mut bounded = !self.source.is_infinite();
        let mut found = Vec::new();
        for (index, stage) in self.stages.iter().enumerate() {
            if stage.is_short_circuit() {
                bounded = true;
            } else if !stage.is_stateless() && !bounded {
                found.push(StreamError::UnboundedStatefulStage {
                    index,
                    stage: stage.name(),
                });
            }
        }
        found
    }

    /// False once the pipeline has reported exhaustion.
    ///
    /// Exhaustion is discovered lazily by [`Pipeline::next_result`], so a
    /// `true` here does not promise another element.
    pub fn has_next(&self) -> bool {
        !self.exhausted
    }

    /// Produce the next output of the last stage.
    ///
    /// Walks a cursor up and down the chain: a stage with output feeds the
    /// stage after it; an exhausted stage closes the stage after it; a stage
    /// that needs input sends the cursor upstream, and stage 0 pulls from the
    /// source. Stages may consume many inputs per output or emit many outputs
    /// per input. An exhausted limit is never asked for more, so nothing
    /// upstream of it is pulled again.
    ///
    /// # Errors
    /// Propagates source failures, caller-closure failures, and
    /// [`StreamError::UnboundedStatefulStage`] under [`HazardPolicy::Fail`].
    pub fn next_result(&mut self) -> Result<Option<Element>> {
        if self.exhausted {
            return Ok(None);
        }
        if !self.primed {
            self.primed = true;
            if self.options.hazard_policy == HazardPolicy::Fail
                && let Some(err) = self.hazards().into_iter().next()
            {
                self.exhausted = true;
                return Err(err.into());
            }
        }

        let out = if self.stages.is_empty() {
            self.pull_source()?
        } else {
            self.pull_through()?
        };

        match out {
            Some(_) => self.count("elements_emitted"),
            None => {
                self.exhausted = true;
                trace!(pipeline = %self.describe(), "pipeline exhausted");
            }
        }
        Ok(out)
    }

    fn pull_through(&mut self) -> Result<Option<Element>> {
        let last = self.stages.len() - 1;
        let mut level = last;
        loop {
            if let Some(out) = self.stages[level].pull_next()? {
                self.count_stage(level);
                if level == last {
                    return Ok(Some(out));
                }
                self.stages[level + 1].accept(out);
                level += 1;
                continue;
            }
            if self.stages[level].is_exhausted() {
                if level == last {
                    return Ok(None);
                }
                self.stages[level + 1].close();
                level += 1;
                continue;
            }
            if level > 0 {
                level -= 1;
                continue;
            }
            match self.pull_source()? {
                Some(e) => self.stages[0].accept(e),
                None => self.stages[0].close(),
            }
        }
    }

    fn pull_source(&mut self) -> Result<Option<Element>> {
        if self.source_done {
            return Ok(None);
        }
        let next = self.source.produce()?;
        match next {
            Some(_) => self.count("source_pulls"),
            None => {
                self.source_done = true;
                trace!(source = %self.source.describe(), "source exhausted");
            }
        }
        Ok(next)
    }

    fn count_stage(&self, level: usize) {
        if let Some(m) = &self.options.metrics {
            m.increment_counter(&self.stage_counters[level], 1);
        }
    }

    fn count(&self, name: &str) {
        if let Some(m) = &self.options.metrics {
            m.increment_counter(name, 1);
        }
    }
}
