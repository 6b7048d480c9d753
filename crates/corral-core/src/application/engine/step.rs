use std::fmt;

use crate::application::engine::context::RunContext;
use crate::error::CorralResult;

/// One named unit of scaffolding work.
///
/// Steps only talk to the target through the [`RunContext`], so the same
/// implementation runs against a recording overlay and the real filesystem.
/// They hold nothing but the configuration captured at assembly time.
pub trait Step: Send + Sync {
    /// Stable kebab-case identifier, used in reports and error messages.
    fn name(&self) -> &'static str;

    /// One line for previews.
    fn description(&self) -> String;

    fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()>;
}

/// Ordered list of steps produced by the assembler.
#[derive(Default)]
pub struct Plan {
    steps: Vec<Box<dyn Step>>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Step + 'static) {
        self.steps.push(Box::new(step));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Step> {
        self.steps.iter().map(|s| s.as_ref())
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").field("steps", &self.names()).finish()
    }
}

impl FromIterator<Box<dyn Step>> for Plan {
    fn from_iter<I: IntoIterator<Item = Box<dyn Step>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
