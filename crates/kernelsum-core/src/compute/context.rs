use std::fmt;
use std::sync::Arc;

use crate::error::{KernelSumError, Result};

use super::rayon_pool::RayonContext;
use super::threads::ThreadContext;

/// A unit of work scheduled on an execution context.
pub type Task<'a> = Box<dyn FnOnce() -> Result<()> + Send + 'a>;

/// Somewhere the producer and consumer of one frame can run side by side.
///
/// Both tasks must be able to make progress concurrently: the channel between
/// them is bounded, so running one to completion before the other would
/// stall as soon as the channel fills.
pub trait ExecutionContext: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn kind(&self) -> ContextKind;

    /// Run `producer` and `consumer` concurrently and wait for both.
    ///
    /// A producer error takes precedence over the consumer's, since a failed
    /// producer also closes the channel under the consumer.
    fn run_pair<'a>(&self, producer: Task<'a>, consumer: Task<'a>) -> Result<()>;
}

/// The kinds of execution context this build can provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContextKind {
    /// A dedicated two-worker rayon pool.
    Rayon,
    /// Scoped OS threads.
    Threads,
}

impl ContextKind {
    pub const ALL: [ContextKind; 2] = [ContextKind::Rayon, ContextKind::Threads];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rayon => "CPU/Rayon",
            Self::Threads => "CPU/Threads",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Description of one selectable context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextInfo {
    pub index: usize,
    pub name: String,
    pub kind: ContextKind,
    /// Concurrent tasks the context can run.
    pub threads: usize,
}

/// All contexts, in a stable order (sorted by name), so that an index given
/// on the command line always refers to the same context.
pub fn available_contexts() -> Vec<ContextInfo> {
    let mut kinds = ContextKind::ALL.to_vec();
    kinds.sort_by_key(|k| k.name());
    kinds
        .into_iter()
        .enumerate()
        .map(|(index, kind)| ContextInfo {
            index,
            name: kind.name().to_string(),
            kind,
            threads: 2,
        })
        .collect()
}

/// Construct a context of the given kind.
pub fn create_context(kind: ContextKind) -> Result<Arc<dyn ExecutionContext>> {
    Ok(match kind {
        ContextKind::Rayon => Arc::new(RayonContext::new()?),
        ContextKind::Threads => Arc::new(ThreadContext::new()),
    })
}

/// Select a context by its position in [`available_contexts`].
pub fn select_context(index: usize) -> Result<Arc<dyn ExecutionContext>> {
    let contexts = available_contexts();
    let info = contexts
        .get(index)
        .ok_or(KernelSumError::ContextIndexOutOfRange {
            requested: index + 1,
            available: contexts.len(),
        })?;
    create_context(info.kind)
}

/// Select the first context whose description satisfies `predicate`.
pub fn select_context_by<P>(predicate: P) -> Result<Arc<dyn ExecutionContext>>
where
    P: Fn(&ContextInfo) -> bool,
{
    let info = available_contexts()
        .into_iter()
        .find(|info| predicate(info))
        .ok_or(KernelSumError::NoMatchingContext)?;
    create_context(info.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_are_sorted_by_name() {
        let contexts = available_contexts();
        let names: Vec<_> = contexts.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        for (i, info) in contexts.iter().enumerate() {
            assert_eq!(info.index, i);
        }
    }

    #[test]
    fn index_past_end_is_an_error() {
        let available = available_contexts().len();
        match select_context(available) {
            Err(KernelSumError::ContextIndexOutOfRange {
                requested,
                available: a,
            }) => {
                assert_eq!(requested, available + 1);
                assert_eq!(a, available);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn select_by_kind() {
        let ctx = select_context_by(|info| info.kind == ContextKind::Threads).unwrap();
        assert_eq!(ctx.kind(), ContextKind::Threads);
        assert_eq!(ctx.name(), "CPU/Threads");
    }

    #[test]
    fn select_by_unmatched_predicate_fails() {
        assert!(matches!(
            select_context_by(|info| info.threads > 64),
            Err(KernelSumError::NoMatchingContext)
        ));
    }
}
