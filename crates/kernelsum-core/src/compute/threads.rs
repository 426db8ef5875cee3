use std::thread;

use crate::error::{KernelSumError, Result};

use super::{ContextKind, ExecutionContext, Task};

/// Runs the producer on a scoped OS thread and the consumer on the caller's.
#[derive(Debug, Default)]
pub struct ThreadContext;

impl ThreadContext {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionContext for ThreadContext {
    fn name(&self) -> &str {
        ContextKind::Threads.name()
    }

    fn kind(&self) -> ContextKind {
        ContextKind::Threads
    }

    fn run_pair<'a>(&self, producer: Task<'a>, consumer: Task<'a>) -> Result<()> {
        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("kernelsum-producer".into())
                .spawn_scoped(scope, producer)?;
            let consumed = consumer();
            let produced = handle
                .join()
                .map_err(|_| KernelSumError::Context("producer task panicked".into()))?;
            produced.and(consumed)
        })
    }
}
