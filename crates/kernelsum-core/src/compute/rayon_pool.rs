use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::consts::RAYON_CONTEXT_THREADS;
use crate::error::{KernelSumError, Result};

use super::{ContextKind, ExecutionContext, Task};

/// Runs both tasks on a private rayon pool.
///
/// The pool is sized so the spawned producer always has a worker of its own
/// while the consumer blocks on the channel.
pub struct RayonContext {
    pool: ThreadPool,
}

impl RayonContext {
    pub fn new() -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(RAYON_CONTEXT_THREADS)
            .thread_name(|i| format!("kernelsum-rayon-{i}"))
            .build()
            .map_err(|e| KernelSumError::Context(e.to_string()))?;
        Ok(Self { pool })
    }
}

impl ExecutionContext for RayonContext {
    fn name(&self) -> &str {
        ContextKind::Rayon.name()
    }

    fn kind(&self) -> ContextKind {
        ContextKind::Rayon
    }

    fn run_pair<'a>(&self, producer: Task<'a>, consumer: Task<'a>) -> Result<()> {
        let mut produced = Ok(());
        let mut consumed = Ok(());
        self.pool.scope(|scope| {
            let produced = &mut produced;
            scope.spawn(move |_| *produced = producer());
            consumed = consumer();
        });
        produced.and(consumed)
    }
}
