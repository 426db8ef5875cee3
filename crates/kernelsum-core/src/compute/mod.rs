mod context;
pub mod rayon_pool;
pub mod threads;

pub use context::{
    available_contexts, create_context, select_context, select_context_by, ContextInfo,
    ContextKind, ExecutionContext, Task,
};
