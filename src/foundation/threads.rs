use crate::foundation::error::{HerodoError, HerodoResult};

/// Build a rayon pool, `threads = None` meaning rayon's default sizing.
pub(crate) fn build_thread_pool(threads: Option<usize>) -> HerodoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HerodoError::invalid_argument(
            "worker 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HerodoError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/threads.rs"]
mod tests;
