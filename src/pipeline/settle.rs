use rayon::prelude::*;

use crate::foundation::error::{ShopframeError, ShopframeResult};

/// Run `f` over every item in parallel and collect each outcome in input order.
///
/// One item failing never cancels the others; callers decide what a failed slot means.
pub fn settle_all<T, R, F>(items: &[T], f: F) -> Vec<ShopframeResult<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> ShopframeResult<R> + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Build the worker pool used for a render; `Some(0)` is rejected.
pub(crate) fn build_thread_pool(threads: Option<usize>) -> ShopframeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ShopframeError::validation(
            "render threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ShopframeError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/settle.rs"]
mod tests;
