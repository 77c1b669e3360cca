use std::time::Instant;

/// Runs `f` on the UI thread and logs how long `task` took.
///
/// Catalog calls are short SQLite transactions, so they run inline rather
/// than on a worker.
pub fn run_blocking<F, T>(task: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let started = Instant::now();
    let result = f();
    log::debug!("{task} took {:?}", started.elapsed());
    result
}
