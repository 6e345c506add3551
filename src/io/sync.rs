use std::future::Future;

/// Submit a change to the store, then refresh from it whatever the outcome.
///
/// Local state has already been updated before this is called. The refresh
/// result is the source of truth for what gets shown next; the submission
/// result tells the caller whether to report a failure. There is no
/// cancellation, so of two overlapping submissions the one that finishes
/// last wins on the remote copy.
pub async fn submit_then_refresh<S, F, R>(submit: S, refresh: F) -> (S::Output, R::Output)
where
    S: Future,
    F: FnOnce() -> R,
    R: Future,
{
    let submitted = submit.await;
    let refreshed = refresh().await;
    (submitted, refreshed)
}
