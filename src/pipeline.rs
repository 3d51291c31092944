//! Concurrent batch matching.
//!
//! Fans a batch of pending tracks out across a bounded worker pool, one
//! matcher call per track, and re-correlates the results by the stored
//! row they originated from. Completion order is irrelevant; the pending
//! track travels with its result. The pool is deliberately modest so the
//! search endpoint is not hammered hard enough to earn a soft-ban, and a
//! worker sleeping through a rate-limit backoff blocks only itself.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    Res,
    management::SharedSession,
    spotify::search,
    store::PendingTrack,
    types::{MatchResult, TrackQuery},
};

/// Worker-pool size: host parallelism, capped low on purpose.
pub fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .min(4)
}

/// Resolves a batch of pending tracks concurrently.
///
/// Returns one (track, result) pair per input in no particular order. A
/// fatal matcher error terminates the whole batch; rows already persisted
/// by the caller stay valid.
pub async fn resolve_batch(
    session: &SharedSession,
    pending: Vec<PendingTrack>,
) -> Res<Vec<(PendingTrack, MatchResult)>> {
    let semaphore = Arc::new(Semaphore::new(worker_count()));
    let mut handles = Vec::with_capacity(pending.len());

    for track in pending {
        let session = Arc::clone(session);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            let query = TrackQuery {
                title: track.title.clone(),
                artist: track.artist.clone(),
                year: track.year,
            };
            let result = search::search_track(&session, &query).await;
            (track, result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (track, result) = handle.await?;
        results.push((track, result?));
    }

    Ok(results)
}

/// Splits correlated results into resolved (with catalog id) and
/// unresolved tracks.
pub fn partition(
    results: Vec<(PendingTrack, MatchResult)>,
) -> (Vec<(PendingTrack, String)>, Vec<PendingTrack>) {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for (track, result) in results {
        match result {
            MatchResult::Found(id) => resolved.push((track, id)),
            MatchResult::NotFound => unresolved.push(track),
        }
    }

    (resolved, unresolved)
}
