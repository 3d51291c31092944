use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config, error, info,
    management::SessionManager,
    pipeline,
    spotify::features,
    store::{BATCH_CAP, Store},
    success, warning,
};

pub async fn update_features(limit: Option<u32>) {
    let store = match Store::open(&config::database_path()) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database: {}", e),
    };

    let session = match SessionManager::load().await {
        Ok(session) => Arc::new(session),
        Err(e) => {
            error!(
                "Failed to load credentials. Please run chartsync auth\n Error: {}",
                e
            );
        }
    };

    let pending = match store.tracks_missing_features(limit.unwrap_or(BATCH_CAP)) {
        Ok(pending) => pending,
        Err(e) => error!("Cannot query pending tracks: {}", e),
    };

    if pending.is_empty() {
        success!("Nothing to update here.");
        return;
    }

    info!(
        "Matching {} tracks against the catalog ({} workers)...",
        pending.len(),
        pipeline::worker_count()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_message("Resolving tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let results = match pipeline::resolve_batch(&session, pending).await {
        Ok(results) => results,
        Err(e) => {
            pb.finish_and_clear();
            error!("Batch terminated: {}", e);
        }
    };
    pb.finish_and_clear();

    let (resolved, unresolved) = pipeline::partition(results);
    success!(
        "Resolved {} tracks, {} not found.",
        resolved.len(),
        unresolved.len()
    );

    // one row per commit; a bad row is isolated from the rest of the batch
    for chunk in resolved.chunks(features::FEATURE_BATCH_LIMIT) {
        let ids: Vec<String> = chunk.iter().map(|(_, id)| id.clone()).collect();
        let fetched = match features::get_audio_features(&session, &ids).await {
            Ok(fetched) => fetched,
            Err(e) => error!("Feature fetch failed: {}", e),
        };

        for ((track, _), feature) in chunk.iter().zip(fetched.iter()) {
            if let Err(e) = store.insert_features(track.id, Some(feature)) {
                warning!("Cannot store features for {}: {}", track.title, e);
            }
        }
    }

    // unresolved tracks get an all-null row so the next run skips them
    for track in &unresolved {
        if let Err(e) = store.insert_features(track.id, None) {
            warning!("Cannot store placeholder for {}: {}", track.title, e);
        }
    }

    success!("Feature rows written.");
}
