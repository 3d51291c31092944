use std::sync::Arc;

use tabled::Table;

use crate::{
    config, error, info,
    management::SessionManager,
    pipeline,
    spotify::{features, playlist as playlist_api},
    store::{Selection, Store},
    success,
    types::MatchTableRow,
    warning,
};

/// Target size for the recommendations playlist.
const RECOMMENDATION_LIMIT: u32 = 50;

pub async fn playlist(selection: Selection, name: Option<String>, recommendations: bool) {
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

    let rows = match store.select_tracks(&selection) {
        Ok(rows) => rows,
        Err(e) => error!("Cannot query tracks: {}", e),
    };

    if rows.is_empty() {
        warning!("No stored tracks match {}.", selection.describe());
        return;
    }

    info!("Matching {} tracks against the catalog...", rows.len());

    let results = match pipeline::resolve_batch(&session, rows).await {
        Ok(results) => results,
        Err(e) => error!("Batch terminated: {}", e),
    };

    let table_rows: Vec<MatchTableRow> = results
        .iter()
        .map(|(track, result)| MatchTableRow {
            title: track.title.clone(),
            artist: track.artist.clone(),
            result: match result.track_id() {
                Some(id) => id.to_string(),
                None => "not found".to_string(),
            },
        })
        .collect();
    println!("{}", Table::new(table_rows));

    let (resolved, unresolved) = pipeline::partition(results);
    if !unresolved.is_empty() {
        warning!("{} tracks could not be resolved.", unresolved.len());
    }
    if resolved.is_empty() {
        warning!("Nothing to add; no tracks were resolved.");
        return;
    }

    let track_ids: Vec<String> = resolved.into_iter().map(|(_, id)| id).collect();
    let playlist_name = name.unwrap_or_else(|| format!("Chartsync: {}", selection.describe()));
    let description = format!("Created by chartsync from {}", selection.describe());

    let created = match playlist_api::create(&session, playlist_name, description).await {
        Ok(created) => created,
        Err(e) => error!("Failed to create playlist: {}", e),
    };

    if let Err(e) = playlist_api::add_tracks(&session, &created.id, &track_ids).await {
        error!("Failed to add tracks to playlist: {}", e);
    }
    success!("Added {} tracks to playlist {}.", track_ids.len(), created.name);

    if recommendations {
        let reco_ids =
            match features::get_recommendations(&session, &track_ids, RECOMMENDATION_LIMIT).await {
                Ok(ids) => ids,
                Err(e) => error!("Recommendation fetch failed: {}", e),
            };

        if reco_ids.is_empty() {
            warning!("No recommendations returned.");
            return;
        }

        let reco_name = format!("{} (recommendations)", created.name);
        let reco_description = format!("Recommendations seeded from {}", created.name);

        let reco_playlist = match playlist_api::create(&session, reco_name, reco_description).await
        {
            Ok(created) => created,
            Err(e) => error!("Failed to create recommendations playlist: {}", e),
        };

        if let Err(e) = playlist_api::add_tracks(&session, &reco_playlist.id, &reco_ids).await {
            error!("Failed to add recommended tracks: {}", e);
        }
        success!(
            "Added {} recommended tracks to playlist {}.",
            reco_ids.len(),
            reco_playlist.name
        );
    }
}
