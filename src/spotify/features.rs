//! Batch audio-feature and recommendation lookups.

use crate::{
    Res, config,
    management::SharedSession,
    spotify::request,
    types::{AudioFeatures, AudioFeaturesResponse, RecommendationsResponse},
    utils,
};

/// Hard limit of the audio-features endpoint; callers chunk their id lists.
pub const FEATURE_BATCH_LIMIT: usize = 100;

/// Maximum number of seed tracks the recommendations endpoint accepts.
pub const SEED_LIMIT: usize = 5;

/// Aligns a feature response with the requested id list.
///
/// The endpoint returns one entry per input id in input order, `null` for
/// ids without an available analysis. Missing entries become empty records
/// so the caller always gets exactly one record per id.
pub fn align_features(requested: usize, entries: Vec<Option<AudioFeatures>>) -> Vec<AudioFeatures> {
    let mut aligned: Vec<AudioFeatures> = entries
        .into_iter()
        .map(|entry| entry.unwrap_or_default())
        .collect();
    aligned.resize_with(requested, AudioFeatures::default);
    aligned
}

/// Fetches audio features for up to [`FEATURE_BATCH_LIMIT`] track ids,
/// preserving input order.
pub async fn get_audio_features(
    session: &SharedSession,
    track_ids: &[String],
) -> Res<Vec<AudioFeatures>> {
    if track_ids.is_empty() {
        return Ok(Vec::new());
    }
    if track_ids.len() > FEATURE_BATCH_LIMIT {
        return Err(format!(
            "feature batch of {} exceeds the {}-id limit",
            track_ids.len(),
            FEATURE_BATCH_LIMIT
        )
        .into());
    }

    let api_url = format!(
        "{url}/audio-features?ids={ids}",
        url = config::spotify_apiurl(),
        ids = track_ids.join(",")
    );

    let response =
        request::send(session, |client, token| client.get(&api_url).bearer_auth(token)).await?;
    let body = response.json::<AudioFeaturesResponse>().await?;

    Ok(align_features(track_ids.len(), body.audio_features))
}

/// Fetches recommendations seeded from the given resolved track ids.
///
/// At most [`SEED_LIMIT`] seeds are sent; when more ids are available the
/// seeds are sampled at random. Any non-2xx response is fatal via the
/// request layer.
pub async fn get_recommendations(
    session: &SharedSession,
    track_ids: &[String],
    limit: u32,
) -> Res<Vec<String>> {
    let seeds = utils::sample_seeds(track_ids, SEED_LIMIT);
    if seeds.is_empty() {
        return Ok(Vec::new());
    }

    let api_url = format!("{}/recommendations", config::spotify_apiurl());
    let seed_param = seeds.join(",");
    let limit_param = limit.to_string();
    let market = config::spotify_market();

    let response = request::send(session, |client, token| {
        client
            .get(&api_url)
            .query(&[
                ("seed_tracks", seed_param.as_str()),
                ("limit", limit_param.as_str()),
                ("market", market.as_str()),
            ])
            .bearer_auth(token)
    })
    .await?;

    let body = response.json::<RecommendationsResponse>().await?;
    Ok(body.tracks.into_iter().map(|t| t.id).collect())
}
