//! Playlist creation and track management.

use crate::{
    Res, config,
    management::SharedSession,
    spotify::request,
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse,
        UserProfile,
    },
    utils,
};

/// Maximum number of track URIs accepted by one add-tracks call.
pub const ADD_TRACKS_CHUNK: usize = 100;

/// Resolves the authenticated user's id for playlist ownership.
pub async fn current_user_id(session: &SharedSession) -> Res<String> {
    let api_url = format!("{}/me", config::spotify_apiurl());
    let response =
        request::send(session, |client, token| client.get(&api_url).bearer_auth(token)).await?;
    let profile = response.json::<UserProfile>().await?;
    Ok(profile.id)
}

/// Creates a public playlist and returns its id and name.
pub async fn create(
    session: &SharedSession,
    name: String,
    description: String,
) -> Res<CreatePlaylistResponse> {
    let user_id = current_user_id(session).await?;
    let api_url = format!(
        "{url}/users/{user_id}/playlists",
        url = config::spotify_apiurl(),
        user_id = user_id
    );

    let body = CreatePlaylistRequest {
        name,
        description,
        public: true,
        collaborative: false,
    };

    let response = request::send(session, |client, token| {
        client.post(&api_url).bearer_auth(token).json(&body)
    })
    .await?;

    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Adds resolved tracks to a playlist, chunked to the endpoint limit.
pub async fn add_tracks(session: &SharedSession, playlist_id: &str, track_ids: &[String]) -> Res<()> {
    let api_url = format!(
        "{url}/playlists/{id}/tracks",
        url = config::spotify_apiurl(),
        id = playlist_id
    );

    for chunk in track_ids.chunks(ADD_TRACKS_CHUNK) {
        let body = AddTracksRequest {
            uris: chunk.iter().map(|id| utils::track_uri(id)).collect(),
        };

        let response = request::send(session, |client, token| {
            client.post(&api_url).bearer_auth(token).json(&body)
        })
        .await?;

        response.json::<AddTracksResponse>().await?;
    }

    Ok(())
}
