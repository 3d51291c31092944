//! # Spotify Integration Module
//!
//! Client layer for the Spotify Web API operations chartsync needs:
//! catalog search with client-side artist matching, batch audio-feature
//! lookups, recommendations, playlist management and the OAuth
//! authorization-code flow.
//!
//! All catalog calls are executed through the resilient request layer in
//! [`request`], which owns the retry/backoff/rate-limit policy and the
//! 401-triggered token refresh. The submodules only build requests and
//! interpret successful payloads.
//!
//! ## Endpoints covered
//!
//! - `GET /search` - track search with market and pagination
//! - `GET /audio-features` - batch feature lookup (at most 100 ids)
//! - `GET /recommendations` - seeded recommendations (at most 5 seeds)
//! - `GET /me` - user profile for playlist ownership
//! - `POST /users/{user_id}/playlists` - playlist creation
//! - `POST /playlists/{playlist_id}/tracks` - adding tracks
//! - `POST /api/token` - authorization-code and refresh-token grants

pub mod auth;
pub mod features;
pub mod playlist;
pub mod request;
pub mod search;
