//! # CLI Module
//!
//! User-facing command implementations. Each command wires the store, the
//! credential session and the Spotify client together, handles progress
//! feedback and presents errors; the underlying logic lives in the
//! `charts`, `pipeline`, `spotify` and `store` modules.
//!
//! ## Commands
//!
//! - [`auth`] - interactive Spotify authorization flow
//! - [`update_charts`] - scrape chart pages into the local store
//! - [`update_features`] - match stored tracks and persist audio features
//! - [`playlist`] - build a playlist from a track selection, optionally
//!   followed by a recommendations playlist
//! - [`info`] - store statistics
//!
//! ## Usage patterns
//!
//! ```bash
//! chartsync auth                      # authorize once
//! chartsync charts                    # scrape chart source
//! chartsync features                  # match + fetch audio features
//! chartsync playlist --genre Techno   # build a playlist
//! ```

mod auth;
mod charts;
mod features;
mod info;
mod playlist;

pub use auth::auth;
pub use charts::update_charts;
pub use features::update_features;
pub use info::info;
pub use playlist::playlist;
