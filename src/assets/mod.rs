//! Static front-end bundle with single-page-app fallback.
//!
//! Paths resolve against the configured directory. Anything that does not
//! name a file gets the index document with status 200 so the client-side
//! router can take over. Directory paths, with or without a trailing slash,
//! are not redirected and get the index too. No directory listings; MIME
//! types come from the file extension.

use tower_http::services::{ServeDir, ServeFile};

use crate::config::AssetsConfig;

/// Service serving the bundle, falling back to the index document.
pub type SpaService = ServeDir<ServeFile>;

/// Build the asset service for `config`.
pub fn spa_service(config: &AssetsConfig) -> SpaService {
    ServeDir::new(&config.dir)
        .append_index_html_on_directories(false)
        .fallback(ServeFile::new(config.index_path()))
}
