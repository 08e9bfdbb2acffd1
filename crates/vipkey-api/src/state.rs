use std::path::PathBuf;
use std::sync::Arc;

use vipkey_core::AuthConfigSource;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthConfigSource>,
}

impl AppState {
    pub fn new(auth_file: impl Into<PathBuf>) -> Self {
        Self {
            auth: Arc::new(AuthConfigSource::new(auth_file)),
        }
    }
}
