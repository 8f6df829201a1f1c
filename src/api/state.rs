//! State shared by every handler.

use crate::app::App;
use crate::jobs::JobStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub jobs: JobStore,
}

impl AppState {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            jobs: JobStore::new(),
        }
    }
}
