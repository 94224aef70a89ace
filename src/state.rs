use std::sync::Arc;

use crate::config::Config;
use crate::store::SharedStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    /// `None` when the datastore is not configured.
    pub store: Option<SharedStore>,
}
