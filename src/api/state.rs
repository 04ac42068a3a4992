use std::sync::Arc;

use crate::assets::AssetResolver;
use crate::fetch::PlayerSource;
use crate::projector::HistoryProjector;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PlayerSource>,
    pub projector: Arc<HistoryProjector>,
    pub assets: Arc<AssetResolver>,
    /// Allowed CORS origin, `*` for any.
    pub cors_origin: Arc<str>,
}

impl AppState {
    pub fn new(source: Arc<dyn PlayerSource>, projector: HistoryProjector, assets: AssetResolver) -> Self {
        Self {
            source,
            projector: Arc::new(projector),
            assets: Arc::new(assets),
            cors_origin: Arc::from("*"),
        }
    }

    pub fn with_cors_origin(mut self, origin: &str) -> Self {
        self.cors_origin = Arc::from(origin);
        self
    }
}
