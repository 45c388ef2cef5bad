use std::sync::Arc;

use anyhow::Result;

use super::{config::Config, database::init_mongo};
use crate::database::DocumentCollection;

pub struct AppState {
    pub config: Config,
    pub items: Arc<dyn DocumentCollection>,
    pub clock_in: Arc<dyn DocumentCollection>,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;

        let collections = init_mongo(&config).await?;

        Ok(Self::with_collections(
            config,
            Arc::new(collections.items),
            Arc::new(collections.clock_in),
        ))
    }

    pub fn with_collections(
        config: Config,
        items: Arc<dyn DocumentCollection>,
        clock_in: Arc<dyn DocumentCollection>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            items,
            clock_in,
        })
    }
}
