use std::sync::Arc;

use tracing::info;

use crate::{api::ApiClient, config::Config, error::ApiError};

pub struct State {
    pub config: Config,
    pub client: ApiClient,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, ApiError> {
        let client = ApiClient::new(&config.api_url)?;
        info!("Using poll backend at {}", client.base_url());

        Ok(Arc::new(Self { config, client }))
    }
}
