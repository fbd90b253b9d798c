use std::sync::Arc;

use marketscope_rust_core::MarketGateway;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<MarketGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<MarketGateway>) -> Self {
        Self { gateway }
    }
}
