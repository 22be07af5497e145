//! Application state shared by all handlers.

use fylz_core::Config;
use fylz_services::{ListAggregator, Storage, TransferGateway, TtlPolicy};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub gateway: TransferGateway,
    pub listing: ListAggregator,
}

impl AppState {
    /// Wire every component to the same storage backend.
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let gateway = TransferGateway::new(storage.clone(), TtlPolicy::default());
        let listing = ListAggregator::new(storage.clone());
        Self {
            config,
            storage,
            gateway,
            listing,
        }
    }
}
