//! Shared application state for all routes. The route table is fixed once bootstrap returns.

use crate::config::Settings;
use crate::registry::RouteTable;
use crate::service::Executor;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn Executor>,
    pub routes: Arc<RouteTable>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(executor: Arc<dyn Executor>, routes: RouteTable, settings: Settings) -> Self {
        AppState {
            executor,
            routes: Arc::new(routes),
            settings: Arc::new(settings),
        }
    }
}
