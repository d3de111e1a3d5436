use std::sync::Arc;

use service::generation::GenerationService;
use service::items::ItemRepository;

/// Shared handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub items: Arc<dyn ItemRepository>,
    pub generation: Arc<GenerationService>,
}

impl ServerState {
    pub fn new(items: Arc<dyn ItemRepository>, generation: GenerationService) -> Self {
        Self { items, generation: Arc::new(generation) }
    }
}
