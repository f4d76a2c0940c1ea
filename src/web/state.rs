use crate::image::PortraitSink;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub portraits: PortraitSink,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, portraits: PortraitSink) -> Self {
        Self { store, portraits }
    }
}
