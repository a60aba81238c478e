use crate::library::logger::interface::Logger;
use crate::result_display::interface::{AnalysisView, ErrorView, GalleryItem, ResultDisplay};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub enum DisplayCall {
    Analysis(AnalysisView),
    Error(ErrorView),
    Gallery(Vec<GalleryItem>),
}

/// Records every call so tests can inspect what the user would have seen.
pub struct ResultDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl ResultDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("fake"),
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<DisplayCall>>> {
        self.calls.clone()
    }

    fn record(&self, call: DisplayCall) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.calls
            .lock()
            .map_err(|_| "fake display lock poisoned")?
            .push(call);
        Ok(())
    }
}

impl ResultDisplay for ResultDisplayFake {
    fn show_analysis(&mut self, view: AnalysisView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("ResultDisplayFake::show_analysis({})", view.label))?;
        self.record(DisplayCall::Analysis(view))
    }

    fn show_error(&mut self, view: ErrorView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("ResultDisplayFake::show_error({})", view.message))?;
        self.record(DisplayCall::Error(view))
    }

    fn show_gallery(&mut self, items: Vec<GalleryItem>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("ResultDisplayFake::show_gallery({})", items.len()))?;
        self.record(DisplayCall::Gallery(items))
    }
}
