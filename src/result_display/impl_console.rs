use crate::library::logger::interface::Logger;
use crate::result_display::interface::{AnalysisView, ErrorView, GalleryItem, ResultDisplay};
use std::error::Error;
use std::sync::Arc;

const WIDTH: usize = 40;

pub struct ResultDisplayConsole {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ResultDisplayConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("console"),
        }
    }

    fn render_box(&self, lines: &[String]) {
        println!("┌{}┐", "─".repeat(WIDTH));
        for line in lines {
            let text: String = line.chars().take(WIDTH).collect();
            let padding = WIDTH - text.chars().count();
            println!("│{}{}│", text, " ".repeat(padding));
        }
        println!("└{}┘", "─".repeat(WIDTH));
    }
}

impl ResultDisplay for ResultDisplayConsole {
    fn show_analysis(&mut self, view: AnalysisView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("Showing analysis")?;
        self.render_box(&[
            format!(
                "{}: {}x{}",
                view.original_heading,
                view.original.width(),
                view.original.height()
            ),
            format!(
                "{}: {}x{}",
                view.result_heading,
                view.annotated.width(),
                view.annotated.height()
            ),
            format!("Road quality: {}", view.label),
        ]);
        Ok(())
    }

    fn show_error(&mut self, view: ErrorView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.error(&view.message)?;
        let mut lines = vec![];
        if let Some(original) = &view.original {
            lines.push(format!(
                "{}: {}x{}",
                view.original_heading,
                original.width(),
                original.height()
            ));
        }
        lines.push(format!("🚨 {}", view.message));
        self.render_box(&lines);
        Ok(())
    }

    fn show_gallery(&mut self, items: Vec<GalleryItem>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines: Vec<String> = items
            .iter()
            .map(|item| match &item.thumbnail {
                Some(thumbnail) => format!(
                    "{}: {}x{}",
                    item.caption,
                    thumbnail.width(),
                    thumbnail.height()
                ),
                None => format!("{}: unavailable", item.caption),
            })
            .collect();
        self.render_box(&lines);
        Ok(())
    }
}
