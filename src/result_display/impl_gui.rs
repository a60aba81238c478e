use crate::app::Request;
use crate::config::Config;
use crate::result_display::interface::{AnalysisView, ErrorView, GalleryItem, ResultDisplay};
use eframe::egui;
use image::RgbImage;
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 136, 229);
const FOOTER_COLOR: egui::Color32 = egui::Color32::from_rgb(117, 117, 117);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(211, 47, 47);

/// What the window currently shows. Written by the request worker, read by
/// the window every frame.
#[derive(Default)]
pub struct GuiView {
    pub generation: u64,
    pub busy: bool,
    pub analysis: Option<AnalysisView>,
    pub error: Option<ErrorView>,
    pub gallery: Vec<GalleryItem>,
}

pub struct ResultDisplayGui {
    view: Arc<Mutex<GuiView>>,
}

impl ResultDisplayGui {
    pub fn new() -> Self {
        Self {
            view: Arc::new(Mutex::new(GuiView::default())),
        }
    }

    pub fn view(&self) -> Arc<Mutex<GuiView>> {
        self.view.clone()
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut GuiView),
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut view = self.view.lock().map_err(|_| "display state lock poisoned")?;
        apply(&mut view);
        view.busy = false;
        view.generation += 1;
        Ok(())
    }
}

impl Default for ResultDisplayGui {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultDisplay for ResultDisplayGui {
    fn show_analysis(&mut self, analysis: AnalysisView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|view| {
            view.analysis = Some(analysis);
            view.error = None;
        })
    }

    fn show_error(&mut self, error: ErrorView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|view| {
            view.analysis = None;
            view.error = Some(error);
        })
    }

    fn show_gallery(&mut self, items: Vec<GalleryItem>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|view| view.gallery = items)
    }
}

#[derive(Default)]
struct Textures {
    original: Option<egui::TextureHandle>,
    annotated: Option<egui::TextureHandle>,
    gallery: Vec<Option<egui::TextureHandle>>,
}

struct RoadQualityWindow {
    config: Config,
    view: Arc<Mutex<GuiView>>,
    requests: Sender<Request>,
    path_input: String,
    generation: Option<u64>,
    textures: Textures,
}

fn load_texture(ctx: &egui::Context, name: &str, image: &RgbImage) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgb(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    );
    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

fn show_texture(ui: &mut egui::Ui, texture: &egui::TextureHandle, max_width: f32) {
    ui.add(
        egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
            .max_width(max_width),
    );
}

impl RoadQualityWindow {
    fn send(&self, request: Request) {
        let sent = self.requests.send(request).is_ok();
        if let Ok(mut view) = self.view.lock() {
            view.busy = sent;
        }
    }

    fn refresh_textures(&mut self, ctx: &egui::Context, view: &GuiView) {
        if self.generation == Some(view.generation) {
            return;
        }
        self.generation = Some(view.generation);

        let original = view
            .analysis
            .as_ref()
            .map(|a| a.original.clone())
            .or_else(|| view.error.as_ref().and_then(|e| e.original.clone()));

        self.textures = Textures {
            original: original.map(|image| load_texture(ctx, "original", &image)),
            annotated: view
                .analysis
                .as_ref()
                .map(|a| load_texture(ctx, "annotated", &a.annotated)),
            gallery: view
                .gallery
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.thumbnail
                        .as_ref()
                        .map(|t| load_texture(ctx, &format!("gallery-{}", i), t))
                })
                .collect(),
        };
    }

    fn handle_dropped_files(&self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().next() {
            match (file.bytes, file.path) {
                (Some(bytes), _) => self.send(Request::Upload {
                    file_name: file.name,
                    bytes: bytes.to_vec(),
                }),
                (None, Some(path)) => self.send(Request::UploadFile { path }),
                (None, None) => {}
            }
        }
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) -> Option<Request> {
        let page = &self.config.page;
        ui.label(egui::RichText::new(page.upload_prompt.as_str()).strong());
        let mut submitted = false;
        ui.horizontal(|ui| {
            let response = ui
                .text_edit_singleline(&mut self.path_input)
                .on_hover_text(page.upload_help.as_str());
            submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            submitted |= ui.button("Analyze").clicked();
        });
        ui.small(page.upload_help.as_str());

        let path = self.path_input.trim();
        if submitted && !path.is_empty() {
            Some(Request::UploadFile {
                path: PathBuf::from(path),
            })
        } else {
            None
        }
    }

    /// Returns true when the user asked to clear the result.
    fn render_result(&self, ui: &mut egui::Ui, view: &GuiView) -> bool {
        if view.analysis.is_none() && view.error.is_none() {
            return false;
        }

        if let Some(analysis) = &view.analysis {
            ui.columns(2, |columns| {
                columns[0].heading(analysis.original_heading.as_str());
                if let Some(texture) = &self.textures.original {
                    let width = columns[0].available_width();
                    show_texture(&mut columns[0], texture, width);
                }
                columns[1].heading(analysis.result_heading.as_str());
                if let Some(texture) = &self.textures.annotated {
                    let width = columns[1].available_width();
                    show_texture(&mut columns[1], texture, width);
                }
            });
        } else if let Some(error) = &view.error {
            ui.colored_label(ERROR_COLOR, format!("🚨 {}", error.message));
            if let Some(texture) = &self.textures.original {
                ui.heading(error.original_heading.as_str());
                let width = ui.available_width() / 2.0;
                show_texture(ui, texture, width);
            }
        }

        ui.button("Clear").clicked()
    }

    fn render_samples(&self, ui: &mut egui::Ui, view: &GuiView) -> Option<Request> {
        let page = &self.config.page;
        ui.heading(page.explore_heading.as_str());
        let clicked = ui
            .button(page.sample_button.as_str())
            .on_hover_text(page.sample_button_help.as_str())
            .clicked();

        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(page.gallery_heading.as_str())
                .size(20.0)
                .strong(),
        );

        let columns = self.config.gallery_columns.max(1);
        let width = self.config.thumbnail_width as f32;
        egui::Grid::new("sample-gallery")
            .spacing([16.0, 16.0])
            .show(ui, |ui| {
                for (i, item) in view.gallery.iter().enumerate() {
                    ui.vertical(|ui| {
                        match self.textures.gallery.get(i).and_then(|t| t.as_ref()) {
                            Some(texture) => show_texture(ui, texture, width),
                            None => {
                                ui.label("(unavailable)");
                            }
                        }
                        ui.small(item.caption.as_str());
                    });
                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });

        clicked.then_some(Request::RandomSample)
    }
}

impl eframe::App for RoadQualityWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        let shared = self.view.clone();
        let Ok(mut view) = shared.lock() else {
            return;
        };
        self.refresh_textures(ctx, &view);

        let mut request = None;
        let mut clear = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(self.config.page.heading.as_str())
                            .size(48.0)
                            .color(TITLE_COLOR),
                    );
                });
                ui.add_space(20.0);

                request = self.render_upload(ui);
                ui.separator();

                if view.busy {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Analyzing...");
                    });
                }

                clear = self.render_result(ui, &view);
                ui.separator();
                request = self.render_samples(ui, &view).or(request.take());

                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(self.config.page.footer.as_str())
                            .size(12.0)
                            .color(FOOTER_COLOR),
                    );
                });
            });
        });

        if clear {
            clear_result(&mut view);
        }
        let busy = view.busy;
        drop(view);

        if let Some(request) = request {
            self.send(request);
        }
        // The worker updates the view without a handle on the context.
        let poll = if busy { 100 } else { 500 };
        ctx.request_repaint_after(Duration::from_millis(poll));
    }
}

fn clear_result(view: &mut GuiView) {
    view.analysis = None;
    view.error = None;
    view.generation += 1;
}

/// Opens the window on the calling thread and blocks until it is closed.
pub fn run_window(
    config: Config,
    view: Arc<Mutex<GuiView>>,
    requests: Sender<Request>,
) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{} {}", config.page.icon, config.page.title))
            .with_inner_size(config.page.window_size),
        ..Default::default()
    };

    let title = config.page.title.clone();
    let window = RoadQualityWindow {
        config,
        view,
        requests,
        path_input: String::new(),
        generation: None,
        textures: Textures::default(),
    };

    eframe::run_native(&title, options, Box::new(|_cc| Box::new(window)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality_label::QualityLabel;
    use std::sync::mpsc;

    fn analysis() -> AnalysisView {
        AnalysisView {
            original_heading: "Sample Image".to_string(),
            result_heading: "Analysis Result".to_string(),
            original: Arc::new(RgbImage::new(4, 4)),
            annotated: RgbImage::new(4, 4),
            label: QualityLabel::new("good"),
        }
    }

    fn window(requests: Sender<Request>) -> RoadQualityWindow {
        RoadQualityWindow {
            config: Config::default(),
            view: Arc::new(Mutex::new(GuiView::default())),
            requests,
            path_input: String::new(),
            generation: None,
            textures: Textures::default(),
        }
    }

    #[test]
    fn test_clear_result_drops_analysis_and_keeps_gallery() {
        let mut display = ResultDisplayGui::new();
        display.show_gallery(vec![GalleryItem {
            caption: "Sample 1".to_string(),
            thumbnail: None,
        }])
        .unwrap();
        display.show_analysis(analysis()).unwrap();

        let view = display.view();
        let mut view = view.lock().unwrap();
        let generation = view.generation;
        clear_result(&mut view);

        assert!(view.analysis.is_none());
        assert!(view.error.is_none());
        assert_eq!(view.gallery.len(), 1);
        assert!(view.generation > generation);
    }

    #[test]
    fn test_send_marks_view_busy() {
        let (sender, receiver) = mpsc::channel();
        let window = window(sender);

        window.send(Request::RandomSample);

        assert!(window.view.lock().unwrap().busy);
        assert!(matches!(receiver.try_recv(), Ok(Request::RandomSample)));
    }

    #[test]
    fn test_send_without_worker_clears_busy() {
        let (sender, receiver) = mpsc::channel();
        drop(receiver);
        let window = window(sender);
        window.view.lock().unwrap().busy = true;

        window.send(Request::RandomSample);

        assert!(!window.view.lock().unwrap().busy);
    }
}
