use app::{App, Request};
use config::Config;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use result_display::impl_console::ResultDisplayConsole;
use result_display::impl_gui::{run_window, ResultDisplayGui};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};

mod annotator;
mod app;
mod config;
mod image_classifier;
mod image_decoder;
mod library;
mod pipeline;
mod quality_label;
mod result_display;
mod sample_deck;


fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let image_classifier = load_image_classifier(&config, logger.clone());

    match std::env::args_os().nth(1) {
        Some(path) => run_console(config, logger, image_classifier, PathBuf::from(path)),
        None => run_gui(config, logger, image_classifier),
    }
}

fn load_image_classifier(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn ImageClassifier + Send + Sync> {
    let model_path = &config.model.onnx_model_path;

    if model_path.exists() {
        match ImageClassifierTractOnnx::new(config.model.clone(), logger.clone()) {
            Ok(image_classifier) => return Arc::new(image_classifier),
            Err(e) => {
                let _ = logger.error(&format!(
                    "Failed to load model {}: {}",
                    model_path.display(),
                    e
                ));
            }
        }
    } else {
        let _ = logger.info(&format!(
            "No model at {}, using fake classifier",
            model_path.display()
        ));
    }

    Arc::new(ImageClassifierFake::new(
        config.model.labels.clone(),
        config.sample_seed,
        logger,
    ))
}

fn run_console(
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    path: PathBuf,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let result_display = Arc::new(Mutex::new(ResultDisplayConsole::new(logger.clone())));

    let app = App::new(config, logger, image_classifier, result_display);

    app.handle(Request::UploadFile { path })
}

fn run_gui(
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let result_display = ResultDisplayGui::new();
    let view = result_display.view();

    let app = App::new(
        config.clone(),
        logger.clone(),
        image_classifier,
        Arc::new(Mutex::new(result_display)),
    );

    let (request_sender, request_receiver) = mpsc::channel();
    let _ = request_sender.send(Request::Gallery);

    let worker_logger = logger.clone();
    std::thread::spawn(move || {
        if let Err(e) = app.run(request_receiver) {
            let _ = worker_logger.error(&format!("Request worker stopped: {}", e));
        }
    });

    run_window(config, view, request_sender).map_err(|e| e.to_string())?;

    logger.info("Window closed")?;
    Ok(())
}
