use std::rc::Rc;

use log::{info, warn};

mod app;
mod config;
mod controller;
mod error;
mod gemini;
mod logging;
mod model;
mod session;
mod storage;
mod views;

use app::{App, AppProps};
use config::AppConfig;

// Trunk/Yew entrypoint
fn main() {
    let config = AppConfig::from_env();
    logging::init(config.log_level);

    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY was not set at build time; quiz generation will fail");
    }
    info!("Starting QuizMaster with model {}", config.model);

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
