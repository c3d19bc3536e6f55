use std::rc::Rc;

mod catalog;
mod components;
mod config;
mod logging;
mod model;
mod persist;
mod state;
mod util;

use components::{App, AppProps};
use config::AppConfig;
use persist::SharedStorage;

fn main() {
    let storage = SharedStorage::detect();
    let (config, config_err) = AppConfig::load(storage.0.as_ref());
    logging::init(config.level());
    if let Some(e) = config_err {
        tracing::warn!("app config override ignored, using defaults: {e}");
    }
    tracing::info!("temple builder starting");
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
        storage,
    })
    .render();
}
