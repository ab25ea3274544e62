// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod capture;
mod charts;
mod config;
mod connection;
mod dashboard;
mod detection;
mod error;
mod frame;
mod stats;
mod storage;
mod timeseries;
mod ui;

use app::GreenGuardian;
use config::Config;
use connection::{BackendUpdate, ConnectionManager};
use dashboard::Dashboard;
use iced::{window, Size, Theme};
use std::sync::mpsc;
use storage::{CacheStore, FileStore, MemoryStore};

fn main() -> iced::Result {
    // On Windows, force wgpu to use Vulkan backend instead of DirectX 12
    // This prevents "INVALID_SUBRESOURCE_STATE" errors with D3D12 resource state transitions
    #[cfg(target_os = "windows")]
    std::env::set_var("WGPU_BACKEND", "vulkan");

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().unwrap_or_else(|e| {
        log::error!("{}; using default settings", e);
        Config::default()
    });

    let store: Box<dyn CacheStore> = match FileStore::open(config.cache_dir()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!(
                "Cannot open cache directory {}: {}; caches will not persist",
                config.cache_dir().display(),
                e
            );
            Box::new(MemoryStore::new())
        }
    };
    let dashboard = Dashboard::load(store);

    // Create a channel for communication between the connection thread and the UI thread
    let (sender, receiver) = mpsc::channel::<BackendUpdate>();

    let (sink, connection) = ConnectionManager::spawn(config.server_url.clone(), sender);

    let camera_index = config.camera_index;
    let capture = capture::spawn(&config, sink, move || capture::open_camera(camera_index));

    iced::application(
        "Green Guardian: Trash Inference Dashboard",
        GreenGuardian::update,
        GreenGuardian::view,
    )
    .subscription(GreenGuardian::subscription)
    .theme(|_| Theme::Light)
    .window(window::Settings {
        size: Size::new(1280.0, 900.0),
        exit_on_close_request: false,
        ..Default::default()
    })
    .run_with(move || GreenGuardian::new(dashboard, receiver, capture, connection))
}
