mod app;
mod application;
mod config;
mod domain;
mod process;
mod tools;
mod ui;
mod utils;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::domain::AppError;
use crate::tools::ToolPaths;
use crate::ui::{Notice, NoticeLevel};

fn main() -> iced::Result {
    init_tracing();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "convertly starting");

    let tools = match startup() {
        Ok(tools) => tools,
        Err(e) => abort_startup(&e),
    };
    let downloads_dir = utils::downloads_dir();

    let icon_data = include_bytes!("../assets/icon.png");

    let icon = match image::load_from_memory(icon_data) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            window::icon::from_rgba(rgba.into_raw(), width, height).ok()
        }
        Err(_) => None,
    };

    iced::application(
        move || app::ConverterApp::new(tools.clone(), downloads_dir.clone()),
        app::update,
        app::view,
    )
    .title("Convertly File Converter")
    .subscription(app::subscription)
    .window(window::Settings {
        size: Size::new(800.0, 420.0),
        resizable: false,
        icon,
        ..Default::default()
    })
    .run()
}

fn startup() -> Result<ToolPaths, AppError> {
    let config = AppConfig::load()?;
    tools::provision(&config)
}

/// Startup failures are fatal: tell the user and exit non-zero.
fn abort_startup(error: &AppError) -> ! {
    tracing::error!(error = %error, "startup failed");
    Notice {
        level: NoticeLevel::Error,
        title: "Error".to_string(),
        body: format!("Error during startup: {}", error),
    }
    .show_blocking();
    std::process::exit(1)
}

fn init_tracing() {
    let level = config::log_level();
    let env_filter = match level.parse::<EnvFilter>() {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "WARN: CONVERTLY_LOG='{}' is not a valid tracing filter ({}); falling back to 'info'",
                level, e
            );
            EnvFilter::new("info")
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}
