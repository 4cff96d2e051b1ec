use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiClient;
use crate::app::App;
use crate::config::KeyResolver;
use crate::registry::{ServiceContext, ServiceRegistry};

mod api;
mod app;
mod cli;
pub mod commands;
mod config;
mod registry;
mod resource;
mod resources;
mod search;
pub mod service;
mod table;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazyadmin");

    let args = cli::Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config.api);

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);
    let api = ApiClient::new(&config.api)?;
    info!(base_url = %api.base_url(), authenticated = api.has_token(), "API configured");

    let ctx = ServiceContext {
        api,
        resolver,
        rows_per_page: config.table.rows_per_page,
    };

    let mut registry = ServiceRegistry::new();
    resources::register_all(&mut registry);

    let mut app = App::new(registry, ctx, theme);
    if let Some(resource) = &args.resource {
        app.open_resource(resource)?;
    }
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazyadmin").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazyadmin.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
