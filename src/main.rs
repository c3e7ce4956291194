use anyhow::Context;
use tracing::info;

use userdesk::app::UserForm;
use userdesk::store::{StoreConfig, UserStore};

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = StoreConfig::default();
    info!(path = %config.db_path.display(), "starting userdesk");

    let store = UserStore::new(config);
    store.ensure_schema().context("create users table")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 450.0])
            .with_min_inner_size([600.0, 450.0]),
        ..Default::default()
    };
    eframe::run_native(
        "User Management",
        options,
        Box::new(|_cc| Box::new(UserForm::new(store))),
    )
    .map_err(|err| anyhow::anyhow!("window event loop: {err}"))
}
