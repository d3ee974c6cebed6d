use env_logger::Env;
use tabletop::{config::AppConfig, TabletopApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!("Loading textures from {}", config.asset_dir.display());

    TabletopApp::new(config)?.run()
}
