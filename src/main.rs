use deskscene::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let asset_dir = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    deskscene::run(AppConfig::new().asset_dir(asset_dir))
}
