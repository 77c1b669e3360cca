use anyhow::Result;

use datagrid::app::App;
use datagrid::config::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    config.ensure_dirs()?;
    if let Err(err) = datagrid::logging::init(&config) {
        eprintln!("logging disabled: {err:#}");
    }
    log::info!("catalog database at {}", config.db_path.display());

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Data Grid"))
                .with_data_directory(config.webview_data_dir()),
        )
        .with_context(config)
        .launch(App);
    Ok(())
}
