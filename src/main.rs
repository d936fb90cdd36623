use color_eyre::eyre::Result;
use detective_ratatui::{
    app::App,
    logging,
    settings::{self, Settings},
};
use std::panic;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = Settings::load()?;
    logging::init(settings::data_dir()?, settings.debug_mode)?;
    log::info!("Detective start: {}", chrono::Local::now());

    // Refuse to start without a credential rather than fail on every turn.
    let api_key = settings
        .resolve_api_key()
        .inspect_err(|e| log::error!("{e}"))?;
    if !settings.validate_api_key(&api_key).await {
        log::warn!("Continuing with an unverified API key");
    }

    // Restore the terminal before the default hook prints the panic.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        if let Some(location) = panic_info.location() {
            log::error!(
                "Panic occurred in file '{}' at line {}",
                location.file(),
                location.line(),
            );
        }
        default_hook(panic_info);
    }));

    let mut app = App::new(settings, &api_key);
    app.run().await
}
