#[cfg(not(target_arch = "wasm32"))]
fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn init_logging() -> anyhow::Result<()> {
    dioxus::logger::init(dioxus::logger::tracing::Level::INFO)
        .map_err(|e| anyhow::anyhow!("failed to install browser logger: {e}"))
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = &*lens::config::CONFIG;
    tracing::info!(
        predict = %config.predict_url(),
        chat = %config.chat_url(),
        markdown = config.markdown,
        "starting lens"
    );
    dioxus::launch(lens::ui::App);
    Ok(())
}
