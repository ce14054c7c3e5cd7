//! Toggle a provider on a live admin page and check the result.
//!
//! ```text
//! PROVIDER_ADMIN_URL=https://lms.test/filter/oembed/manageproviders.php \
//!     cargo run --example admin_toggle -- YouTube
//! ```

use provider_steps::{ChromeFieldSetter, ChromePage, Config, ProviderSteps};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let url = std::env::var("PROVIDER_ADMIN_URL")?;
    let provider = std::env::args().nth(1).unwrap_or_else(|| "YouTube".to_string());
    let config = match std::env::var("PROVIDER_STEPS_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };

    let page = Arc::new(ChromePage::launch(&config).await?);
    page.navigate(&url).await?;

    let steps = ProviderSteps::with_config_strings(page, Arc::new(ChromeFieldSetter), &config);

    let was_enabled = steps.assert_enabled(&provider).await.is_ok();
    info!("Provider '{}' enabled: {}", provider, was_enabled);

    steps.perform_click_action("toggle", &provider).await?;

    if was_enabled {
        steps.assert_disabled(&provider).await?;
    } else {
        steps.assert_enabled(&provider).await?;
    }
    info!("Provider '{}' toggled", provider);

    Ok(())
}
