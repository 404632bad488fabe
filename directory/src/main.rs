use anyhow::Result;

use directory::{settings::Settings, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    settings.validate()?;

    // Logging is initialized in App::run() with buffer support
    App::new(settings).run().await?;

    Ok(())
}
