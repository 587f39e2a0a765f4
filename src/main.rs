use anyhow::Context;
use marketplace::{configuration::Settings, startup::Application, telemetry::{get_subscriber, init_subscriber}};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("marketplace".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let config = Settings::get()
        .context("Failed to load configuration")?;

    let application = Application::new(config).await?;
    application.run_until_stopped().await?;
    Ok(())
}
