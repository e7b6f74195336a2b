use list_signup::configuration::get_configuration;
use list_signup::startup::Application;
use list_signup::telemetry::get_subscriber;
use list_signup::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("list-signup", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    let app = Application::build(cfg)?;
    tracing::info!(port = app.get_port(), "listening");

    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "server failed"
        );
        return Err(e.into());
    }
    tracing::info!("server exited gracefully");
    Ok(())
}
