use anyhow::Context;
use bookservice_app::modules;
use bookservice_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load book service settings")?;
    bookservice_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "bookservice-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookservice-app bootstrap complete");

    let served = bookservice_http::start_server(&registry, &settings).await;
    registry.stop_modules().await?;
    served
}
