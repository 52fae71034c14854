use anyhow::{Context, Result};
use clap::Parser;
use interview_recorder::{create_router, AppState, CaptureSession, Config, MediaDevicesFactory};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "interview-recorder")]
#[command(about = "Record microphone answers and hand them back as audio/webm")]
struct Args {
    /// Config file path (without extension)
    #[arg(short, long, default_value = "config/interview-recorder")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config))?;

    info!("Interview Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let devices = MediaDevicesFactory::create(&cfg.capture)?;
    info!(
        "Capture source: {} (available: {})",
        devices.name(),
        devices.is_available()
    );

    let app = create_router(AppState::new(CaptureSession::new(devices)));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
