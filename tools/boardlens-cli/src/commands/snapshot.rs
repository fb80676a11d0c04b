//! One-shot capture and analysis.

use std::sync::Arc;

use boardlens_analysis_client::{AnalysisClient, Analyze};
use boardlens_camera_engine::{backend, CameraManager, Facing};
use boardlens_common::config::AppConfig;
use boardlens_common::AnalysisSettings;

pub async fn run(
    config: &AppConfig,
    endpoint: Option<String>,
    facing: Option<String>,
) -> anyhow::Result<()> {
    let facing: Facing = facing
        .unwrap_or_else(|| config.capture.facing.clone())
        .parse()
        .map_err(anyhow::Error::msg)?;

    let camera = Arc::new(CameraManager::new(backend::default_backend()));
    let info = camera.open(facing).await?;
    println!(
        "Captured from {} camera at {}x{}",
        info.facing.as_str(),
        info.settings.width,
        info.settings.height
    );

    let (frame, _generation) = camera.capture_frame().await?;
    camera.close().await;
    println!("Encoded {} JPEG bytes", frame.data().len());

    let client = AnalysisClient::with_settings(&AnalysisSettings {
        base_url: endpoint.unwrap_or_else(|| config.analysis.base_url.clone()),
        timeout_secs: config.analysis.timeout_secs,
    })?;
    let outcome = client.process_image(&frame.transport_payload()).await?;

    if outcome.detections.is_empty() {
        println!("No detections.");
        return Ok(());
    }
    for detection in &outcome.detections {
        println!();
        println!("[{}] {}", detection.id, detection.title);
        println!("  {}", detection.fact);
        println!("  {}", detection.full_text);
        let b = detection.bounding_box;
        println!(
            "  box x={:.3} y={:.3} w={:.3} h={:.3}",
            b.x, b.y, b.width, b.height
        );
    }
    Ok(())
}
