//! Check camera and service availability.

use boardlens_camera_engine::{backend, CameraManager, Facing};
use boardlens_common::config::AppConfig;
use boardlens_common::AnalysisSettings;

use boardlens_analysis_client::AnalysisClient;

pub async fn run(config: &AppConfig, endpoint: Option<String>) -> anyhow::Result<()> {
    println!("BoardLens System Check");
    println!("{}", "=".repeat(50));

    let backend = backend::default_backend();
    println!("[OK] Camera backend: {}", backend.name());

    let camera = CameraManager::new(backend);
    for facing in [Facing::Rear, Facing::Front] {
        match camera.open(facing).await {
            Ok(info) => {
                println!(
                    "[OK] {} camera: {}x{} @ {:.0}Hz ({:?} tier)",
                    facing.as_str(),
                    info.settings.width,
                    info.settings.height,
                    info.settings.frame_rate,
                    info.granted_tier
                );
            }
            Err(e) => println!("[WARN] {} camera: {e}", facing.as_str()),
        }
        camera.close().await;
    }

    let base_url = endpoint.unwrap_or_else(|| config.analysis.base_url.clone());
    let client = AnalysisClient::with_settings(&AnalysisSettings {
        base_url,
        timeout_secs: 10,
    })?;
    match client.service_status().await {
        Ok(status) => {
            println!(
                "[OK] Analysis service at {}: {}{}",
                client.base_url(),
                status.status,
                status
                    .version
                    .map(|v| format!(" (v{v})"))
                    .unwrap_or_default()
            );
        }
        Err(e) => {
            println!("[WARN] Analysis service at {}: {e}", client.base_url());
        }
    }

    println!();
    println!("BoardLens is ready when both camera and service report OK.");
    Ok(())
}
