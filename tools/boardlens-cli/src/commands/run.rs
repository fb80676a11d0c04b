//! Live capture + analysis loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use boardlens_analysis_client::{AnalysisClient, AnalysisEvent, CaptureScheduler};
use boardlens_camera_engine::{backend, CameraManager, Facing};
use boardlens_common::config::AppConfig;
use boardlens_common::AnalysisSettings;
use boardlens_detection_model::{Detection, ViewportSize};
use boardlens_overlay_layout::{layout, DetailSide};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &AppConfig,
    endpoint: Option<String>,
    facing: Option<String>,
    interval_ms: Option<u64>,
    no_auto: bool,
    viewport_width: f64,
    viewport_height: f64,
) -> anyhow::Result<()> {
    let facing: Facing = facing
        .unwrap_or_else(|| config.capture.facing.clone())
        .parse()
        .map_err(anyhow::Error::msg)?;

    let camera = Arc::new(CameraManager::new(backend::default_backend()));
    let info = camera.open(facing).await?;
    println!(
        "Camera open: {} {}x{} @ {:.0} fps ({:?} tier)",
        info.facing.as_str(),
        info.settings.width,
        info.settings.height,
        info.settings.frame_rate,
        info.granted_tier,
    );

    let client = Arc::new(AnalysisClient::with_settings(&AnalysisSettings {
        base_url: endpoint.unwrap_or_else(|| config.analysis.base_url.clone()),
        timeout_secs: config.analysis.timeout_secs,
    })?);
    println!("Analysis endpoint: {}", client.base_url());

    let (scheduler, mut events) = CaptureScheduler::new(camera.clone(), client);
    if !no_auto {
        let period =
            Duration::from_millis(interval_ms.unwrap_or(config.capture.auto_interval_ms));
        scheduler.set_auto_capture(true, Some(period));
        println!("Auto-capture every {} ms", period.as_millis());
    }

    let viewport = ViewportSize::new(viewport_width, viewport_height);
    println!("Overlay viewport: {}x{}", viewport.width, viewport.height);
    println!();
    println!("ENTER = capture now, f = switch facing, q = quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print_event(&event, viewport);
            }
            line = lines.next_line() => {
                match line?.as_deref() {
                    None | Some("q") => break,
                    Some("f") => match camera.switch_facing().await {
                        Ok(info) => println!(
                            "Switched to {} camera ({}x{})",
                            info.facing.as_str(),
                            info.settings.width,
                            info.settings.height
                        ),
                        Err(e) => println!("Facing switch failed: {e}"),
                    },
                    Some(_) => scheduler.trigger_manual(),
                }
            }
        }
    }

    scheduler.set_auto_capture(false, None);
    camera.close().await;
    Ok(())
}

fn print_event(event: &AnalysisEvent, viewport: ViewportSize) {
    match event {
        AnalysisEvent::Completed {
            detections,
            round_trip,
            processing_time_secs,
            ..
        } => {
            if detections.is_empty() {
                println!("No detections — overlays cleared");
                return;
            }
            println!(
                "{} detection(s) in {} ms{}",
                detections.len(),
                round_trip.as_millis(),
                processing_time_secs
                    .map(|t| format!(" (server: {t:.2}s)"))
                    .unwrap_or_default(),
            );
            for detection in detections {
                print_detection(detection, viewport);
            }
        }
        AnalysisEvent::Failed { reason } => {
            println!("Analysis failed: {reason}");
        }
        AnalysisEvent::StaleDiscarded {
            result_generation, ..
        } => {
            println!("Dropped result from replaced camera session {result_generation}");
        }
    }
}

fn print_detection(detection: &Detection, viewport: ViewportSize) {
    let placed = layout(&detection.bounding_box, viewport);
    let side = match placed.detail.side {
        DetailSide::Right => "right",
        DetailSide::Below => "below",
    };
    println!("  [{}] {}", detection.id, detection.title);
    println!("      {}", detection.fact);
    println!(
        "      marker {} | detail panel {side}",
        placed.primary.css_style()
    );
}
