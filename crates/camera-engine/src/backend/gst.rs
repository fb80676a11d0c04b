//! GStreamer/V4L2 camera backend.
//!
//! Builds a `v4l2src ! videoconvert ! appsink` pipeline per session and
//! pulls RGB frames on demand. Facing modes map to configured device
//! nodes; handhelds typically expose the rear sensor first.

use std::sync::OnceLock;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;

use boardlens_common::{BoardlensError, BoardlensResult};

use crate::constraints::{CaptureConstraints, DeviceSettings, Facing};
use crate::frame::RawFrame;

use super::{CameraBackend, CameraDevice};

/// How long to wait for the pipeline to reach Playing.
const STATE_CHANGE_TIMEOUT_SECS: u64 = 10;

/// How long to wait for a frame before reporting the device gone.
const FRAME_TIMEOUT_SECS: u64 = 5;

/// Backend acquiring V4L2 devices through GStreamer.
#[derive(Debug, Clone)]
pub struct GstCameraBackend {
    front_device: String,
    rear_device: String,
}

impl Default for GstCameraBackend {
    fn default() -> Self {
        Self {
            front_device: "/dev/video1".to_string(),
            rear_device: "/dev/video0".to_string(),
        }
    }
}

impl GstCameraBackend {
    /// Backend with explicit device nodes per facing mode.
    pub fn new(front_device: impl Into<String>, rear_device: impl Into<String>) -> Self {
        Self {
            front_device: front_device.into(),
            rear_device: rear_device.into(),
        }
    }

    fn device_for(&self, facing: Facing) -> &str {
        match facing {
            Facing::Front => &self.front_device,
            Facing::Rear => &self.rear_device,
        }
    }
}

#[async_trait::async_trait]
impl CameraBackend for GstCameraBackend {
    fn name(&self) -> &str {
        "gstreamer"
    }

    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> BoardlensResult<Box<dyn CameraDevice>> {
        let device = self.device_for(constraints.facing).to_string();
        probe_device_node(&device)?;

        let caps = caps_for(constraints);
        let launch = format!(
            "v4l2src device=\"{device}\" ! videoconvert ! videoscale ! videorate ! {caps} ! \
             appsink name=sink max-buffers=1 drop=true sync=false"
        );

        tracing::info!(
            device = %device,
            tier = ?constraints.tier,
            "Opening camera pipeline"
        );

        // Pipeline construction and the preroll pull both block, so the
        // whole acquisition runs off the async executor.
        let facing = constraints.facing;
        let opened = tokio::task::spawn_blocking(move || open_pipeline(&launch, facing))
            .await
            .map_err(|e| BoardlensError::device_unavailable(format!("open task failed: {e}")))??;

        Ok(Box::new(opened))
    }
}

fn caps_for(constraints: &CaptureConstraints) -> String {
    match (constraints.resolution, constraints.frame_rate) {
        (Some(res), Some(rate)) => format!(
            "video/x-raw,format=RGB,width={},height={},framerate={}/1",
            res.ideal_width, res.ideal_height, rate.ideal_fps
        ),
        (Some(res), None) => format!(
            "video/x-raw,format=RGB,width={},height={}",
            res.ideal_width, res.ideal_height
        ),
        _ => "video/x-raw,format=RGB".to_string(),
    }
}

/// Distinguish a missing node from a permission refusal before GStreamer
/// folds both into an opaque state-change failure.
fn probe_device_node(device: &str) -> BoardlensResult<()> {
    match std::fs::OpenOptions::new().read(true).open(device) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Err(
            BoardlensError::permission_denied(format!("no access to {device}")),
        ),
        Err(e) => Err(BoardlensError::device_unavailable(format!(
            "{device}: {e}"
        ))),
    }
}

fn open_pipeline(launch: &str, facing: Facing) -> BoardlensResult<GstCameraDevice> {
    init_gstreamer()?;

    let element = gst::parse::launch(launch).map_err(|e| {
        BoardlensError::device_unavailable(format!("failed to build pipeline: {e}"))
    })?;
    let pipeline = element
        .dynamic_cast::<gst::Pipeline>()
        .map_err(|_| BoardlensError::device_unavailable("launch string did not produce a pipeline"))?;

    let appsink = pipeline
        .by_name("sink")
        .and_then(|e| e.dynamic_cast::<gst_app::AppSink>().ok())
        .ok_or_else(|| BoardlensError::device_unavailable("pipeline has no appsink"))?;

    pipeline.set_state(gst::State::Playing).map_err(|e| {
        BoardlensError::device_unavailable(format!("failed to start pipeline: {e:?}"))
    })?;

    // GStreamer state changes are async; wait so a constraint the device
    // rejects fails the negotiation attempt instead of the first frame.
    let (result, state, _) = pipeline.state(gst::ClockTime::from_seconds(STATE_CHANGE_TIMEOUT_SECS));
    match result {
        Ok(_) if state == gst::State::Playing => {}
        Ok(_) => {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(BoardlensError::device_unavailable(format!(
                "pipeline stuck in {state:?}"
            )));
        }
        Err(e) => {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(BoardlensError::device_unavailable(format!(
                "pipeline failed to reach Playing: {e:?}"
            )));
        }
    }

    // Preroll: the first sample carries the effective caps the device
    // actually granted.
    let sample = appsink
        .try_pull_sample(gst::ClockTime::from_seconds(FRAME_TIMEOUT_SECS))
        .ok_or_else(|| {
            let _ = pipeline.set_state(gst::State::Null);
            BoardlensError::device_unavailable("no frames within preroll timeout")
        })?;
    let settings = match settings_from_sample(&sample) {
        Ok(settings) => settings,
        Err(e) => {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(e);
        }
    };

    tracing::info!(
        facing = facing.as_str(),
        width = settings.width,
        height = settings.height,
        frame_rate = settings.frame_rate,
        "Camera pipeline granted"
    );

    Ok(GstCameraDevice {
        pipeline,
        appsink,
        settings,
        facing,
    })
}

fn settings_from_sample(sample: &gst::Sample) -> BoardlensResult<DeviceSettings> {
    let caps = sample
        .caps()
        .ok_or_else(|| BoardlensError::device_unavailable("sample carries no caps"))?;
    let s = caps
        .structure(0)
        .ok_or_else(|| BoardlensError::device_unavailable("caps carry no structure"))?;

    let width = s
        .get::<i32>("width")
        .map_err(|e| BoardlensError::device_unavailable(format!("caps missing width: {e}")))?;
    let height = s
        .get::<i32>("height")
        .map_err(|e| BoardlensError::device_unavailable(format!("caps missing height: {e}")))?;
    let frame_rate = s
        .get::<gst::Fraction>("framerate")
        .map(|f| {
            if f.denom() == 0 {
                0.0
            } else {
                f.numer() as f64 / f.denom() as f64
            }
        })
        .unwrap_or(0.0);

    Ok(DeviceSettings {
        width: width.max(0) as u32,
        height: height.max(0) as u32,
        frame_rate,
    })
}

struct GstCameraDevice {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    settings: DeviceSettings,
    facing: Facing,
}

impl Drop for GstCameraDevice {
    fn drop(&mut self) {
        // Idempotent with release(); keeps the device from staying
        // claimed if a handle is dropped without an explicit release.
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}

#[async_trait::async_trait]
impl CameraDevice for GstCameraDevice {
    async fn current_frame(&self) -> BoardlensResult<RawFrame> {
        let appsink = self.appsink.clone();
        let settings = self.settings;
        tokio::task::spawn_blocking(move || pull_frame(&appsink, settings))
            .await
            .map_err(|e| BoardlensError::device_unavailable(format!("frame task failed: {e}")))?
    }

    fn settings(&self) -> DeviceSettings {
        self.settings
    }

    async fn release(&mut self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            tracing::warn!(
                facing = self.facing.as_str(),
                error = ?e,
                "Failed to tear down camera pipeline"
            );
        } else {
            tracing::debug!(facing = self.facing.as_str(), "Camera pipeline released");
        }
    }
}

fn pull_frame(appsink: &gst_app::AppSink, settings: DeviceSettings) -> BoardlensResult<RawFrame> {
    let sample = appsink
        .try_pull_sample(gst::ClockTime::from_seconds(FRAME_TIMEOUT_SECS))
        .ok_or_else(|| BoardlensError::device_unavailable("no frame from device"))?;

    // Per-sample caps win over the prerolled settings if they differ.
    let (width, height) = match settings_from_sample(&sample) {
        Ok(s) => (s.width, s.height),
        Err(_) => (settings.width, settings.height),
    };

    let buffer = sample
        .buffer()
        .ok_or_else(|| BoardlensError::device_unavailable("sample carries no buffer"))?;
    let map = buffer
        .map_readable()
        .map_err(|e| BoardlensError::device_unavailable(format!("buffer not readable: {e}")))?;

    let data = map.as_slice();
    let row_bytes = width as usize * 3;
    let expected = row_bytes * height as usize;
    if data.len() == expected {
        return RawFrame::new(data.to_vec(), width, height);
    }

    // Rows can carry alignment padding; repack to tightly packed RGB.
    if height > 0 && data.len() % height as usize == 0 {
        let stride = data.len() / height as usize;
        if stride >= row_bytes {
            let mut packed = Vec::with_capacity(expected);
            for row in data.chunks_exact(stride) {
                packed.extend_from_slice(&row[..row_bytes]);
            }
            return RawFrame::new(packed, width, height);
        }
    }

    Err(BoardlensError::device_unavailable(format!(
        "unexpected buffer size {} for {width}x{height} RGB",
        data.len()
    )))
}

fn init_gstreamer() -> BoardlensResult<()> {
    static GST_INIT: OnceLock<Result<(), String>> = OnceLock::new();
    let init_res = GST_INIT.get_or_init(|| gst::init().map_err(|e| e.to_string()));
    match init_res {
        Ok(()) => Ok(()),
        Err(e) => Err(BoardlensError::device_unavailable(format!(
            "failed to initialize GStreamer: {e}"
        ))),
    }
}
