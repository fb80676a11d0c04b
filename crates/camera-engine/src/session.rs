//! Camera session management.
//!
//! The manager owns at most one active device session at a time. Opening
//! negotiates constraints in strict-then-relaxed order (rich tier, then
//! minimal); switching facing releases the previous session's hardware
//! before the replacement goes live. Each opened session gets a number
//! from a monotonic generation counter so downstream consumers can
//! recognize results produced against a session that no longer exists.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use boardlens_common::{BoardlensError, BoardlensResult};

use crate::backend::{CameraBackend, CameraDevice};
use crate::constraints::{CaptureConstraints, ConstraintTier, DeviceSettings, Facing};
use crate::encoder::{encode_frame, EncodedFrame, JPEG_QUALITY};

/// Diagnostic snapshot of the active session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionInfo {
    /// Facing mode the session was opened for.
    pub facing: Facing,
    /// Constraint tier the device actually granted.
    pub granted_tier: ConstraintTier,
    /// Effective device settings readout.
    pub settings: DeviceSettings,
    /// Monotonic session generation.
    pub generation: u64,
}

struct ActiveSession {
    device: Box<dyn CameraDevice>,
    info: SessionInfo,
}

/// Owns the lifecycle of the one active capture device.
///
/// The session slot is the single shared resource: this manager is the
/// only writer, frame capture takes a read lock. A capture that is
/// already pulling a frame finishes before a facing switch can release
/// the device under it.
pub struct CameraManager {
    backend: Box<dyn CameraBackend>,
    session: RwLock<Option<ActiveSession>>,
    next_generation: AtomicU64,
}

impl CameraManager {
    /// Create a manager on top of a device backend.
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend,
            session: RwLock::new(None),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Open a session for the given facing mode, replacing any active one.
    ///
    /// Negotiation tries the rich tier first and downgrades to the
    /// minimal tier exactly once. Both failing leaves no active session.
    pub async fn open(&self, facing: Facing) -> BoardlensResult<SessionInfo> {
        let mut slot = self.session.write().await;
        if let Some(mut old) = slot.take() {
            tracing::info!(
                facing = old.info.facing.as_str(),
                "Releasing previous session before reopen"
            );
            old.device.release().await;
        }

        let (device, granted_tier) = self.negotiate(facing).await?;
        let info = SessionInfo {
            facing,
            granted_tier,
            settings: device.settings(),
            generation: self.next_generation.fetch_add(1, Ordering::SeqCst),
        };

        tracing::info!(
            facing = facing.as_str(),
            tier = ?granted_tier,
            width = info.settings.width,
            height = info.settings.height,
            generation = info.generation,
            "Camera session opened"
        );

        *slot = Some(ActiveSession { device, info });
        Ok(info)
    }

    /// Release the active session, if any.
    pub async fn close(&self) {
        let mut slot = self.session.write().await;
        if let Some(mut active) = slot.take() {
            tracing::info!(
                facing = active.info.facing.as_str(),
                generation = active.info.generation,
                "Camera session closed"
            );
            active.device.release().await;
        }
    }

    /// Toggle between the two facing modes.
    ///
    /// The old session's hardware is released before the new device is
    /// acquired; on failure no session is left active and the error is
    /// surfaced for the caller to retry.
    pub async fn switch_facing(&self) -> BoardlensResult<SessionInfo> {
        let mut slot = self.session.write().await;
        let current = slot
            .as_ref()
            .map(|a| a.info.facing)
            .ok_or(BoardlensError::NoActiveSession)?;
        let target = current.toggled();

        if let Some(mut old) = slot.take() {
            old.device.release().await;
        }

        let (device, granted_tier) = self.negotiate(target).await?;
        let info = SessionInfo {
            facing: target,
            granted_tier,
            settings: device.settings(),
            generation: self.next_generation.fetch_add(1, Ordering::SeqCst),
        };

        tracing::info!(
            from = current.as_str(),
            to = target.as_str(),
            generation = info.generation,
            "Facing switched"
        );

        *slot = Some(ActiveSession { device, info });
        Ok(info)
    }

    /// Snapshot of the active session, if any.
    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.session.read().await.as_ref().map(|a| a.info)
    }

    /// Generation of the active session, or 0 when none is live.
    pub async fn current_generation(&self) -> u64 {
        self.session
            .read()
            .await
            .as_ref()
            .map(|a| a.info.generation)
            .unwrap_or(0)
    }

    /// Snapshot the current live frame as a compressed still image.
    ///
    /// Returns the encoded frame together with the generation of the
    /// session it was captured from. Fails with `NoActiveSession` when
    /// no device is live.
    pub async fn capture_frame(&self) -> BoardlensResult<(EncodedFrame, u64)> {
        let guard = self.session.read().await;
        let active = guard.as_ref().ok_or(BoardlensError::NoActiveSession)?;
        let raw = active.device.current_frame().await?;
        let encoded = encode_frame(&raw, JPEG_QUALITY)?;
        Ok((encoded, active.info.generation))
    }

    async fn negotiate(
        &self,
        facing: Facing,
    ) -> BoardlensResult<(Box<dyn CameraDevice>, ConstraintTier)> {
        let rich = CaptureConstraints::rich(facing);
        match self.backend.open(&rich).await {
            Ok(device) => Ok((device, ConstraintTier::Rich)),
            Err(rich_err) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    facing = facing.as_str(),
                    error = %rich_err,
                    "Rich constraints rejected, retrying with minimal tier"
                );
                let minimal = CaptureConstraints::minimal(facing);
                match self.backend.open(&minimal).await {
                    Ok(device) => Ok((device, ConstraintTier::Minimal)),
                    Err(min_err) if min_err.is_permission_denied() => Err(min_err),
                    Err(min_err) => Err(BoardlensError::device_unavailable(format!(
                        "both constraint tiers failed: {min_err}"
                    ))),
                }
            }
        }
    }
}
