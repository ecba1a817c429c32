//! Capture device abstraction
//!
//! A [`CaptureBackend`] reports the runtime environment, lists cameras and
//! hands out exclusive [`FrameSource`]s. Sources are always wrapped in a
//! [`DeviceGuard`] so that every exit path releases the device.

use crate::error::CaptureError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static BACK_CAMERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)back|traseira|rear|environment").expect("valid camera label pattern")
});

/// Where the capture surface is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEnvironment {
    /// HTTPS, localhost or a native host
    pub secure_context: bool,
    /// A camera API exists at all
    pub camera_api: bool,
    /// Phone or tablet (changes camera preference and guidance text)
    pub mobile: bool,
}

impl CaptureEnvironment {
    /// Checks done before touching any device
    pub fn preflight(&self) -> Result<(), CaptureError> {
        if !self.secure_context {
            return Err(CaptureError::InsecureContext);
        }
        if !self.camera_api {
            return Err(CaptureError::Unsupported);
        }
        Ok(())
    }
}

impl Default for CaptureEnvironment {
    fn default() -> Self {
        Self {
            secure_context: true,
            camera_api: true,
            mobile: false,
        }
    }
}

/// Camera as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub id: String,
    pub label: String,
}

impl CameraInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn is_rear_facing(&self) -> bool {
        BACK_CAMERA.is_match(&self.label)
    }
}

/// Facing-mode constraint used when no camera can be picked by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    Environment,
    User,
}

/// What to ask the backend for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraRequest {
    DeviceId(String),
    Facing(FacingMode),
}

impl CameraRequest {
    pub fn describe(&self) -> String {
        match self {
            Self::DeviceId(id) => id.clone(),
            Self::Facing(FacingMode::Environment) => "environment".to_string(),
            Self::Facing(FacingMode::User) => "user".to_string(),
        }
    }
}

/// Pick a camera: rear-facing label first, then the first camera, then a
/// facing-mode constraint (environment on mobile, user otherwise)
pub fn select_camera(cameras: &[CameraInfo], mobile: bool) -> CameraRequest {
    if let Some(cam) = cameras.iter().find(|c| c.is_rear_facing()) {
        return CameraRequest::DeviceId(cam.id.clone());
    }
    if let Some(cam) = cameras.first() {
        return CameraRequest::DeviceId(cam.id.clone());
    }
    CameraRequest::Facing(if mobile {
        FacingMode::Environment
    } else {
        FacingMode::User
    })
}

/// An acquired capture device producing frames
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    type Frame;

    /// Next frame, `None` once the stream has ended
    async fn next_frame(&mut self) -> Option<Self::Frame>;

    /// Stop the device. Must be idempotent.
    fn release(&mut self);
}

/// Platform camera access
#[allow(async_fn_in_trait)]
pub trait CaptureBackend {
    type Source: FrameSource;

    fn environment(&self) -> CaptureEnvironment;

    /// List cameras (may prompt for permission to read labels)
    async fn list_cameras(&self) -> Result<Vec<CameraInfo>, CaptureError>;

    /// Acquire a device for exclusive use
    async fn acquire(&self, request: &CameraRequest) -> Result<Self::Source, CaptureError>;
}

/// Owns an acquired source and releases it on drop
#[derive(Debug)]
pub struct DeviceGuard<S: FrameSource> {
    source: Option<S>,
    label: String,
}

impl<S: FrameSource> DeviceGuard<S> {
    pub fn new(source: S, label: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub async fn next_frame(&mut self) -> Option<S::Frame> {
        match self.source.as_mut() {
            Some(source) => source.next_frame().await,
            None => None,
        }
    }

    /// Release the device now
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            debug!(camera = %self.label, "Capture device released");
        }
    }
}

impl<S: FrameSource> Drop for DeviceGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        released: Arc<AtomicUsize>,
    }

    impl FrameSource for CountingSource {
        type Frame = ();

        async fn next_frame(&mut self) -> Option<()> {
            Some(())
        }

        fn release(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_select_prefers_rear_label() {
        let cams = vec![
            CameraInfo::new("f", "FaceTime HD"),
            CameraInfo::new("b", "Câmera Traseira 0"),
        ];
        assert_eq!(select_camera(&cams, false), CameraRequest::DeviceId("b".into()));

        let cams = vec![
            CameraInfo::new("1", "camera2 1, facing front"),
            CameraInfo::new("0", "camera2 0, facing back"),
        ];
        assert_eq!(select_camera(&cams, true), CameraRequest::DeviceId("0".into()));
    }

    #[test]
    fn test_select_falls_back_to_first_then_facing() {
        let cams = vec![CameraInfo::new("w", "USB Webcam"), CameraInfo::new("x", "Other")];
        assert_eq!(select_camera(&cams, false), CameraRequest::DeviceId("w".into()));

        assert_eq!(
            select_camera(&[], true),
            CameraRequest::Facing(FacingMode::Environment)
        );
        assert_eq!(select_camera(&[], false), CameraRequest::Facing(FacingMode::User));
    }

    #[test]
    fn test_preflight() {
        let env = CaptureEnvironment {
            secure_context: false,
            camera_api: false,
            mobile: false,
        };
        assert_eq!(env.preflight(), Err(CaptureError::InsecureContext));

        let env = CaptureEnvironment {
            camera_api: false,
            ..CaptureEnvironment::default()
        };
        assert_eq!(env.preflight(), Err(CaptureError::Unsupported));
        assert!(CaptureEnvironment::default().preflight().is_ok());
    }

    #[tokio::test]
    async fn test_guard_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut guard = DeviceGuard::new(
            CountingSource {
                released: released.clone(),
            },
            "cam",
        );
        assert_eq!(guard.next_frame().await, Some(()));

        guard.release();
        assert!(!guard.is_active());
        assert_eq!(guard.next_frame().await, None);
        drop(guard);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        {
            let _guard = DeviceGuard::new(
                CountingSource {
                    released: released.clone(),
                },
                "cam",
            );
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
