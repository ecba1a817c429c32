//! # inlove-scanner
//!
//! QR capture and identifier resolution.
//!
//! - [`resolver`]: payload → catalog item, four ordered match stages
//! - [`state`]: the capture lifecycle as one explicit state value
//! - [`session`]: camera acquisition, bounded frame sampling, auto-resume
//! - [`device`] / [`decoder`]: seams for the platform camera and QR decoder
//!
//! ## Example
//!
//! ```ignore
//! use inlove_scanner::{LogNotifier, RqrrDecoder, ScanOutcome, ScanSession, ScannerConfig};
//!
//! let (catalog_tx, catalog_rx) = tokio::sync::watch::channel(snapshot);
//! let mut session = ScanSession::new(backend, RqrrDecoder, LogNotifier, catalog_rx, ScannerConfig::from_env());
//!
//! if let ScanOutcome::Matched(item) = session.run(shutdown.child_token()).await? {
//!     println!("{} ({})", item.name, item.short_code);
//!     session.dismiss()?;
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod device;
pub mod error;
pub mod notify;
pub mod resolver;
pub mod session;
pub mod state;

// Re-exports
pub use config::ScannerConfig;
pub use decoder::{FrameDecoder, RqrrDecoder};
pub use device::{
    CameraInfo, CameraRequest, CaptureBackend, CaptureEnvironment, DeviceGuard, FacingMode,
    FrameSource, select_camera,
};
pub use error::{CaptureError, DecodeError, ScanError, ScanResult};
pub use notify::{LogNotifier, Notification, Notifier, Severity};
pub use resolver::{MatchStage, resolve, resolve_with_stage};
pub use session::{ScanOutcome, ScanSession};
pub use state::{CaptureEvent, CaptureState, InvalidTransition, UnmatchedReason};
