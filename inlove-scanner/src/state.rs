//! Capture lifecycle state machine
//!
//! ```text
//! Idle ─Open─▶ RequestingPermission ─PermissionGranted─▶ Previewing
//!   ▲                 │ AcquireFailed                        │ ScannerStarted
//!   │◀────────────────┘                                      ▼
//!   │◀──Dismiss── Matched ◀──ItemMatched── Scanning ◀──Resume── Unmatched
//!   │                                          │ NoMatch / ProcessingFailed ▲
//!   │                                          └────────────────────────────┘
//!   └◀── Close (from any state), DeviceLost (while holding a device)
//! ```
//!
//! A capture device is held exactly in `Previewing`, `Scanning` and
//! `Unmatched`. Decoding happens only in `Scanning`.

use serde::{Deserialize, Serialize};
use shared::models::CatalogItem;
use thiserror::Error;

/// Why decoding was suspended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Payload decoded but no catalog item matched
    NoMatch,
    /// Decoding or handling the frame failed
    ProcessingFailed,
}

/// Capture surface state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CaptureState {
    /// Surface closed, no device
    #[default]
    Idle,
    /// Waiting for the device and the user's permission
    RequestingPermission,
    /// Device acquired, preview running, decoder not started yet
    Previewing { camera: String },
    /// Sampling frames for QR codes
    Scanning,
    /// Item found; the device has been released
    Matched { item: Box<CatalogItem> },
    /// Nothing usable decoded; waiting to resume scanning
    Unmatched {
        payload: String,
        reason: UnmatchedReason,
    },
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Open,
    PermissionGranted { camera: String },
    AcquireFailed,
    ScannerStarted,
    ItemMatched(Box<CatalogItem>),
    NoMatch(String),
    ProcessingFailed(String),
    Resume,
    Dismiss,
    DeviceLost,
    Close,
}

impl CaptureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PermissionGranted { .. } => "permission_granted",
            Self::AcquireFailed => "acquire_failed",
            Self::ScannerStarted => "scanner_started",
            Self::ItemMatched(_) => "item_matched",
            Self::NoMatch(_) => "no_match",
            Self::ProcessingFailed(_) => "processing_failed",
            Self::Resume => "resume",
            Self::Dismiss => "dismiss",
            Self::DeviceLost => "device_lost",
            Self::Close => "close",
        }
    }
}

/// Event not accepted in the current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid capture transition: {event} in state {from}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

impl CaptureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RequestingPermission => "requesting_permission",
            Self::Previewing { .. } => "previewing",
            Self::Scanning => "scanning",
            Self::Matched { .. } => "matched",
            Self::Unmatched { .. } => "unmatched",
        }
    }

    /// Whether a capture device is held in this state
    pub fn holds_device(&self) -> bool {
        matches!(
            self,
            Self::Previewing { .. } | Self::Scanning | Self::Unmatched { .. }
        )
    }

    /// Whether frames are being decoded
    pub fn is_decoding(&self) -> bool {
        matches!(self, Self::Scanning)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Apply an event, returning the next state
    pub fn on(&self, event: CaptureEvent) -> Result<CaptureState, InvalidTransition> {
        use CaptureEvent as E;
        use CaptureState as S;

        let next = match (self, event) {
            (_, E::Close) => S::Idle,

            (S::Idle, E::Open) => S::RequestingPermission,
            (S::RequestingPermission, E::PermissionGranted { camera }) => S::Previewing { camera },
            (S::RequestingPermission | S::Previewing { .. }, E::AcquireFailed) => S::Idle,
            (S::Previewing { .. }, E::ScannerStarted) => S::Scanning,

            (S::Scanning, E::ItemMatched(item)) => S::Matched { item },
            (S::Scanning, E::NoMatch(payload)) => S::Unmatched {
                payload,
                reason: UnmatchedReason::NoMatch,
            },
            (S::Scanning, E::ProcessingFailed(payload)) => S::Unmatched {
                payload,
                reason: UnmatchedReason::ProcessingFailed,
            },
            (S::Unmatched { .. }, E::Resume) => S::Scanning,
            (S::Matched { .. }, E::Dismiss) => S::Idle,

            (S::Previewing { .. } | S::Scanning | S::Unmatched { .. }, E::DeviceLost) => S::Idle,

            (state, event) => {
                return Err(InvalidTransition {
                    from: state.name(),
                    event: event.name(),
                });
            }
        };
        Ok(next)
    }
}
