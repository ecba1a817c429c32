//! Error types for the scanner

use crate::state::InvalidTransition;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Camera acquisition failure
///
/// Display text is the short pt-BR message shown to the operator;
/// [`CaptureError::guidance`] adds what to do about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Permissão negada.")]
    PermissionDenied,

    #[error("Nenhuma câmera encontrada.")]
    DeviceNotFound,

    #[error("Navegador não suporta câmera.")]
    Unsupported,

    #[error("Câmera em uso por outro app.")]
    DeviceBusy,

    #[error("Configuração de câmera não suportada.")]
    ConstraintsUnsatisfiable,

    #[error("Funciona só em HTTPS ou localhost.")]
    InsecureContext,

    #[error("Não foi possível acessar a câmera.")]
    Unknown(String),
}

impl CaptureError {
    /// Classify a platform media error name (`NotAllowedError`, ...)
    pub fn from_platform(name: &str, detail: impl Into<String>) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => Self::DeviceNotFound,
            "NotSupportedError" => Self::Unsupported,
            "NotReadableError" | "TrackStartError" | "AbortError" => Self::DeviceBusy,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                Self::ConstraintsUnsatisfiable
            }
            "SecurityError" => Self::InsecureContext,
            _ => Self::Unknown(detail.into()),
        }
    }

    /// Notification title
    pub fn title(&self) -> &'static str {
        match self {
            Self::InsecureContext => "HTTPS Obrigatório",
            Self::Unsupported => "Navegador não suportado",
            _ => "Erro no Scanner QR",
        }
    }

    /// What the operator should do, worded for the device kind
    pub fn guidance(&self, mobile: bool) -> &'static str {
        match self {
            Self::PermissionDenied if mobile => {
                "Toque no cadeado/câmera na barra de endereços e permita."
            }
            Self::PermissionDenied => "Clique no ícone da câmera na barra de endereços e permita.",
            Self::DeviceNotFound if mobile => "Verifique se há câmera no dispositivo.",
            Self::DeviceNotFound => "Conecte uma webcam.",
            Self::Unsupported => "Use Chrome, Firefox ou Safari atualizados.",
            Self::DeviceBusy => "Feche outros apps que usam a câmera.",
            Self::ConstraintsUnsatisfiable => "Tente outra câmera/dispositivo.",
            Self::InsecureContext => "Abra o sistema por HTTPS ou localhost.",
            Self::Unknown(_) => "",
        }
    }

    /// Message and guidance joined for display
    pub fn describe(&self, mobile: bool) -> String {
        let guidance = self.guidance(mobile);
        if guidance.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, guidance)
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PermissionDenied => ErrorCode::CameraPermissionDenied,
            Self::DeviceNotFound => ErrorCode::CameraNotFound,
            Self::Unsupported => ErrorCode::CameraUnsupported,
            Self::DeviceBusy => ErrorCode::CameraBusy,
            Self::ConstraintsUnsatisfiable => ErrorCode::CameraConstraintsUnsatisfiable,
            Self::InsecureContext => ErrorCode::InsecureContext,
            Self::Unknown(_) => ErrorCode::Unknown,
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            CaptureError::Unknown(detail) => app.with_detail("detail", detail),
            _ => app,
        }
    }
}

/// Frame decoding failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A code was located but could not be read
    #[error("QR decode failed: {0}")]
    Decode(String),

    /// Frame not in a format the decoder accepts
    #[error("Unsupported frame: {0}")]
    Frame(String),
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::with_message(ErrorCode::DecodeFailed, err.to_string())
    }
}

/// Scan session error
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_platform_errors() {
        assert_eq!(
            CaptureError::from_platform("NotAllowedError", ""),
            CaptureError::PermissionDenied
        );
        assert_eq!(
            CaptureError::from_platform("NotReadableError", ""),
            CaptureError::DeviceBusy
        );
        assert_eq!(
            CaptureError::from_platform("OverconstrainedError", ""),
            CaptureError::ConstraintsUnsatisfiable
        );
        assert_eq!(
            CaptureError::from_platform("WeirdError", "boom"),
            CaptureError::Unknown("boom".to_string())
        );
    }

    #[test]
    fn test_guidance_depends_on_device_kind() {
        let err = CaptureError::PermissionDenied;
        assert_ne!(err.guidance(true), err.guidance(false));
        assert_eq!(
            err.describe(false),
            "Permissão negada. Clique no ícone da câmera na barra de endereços e permita."
        );
        assert_eq!(
            CaptureError::Unknown("x".into()).describe(true),
            "Não foi possível acessar a câmera."
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = CaptureError::DeviceBusy.into();
        assert_eq!(app.code, ErrorCode::CameraBusy);

        let app: AppError = CaptureError::Unknown("boom".into()).into();
        assert_eq!(app.code, ErrorCode::Unknown);
        assert!(app.details.is_some());

        let app: AppError = DecodeError::Decode("ecc".into()).into();
        assert_eq!(app.code, ErrorCode::DecodeFailed);
    }
}
