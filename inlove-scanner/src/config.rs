use std::time::Duration;

/// Scanner configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SCAN_MAX_PER_SECOND | 2 | Frame decode attempts per second |
/// | SCAN_NO_MATCH_RESUME_MS | 3000 | Pause after an unknown payload |
/// | SCAN_ERROR_RESUME_MS | 2000 | Pause after a processing failure |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    pub max_scans_per_second: u32,
    pub no_match_resume: Duration,
    pub error_resume: Duration,
}

impl ScannerConfig {
    pub fn from_env() -> Self {
        Self {
            max_scans_per_second: std::env::var("SCAN_MAX_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(2),
            no_match_resume: Duration::from_millis(
                std::env::var("SCAN_NO_MATCH_RESUME_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3000),
            ),
            error_resume: Duration::from_millis(
                std::env::var("SCAN_ERROR_RESUME_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2000),
            ),
        }
    }

    /// Time between decode attempts
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.max_scans_per_second.max(1)))
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_scans_per_second: 2,
            no_match_resume: Duration::from_secs(3),
            error_resume: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_interval() {
        assert_eq!(ScannerConfig::default().scan_interval(), Duration::from_millis(500));

        let config = ScannerConfig {
            max_scans_per_second: 0,
            ..ScannerConfig::default()
        };
        assert_eq!(config.scan_interval(), Duration::from_secs(1));
    }
}
