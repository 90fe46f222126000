//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("comms error: {0}")]
    Comms(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("OPENROUTER_API_KEY is not set".into());
        assert!(e.to_string().starts_with("config error"));
        assert!(e.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn comms_error_display() {
        let e = AppError::Comms("http bind failed".into());
        assert!(e.to_string().contains("http bind failed"));
    }

    #[test]
    fn logger_error_display() {
        let e = AppError::Logger("already initialized".into());
        assert!(e.to_string().contains("already initialized"));
    }
}
