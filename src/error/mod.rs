use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid routing record: {0}")]
    InvalidRoutingRecord(String),

    #[error("Invalid tag pattern: {0}")]
    InvalidTagPattern(String),

    #[error("Invalid template properties: {0}")]
    InvalidTemplateProperties(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl NotifyError {
    /// Stable machine-readable code, used as a structured log field
    pub fn code(&self) -> &'static str {
        match self {
            NotifyError::InvalidRoutingRecord(_) => "INVALID_ROUTING_RECORD",
            NotifyError::InvalidTagPattern(_) => "INVALID_TAG_PATTERN",
            NotifyError::InvalidTemplateProperties(_) => "INVALID_TEMPLATE_PROPERTIES",
            NotifyError::Delivery(_) => "DELIVERY_ERROR",
            NotifyError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
