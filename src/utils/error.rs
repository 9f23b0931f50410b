use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Extraction failed for {url}: {message}")]
    ExtractionError { url: String, message: String },

    #[error("Player '{player}' not found on {team} roster")]
    PlayerNotFound { player: String, team: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Extraction,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::HttpError(_) | ScrapeError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            ScrapeError::ConfigValidationError { .. }
            | ScrapeError::InvalidConfigValueError { .. }
            | ScrapeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScrapeError::SelectorError { .. }
            | ScrapeError::ExtractionError { .. }
            | ScrapeError::PlayerNotFound { .. } => ErrorCategory::Extraction,
            ScrapeError::MalformedInput { .. }
            | ScrapeError::CsvError(_)
            | ScrapeError::SerializationError(_) => ErrorCategory::Data,
            ScrapeError::IoError(_) | ScrapeError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Extraction | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScrapeError::HttpError(_) => {
                "Check network connectivity and that the stats site is reachable".to_string()
            }
            ScrapeError::HttpStatusError { status, .. } if *status == 429 => {
                "The site is rate limiting requests; lower --concurrent-requests or use --sequential"
                    .to_string()
            }
            ScrapeError::HttpStatusError { .. } => {
                "Verify the team abbreviation and season exist on the site".to_string()
            }
            ScrapeError::PlayerNotFound { .. } => {
                "Check the player's spelling or add an explicit player path override".to_string()
            }
            ScrapeError::SelectorError { .. } | ScrapeError::ExtractionError { .. } => {
                "The page layout may have changed; check the configured table ids".to_string()
            }
            ScrapeError::MalformedInput { .. } => {
                "Make sure the presence key stat is part of the requested stat list".to_string()
            }
            ScrapeError::ConfigValidationError { .. }
            | ScrapeError::InvalidConfigValueError { .. }
            | ScrapeError::MissingConfigError { .. } => {
                "Review the configuration file or command line arguments".to_string()
            }
            ScrapeError::IoError(_) | ScrapeError::ZipError(_) => {
                "Check that the output path is writable and has free space".to_string()
            }
            ScrapeError::CsvError(_) | ScrapeError::SerializationError(_) => {
                "Re-run with --verbose to see which record failed to serialize".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download a page: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Extraction => format!("Could not read the stats page: {}", self),
            ErrorCategory::Data => format!("Scraped data could not be processed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
