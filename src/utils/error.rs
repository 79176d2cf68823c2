use thiserror::Error;

#[derive(Error, Debug)]
pub enum MamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} '{name}'")]
    UnknownNameError { kind: &'static str, name: String },

    #[error("Simulation error: {message}")]
    SimulationError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Serialization,
    Configuration,
    Simulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MamError::IoError(_) | MamError::ZipError(_) => ErrorCategory::Storage,
            MamError::SerializationError(_) | MamError::CsvError(_) | MamError::ExportError { .. } => {
                ErrorCategory::Serialization
            }
            MamError::TomlError(_)
            | MamError::MissingConfigError { .. }
            | MamError::InvalidConfigValueError { .. }
            | MamError::UnknownNameError { .. } => ErrorCategory::Configuration,
            MamError::SimulationError { .. } => ErrorCategory::Simulation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Simulation => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MamError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            MamError::ZipError(_) => "Remove the partial bundle and export again".to_string(),
            MamError::SerializationError(_) => {
                "The leaderboard or report file may be corrupt; move it aside and retry".to_string()
            }
            MamError::CsvError(_) | MamError::ExportError { .. } => {
                "Retry the export with a smaller tile region".to_string()
            }
            MamError::TomlError(_) => "Fix the TOML syntax in the configuration file".to_string(),
            MamError::MissingConfigError { field } => format!("Add '{}' to the configuration", field),
            MamError::InvalidConfigValueError { field, .. } => {
                format!("Adjust '{}' to a supported value", field)
            }
            MamError::UnknownNameError { kind, .. } => match *kind {
                "terrain mode" => "Use 'quantum' or 'random'".to_string(),
                "key" => "Use one of: left, right, a, d, q, r".to_string(),
                "key action" => "Use 'press' or 'release'".to_string(),
                _ => format!("Check the spelling of the {}", kind),
            },
            MamError::SimulationError { .. } => {
                "Re-run with --verbose to inspect the session log".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Storage => format!("Could not read or write game data: {}", self),
            ErrorCategory::Serialization => format!("Could not encode game data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Simulation => format!("The run could not continue: {}", self),
        }
    }

    /// Exit code for binaries, derived from severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MamError>;
