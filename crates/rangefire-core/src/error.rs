use core::fmt;

/// Rejected configuration input. Gameplay itself never errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be decoded.
    Parse { message: String },
    /// A field is outside its legal range.
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    /// No preset with this name.
    UnknownDifficulty { name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { message } => write!(f, "config parse error: {message}"),
            Self::InvalidField { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
            Self::UnknownDifficulty { name } => write!(f, "unknown difficulty: {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
