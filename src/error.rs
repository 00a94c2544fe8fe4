use colored::Colorize;
use std::fmt;

#[derive(Debug)]
pub enum BtebError {
    InvalidRegulation {
        given: String,
        known: Vec<String>,
    },
    InvalidRoll {
        roll: String,
        reason: String,
    },
    ResultNotFound {
        roll: String,
        regulation: String,
    },
    Upstream {
        status: Option<u16>,
        message: String,
    },
    BooklistNotFound {
        slug: String,
        suggestions: Vec<String>,
    },
    ConfigError {
        path: String,
        message: String,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl BtebError {
    pub fn invalid_regulation(given: impl Into<String>, known: Vec<String>) -> Self {
        Self::InvalidRegulation {
            given: given.into(),
            known,
        }
    }

    pub fn invalid_roll(roll: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoll {
            roll: roll.into(),
            reason: reason.into(),
        }
    }

    pub fn result_not_found(roll: impl Into<String>, regulation: impl Into<String>) -> Self {
        Self::ResultNotFound {
            roll: roll.into(),
            regulation: regulation.into(),
        }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn booklist_not_found(slug: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::BooklistNotFound {
            slug: slug.into(),
            suggestions,
        }
    }

    pub fn config_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io_error(
        operation: impl Into<String>,
        path: Option<String>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// The short, uncolored message shown to end users of the lookup.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRegulation { given, .. } => format!("Unknown regulation: {given}"),
            Self::InvalidRoll { reason, .. } => reason.clone(),
            Self::ResultNotFound { roll, .. } => format!("No result found for roll {roll}"),
            Self::Upstream { message, .. } => message.clone(),
            Self::BooklistNotFound { .. } => "Technology booklist not found".to_string(),
            Self::ConfigError { message, .. } => message.clone(),
            Self::IoError { operation, .. } => format!("I/O error during {operation}"),
            Self::Other(err) => err.to_string(),
        }
    }
}

impl fmt::Display for BtebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegulation { given, known } => {
                writeln!(
                    f,
                    "{} Unknown regulation: {}",
                    "✗".red().bold(),
                    given.yellow()
                )?;
                if !known.is_empty() {
                    writeln!(f, "  {} Known regulations: {}", "→".blue(), known.join(", "))?;
                }
                Ok(())
            }
            Self::InvalidRoll { roll, reason } => {
                writeln!(
                    f,
                    "{} Invalid roll number: {}",
                    "✗".red().bold(),
                    roll.yellow()
                )?;
                writeln!(f, "  {} {}", "→".blue(), reason)?;
                Ok(())
            }
            Self::ResultNotFound { roll, regulation } => {
                writeln!(
                    f,
                    "{} No result found for roll: {}",
                    "✗".red().bold(),
                    roll.yellow()
                )?;
                writeln!(f, "  {} Regulation: {}", "→".blue(), regulation)?;
                writeln!(
                    f,
                    "  {} Check the roll number and regulation, then try again",
                    "→".blue()
                )?;
                Ok(())
            }
            Self::Upstream { status, message } => {
                writeln!(f, "{} Result service error", "✗".red().bold())?;
                if let Some(status) = status {
                    writeln!(f, "  {} Status: {}", "→".blue(), status.to_string().yellow())?;
                }
                writeln!(f, "  {} {}", "→".blue(), message)?;
                Ok(())
            }
            Self::BooklistNotFound { slug, suggestions } => {
                writeln!(
                    f,
                    "{} Technology booklist not found: {}",
                    "✗".red().bold(),
                    slug.yellow()
                )?;
                if !suggestions.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "{}", "Did you mean:".green())?;
                    for suggestion in suggestions {
                        writeln!(f, "  {} {}", "•".blue(), suggestion)?;
                    }
                }
                Ok(())
            }
            Self::ConfigError { path, message } => {
                writeln!(f, "{} Configuration error", "✗".red().bold())?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                writeln!(f, "  {} Error: {}", "→".blue(), message)?;
                Ok(())
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for BtebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BtebError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for BtebError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

impl From<reqwest::Error> for BtebError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request to result service timed out".to_string()
        } else if err.is_connect() {
            "Could not connect to result service".to_string()
        } else {
            format!("Failed to fetch result: {err}")
        };
        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, BtebError>;
