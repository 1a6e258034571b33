use std::fmt;

use crate::render::RenderError;

#[derive(Debug)]
pub enum FileDagError {
    Io(std::io::Error),
    Parse {
        line: usize,
        content: String,
        reason: String,
    },
    Render(RenderError),
    Config(String),
}

impl FileDagError {
    pub fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        FileDagError::Parse {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FileDagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileDagError::Io(err) => write!(f, "IO error: {}", err),
            FileDagError::Parse {
                line,
                content,
                reason,
            } => write!(f, "Parse error on line {}: {}: {:?}", line, reason, content),
            FileDagError::Render(err) => write!(f, "Render error: {}", err),
            FileDagError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for FileDagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileDagError::Io(err) => Some(err),
            FileDagError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FileDagError {
    fn from(err: std::io::Error) -> Self {
        FileDagError::Io(err)
    }
}

impl From<RenderError> for FileDagError {
    fn from(err: RenderError) -> Self {
        FileDagError::Render(err)
    }
}

impl From<toml::de::Error> for FileDagError {
    fn from(err: toml::de::Error) -> Self {
        FileDagError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FileDagError>;
