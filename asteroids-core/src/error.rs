use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum ScoreStoreError {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Encode(serde_json::Error),
}

impl ScoreStoreError {
    /// A missing score file is the normal first-run state, not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed reading score file {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed writing score file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "corrupt score file {}: {source}", path.display())
            }
            Self::Encode(source) => write!(f, "failed encoding scores: {source}"),
        }
    }
}

impl std::error::Error for ScoreStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Encode(source) => Some(source),
        }
    }
}
