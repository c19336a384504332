// Runtime state module
// Holds the loaded configuration and the resolved document root

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Shared application state, constructed once before the listen loop begins
/// and never mutated afterwards. Request handlers receive it behind an `Arc`
/// instead of relying on the process working directory.
pub struct AppState {
    pub config: Config,
    /// Canonicalized document root all request paths resolve against
    pub root: PathBuf,
}

impl AppState {
    /// Resolve and canonicalize the document root.
    ///
    /// Fails fast when the root does not exist, so a misconfigured server
    /// dies at startup rather than answering every request with a fallback.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = resolve_root(&config)?;
        Ok(Self { config, root })
    }

    /// Construct a state around an already-resolved root (tests only).
    #[cfg(test)]
    pub fn with_root(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}

fn resolve_root(config: &Config) -> io::Result<PathBuf> {
    let candidate = match &config.spa.root {
        Some(dir) => PathBuf::from(dir),
        // Anchor resolution next to the binary so launching from any
        // directory serves the same tree
        None => std::env::current_exe()?
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    candidate.canonicalize()
}
