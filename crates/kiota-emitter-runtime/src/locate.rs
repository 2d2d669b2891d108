//! Generator executable location

use crate::{BridgeError, BridgeResult};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a side-loaded generator binary
pub const SIDELOADING_ENV: &str = "KIOTA_SIDELOADING_BINARY_PATH";

/// Name of the generator binary looked up on `PATH`
pub const GENERATOR_BINARY: &str = "kiota";

/// Resolves which generator executable to run
///
/// Lookup order: explicit path, side-loaded path, `kiota` on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorLocator {
    explicit: Option<PathBuf>,
    sideloaded: Option<PathBuf>,
}

impl GeneratorLocator {
    /// Create a locator from already known candidates
    pub fn new(explicit: Option<PathBuf>, sideloaded: Option<PathBuf>) -> Self {
        Self {
            explicit,
            sideloaded,
        }
    }

    /// Create a locator that also honours [`SIDELOADING_ENV`]
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        let sideloaded = std::env::var_os(SIDELOADING_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::new(explicit, sideloaded)
    }

    /// Always use `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()), None)
    }

    /// Resolve the generator path without checking that it exists
    pub fn locate(&self) -> BridgeResult<PathBuf> {
        if let Some(path) = self.explicit.as_ref().or(self.sideloaded.as_ref()) {
            return Ok(path.clone());
        }

        which::which(GENERATOR_BINARY).map_err(|err| {
            BridgeError::GeneratorNotFound(format!("{GENERATOR_BINARY} is not on PATH ({err})"))
        })
    }
}

/// Check that `path` is a file the current user may execute
pub async fn ensure_present(path: &Path) -> BridgeResult<()> {
    let not_executable = || BridgeError::GeneratorNotExecutable {
        path: path.to_path_buf(),
    };

    let metadata = tokio::fs::metadata(path).await.map_err(|err| {
        tracing::debug!(path = %path.display(), error = %err, "Generator metadata unavailable");
        not_executable()
    })?;
    if !metadata.is_file() {
        return Err(not_executable());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(not_executable());
        }
    }

    Ok(())
}
