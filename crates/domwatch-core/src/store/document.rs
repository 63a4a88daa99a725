// # YAML Documents
//
// Whole-file persistence shared by every store.
//
// ## Lifecycle
//
// - Load: read the backing file, or synthesize `T::default()` when it does
//   not exist yet (first run)
// - Normalize: a successfully parsed document is written straight back, so
//   fields added since the file was last saved show up for the operator
// - Flush: the full value is serialized and replaces the file; there is no
//   append or patch path
//
// ## Atomic writes
//
// New contents go to `<file>.tmp` first and are renamed over the target,
// so a crash mid-write leaves the previous document intact.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{Error, Result};

/// A value persisted as one YAML file
pub trait Document: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Human-readable name used in log lines ("settings", "domain table", ...)
    const KIND: &'static str;

    /// True when the value carries nothing but zero values
    ///
    /// A blank document after a successful parse usually means the operator
    /// has not filled the file in yet. It is reported, never rejected.
    fn is_blank(&self) -> bool;
}

/// How a document came into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file did not exist; a default was written
    Created,
    /// The file existed and parsed
    Loaded,
}

/// Load `path`, or create it holding `T::default()`
///
/// Returns the value together with how it was obtained. Unparseable contents
/// yield [`Error::Corrupt`] and leave the file untouched.
pub async fn load_or_init<T: Document>(path: &Path) -> Result<(T, LoadOutcome)> {
    ensure_parent(path).await?;

    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let value = T::default();
            write(path, &value).await?;
            tracing::info!(
                "Created default {} at {}",
                T::KIND,
                path.display()
            );
            return Ok((value, LoadOutcome::Created));
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let value = parse::<T>(path, &content)?;
    tracing::debug!("Loaded {} from {}", T::KIND, path.display());

    if value.is_blank() {
        tracing::warn!(
            "{} at {} is empty; it may not be configured yet",
            T::KIND,
            path.display()
        );
    }

    write(path, &value).await?;
    Ok((value, LoadOutcome::Loaded))
}

/// Parse document text
///
/// A file holding only whitespace or comments is treated as the default value.
pub fn parse<T: Document>(path: &Path, content: &str) -> Result<T> {
    let has_content = content.lines().map(str::trim).any(|line| {
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(T::default());
    }

    // A bare `~` or `null` document also means "nothing configured"
    let value: Option<T> =
        serde_yaml::from_str(content).map_err(|e| Error::corrupt(path, e))?;
    Ok(value.unwrap_or_default())
}

/// Serialize `value` and replace the file at `path` with it
pub async fn write<T: Document>(path: &Path, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value)?;

    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = async {
        file.write_all(yaml.as_bytes())
            .await
            .map_err(|e| Error::io(&temp_path, e))?;
        file.flush().await.map_err(|e| Error::io(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| Error::io(path, e))
    }
    .await;

    if let Err(e) = written {
        discard_temp(&temp_path).await;
        return Err(e);
    }

    tracing::trace!("Flushed {} to {}", T::KIND, path.display());
    Ok(())
}

/// Best-effort removal of a temp file left by a failed write
async fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        tracing::debug!(
            "Could not remove leftover {}: {}",
            temp_path.display(),
            e
        );
    }
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !fs::try_exists(parent).await.unwrap_or(false)
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// `domain.yaml` -> `domain.yaml.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
