//! Persistent Build Script
//!
//! The `emerge` operation resolves a build variant and stores the resulting
//! Gradle Kotlin-DSL build script in the platform directory. Gradle then
//! consumes the descriptor without further involvement of this crate.

use crate::context::PlatformContext;
use crate::{manifest, render};

/// Emerge Errors
///
/// This is the exhaustive list of possible errors raised by the emerge
/// operation. See each error for details.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Platform integration is already present and updating was not
    /// allowed by the caller.
    #[error("platform integration already present")]
    Already,
    /// Cannot access the specified platform directory.
    #[error("cannot access platform directory {0:?}")]
    PlatformDirectory(std::ffi::OsString),
    /// Creation of the directory at the specified path failed.
    #[error("failed to create directory {0:?}")]
    DirectoryCreation(std::ffi::OsString),
    /// Updating the file at the specified path failed with the given error.
    #[error("failed to update {0:?}: {1}")]
    FileUpdate(std::ffi::OsString, #[source] std::io::Error),
    /// The variant could not be resolved.
    #[error(transparent)]
    Resolve(#[from] crate::op::resolve::Error),
}

// Ensure directory exists
//
// Make sure the directory at the given path exists. Create the directory and
// its parent directories if necessary.
fn ensure_dir(
    path: &std::path::Path,
) -> Result<(), Error> {
    std::fs::create_dir_all(path)
        .map_err(
            |_| Error::DirectoryCreation(path.as_os_str().to_os_string())
        )
}

// Update a file if required
//
// This writes the given content to the specified file, but only if the file
// content does not already match the new content. Thus, the file timestamp
// is only modified if the content really changed, and Gradle does not
// reconfigure needlessly. Returns whether the file was written.
fn update_file(
    path: &std::path::Path,
    content: &str,
) -> Result<bool, Error> {
    let file_error = |v: std::io::Error| Error::FileUpdate(path.as_os_str().to_os_string(), v);

    // Open the file read+write and create it if it does not exist, yet.
    let mut f = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .map_err(file_error)?;

    let mut old = String::new();
    <std::fs::File as std::io::Read>::read_to_string(&mut f, &mut old)
        .map_err(file_error)?;

    if old == content {
        return Ok(false);
    }

    // Rewind, truncate and write the new contents.
    <std::fs::File as std::io::Seek>::rewind(&mut f).map_err(file_error)?;
    f.set_len(0).map_err(file_error)?;
    <std::fs::File as std::io::Write>::write_all(&mut f, content.as_bytes())
        .map_err(file_error)?;

    // Sync the file now to ensure errors are caught properly.
    f.sync_all().map_err(file_error)?;

    Ok(true)
}

/// Emerge persistent build script
///
/// Resolve `variant` (or the default configuration) of the Android platform
/// entry `platform_id` and write the rendered `app/build.gradle.kts` below
/// the platform directory. By default, the platform directory is taken from
/// the manifest. This base path can be overridden via `path_override`.
///
/// This function will fail if the platform directory already exists, unless
/// `update` is `true`. In this case, the build script is rewritten if its
/// content changed. Nothing is written if resolution fails.
pub fn emerge(
    manifest: &manifest::Manifest,
    platform_id: &str,
    context: &PlatformContext,
    variant: Option<&str>,
    path_override: Option<&std::path::Path>,
    update: bool,
) -> Result<(), Error> {
    let (platform, _) = crate::op::resolve::platform(manifest, platform_id)?;
    let resolution = crate::op::resolve::resolve(manifest, platform_id, context, variant)?;

    let mut path = match path_override {
        Some(v) => v.to_path_buf(),
        None => std::path::PathBuf::from(platform.path()),
    };

    // If the path points to something other than a directory, we fail. If
    // it points to an existing directory and updates are not allowed, we
    // fail as well. Otherwise, we create the path and continue.
    match std::fs::metadata(&path) {
        Ok(v) => {
            if !v.is_dir() {
                return Err(Error::PlatformDirectory(path.as_os_str().to_os_string()));
            } else if !update {
                return Err(Error::Already);
            }
        },
        Err(v) => {
            if v.kind() != std::io::ErrorKind::NotFound {
                return Err(Error::PlatformDirectory(path.as_os_str().to_os_string()));
            }
            ensure_dir(path.as_path())?;
        },
    };

    let content = render::gradle_kts(&resolution.descriptor, &resolution.dependencies);

    path.push("app");
    ensure_dir(path.as_path())?;
    path.push("build.gradle.kts");
    if update_file(path.as_path(), &content)? {
        tracing::info!(path = %path.display(), variant = resolution.descriptor.variant(), "wrote build script");
    } else {
        tracing::debug!(path = %path.display(), "build script up to date");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "
        version = 1
        [[platform]]
        id = \"android\"
        [platform.android]
        application-id = \"com.example.dopamine\"
        desugaring = true
        [[platform.android.dependencies]]
        configuration = \"coreLibraryDesugaring\"
        coordinate = \"com.android.tools:desugar_jdk_libs:2.0.4\"
    ";

    // Verify a fresh emerge
    //
    // The platform directory is created along with `app/` and the script
    // carries the resolved values.
    #[test]
    fn emerge_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("android");
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();

        emerge(&m, "android", &PlatformContext::flutter_defaults(), Some("release"), Some(&base), false).unwrap();

        let s = std::fs::read_to_string(base.join("app/build.gradle.kts")).unwrap();
        assert!(s.contains("applicationId = \"com.example.dopamine\""));
        assert!(s.contains("getByName(\"release\")"));
    }

    // Verify update semantics
    //
    // Existing directories are refused without `update`. With `update`, the
    // script is rewritten only when its content changes.
    #[test]
    fn emerge_update() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();
        let mut c = PlatformContext::flutter_defaults();

        assert!(matches!(
            emerge(&m, "android", &c, None, Some(&base), false),
            Err(Error::Already),
        ));

        emerge(&m, "android", &c, None, Some(&base), true).unwrap();
        let script = base.join("app/build.gradle.kts");
        assert!(!update_file(&script, &std::fs::read_to_string(&script).unwrap()).unwrap());

        c.version_code = 42;
        emerge(&m, "android", &c, None, Some(&base), true).unwrap();
        assert!(std::fs::read_to_string(&script).unwrap().contains("versionCode = 42\n"));
    }

    // Verify nothing is written on resolution failures
    #[test]
    fn emerge_resolve_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("android");
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();
        let mut c = PlatformContext::flutter_defaults();
        c.target_sdk_version = 99;

        assert!(matches!(
            emerge(&m, "android", &c, None, Some(&base), false),
            Err(Error::Resolve(_)),
        ));
        assert!(!base.exists());
    }

    #[test]
    fn emerge_platform_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("android");
        std::fs::write(&base, "").unwrap();
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();

        assert!(matches!(
            emerge(&m, "android", &PlatformContext::flutter_defaults(), None, Some(&base), true),
            Err(Error::PlatformDirectory(_)),
        ));
    }
}
