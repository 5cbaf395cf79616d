//! Platform Context
//!
//! Values the cross-platform framework resolves on behalf of the Android
//! build: SDK levels, NDK version and the application version. A Flutter
//! project exposes these to Gradle as `flutter.*` properties, with the
//! application version written to `local.properties` by the framework tool.
//!
//! The context is an explicit value passed into the resolver. It is never
//! stored globally.

/// Context Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the properties file failed.
    #[error("cannot read platform context {0:?}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),
    /// The property with the given key has an invalid value.
    #[error("invalid value for platform property '{0}': {1:?}")]
    InvalidValue(String, String),
}

/// Property key of the compile SDK level.
pub const KEY_COMPILE_SDK: &str = "flutter.compileSdkVersion";
/// Property key of the minimum SDK level.
pub const KEY_MIN_SDK: &str = "flutter.minSdkVersion";
/// Property key of the target SDK level.
pub const KEY_TARGET_SDK: &str = "flutter.targetSdkVersion";
/// Property key of the version code.
pub const KEY_VERSION_CODE: &str = "flutter.versionCode";
/// Property key of the version name.
pub const KEY_VERSION_NAME: &str = "flutter.versionName";
/// Property key of the NDK version.
pub const KEY_NDK_VERSION: &str = "flutter.ndkVersion";

/// Platform Context
///
/// Externally resolved platform values. The resolver passes all of them
/// through unchanged, apart from checking the SDK ordering and that the
/// version code is positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformContext {
    pub compile_sdk_version: u32,
    pub min_sdk_version: u32,
    pub target_sdk_version: u32,
    pub version_code: u32,
    pub version_name: String,
    /// Opaque NDK version, never interpreted.
    pub ndk_version: String,
}

impl PlatformContext {
    /// Framework Defaults
    ///
    /// The values the Flutter Gradle plugin provides when the project does
    /// not override them, and the version Flutter assumes when
    /// `local.properties` carries none.
    pub fn flutter_defaults() -> Self {
        Self {
            compile_sdk_version: 34,
            min_sdk_version: 21,
            target_sdk_version: 34,
            version_code: 1,
            version_name: "1.0".to_string(),
            ndk_version: "23.1.7779620".to_string(),
        }
    }

    /// Parse context from properties
    ///
    /// Read the `flutter.*` keys from Java-properties text. Keys that are
    /// absent keep their framework default. Unrelated keys (like `sdk.dir`)
    /// are ignored.
    pub fn from_properties(content: &str) -> Result<Self, Error> {
        let mut context = Self::flutter_defaults();

        for (key, value) in parse_properties(content) {
            match key.as_str() {
                KEY_COMPILE_SDK => context.compile_sdk_version = parse_u32(&key, &value)?,
                KEY_MIN_SDK => context.min_sdk_version = parse_u32(&key, &value)?,
                KEY_TARGET_SDK => context.target_sdk_version = parse_u32(&key, &value)?,
                KEY_VERSION_CODE => context.version_code = parse_u32(&key, &value)?,
                KEY_VERSION_NAME => context.version_name = parse_quotable(key, value)?,
                KEY_NDK_VERSION => context.ndk_version = parse_quotable(key, value)?,
                _ => {},
            }
        }

        Ok(context)
    }

    /// Parse context from file-system
    ///
    /// Read the properties file at the given path into memory and parse it
    /// via `from_properties()`.
    pub fn from_path(path: &std::path::Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|v| Error::Io(path.to_path_buf(), v))?;
        Self::from_properties(&content)
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, Error> {
    value.parse().map_err(|_| Error::InvalidValue(key.to_string(), value.to_string()))
}

// String values are bound literally into build scripts.
fn parse_quotable(key: String, value: String) -> Result<String, Error> {
    if crate::render::is_quotable(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidValue(key, value))
    }
}

// Parse Java-properties text
//
// This covers the subset written by Android and Flutter tooling: one entry
// per line, separated by the first `=` or `:`, with `#` and `!` comment
// lines. Keys and values are trimmed. Line continuations and escapes are not
// supported; tools never emit them for these keys. Later entries win.
fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.starts_with('#') && !v.starts_with('!'))
        .map(|v| match v.find(|c| c == '=' || c == ':') {
            Some(i) => (v[..i].trim().to_string(), v[i + 1..].trim().to_string()),
            None => (v.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify parsing of a typical `local.properties`
    //
    // Flutter writes the SDK locations and the application version. The SDK
    // levels are not present and must keep the framework defaults.
    #[test]
    fn context_parse_local_properties() {
        let s = "
            # This file is generated
            sdk.dir=/opt/android-sdk
            flutter.sdk=/opt/flutter
            flutter.buildMode=release
            flutter.versionName=1.4.2
            flutter.versionCode=17
        ";

        let c = PlatformContext::from_properties(s).unwrap();
        assert_eq!(c.version_code, 17);
        assert_eq!(c.version_name, "1.4.2");
        assert_eq!(c.compile_sdk_version, 34);
        assert_eq!(c.min_sdk_version, 21);
        assert_eq!(c.ndk_version, "23.1.7779620");
    }

    // Verify overrides of all keys
    #[test]
    fn context_parse_overrides() {
        let s = "
            flutter.compileSdkVersion = 35
            flutter.minSdkVersion: 23
            ! legacy comment
            flutter.targetSdkVersion=35
            flutter.ndkVersion=26.1.10909125
        ";

        let c = PlatformContext::from_properties(s).unwrap();
        assert_eq!(c.compile_sdk_version, 35);
        assert_eq!(c.min_sdk_version, 23);
        assert_eq!(c.target_sdk_version, 35);
        assert_eq!(c.ndk_version, "26.1.10909125");
    }

    // Verify refusal of non-numeric SDK levels
    #[test]
    fn context_parse_invalid() {
        let r = PlatformContext::from_properties("flutter.minSdkVersion=lollipop");

        assert!(matches!(r, Err(Error::InvalidValue(k, v)) if k == KEY_MIN_SDK && v == "lollipop"));
    }

    // Verify refusal of values that cannot be bound literally
    //
    // Version and NDK names end up in Kotlin string literals, so quotes,
    // backslashes and `$` templates must not get through.
    #[test]
    fn context_parse_unquotable() {
        let cases = [
            "flutter.versionName=1.0\" + \"${System.getenv(\"HOME\")}",
            "flutter.versionName=${rootProject.name}",
            "flutter.ndkVersion=25\\1",
            "flutter.ndkVersion=25'1",
        ];

        for case in cases {
            let r = PlatformContext::from_properties(case);
            assert!(matches!(r, Err(Error::InvalidValue(..))), "accepted: {}", case);
        }

        let c = PlatformContext::from_properties("flutter.versionName=2.0.0+build.7").unwrap();
        assert_eq!(c.version_name, "2.0.0+build.7");
    }

    #[test]
    fn context_parse_empty() {
        assert_eq!(
            PlatformContext::from_properties("").unwrap(),
            PlatformContext::flutter_defaults(),
        );
    }

    #[test]
    fn context_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let r = PlatformContext::from_path(&dir.path().join("local.properties"));

        assert!(matches!(r, Err(Error::Io(..))));
    }
}
