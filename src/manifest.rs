//! Platform Manifest
//!
//! Applications declare the literal part of their Android build
//! configuration in a TOML manifest, usually called `build-descriptor.toml`.
//! The manifest carries everything that is authored by the project: the
//! application identifier, compile options, signing configuration names,
//! build types and dependency declarations. Values resolved by the
//! cross-platform framework are not part of the manifest, see
//! [`crate::context`].

use crate::descriptor::JavaVersion;
use crate::{dependency, resolver, signing};

/// Manifest Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the manifest file failed.
    #[error("cannot read manifest {0:?}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),
    /// The manifest is not valid TOML, or does not match the format.
    #[error("cannot parse manifest: {0}")]
    Toml(#[from] toml::de::Error),
    /// Only version `1` of the format is supported.
    #[error("unsupported manifest version {0}")]
    UnsupportedVersion(u32),
    /// The key has an invalid value.
    #[error("invalid value for '{0}': {1:?}")]
    InvalidValue(&'static str, String),
    /// Specified key required but missing in manifest.
    #[error("manifest configuration missing '{0}'")]
    MissingKey(&'static str),
}

/// Raw Manifest Application Table
///
/// Sub-type of `Raw` representing the `Application` table.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawApplication {
    /// Identifier of the application. Only alphanumeric and `-`, `_`
    /// allowed.
    pub id: Option<String>,
    /// Human-readable name of the application.
    pub name: Option<String>,
}

/// Signing configuration entry. Only its name (the table key) matters to
/// resolution; credential keys are owned by the toolchain and ignored.
#[derive(Debug, Default, serde::Deserialize)]
pub struct RawSigningConfig {}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawBuildType {
    pub signing_config: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawDependency {
    pub configuration: String,
    pub coordinate: String,
}

/// Android-Platform Table
///
/// Sub-type of `RawPlatform` defining the Android build declarations. The
/// options are one-to-one mappings of their equivalents in the Android
/// Gradle DSL.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawPlatformAndroid {
    pub application_id: Option<String>,
    /// Defaults to the application ID.
    pub namespace: Option<String>,

    #[serde(default)]
    pub desugaring: bool,
    /// Shorthand setting both source and target compatibility.
    pub java_compatibility: Option<String>,
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub jvm_target: Option<String>,

    /// Signing configuration of the default config. Defaults to `debug`.
    pub signing_config: Option<String>,
    #[serde(default)]
    pub signing_configs: std::collections::BTreeMap<String, RawSigningConfig>,
    #[serde(default)]
    pub build_types: std::collections::BTreeMap<String, RawBuildType>,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawPlatformConfiguration {
    Android(RawPlatformAndroid),
}

/// Raw Manifest Platform Table
///
/// Sub-type of `Raw` representing the `Platform` table.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawPlatform {
    /// Custom ID of the platform integration.
    pub id: String,
    /// Path to the platform integration root relative from the manifest.
    pub path: Option<String>,

    /// Platform specific configuration.
    #[serde(flatten)]
    pub configuration: Option<RawPlatformConfiguration>,
}

/// Raw Manifest Content
///
/// This type contains the raw manifest content as parsed by `toml` and
/// converted into rust types via `serde`.
///
/// Note that content of the type is not verified other than for syntactic
/// correctness required by the given types. Semantic correctness needs to
/// be verified by the caller.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Raw {
    /// Version of the manifest format. Only version `1` is currently
    /// supported.
    pub version: u32,

    pub application: Option<RawApplication>,
    #[serde(default)]
    pub platform: Vec<RawPlatform>,
}

/// Manifest Abstraction
///
/// This type represents a valid and verified manifest. The manifest content
/// can be directly accessed via the `raw` field.
#[derive(Debug)]
pub struct Manifest {
    pub raw: Raw,
}

fn parse_java_version(key: &'static str, value: Option<&String>) -> Result<Option<JavaVersion>, Error> {
    match value {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| Error::InvalidValue(key, v.clone())),
    }
}

// Combine `java-compatibility` with an explicit source or target level.
// Both may be given only if they agree.
fn merge_java_version(
    key: &'static str,
    value: Option<&String>,
    shared: Option<JavaVersion>,
) -> Result<JavaVersion, Error> {
    match (parse_java_version(key, value)?, shared) {
        (Some(v), Some(s)) if v != s => Err(Error::InvalidValue(key, v.as_str().to_string())),
        (Some(v), _) | (None, Some(v)) => Ok(v),
        (None, None) => Ok(JavaVersion::V1_8),
    }
}

impl RawPlatformAndroid {
    /// Assemble resolver declarations
    ///
    /// Convert the table into [`resolver::Declarations`], applying the
    /// Android defaults for missing optional keys. Fails if the application
    /// ID is missing or a value cannot be interpreted.
    pub fn declarations(&self) -> Result<resolver::Declarations, Error> {
        let application_id = self.application_id.as_ref()
            .ok_or(Error::MissingKey("platform.android.application-id"))?;
        let namespace = self.namespace.as_ref().unwrap_or(application_id);

        let mut d = resolver::Declarations::new(application_id.as_str(), namespace.as_str());

        d.desugaring_enabled = self.desugaring;
        let shared = parse_java_version(
            "platform.android.java-compatibility",
            self.java_compatibility.as_ref(),
        )?;
        d.source_compatibility = merge_java_version(
            "platform.android.source-compatibility",
            self.source_compatibility.as_ref(),
            shared,
        )?;
        d.target_compatibility = merge_java_version(
            "platform.android.target-compatibility",
            self.target_compatibility.as_ref(),
            shared,
        )?;
        d.jvm_target = match &self.jvm_target {
            None => None,
            Some(v) => Some(
                v.parse().map_err(|_| Error::InvalidValue("platform.android.jvm-target", v.clone()))?
            ),
        };

        // The implicit `debug` entry is kept even if the manifest lists
        // other configurations, just like the Android Gradle Plugin does.
        for name in self.signing_configs.keys() {
            d.signing_configs.insert(signing::Config { name: name.clone() });
        }
        if let Some(v) = &self.signing_config {
            d.signing_config = signing::Ref::new(v.as_str());
        }

        for (name, build_type) in self.build_types.iter() {
            d.build_types.insert(
                name.clone(),
                resolver::BuildType {
                    signing_config: build_type.signing_config.as_deref().map(signing::Ref::new),
                },
            );
        }

        for dep in self.dependencies.iter() {
            let coordinate = dep.coordinate.parse()
                .map_err(|_| Error::InvalidValue("platform.android.dependencies.coordinate", dep.coordinate.clone()))?;
            d.dependencies.push(dependency::Configuration::from(dep.configuration.as_str()), coordinate);
        }

        Ok(d)
    }
}

impl RawPlatform {
    /// Return Android Configuration
    ///
    /// Return a reference to the embedded android configuration, or `None`,
    /// depending on whether the platform configuration is for Android.
    pub fn android(&self) -> Option<&RawPlatformAndroid> {
        if let Some(RawPlatformConfiguration::Android(v)) = self.configuration.as_ref() {
            Some(v)
        } else {
            None
        }
    }

    /// Return `platform.path` or its default
    ///
    /// Return the configured platform path, or its default value if missing.
    /// The default is `./platform/<id>` with `platform.id` as directory name.
    pub fn path(&self) -> String {
        if let Some(path) = self.path.as_ref() {
            path.clone()
        } else {
            format!("./platform/{}", self.id)
        }
    }
}

impl Raw {
    fn parse_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Find matching platform entry
    ///
    /// Search the platform entries for the first entry matching the specified
    /// platform ID.
    pub fn platform_by_id(&self, id: &str) -> Option<&RawPlatform> {
        self.platform.iter().find(
            |v| v.id == id
        )
    }
}

impl Manifest {
    // Check whether a string is a valid identifier
    //
    // This verifies that the given string consists of only alphanumeric
    // characters plus `-`, `_`. Empty identifiers are rejected.
    fn is_identifier(s: &str) -> bool {
        !s.is_empty() && s.chars().all(
            |v| v.is_alphanumeric() || v == '-' || v == '_'
        )
    }

    fn check_quotable(key: &'static str, value: Option<&String>) -> Result<(), Error> {
        match value {
            Some(v) if !crate::render::is_quotable(v) => Err(Error::InvalidValue(key, v.clone())),
            _ => Ok(()),
        }
    }

    /// Parse manifest from raw
    ///
    /// Take a raw representation of the manifest and perform post-parsing
    /// validation, ensuring the final manifest will not contain invalid
    /// entries.
    fn parse_raw(raw: Raw) -> Result<Self, Error> {
        // Unknown fields are ignored, so version '1' can grow. Any other
        // version number is explicitly incompatible.
        if raw.version != 1 {
            return Err(Error::UnsupportedVersion(raw.version));
        }

        if let Some(application) = &raw.application {
            if let Some(v) = &application.id {
                if !Self::is_identifier(v) {
                    return Err(Error::InvalidValue("application.id", v.clone()));
                }
            }
            Self::check_quotable("application.name", application.name.as_ref())?;
        }

        for platform in raw.platform.iter() {
            if let Some(android) = platform.android() {
                Self::check_quotable("platform.android.application-id", android.application_id.as_ref())?;
                Self::check_quotable("platform.android.namespace", android.namespace.as_ref())?;
                Self::check_quotable("platform.android.signing-config", android.signing_config.as_ref())?;

                for (name, build_type) in android.build_types.iter() {
                    Self::check_quotable("platform.android.build-types", Some(name))?;
                    Self::check_quotable(
                        "platform.android.build-types.signing-config",
                        build_type.signing_config.as_ref(),
                    )?;
                }
                for name in android.signing_configs.keys() {
                    Self::check_quotable("platform.android.signing-configs", Some(name))?;
                }
                for dep in android.dependencies.iter() {
                    if !Self::is_identifier(&dep.configuration) {
                        return Err(Error::InvalidValue(
                            "platform.android.dependencies.configuration",
                            dep.configuration.clone(),
                        ));
                    }
                    Self::check_quotable(
                        "platform.android.dependencies.coordinate",
                        Some(&dep.coordinate),
                    )?;
                }

                // Everything else that can be wrong without a missing key
                // is caught by assembling the declarations.
                match android.declarations() {
                    Ok(_) | Err(Error::MissingKey(_)) => {},
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(
            Self {
                raw: raw,
            }
        )
    }

    /// Parse manifest from string
    ///
    /// Parse the given string as a literal manifest in TOML representation.
    /// Content is verified and invalid manifests are refused.
    pub fn parse_str(content: &str) -> Result<Self, Error> {
        Raw::parse_str(content).and_then(Self::parse_raw)
    }

    /// Parse manifest from file-system
    ///
    /// Open the specified file and parse it as a manifest. The file is
    /// completely parsed into memory and then closed again before the
    /// function returns.
    pub fn parse_path(path: &std::path::Path) -> Result<Self, Error> {
        std::fs::read_to_string(path)
            .map_err(|v| Error::Io(path.to_path_buf(), v))
            .and_then(|v| Self::parse_str(&v))
    }
}
