//! Configuration Resolver
//!
//! Turns literal declarations plus an externally resolved platform context
//! into a [`BuildDescriptor`]. Resolution is a pure function of its inputs:
//! it performs no I/O and keeps no state, so resolving identical inputs twice
//! yields equal descriptors. Either a complete descriptor is returned, or an
//! error. There is no partial result.

use crate::context::PlatformContext;
use crate::descriptor::{BuildDescriptor, JavaVersion, Parts};
use crate::{dependency, signing};

/// Variant name used by [`resolve()`].
pub const DEFAULT_VARIANT: &str = "default";

/// Resolution Errors
///
/// This is the exhaustive list of reasons a resolution can fail. All of them
/// are terminal for the call.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required declaration is empty.
    #[error("required field '{0}' is empty")]
    MissingRequiredField(&'static str),
    /// Version codes must be positive.
    #[error("version code must be positive")]
    InvalidVersionCode,
    /// SDK levels violate `min <= target <= compile`.
    #[error("invalid SDK range: min {min}, target {target}, compile {compile}")]
    InvalidSdkRange { min: u32, target: u32, compile: u32 },
    /// Source, target and Kotlin JVM levels disagree.
    #[error("inconsistent Java compatibility: source {source_level}, target {target_level}, jvm-target {jvm_target}")]
    InconsistentJavaCompatibility {
        source_level: &'static str,
        target_level: &'static str,
        jvm_target: &'static str,
    },
    /// The variant is not declared.
    #[error("unknown build variant '{0}'")]
    UnknownVariant(String),
    /// The signing reference names no registered configuration.
    #[error("unknown signing configuration '{0}'")]
    UnknownSigningConfig(signing::Ref),
    /// Desugaring is enabled but the backport library is not declared.
    #[error("core library desugaring enabled but `coreLibraryDesugaring(\"{}:{}:<version>\")` is not declared", dependency::DESUGAR_GROUP, dependency::DESUGAR_ARTIFACT)]
    MissingDesugaringDependency,
}

/// Build Type
///
/// Per-variant declarations. A build type without signing reference uses the
/// default reference of its [`Declarations`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildType {
    pub signing_config: Option<signing::Ref>,
}

/// Declarations
///
/// The literal, project-authored part of the build configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declarations {
    pub application_id: String,
    pub namespace: String,
    pub desugaring_enabled: bool,
    pub source_compatibility: JavaVersion,
    pub target_compatibility: JavaVersion,
    /// Kotlin `jvmTarget`, if the project sets one.
    pub jvm_target: Option<JavaVersion>,
    pub signing_configs: signing::Registry,
    /// Signing reference of the default configuration.
    pub signing_config: signing::Ref,
    /// Declared build types by variant name. `debug` and `release` exist
    /// implicitly and need not be listed.
    pub build_types: std::collections::BTreeMap<String, BuildType>,
    pub dependencies: dependency::Set,
}

impl Declarations {
    /// Create declarations with Android defaults
    ///
    /// Java 8 compatibility, no desugaring, only the `debug` signing
    /// configuration and no explicit build types.
    pub fn new(application_id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            namespace: namespace.into(),
            desugaring_enabled: false,
            source_compatibility: JavaVersion::V1_8,
            target_compatibility: JavaVersion::V1_8,
            jvm_target: None,
            signing_configs: signing::Registry::with_debug(),
            signing_config: signing::Ref::debug(),
            build_types: Default::default(),
            dependencies: dependency::Set::new(),
        }
    }

    // Look up a build type, including the implicit ones.
    fn build_type(&self, variant: &str) -> Option<BuildType> {
        match self.build_types.get(variant) {
            Some(v) => Some(v.clone()),
            None if variant == "debug" || variant == "release" => Some(BuildType::default()),
            None => None,
        }
    }
}

/// Resolve the default configuration
///
/// Validate the declarations against the platform context and assemble a
/// descriptor using the default signing reference. The resulting variant
/// is named [`DEFAULT_VARIANT`].
pub fn resolve(
    context: &PlatformContext,
    declarations: &Declarations,
) -> Result<BuildDescriptor, Error> {
    resolve_with(
        DEFAULT_VARIANT,
        context,
        declarations,
        declarations.signing_config.clone(),
    )
}

/// Resolve a named build variant
///
/// Like [`resolve()`], but uses the signing reference the build type of
/// `variant` declares, falling back to the default reference. A `release`
/// build type that reuses the `debug` configuration is honoured exactly as
/// declared, but reported as a warning.
pub fn resolve_for_variant(
    variant: &str,
    context: &PlatformContext,
    declarations: &Declarations,
) -> Result<BuildDescriptor, Error> {
    let build_type = declarations.build_type(variant)
        .ok_or_else(|| Error::UnknownVariant(variant.to_string()))?;
    let signing_config = build_type.signing_config
        .unwrap_or_else(|| declarations.signing_config.clone());

    if variant == "release" && signing_config.as_str() == signing::DEBUG {
        tracing::warn!(
            variant,
            "release variant is signed with the debug signing configuration"
        );
    }

    resolve_with(variant, context, declarations, signing_config)
}

fn resolve_with(
    variant: &str,
    context: &PlatformContext,
    declarations: &Declarations,
    signing_config: signing::Ref,
) -> Result<BuildDescriptor, Error> {
    tracing::debug!(variant, application_id = %declarations.application_id, "resolving build descriptor");

    if declarations.application_id.is_empty() {
        return Err(Error::MissingRequiredField("application-id"));
    }
    if declarations.namespace.is_empty() {
        return Err(Error::MissingRequiredField("namespace"));
    }
    if declarations.namespace != declarations.application_id {
        tracing::warn!(
            namespace = %declarations.namespace,
            application_id = %declarations.application_id,
            "namespace differs from application id"
        );
    }

    if context.version_code == 0 {
        return Err(Error::InvalidVersionCode);
    }

    if context.min_sdk_version > context.target_sdk_version
        || context.target_sdk_version > context.compile_sdk_version
    {
        return Err(Error::InvalidSdkRange {
            min: context.min_sdk_version,
            target: context.target_sdk_version,
            compile: context.compile_sdk_version,
        });
    }

    // Kotlin defaults `jvmTarget` to the Java target, so only an explicit
    // value can disagree.
    let level = declarations.source_compatibility;
    let jvm_target = declarations.jvm_target.unwrap_or(declarations.target_compatibility);
    if declarations.target_compatibility != level || jvm_target != level {
        return Err(Error::InconsistentJavaCompatibility {
            source_level: level.as_str(),
            target_level: declarations.target_compatibility.as_str(),
            jvm_target: jvm_target.as_str(),
        });
    }

    if !declarations.signing_configs.contains(&signing_config) {
        return Err(Error::UnknownSigningConfig(signing_config));
    }

    if declarations.desugaring_enabled {
        match declarations.dependencies.desugaring() {
            Some(v) => tracing::debug!(coordinate = %v.coordinate, "desugaring backport declared"),
            None => return Err(Error::MissingDesugaringDependency),
        }
    }

    Ok(BuildDescriptor::from_parts(Parts {
        variant: variant.to_string(),
        application_id: declarations.application_id.clone(),
        namespace: declarations.namespace.clone(),
        compile_sdk_version: context.compile_sdk_version,
        min_sdk_version: context.min_sdk_version,
        target_sdk_version: context.target_sdk_version,
        version_code: context.version_code,
        version_name: context.version_name.clone(),
        ndk_version: context.ndk_version.clone(),
        signing_config_ref: signing_config,
        desugaring_enabled: declarations.desugaring_enabled,
        java_compatibility_level: level,
    }))
}
