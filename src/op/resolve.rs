//! Resolve Build Descriptor
//!
//! Resolve the descriptor of one build variant from a parsed manifest and a
//! platform context. This is the manifest-driven front of
//! [`crate::resolver`].

use crate::context::PlatformContext;
use crate::descriptor::BuildDescriptor;
use crate::{dependency, manifest, resolver};

/// Resolve Errors
///
/// This is the exhaustive list of possible errors raised by the resolve
/// operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No platform entry with the given ID in the manifest.
    #[error("no platform '{0}' in manifest")]
    UnknownPlatform(String),
    /// The platform entry carries no Android configuration.
    #[error("platform '{0}' has no android configuration")]
    NotAndroid(String),
    /// Manifest content cannot be turned into declarations.
    #[error(transparent)]
    Manifest(#[from] manifest::Error),
    /// Declarations and context do not resolve.
    #[error(transparent)]
    Resolve(#[from] resolver::Error),
}

/// Resolved descriptor together with the dependency declarations it was
/// checked against. Renderers need both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub descriptor: BuildDescriptor,
    pub dependencies: dependency::Set,
}

/// Look up the Android platform entry with the given ID.
pub fn platform<'m>(
    manifest: &'m manifest::Manifest,
    platform_id: &str,
) -> Result<(&'m manifest::RawPlatform, &'m manifest::RawPlatformAndroid), Error> {
    let platform = manifest.raw.platform_by_id(platform_id)
        .ok_or_else(|| Error::UnknownPlatform(platform_id.to_string()))?;
    let android = platform.android()
        .ok_or_else(|| Error::NotAndroid(platform_id.to_string()))?;
    Ok((platform, android))
}

/// Resolve a build variant
///
/// Assemble the declarations of the Android platform entry `platform_id`
/// and resolve them against `context`. Without `variant`, the default
/// configuration is resolved.
pub fn resolve(
    manifest: &manifest::Manifest,
    platform_id: &str,
    context: &PlatformContext,
    variant: Option<&str>,
) -> Result<Resolution, Error> {
    let (_, android) = platform(manifest, platform_id)?;
    let declarations = android.declarations()?;

    let descriptor = match variant {
        Some(v) => resolver::resolve_for_variant(v, context, &declarations)?,
        None => resolver::resolve(context, &declarations)?,
    };

    Ok(Resolution {
        descriptor: descriptor,
        dependencies: declarations.dependencies,
    })
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
        [platform.android.build-types.release]
        signing-config = \"debug\"
        [[platform.android.dependencies]]
        configuration = \"coreLibraryDesugaring\"
        coordinate = \"com.android.tools:desugar_jdk_libs:2.0.4\"

        [[platform]]
        id = \"desktop\"
    ";

    #[test]
    fn resolve_manifest_variant() {
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();
        let r = resolve(&m, "android", &PlatformContext::flutter_defaults(), Some("release")).unwrap();

        assert_eq!(r.descriptor.variant(), "release");
        assert_eq!(r.descriptor.signing_config_ref().as_str(), "debug");
        assert_eq!(r.descriptor.namespace(), "com.example.dopamine");
        assert!(r.dependencies.desugaring().is_some());
    }

    #[test]
    fn resolve_manifest_errors() {
        let m = manifest::Manifest::parse_str(MANIFEST).unwrap();
        let c = PlatformContext::flutter_defaults();

        assert!(matches!(resolve(&m, "ios", &c, None), Err(Error::UnknownPlatform(_))));
        assert!(matches!(resolve(&m, "desktop", &c, None), Err(Error::NotAndroid(_))));
        assert!(matches!(
            resolve(&m, "android", &c, Some("profile")),
            Err(Error::Resolve(resolver::Error::UnknownVariant(_))),
        ));

        let mut c = PlatformContext::flutter_defaults();
        c.min_sdk_version = 40;
        assert!(matches!(
            resolve(&m, "android", &c, None),
            Err(Error::Resolve(resolver::Error::InvalidSdkRange { .. })),
        ));
    }
}
