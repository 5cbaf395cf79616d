//! Build Descriptor
//!
//! The immutable result of a resolution. A descriptor is assembled by the
//! resolver only, after all checks passed, and is then handed to the
//! external toolchain as-is.

/// Java Compatibility Level
///
/// The Java language levels accepted for source and target compatibility.
/// Implements `FromStr` for both the Gradle spelling (`VERSION_1_8`) and the
/// plain spelling (`1.8`, `8`). Use `as_str()` for the plain spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaVersion {
    V1_8,
    V11,
    V17,
    V21,
}

impl JavaVersion {
    /// Get the plain string representation (`1.8`, `11`, ...). This is
    /// also what Kotlin expects as `jvmTarget`.
    pub fn as_str(&self) -> &'static str {
        match self {
            JavaVersion::V1_8 => "1.8",
            JavaVersion::V11 => "11",
            JavaVersion::V17 => "17",
            JavaVersion::V21 => "21",
        }
    }

    /// Get the name of the matching `org.gradle.api.JavaVersion` constant.
    pub fn gradle_constant(&self) -> &'static str {
        match self {
            JavaVersion::V1_8 => "VERSION_1_8",
            JavaVersion::V11 => "VERSION_11",
            JavaVersion::V17 => "VERSION_17",
            JavaVersion::V21 => "VERSION_21",
        }
    }
}

impl std::str::FromStr for JavaVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.strip_prefix("VERSION_").unwrap_or(s);
        match v {
            "1.8" | "1_8" | "8" => Ok(Self::V1_8),
            "11" => Ok(Self::V11),
            "17" => Ok(Self::V17),
            "21" => Ok(Self::V21),
            _ => Err(()),
        }
    }
}

impl serde::Serialize for JavaVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Build Descriptor
///
/// Fully resolved configuration of one build variant. All fields are
/// read-only; the SDK ordering `min <= target <= compile` always holds.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    variant: String,
    application_id: String,
    namespace: String,
    compile_sdk_version: u32,
    min_sdk_version: u32,
    target_sdk_version: u32,
    version_code: u32,
    version_name: String,
    ndk_version: String,
    signing_config_ref: crate::signing::Ref,
    desugaring_enabled: bool,
    java_compatibility_level: JavaVersion,
    jvm_target: JavaVersion,
}

/// Descriptor fields as collected by the resolver. Kept crate-private so a
/// descriptor cannot be assembled without passing resolution.
pub(crate) struct Parts {
    pub variant: String,
    pub application_id: String,
    pub namespace: String,
    pub compile_sdk_version: u32,
    pub min_sdk_version: u32,
    pub target_sdk_version: u32,
    pub version_code: u32,
    pub version_name: String,
    pub ndk_version: String,
    pub signing_config_ref: crate::signing::Ref,
    pub desugaring_enabled: bool,
    pub java_compatibility_level: JavaVersion,
}

impl BuildDescriptor {
    pub(crate) fn from_parts(parts: Parts) -> Self {
        Self {
            variant: parts.variant,
            application_id: parts.application_id,
            namespace: parts.namespace,
            compile_sdk_version: parts.compile_sdk_version,
            min_sdk_version: parts.min_sdk_version,
            target_sdk_version: parts.target_sdk_version,
            version_code: parts.version_code,
            version_name: parts.version_name,
            ndk_version: parts.ndk_version,
            signing_config_ref: parts.signing_config_ref,
            desugaring_enabled: parts.desugaring_enabled,
            java_compatibility_level: parts.java_compatibility_level,
            jvm_target: parts.java_compatibility_level,
        }
    }

    /// Name of the build variant this descriptor was resolved for.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn compile_sdk_version(&self) -> u32 {
        self.compile_sdk_version
    }

    pub fn min_sdk_version(&self) -> u32 {
        self.min_sdk_version
    }

    pub fn target_sdk_version(&self) -> u32 {
        self.target_sdk_version
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    /// NDK version exactly as supplied by the platform context.
    pub fn ndk_version(&self) -> &str {
        &self.ndk_version
    }

    pub fn signing_config_ref(&self) -> &crate::signing::Ref {
        &self.signing_config_ref
    }

    pub fn desugaring_enabled(&self) -> bool {
        self.desugaring_enabled
    }

    /// Java level used for both source and target compatibility.
    pub fn java_compatibility_level(&self) -> JavaVersion {
        self.java_compatibility_level
    }

    /// Kotlin JVM target. Always equal to the Java compatibility level.
    pub fn jvm_target(&self) -> JavaVersion {
        self.jvm_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify parsing of Java versions
    //
    // Both the Gradle constant names and the plain spellings are accepted,
    // and `as_str()` output parses back.
    #[test]
    fn java_version_parse() {
        assert_eq!("VERSION_1_8".parse(), Ok(JavaVersion::V1_8));
        assert_eq!("1.8".parse(), Ok(JavaVersion::V1_8));
        assert_eq!("8".parse(), Ok(JavaVersion::V1_8));
        assert_eq!("VERSION_17".parse(), Ok(JavaVersion::V17));
        assert_eq!("1.7".parse::<JavaVersion>(), Err(()));

        for v in [JavaVersion::V1_8, JavaVersion::V11, JavaVersion::V17, JavaVersion::V21] {
            assert_eq!(v.as_str().parse(), Ok(v));
            assert_eq!(v.gradle_constant().parse(), Ok(v));
        }
    }

    // Verify the JSON shape
    //
    // External tools consume the descriptor as JSON, so field names and the
    // Java level spelling are part of the interface.
    #[test]
    fn descriptor_serialize() {
        let d = BuildDescriptor::from_parts(Parts {
            variant: "release".into(),
            application_id: "com.example.app".into(),
            namespace: "com.example.app".into(),
            compile_sdk_version: 34,
            min_sdk_version: 21,
            target_sdk_version: 34,
            version_code: 3,
            version_name: "1.2.0".into(),
            ndk_version: "23.1.7779620".into(),
            signing_config_ref: crate::signing::Ref::debug(),
            desugaring_enabled: true,
            java_compatibility_level: JavaVersion::V1_8,
        });

        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["applicationId"], "com.example.app");
        assert_eq!(v["compileSdkVersion"], 34);
        assert_eq!(v["signingConfigRef"], "debug");
        assert_eq!(v["javaCompatibilityLevel"], "1.8");
        assert_eq!(v["jvmTarget"], "1.8");
        assert_eq!(d.jvm_target(), d.java_compatibility_level());
    }
}
