//! Descriptor Rendering
//!
//! The external toolchain consumes descriptors in one of three shapes: as
//! JSON, as Gradle project properties passed via `--project-prop`, or as a
//! Gradle Kotlin-DSL build script with all values bound literally.

use crate::dependency;
use crate::descriptor::BuildDescriptor;
use crate::resolver::DEFAULT_VARIANT;

/// Check whether a string can be bound literally
///
/// Values end up verbatim inside Kotlin string literals and property
/// arguments, so quotes, backslashes, `$` (Kotlin templates) and control
/// characters are refused rather than escaped.
pub fn is_quotable(s: &str) -> bool {
    s.chars().all(
        |v| !v.is_control()
            && v != '\\'
            && v != '\''
            && v != '"'
            && v != '$'
    )
}

/// Output Format
///
/// Implements `FromStr` (case-insensitive) and `as_str()` like the other
/// identifier enums of this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Properties,
    Kts,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Properties => "properties",
            Format::Kts => "kts",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if s.eq_ignore_ascii_case("properties") {
            Ok(Self::Properties)
        } else if s.eq_ignore_ascii_case("kts") {
            Ok(Self::Kts)
        } else {
            Err(())
        }
    }
}

/// Render a descriptor in the given format.
pub fn render(
    format: Format,
    descriptor: &BuildDescriptor,
    dependencies: &dependency::Set,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => json(descriptor),
        Format::Properties => {
            let mut out = String::new();
            for (key, value) in gradle_properties(descriptor) {
                out.push_str(key);
                out.push('=');
                out.push_str(&value);
                out.push('\n');
            }
            Ok(out)
        },
        Format::Kts => Ok(gradle_kts(descriptor, dependencies)),
    }
}

/// Render as pretty-printed JSON.
pub fn json(descriptor: &BuildDescriptor) -> Result<String, serde_json::Error> {
    let mut s = serde_json::to_string_pretty(descriptor)?;
    s.push('\n');
    Ok(s)
}

/// Render as Gradle project properties
///
/// Return the `build.android.*` key/value pairs in a fixed order. Each pair
/// is meant to be passed as `--project-prop KEY=VALUE`.
pub fn gradle_properties(descriptor: &BuildDescriptor) -> Vec<(&'static str, String)> {
    vec![
        ("build.android.variant", descriptor.variant().to_string()),
        ("build.android.applicationId", descriptor.application_id().to_string()),
        ("build.android.namespace", descriptor.namespace().to_string()),
        ("build.android.compileSdk", descriptor.compile_sdk_version().to_string()),
        ("build.android.minSdk", descriptor.min_sdk_version().to_string()),
        ("build.android.targetSdk", descriptor.target_sdk_version().to_string()),
        ("build.android.ndkVersion", descriptor.ndk_version().to_string()),
        ("build.android.versionCode", descriptor.version_code().to_string()),
        ("build.android.versionName", descriptor.version_name().to_string()),
        ("build.android.signingConfig", descriptor.signing_config_ref().to_string()),
        ("build.android.desugaring", descriptor.desugaring_enabled().to_string()),
        ("build.android.javaVersion", descriptor.java_compatibility_level().as_str().to_string()),
        ("build.android.jvmTarget", descriptor.jvm_target().as_str().to_string()),
    ]
}

/// Render as Gradle Kotlin-DSL build script
///
/// Produce an `app/build.gradle.kts` binding every descriptor value
/// literally. The signing configuration is attached to the resolved build
/// type, or to `defaultConfig` for the default variant. All dependency
/// declarations are emitted in their original order.
pub fn gradle_kts(descriptor: &BuildDescriptor, dependencies: &dependency::Set) -> String {
    let signing = format!(
        "signingConfig = signingConfigs.getByName(\"{}\")",
        descriptor.signing_config_ref(),
    );
    let (default_signing, build_types) = if descriptor.variant() == DEFAULT_VARIANT {
        (format!("        {}\n", signing), String::new())
    } else {
        (
            String::new(),
            format!(
                concat!(
                    "\n",
                    "    buildTypes {{\n",
                    "        getByName(\"{0}\") {{\n",
                    "            {1}\n",
                    "        }}\n",
                    "    }}\n",
                ),
                descriptor.variant(),
                signing,
            ),
        )
    };

    let mut deps = String::new();
    for dep in dependencies.iter() {
        deps.push_str(&format!(
            "    {}(\"{}\")\n",
            dep.configuration.as_str(),
            dep.coordinate,
        ));
    }

    format!(
        concat!(
            "// Generated by build-descriptor\n",
            "plugins {{\n",
            "    id(\"com.android.application\")\n",
            "    id(\"kotlin-android\")\n",
            "    id(\"dev.flutter.flutter-gradle-plugin\")\n",
            "}}\n",
            "\n",
            "android {{\n",
            "    namespace = \"{namespace}\"\n",
            "    compileSdk = {compile_sdk}\n",
            "    ndkVersion = \"{ndk}\"\n",
            "\n",
            "    compileOptions {{\n",
            "        isCoreLibraryDesugaringEnabled = {desugaring}\n",
            "        sourceCompatibility = JavaVersion.{java}\n",
            "        targetCompatibility = JavaVersion.{java}\n",
            "    }}\n",
            "\n",
            "    kotlinOptions {{\n",
            "        jvmTarget = \"{jvm_target}\"\n",
            "    }}\n",
            "\n",
            "    defaultConfig {{\n",
            "        applicationId = \"{application_id}\"\n",
            "        minSdk = {min_sdk}\n",
            "        targetSdk = {target_sdk}\n",
            "        versionCode = {version_code}\n",
            "        versionName = \"{version_name}\"\n",
            "{default_signing}",
            "    }}\n",
            "{build_types}",
            "}}\n",
            "\n",
            "flutter {{\n",
            "    source = \"../..\"\n",
            "}}\n",
            "\n",
            "dependencies {{\n",
            "{deps}",
            "}}\n",
        ),
        namespace = descriptor.namespace(),
        compile_sdk = descriptor.compile_sdk_version(),
        ndk = descriptor.ndk_version(),
        desugaring = descriptor.desugaring_enabled(),
        java = descriptor.java_compatibility_level().gradle_constant(),
        jvm_target = descriptor.jvm_target().as_str(),
        application_id = descriptor.application_id(),
        min_sdk = descriptor.min_sdk_version(),
        target_sdk = descriptor.target_sdk_version(),
        version_code = descriptor.version_code(),
        version_name = descriptor.version_name(),
        default_signing = default_signing,
        build_types = build_types,
        deps = deps,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlatformContext;
    use crate::resolver::{self, BuildType, Declarations};
    use crate::signing;

    fn declarations() -> Declarations {
        let mut d = Declarations::new("com.example.dopamine", "com.example.dopamine");

        d.desugaring_enabled = true;
        d.build_types.insert(
            "release".into(),
            BuildType { signing_config: Some(signing::Ref::debug()) },
        );
        d.dependencies.push(
            dependency::Configuration::CoreLibraryDesugaring,
            "com.android.tools:desugar_jdk_libs:2.0.4".parse().unwrap(),
        );
        d
    }

    #[test]
    fn format_parse() {
        assert_eq!("JSON".parse(), Ok(Format::Json));
        assert_eq!("properties".parse(), Ok(Format::Properties));
        assert_eq!(Format::Kts.as_str().parse(), Ok(Format::Kts));
        assert_eq!("yaml".parse::<Format>(), Err(()));
    }

    #[test]
    fn render_properties() {
        let d = declarations();
        let descriptor = resolver::resolve(&PlatformContext::flutter_defaults(), &d).unwrap();
        let s = render(Format::Properties, &descriptor, &d.dependencies).unwrap();

        assert!(s.starts_with("build.android.variant=default\n"));
        assert!(s.contains("build.android.applicationId=com.example.dopamine\n"));
        assert!(s.contains("build.android.minSdk=21\n"));
        assert!(s.contains("build.android.desugaring=true\n"));
        assert_eq!(s.lines().count(), gradle_properties(&descriptor).len());
    }

    // Verify the Kotlin-DSL script of a release variant
    //
    // The signing configuration must be bound in `buildTypes`, and the
    // desugaring backport must be declared.
    #[test]
    fn render_kts_release() {
        let d = declarations();
        let descriptor = resolver::resolve_for_variant(
            "release",
            &PlatformContext::flutter_defaults(),
            &d,
        ).unwrap();
        let s = gradle_kts(&descriptor, &d.dependencies);

        assert!(s.contains("    namespace = \"com.example.dopamine\"\n"));
        assert!(s.contains("    compileSdk = 34\n"));
        assert!(s.contains("        isCoreLibraryDesugaringEnabled = true\n"));
        assert!(s.contains("        sourceCompatibility = JavaVersion.VERSION_1_8\n"));
        assert!(s.contains("        jvmTarget = \"1.8\"\n"));
        assert!(s.contains(concat!(
            "        getByName(\"release\") {\n",
            "            signingConfig = signingConfigs.getByName(\"debug\")\n",
        )));
        assert!(s.contains("    coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")\n"));
    }

    #[test]
    fn render_kts_default() {
        let d = declarations();
        let descriptor = resolver::resolve(&PlatformContext::flutter_defaults(), &d).unwrap();
        let s = gradle_kts(&descriptor, &d.dependencies);

        assert!(!s.contains("buildTypes"));
        assert!(s.contains(concat!(
            "        versionName = \"1.0\"\n",
            "        signingConfig = signingConfigs.getByName(\"debug\")\n",
            "    }\n",
        )));
    }

    #[test]
    fn render_json() {
        let d = declarations();
        let descriptor = resolver::resolve(&PlatformContext::flutter_defaults(), &d).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json(&descriptor).unwrap()).unwrap();

        assert_eq!(v["variant"], "default");
        assert_eq!(v["desugaringEnabled"], true);
    }
}
