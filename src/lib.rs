//! Android Build Descriptor Resolver
//!
//! This crate resolves the Android build configuration of a cross-platform
//! mobile application shell into a single, immutable build descriptor. The
//! descriptor binds SDK levels, the NDK version, the application identifier
//! and version, Java compatibility, core-library desugaring and the signing
//! configuration of a build variant. It is handed to an external toolchain
//! (Gradle with the Android Gradle Plugin) for compilation, packaging and
//! signing. None of those steps are performed here.
//!
//! Model
//! -----
//!
//! Two inputs feed a resolution:
//!
//!  * The **declarations** authored by the project: application ID,
//!    namespace, compile options, the signing-configuration registry, build
//!    types and dependency declarations. They are read from a TOML manifest
//!    usually called `build-descriptor.toml`, see [`manifest`].
//!
//!  * The **platform context** resolved by the cross-platform framework:
//!    SDK levels, NDK version, version code and version name. For Flutter
//!    projects these are the `flutter.*` properties, see [`context`].
//!
//! The [`resolver`] validates both and either returns a complete
//! [`descriptor::BuildDescriptor`] or fails. Resolution is pure; the same
//! inputs always produce equal descriptors.
//!
//! Signing configurations are referenced by name only, and looked up in an
//! explicit registry. Key material never passes through this crate.
//!
//! The `build-descriptor` command-line tool reads manifest and context, and
//! prints or persists the descriptor, see [`op`] and [`render`].

pub mod context;
pub mod dependency;
pub mod descriptor;
pub mod manifest;
pub mod render;
pub mod resolver;
pub mod signing;

/// Operations
///
/// The `op` module is a collection of all operations that can be performed via
/// the command-line interface. Each operation is implemented in a submodule
/// and can be used independently.
pub mod op {
    pub mod emerge;
    pub mod resolve;
}
