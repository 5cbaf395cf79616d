//! Dependency Declarations
//!
//! The resolver never fetches or verifies dependencies. It only needs to know
//! which coordinates are declared, and in which Gradle configuration, so it
//! can assert the presence of the desugaring backport library.

/// Group of the core-library desugaring backport.
pub const DESUGAR_GROUP: &str = "com.android.tools";
/// Artifact of the core-library desugaring backport.
pub const DESUGAR_ARTIFACT: &str = "desugar_jdk_libs";

/// Coordinate Errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    /// Coordinate does not have exactly three `:`-separated parts.
    #[error("expected `group:artifact:version`, got {0:?}")]
    Format(String),
    /// One of the parts is empty or contains whitespace.
    #[error("empty or malformed component in {0:?}")]
    Component(String),
}

/// Maven Coordinate
///
/// A `group:artifact:version` triple identifying a library.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    /// Whether this names the given library, regardless of version.
    pub fn is(&self, group: &str, artifact: &str) -> bool {
        self.group == group && self.artifact == artifact
    }
}

impl std::str::FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(CoordinateError::Format(s.to_string()));
        }

        // Gradle accepts a lot more, but anything with whitespace is almost
        // certainly a typo in the manifest.
        if parts.iter().any(|v| v.is_empty() || v.chars().any(char::is_whitespace)) {
            return Err(CoordinateError::Component(s.to_string()));
        }

        Ok(Self {
            group: parts[0].to_string(),
            artifact: parts[1].to_string(),
            version: parts[2].to_string(),
        })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Gradle Dependency Configuration
///
/// The configurations the resolver distinguishes. Any other configuration
/// name is retained verbatim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Configuration {
    Implementation,
    CoreLibraryDesugaring,
    TestImplementation,
    AndroidTestImplementation,
    Other(String),
}

impl Configuration {
    /// Get the Gradle name of the configuration.
    pub fn as_str(&self) -> &str {
        match self {
            Configuration::Implementation => "implementation",
            Configuration::CoreLibraryDesugaring => "coreLibraryDesugaring",
            Configuration::TestImplementation => "testImplementation",
            Configuration::AndroidTestImplementation => "androidTestImplementation",
            Configuration::Other(v) => v.as_str(),
        }
    }
}

// Gradle configuration names are case-sensitive, so unlike platform
// identifiers this matches exactly.
impl From<&str> for Configuration {
    fn from(s: &str) -> Self {
        match s {
            "implementation" => Self::Implementation,
            "coreLibraryDesugaring" => Self::CoreLibraryDesugaring,
            "testImplementation" => Self::TestImplementation,
            "androidTestImplementation" => Self::AndroidTestImplementation,
            v => Self::Other(v.to_string()),
        }
    }
}

/// A single dependency declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub configuration: Configuration,
    pub coordinate: Coordinate,
}

/// Dependency Declaration Set
///
/// Declarations in the order they were written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Set {
    declarations: Vec<Declaration>,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration.
    pub fn push(&mut self, configuration: Configuration, coordinate: Coordinate) {
        self.declarations.push(Declaration { configuration, coordinate });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Find the desugaring backport declaration
    ///
    /// Return the first `coreLibraryDesugaring` declaration of the
    /// `desugar_jdk_libs` backport, or `None`. Any version is accepted.
    pub fn desugaring(&self) -> Option<&Declaration> {
        self.declarations.iter().find(
            |v| v.configuration == Configuration::CoreLibraryDesugaring
                && v.coordinate.is(DESUGAR_GROUP, DESUGAR_ARTIFACT)
        )
    }
}
