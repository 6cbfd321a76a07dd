//! Compile-time capability checks
//!
//! Every capability the helpers rely on is a cargo feature of this crate.
//! Availability is fixed when the crate is built; the guard only turns a
//! disabled capability into a [`SelectError::MissingDependency`] that says
//! which feature to enable.

use std::fmt;

use crate::error::{Result, SelectError};

/// Statistical or rendering capability used by the helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Model fitting; always compiled in
    ModelFitting,
    /// ANOVA decomposition (`anova` feature)
    Anova,
    /// Per-observation tables (`augment` feature)
    Augment,
    /// Markdown table rendering (`tables` feature)
    Tables,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::ModelFitting,
        Capability::Anova,
        Capability::Augment,
        Capability::Tables,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::ModelFitting => "model-fitting",
            Capability::Anova => "anova",
            Capability::Augment => "augment",
            Capability::Tables => "tables",
        }
    }

    /// Cargo feature providing the capability
    pub fn feature(self) -> Option<&'static str> {
        match self {
            Capability::ModelFitting => None,
            Capability::Anova => Some("anova"),
            Capability::Augment => Some("augment"),
            Capability::Tables => Some("tables"),
        }
    }

    pub fn is_available(self) -> bool {
        match self {
            Capability::ModelFitting => true,
            Capability::Anova => cfg!(feature = "anova"),
            Capability::Augment => cfg!(feature = "augment"),
            Capability::Tables => cfg!(feature = "tables"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fail with [`SelectError::MissingDependency`] unless `capability` was
/// compiled in
pub fn ensure_available(capability: Capability) -> Result<()> {
    if capability.is_available() {
        tracing::debug!(capability = capability.name(), "capability available");
        return Ok(());
    }

    let feature = capability.feature().unwrap_or(capability.name());
    Err(SelectError::MissingDependency {
        capability: capability.name(),
        remediation: format!(
            "enable it with `ms-select = {{ version = \"{}\", features = [\"{feature}\"] }}` \
             in Cargo.toml",
            env!("CARGO_PKG_VERSION")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_fitting_is_always_available() {
        assert!(Capability::ModelFitting.is_available());
        assert!(ensure_available(Capability::ModelFitting).is_ok());
    }

    #[test]
    fn test_guard_matches_features() {
        for capability in Capability::ALL {
            let result = ensure_available(capability);
            assert_eq!(result.is_ok(), capability.is_available());
            // Repeated checks give the same answer
            assert_eq!(ensure_available(capability).is_ok(), result.is_ok());
        }
    }

    #[cfg(not(feature = "anova"))]
    #[test]
    fn test_missing_dependency_names_feature() {
        let err = ensure_available(Capability::Anova).unwrap_err();
        assert!(matches!(
            err,
            SelectError::MissingDependency {
                capability: "anova",
                ..
            }
        ));
        assert!(err.to_string().contains("features = [\"anova\"]"));
    }

    #[cfg(all(feature = "anova", feature = "augment", feature = "tables"))]
    #[test]
    fn test_default_build_has_every_capability() {
        assert!(Capability::ALL.iter().all(|c| c.is_available()));
    }
}
