//! API version selection.
//!
//! A management client may be bound to several REST API versions at once. The
//! version used for an operation group comes from, in order of precedence:
//!
//! 1. an explicitly requested version,
//! 2. the group's entry in a [`Profile`],
//! 3. the default of the [`ApiVersionSet`].
//!
//! ```rust
//! use azure_data_protection_core::version::{ApiVersionSet, Profile, VersionResolver};
//!
//! let versions = ApiVersionSet::new(["2021-01-01", "2021-07-01"], "2021-07-01").unwrap();
//! let resolver = VersionResolver::new(versions);
//! let profile = Profile::new("pinned").pin("jobs", "2021-01-01");
//!
//! assert_eq!(resolver.resolve(None, Some(&profile), "jobs"), "2021-01-01");
//! assert_eq!(resolver.resolve(None, Some(&profile), "backup_vaults"), "2021-07-01");
//! assert_eq!(resolver.resolve(Some("2099-01-01"), Some(&profile), "jobs"), "2099-01-01");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{DataProtectionError, DataProtectionResult};

/// The literal accepted in serialized profiles for [`ProfileVersion::Default`].
const DEFAULT_SENTINEL: &str = "default";

/// Ordered set of supported API versions with one designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionSet {
    versions: Vec<String>,
    default: usize,
}

impl ApiVersionSet {
    /// Build a version set.
    ///
    /// # Errors
    ///
    /// Returns [`DataProtectionError::Configuration`] if the set is empty,
    /// contains duplicates, or does not contain `default`.
    pub fn new<I, S>(versions: I, default: &str) -> DataProtectionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for version in versions {
            let version = version.into();
            if ordered.contains(&version) {
                return Err(DataProtectionError::Configuration(format!(
                    "duplicate API version '{version}'"
                )));
            }
            ordered.push(version);
        }

        if ordered.is_empty() {
            return Err(DataProtectionError::Configuration(
                "no API versions are supported".into(),
            ));
        }

        let default = ordered.iter().position(|v| v == default).ok_or_else(|| {
            DataProtectionError::Configuration(format!(
                "default API version '{default}' is not in the supported set"
            ))
        })?;

        Ok(Self {
            versions: ordered,
            default,
        })
    }

    /// The designated default version.
    pub fn default_version(&self) -> &str {
        &self.versions[self.default]
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// Supported versions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// The version a profile selects for one operation group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileVersion {
    /// Use the client's default API version.
    Default,
    /// Use exactly this API version.
    Pinned(String),
}

impl Serialize for ProfileVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Default => serializer.serialize_str(DEFAULT_SENTINEL),
            Self::Pinned(version) => serializer.serialize_str(version),
        }
    }
}

impl<'de> Deserialize<'de> for ProfileVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProfileVersionVisitor;

        impl Visitor<'_> for ProfileVersionVisitor {
            type Value = ProfileVersion;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an API version string or \"default\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ProfileVersion, E> {
                if value.is_empty() {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                } else if value == DEFAULT_SENTINEL {
                    Ok(ProfileVersion::Default)
                } else {
                    Ok(ProfileVersion::Pinned(value.to_string()))
                }
            }
        }

        deserializer.deserialize_str(ProfileVersionVisitor)
    }
}

/// A named mapping from operation-group name to the API version it uses.
///
/// Groups without an entry use the client default. The group names are
/// checked against the operation-group registry when a client is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub versions: BTreeMap<String, ProfileVersion>,
}

impl Profile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: BTreeMap::new(),
        }
    }

    /// The profile that leaves every group on the default version.
    pub fn latest() -> Self {
        Self::new("latest")
    }

    /// Pin `group` to a specific API version.
    pub fn pin(mut self, group: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions
            .insert(group.into(), ProfileVersion::Pinned(version.into()));
        self
    }

    /// Explicitly keep `group` on the default version.
    pub fn use_default(mut self, group: impl Into<String>) -> Self {
        self.versions.insert(group.into(), ProfileVersion::Default);
        self
    }

    pub fn get(&self, group: &str) -> Option<&ProfileVersion> {
        self.versions.get(group)
    }

    /// Names of the groups this profile has an entry for.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Parse a profile from JSON, e.g.
    /// `{"name": "custom", "versions": {"jobs": "default", "backup_vaults": "2021-01-01"}}`.
    pub fn from_json(json: &str) -> DataProtectionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Picks the API version for an operation group.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    versions: ApiVersionSet,
}

impl VersionResolver {
    pub fn new(versions: ApiVersionSet) -> Self {
        Self { versions }
    }

    pub fn versions(&self) -> &ApiVersionSet {
        &self.versions
    }

    /// The globally chosen default version.
    pub fn default_version(&self) -> &str {
        self.versions.default_version()
    }

    /// Resolve the version `group` should use.
    ///
    /// An explicit `requested` version is returned verbatim, even when it is
    /// not in the supported set.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        profile: Option<&Profile>,
        group: &str,
    ) -> String {
        if let Some(version) = requested {
            if !self.versions.contains(version) {
                tracing::debug!(
                    api_version = %version,
                    group,
                    "requested API version is not in the supported set"
                );
            }
            return version.to_string();
        }

        match profile.and_then(|p| p.get(group)) {
            Some(ProfileVersion::Pinned(version)) => version.clone(),
            Some(ProfileVersion::Default) | None => self.default_version().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> VersionResolver {
        VersionResolver::new(
            ApiVersionSet::new(["2021-01-01", "2021-06-01-preview", "2021-07-01"], "2021-07-01")
                .expect("valid set"),
        )
    }

    #[test]
    fn version_set_keeps_order_and_default() {
        let set = ApiVersionSet::new(["b", "a", "c"], "a").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(set.default_version(), "a");
        assert_eq!(set.len(), 3);
        assert!(set.contains("c"));
        assert!(!set.contains("d"));
    }

    #[test]
    fn version_set_rejects_missing_default() {
        let err = ApiVersionSet::new(["2021-01-01"], "2021-07-01").unwrap_err();
        assert!(matches!(err, DataProtectionError::Configuration(_)));
    }

    #[test]
    fn version_set_rejects_empty() {
        let err = ApiVersionSet::new(Vec::<String>::new(), "2021-07-01").unwrap_err();
        assert!(matches!(err, DataProtectionError::Configuration(_)));
    }

    #[test]
    fn version_set_rejects_duplicates() {
        let err = ApiVersionSet::new(["2021-01-01", "2021-01-01"], "2021-01-01").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn explicit_version_wins_over_profile() {
        let profile = Profile::new("p").pin("jobs", "2021-01-01");
        let version = resolver().resolve(Some("2021-06-01-preview"), Some(&profile), "jobs");
        assert_eq!(version, "2021-06-01-preview");
    }

    #[test]
    fn explicit_version_is_not_validated() {
        assert_eq!(resolver().resolve(Some("1999-12-31"), None, "jobs"), "1999-12-31");
    }

    #[test]
    fn profile_wins_over_default() {
        let profile = Profile::new("p").pin("jobs", "2021-01-01");
        assert_eq!(resolver().resolve(None, Some(&profile), "jobs"), "2021-01-01");
    }

    #[test]
    fn profile_default_sentinel_uses_global_default() {
        let profile = Profile::new("p").use_default("jobs");
        assert_eq!(resolver().resolve(None, Some(&profile), "jobs"), "2021-07-01");
    }

    #[test]
    fn group_missing_from_profile_uses_global_default() {
        let profile = Profile::new("p").pin("jobs", "2021-01-01");
        assert_eq!(
            resolver().resolve(None, Some(&profile), "backup_vaults"),
            "2021-07-01"
        );
    }

    #[test]
    fn no_inputs_uses_global_default() {
        assert_eq!(resolver().resolve(None, None, "jobs"), "2021-07-01");
        assert_eq!(
            resolver().resolve(None, Some(&Profile::latest()), "jobs"),
            "2021-07-01"
        );
    }

    #[test]
    fn profile_parses_default_sentinel_from_json() {
        let profile = Profile::from_json(
            r#"{"name": "custom", "versions": {"jobs": "default", "backup_vaults": "2021-01-01"}}"#,
        )
        .expect("valid profile");

        assert_eq!(profile.name, "custom");
        assert_eq!(profile.get("jobs"), Some(&ProfileVersion::Default));
        assert_eq!(
            profile.get("backup_vaults"),
            Some(&ProfileVersion::Pinned("2021-01-01".into()))
        );
    }

    #[test]
    fn profile_rejects_empty_version() {
        let result = Profile::from_json(r#"{"name": "bad", "versions": {"jobs": ""}}"#);
        assert!(matches!(result, Err(DataProtectionError::Serialization(_))));
    }

    #[test]
    fn profile_serializes_sentinel_as_default() {
        let profile = Profile::new("p").use_default("jobs");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["versions"]["jobs"], "default");
    }
}
