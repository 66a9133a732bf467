use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a region tracked for viewport visibility.
///
/// Wraps `Arc<str>` so ids can be cloned into observation lists, batches
/// and the revealed set without reallocating.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(Arc<str>);

impl RegionId {
    pub const PROJECTS_TITLE: &'static str = "projects-title";
    pub const SKILLS_TITLE: &'static str = "skills-title";
    pub const CONTACT_TITLE: &'static str = "contact-title";
    pub const CONTACT_SUBTITLE: &'static str = "contact-subtitle";
    pub const CONTACT_BUTTONS: &'static str = "contact-buttons";

    pub fn new(id: impl AsRef<str>) -> Self {
        RegionId(Arc::from(id.as_ref()))
    }

    /// The card for the project at `index`.
    pub fn project(index: usize) -> Self {
        RegionId::new(format!("project-{index}"))
    }

    /// The card for the skill group at `index`.
    pub fn skill(index: usize) -> Self {
        RegionId::new(format!("skill-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::borrow::Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        RegionId::new(s)
    }
}

impl From<String> for RegionId {
    fn from(s: String) -> Self {
        RegionId(Arc::from(s))
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RegionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RegionId::from)
    }
}
