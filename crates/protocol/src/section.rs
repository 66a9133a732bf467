use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A top-level page section reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    Work,
    Skills,
    Contact,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 4] = [
        Section::Home,
        Section::Work,
        Section::Skills,
        Section::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Work => "work",
            Section::Skills => "skills",
            Section::Contact => "contact",
        }
    }

    /// Label shown in the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "HOME",
            Section::Work => "WORK",
            Section::Skills => "SKILLS",
            Section::Contact => "CONTACT",
        }
    }

    /// Element id of the section's anchor in the page. `Home` is the top of
    /// the document and has no anchor.
    pub fn anchor_id(self) -> Option<&'static str> {
        match self {
            Section::Home => None,
            Section::Work => Some("projects-section"),
            Section::Skills => Some("skills-section"),
            Section::Contact => Some("contact-section"),
        }
    }

    /// Position in the navigation bar, used for stagger delays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section: {}", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    /// Case-insensitive, so nav labels ("Work", "WORK") parse directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("Work".parse::<Section>(), Ok(Section::Work));
        assert_eq!("CONTACT".parse::<Section>(), Ok(Section::Contact));
        assert_eq!(" skills ".parse::<Section>(), Ok(Section::Skills));
        assert!("about".parse::<Section>().is_err());
    }

    #[test]
    fn anchors_match_page_ids() {
        assert_eq!(Section::Home.anchor_id(), None);
        assert_eq!(Section::Work.anchor_id(), Some("projects-section"));
        assert_eq!(Section::Skills.anchor_id(), Some("skills-section"));
        assert_eq!(Section::Contact.anchor_id(), Some("contact-section"));
    }

    #[test]
    fn default_is_home() {
        assert_eq!(Section::default(), Section::Home);
        assert_eq!(Section::Contact.index(), 3);
    }
}
