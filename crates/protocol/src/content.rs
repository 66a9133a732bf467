use serde::{Deserialize, Serialize};

use crate::types::Color;

/// One showcased project, rendered as a card and in the preview modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    /// Technology tags, in display order.
    pub tech: Vec<String>,
    /// External link opened by "Visit" and "Open Project".
    pub link: String,
    /// Image reference (asset path or URL) used by the card and preview.
    pub image: String,
    /// Accent color for the card shadow, tags and hover fill.
    pub color: Color,
}

/// Icon shown next to a skill group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillIcon {
    Palette,
    Code,
    Database,
    Rocket,
    Zap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroupRecord {
    pub category: String,
    pub items: Vec<String>,
    pub icon: SkillIcon,
}

/// Who the portfolio belongs to; feeds the hero card and contact links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub location: Option<String>,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    /// Downloadable CV, if any.
    #[serde(default)]
    pub cv: Option<String>,
}
