use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::region::RegionId;

/// Input notifications a host forwards to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    PointerMoved { x: f64, y: f64 },
    /// Current vertical scroll distance of the document.
    Scrolled { offset: f64 },
    /// One batch of observation results.
    Intersections { entries: Vec<IntersectionEntry> },
    KeyDown { key: String },
    /// The host clock reached `now_ms`; fires due timers.
    Tick { now_ms: u64 },
}

/// One observed region in an intersection batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    /// `None` when the observed element carried no identifier.
    pub id: Option<RegionId>,
    pub is_intersecting: bool,
    /// Visible fraction of the region, informational.
    #[serde(default)]
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn visible(id: impl Into<RegionId>) -> Self {
        Self {
            id: Some(id.into()),
            is_intersecting: true,
            ratio: 1.0,
        }
    }

    pub fn hidden(id: impl Into<RegionId>) -> Self {
        Self {
            id: Some(id.into()),
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Whether a `KeyboardEvent.key` value is the cancel key.
pub fn is_cancel_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

/// What the user did to dismiss a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissSource {
    /// Click on the dimmed backdrop around the dialog.
    Overlay,
    /// The "X" button in the dialog header.
    CloseControl,
    /// The "Close" button next to "Open Project".
    FooterButton,
    CancelKey,
}

impl DismissSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DismissSource::Overlay => "overlay",
            DismissSource::CloseControl => "close_control",
            DismissSource::FooterButton => "footer_button",
            DismissSource::CancelKey => "cancel_key",
        }
    }
}

impl fmt::Display for DismissSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDismissSource(pub String);

impl fmt::Display for UnknownDismissSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dismiss source: {}", self.0)
    }
}

impl std::error::Error for UnknownDismissSource {}

impl FromStr for DismissSource {
    type Err = UnknownDismissSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overlay" => Ok(DismissSource::Overlay),
            "close_control" => Ok(DismissSource::CloseControl),
            "footer_button" => Ok(DismissSource::FooterButton),
            "cancel_key" => Ok(DismissSource::CancelKey),
            other => Err(UnknownDismissSource(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_batch_from_host_json() {
        let json = r#"{
            "type": "intersections",
            "entries": [
                {"id": "project-0", "is_intersecting": true, "ratio": 0.4},
                {"id": null, "is_intersecting": true},
                {"id": "skill-1", "is_intersecting": false}
            ]
        }"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        let HostEvent::Intersections { entries } = event else {
            panic!("expected intersections, got {event:?}");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id.as_ref().map(RegionId::as_str), Some("project-0"));
        assert!(entries[1].id.is_none());
        assert_eq!(entries[2].ratio, 0.0);
    }

    #[test]
    fn cancel_key_names() {
        assert!(is_cancel_key("Escape"));
        assert!(is_cancel_key("Esc"));
        assert!(!is_cancel_key("Enter"));
    }

    #[test]
    fn dismiss_source_parses_its_own_names() {
        for source in [
            DismissSource::Overlay,
            DismissSource::CloseControl,
            DismissSource::FooterButton,
            DismissSource::CancelKey,
        ] {
            assert_eq!(source.as_str().parse::<DismissSource>(), Ok(source));
        }
        assert_eq!(
            "backdrop".parse::<DismissSource>(),
            Err(UnknownDismissSource("backdrop".into()))
        );
    }
}
