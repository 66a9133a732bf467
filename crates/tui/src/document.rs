//! The portfolio laid out as a column of terminal rows.
//!
//! Positions are kept in document units (`ROW_HEIGHT` per row) so the core's
//! pixel-based tunables (header clearance, reveal margin) keep their meaning.

use std::collections::BTreeMap;

use folio_core::navigation::SectionLocator;
use folio_core::presentation::{self, EntranceSide};
use folio_core::{Catalog, measure};
use folio_protocol::{Color, IntersectionEntry, ObserverOptions, Rect, RegionId, Section};

pub const ROW_HEIGHT: f64 = 20.0;

const HERO_ROWS: usize = 14;
const TRAILING_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Name,
    Headline,
    Heading,
    CardTitle,
    Body,
    Tags,
    Link,
    Hint,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub text: String,
    pub region: Option<RegionId>,
    pub project: Option<usize>,
    pub entrance: Option<EntranceSide>,
    pub accent: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    anchors: BTreeMap<Section, f64>,
    regions: Vec<(RegionId, Rect)>,
    width: u16,
}

impl Document {
    /// Lay out `catalog` for a terminal `width` columns wide.
    pub fn layout(catalog: &Catalog, width: u16) -> Self {
        let mut b = Builder::new(width);
        let owner = &catalog.owner;

        b.blank(2);
        b.push(RowKind::Name, owner.name.to_uppercase());
        b.wrapped(RowKind::Headline, &owner.headline);
        if let Some(location) = &owner.location {
            b.push(RowKind::Body, location.clone());
        }
        b.blank(1);
        b.push(
            RowKind::Hint,
            "1-4 jump  j/k scroll  Tab pick a project  Enter preview  q quit".into(),
        );
        b.pad_to(HERO_ROWS);

        b.anchor(Section::Work);
        b.region(RegionId::new(RegionId::PROJECTS_TITLE), |b| {
            b.push(RowKind::Heading, "SELECTED WORK".into());
            b.push(RowKind::Body, "Things I have designed and built.".into());
        });
        b.blank(1);
        for (i, project) in catalog.projects.iter().enumerate() {
            b.project = Some(i);
            b.accent = Some(project.color);
            b.region(RegionId::project(i), |b| {
                b.push(RowKind::CardTitle, format!("{:02}  {}", i + 1, project.title));
                b.wrapped(RowKind::Body, &project.description);
                b.wrapped(RowKind::Tags, &project.tech.join(" · "));
                b.push(RowKind::Link, format!("↗ {}", project.link));
            });
            b.project = None;
            b.accent = None;
            b.blank(1);
        }

        b.anchor(Section::Skills);
        b.region(RegionId::new(RegionId::SKILLS_TITLE), |b| {
            b.push(RowKind::Heading, "SKILLS & TOOLS".into());
        });
        b.blank(1);
        for (i, group) in catalog.skills.iter().enumerate() {
            b.entrance = Some(presentation::skill_entrance(i));
            b.region(RegionId::skill(i), |b| {
                b.push(RowKind::CardTitle, group.category.clone());
                b.wrapped(RowKind::Tags, &group.items.join(" · "));
            });
            b.entrance = None;
            b.blank(1);
        }

        b.anchor(Section::Contact);
        b.region(RegionId::new(RegionId::CONTACT_TITLE), |b| {
            b.push(RowKind::Heading, "LET'S WORK TOGETHER".into());
        });
        b.region(RegionId::new(RegionId::CONTACT_SUBTITLE), |b| {
            b.wrapped(
                RowKind::Body,
                "Have a project in mind or just want to say hello? My inbox is open.",
            );
        });
        b.blank(1);
        b.region(RegionId::new(RegionId::CONTACT_BUTTONS), |b| {
            b.push(RowKind::Link, format!("✉ {}", owner.email));
            b.push(RowKind::Link, format!("↗ {}", owner.github));
            b.push(RowKind::Link, format!("↗ {}", owner.linkedin));
            if let Some(cv) = &owner.cv {
                b.push(RowKind::Link, format!("⤓ {cv}"));
            }
        });
        b.blank(TRAILING_ROWS);

        b.finish()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total height in document units.
    pub fn height(&self) -> f64 {
        self.rows.len() as f64 * ROW_HEIGHT
    }

    /// Largest scroll offset for a viewport `viewport_rows` tall.
    pub fn max_offset(&self, viewport_rows: u16) -> f64 {
        (self.height() - f64::from(viewport_rows) * ROW_HEIGHT).max(0.0)
    }

    pub fn region_bounds(&self, id: &str) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(region, _)| region.as_str() == id)
            .map(|(_, bounds)| *bounds)
    }

    /// Intersection entries for `observed` regions, as a native observer
    /// would report them for a viewport starting at `offset`.
    pub fn intersections(
        &self,
        observed: &[RegionId],
        offset: f64,
        viewport_rows: u16,
        options: &ObserverOptions,
    ) -> Vec<IntersectionEntry> {
        let viewport = Rect::new(
            0.0,
            offset,
            f64::from(self.width),
            f64::from(viewport_rows) * ROW_HEIGHT,
        );
        observed
            .iter()
            .filter_map(|id| {
                let bounds = self.region_bounds(id.as_str())?;
                Some(measure(id.clone(), bounds, viewport, options))
            })
            .collect()
    }
}

impl SectionLocator for Document {
    fn section_top(&self, section: Section) -> Option<f64> {
        self.anchors.get(&section).copied()
    }
}

struct Builder {
    rows: Vec<Row>,
    anchors: BTreeMap<Section, f64>,
    regions: Vec<(RegionId, Rect)>,
    width: u16,
    region: Option<RegionId>,
    project: Option<usize>,
    entrance: Option<EntranceSide>,
    accent: Option<Color>,
}

impl Builder {
    fn new(width: u16) -> Self {
        Self {
            rows: Vec::new(),
            anchors: BTreeMap::new(),
            regions: Vec::new(),
            width,
            region: None,
            project: None,
            entrance: None,
            accent: None,
        }
    }

    fn push(&mut self, kind: RowKind, text: String) {
        self.rows.push(Row {
            kind,
            text,
            region: self.region.clone(),
            project: self.project,
            entrance: self.entrance,
            accent: self.accent,
        });
    }

    fn wrapped(&mut self, kind: RowKind, text: &str) {
        let columns = usize::from(self.width.saturating_sub(4)).max(16);
        for line in wrap(text, columns) {
            self.push(kind, line);
        }
    }

    fn blank(&mut self, count: usize) {
        let region = self.region.take();
        for _ in 0..count {
            self.push(RowKind::Blank, String::new());
        }
        self.region = region;
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.rows.len());
        self.blank(missing);
    }

    fn anchor(&mut self, section: Section) {
        self.anchors
            .insert(section, self.rows.len() as f64 * ROW_HEIGHT);
    }

    fn region(&mut self, id: RegionId, build: impl FnOnce(&mut Self)) {
        let start = self.rows.len();
        self.region = Some(id.clone());
        build(self);
        self.region = None;
        let rows = self.rows.len() - start;
        let bounds = Rect::new(
            0.0,
            start as f64 * ROW_HEIGHT,
            f64::from(self.width),
            rows as f64 * ROW_HEIGHT,
        );
        self.regions.push((id, bounds));
    }

    fn finish(self) -> Document {
        Document {
            rows: self.rows,
            anchors: self.anchors,
            regions: self.regions,
            width: self.width,
        }
    }
}

/// Greedy word wrap. Words longer than `columns` get a line of their own.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > columns && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document::layout(&Catalog::builtin(), 80)
    }

    #[test]
    fn every_catalog_region_is_laid_out() {
        let catalog = Catalog::builtin();
        let doc = document();
        for id in catalog.regions() {
            let bounds = doc
                .region_bounds(id.as_str())
                .unwrap_or_else(|| panic!("{id} missing"));
            assert!(bounds.h >= ROW_HEIGHT);
        }
    }

    #[test]
    fn sections_follow_each_other() {
        let doc = document();
        assert_eq!(doc.section_top(Section::Home), None);
        let work = doc.section_top(Section::Work).unwrap();
        let skills = doc.section_top(Section::Skills).unwrap();
        let contact = doc.section_top(Section::Contact).unwrap();
        assert_eq!(work, HERO_ROWS as f64 * ROW_HEIGHT);
        assert!(work < skills && skills < contact);
        assert!(contact < doc.height());
    }

    #[test]
    fn skill_cards_alternate_entrance() {
        let doc = document();
        let sides: Vec<_> = doc
            .rows()
            .iter()
            .filter(|row| row.kind == RowKind::CardTitle && row.entrance.is_some())
            .map(|row| row.entrance)
            .collect();
        assert_eq!(
            sides[..2],
            [Some(EntranceSide::Left), Some(EntranceSide::Right)]
        );
    }

    #[test]
    fn only_regions_well_inside_the_viewport_intersect() {
        let doc = document();
        let observed = Catalog::builtin().regions();
        let options = ObserverOptions::default();

        let entries = doc.intersections(&observed, 0.0, 24, &options);
        let visible: Vec<_> = entries
            .iter()
            .filter(|e| e.is_intersecting)
            .filter_map(|e| e.id.as_ref())
            .map(RegionId::as_str)
            .collect();
        assert!(visible.contains(&"projects-title"));
        assert!(!visible.contains(&"contact-title"));

        let bottom = doc.max_offset(24);
        let entries = doc.intersections(&observed, bottom, 24, &options);
        assert!(
            entries
                .iter()
                .any(|e| e.is_intersecting && e.id.as_ref().is_some_and(|id| id == "contact-title"))
        );
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, ["one two", "three", "four five"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("unbreakable", 4), ["unbreakable"]);
    }
}
