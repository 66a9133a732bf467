use std::collections::HashSet;

use folio_protocol::{Color, OwnerProfile, ProjectRecord, RegionId, SkillGroupRecord, SkillIcon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{what} #{index} has an empty {field}")]
    EmptyField {
        what: &'static str,
        index: usize,
        field: &'static str,
    },
    #[error("project {title:?} links to {link:?}, expected an http(s) URL")]
    InvalidLink { title: String, link: String },
    #[error("duplicate project title {0:?}")]
    DuplicateProject(String),
}

/// Index of a project in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub usize);

/// Static page content. Immutable once built; the controllers only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub owner: OwnerProfile,
    pub projects: Vec<ProjectRecord>,
    pub skills: Vec<SkillGroupRecord>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    pub fn from_json(data: &[u8]) -> Result<Self, ContentError> {
        let catalog: Catalog = serde_json::from_slice(data)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let mut titles = HashSet::new();
        for (index, project) in self.projects.iter().enumerate() {
            if project.title.trim().is_empty() {
                return Err(ContentError::EmptyField {
                    what: "project",
                    index,
                    field: "title",
                });
            }
            if !(project.link.starts_with("https://") || project.link.starts_with("http://")) {
                return Err(ContentError::InvalidLink {
                    title: project.title.clone(),
                    link: project.link.clone(),
                });
            }
            if !titles.insert(project.title.as_str()) {
                return Err(ContentError::DuplicateProject(project.title.clone()));
            }
        }
        for (index, group) in self.skills.iter().enumerate() {
            if group.category.trim().is_empty() {
                return Err(ContentError::EmptyField {
                    what: "skill group",
                    index,
                    field: "category",
                });
            }
        }
        Ok(())
    }

    pub fn project(&self, id: ProjectId) -> Option<&ProjectRecord> {
        self.projects.get(id.0)
    }

    /// Every region the page animates on reveal, in document order.
    pub fn regions(&self) -> Vec<RegionId> {
        let mut regions = Vec::with_capacity(self.projects.len() + self.skills.len() + 5);
        regions.push(RegionId::from(RegionId::PROJECTS_TITLE));
        regions.extend((0..self.projects.len()).map(RegionId::project));
        regions.push(RegionId::from(RegionId::SKILLS_TITLE));
        regions.extend((0..self.skills.len()).map(RegionId::skill));
        regions.push(RegionId::from(RegionId::CONTACT_TITLE));
        regions.push(RegionId::from(RegionId::CONTACT_SUBTITLE));
        regions.push(RegionId::from(RegionId::CONTACT_BUTTONS));
        regions
    }

    /// The content the page ships with.
    pub fn builtin() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| (*s).to_owned()).collect()
        }

        Catalog {
            owner: OwnerProfile {
                name: "Chun Rattnakvisal".into(),
                headline: "Full-stack developer · PHP & React".into(),
                location: None,
                email: "your.rattnakvisalchun@gmail.com".into(),
                github: "https://github.com/Rattnakvisal".into(),
                linkedin: "https://www.linkedin.com/in/chun-rattnakvisal-3a24a0361/".into(),
                cv: Some("/src/assets/Mr Chun Rattnakvisal.pdf".into()),
            },
            projects: vec![
                ProjectRecord {
                    title: "E-Commerce Shoes Platform".into(),
                    description: "Full-stack e-commerce system with product management, cart, \
                                  checkout, order tracking, and role-based admin panel."
                        .into(),
                    tech: strings(&["PHP", "MySQL", "Tailwind CSS", "JavaScript", "Vite"]),
                    link: "https://github.com/Rattnakvisal/E-commerce-shoes".into(),
                    image: "assets/E-commerce-shoes.png".into(),
                    color: Color::rgb(0x00, 0xff, 0x88),
                },
                ProjectRecord {
                    title: "School Management System".into(),
                    description: "CRUD web app for managing students with validation, \
                                  search/filter, and clean MVC structure using Laravel."
                        .into(),
                    tech: strings(&[
                        "Laravel",
                        "PHP",
                        "MySQL",
                        "Bootstrap",
                        "tailwind CSS",
                        "Javascript",
                        "Blade",
                    ]),
                    link: "https://github.com/Rattnakvisal/School-Management-System".into(),
                    image: "assets/school.png".into(),
                    color: Color::rgb(0x00, 0xaa, 0xff),
                },
                ProjectRecord {
                    title: "Library Management System".into(),
                    description: "Database-driven system for books, authors, borrowing/return, \
                                  fines calculation, and reservation workflow."
                        .into(),
                    tech: strings(&[
                        "ASP.NET",
                        "C#",
                        "Microsoft SQL Server",
                        "Jquery",
                        "SQL Design",
                    ]),
                    link: "https://github.com/Rattnakvisal/Library-Management-System".into(),
                    image: "assets/Library.png".into(),
                    color: Color::rgb(0xff, 0xaa, 0x00),
                },
            ],
            skills: vec![
                SkillGroupRecord {
                    category: "Frontend".into(),
                    items: strings(&[
                        "HTML",
                        "CSS",
                        "JavaScript",
                        "React",
                        "Tailwind CSS",
                        "Bootstrap",
                    ]),
                    icon: SkillIcon::Palette,
                },
                SkillGroupRecord {
                    category: "Backend".into(),
                    items: strings(&[
                        "PHP",
                        "Laravel",
                        "REST API",
                        "Authentication",
                        "MVC Architecture",
                    ]),
                    icon: SkillIcon::Code,
                },
                SkillGroupRecord {
                    category: "Database".into(),
                    items: strings(&[
                        "MySQL",
                        "MariaDB",
                        "Oracle",
                        "PDO",
                        "Database Design",
                        "SQL Optimization",
                    ]),
                    icon: SkillIcon::Database,
                },
                SkillGroupRecord {
                    category: "Tools & DevOps".into(),
                    items: strings(&["Git", "GitHub", "XAMPP", "Composer", "Vite", "Linux"]),
                    icon: SkillIcon::Rocket,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.projects.len(), 3);
        assert_eq!(catalog.skills.len(), 4);
    }

    #[test]
    fn regions_in_document_order() {
        let regions = Catalog::builtin().regions();
        let ids: Vec<&str> = regions.iter().map(RegionId::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "projects-title",
                "project-0",
                "project-1",
                "project-2",
                "skills-title",
                "skill-0",
                "skill-1",
                "skill-2",
                "skill-3",
                "contact-title",
                "contact-subtitle",
                "contact-buttons",
            ]
        );
    }

    #[test]
    fn json_roundtrip_keeps_content() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_vec(&catalog).unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn rejects_bad_links_and_duplicates() {
        let mut catalog = Catalog::builtin();
        catalog.projects[1].link = "ftp://example.com".into();
        assert!(matches!(
            catalog.validate(),
            Err(ContentError::InvalidLink { .. })
        ));

        let mut catalog = Catalog::builtin();
        catalog.projects[2].title = catalog.projects[0].title.clone();
        assert!(matches!(
            catalog.validate(),
            Err(ContentError::DuplicateProject(_))
        ));

        let mut catalog = Catalog::builtin();
        catalog.skills[3].category = "  ".into();
        assert!(matches!(
            catalog.validate(),
            Err(ContentError::EmptyField { index: 3, .. })
        ));
    }

    #[test]
    fn bad_accent_color_is_a_json_error() {
        let mut value = serde_json::to_value(Catalog::builtin()).unwrap();
        value["projects"][0]["color"] = serde_json::json!("lime");
        let err = Catalog::from_json(value.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
        assert!(err.to_string().contains("lime"));

        value["projects"][0]["color"] = serde_json::json!("#+f+f+f");
        let err = Catalog::from_json(value.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
    }
}
