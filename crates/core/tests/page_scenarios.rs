//! Integration test: drive a mounted portfolio the way a host would and
//! check navigation, preview lifecycle and teardown end to end.

use std::collections::BTreeMap;

use folio_core::{Catalog, ControllerConfig, Portfolio, ProjectId};
use folio_protocol::{
    Capability, DismissSource, FocusTarget, HostCommand, HostEvent, ScrollBehavior, Section,
};

fn mounted_page() -> Portfolio {
    let mut page = Portfolio::new(Catalog::builtin(), &ControllerConfig::default());
    page.mount();
    page
}

fn scroll_top(commands: &[HostCommand]) -> f64 {
    match commands {
        [HostCommand::ScrollTo { top, behavior }] => {
            assert_eq!(*behavior, ScrollBehavior::Smooth);
            *top
        }
        other => panic!("expected a single smooth scroll, got {other:?}"),
    }
}

fn count(commands: &[HostCommand], wanted: &HostCommand) -> usize {
    commands.iter().filter(|cmd| *cmd == wanted).count()
}

#[test]
fn navigation_scenarios() {
    let mut page = mounted_page();
    let offsets = BTreeMap::from([(Section::Work, 960.0), (Section::Contact, 2400.0)]);

    assert_eq!(scroll_top(&page.navigate(Section::Home, &offsets)), 0.0);
    assert_eq!(page.active_section(), Section::Home);

    assert_eq!(scroll_top(&page.navigate(Section::Work, &offsets)), 880.0);
    assert_eq!(page.active_section(), Section::Work);

    // Skills is not rendered yet: scroll to the top, but still activate it.
    assert_eq!(scroll_top(&page.navigate(Section::Skills, &offsets)), 0.0);
    assert_eq!(page.active_section(), Section::Skills);

    // A second request before the first scroll lands just issues another one.
    assert_eq!(scroll_top(&page.navigate(Section::Contact, &offsets)), 2320.0);
    assert_eq!(scroll_top(&page.navigate(Section::Work, &offsets)), 880.0);
    assert_eq!(page.active_section(), Section::Work);
}

#[test]
fn preview_replacement_never_stacks() {
    let mut page = mounted_page();
    page.open_preview(ProjectId(0)).unwrap();
    page.open_preview(ProjectId(1)).unwrap();

    let (id, record) = page.preview().unwrap();
    assert_eq!(id, ProjectId(1));
    assert_eq!(record.title, "School Management System");
    assert_eq!(page.scheduler().len(), 1, "only the current preview has a timer");
}

#[test]
fn escape_tears_down_timer_and_listener() {
    let mut page = mounted_page();
    page.handle(HostEvent::Tick { now_ms: 500 });
    let opened = page.open_preview(ProjectId(0)).unwrap();
    let listen = HostCommand::Listen {
        capability: Capability::CancelKey,
    };
    let unlisten = HostCommand::Unlisten {
        capability: Capability::CancelKey,
    };
    assert_eq!(count(&opened, &listen), 1);

    let closed = page.handle(HostEvent::KeyDown {
        key: "Escape".into(),
    });
    assert_eq!(closed, vec![unlisten]);
    assert!(page.preview().is_none());
    assert!(page.scheduler().is_empty());

    // The old deadline passes without moving focus anywhere.
    assert!(page.handle(HostEvent::Tick { now_ms: 600 }).is_empty());
}

#[test]
fn replacement_before_focus_fires_moves_focus_once() {
    let mut page = mounted_page();
    page.open_preview(ProjectId(0)).unwrap();
    page.handle(HostEvent::Tick { now_ms: 30 });
    let replaced = page.open_preview(ProjectId(2)).unwrap();
    assert_eq!(replaced.last(), Some(&HostCommand::WakeAt { at_ms: 80 }));

    // A's deadline (50) passes: only a reminder of B's deadline comes back.
    assert_eq!(
        page.handle(HostEvent::Tick { now_ms: 50 }),
        vec![HostCommand::WakeAt { at_ms: 80 }]
    );

    let focus = HostCommand::Focus {
        target: FocusTarget::DismissControl,
    };
    assert_eq!(page.handle(HostEvent::Tick { now_ms: 80 }), vec![focus]);
    assert!(page.handle(HostEvent::Tick { now_ms: 500 }).is_empty());
}

#[test]
fn every_dismiss_source_closes() {
    for source in [
        DismissSource::Overlay,
        DismissSource::CloseControl,
        DismissSource::FooterButton,
        DismissSource::CancelKey,
    ] {
        let mut page = mounted_page();
        page.open_preview(ProjectId(2)).unwrap();
        assert_eq!(page.dismiss(source).len(), 1);
        assert!(page.preview().is_none());
        assert!(page.dismiss(source).is_empty());
    }
}

#[test]
fn events_after_teardown_change_nothing() {
    let mut page = mounted_page();
    page.handle(HostEvent::Scrolled { offset: 120.0 });
    page.teardown();

    page.handle(HostEvent::Scrolled { offset: 999.0 });
    page.handle(HostEvent::PointerMoved { x: 5.0, y: 5.0 });
    page.handle(HostEvent::Intersections {
        entries: vec![folio_protocol::IntersectionEntry::visible("project-0")],
    });
    assert_eq!(page.scroll_offset(), 120.0);
    assert!(!page.is_revealed("project-0"));

    // Mounting again re-acquires everything.
    let commands = page.mount();
    assert_eq!(
        count(
            &commands,
            &HostCommand::Listen {
                capability: Capability::Scroll
            }
        ),
        1
    );
}

#[test]
fn custom_content_and_config() {
    let mut catalog = Catalog::builtin();
    catalog.projects.truncate(1);
    let content = serde_json::to_vec(&catalog).unwrap();
    let config = br#"{"header_clearance": 64, "focus_delay_ms": 10}"#;

    let mut page = Portfolio::from_json(Some(content.as_slice()), Some(&config[..])).unwrap();
    page.mount();
    assert!(page.open_preview(ProjectId(1)).is_err());
    let commands = page.open_preview(ProjectId(0)).unwrap();
    assert_eq!(commands.last(), Some(&HostCommand::WakeAt { at_ms: 10 }));

    let locator = |section: Section| (section == Section::Work).then_some(500.0);
    assert_eq!(scroll_top(&page.navigate(Section::Work, &locator)), 436.0);
}
