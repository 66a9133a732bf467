//! Drives a [`Portfolio`] against the live document.
//!
//! Markup contract: sections carry their anchor ids, animated regions carry
//! `data-animate-id`, nav buttons `data-nav="<section>"`, project cards
//! `data-preview="<index>"` and dismiss buttons `data-dismiss="<source>"`.
//! The preview overlay is `#preview`; its close button is `#preview-close`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use folio_core::presentation::{self, EntranceSide};
use folio_core::{Portfolio, ProjectId};
use folio_protocol::{
    Capability, DismissSource, HostCommand, HostEvent, IntersectionEntry, ObserverOptions,
    RegionId, ScrollBehavior, ScrollMetrics, Section, Snapshot,
};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, ScrollToOptions, Window,
};

const REGION_ATTR: &str = "data-animate-id";
const OVERLAY_ID: &str = "preview";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Observation {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

/// Everything the host holds on the portfolio's behalf. Dropping a value
/// detaches it from the page.
#[derive(Default)]
struct Bindings {
    listeners: HashMap<Capability, EventListener>,
    observation: Option<Observation>,
    wake: Option<Timeout>,
    clicks: Option<EventListener>,
}

struct DomHost {
    window: Window,
    document: Document,
    portfolio: RefCell<Portfolio>,
    bindings: RefCell<Bindings>,
}

thread_local! {
    static HOST: RefCell<Option<Rc<DomHost>>> = const { RefCell::new(None) };
}

/// Mount a portfolio on the current document, replacing any running host.
#[wasm_bindgen]
pub fn start_dom_host(
    content_json: Option<String>,
    config_json: Option<String>,
) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let portfolio = Portfolio::from_json(
        content_json.as_deref().map(str::as_bytes),
        config_json.as_deref().map(str::as_bytes),
    )
    .map_err(|e| JsError::new(&e.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;

    stop_dom_host();
    let host = Rc::new(DomHost {
        window,
        document,
        portfolio: RefCell::new(portfolio),
        bindings: RefCell::default(),
    });
    host.bind_clicks();
    host.stage_entrances();
    host.run(Portfolio::mount);
    let offset = host.window.scroll_y().unwrap_or(0.0);
    host.run(|p| p.handle(HostEvent::Scrolled { offset }));
    HOST.with(|slot| *slot.borrow_mut() = Some(host));
    gloo::console::log!("folio: dom host started");
    Ok(())
}

/// Tear the running host down and detach everything it attached.
#[wasm_bindgen]
pub fn stop_dom_host() {
    let Some(host) = HOST.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    host.run(Portfolio::teardown);
    let bindings = std::mem::take(&mut *host.bindings.borrow_mut());
    retire(bindings);
}

/// Drop `value` after the current callback returns. Listeners and timers may
/// be released from inside their own callbacks.
fn retire<T: 'static>(value: T) {
    wasm_bindgen_futures::spawn_local(async move {
        drop(value);
    });
}

impl DomHost {
    fn now(&self) -> u64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .filter(|ms| ms.is_finite())
            .map_or(0, |ms| ms.max(0.0) as u64)
    }

    /// Advance the clock, apply `f`, execute the resulting commands and
    /// re-render.
    fn run(self: &Rc<Self>, f: impl FnOnce(&mut Portfolio) -> Vec<HostCommand>) {
        let now_ms = self.now();
        let commands = {
            let mut portfolio = self.portfolio.borrow_mut();
            let mut commands = portfolio.handle(HostEvent::Tick { now_ms });
            commands.extend(f(&mut portfolio));
            commands
        };
        for command in commands {
            self.execute(command);
        }
        self.render();
    }

    fn execute(self: &Rc<Self>, command: HostCommand) {
        match command {
            HostCommand::Listen { capability } => self.listen(capability),
            HostCommand::Unlisten { capability } => {
                let removed = self.bindings.borrow_mut().listeners.remove(&capability);
                if let Some(listener) = removed {
                    retire(listener);
                }
            }
            HostCommand::Observe { regions, options } => self.observe(&regions, &options),
            HostCommand::Disconnect => self.disconnect(),
            HostCommand::ScrollTo { top, behavior } => {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(match behavior {
                    ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
                    ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
                });
                self.window.scroll_with_scroll_to_options(&options);
            }
            HostCommand::Focus { target } => {
                if let Some(element) = self.html(target.element_id())
                    && let Err(err) = element.focus()
                {
                    gloo::console::warn!("folio: focus failed", err);
                }
            }
            HostCommand::WakeAt { at_ms } => self.wake_at(at_ms),
        }
    }

    fn listen(self: &Rc<Self>, capability: Capability) {
        let host = Rc::downgrade(self);
        let name = capability.event_name();
        let listener = match capability {
            Capability::PointerMove => EventListener::new(&self.window, name, move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = (f64::from(event.client_x()), f64::from(event.client_y()));
                if let Some(host) = host.upgrade() {
                    host.run(|p| p.handle(HostEvent::PointerMoved { x, y }));
                }
            }),
            Capability::Scroll => EventListener::new(&self.window, name, move |_event| {
                if let Some(host) = host.upgrade() {
                    let offset = host.window.scroll_y().unwrap_or(0.0);
                    host.run(|p| p.handle(HostEvent::Scrolled { offset }));
                }
            }),
            Capability::CancelKey => EventListener::new(&self.window, name, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                if let Some(host) = host.upgrade() {
                    host.run(|p| p.handle(HostEvent::KeyDown { key }));
                }
            }),
        };
        let previous = self
            .bindings
            .borrow_mut()
            .listeners
            .insert(capability, listener);
        if let Some(previous) = previous {
            retire(previous);
        }
    }

    fn observe(self: &Rc<Self>, regions: &[RegionId], options: &ObserverOptions) {
        self.disconnect();
        let host = Rc::downgrade(self);
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let entries: Vec<IntersectionEntry> = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| IntersectionEntry {
                        id: entry.target().get_attribute(REGION_ATTR).map(RegionId::from),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                if let Some(host) = host.upgrade() {
                    host.run(|p| p.handle(HostEvent::Intersections { entries }));
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());
        let observer =
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            {
                Ok(observer) => observer,
                Err(err) => {
                    gloo::console::warn!("folio: IntersectionObserver unavailable", err);
                    return;
                }
            };
        for id in regions {
            match self.document.query_selector(&region_selector(id)) {
                Ok(Some(element)) => observer.observe(&element),
                _ => gloo::console::debug!("folio: region not in document", id.to_string()),
            }
        }
        self.bindings.borrow_mut().observation = Some(Observation {
            observer,
            _callback: callback,
        });
    }

    fn disconnect(&self) {
        let observation = self.bindings.borrow_mut().observation.take();
        if let Some(observation) = observation {
            observation.observer.disconnect();
            retire(observation);
        }
    }

    fn wake_at(self: &Rc<Self>, at_ms: u64) {
        let delay = u32::try_from(at_ms.saturating_sub(self.now())).unwrap_or(u32::MAX);
        let host = Rc::downgrade(self);
        let timeout = Timeout::new(delay, move || {
            if let Some(host) = host.upgrade() {
                host.run(|_| Vec::new());
            }
        });
        let previous = self.bindings.borrow_mut().wake.replace(timeout);
        if let Some(previous) = previous {
            retire(previous);
        }
    }

    fn bind_clicks(self: &Rc<Self>) {
        let host = Rc::downgrade(self);
        let listener = EventListener::new(&self.document, "click", move |event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            if let Some(host) = host.upgrade() {
                host.on_click(&target);
            }
        });
        self.bindings.borrow_mut().clicks = Some(listener);
    }

    fn on_click(self: &Rc<Self>, target: &Element) {
        if let Some(section) = closest_attr(target, "data-nav").and_then(|v| v.parse::<Section>().ok())
        {
            let locator = |section: Section| self.section_top(section);
            self.run(|p| p.navigate(section, &locator));
        } else if let Some(index) =
            closest_attr(target, "data-preview").and_then(|v| v.parse::<usize>().ok())
        {
            self.run(|p| {
                p.open_preview(ProjectId(index)).unwrap_or_else(|err| {
                    gloo::console::warn!(format!("folio: {err}"));
                    Vec::new()
                })
            });
        } else if let Some(source) =
            closest_attr(target, "data-dismiss").and_then(|v| v.parse::<DismissSource>().ok())
        {
            self.run(|p| p.dismiss(source));
        } else if target.id() == OVERLAY_ID {
            self.run(|p| p.dismiss(DismissSource::Overlay));
        }
    }

    fn section_top(&self, section: Section) -> Option<f64> {
        let element = self.html(section.anchor_id()?)?;
        Some(f64::from(element.offset_top()))
    }

    fn html(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn metrics(&self) -> ScrollMetrics {
        let scroll_height = self
            .document
            .document_element()
            .map_or(0.0, |root| f64::from(root.scroll_height()));
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        ScrollMetrics::new(scroll_height, viewport_height)
    }

    /// Give nav buttons and cards their transition delays, and skill cards
    /// the side they slide in from, before anything is revealed.
    fn stage_entrances(&self) {
        let delay = |d: std::time::Duration| format!("{}ms", d.as_millis());
        if let Ok(buttons) = self.document.query_selector_all("[data-nav]") {
            for i in 0..buttons.length() {
                let Some(button) = buttons
                    .get(i)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                if let Some(section) = button
                    .get_attribute("data-nav")
                    .and_then(|v| v.parse::<Section>().ok())
                {
                    let nav_delay = delay(presentation::nav_delay(section));
                    let _ = button.style().set_property("transition-delay", &nav_delay);
                }
            }
        }

        let regions = self.portfolio.borrow().catalog().regions();
        for id in &regions {
            let Some(card) = self
                .document
                .query_selector(&region_selector(id))
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let _ = card.style().set_property(
                "transition-delay",
                &delay(presentation::entrance_delay(id.as_str())),
            );
        }
        let skills = self.portfolio.borrow().catalog().skills.len();
        for i in 0..skills {
            let selector = region_selector(&RegionId::skill(i));
            if let Ok(Some(card)) = self.document.query_selector(&selector) {
                let side = match presentation::skill_entrance(i) {
                    EntranceSide::Left => "left",
                    EntranceSide::Right => "right",
                };
                let _ = card.set_attribute("data-entrance", side);
            }
        }
    }

    fn render(&self) {
        let snapshot = self.portfolio.borrow().snapshot(self.metrics());
        let cursor = snapshot.cursor;
        self.set_style(
            "scroll-progress",
            "width",
            &format!("{:.2}%", snapshot.scroll_progress),
        );
        self.set_style(
            "cursor-follower",
            "transform",
            &format!(
                "translate({}px, {}px) scale({})",
                cursor.left, cursor.top, cursor.scale
            ),
        );
        for (id, shift) in [
            ("parallax-diamond", snapshot.parallax.diamond),
            ("parallax-ring", snapshot.parallax.ring),
            ("parallax-glow", snapshot.parallax.glow),
        ] {
            self.set_style(id, "transform", &format!("translateY({shift}px)"));
        }
        if snapshot.loaded
            && let Some(body) = self.document.body()
        {
            let _ = body.set_attribute("data-loaded", "");
        }
        self.render_nav(snapshot.active_section);
        for id in &snapshot.revealed {
            if let Ok(Some(element)) = self.document.query_selector(&region_selector(id)) {
                let _ = element.set_attribute("data-revealed", "");
            }
        }
        self.render_preview(&snapshot);
    }

    fn render_nav(&self, active: Section) {
        let Ok(buttons) = self.document.query_selector_all("[data-nav]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(button) = buttons
                .get(i)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let current = button
                .get_attribute("data-nav")
                .and_then(|v| v.parse::<Section>().ok())
                == Some(active);
            let _ = if current {
                button.set_attribute("aria-current", "page")
            } else {
                button.remove_attribute("aria-current")
            };
        }
    }

    fn render_preview(&self, snapshot: &Snapshot) {
        let Some(overlay) = self.html(OVERLAY_ID) else {
            return;
        };
        let Some(view) = &snapshot.preview else {
            let _ = overlay.set_attribute("hidden", "");
            return;
        };
        let project = &view.project;
        let _ = overlay.remove_attribute("hidden");
        let _ = overlay
            .style()
            .set_property("--accent", &project.color.to_string());
        self.set_text("preview-title", &project.title);
        self.set_text("preview-description", &project.description);
        self.set_text("preview-tech", &project.tech.join(" / "));
        if let Some(image) = self.document.get_element_by_id("preview-image") {
            let _ = image.set_attribute("src", &project.image);
        }
        if let Some(link) = self.document.get_element_by_id("preview-link") {
            let _ = link.set_attribute("href", &project.link);
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) {
        if let Some(element) = self.html(id) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.set_text_content(Some(text));
        }
    }
}

fn region_selector(id: &RegionId) -> String {
    format!("[{REGION_ATTR}=\"{id}\"]")
}

fn closest_attr(target: &Element, attr: &str) -> Option<String> {
    target
        .closest(&format!("[{attr}]"))
        .ok()
        .flatten()?
        .get_attribute(attr)
}
