//! Browser glue: listeners, observers, timers and animation frames
//!
//! All handlers share one `Runtime`. Each one borrows the session for a
//! single dispatch, collects its commands, releases the borrow and then
//! applies the commands to the page.

mod console;
mod page;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventTarget, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Node, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use crate::core::anchor::fragment_target;
use crate::core::reveal::{section_observer, skills_observer, ObserverSpec};
use crate::core::{Command, DeferredTask, Session, Vec2};
use page::Page;
use storage::LocalStorage;

type PageSession = Session<LocalStorage>;

struct Runtime {
    session: RefCell<PageSession>,
    page: Page,
}

/// Wire every effect to the page. Setup failures are logged, never thrown.
pub fn start() {
    if let Err(e) = run() {
        error!(?e, "Page effects not started");
    }
}

fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let page = Page::query(window)?;
    let store = LocalStorage::open(&page.window);
    let session = Session::new(page.config(), store, page.shape());
    let rt = Rc::new(Runtime {
        session: RefCell::new(session),
        page,
    });

    let commands = rt.session.borrow_mut().start();
    dispatch(&rt, commands);

    // One failing binding must not take the other effects down with it
    let bindings = [
        ("theme-toggle", bind_theme_toggle(&rt)),
        ("anchors", bind_anchors(&rt)),
        ("section-reveal", bind_section_reveal(&rt)),
        ("skills-reveal", bind_skills_reveal(&rt)),
        ("scroll", bind_scroll(&rt)),
        ("pointer", bind_pointer(&rt)),
        ("project-cards", bind_project_cards(&rt)),
    ];
    for (name, result) in bindings {
        if let Err(e) = result {
            error!(binding = name, ?e, "Effect binding failed");
        }
    }

    console::print_banners();
    console::note_reduced_motion(&rt.page.window);
    info!(theme = %rt.session.borrow().theme(), "Page effects ready");
    Ok(())
}

fn dispatch(rt: &Rc<Runtime>, commands: Vec<Command>) {
    for command in commands {
        match command {
            Command::Style { target, property, value } => {
                rt.page.set_style(target, property, &value);
            }
            Command::ApplyTheme(theme) => rt.page.apply_theme(theme),
            Command::Defer { delay_ms, task } => schedule(rt, delay_ms, task),
        }
    }
}

fn schedule(rt: &Rc<Runtime>, delay_ms: u32, task: DeferredTask) {
    let rt_cb = rt.clone();
    let callback = Closure::once_into_js(move || {
        let commands = rt_cb.session.borrow_mut().run_deferred(task);
        dispatch(&rt_cb, commands);
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) = rt
        .page
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        warn!(?e, ?task, "Failed to schedule deferred task");
    }
}

/// Frame work for one throttled signal
type FrameWork = fn(&mut PageSession, &Page) -> Vec<Command>;

fn request_frame(rt: &Rc<Runtime>, work: FrameWork) {
    let rt_cb = rt.clone();
    let callback = Closure::once_into_js(move |_timestamp: f64| {
        let commands = work(&mut rt_cb.session.borrow_mut(), &rt_cb.page);
        dispatch(&rt_cb, commands);
    });
    if let Err(e) = rt.page.window.request_animation_frame(callback.unchecked_ref()) {
        // Run inline so the gate is released and later events still schedule
        warn!(?e, "requestAnimationFrame failed");
        let commands = work(&mut rt.session.borrow_mut(), &rt.page);
        dispatch(rt, commands);
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn pointer_position(event: &Event) -> Option<Vec2> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Vec2::new(mouse.client_x() as f64, mouse.client_y() as f64))
}

fn bind_theme_toggle(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    let Some(toggle) = &rt.page.theme_toggle else {
        return Ok(());
    };
    let rt_cb = rt.clone();
    listen(toggle, "click", move |_| {
        let commands = rt_cb.session.borrow_mut().toggle_theme();
        dispatch(&rt_cb, commands);
    })
}

fn bind_anchors(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    for anchor in &rt.page.anchors {
        let href = anchor.get_attribute("href").unwrap_or_default();
        let rt_cb = rt.clone();
        listen(anchor, "click", move |event| {
            event.prevent_default();
            let Some(target) = fragment_target(&href).and_then(|id| rt_cb.page.element_by_id(id))
            else {
                trace!(href = %href, "Anchor target missing");
                return;
            };
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        })?;
    }
    Ok(())
}

/// Watch `targets` and call `on_visible` with the index of each one that intersects
fn observe(
    targets: &[HtmlElement],
    settings: &ObserverSpec,
    mut on_visible: impl FnMut(usize) + 'static,
) -> Result<(), JsValue> {
    let watched = targets.to_vec();
    let unobserve = settings.unobserve_after_reveal;
    let on_entries = move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            let node: &Node = target.as_ref();
            let Some(index) = watched.iter().position(|w| w.is_same_node(Some(node))) else {
                continue;
            };
            on_visible(index);
            if unobserve {
                observer.unobserve(&target);
            }
        }
    };
    let callback =
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::wrap(Box::new(on_entries));

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(settings.threshold));
    if let Some(margin) = &settings.root_margin {
        init.set_root_margin(margin);
    }
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for target in targets {
        observer.observe(target);
    }
    Ok(())
}

fn bind_section_reveal(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    if rt.page.sections.is_empty() {
        return Ok(());
    }
    let settings = section_observer(&rt.session.borrow().config().reveal);
    let rt_cb = rt.clone();
    observe(&rt.page.sections, &settings, move |index| {
        let commands = rt_cb.session.borrow_mut().section_visible(index);
        dispatch(&rt_cb, commands);
    })
}

fn bind_skills_reveal(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    let Some(skills) = &rt.page.skills else {
        return Ok(());
    };
    let settings = skills_observer(&rt.session.borrow().config().skills);
    let rt_cb = rt.clone();
    observe(std::slice::from_ref(skills), &settings, move |_| {
        let commands = rt_cb.session.borrow_mut().skills_visible();
        dispatch(&rt_cb, commands);
    })
}

fn bind_scroll(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    let rt_cb = rt.clone();
    listen(&rt.page.window, "scroll", move |_| {
        if rt_cb.session.borrow_mut().scrolled() {
            request_frame(&rt_cb, |session, page| session.scroll_frame(page));
        }
    })
}

fn bind_pointer(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    if rt.page.blobs.is_empty() {
        return Ok(());
    }

    let rt_move = rt.clone();
    listen(&rt.page.document, "mousemove", move |event| {
        let Some(position) = pointer_position(&event) else {
            return;
        };
        if rt_move.session.borrow_mut().pointer_moved(position) {
            request_frame(&rt_move, |session, page| session.pointer_frame(page));
        }
    })?;

    let rt_click = rt.clone();
    listen(&rt.page.document, "click", move |event| {
        let Some(position) = pointer_position(&event) else {
            return;
        };
        let commands = rt_click.session.borrow_mut().clicked(position, &rt_click.page);
        dispatch(&rt_click, commands);
    })
}

fn bind_project_cards(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    for (index, card) in rt.page.project_cards.iter().enumerate() {
        for (event, entered) in [("mouseenter", true), ("mouseleave", false)] {
            let rt_cb = rt.clone();
            listen(card, event, move |_| {
                let commands = rt_cb.session.borrow().card_hover(index, entered);
                dispatch(&rt_cb, commands);
            })?;
        }
    }
    Ok(())
}
