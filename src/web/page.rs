//! Elements of the portfolio page the effects act on
//!
//! Everything is queried once at startup. Optional elements are `Option`s
//! and collections may be empty; the matching effect simply has nothing to do.

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::core::{BlobRole, FxConfig, Layout, PageShape, Rect, Target, Theme};

/// Id of an optional `<script type="application/json">` holding config overrides
const CONFIG_ELEMENT_ID: &str = "nivo-fx-config";

pub struct Page {
    pub window: Window,
    pub document: Document,
    pub theme_toggle: Option<HtmlElement>,
    pub navbar: Option<HtmlElement>,
    pub hero_content: Option<HtmlElement>,
    pub blobs: Vec<HtmlElement>,
    pub sections: Vec<HtmlElement>,
    pub skills: Option<HtmlElement>,
    pub skill_tags: Vec<HtmlElement>,
    pub project_cards: Vec<HtmlElement>,
    pub anchors: Vec<HtmlElement>,
}

impl Page {
    pub fn query(window: Window) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let page = Self {
            theme_toggle: document
                .get_element_by_id("themeToggle")
                .and_then(|e| e.dyn_into::<HtmlElement>().ok()),
            navbar: query_one(&document, ".navbar")?,
            hero_content: query_one(&document, ".hero-content")?,
            blobs: query_all(&document, ".blob")?,
            sections: query_all(&document, "section:not(.hero)")?,
            skills: query_one(&document, ".skills")?,
            skill_tags: query_all(&document, ".skill-tag")?,
            project_cards: query_all(&document, ".project-card")?,
            anchors: query_all(&document, "a[href^=\"#\"]")?,
            window,
            document,
        };

        debug!(
            theme_toggle = page.theme_toggle.is_some(),
            navbar = page.navbar.is_some(),
            hero = page.hero_content.is_some(),
            blobs = page.blobs.len(),
            sections = page.sections.len(),
            skill_tags = page.skill_tags.len(),
            project_cards = page.project_cards.len(),
            anchors = page.anchors.len(),
            "Page elements queried"
        );
        Ok(page)
    }

    pub fn shape(&self) -> PageShape {
        PageShape {
            blobs: self
                .blobs
                .iter()
                .map(|b| BlobRole::from_class_name(&b.class_name()))
                .collect(),
            sections: self.sections.len(),
            skill_tags: self.skill_tags.len(),
            has_hero: self.hero_content.is_some(),
            has_navbar: self.navbar.is_some(),
            has_theme_toggle: self.theme_toggle.is_some(),
        }
    }

    /// Config overrides embedded in the page, or the defaults
    pub fn config(&self) -> FxConfig {
        let Some(json) = self
            .document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|e| e.text_content())
        else {
            return FxConfig::default();
        };
        FxConfig::from_json(&json).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring invalid page config");
            FxConfig::default()
        })
    }

    pub fn element(&self, target: Target) -> Option<&HtmlElement> {
        match target {
            Target::ThemeToggle => self.theme_toggle.as_ref(),
            Target::Navbar => self.navbar.as_ref(),
            Target::HeroContent => self.hero_content.as_ref(),
            Target::Blob(i) => self.blobs.get(i),
            Target::Section(i) => self.sections.get(i),
            Target::SkillTag(i) => self.skill_tags.get(i),
            Target::ProjectCard(i) => self.project_cards.get(i),
        }
    }

    pub fn set_style(&self, target: Target, property: &str, value: &str) {
        if let Some(element) = self.element(target) {
            // A rejected inline style leaves the element as it was
            let _ = element.style().set_property(property, value);
        }
    }

    pub fn apply_theme(&self, theme: Theme) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(Theme::ATTRIBUTE, theme.as_str());
        }
    }

    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl Layout for Page {
    fn blob_rect(&self, index: usize) -> Option<Rect> {
        self.blobs.get(index).map(|blob| {
            let r = blob.get_bounding_client_rect();
            Rect::new(r.left(), r.top(), r.width(), r.height())
        })
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

fn query_one(document: &Document, selector: &str) -> Result<Option<HtmlElement>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok()))
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}
