//! In-page anchor handling

/// Element id targeted by an in-page link, e.g. `"#about"` -> `"about"`.
///
/// Returns `None` for external links and for a bare `#`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
