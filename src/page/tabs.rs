//! Tabbed blog preview rendering
//!
//! Fills the `#tabs` container with one Bootstrap nav item and one tab pane
//! per post. Each render clears the previous nav items and panes first, so
//! rendering is idempotent.

use super::document::{Document, Element, Node, TrustedHtml};
use crate::data::Post;

/// Id of the container that holds the tabbed preview
pub const TABS_CONTAINER_ID: &str = "tabs";

/// Message shown when posts are unavailable from both API and cache
pub const POSTS_ERROR_MESSAGE: &str = "Unable to load blog posts right now.";

/// Whether the page has a tabs container to render into
pub fn has_tabs_container(doc: &Document) -> bool {
    doc.element_by_id(TABS_CONTAINER_ID).is_some()
}

/// Renders `posts` into the tabs container
///
/// Returns `false` without touching the page when there is no container.
/// The first post is active and shown; all others are inactive.
pub fn render_posts(doc: &mut Document, posts: &[Post]) -> bool {
    let Some(container) = doc.element_by_id_mut(TABS_CONTAINER_ID) else {
        return false;
    };

    if let Some(nav) = nav_list(container) {
        nav.children = posts
            .iter()
            .enumerate()
            .map(|(i, post)| Node::Element(nav_item(post, i == 0)))
            .collect();
    }

    if let Some(content) = content_panel(container) {
        content.children = posts
            .iter()
            .enumerate()
            .map(|(i, post)| Node::Element(tab_pane(post, i == 0)))
            .collect();
    }

    true
}

/// Replaces the tabs with an inline error message
///
/// Returns `false` when there is no container.
pub fn render_error(doc: &mut Document, message: &str) -> bool {
    let Some(container) = doc.element_by_id_mut(TABS_CONTAINER_ID) else {
        return false;
    };

    if let Some(nav) = nav_list(container) {
        nav.children.clear();
    }
    if let Some(content) = content_panel(container) {
        content.children = vec![Node::Element(
            Element::new("div")
                .with_attr("class", "alert alert-warning")
                .with_attr("role", "alert")
                .with_text(message),
        )];
    }

    true
}

/// Finds the `.nav-tabs` list inside the container, creating it if missing
fn nav_list(container: &mut Element) -> Option<&mut Element> {
    child_with_class(container, "nav-tabs", || {
        Element::new("ul")
            .with_attr("class", "nav nav-tabs")
            .with_attr("role", "tablist")
    })
}

/// Finds the `.tab-content` panel inside the container, creating it if missing
fn content_panel(container: &mut Element) -> Option<&mut Element> {
    child_with_class(container, "tab-content", || {
        Element::new("div").with_attr("class", "tab-content")
    })
}

fn child_with_class<'a>(
    container: &'a mut Element,
    class: &str,
    create: impl FnOnce() -> Element,
) -> Option<&'a mut Element> {
    if container.find(&|el| el.has_class(class)).is_none() {
        container.children.push(Node::Element(create()));
    }
    container.find_mut(&|el| el.has_class(class))
}

fn pane_id(post: &Post) -> String {
    format!("post-{}", post.id)
}

fn tab_id(post: &Post) -> String {
    format!("post-{}-tab", post.id)
}

fn nav_item(post: &Post, active: bool) -> Element {
    let pane = pane_id(post);
    let button = Element::new("button")
        .with_attr("class", if active { "nav-link active" } else { "nav-link" })
        .with_attr("id", tab_id(post))
        .with_attr("data-bs-toggle", "tab")
        .with_attr("data-bs-target", format!("#{}", pane))
        .with_attr("type", "button")
        .with_attr("role", "tab")
        .with_attr("aria-controls", pane)
        .with_attr("aria-selected", if active { "true" } else { "false" })
        .with_text(post.title.as_str());

    Element::new("li")
        .with_attr("class", "nav-item")
        .with_attr("role", "presentation")
        .with_child(Node::Element(button))
}

fn tab_pane(post: &Post, active: bool) -> Element {
    let mut pane = Element::new("div")
        .with_attr(
            "class",
            if active {
                "tab-pane fade show active"
            } else {
                "tab-pane fade"
            },
        )
        .with_attr("id", pane_id(post))
        .with_attr("role", "tabpanel")
        .with_attr("aria-labelledby", tab_id(post));

    if let Some(thumbnail) = &post.thumbnail {
        pane.children.push(Node::Element(
            Element::new("img")
                .with_attr("class", "img-fluid mb-3")
                .with_attr("src", thumbnail.as_str())
                .with_attr("alt", post.title.as_str()),
        ));
    }

    pane.children
        .push(Node::Element(Element::new("h3").with_text(post.title.as_str())));

    if let Some(excerpt) = &post.excerpt {
        pane.children.push(Node::Element(
            Element::new("p")
                .with_attr("class", "post-excerpt")
                .with_text(excerpt.as_str()),
        ));
    }

    pane.children.push(Node::Element(
        Element::new("div")
            .with_attr("class", "post-content")
            .with_child(Node::Trusted(TrustedHtml::from_trusted_source(
                post.content.as_str(),
            ))),
    ));

    pane
}
