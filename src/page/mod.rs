//! Page handling
//!
//! An HTML page is parsed into an owned [`Document`], mutated by the sync
//! client, and serialized back out.

pub mod carrier;
mod document;
pub mod tabs;

pub use carrier::{apply_contacts, CarrierKind, LinkUpdates};
pub use document::{Document, Element, Node, TrustedHtml};
pub use tabs::{has_tabs_container, render_error, render_posts, POSTS_ERROR_MESSAGE};
