//! Contact link updates
//!
//! Anchors tagged `data-carrier="phone"` or `data-carrier="whatsapp"` get their
//! `href` pointed at the resolved number and the first digit run in their
//! text swapped for it.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tracing::debug;

use super::document::{Document, Element};
use crate::data::ContactInfo;

/// Attribute that marks an element as a contact target
pub const CARRIER_ATTR: &str = "data-carrier";

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").expect("valid digit regex");
}

/// Kind of contact link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    Phone,
    WhatsApp,
}

impl CarrierKind {
    /// Value of the `data-carrier` attribute for this kind
    pub fn attr_value(&self) -> &'static str {
        match self {
            CarrierKind::Phone => "phone",
            CarrierKind::WhatsApp => "whatsapp",
        }
    }

    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "phone" => Some(CarrierKind::Phone),
            "whatsapp" => Some(CarrierKind::WhatsApp),
            _ => None,
        }
    }

    /// Link target for a number
    pub fn href(&self, number: &str) -> String {
        match self {
            CarrierKind::Phone => format!("tel:{}", number),
            CarrierKind::WhatsApp => format!("https://wa.me/{}", number),
        }
    }
}

/// Replaces only the first run of digits in `text` with `number`
pub fn replace_first_digit_run(text: &str, number: &str) -> String {
    DIGIT_RUN.replace(text, NoExpand(number)).into_owned()
}

/// Counts of links touched by [`apply_contacts`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkUpdates {
    pub phone: usize,
    pub whatsapp: usize,
}

impl LinkUpdates {
    pub fn total(&self) -> usize {
        self.phone + self.whatsapp
    }
}

/// Points every carrier link in the document at `contacts`
pub fn apply_contacts(doc: &mut Document, contacts: &ContactInfo) -> LinkUpdates {
    let mut updates = LinkUpdates::default();

    doc.for_each_element_mut(&mut |el| {
        let Some(kind) = el.attr(CARRIER_ATTR).and_then(CarrierKind::from_attr) else {
            return;
        };

        if el.name != "a" {
            debug!("Ignoring non-anchor <{}> tagged as {} target", el.name, kind.attr_value());
            return;
        }

        let number = match kind {
            CarrierKind::Phone => &contacts.phone,
            CarrierKind::WhatsApp => &contacts.whatsapp,
        };
        update_link(el, kind, number);

        match kind {
            CarrierKind::Phone => updates.phone += 1,
            CarrierKind::WhatsApp => updates.whatsapp += 1,
        }
    });

    updates
}

fn update_link(el: &mut Element, kind: CarrierKind, number: &str) {
    el.set_attr("href", kind.href(number));
    let text = replace_first_digit_run(&el.text_content(), number);
    el.set_text(text);
}
