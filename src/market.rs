//! The cryptomart catalog: static listings the core reads and the presentation
//! renders. Pricing lives here, purchase rules live in the mission logic.

use std::collections::HashMap;

/// Catalog ids that gameplay keys on.
pub const DIGITAL_ID: &str = "digital_id";
pub const ANONYMITY_TRACKER: &str = "anonymity_tracker";
pub const FAKE_PASSPORT: &str = "fake_passport";
pub const DECRYPT_KEY: &str = "decrypt_key";
pub const DATA_SCRAMBLER: &str = "data_scrambler";

/// A single listing on cryptomart.onion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in dark coins.
    pub price: u32,
    /// One-line pitch shown in the grid.
    pub blurb: &'static str,
    /// Longer copy shown in the listing detail.
    pub details: &'static str,
    pub hint: Option<&'static str>,
    /// Some listings come with a code the seller swears matters.
    pub special_code: Option<&'static str>,
}

/// Every listing, in display order.
pub static ITEMS: &[Item] = &[
    Item {
        id: DIGITAL_ID,
        name: "Digital ID",
        price: 45,
        blurb: "Anonymous board posting rights",
        details: "Grants posting rights on boards that demand an identity check. \
                  Useful anywhere the deep boards ask who they're talking to.",
        hint: Some("The deeper boards want to know who you are."),
        special_code: None,
    },
    Item {
        id: ANONYMITY_TRACKER,
        name: "Anonymity Tracker",
        price: 80,
        blurb: "IP trace suppression",
        details: "Hides your digital footprint from the trackers. While active, the \
                  trace risk drops sharply. Required to reach whispernet.onion.",
        hint: Some(
            "The one tool the trackers fear. Nobody gets into the deep network without it.",
        ),
        special_code: None,
    },
    Item {
        id: FAKE_PASSPORT,
        name: "Forged Passport",
        price: 120,
        blurb: "High-grade identity forgery",
        details: "A digital passport built with top-shelf forgery work. Gets you \
                  through checkpoints that look closely.",
        hint: Some("The number ORN-7814 means something."),
        special_code: Some("ORN-7814"),
    },
    Item {
        id: DECRYPT_KEY,
        name: "Decryption Key",
        price: 60,
        blurb: "Automated cipher decoding",
        details: "Decodes complex encrypted messages automatically. Converts Base64, \
                  binary, and hex payloads on sight.",
        hint: Some("Some messages never open without this. It matters at the end."),
        special_code: None,
    },
    Item {
        id: DATA_SCRAMBLER,
        name: "Data Scrambler",
        price: 95,
        blurb: "Trace-signal jammer",
        details: "Jams the tracking grid's signal and buys you a window. A last \
                  resort for when things go loud.",
        hint: Some("Binary sequence 101110010 is the activation code."),
        special_code: Some("101110010"),
    },
];

lazy_static::lazy_static! {
    /// Lookup by id, for purchase handling.
    static ref BY_ID: HashMap<&'static str, &'static Item> =
        ITEMS.iter().map(|item| (item.id, item)).collect();
}

/// Find a listing by its id.
pub fn find(id: &str) -> Option<&'static Item> {
    BY_ID.get(id).copied()
}
