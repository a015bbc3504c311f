//! Scripted events: the one-shot things a mission transition queues up to happen
//! later, and the machinery that lets a `Clone` event carry a one-shot payload.

use core::fmt;
use std::sync::{Arc, Mutex};

use crate::state::Ledger;

/// Convenience for the things that pass trait objects around, but only one of them.
pub struct Bundle<T>(Arc<Mutex<Option<T>>>);

impl<T> Bundle<T> {
    pub fn of(contents: T) -> Self {
        Self(Arc::new(Mutex::new(Some(contents))))
    }

    pub fn take(&self) -> Option<T> {
        self.0.lock().unwrap().take()
    }
}

impl<T> fmt::Debug for Bundle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bundle<{}>(..)", std::any::type_name::<T>())
    }
}

impl<T> PartialEq for Bundle<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for Bundle<T> {}

impl<T> Clone for Bundle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// A deferred ledger mutation, run by the session when its event comes due.
///
/// It runs against the ledger *as it is at fire time*. Don't capture counts or
/// snapshots taken at schedule time; read whatever you need from the ledger you're
/// handed.
pub trait Transition: Send + Sync {
    fn apply(&mut self, ledger: &mut Ledger);
}

impl<F: FnMut(&mut Ledger) + Send + Sync> Transition for F {
    fn apply(&mut self, ledger: &mut Ledger) {
        self(ledger)
    }
}

macro_rules! trait_bundle {
    ( $(
        $fn:ident($trait:ident) => $enum:ident
    ),* $(,)? ) => { $(
        paste::paste! {
            pub type [< Bundled $trait >] = Bundle<Box<dyn $trait>>;
            impl [< Bundled $trait >] {
                pub fn new(contents: impl $trait + 'static) -> Self {
                    Bundle::of(Box::new(contents))
                }
            }
            impl Event {
                pub fn $fn(item: impl $trait + 'static) -> Self {
                    Self::$enum([< Bundled $trait >]::new(item))
                }
            }
        }
    )* };
}
trait_bundle! {
    apply(Transition) => Apply,
}

/// How loudly the presentation should flag a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    /// Cosmetic trouble: a bad address, a flubbed decode guess.
    Warning,
    /// The trackers are closing in.
    Critical,
}

/// A single scheduled thing which will happen, which the session interprets when
/// it comes due.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// X sends the player a chat message over the encrypted channel.
    Correspondent { raw: String, decoded: String },
    /// A transient on-screen warning or effect cue. Carries no game logic.
    Notice { severity: Severity, text: String },
    /// The mission-panel line changes.
    Objective(String),
    /// A deferred ledger mutation. See [`Transition`].
    Apply(BundledTransition),
}

impl Event {
    pub fn correspondent(raw: &str, decoded: &str) -> Event {
        Event::Correspondent {
            raw: raw.into(),
            decoded: decoded.into(),
        }
    }

    pub fn notice(severity: Severity, text: impl Into<String>) -> Event {
        Event::Notice {
            severity,
            text: text.into(),
        }
    }

    pub fn objective(text: &str) -> Event {
        Event::Objective(text.into())
    }
}
