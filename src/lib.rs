//! darkdive is the narrative core of a deep-web escape story: a player trades
//! messages with a scripted correspondent, decodes planted payloads, buys the one
//! item that opens the hidden network, and either sends the right escape phrase or
//! burns five attempts and gets traced.
//!
//! This crate is only the core. It decides, given the current run and a player
//! action, what the next state is, which scripted messages fire and on what delay,
//! and whether the run has ended. Rendering, audio, and the actual storage medium
//! are the embedder's problem; they talk to this crate through
//! [`Session`] and the [`saves::SaveGateway`] trait.
//!
//! # Architecture
//!
//! Everything that happens later is represented by a single [`Event`] value in the
//! [`sequencer`]'s due-time queue -- there are no timer threads, and nothing here
//! blocks. A player action goes into the [`mission`] state machine, which mutates
//! the [`Ledger`] immediately where the story calls for it and hands back a chain
//! of delayed events for the rest. [`Session::poll`] fires whatever has come due,
//! in order; ties fire in enqueue order. When the run ends, everything still
//! pending is cancelled in one shot.
//!
//! The ledger only moves through its transition methods, the mission step only
//! moves forward, and a finished run neither mutates nor persists. Those are the
//! invariants the tests lean on hardest.

pub mod codec;
pub mod constants;
pub mod event;
pub mod market;
pub mod mission;
pub mod saves;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod story;

pub use {
    event::{Event, Severity},
    mission::Outcome,
    saves::{Metadata, SaveError, SaveGateway},
    session::{ChatMessage, Sender, Session},
    state::{Ledger, MissionStep, Stage},
};
