//! One run of the game, end to end: the ledger, the append-only comms log, the
//! scripted-event queue, the current objective line, and the mirror out to
//! persistent storage. This is the only public mutation surface; the presentation
//! calls the action methods here and renders whatever it reads back.

#[cfg(test)]
use mock_instant::Instant;
#[cfg(not(test))]
use std::time::Instant;

use crate::event::Event;
use crate::mission::{self, Outcome, Reaction};
use crate::saves::{Metadata, SaveGateway};
use crate::sequencer::Sequencer;
use crate::state::{Ledger, Stage};
use crate::story::{lines, objectives};

/// Who wrote a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    Correspondent,
    Player,
}

/// One entry in the comms log. The log is append-only; entries are never edited
/// or removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// 1-based and strictly increasing. Assigned when the entry lands in the log,
    /// never earlier, so delayed events can't collide over ids they reserved at
    /// schedule time.
    pub id: u64,
    pub sender: Sender,
    /// The over-the-wire form.
    pub raw: String,
    /// The readable form, for encoded traffic.
    pub decoded: Option<String>,
    pub encoded: bool,
    pub at: Instant,
}

/// A full run. Create one with [`Session::new`] (throwaway) or
/// [`Session::resume`] (mirrored to a save slot).
pub struct Session {
    ledger: Ledger,
    log: Vec<ChatMessage>,
    objective: String,
    sequencer: Sequencer,
    gateway: Option<Box<dyn SaveGateway>>,
}

impl Session {
    /// A fresh run with no persistence.
    pub fn new() -> Self {
        let mut session = Session {
            ledger: Ledger::default(),
            log: Vec::new(),
            objective: objectives::CONTACT.to_owned(),
            sequencer: Sequencer::new(),
            gateway: None,
        };
        session.push_correspondent(lines::OPENING_RAW, lines::OPENING);
        session
    }

    /// A run mirrored to `gateway`, resuming its snapshot if there is one.
    ///
    /// Unreadable snapshots and snapshots of finished runs are treated as absent:
    /// the player gets a fresh run, never an error screen.
    pub fn resume(mut gateway: Box<dyn SaveGateway>) -> Self {
        let restored = match gateway.load() {
            Ok(Some((_meta, ledger))) if !ledger.completed() => Some(ledger),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable save");
                None
            }
        };
        let mut session = Session::new();
        if let Some(ledger) = restored {
            session.objective = objective_for(&ledger).to_owned();
            session.ledger = ledger;
        }
        session.gateway = Some(gateway);
        session.persist();
        session
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    /// The mission-panel line.
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// When the next scripted event comes due, if any are pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.sequencer.next_due()
    }

    /// Send a chat message as the player.
    pub fn send_message(&mut self, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            return Outcome::Ignored;
        }
        if self.ledger.stage().is_terminal() {
            return Outcome::Terminal;
        }
        self.push_player(text);
        let reaction = mission::on_player_message(&mut self.ledger, text);
        self.react(reaction)
    }

    /// Submit a decode guess against the board's mission post.
    pub fn attempt_decode(&mut self, guess: &str) -> Outcome {
        let reaction = mission::on_decode_attempt(&mut self.ledger, guess);
        self.react(reaction)
    }

    /// Buy a market listing.
    pub fn purchase(&mut self, item_id: &str) -> Outcome {
        let reaction = mission::on_purchase(&mut self.ledger, item_id);
        self.react(reaction)
    }

    /// Ask to open an address. [`Outcome::Accepted`] means the presentation may
    /// switch pages; anything else means it stays put.
    pub fn navigate(&mut self, address: &str) -> Outcome {
        let reaction = mission::on_navigate(&self.ledger, address);
        self.react(reaction)
    }

    /// The player clicked into the hidden contact's node.
    pub fn discover_hidden_contact(&mut self) -> Outcome {
        let reaction = mission::on_contact_discovery(&mut self.ledger);
        self.react(reaction)
    }

    /// Fire everything that has come due, in order. Returns the fired events so
    /// the presentation can surface notices and play its effects; correspondent
    /// messages will already be in [`Self::log`] by the time this returns.
    pub fn poll(&mut self) -> Vec<Event> {
        let now = Instant::now();
        let mut fired = Vec::new();
        let mut mutated = false;
        while let Some(event) = self.sequencer.pop_due(now) {
            match &event {
                Event::Correspondent { raw, decoded } => {
                    self.push_correspondent(raw, decoded);
                }
                Event::Objective(text) => {
                    self.objective = text.clone();
                }
                Event::Apply(bundle) => {
                    if let Some(mut transition) = bundle.take() {
                        transition.apply(&mut self.ledger);
                        mutated = true;
                        if self.ledger.stage().is_terminal() {
                            self.sequencer.cancel_pending();
                        }
                    }
                }
                Event::Notice { .. } => {}
            }
            fired.push(event);
        }
        if mutated {
            self.persist();
        }
        fired
    }

    /// Wipe the save and start over. The one action that still works from a
    /// terminal state.
    pub fn reset(&mut self) {
        if let Some(gateway) = self.gateway.as_mut() {
            if let Err(err) = gateway.wipe() {
                tracing::warn!(%err, "failed to clear the saved run");
            }
        }
        self.sequencer.cancel_pending();
        self.ledger = Ledger::default();
        self.log.clear();
        self.objective = objectives::CONTACT.to_owned();
        self.push_correspondent(lines::OPENING_RAW, lines::OPENING);
        self.persist();
    }

    /// Apply a reaction: terminal cancellation first, then the reaction's own
    /// chain, then the storage mirror.
    fn react(&mut self, reaction: Reaction) -> Outcome {
        let Reaction { outcome, events } = reaction;
        match outcome {
            Outcome::Escaped => {
                // Terminal success: everything pending dies with the run, and
                // nothing new gets scheduled.
                self.sequencer.cancel_pending();
                self.objective = objectives::ESCAPED.to_owned();
                tracing::debug!("run complete");
            }
            Outcome::GameOver => {
                // Terminal failure: pending events die, but this reaction's own
                // game-over notices still go out.
                self.sequencer.cancel_pending();
                self.objective = objectives::TRACED.to_owned();
                tracing::debug!("run failed");
            }
            _ => {}
        }
        self.sequencer.schedule_chain(events);
        self.persist();
        outcome
    }

    /// Mirror the ledger out, fire and forget. A finished run never hits
    /// storage, and the stale snapshot from just before the finish goes with it.
    fn persist(&mut self) {
        let gateway = match self.gateway.as_mut() {
            Some(gateway) => gateway,
            None => return,
        };
        if self.ledger.completed() {
            if let Err(err) = gateway.wipe() {
                tracing::warn!(%err, "failed to clear the saved run");
            }
            return;
        }
        let meta = Metadata::now(&self.objective);
        if let Err(err) = gateway.save(&meta, &self.ledger) {
            tracing::warn!(%err, "failed to mirror run state");
        }
    }

    fn push_correspondent(&mut self, raw: &str, decoded: &str) {
        let id = self.log.len() as u64 + 1;
        self.log.push(ChatMessage {
            id,
            sender: Sender::Correspondent,
            raw: raw.to_owned(),
            decoded: Some(decoded.to_owned()),
            encoded: true,
            at: Instant::now(),
        });
    }

    fn push_player(&mut self, text: &str) {
        let id = self.log.len() as u64 + 1;
        self.log.push(ChatMessage {
            id,
            sender: Sender::Player,
            raw: text.to_owned(),
            decoded: None,
            encoded: false,
            at: Instant::now(),
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn objective_for(ledger: &Ledger) -> &'static str {
    match ledger.stage() {
        Stage::Contact => objectives::CONTACT,
        Stage::DecodeBoard => objectives::DECODE_BOARD,
        Stage::AcquireTracker if !ledger.has_anonymity_tracker() => objectives::BUY_TRACKER,
        Stage::AcquireTracker => objectives::FIND_ORION,
        Stage::FindOrion => objectives::MESSAGE_ORION,
        Stage::FinalCode => objectives::FINAL_CODE,
        Stage::Complete => objectives::ESCAPED,
        Stage::Failed => objectives::TRACED,
    }
}
