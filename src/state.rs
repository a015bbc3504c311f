//! The authoritative progression record for one run, and nothing else: no message
//! log, no timers, no rendering state. Everything in here changes only through the
//! transition methods, every transition is total, and none of them read the clock.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::gameplay::{MAX_ESCAPE_ATTEMPTS, STARTING_COINS};
use crate::market;

/// An integer checkpoint in the mission graph. Only ever moves forward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MissionStep {
    /// Waiting for the player to reach out to X.
    #[default]
    Contact = 0,
    /// The board cipher is the active puzzle.
    DecodeBoard = 1,
    /// The player needs the anonymity tracker (and then the hidden contact).
    AcquireTracker = 2,
    /// The escape phrase is out; final submissions are live.
    FinalCode = 3,
}

/// Where the run logically is, derived from the ledger on demand so it can never
/// drift from the stored fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Contact,
    DecodeBoard,
    /// Step 2 before the hidden contact is found.
    AcquireTracker,
    /// Step 2 once the hidden contact is found; the Orion-code puzzle is live.
    FindOrion,
    FinalCode,
    /// Terminal success.
    Complete,
    /// Terminal failure; only a reset leaves this.
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }
}

/// The ledger for one run.
///
/// The tracker-ownership flag callers usually want is *computed* from inventory
/// membership ([`Self::has_anonymity_tracker`]), so it cannot disagree with the
/// inventory no matter what a transition does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    coin_balance: u32,
    inventory: BTreeSet<String>,
    completed_missions: Vec<String>,
    mission_step: MissionStep,
    discovered_orion_hint: bool,
    final_code_revealed: bool,
    escape_attempts: u8,
    completed: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            coin_balance: STARTING_COINS,
            inventory: BTreeSet::new(),
            completed_missions: Vec::new(),
            mission_step: MissionStep::Contact,
            discovered_orion_hint: false,
            final_code_revealed: false,
            escape_attempts: 0,
            completed: false,
        }
    }
}

impl Ledger {
    pub fn coin_balance(&self) -> u32 {
        self.coin_balance
    }

    /// Whether the item is in the inventory. Items never leave it.
    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.contains(item_id)
    }

    pub fn inventory(&self) -> impl Iterator<Item = &str> {
        self.inventory.iter().map(String::as_str)
    }

    pub fn has_anonymity_tracker(&self) -> bool {
        self.owns(market::ANONYMITY_TRACKER)
    }

    pub fn completed_missions(&self) -> &[String] {
        &self.completed_missions
    }

    pub fn mission_step(&self) -> MissionStep {
        self.mission_step
    }

    pub fn discovered_orion_hint(&self) -> bool {
        self.discovered_orion_hint
    }

    pub fn final_code_revealed(&self) -> bool {
        self.final_code_revealed
    }

    pub fn escape_attempts(&self) -> u8 {
        self.escape_attempts
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn stage(&self) -> Stage {
        if self.completed {
            return Stage::Complete;
        }
        if self.escape_attempts >= MAX_ESCAPE_ATTEMPTS {
            return Stage::Failed;
        }
        match self.mission_step {
            MissionStep::Contact => Stage::Contact,
            MissionStep::DecodeBoard => Stage::DecodeBoard,
            MissionStep::AcquireTracker if self.discovered_orion_hint => Stage::FindOrion,
            MissionStep::AcquireTracker => Stage::AcquireTracker,
            MissionStep::FinalCode => Stage::FinalCode,
        }
    }

    fn terminal(&self) -> bool {
        self.stage().is_terminal()
    }

    /// Move to a later step. Requests to move backwards (or sideways) are ignored,
    /// which is what makes the step monotonic no matter who calls this when.
    pub fn advance_step(&mut self, to: MissionStep) {
        if self.terminal() || to <= self.mission_step {
            return;
        }
        self.mission_step = to;
    }

    /// Append a mission to the completed list, once.
    pub fn record_mission(&mut self, id: &str) {
        if self.terminal() || self.completed_missions.iter().any(|m| m == id) {
            return;
        }
        self.completed_missions.push(id.to_owned());
    }

    /// Buy an item: deduct the price and add it to the inventory. Returns whether
    /// the purchase applied. Owned items and short funds both leave the ledger
    /// untouched.
    pub fn purchase(&mut self, item_id: &str, price: u32) -> bool {
        if self.terminal() || self.owns(item_id) || self.coin_balance < price {
            return false;
        }
        self.coin_balance -= price;
        self.inventory.insert(item_id.to_owned());
        true
    }

    /// Latch: the player found the hidden contact.
    pub fn discover_orion(&mut self) {
        if !self.terminal() {
            self.discovered_orion_hint = true;
        }
    }

    /// Latch: X sent the encoded escape phrase.
    pub fn reveal_final_code(&mut self) {
        if !self.terminal() {
            self.final_code_revealed = true;
        }
    }

    /// Count a wrong final submission. Returns the new count; the fifth is
    /// terminal and further calls don't move it.
    pub fn record_escape_attempt(&mut self) -> u8 {
        if !self.terminal() {
            self.escape_attempts += 1;
        }
        self.escape_attempts
    }

    /// Terminal latch: the run succeeded. The ledger is immutable afterwards.
    pub fn complete(&mut self) {
        if !self.terminal() {
            self.completed = true;
        }
    }
}
