//! The mission graph: what each player action does to the run, and which scripted
//! events it queues up.
//!
//! Every entry point takes the ledger and returns a [`Reaction`]: the outcome the
//! caller reports, plus zero or more `(delay, Event)` links for the sequencer.
//! Immediate ledger changes happen right here, before the caller schedules
//! anything, so a transition's own mutation is always visible before any of its
//! events fire. Deferred changes ride along as [`Event::apply`] bundles and run
//! against whatever the ledger is at fire time.
//!
//! Reaction events are a *chain*: each delay is relative to the previous link, and
//! a zero delay rides along with the link before it.

use std::time::Duration;

use crate::codec::{self, MatchPolicy};
use crate::constants::{addresses, gameplay, pacing};
use crate::event::{Event, Severity};
use crate::market;
use crate::state::{Ledger, MissionStep, Stage};
use crate::story::{self, lines, objectives};

/// What a player action amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The action landed and moved (or will move) the story along.
    Accepted,
    /// Nothing at the current stage reacts to this input.
    Ignored,
    /// A guard said no: short funds, or the network gate.
    Blocked,
    /// The input itself was off: unknown address, unknown item, wrong answer.
    Invalid,
    /// The escape phrase matched. The run is over, successfully.
    Escaped,
    /// The fifth wrong code burned. The run is over.
    GameOver,
    /// The run already ended; only a reset does anything now.
    Terminal,
}

/// An outcome plus the scripted events it queues.
#[derive(Debug)]
pub struct Reaction {
    pub outcome: Outcome,
    /// Chain links for [`Sequencer::schedule_chain`][crate::sequencer::Sequencer].
    pub events: Vec<(Duration, Event)>,
}

impl Reaction {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            events: Vec::new(),
        }
    }

    fn then(mut self, delay_ms: u64, event: Event) -> Self {
        self.events.push((Duration::from_millis(delay_ms), event));
        self
    }
}

/// A chat message typed into the comms panel.
pub fn on_player_message(ledger: &mut Ledger, text: &str) -> Reaction {
    match ledger.stage() {
        Stage::Complete | Stage::Failed => Reaction::new(Outcome::Terminal),
        Stage::Contact
            if codec::matches_any(text, story::HELP_KEYWORDS, MatchPolicy::Contains) =>
        {
            // X takes a moment, then answers with the board job. The step advance
            // rides the reply, so progress lands when the reply does.
            Reaction::new(Outcome::Accepted)
                .then(
                    pacing::REPLY_MS,
                    Event::correspondent(lines::BOARD_TIP_RAW, lines::BOARD_TIP),
                )
                .then(0, Event::objective(objectives::DECODE_BOARD))
                .then(
                    0,
                    Event::apply(|ledger: &mut Ledger| {
                        ledger.advance_step(MissionStep::DecodeBoard);
                    }),
                )
        }
        Stage::FindOrion => orion_message(text),
        Stage::FinalCode => final_submission(ledger, text),
        _ => Reaction::new(Outcome::Ignored),
    }
}

/// A message aimed at User_Orion. Case-insensitive, and "orion781" is as good as
/// "orion 781" -- looser than the final code on purpose.
fn orion_message(text: &str) -> Reaction {
    let squashed = codec::squash(text);
    let code = format!("{}{}", story::ORION_TOKEN, story::ORION_FRAGMENT);
    if squashed.contains(&code) {
        // The data-packet chain: the analyzing notice, then the reveal. The
        // reveal's bookkeeping rides the reveal itself.
        Reaction::new(Outcome::Accepted)
            .then(
                pacing::ANALYZE_MS,
                Event::notice(Severity::Info, "INCOMING DATA PACKET. ANALYZING..."),
            )
            .then(
                pacing::REVEAL_MS,
                Event::correspondent(lines::FINAL_CODE_RAW, lines::FINAL_CODE_DECODED),
            )
            .then(0, Event::objective(objectives::FINAL_CODE))
            .then(
                0,
                Event::apply(|ledger: &mut Ledger| {
                    ledger.record_mission(story::MISSION_ORION);
                    ledger.reveal_final_code();
                    ledger.advance_step(MissionStep::FinalCode);
                }),
            )
    } else if codec::normalize(text).contains(story::ORION_TOKEN) {
        Reaction::new(Outcome::Invalid)
            .then(
                pacing::REPLY_MS,
                Event::notice(Severity::Warning, "MESSAGE FAILED: RECIPIENT NOT FOUND"),
            )
            .then(
                0,
                Event::correspondent(lines::ORION_HINT_RAW, lines::ORION_HINT),
            )
    } else {
        Reaction::new(Outcome::Ignored)
    }
}

/// A submission against the revealed escape phrase. Exact match only.
fn final_submission(ledger: &mut Ledger, text: &str) -> Reaction {
    if codec::matches_any(text, story::ESCAPE_PHRASES, MatchPolicy::Exact) {
        ledger.complete();
        return Reaction::new(Outcome::Escaped);
    }
    let attempts = ledger.record_escape_attempt();
    let warning = story::ESCAPE_WARNINGS[attempts as usize - 1];
    let text = format!(
        "{} INCORRECT ESCAPE CODE ({}/{})",
        warning,
        attempts,
        gameplay::MAX_ESCAPE_ATTEMPTS
    );
    if attempts >= gameplay::MAX_ESCAPE_ATTEMPTS {
        // The last strike. The session cancels everything pending before this
        // reaction's own notices go out.
        Reaction::new(Outcome::GameOver)
            .then(0, Event::notice(Severity::Critical, text))
            .then(
                pacing::GAME_OVER_MS,
                Event::notice(
                    Severity::Critical,
                    "GAME OVER: SYSTEM COMPROMISED. The trackers found you.",
                ),
            )
    } else {
        Reaction::new(Outcome::Invalid).then(0, Event::notice(Severity::Critical, text))
    }
}

/// A decode guess submitted against the board's mission post.
pub fn on_decode_attempt(ledger: &mut Ledger, guess: &str) -> Reaction {
    match ledger.stage() {
        Stage::Complete | Stage::Failed => Reaction::new(Outcome::Terminal),
        Stage::DecodeBoard
            if codec::matches_any(guess, story::BOARD_ANSWERS, MatchPolicy::Contains) =>
        {
            ledger.record_mission(story::MISSION_BOARD);
            ledger.advance_step(MissionStep::AcquireTracker);
            Reaction::new(Outcome::Accepted)
                .then(
                    0,
                    Event::notice(Severity::Info, "DECRYPTION SUCCESSFUL: MESSAGE DECODED"),
                )
                .then(
                    0,
                    Event::correspondent(lines::MARKET_TIP_RAW, lines::MARKET_TIP),
                )
                .then(0, Event::objective(objectives::BUY_TRACKER))
        }
        Stage::DecodeBoard => Reaction::new(Outcome::Invalid).then(
            0,
            Event::notice(Severity::Warning, "CONNECTION UNSTABLE: RECALIBRATING..."),
        ),
        _ => Reaction::new(Outcome::Ignored),
    }
}

/// A purchase request from the market screen.
pub fn on_purchase(ledger: &mut Ledger, item_id: &str) -> Reaction {
    if ledger.stage().is_terminal() {
        return Reaction::new(Outcome::Terminal);
    }
    let item = match market::find(item_id) {
        Some(item) => item,
        None => return Reaction::new(Outcome::Invalid),
    };
    if ledger.owns(item.id) {
        // Already bought: nothing happens and nothing is charged.
        return Reaction::new(Outcome::Ignored);
    }
    if !ledger.purchase(item.id, item.price) {
        return Reaction::new(Outcome::Blocked).then(
            0,
            Event::notice(Severity::Warning, "INSUFFICIENT DARK COINS"),
        );
    }
    if item.id == market::ANONYMITY_TRACKER {
        Reaction::new(Outcome::Accepted)
            .then(
                0,
                Event::notice(
                    Severity::Info,
                    "IP MASKING ACTIVATED: ANONYMITY LEVEL MAXIMUM",
                ),
            )
            .then(
                pacing::REPLY_MS,
                Event::correspondent(lines::NETWORK_TIP_RAW, lines::NETWORK_TIP),
            )
            .then(0, Event::objective(objectives::FIND_ORION))
    } else {
        Reaction::new(Outcome::Accepted).then(
            0,
            Event::notice(Severity::Info, format!("PURCHASED: {}", item.name)),
        )
    }
}

/// A request to open an address. Navigation never advances the mission by itself;
/// at most it gets blocked or mocked.
pub fn on_navigate(ledger: &Ledger, address: &str) -> Reaction {
    if ledger.stage().is_terminal() {
        return Reaction::new(Outcome::Terminal);
    }
    let addr = codec::normalize(address);
    if !addresses::ALL.contains(&addr.as_str()) {
        // an unknown address is a lesser scare than the anonymity gate
        return Reaction::new(Outcome::Invalid).then(
            0,
            Event::notice(Severity::Warning, "CONNECTION REFUSED: ADDRESS UNREACHABLE"),
        );
    }
    if addr == addresses::NETWORK && !ledger.has_anonymity_tracker() {
        return Reaction::new(Outcome::Blocked)
            .then(
                0,
                Event::notice(
                    Severity::Critical,
                    "WARNING: YOUR ANONYMITY IS COMPROMISED. TRACKERS DETECTED YOUR LOCATION",
                ),
            )
            .then(
                pacing::REPLY_MS,
                Event::correspondent(lines::GATE_WARNING_RAW, lines::GATE_WARNING),
            );
    }
    Reaction::new(Outcome::Accepted)
}

/// The player clicked into User_Orion's node on the hidden network.
pub fn on_contact_discovery(ledger: &mut Ledger) -> Reaction {
    if ledger.stage().is_terminal() {
        return Reaction::new(Outcome::Terminal);
    }
    if ledger.stage() != Stage::AcquireTracker || !ledger.has_anonymity_tracker() {
        return Reaction::new(Outcome::Ignored);
    }
    ledger.discover_orion();
    Reaction::new(Outcome::Accepted)
        .then(
            0,
            Event::notice(
                Severity::Info,
                format!(
                    "DISCOVERY: {} found. Fragment code: {}",
                    story::ORION,
                    story::ORION_FRAGMENT
                ),
            ),
        )
        .then(0, Event::objective(objectives::MESSAGE_ORION))
        .then(
            pacing::HINT_MS,
            Event::correspondent(lines::ORION_HINT_RAW, lines::ORION_HINT),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_step(step: MissionStep) -> Ledger {
        let mut ledger = Ledger::default();
        ledger.advance_step(step);
        ledger
    }

    fn orion_hunt() -> Ledger {
        let mut ledger = at_step(MissionStep::AcquireTracker);
        ledger.purchase(market::ANONYMITY_TRACKER, 80);
        ledger.discover_orion();
        ledger
    }

    fn at_final() -> Ledger {
        let mut ledger = at_step(MissionStep::FinalCode);
        ledger.reveal_final_code();
        ledger
    }

    fn correspondent_count(reaction: &Reaction) -> usize {
        reaction
            .events
            .iter()
            .filter(|(_, e)| matches!(e, Event::Correspondent { .. }))
            .count()
    }

    #[test]
    fn help_keyword_queues_the_board_reply() {
        let mut ledger = Ledger::default();
        let reaction = on_player_message(&mut ledger, "I need help getting out");
        assert_eq!(reaction.outcome, Outcome::Accepted);
        assert_eq!(correspondent_count(&reaction), 1);
        // the step only advances when the reply fires
        assert_eq!(ledger.mission_step(), MissionStep::Contact);
    }

    #[test]
    fn small_talk_is_ignored_at_contact() {
        let mut ledger = Ledger::default();
        let reaction = on_player_message(&mut ledger, "hello?");
        assert_eq!(reaction.outcome, Outcome::Ignored);
        assert!(reaction.events.is_empty());
    }

    #[test]
    fn board_answer_advances_to_the_market() {
        let mut ledger = at_step(MissionStep::DecodeBoard);
        let reaction = on_decode_attempt(&mut ledger, "find the ANONYMITY TOOL");
        assert_eq!(reaction.outcome, Outcome::Accepted);
        assert_eq!(ledger.mission_step(), MissionStep::AcquireTracker);
        assert_eq!(ledger.completed_missions(), ["mission1".to_owned()]);
    }

    #[test]
    fn wrong_board_answer_changes_nothing() {
        let mut ledger = at_step(MissionStep::DecodeBoard);
        let reaction = on_decode_attempt(&mut ledger, "it says hello world");
        assert_eq!(reaction.outcome, Outcome::Invalid);
        assert_eq!(ledger.mission_step(), MissionStep::DecodeBoard);
        assert!(ledger.completed_missions().is_empty());
    }

    #[test]
    fn decode_is_ignored_off_stage() {
        let mut ledger = Ledger::default();
        let reaction = on_decode_attempt(&mut ledger, "cryptomart.onion");
        assert_eq!(reaction.outcome, Outcome::Ignored);
        assert!(reaction.events.is_empty());
    }

    #[test]
    fn orion_code_with_and_without_separator() {
        for guess in ["orion 781", "orion781", "ORION   781", "to Orion781, hello"] {
            let reaction = orion_message(guess);
            assert_eq!(reaction.outcome, Outcome::Accepted, "guess: {:?}", guess);
        }
    }

    #[test]
    fn orion_with_wrong_code_gets_the_hint_again() {
        let reaction = orion_message("orion 871");
        assert_eq!(reaction.outcome, Outcome::Invalid);
        assert_eq!(correspondent_count(&reaction), 1);
    }

    #[test]
    fn message_without_orion_is_ignored_on_the_hunt() {
        let mut ledger = orion_hunt();
        let reaction = on_player_message(&mut ledger, "anyone out there?");
        assert_eq!(reaction.outcome, Outcome::Ignored);
    }

    #[test]
    fn final_phrase_completes_in_any_casing() {
        for phrase in ["Digital Escape", "digital_escape", "DIGITALESCAPE", "digital  escape"] {
            let mut ledger = at_final();
            let reaction = on_player_message(&mut ledger, phrase);
            assert_eq!(reaction.outcome, Outcome::Escaped, "phrase: {:?}", phrase);
            assert!(ledger.completed());
            assert!(reaction.events.is_empty());
        }
    }

    #[test]
    fn wrong_final_submission_escalates() {
        let mut ledger = at_final();
        for attempt in 1..=4u8 {
            let reaction = on_player_message(&mut ledger, "digital escap");
            assert_eq!(reaction.outcome, Outcome::Invalid);
            assert_eq!(ledger.escape_attempts(), attempt);
            match &reaction.events[0].1 {
                Event::Notice { severity, text } => {
                    assert_eq!(*severity, Severity::Critical);
                    assert!(
                        text.starts_with(story::ESCAPE_WARNINGS[attempt as usize - 1]),
                        "attempt {}: {:?}",
                        attempt,
                        text
                    );
                }
                other => panic!("expected a notice, got {:?}", other),
            }
        }
    }

    #[test]
    fn fifth_wrong_submission_is_game_over() {
        let mut ledger = at_final();
        for _ in 0..4 {
            on_player_message(&mut ledger, "wrong digital");
        }
        let reaction = on_player_message(&mut ledger, "wrong digital");
        assert_eq!(reaction.outcome, Outcome::GameOver);
        assert_eq!(ledger.escape_attempts(), 5);
        assert_eq!(ledger.stage(), Stage::Failed);
        // nothing after that is accepted
        let after = on_player_message(&mut ledger, "DIGITAL ESCAPE");
        assert_eq!(after.outcome, Outcome::Terminal);
        assert!(!ledger.completed());
    }

    #[test]
    fn tracker_purchase_unlocks_the_network_thread() {
        let mut ledger = at_step(MissionStep::AcquireTracker);
        let reaction = on_purchase(&mut ledger, market::ANONYMITY_TRACKER);
        assert_eq!(reaction.outcome, Outcome::Accepted);
        assert_eq!(ledger.coin_balance(), 70);
        assert!(ledger.has_anonymity_tracker());
        assert_eq!(correspondent_count(&reaction), 1);
    }

    #[test]
    fn purchase_guards() {
        let mut ledger = Ledger::default();
        assert_eq!(
            on_purchase(&mut ledger, "warp_drive").outcome,
            Outcome::Invalid
        );
        assert_eq!(
            on_purchase(&mut ledger, market::FAKE_PASSPORT).outcome,
            Outcome::Accepted
        );
        // 30 coins left: can't afford the tracker now
        assert_eq!(
            on_purchase(&mut ledger, market::ANONYMITY_TRACKER).outcome,
            Outcome::Blocked
        );
        assert_eq!(ledger.coin_balance(), 30);
        // owned items re-buy as a no-op
        assert_eq!(
            on_purchase(&mut ledger, market::FAKE_PASSPORT).outcome,
            Outcome::Ignored
        );
        assert_eq!(ledger.coin_balance(), 30);
    }

    #[test]
    fn network_is_gated_until_the_tracker() {
        let mut ledger = at_step(MissionStep::AcquireTracker);
        let blocked = on_navigate(&ledger, addresses::NETWORK);
        assert_eq!(blocked.outcome, Outcome::Blocked);
        assert_eq!(ledger.mission_step(), MissionStep::AcquireTracker);

        ledger.purchase(market::ANONYMITY_TRACKER, 80);
        let open = on_navigate(&ledger, addresses::NETWORK);
        assert_eq!(open.outcome, Outcome::Accepted);
        assert!(open.events.is_empty());
    }

    #[test]
    fn unknown_address_warns_more_quietly_than_the_gate() {
        let ledger = at_step(MissionStep::AcquireTracker);
        let invalid = on_navigate(&ledger, "definitely-not-real.onion");
        assert_eq!(invalid.outcome, Outcome::Invalid);
        let gate = on_navigate(&ledger, addresses::NETWORK);
        let sev = |r: &Reaction| match &r.events[0].1 {
            Event::Notice { severity, .. } => *severity,
            other => panic!("expected a notice, got {:?}", other),
        };
        assert!(sev(&invalid) < sev(&gate));
    }

    #[test]
    fn address_matching_is_case_insensitive() {
        let ledger = Ledger::default();
        assert_eq!(
            on_navigate(&ledger, "  WELCOME.ONION ").outcome,
            Outcome::Accepted
        );
    }

    #[test]
    fn discovery_needs_the_tracker_and_happens_once() {
        let mut ledger = at_step(MissionStep::AcquireTracker);
        assert_eq!(on_contact_discovery(&mut ledger).outcome, Outcome::Ignored);
        assert!(!ledger.discovered_orion_hint());

        ledger.purchase(market::ANONYMITY_TRACKER, 80);
        assert_eq!(on_contact_discovery(&mut ledger).outcome, Outcome::Accepted);
        assert!(ledger.discovered_orion_hint());
        assert_eq!(ledger.stage(), Stage::FindOrion);

        assert_eq!(on_contact_discovery(&mut ledger).outcome, Outcome::Ignored);
    }

    #[test]
    fn everything_rejects_after_completion() {
        let mut ledger = at_final();
        on_player_message(&mut ledger, "digital escape");
        assert!(ledger.completed());
        assert_eq!(
            on_decode_attempt(&mut ledger, "trackers").outcome,
            Outcome::Terminal
        );
        assert_eq!(
            on_purchase(&mut ledger, market::DIGITAL_ID).outcome,
            Outcome::Terminal
        );
        assert_eq!(
            on_navigate(&ledger, addresses::WELCOME).outcome,
            Outcome::Terminal
        );
        assert_eq!(on_contact_discovery(&mut ledger).outcome, Outcome::Terminal);
    }
}
