//! The scripted side of the run: X's lines, the chaos-board posts, the whispernet
//! roster, the puzzle answer sets, and the objective text per stage.
//!
//! The mission logic keys off a few anchors in here (answer sets, mission ids); the
//! rest is static content for the presentation to render. X's traffic is fictional
//! cipher, so those lines carry their readable form alongside the wire form; board
//! and network payloads use real encodings and decode through [`crate::codec`].

use crate::codec::{self, Scheme};
use crate::state::{Ledger, MissionStep};

/// The correspondent's handle.
pub const CORRESPONDENT: &str = "X";
/// The hidden contact the player has to reach.
pub const ORION: &str = "User_Orion";
/// The name token the Orion-code puzzle looks for.
pub const ORION_TOKEN: &str = "orion";
/// The partial code Orion's trail reveals.
pub const ORION_FRAGMENT: &str = "781";

/// Mission ids recorded on the ledger, in the order they can complete.
pub const MISSION_BOARD: &str = "mission1";
pub const MISSION_ORION: &str = "mission3";

/// Phrases that count as reaching out for help in the first exchange.
pub const HELP_KEYWORDS: &[&str] = &["help"];
/// Answers the board cipher accepts. Any guess containing one will do.
pub const BOARD_ANSWERS: &[&str] = &["cryptomart.onion", "anonymity tool", "trackers"];
/// Spellings of the escape phrase, compared exactly (whitespace-insensitive).
pub const ESCAPE_PHRASES: &[&str] = &["digitalescape", "digital_escape"];

/// Escalating warning lines for wrong final submissions, indexed by attempt.
/// The fifth one is terminal.
pub const ESCAPE_WARNINGS: [&str; 5] = [
    "SYSTEM LOCKDOWN INITIATED!",
    "TRACE INTENSIFYING!",
    "FINAL WARNING: DO NOT PROCEED!",
    "EMERGENCY PROTOCOLS ACTIVATED!",
    "COMPLETE SYSTEM SHUTDOWN IMMINENT!",
];

/// The mission-panel line for each point in the run.
pub mod objectives {
    pub const CONTACT: &str = "Make contact with 'X'";
    pub const DECODE_BOARD: &str = "Decode the encrypted message on echoesofvoid.onion";
    pub const BUY_TRACKER: &str = "Buy the 'Anonymity Tracker' on cryptomart.onion";
    pub const FIND_ORION: &str = "Find User_Orion on whispernet.onion";
    pub const MESSAGE_ORION: &str = "Send User_Orion their access code";
    pub const FINAL_CODE: &str = "Decode the final message and send the escape code";
    pub const ESCAPED: &str = "You are out. Stay gone.";
    pub const TRACED: &str = "Run terminated. The trackers won.";
}

/// X's scripted lines: the garbled over-the-wire form, and what it reads as once
/// decrypted. The cipher is set dressing; the readable form is authoritative.
pub mod lines {
    pub const OPENING_RAW: &str = "nfbdpcp lfbsbg wdcj jygtjjc pfk drrthcrs. jxefiym qyrd \
                                   wgeg wy lfbakyz. ccmf jxc gqgfi xybz gqg.";
    pub const OPENING: &str = "Someone has flagged your connection. You need to get out of \
                               here, fast. I can help you.";

    pub const BOARD_TIP_RAW: &str = "rqxfrjsyeqzk.ynzyn lfbsbgpf jxrfzrg crjjrfl wy xrqyk. \
                                     lqyl lfbakyz wy nyzqf 'cqgqxrqj'rf brqr zyqmrczs zj \
                                     jjfbzj.";
    pub const BOARD_TIP: &str = "Decode the hidden message on the echoesofvoid.onion board. \
                                 There's information there about the trackers hunting you.";

    pub const MARKET_TIP_RAW: &str = "cqgqxrqj wy ccmfqymmqg. qjzecymrqc.ynzyn rjrq lqzmy \
                                      jqzmy xf zyqm wy cqgr jqgr jjfbzj.";
    pub const MARKET_TIP: &str = "Shake the trackers. cryptomart.onion sells a tool that \
                                  makes shadows disappear. Only the anonymity tracker can \
                                  protect you.";

    pub const NETWORK_TIP_RAW: &str = "cqgqxrqj wy ccmfqymmqg. wzjbrqnrc.ynzyn rjrq cqgr \
                                       zyqm wy xrqykxgeg xgeg.";
    pub const NETWORK_TIP: &str = "The trackers have backed off, for now. You'll find what \
                                   you need next on whispernet.onion.";

    pub const GATE_WARNING_RAW: &str = "qgqgfi wy gqgfi cqgqxrqjrf. jjfbzj 'ccmfqymmqg \
                                        jqgmrqj'wy xrqykxgeg xgeg.";
    pub const GATE_WARNING: &str = "You're still exposed to the trackers. Secure the \
                                    'Anonymity Tracker' first.";

    pub const ORION_HINT_RAW: &str = "yzqfyn zj lqzmy xybz gqg. mqyr 781rf jxrfzrg.";
    pub const ORION_HINT: &str = "The code Orion is waiting for is 781.";

    pub const FINAL_CODE_RAW: &str =
        "MDEwMDEwMDEgMDExMDEwMDEgMDExMDExMTAgMDExMDAwMDEgMDEwMTAwMDAgMDExMDEwMDEgMDEwMDAwMD\
         AgMDExMDEwMDEgMDExMDEwMDEgMDExMDAwMDEgMDExMDAxMDAgMDExMDEwMDEgMDEwMDAwMDA=";
    pub const FINAL_CODE_DECODED: &str = "DIGITAL ESCAPE";
}

/// One post on the chaos board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Post {
    pub author: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    /// How the body is encoded, if it is.
    pub scheme: Option<Scheme>,
    /// Readable form, when decoding the body wouldn't produce one.
    pub decoded: Option<&'static str>,
    /// Only surfaces once the run has reached this step.
    pub hidden_until: Option<MissionStep>,
    /// Whether decode attempts against this post drive the board mission.
    pub mission_gate: bool,
}

/// One roster entry on whispernet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub username: &'static str,
    pub last_seen: &'static str,
    pub status: NodeStatus,
    pub payload: &'static str,
    pub scheme: Option<Scheme>,
    pub decoded: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Active,
    Idle,
    Hidden,
    Offline,
}

impl Post {
    /// The body as the decoded-view toggle shows it.
    pub fn decoded_view(&self) -> String {
        decoded_view(self.body, self.scheme, self.decoded)
    }
}

impl Node {
    /// The payload as the decoded-view toggle shows it.
    pub fn decoded_view(&self) -> String {
        decoded_view(self.payload, self.scheme, self.decoded)
    }
}

fn decoded_view(
    body: &str,
    scheme: Option<Scheme>,
    decoded: Option<&'static str>,
) -> String {
    if let Some(text) = decoded {
        return text.to_owned();
    }
    match scheme {
        Some(scheme) => codec::decode_for_display(body, scheme),
        None => body.to_owned(),
    }
}

/// The chaos board, newest first.
pub static BOARD_POSTS: &[Post] = &[
    Post {
        author: "Anonymous_7743",
        title: "New tracing method in the wild",
        body: "01001000 01100101 01101100 01110000 00100000 01101101 01100101",
        scheme: Some(Scheme::Binary8),
        decoded: None,
        hidden_until: None,
        mission_gate: false,
    },
    Post {
        author: "DeepVoid_User",
        title: "URGENT: intrusion detected",
        body: "VGhleSBhcmUgY29taW5nLiBUaGUgdHJhY2tlcnMgaGF2ZSBmb3VuZCBhIG5ldyB3YXkgdG8gdHJhY2sgdXMuIEZpbmQgdGhlIGFub255bWl0eSB0b29sIGF0IGNyeXB0b21hcnQub25pb24=",
        scheme: Some(Scheme::Base64),
        decoded: None,
        hidden_until: None,
        mission_gate: true,
    },
    Post {
        author: "GhostInShell",
        title: "Cipher protocol update",
        body: "We need a new encryption scheme. The old ways aren't safe anymore.",
        scheme: None,
        decoded: None,
        hidden_until: None,
        mission_gate: false,
    },
    Post {
        author: "User_Orion",
        title: "Connection test",
        body: "01001001 01100110 00100000 01111001 01101111 01110101 00100000 01100011 01100001 01101110 00100000 01110010 01100101 01100001 01100100 00100000 01110100 01101000 01101001 01110011 00101100 00100000 01110011 01100101 01101110 01100100 00100000 01101101 01100101 00100000 01100001 00100000 01101101 01100101 01110011 01110011 01100001 01100111 01100101",
        scheme: Some(Scheme::Binary8),
        decoded: None,
        hidden_until: Some(MissionStep::AcquireTracker),
        mission_gate: false,
    },
];

/// The whispernet roster, most recently seen first.
pub static NETWORK_NODES: &[Node] = &[
    Node {
        username: "ShadowRunner_42",
        last_seen: "2 minutes ago",
        status: NodeStatus::Active,
        payload: "01010100 01101000 01100101 01111001 00100000 01100001 01110010 01100101 00100000 01110111 01100001 01110100 01100011 01101000 01101001 01101110 01100111",
        scheme: Some(Scheme::Binary8),
        decoded: None,
    },
    Node {
        username: "VoidWalker",
        last_seen: "15 minutes ago",
        status: NodeStatus::Idle,
        payload: "Connection unstable. Moving to backup channels.",
        scheme: None,
        decoded: None,
    },
    Node {
        username: "User_Orion",
        last_seen: "1 hour ago",
        status: NodeStatus::Hidden,
        payload: "MDEwMTAwMDEgMDExMDEwMDEgMDExMDEwMDEgMDExMDAwMDEgMDEwMTAwMDAgMDExMDEwMDEgMDEwMDAwMDA=",
        scheme: Some(Scheme::Base64),
        decoded: Some("DIGITAL ESCAPE - Fragment: 781"),
    },
    Node {
        username: "GhostProtocol",
        last_seen: "3 hours ago",
        status: NodeStatus::Offline,
        payload: "Network compromised. Initiating emergency protocols.",
        scheme: None,
        decoded: None,
    },
    Node {
        username: "DataPhantom",
        last_seen: "5 hours ago",
        status: NodeStatus::Active,
        payload: "01000110 01101001 01101110 01100001 01101100 00100000 01110000 01101000 01100001 01110011 01100101 00100000 01100001 01110000 01110000 01110010 01101111 01100001 01100011 01101000 01101001 01101110 01100111",
        scheme: Some(Scheme::Binary8),
        decoded: None,
    },
];

/// The posts a given run can currently see.
pub fn visible_posts(ledger: &Ledger) -> impl Iterator<Item = &'static Post> {
    let step = ledger.mission_step();
    BOARD_POSTS
        .iter()
        .filter(move |post| post.hidden_until.map_or(true, |s| step >= s))
}
