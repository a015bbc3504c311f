//! Various constants, for use in various places. Gameplay pacing mostly, plus the fixed
//! address book.

/// Constants with gameplay implications.
pub mod gameplay {
    /// Dark-coin balance a fresh run starts with.
    pub const STARTING_COINS: u32 = 150;
    /// Wrong final-code submissions before the run is unrecoverable.
    pub const MAX_ESCAPE_ATTEMPTS: u8 = 5;
}

/// Relative delays for scripted events, in milliseconds.
///
/// Delays in a reaction chain are each relative to the previous link, not to the
/// triggering action.
pub mod pacing {
    /// The correspondent's usual thinking time before a reply.
    pub const REPLY_MS: u64 = 2000;
    /// How long after finding the hidden contact the hint message lands.
    pub const HINT_MS: u64 = 3000;
    /// First link of the final-reveal chain: the "analyzing" notice.
    pub const ANALYZE_MS: u64 = 1000;
    /// Second link, relative to the first: the escape-phrase reveal.
    pub const REVEAL_MS: u64 = 4000;
    /// Delay before the game-over notice once the last attempt burns.
    pub const GAME_OVER_MS: u64 = 2000;
}

/// The fixed .onion address book. Anything else is unreachable.
pub mod addresses {
    pub const WELCOME: &str = "welcome.onion";
    pub const BOARD: &str = "echoesofvoid.onion";
    pub const MARKET: &str = "cryptomart.onion";
    pub const NETWORK: &str = "whispernet.onion";
    /// The allow-list, in the order the player usually finds them.
    pub const ALL: &[&str] = &[WELCOME, BOARD, MARKET, NETWORK];
}
