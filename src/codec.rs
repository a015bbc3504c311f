//! Free-text answer checking, and display-only decoding of encoded payloads.
//!
//! None of this is cryptography. Puzzle answers are string matches, and the two
//! matching policies are deliberate pacing: the early puzzles accept any guess that
//! *contains* an accepted answer, while the final escape code has to match exactly
//! (ignoring case and whitespace). [`decode_for_display`] backs the "decrypted view"
//! toggle and nothing else -- a payload that doesn't actually decode is shown as-is
//! rather than erroring, because nothing gates on it.

/// How [`matches_any`] compares a guess against an accepted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The normalized guess merely has to contain an accepted answer. Used for
    /// hint-style puzzles.
    Contains,
    /// The guess has to equal an accepted answer once all whitespace is stripped.
    /// Used for the escape code.
    Exact,
}

/// Payload encodings the decoded-view toggle understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// Space-separated 8-bit binary ASCII.
    Binary8,
    /// Standard-alphabet Base64.
    Base64,
}

/// Lowercase and trim.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// [`normalize`], then strip internal whitespace too.
pub fn squash(input: &str) -> String {
    normalize(input).split_whitespace().collect()
}

/// Whether the guess matches any accepted answer under the given policy.
pub fn matches_any(guess: &str, accepted: &[&str], policy: MatchPolicy) -> bool {
    match policy {
        MatchPolicy::Contains => {
            let guess = normalize(guess);
            accepted.iter().any(|a| guess.contains(&normalize(a)))
        }
        MatchPolicy::Exact => {
            let guess = squash(guess);
            accepted.iter().any(|a| guess == squash(a))
        }
    }
}

/// Render the decoded view of an encoded payload.
///
/// Pure, and total: malformed payloads come back unchanged.
pub fn decode_for_display(payload: &str, scheme: Scheme) -> String {
    let decoded = match scheme {
        Scheme::Binary8 => decode_binary8(payload),
        Scheme::Base64 => decode_base64(payload),
    };
    decoded.unwrap_or_else(|| payload.to_owned())
}

fn decode_binary8(payload: &str) -> Option<String> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::new();
    for chunk in trimmed.split_whitespace() {
        if chunk.len() != 8 {
            return None;
        }
        let byte = u8::from_str_radix(chunk, 2).ok()?;
        out.push(byte as char);
    }
    Some(out)
}

fn sextet(b: u8) -> Option<u32> {
    match b {
        b'A'..=b'Z' => Some((b - b'A') as u32),
        b'a'..=b'z' => Some((b - b'a') as u32 + 26),
        b'0'..=b'9' => Some((b - b'0') as u32 + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

fn decode_base64(payload: &str) -> Option<String> {
    let trimmed = payload.trim().as_bytes();
    if trimmed.is_empty() || trimmed.len() % 4 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(trimmed.len() / 4 * 3);
    let quads = trimmed.chunks(4);
    let last = trimmed.len() / 4 - 1;
    for (i, quad) in quads.enumerate() {
        let pad = quad.iter().filter(|&&b| b == b'=').count();
        // padding only makes sense at the very end
        if pad > 2 || (pad > 0 && i != last) {
            return None;
        }
        let mut acc = 0u32;
        for (j, &b) in quad.iter().enumerate() {
            let v = if b == b'=' {
                if j < 4 - pad {
                    return None;
                }
                0
            } else {
                sextet(b)?
            };
            acc = (acc << 6) | v;
        }
        bytes.push((acc >> 16) as u8);
        if pad < 2 {
            bytes.push((acc >> 8) as u8);
        }
        if pad < 1 {
            bytes.push(acc as u8);
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowers_and_trims() {
        assert_eq!(normalize("  Orion 781  "), "orion 781");
    }

    #[test]
    fn squash_strips_internal_whitespace() {
        assert_eq!(squash("  DIGITAL \t ESCAPE "), "digitalescape");
        assert_eq!(squash("digital_escape"), "digital_escape");
    }

    #[test]
    fn contains_policy_accepts_partial_answers() {
        let accepted = &["cryptomart.onion", "anonymity tool", "trackers"];
        assert!(matches_any(
            "I think it says to find the Anonymity Tool",
            accepted,
            MatchPolicy::Contains
        ));
        assert!(matches_any("CRYPTOMART.ONION", accepted, MatchPolicy::Contains));
        assert!(!matches_any("no idea", accepted, MatchPolicy::Contains));
    }

    #[test]
    fn exact_policy_ignores_case_and_whitespace_only() {
        let accepted = &["digitalescape", "digital_escape"];
        assert!(matches_any("Digital Escape", accepted, MatchPolicy::Exact));
        assert!(matches_any("DIGITALESCAPE", accepted, MatchPolicy::Exact));
        assert!(matches_any("digital_escape", accepted, MatchPolicy::Exact));
        assert!(!matches_any("digital escapes", accepted, MatchPolicy::Exact));
        assert!(!matches_any("the digital escape", accepted, MatchPolicy::Exact));
    }

    #[test]
    fn binary8_decodes_ascii() {
        let payload = "01001000 01100101 01101100 01110000 00100000 01101101 01100101";
        assert_eq!(decode_for_display(payload, Scheme::Binary8), "Help me");
    }

    #[test]
    fn binary8_malformed_is_untouched() {
        assert_eq!(decode_for_display("0100100", Scheme::Binary8), "0100100");
        assert_eq!(
            decode_for_display("01001000 xyz", Scheme::Binary8),
            "01001000 xyz"
        );
        assert_eq!(decode_for_display("", Scheme::Binary8), "");
    }

    #[test]
    fn base64_decodes_ascii() {
        assert_eq!(decode_for_display("aGk=", Scheme::Base64), "hi");
        assert_eq!(decode_for_display("SGVsbG8=", Scheme::Base64), "Hello");
        assert_eq!(
            decode_for_display("VGhleSBhcmUgY29taW5n", Scheme::Base64),
            "They are coming"
        );
    }

    #[test]
    fn base64_malformed_is_untouched() {
        assert_eq!(decode_for_display("not base64!", Scheme::Base64), "not base64!");
        assert_eq!(decode_for_display("abc", Scheme::Base64), "abc");
        assert_eq!(decode_for_display("aG=k", Scheme::Base64), "aG=k");
        assert_eq!(decode_for_display("aGk=aGk=", Scheme::Base64), "aGk=aGk=");
    }
}
