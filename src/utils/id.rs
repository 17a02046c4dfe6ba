//! Node id generation.
//!
//! Ids are `node_`-prefixed random base-36 tokens. Nine symbols over a
//! 36-character alphabet carry ~46 bits of entropy, keeping collision odds
//! negligible for an editing session of thousands of nodes.

use rand::RngExt;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 9;

/// Returns a fresh node id, e.g. `node_k3f9x0q2z`.
#[must_use]
pub fn fresh_node_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity("node_".len() + TOKEN_LEN);
    id.push_str("node_");
    for _ in 0..TOKEN_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        id.push(ALPHABET[idx] as char);
    }
    id
}
