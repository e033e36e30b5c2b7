//! Short record identifiers: base-36 millisecond timestamp followed by a
//! random base-36 suffix.
//!
//! Uniqueness is probabilistic. Nothing checks a new id against the ids
//! already stored.

use chrono::Utc;
use rand::{thread_rng, Rng};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const SUFFIX_LEN: usize = 6;

pub fn new_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut id = to_base36(millis);
    let mut rng = thread_rng();
    for _ in 0..SUFFIX_LEN {
        id.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    id
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_id_shape() {
        let id = new_id();
        assert!(id.len() > SUFFIX_LEN);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));

        let prefix = &id[..id.len() - SUFFIX_LEN];
        let now = to_base36(Utc::now().timestamp_millis() as u64);
        assert_eq!(prefix.len(), now.len());
    }

    #[test]
    fn test_ids_distinct_in_tight_loop() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
