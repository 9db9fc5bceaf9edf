//! Fractional order keys.
//!
//! An [`OrderKey`] is a string of base-62 digits read as a fraction in
//! `(0, 1)`: `"V"` is roughly one half, `"0V"` one 124th. Byte-wise string
//! comparison matches numeric order, so a new key can always be minted
//! between two neighbors without renumbering anything else. Generated keys
//! never end in `'0'`, which keeps room below every key.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Sortable paint-order key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(String);

impl OrderKey {
    /// Wrap a raw key, rejecting empty strings and non-base-62 characters.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| digit_value(b).is_some()) {
            return None;
        }
        Some(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key strictly between `lo` and `hi` (`None` = open end).
///
/// Returns `None` when no key fits, i.e. `lo >= hi` or `hi` is all zeros.
#[must_use]
pub fn key_between(lo: Option<&OrderKey>, hi: Option<&OrderKey>) -> Option<OrderKey> {
    let a = lo.map_or(&b""[..], |k| k.0.as_bytes());
    let b = hi.map(|k| k.0.as_bytes());
    let mid = midpoint(a, b)?;
    Some(OrderKey(mid.into_iter().map(char::from).collect()))
}

/// `n` ascending keys after `last`.
#[must_use]
pub fn keys_after(last: Option<&OrderKey>, n: usize) -> Vec<OrderKey> {
    let mut out: Vec<OrderKey> = Vec::with_capacity(n);
    let mut prev = last.cloned();
    for _ in 0..n {
        let Some(next) = key_between(prev.as_ref(), None) else {
            warn!(after = ?prev, wanted = n, got = out.len(), "no order key fits");
            break;
        };
        prev = Some(next.clone());
        out.push(next);
    }
    out
}

fn digit_value(c: u8) -> Option<usize> {
    DIGITS.iter().position(|&d| d == c)
}

/// Midpoint of two digit strings read as fractions, `b = None` meaning 1.
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Option<Vec<u8>> {
    if let Some(b) = b {
        // Strip the common prefix, padding `a` with zeros.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(b'0') == b[n] {
            n += 1;
        }
        if n == b.len() {
            return None;
        }
        if n > 0 {
            let rest = a.get(n..).unwrap_or(&[]);
            let mut out = b[..n].to_vec();
            out.extend(midpoint(rest, Some(&b[n..]))?);
            return Some(out);
        }
    }

    let digit_a = match a.first() {
        Some(&c) => digit_value(c)?,
        None => 0,
    };
    let digit_b = match b {
        Some(b) => digit_value(*b.first()?)?,
        None => DIGITS.len(),
    };
    if digit_b <= digit_a {
        return None;
    }
    if digit_b - digit_a > 1 {
        return Some(vec![DIGITS[(digit_a + digit_b).div_ceil(2)]]);
    }
    // First digits are consecutive.
    if let Some(b) = b {
        if b.len() > 1 {
            return Some(vec![b[0]]);
        }
    }
    let mut out = vec![DIGITS[digit_a]];
    out.extend(midpoint(a.get(1..).unwrap_or(&[]), None)?);
    Some(out)
}
