//! Target number validation and canonicalization.
//!
//! Raw operator input is normalized into a canonical `+989XXXXXXXXX` MSISDN
//! before a run starts. Validation is strict: after stripping whitespace,
//! the input must match one of four prefix shapes over the same ten-digit
//! mobile subscriber number.
//!
//! ## Rules
//!
//! 1. All Unicode whitespace is removed (`"0912 345 6789"` is fine).
//! 2. An optional `+98`, `98`, or `0` prefix is dropped.
//! 3. What remains must be exactly `9` followed by nine digits.
//! 4. Canonical form is `+98` plus those ten digits.
//!
//! Anything else is rejected with [`MsisdnError`]: wrong length, wrong
//! prefix, stray characters, or an unrecognized prefix shape.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex_lite::Regex;

use crate::error::MsisdnError;

/// Accepted surface shapes: optional `+98` / `98` / `0` prefix, then a
/// ten-digit mobile number starting with `9`.
static SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+98|98|0)?(9\d{9})$").expect("mobile number shape regex must compile")
});

/// A validated mobile number in canonical `+989XXXXXXXXX` form.
///
/// The only way to obtain one is [`Msisdn::parse`] (or `str::parse`), so
/// holding a value is proof the input passed validation.
///
/// # Example
/// ```
/// use salvosim::Msisdn;
///
/// let m = Msisdn::parse("0912 345 6789").unwrap();
/// assert_eq!(m.as_str(), "+989123456789");
///
/// assert!(Msisdn::parse("98912345678").is_err()); // one digit short
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Msisdn(Arc<str>);

impl Msisdn {
    /// Validates `raw` and returns the canonical number.
    pub fn parse(raw: &str) -> Result<Self, MsisdnError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let caps = SHAPE.captures(&compact).ok_or(MsisdnError)?;
        let subscriber = caps.get(1).map(|m| m.as_str()).ok_or(MsisdnError)?;
        Ok(Self(format!("+98{subscriber}").into()))
    }

    /// Canonical text, always `+98` followed by ten digits.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Msisdn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Msisdn {
    type Err = MsisdnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
