//! Counter resynchronization
//!
//! Scans a counter window for the point where a token produced two observed
//! passcodes back to back. The first passcode must match at `c` and the second
//! at `c + 1`; the reported state is `c + 1`, the last counter the token used.

use crate::hex::{self, RenderMode};
use crate::{Error, OtpDeriver};
use core::fmt;
use tracing::{debug, trace};

/// Shortest passcode a token can emit
pub const MIN_DIGITS: usize = 6;
/// Longest passcode a token can emit
pub const MAX_DIGITS: usize = 9;
/// Window size used when no end is given
pub const DEFAULT_WINDOW: u64 = 65_536;

/// Two consecutive passcodes read off the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passcodes {
    first: String,
    second: String,
}

impl Passcodes {
    /// # Errors
    ///
    /// Returns an error if:
    /// - The two passcodes differ in length
    /// - The shared length is outside 6-9 characters
    pub fn new<S: Into<String>>(first: S, second: S) -> Result<Self, Error> {
        let first = first.into();
        let second = second.into();

        if first.len() != second.len() {
            return Err(Error::PasscodeLengthMismatch(first.len(), second.len()));
        }
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&first.len()) {
            return Err(Error::PasscodeLength(first.len()));
        }

        Ok(Self { first, second })
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Passcode length, shared by both
    #[must_use]
    pub fn digits(&self) -> usize {
        self.first.len()
    }
}

/// Half-open counter range `[initial, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    initial: u64,
    end: u64,
}

impl Window {
    /// An `end <= initial` window is empty and never matches
    #[must_use]
    pub const fn new(initial: u64, end: u64) -> Self {
        Self { initial, end }
    }

    /// Window of [`DEFAULT_WINDOW`] counters starting at `initial`
    #[must_use]
    pub const fn starting_at(initial: u64) -> Self {
        Self::new(initial, initial.saturating_add(DEFAULT_WINDOW))
    }

    #[must_use]
    pub const fn initial(&self) -> u64 {
        self.initial
    }

    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }
}

/// Recovered token state: the counter that produced the second passcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncState {
    counter: u64,
}

impl ResyncState {
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// 8-byte big-endian challenge for the counter
    #[must_use]
    pub const fn challenge(&self) -> [u8; 8] {
        self.counter.to_be_bytes()
    }

    /// Challenge as 16 lowercase hex characters
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.challenge(), RenderMode::Hex)
    }
}

/// Line written to the state store for a resynchronized user
///
/// `5:<username>:<state>:::0:0:0:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord<'a> {
    pub username: &'a str,
    pub state: ResyncState,
}

impl fmt::Display for StateRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "5:{}:{}:::0:0:0:", self.username, self.state.to_hex())
    }
}

/// Resynchronization search engine
#[derive(Debug)]
pub struct Resync<D> {
    deriver: D,
}

impl<D: OtpDeriver> Resync<D> {
    #[must_use]
    pub const fn new(deriver: D) -> Self {
        Self { deriver }
    }

    /// Scan `window` for the counter pair producing both passcodes
    ///
    /// Counters are tried in ascending order. When the first passcode matches at
    /// `c`, the second is checked at `c + 1` even if that lies at or past the
    /// window end. After a failed second check the scan resumes at `c + 2`, so
    /// `c + 1` is never tried as a first-passcode candidate.
    ///
    /// Returns `None` once the window is exhausted.
    pub fn search(&self, passcodes: &Passcodes, window: Window) -> Option<ResyncState> {
        let digits = passcodes.digits();
        let mut counter = window.initial();

        while counter < window.end() {
            let otp = self.deriver.derive(&counter.to_be_bytes(), digits);
            trace!(counter, %otp);

            if otp == passcodes.first() {
                debug!(counter, passcode = passcodes.first(), "matched first passcode");

                // counter < end, cannot overflow
                counter += 1;
                let otp = self.deriver.derive(&counter.to_be_bytes(), digits);
                if otp == passcodes.second() {
                    return Some(ResyncState { counter });
                }

                debug!(
                    counter,
                    wanted = passcodes.second(),
                    got = %otp,
                    "mismatch, continuing search"
                );
            }

            counter = counter.checked_add(1)?;
        }

        None
    }
}
