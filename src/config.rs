use crate::{Algorithm, Error, Hotp, Passcodes, Resync, SecretKey, StateRecord, Window};
use core::str::FromStr;

/// Username written to the state record when none is given
pub const DEFAULT_USERNAME: &str = "username";
/// All-zero 21-byte key
pub const DEFAULT_KEY: &str = "000000000000000000000000000000000000000000";

/// First counter of the search window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStart {
    /// Decimal counter value
    Counter(u64),
    /// Counter read back from a hex challenge, as stored in a state record
    Challenge(u64),
}

impl WindowStart {
    /// Parse a hex challenge, with or without a `0x` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a hex number fitting in 64 bits.
    pub fn from_challenge(s: &str) -> Result<Self, Error> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        Ok(Self::Challenge(u64::from_str_radix(digits, 16)?))
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a decimal number fitting in 64 bits.
    pub fn from_counter(s: &str) -> Result<Self, Error> {
        Ok(Self::Counter(s.parse()?))
    }

    #[must_use]
    pub const fn counter(self) -> u64 {
        match self {
            Self::Counter(c) | Self::Challenge(c) => c,
        }
    }
}

impl Default for WindowStart {
    fn default() -> Self {
        Self::Counter(0)
    }
}

/// Window end, exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    /// Absolute counter value
    Absolute(u64),
    /// `+N`: offset from the window start
    Relative(u64),
}

impl WindowEnd {
    /// Resolve against the window start
    ///
    /// A resolved end of 0 selects the default window, like an absent end.
    #[must_use]
    pub const fn resolve(end: Option<Self>, initial: u64) -> Window {
        let end = match end {
            Some(Self::Absolute(end)) => end,
            Some(Self::Relative(offset)) => initial.saturating_add(offset),
            None => 0,
        };

        if end == 0 {
            Window::starting_at(initial)
        } else {
            Window::new(initial, end)
        }
    }
}

impl FromStr for WindowEnd {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('+') {
            Some(offset) => Ok(Self::Relative(offset.parse()?)),
            None => Ok(Self::Absolute(s.parse()?)),
        }
    }
}

/// Unvalidated resynchronization request
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    /// ASCII hex key
    pub key: String,
    pub pass1: String,
    pub pass2: String,
    pub start: WindowStart,
    pub end: Option<WindowEnd>,
    pub algorithm: Algorithm,
}

impl Config {
    /// Request with default username, key and window
    pub fn new<S: Into<String>>(pass1: S, pass2: S) -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            key: DEFAULT_KEY.to_string(),
            pass1: pass1.into(),
            pass2: pass2.into(),
            start: WindowStart::default(),
            end: None,
            algorithm: Algorithm::default(),
        }
    }

    /// Check passcodes, then the key, and resolve the window
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; see [`Passcodes::new`] and
    /// [`SecretKey::from_hex`].
    pub fn validate(self) -> Result<Job, Error> {
        let passcodes = Passcodes::new(self.pass1, self.pass2)?;
        let key = SecretKey::from_hex(&self.key)?;
        let window = WindowEnd::resolve(self.end, self.start.counter());

        Ok(Job {
            username: self.username,
            passcodes,
            window,
            engine: Resync::new(Hotp::new(key).with_algorithm(self.algorithm)),
        })
    }
}

/// Validated request, ready to search
#[derive(Debug)]
pub struct Job {
    pub username: String,
    pub passcodes: Passcodes,
    pub window: Window,
    pub engine: Resync<Hotp>,
}

impl Job {
    /// Run the search; `None` when the window holds no matching pair
    #[must_use]
    pub fn run(&self) -> Option<StateRecord<'_>> {
        self.engine
            .search(&self.passcodes, self.window)
            .map(|state| StateRecord {
                username: &self.username,
                state,
            })
    }
}
