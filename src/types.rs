use std::fmt;

/// Numeric key/button identifier as reported by the input device.
pub type KeyCode = u16;

/// A single button edge: a key went down (`is_press`) or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub code: KeyCode,
    pub is_press: bool,
}

impl ButtonEvent {
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            is_press: true,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Self {
            code,
            is_press: false,
        }
    }

    /// True if this is the release that closes `press`.
    pub fn releases(&self, press: &ButtonEvent) -> bool {
        !self.is_press && self.code == press.code
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = if self.is_press { "press" } else { "release" };
        write!(f, "{edge}(0x{:02x})", self.code)
    }
}

/// Tag carried by every tracked launch and its completion signal.
///
/// Generations only ever increase, so a completion whose generation differs
/// from the currently tracked one belongs to a superseded process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three external actions invoked at phase boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Begin,
    Pause,
    End,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Begin => "begin",
            ActionKind::Pause => "pause",
            ActionKind::End => "end",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
