use std::fmt;

/// Length of the human-readable unit prefix on output lines.
pub const SHORT_ID_LEN: usize = 7;

/// Opaque identifier of one spawned execution unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First [`SHORT_ID_LEN`] characters, or the whole id when it is shorter.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One message of the response stream: the unit it came from and its raw payload.
///
/// The payload is either workload output or an exit-code sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub unit: UnitId,
    pub payload: Vec<u8>,
}

impl StreamMessage {
    pub fn new(unit: impl Into<UnitId>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            unit: unit.into(),
            payload: payload.into(),
        }
    }
}
