use core::fmt;

/// Failure modes reported by map operations.
///
/// Each variant carries the offending input, so callers can report or
/// retry without re-deriving it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The key handed to [`WavlMap::insert`](crate::WavlMap::insert) is
    /// already present.
    DuplicateKey(i64),
    /// The key handed to [`WavlMap::remove`](crate::WavlMap::remove) is
    /// not present.
    KeyNotFound(i64),
    /// The 1-based rank handed to
    /// [`WavlMap::select`](crate::WavlMap::select) falls outside
    /// `1..=len`.
    RankOutOfRange(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "key {key} is already present"),
            Self::KeyNotFound(key) => write!(f, "key {key} is not present"),
            Self::RankOutOfRange(rank) => write!(f, "rank {rank} is outside 1..=len"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_offending_input() {
        assert_eq!(Error::DuplicateKey(42).to_string(), "key 42 is already present");
        assert_eq!(Error::KeyNotFound(-7).to_string(), "key -7 is not present");
        assert_eq!(Error::RankOutOfRange(0).to_string(), "rank 0 is outside 1..=len");
    }
}
