//! Playlist index convention.
//!
//! The server counts playlist positions from 0. Users see them from 1 unless
//! zero indexing was requested at startup. Convert exactly once when an
//! index crosses between the user and the wire.

/// How playlist positions are presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    /// 1-based, user facing
    #[default]
    Natural,
    /// 0-based, same as the server
    Raw,
}

impl IndexMode {
    pub fn from_zero_indexing(zero_indexing: bool) -> Self {
        if zero_indexing {
            IndexMode::Raw
        } else {
            IndexMode::Natural
        }
    }

    pub fn is_natural(&self) -> bool {
        matches!(self, IndexMode::Natural)
    }

    /// User-facing position to server position.
    pub fn to_wire(&self, n: i64) -> i64 {
        match self {
            IndexMode::Natural => n - 1,
            IndexMode::Raw => n,
        }
    }

    /// Server position to user-facing position.
    pub fn to_natural(&self, n: i64) -> i64 {
        match self {
            IndexMode::Natural => n + 1,
            IndexMode::Raw => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_offsets_by_one() {
        let m = IndexMode::Natural;
        assert_eq!(m.to_wire(1), 0);
        assert_eq!(m.to_natural(0), 1);
    }

    #[test]
    fn raw_is_identity() {
        let m = IndexMode::Raw;
        assert_eq!(m.to_wire(3), 3);
        assert_eq!(m.to_natural(3), 3);
    }

    #[test]
    fn conversions_round_trip() {
        for mode in [IndexMode::Natural, IndexMode::Raw] {
            for n in 0..50 {
                assert_eq!(mode.to_wire(mode.to_natural(n)), n);
            }
            for n in -1..50 {
                assert_eq!(mode.to_natural(mode.to_wire(n)), n);
            }
        }
    }

    #[test]
    fn flag_selects_mode() {
        assert_eq!(IndexMode::from_zero_indexing(true), IndexMode::Raw);
        assert!(IndexMode::from_zero_indexing(false).is_natural());
        assert!(IndexMode::default().is_natural());
    }
}
