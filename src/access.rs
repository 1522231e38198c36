use std::cmp::Ordering;
use std::fmt;

/// Filesystem access mode. Forms a three-element lattice with `ReadWrite`
/// as the join of `Read` and `Write`; `Read` and `Write` are incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AccessMode {
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "W")]
    Write,
    #[serde(rename = "RW")]
    ReadWrite,
}

impl AccessMode {
    /// Lattice join: `RW = R ⊔ W`.
    pub fn join(self, other: Self) -> Self {
        use AccessMode::*;
        match (self, other) {
            (ReadWrite, _) | (_, ReadWrite) => ReadWrite,
            (Read, Write) | (Write, Read) => ReadWrite,
            (Read, Read) => Read,
            (Write, Write) => Write,
        }
    }

    /// `covers(a, b)` iff `b ⊑ a`, i.e. `a` grants at least everything `b` does.
    pub fn covers(self, other: Self) -> bool {
        use AccessMode::*;
        match (self, other) {
            (ReadWrite, _) => true,
            (Read, Read) => true,
            (Write, Write) => true,
            _ => false,
        }
    }

    /// Total order used for canonical serialization: R < W < RW.
    fn rank(self) -> u8 {
        match self {
            AccessMode::Read => 0,
            AccessMode::Write => 1,
            AccessMode::ReadWrite => 2,
        }
    }
}

impl PartialOrd for AccessMode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccessMode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::ReadWrite => "read+write",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_commutative_and_produces_readwrite() {
        assert_eq!(AccessMode::Read.join(AccessMode::Write), AccessMode::ReadWrite);
        assert_eq!(AccessMode::Write.join(AccessMode::Read), AccessMode::ReadWrite);
        assert_eq!(AccessMode::Read.join(AccessMode::Read), AccessMode::Read);
    }

    #[test]
    fn covers_matches_lattice_definition() {
        assert!(AccessMode::ReadWrite.covers(AccessMode::Read));
        assert!(AccessMode::ReadWrite.covers(AccessMode::Write));
        assert!(AccessMode::ReadWrite.covers(AccessMode::ReadWrite));
        assert!(!AccessMode::Read.covers(AccessMode::Write));
        assert!(!AccessMode::Write.covers(AccessMode::Read));
    }

    #[test]
    fn join_covers_both_operands_for_all_pairs() {
        let modes = [AccessMode::Read, AccessMode::Write, AccessMode::ReadWrite];
        for &a in &modes {
            for &b in &modes {
                let j = a.join(b);
                assert!(j.covers(a));
                assert!(j.covers(b));
            }
        }
    }

    #[test]
    fn total_order_is_r_lt_w_lt_rw() {
        assert!(AccessMode::Read < AccessMode::Write);
        assert!(AccessMode::Write < AccessMode::ReadWrite);
    }

    #[test]
    fn display_matches_documented_strings() {
        assert_eq!(AccessMode::Read.to_string(), "read");
        assert_eq!(AccessMode::Write.to_string(), "write");
        assert_eq!(AccessMode::ReadWrite.to_string(), "read+write");
    }
}
