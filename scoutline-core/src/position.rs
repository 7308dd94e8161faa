//! Position groups: coarse role buckets for players.
//!
//! The enum offers compile-time safety for position lookups while matching
//! the single-letter codes used by the reference data.
//!
//! # Examples
//! ```
//! use scoutline_core::PositionGroup;
//!
//! assert_eq!(PositionGroup::Goaltender.as_str(), "G");
//! assert_eq!(PositionGroup::Forward.to_string(), "F");
//! ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionGroup {
    /// Goaltenders.
    Goaltender,
    /// Defenders.
    Defence,
    /// Forwards.
    Forward,
    /// Rows whose position could not be resolved.
    Unknown,
}

impl PositionGroup {
    /// The three position groups a shortlist is produced for.
    pub const RANKED: [Self; 3] = [Self::Goaltender, Self::Defence, Self::Forward];

    /// Return the reference-data code for the group.
    ///
    /// # Examples
    /// ```
    /// use scoutline_core::PositionGroup;
    ///
    /// assert_eq!(PositionGroup::Defence.as_str(), "D");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goaltender => "G",
            Self::Defence => "D",
            Self::Forward => "F",
            Self::Unknown => "Unknown",
        }
    }

    /// Return the one-hot indicator column name for the group.
    #[must_use]
    pub const fn indicator_column(self) -> &'static str {
        match self {
            Self::Goaltender => "pos_G",
            Self::Defence => "pos_D",
            Self::Forward => "pos_F",
            Self::Unknown => "pos_Unknown",
        }
    }

    /// Map a raw reference-table value onto a group.
    ///
    /// Missing or unrecognised values resolve to [`Self::Unknown`] rather
    /// than failing; the reference data is not trusted to be clean.
    #[must_use]
    pub fn from_reference(value: Option<&str>) -> Self {
        match value {
            Some("G") => Self::Goaltender,
            Some("D") => Self::Defence,
            Some("F") => Self::Forward,
            _ => Self::Unknown,
        }
    }

    /// True when the group denotes a skater rather than a goaltender.
    #[must_use]
    pub const fn is_skater(self) -> bool {
        matches!(self, Self::Defence | Self::Forward)
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PositionGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" | "g" => Ok(Self::Goaltender),
            "D" | "d" => Ok(Self::Defence),
            "F" | "f" => Ok(Self::Forward),
            _ => Err(format!("unknown position group '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::PositionGroup;

    #[rstest]
    #[case("G", PositionGroup::Goaltender)]
    #[case("D", PositionGroup::Defence)]
    #[case("F", PositionGroup::Forward)]
    fn parses_reference_codes(#[case] code: &str, #[case] expected: PositionGroup) {
        assert_eq!(PositionGroup::from_str(code), Ok(expected));
        assert_eq!(PositionGroup::from_reference(Some(code)), expected);
    }

    #[rstest]
    fn rejects_unknown_codes() {
        assert!(PositionGroup::from_str("LW").is_err());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("LW"))]
    fn reference_fallback_is_unknown(#[case] value: Option<&str>) {
        assert_eq!(PositionGroup::from_reference(value), PositionGroup::Unknown);
    }

    #[rstest]
    fn indicator_columns_follow_codes() {
        assert_eq!(PositionGroup::Goaltender.indicator_column(), "pos_G");
        assert_eq!(PositionGroup::Unknown.indicator_column(), "pos_Unknown");
    }
}
