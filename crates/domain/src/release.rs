use serde::{Deserialize, Serialize};

/// Release period tag stored on a permission template.
///
/// The four duration variants form the embargo table; `Embargo` and
/// `BeforeDate` are selector tags that carry no duration of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleasePeriod {
    /// Items are released on one fixed stored date.
    #[serde(rename = "fixed")]
    Fixed,
    /// Items are released immediately; no delay is allowed.
    #[serde(rename = "now")]
    NoDelay,
    /// Items must be released before the stored date.
    #[serde(rename = "before")]
    BeforeDate,
    /// Depositor may pick an embargo; no maximum period is imposed.
    #[serde(rename = "embargo")]
    Embargo,
    /// Maximum embargo of six months.
    #[serde(rename = "6mos")]
    SixMonths,
    /// Maximum embargo of one year.
    #[serde(rename = "1yr")]
    OneYear,
    /// Maximum embargo of two years.
    #[serde(rename = "2yrs")]
    TwoYears,
    /// Maximum embargo of three years.
    #[serde(rename = "3yrs")]
    ThreeYears,
}

impl ReleasePeriod {
    /// Returns a stable storage value for this release period.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::NoDelay => "now",
            Self::BeforeDate => "before",
            Self::Embargo => "embargo",
            Self::SixMonths => "6mos",
            Self::OneYear => "1yr",
            Self::TwoYears => "2yrs",
            Self::ThreeYears => "3yrs",
        }
    }

    /// Parses a stored release period tag.
    ///
    /// Unknown or blank tags yield `None`, which templates treat as
    /// "varies": no release policy applies and every candidate date
    /// validates. Malformed stored tags therefore disable enforcement
    /// instead of rejecting the template.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(Self::Fixed),
            "now" => Some(Self::NoDelay),
            "before" => Some(Self::BeforeDate),
            "embargo" => Some(Self::Embargo),
            "6mos" => Some(Self::SixMonths),
            "1yr" => Some(Self::OneYear),
            "2yrs" => Some(Self::TwoYears),
            "3yrs" => Some(Self::ThreeYears),
            _ => None,
        }
    }

    /// Returns the maximum embargo length in months for the four embargo
    /// duration tags, and `None` for every other tag.
    #[must_use]
    pub fn embargo_months(&self) -> Option<u32> {
        match self {
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
            Self::TwoYears => Some(24),
            Self::ThreeYears => Some(36),
            Self::Fixed | Self::NoDelay | Self::BeforeDate | Self::Embargo => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReleasePeriod;

    #[test]
    fn parse_roundtrips_every_known_tag() {
        for period in [
            ReleasePeriod::Fixed,
            ReleasePeriod::NoDelay,
            ReleasePeriod::BeforeDate,
            ReleasePeriod::Embargo,
            ReleasePeriod::SixMonths,
            ReleasePeriod::OneYear,
            ReleasePeriod::TwoYears,
            ReleasePeriod::ThreeYears,
        ] {
            assert_eq!(ReleasePeriod::parse(period.as_str()), Some(period));
        }
    }

    #[test]
    fn unknown_tag_parses_to_none() {
        assert_eq!(ReleasePeriod::parse(""), None);
        assert_eq!(ReleasePeriod::parse("varies"), None);
        assert_eq!(ReleasePeriod::parse("4yrs"), None);
    }

    #[test]
    fn embargo_table_covers_exactly_the_duration_tags() {
        assert_eq!(ReleasePeriod::SixMonths.embargo_months(), Some(6));
        assert_eq!(ReleasePeriod::OneYear.embargo_months(), Some(12));
        assert_eq!(ReleasePeriod::TwoYears.embargo_months(), Some(24));
        assert_eq!(ReleasePeriod::ThreeYears.embargo_months(), Some(36));
        assert_eq!(ReleasePeriod::Embargo.embargo_months(), None);
        assert_eq!(ReleasePeriod::BeforeDate.embargo_months(), None);
    }
}
