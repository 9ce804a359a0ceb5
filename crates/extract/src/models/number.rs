use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A volume, chapter, or part number.
///
/// Integral values are always normalized to [`Number::Integer`], so `5.0`
/// and `5` compare, hash, and display identically.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum Number {
    Integer(u32),
    Decimal(f64),
}
impl Number {
    pub fn new(value: f64) -> Self {
        if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
            Self::Integer(value as u32)
        } else {
            Self::Decimal(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(i) => f64::from(*i),
            Self::Decimal(d) => *d,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Formats the number with its integral part zero-padded to `width`
    /// digits, keeping any fractional part as-is.
    ///
    /// ```
    /// use tankobon_extract::models::Number;
    /// assert_eq!(Number::Integer(5).padded(2), "05");
    /// assert_eq!(Number::new(12.5).padded(3), "012.5");
    /// ```
    pub fn padded(&self, width: usize) -> String {
        let display = self.to_string();
        match display.split_once('.') {
            Some((whole, fraction)) => format!("{whole:0>width$}.{fraction}"),
            None => format!("{display:0>width$}"),
        }
    }
}
impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::Integer(value)
    }
}
impl FromStr for Number {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(Self::new(value)),
            _ => exn::bail!(ErrorKind::ParseError {
                field: "number",
                value: trimmed.to_string(),
            }),
        }
    }
}
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Number {}
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_f64().total_cmp(&other.as_f64())
    }
}
impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_f64().to_bits().hash(state);
    }
}
impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}

/// How the numbers of a multi-number release relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum MultiKind {
    /// Only the endpoints are meaningful; everything between is implied.
    Range,
    /// Each listed number is held individually, nothing else is implied.
    Discrete,
}

/// Two or more numbers carried by a single file (omnibus volumes, chapter
/// bundles). Values are kept sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiNumber {
    values: Vec<Number>,
    kind: MultiKind,
}
impl MultiNumber {
    /// Returns `None` when fewer than two distinct numbers remain.
    pub fn new(values: impl IntoIterator<Item = Number>, kind: MultiKind) -> Option<Self> {
        let mut values: Vec<Number> = values.into_iter().collect();
        values.sort();
        values.dedup();
        if values.len() < 2 {
            return None;
        }
        if kind == MultiKind::Range {
            let (first, last) = (values[0], values[values.len() - 1]);
            values = vec![first, last];
        }
        Some(Self { values, kind })
    }

    pub fn first(&self) -> Number {
        self.values[0]
    }

    pub fn last(&self) -> Number {
        self.values[self.values.len() - 1]
    }

    pub fn values(&self) -> &[Number] {
        &self.values
    }

    pub fn kind(&self) -> MultiKind {
        self.kind
    }

    pub fn contains(&self, number: Number) -> bool {
        match self.kind {
            MultiKind::Range => self.first() <= number && number <= self.last(),
            MultiKind::Discrete => self.values.contains(&number),
        }
    }
}

/// The parsed numbering of a release: one number, or several.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum ReleaseNumber {
    Single(Number),
    Multi(MultiNumber),
}
impl ReleaseNumber {
    pub fn first(&self) -> Number {
        match self {
            Self::Single(n) => *n,
            Self::Multi(m) => m.first(),
        }
    }

    pub fn last(&self) -> Number {
        match self {
            Self::Single(n) => *n,
            Self::Multi(m) => m.last(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    pub fn contains(&self, number: Number) -> bool {
        match self {
            Self::Single(n) => *n == number,
            Self::Multi(m) => m.contains(number),
        }
    }

    /// Returns `true` if any number held by `self` is also held by `other`.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), _) => other.contains(*a),
            (_, Self::Single(b)) => self.contains(*b),
            (Self::Multi(a), Self::Multi(b)) => match (a.kind, b.kind) {
                (MultiKind::Range, MultiKind::Range) => a.first() <= b.last() && b.first() <= a.last(),
                (MultiKind::Discrete, _) => a.values.iter().any(|n| b.contains(*n)),
                (_, MultiKind::Discrete) => b.values.iter().any(|n| a.contains(*n)),
            },
        }
    }

    /// Whole numbers held by this release as inclusive spans. A range stays
    /// a single span however long it is.
    pub fn integer_spans(&self) -> Vec<RangeInclusive<u32>> {
        match self {
            Self::Single(Number::Integer(i)) => vec![*i..=*i],
            Self::Single(Number::Decimal(_)) => vec![],
            Self::Multi(m) if m.kind == MultiKind::Range => {
                let start = m.first().as_f64().ceil() as u32;
                let end = m.last().as_f64().floor() as u32;
                match start <= end {
                    true => vec![start..=end],
                    false => vec![],
                }
            },
            Self::Multi(m) => m
                .values
                .iter()
                .filter_map(|n| match n {
                    Number::Integer(i) => Some(*i..=*i),
                    Number::Decimal(_) => None,
                })
                .collect(),
        }
    }

    /// Formats the number the way release names spell it, e.g. `v05`,
    /// `v01-03`, or `c012.5`.
    pub fn format(&self, prefix: &str, width: usize) -> String {
        match self {
            Self::Single(n) => format!("{prefix}{}", n.padded(width)),
            Self::Multi(m) => {
                let joined = m.values.iter().map(|n| n.padded(width)).collect::<Vec<_>>().join("-");
                format!("{prefix}{joined}")
            },
        }
    }
}
impl From<Number> for ReleaseNumber {
    fn from(value: Number) -> Self {
        Self::Single(value)
    }
}
impl Display for ReleaseNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Multi(m) => {
                let separator = match m.kind {
                    MultiKind::Range => "-",
                    MultiKind::Discrete => ", ",
                };
                let joined = m.values.iter().map(ToString::to_string).collect::<Vec<_>>().join(separator);
                write!(f, "{joined}")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5", Number::Integer(5))]
    #[case("005", Number::Integer(5))]
    #[case("12.5", Number::Decimal(12.5))]
    #[case("3.0", Number::Integer(3))]
    fn test_parse(#[case] input: &str, #[case] expected: Number) {
        let number: Number = input.parse().unwrap();
        assert_eq!(number, expected);
        assert_eq!(number.is_integer(), matches!(expected, Number::Integer(_)));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("-4")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<Number>().is_err());
    }

    #[test]
    fn test_integral_decimal_is_normalized() {
        assert_eq!(Number::new(5.0), Number::Integer(5));
        assert_eq!(Number::new(5.0).to_string(), "5");
        assert_eq!(Number::Decimal(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_range_keeps_endpoints_only() {
        let multi = MultiNumber::new([3, 1, 2].map(Number::from), MultiKind::Range).unwrap();
        assert_eq!(multi.values(), &[Number::Integer(1), Number::Integer(3)]);
        assert!(multi.contains(Number::Integer(2)));
        assert!(!multi.contains(Number::Integer(4)));
    }

    #[test]
    fn test_discrete_keeps_every_value() {
        let values = [3.5, 3.6, 3.7].map(Number::new);
        let multi = MultiNumber::new(values, MultiKind::Discrete).unwrap();
        assert_eq!(multi.values().len(), 3);
        assert!(multi.contains(Number::new(3.6)));
        assert!(!multi.contains(Number::new(3.55)));
    }

    #[test]
    fn test_multi_requires_two_distinct_values() {
        assert!(MultiNumber::new([Number::Integer(1), Number::Integer(1)], MultiKind::Range).is_none());
        assert!(MultiNumber::new([], MultiKind::Discrete).is_none());
    }

    #[test]
    fn test_overlaps() {
        let range: ReleaseNumber = ReleaseNumber::Multi(MultiNumber::new([1, 3].map(Number::from), MultiKind::Range).unwrap());
        assert!(range.overlaps(&Number::Integer(2).into()));
        assert!(ReleaseNumber::from(Number::Integer(3)).overlaps(&range));
        assert!(!range.overlaps(&Number::Integer(4).into()));
        let other = ReleaseNumber::Multi(MultiNumber::new([3, 5].map(Number::from), MultiKind::Range).unwrap());
        assert!(range.overlaps(&other));
    }

    #[test]
    fn test_integer_spans() {
        let range = ReleaseNumber::Multi(MultiNumber::new([1, 4].map(Number::from), MultiKind::Range).unwrap());
        assert_eq!(range.integer_spans(), vec![1..=4]);
        let huge = ReleaseNumber::Multi(MultiNumber::new([1, 999_999_999].map(Number::from), MultiKind::Range).unwrap());
        assert_eq!(huge.integer_spans(), vec![1..=999_999_999]);
        let fractional = ReleaseNumber::Multi(MultiNumber::new([1.5, 1.7].map(Number::new), MultiKind::Range).unwrap());
        assert!(fractional.integer_spans().is_empty());
        assert!(ReleaseNumber::from(Number::new(1.5)).integer_spans().is_empty());
    }

    #[rstest]
    #[case(ReleaseNumber::from(Number::Integer(5)), "v", 2, "v05")]
    #[case(ReleaseNumber::from(Number::new(12.5)), "c", 3, "c012.5")]
    #[case(ReleaseNumber::Multi(MultiNumber::new([1, 3].map(Number::from), MultiKind::Range).unwrap()), "v", 2, "v01-03")]
    fn test_format(#[case] number: ReleaseNumber, #[case] prefix: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(number.format(prefix, width), expected);
    }
}
