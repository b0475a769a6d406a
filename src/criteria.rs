//! Normalized selection criteria.

use glob::Pattern;

use crate::error::{CriteriaField, TidyError};
use crate::params::{TidyParams, TimestampKind};

/// Seconds per age unit letter. A bare number is in seconds.
const SECONDS_PER_UNIT: &[(char, u64)] = &[
    ('s', 1),
    ('m', 60),
    ('h', 3_600),
    ('d', 86_400),
    ('w', 604_800),
];

/// Bytes per size unit letter. A bare number is in bytes.
const BYTES_PER_UNIT: &[(char, u64)] = &[
    ('b', 1),
    ('k', 1 << 10),
    ('m', 1 << 20),
    ('g', 1 << 30),
    ('t', 1 << 40),
];

/// Validated, immutable parameters for one run.
#[derive(Debug, Clone)]
pub struct Criteria {
    age_seconds: u64,
    size_bytes: u64,
    timestamp: TimestampKind,
    patterns: Option<Vec<Pattern>>,
    recurse: bool,
    rmdirs: bool,
    force: bool,
    silent: bool,
}

impl Criteria {
    /// Parse and validate a raw parameter record.
    pub fn from_params(params: &TidyParams) -> Result<Self, TidyError> {
        let age_seconds = parse_age(&params.age)?;
        let size_bytes = parse_size(&params.size)?;
        let patterns = params
            .matches
            .as_deref()
            .map(compile_patterns)
            .transpose()?;

        Ok(Criteria {
            age_seconds,
            size_bytes,
            timestamp: params.timestamp,
            patterns,
            recurse: params.recurse,
            rmdirs: params.rmdirs,
            force: params.force,
            silent: params.silent,
        })
    }

    pub fn age_seconds(&self) -> u64 {
        self.age_seconds
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn timestamp(&self) -> TimestampKind {
        self.timestamp
    }

    pub fn patterns(&self) -> Option<&[Pattern]> {
        self.patterns.as_deref()
    }

    pub fn recurse(&self) -> bool {
        self.recurse
    }

    pub fn rmdirs(&self) -> bool {
        self.rmdirs
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn silent(&self) -> bool {
        self.silent
    }
}

/// Parse an age such as "2d" into seconds.
pub fn parse_age(raw: &str) -> Result<u64, TidyError> {
    parse_quantity(raw, SECONDS_PER_UNIT).ok_or_else(|| TidyError::InvalidCriteria {
        field: CriteriaField::Age,
        value: raw.to_string(),
    })
}

/// Parse a size such as "10m" into bytes.
pub fn parse_size(raw: &str) -> Result<u64, TidyError> {
    parse_quantity(raw, BYTES_PER_UNIT).ok_or_else(|| TidyError::InvalidCriteria {
        field: CriteriaField::Size,
        value: raw.to_string(),
    })
}

/// Digits optionally followed by one unit letter from `units`.
/// Returns `None` on any deviation from that grammar or on overflow.
fn parse_quantity(raw: &str, units: &[(char, u64)]) -> Option<u64> {
    let lowered = raw.to_ascii_lowercase();

    let (digits, multiplier) = match lowered.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let (_, multiplier) = units.iter().find(|(unit, _)| *unit == c)?;
            (&lowered[..lowered.len() - 1], *multiplier)
        }
        _ => (lowered.as_str(), 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

fn compile_patterns(raw: &[String]) -> Result<Vec<Pattern>, TidyError> {
    raw.iter()
        .map(|pattern| {
            Pattern::new(&shell_to_glob(pattern)).map_err(|source| TidyError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Rewrite a shell basename pattern into `glob` crate syntax.
///
/// Runs of `*` collapse to one, since `**` is a path wildcard for `glob` and
/// a basename has no separators. A `[` that never closes is taken literally.
fn shell_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the character class opened at `start`.
///
/// A `]` right after `[` or `[!` belongs to the class rather than closing it.
pub(crate) fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid_age(raw: &str) {
        match parse_age(raw) {
            Err(TidyError::InvalidCriteria { field, value }) => {
                assert_eq!(field, CriteriaField::Age);
                assert_eq!(value, raw);
            }
            other => panic!("expected invalid age for {raw:?}, got {other:?}"),
        }
    }

    // ============ parse_age tests ============

    #[test]
    fn test_parse_age_bare_number_is_seconds() {
        assert_eq!(parse_age("10").unwrap(), 10);
        assert_eq!(parse_age("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_age_units() {
        assert_eq!(parse_age("30s").unwrap(), 30);
        assert_eq!(parse_age("5m").unwrap(), 300);
        assert_eq!(parse_age("2h").unwrap(), 7_200);
        assert_eq!(parse_age("2d").unwrap(), 172_800);
        assert_eq!(parse_age("1w").unwrap(), 604_800);
    }

    #[test]
    fn test_parse_age_uppercase_unit() {
        assert_eq!(parse_age("1W").unwrap(), 604_800);
        assert_eq!(parse_age("3D").unwrap(), 259_200);
    }

    #[test]
    fn test_parse_age_rejects_size_unit() {
        assert_invalid_age("1k");
        assert_invalid_age("2x");
    }

    #[test]
    fn test_parse_age_rejects_malformed() {
        assert_invalid_age("");
        assert_invalid_age("-1");
        assert_invalid_age("d");
        assert_invalid_age("1dd");
        assert_invalid_age("1.5d");
        assert_invalid_age(" 1d");
        assert_invalid_age("1d ");
    }

    #[test]
    fn test_parse_age_rejects_overflow() {
        assert_invalid_age("99999999999999999999");
        assert_invalid_age("18446744073709551615w");
    }

    // ============ parse_size tests ============

    #[test]
    fn test_parse_size_bare_number_is_bytes() {
        assert_eq!(parse_size("1").unwrap(), 1);
        assert_eq!(parse_size("512").unwrap(), 512);
    }

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("7b").unwrap(), 7);
        assert_eq!(parse_size("1k").unwrap(), 1_024);
        assert_eq!(parse_size("10m").unwrap(), 10_485_760);
        assert_eq!(parse_size("2G").unwrap(), 2_147_483_648);
        assert_eq!(parse_size("1t").unwrap(), 1_099_511_627_776);
    }

    #[test]
    fn test_parse_size_rejects_malformed() {
        for raw in ["", "-1", "2x", "1w", "k", "10 m"] {
            match parse_size(raw) {
                Err(TidyError::InvalidCriteria { field, value }) => {
                    assert_eq!(field, CriteriaField::Size);
                    assert_eq!(value, raw);
                }
                other => panic!("expected invalid size for {raw:?}, got {other:?}"),
            }
        }
    }

    // ============ Criteria tests ============

    #[test]
    fn test_criteria_from_defaults() {
        let criteria = Criteria::from_params(&TidyParams::new("/tmp")).unwrap();
        assert_eq!(criteria.age_seconds(), 0);
        assert_eq!(criteria.size_bytes(), 0);
        assert_eq!(criteria.timestamp(), TimestampKind::Access);
        assert!(criteria.patterns().is_none());
        assert!(!criteria.recurse());
        assert!(!criteria.rmdirs());
        assert!(!criteria.force());
        assert!(!criteria.silent());
    }

    #[test]
    fn test_criteria_carries_switches_and_patterns() {
        let params = TidyParams {
            age: "4w".to_string(),
            size: "1m".to_string(),
            matches: Some(vec!["*.log".to_string(), "*.log.gz".to_string()]),
            recurse: true,
            rmdirs: true,
            force: true,
            silent: true,
            timestamp: TimestampKind::Change,
            ..TidyParams::new("/var/log")
        };
        let criteria = Criteria::from_params(&params).unwrap();

        assert_eq!(criteria.age_seconds(), 4 * 604_800);
        assert_eq!(criteria.size_bytes(), 1_048_576);
        assert_eq!(criteria.timestamp(), TimestampKind::Change);
        assert_eq!(criteria.patterns().map(<[Pattern]>::len), Some(2));
        assert!(criteria.recurse() && criteria.rmdirs() && criteria.force() && criteria.silent());
    }

    #[test]
    fn test_criteria_fails_on_bad_age_before_size() {
        let params = TidyParams {
            age: "soon".to_string(),
            size: "huge".to_string(),
            ..TidyParams::new("/tmp")
        };
        match Criteria::from_params(&params) {
            Err(TidyError::InvalidCriteria { field, value }) => {
                assert_eq!(field, CriteriaField::Age);
                assert_eq!(value, "soon");
            }
            other => panic!("expected invalid age, got {other:?}"),
        }
    }

    #[test]
    fn test_criteria_pattern_with_unclosed_bracket_is_literal() {
        let params = TidyParams {
            matches: Some(vec!["*.log".to_string(), "[abc".to_string()]),
            ..TidyParams::new("/tmp")
        };
        let criteria = Criteria::from_params(&params).unwrap();
        let patterns = criteria.patterns().unwrap();

        assert!(patterns[1].matches("[abc"));
        assert!(!patterns[1].matches("a"));
    }

    // ============ shell pattern tests ============

    #[test]
    fn test_repeated_stars_compile_as_one() {
        let params = TidyParams {
            matches: Some(vec!["**.log".to_string(), "app**".to_string(), "a**g".to_string()]),
            ..TidyParams::new("/tmp")
        };
        let criteria = Criteria::from_params(&params).unwrap();
        let patterns = criteria.patterns().unwrap();

        assert!(patterns[0].matches("x.log"));
        assert!(!patterns[0].matches("x.txt"));
        assert!(patterns[1].matches("app.log"));
        assert!(patterns[2].matches("a.log.g"));
    }

    #[test]
    fn test_shell_to_glob() {
        assert_eq!(shell_to_glob("***.log"), "*.log");
        assert_eq!(shell_to_glob("tmp[0-9]"), "tmp[0-9]");
        assert_eq!(shell_to_glob("[]x]"), "[]x]");
        assert_eq!(shell_to_glob("[!]x]*"), "[!]x]*");
        assert_eq!(shell_to_glob("a[b"), "a[[]b");
        assert_eq!(shell_to_glob("[]"), "[[]]");
    }

    #[test]
    fn test_class_end() {
        let chars: Vec<char> = "[,;]x".chars().collect();
        assert_eq!(class_end(&chars, 0), Some(3));
        let chars: Vec<char> = "[!]]".chars().collect();
        assert_eq!(class_end(&chars, 0), Some(3));
        let chars: Vec<char> = "[abc".chars().collect();
        assert_eq!(class_end(&chars, 0), None);
    }
}
