//! Heuristic rules for natural-language filter queries
//!
//! Each rule looks at the lowercased query on its own and may produce one
//! [`FilterUpdate`]. Rules never see each other's output; ordering and
//! overriding are the parser's job.

use regex::Regex;

use crate::filter::StructuredFilter;

/// A single field assignment produced by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterUpdate {
    Palindrome(bool),
    WordCount(i64),
    MinLength(i64),
    MaxLength(i64),
    ContainsCharacter(char),
}

impl FilterUpdate {
    /// Writes this update into `filter`, replacing any earlier value of the field
    pub fn apply(self, filter: &mut StructuredFilter) {
        match self {
            FilterUpdate::Palindrome(value) => filter.is_palindrome = Some(value),
            FilterUpdate::WordCount(value) => filter.word_count = Some(value),
            FilterUpdate::MinLength(value) => filter.min_length = Some(value),
            FilterUpdate::MaxLength(value) => filter.max_length = Some(value),
            FilterUpdate::ContainsCharacter(value) => filter.contains_character = Some(value),
        }
    }
}

/// A heuristic evaluated against a lowercased query
pub trait FilterRule: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Returns an update if the rule recognizes the text
    fn evaluate(&self, text: &str) -> Option<FilterUpdate>;
}

/// Fires when the text contains a fixed phrase
pub struct KeywordRule {
    name: &'static str,
    keyword: &'static str,
    update: FilterUpdate,
}

impl KeywordRule {
    pub fn new(name: &'static str, keyword: &'static str, update: FilterUpdate) -> Self {
        Self {
            name,
            keyword,
            update,
        }
    }
}

impl FilterRule for KeywordRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, text: &str) -> Option<FilterUpdate> {
        text.contains(self.keyword).then_some(self.update)
    }
}

/// Which side of a length comparison a phrase bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    /// "longer than N" means length >= N + 1
    Longer,
    /// "shorter than N" means length <= N - 1
    Shorter,
}

/// Extracts a strict length comparison such as "longer than 5"
pub struct LengthRule {
    name: &'static str,
    pattern: Regex,
    bound: LengthBound,
}

impl LengthRule {
    pub fn new(name: &'static str, pattern: Regex, bound: LengthBound) -> Self {
        Self {
            name,
            pattern,
            bound,
        }
    }

    pub fn longer_than() -> Self {
        Self::new(
            "longer_than",
            Regex::new(r"longer than ([0-9]+)|more than ([0-9]+) characters?")
                .expect("valid longer-than pattern"),
            LengthBound::Longer,
        )
    }

    pub fn shorter_than() -> Self {
        Self::new(
            "shorter_than",
            Regex::new(r"shorter than ([0-9]+)|less than ([0-9]+) characters?")
                .expect("valid shorter-than pattern"),
            LengthBound::Shorter,
        )
    }
}

impl FilterRule for LengthRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, text: &str) -> Option<FilterUpdate> {
        let captures = self.pattern.captures(text)?;
        let digits = captures.get(1).or_else(|| captures.get(2))?;
        // Only ASCII digits are captured, so a failed parse means overflow
        let n: i64 = digits.as_str().parse().unwrap_or(i64::MAX);

        match self.bound {
            LengthBound::Longer => Some(FilterUpdate::MinLength(n.saturating_add(1))),
            LengthBound::Shorter => Some(FilterUpdate::MaxLength(n.saturating_sub(1))),
        }
    }
}

/// Extracts "containing the letter x" / "contains letter x"
pub struct LetterRule {
    pattern: Regex,
}

impl LetterRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"contain(?:ing|s)? (?:the )?letter ([a-z])")
                .expect("valid letter pattern"),
        }
    }
}

impl Default for LetterRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRule for LetterRule {
    fn name(&self) -> &'static str {
        "contains_letter"
    }

    fn evaluate(&self, text: &str) -> Option<FilterUpdate> {
        let letter = self.pattern.captures(text)?.get(1)?;
        letter.as_str().chars().next().map(FilterUpdate::ContainsCharacter)
    }
}

/// The built-in rule set, in evaluation order.
///
/// "first vowel" comes after the letter rule so that it wins when both fire.
/// It always means the literal letter `a`.
pub fn default_rules() -> Vec<Box<dyn FilterRule>> {
    vec![
        Box::new(KeywordRule::new(
            "palindrome",
            "palindrom",
            FilterUpdate::Palindrome(true),
        )),
        Box::new(KeywordRule::new(
            "single_word",
            "single word",
            FilterUpdate::WordCount(1),
        )),
        Box::new(LengthRule::longer_than()),
        Box::new(LengthRule::shorter_than()),
        Box::new(LetterRule::new()),
        Box::new(KeywordRule::new(
            "first_vowel",
            "first vowel",
            FilterUpdate::ContainsCharacter('a'),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rule() {
        let rule = KeywordRule::new("palindrome", "palindrom", FilterUpdate::Palindrome(true));
        assert_eq!(
            rule.evaluate("palindromic strings"),
            Some(FilterUpdate::Palindrome(true))
        );
        assert_eq!(rule.evaluate("plain strings"), None);
    }

    #[test]
    fn test_longer_than_variants() {
        let rule = LengthRule::longer_than();
        assert_eq!(rule.evaluate("longer than 10"), Some(FilterUpdate::MinLength(11)));
        assert_eq!(
            rule.evaluate("more than 3 characters"),
            Some(FilterUpdate::MinLength(4))
        );
        assert_eq!(
            rule.evaluate("more than 1 character"),
            Some(FilterUpdate::MinLength(2))
        );
        // "more than N" needs the word "character"
        assert_eq!(rule.evaluate("more than 3 words"), None);
        assert_eq!(rule.evaluate("longer than ten"), None);
    }

    #[test]
    fn test_shorter_than_variants() {
        let rule = LengthRule::shorter_than();
        assert_eq!(rule.evaluate("shorter than 5"), Some(FilterUpdate::MaxLength(4)));
        assert_eq!(
            rule.evaluate("less than 2 characters"),
            Some(FilterUpdate::MaxLength(1))
        );
        assert_eq!(rule.evaluate("shorter than 0"), Some(FilterUpdate::MaxLength(-1)));
    }

    #[test]
    fn test_oversized_length_saturates() {
        let longer = LengthRule::longer_than();
        assert_eq!(
            longer.evaluate("longer than 99999999999999999999999"),
            Some(FilterUpdate::MinLength(i64::MAX))
        );
        assert_eq!(
            longer.evaluate(&format!("longer than {}", i64::MAX)),
            Some(FilterUpdate::MinLength(i64::MAX))
        );

        let shorter = LengthRule::shorter_than();
        assert_eq!(
            shorter.evaluate("shorter than 99999999999999999999"),
            Some(FilterUpdate::MaxLength(i64::MAX - 1))
        );
    }

    #[test]
    fn test_only_ascii_digits_are_numbers() {
        let rule = LengthRule::longer_than();
        assert_eq!(rule.evaluate("longer than \u{665}"), None);
        assert_eq!(
            rule.evaluate("longer than \u{665} or more than 3 characters"),
            Some(FilterUpdate::MinLength(4))
        );
    }

    #[test]
    fn test_letter_rule_phrasings() {
        let rule = LetterRule::new();
        for text in [
            "containing the letter z",
            "contains the letter z",
            "contains letter z",
            "strings that contain the letter z",
        ] {
            assert_eq!(
                rule.evaluate(text),
                Some(FilterUpdate::ContainsCharacter('z')),
                "{text}"
            );
        }
        assert_eq!(rule.evaluate("containing the letter 7"), None);
    }

    #[test]
    fn test_update_overrides_existing_value() {
        let mut filter = StructuredFilter::new().with_contains_character('z');
        FilterUpdate::ContainsCharacter('a').apply(&mut filter);
        assert_eq!(filter.contains_character, Some('a'));
    }

    #[test]
    fn test_default_rule_order() {
        let names: Vec<_> = default_rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "palindrome",
                "single_word",
                "longer_than",
                "shorter_than",
                "contains_letter",
                "first_vowel"
            ]
        );
    }
}
