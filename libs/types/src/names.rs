//! Player identifier canonicalization
//!
//! Every upstream title decorates account names in its own dialect: a
//! platform suffix after a space (`"PlayerOne PS4"`), a hex account prefix
//! joined with a dash (`"fffff7fb-ZoniBoy0"`), or a bare fixed-width hex
//! prefix. A [`NamePolicy`] is the ordered list of [`NameRule`]s one source
//! applies to turn a raw identifier into a display name.
//!
//! Normalization is pure and total. Rules are re-applied until the value
//! stops changing, so `normalize(normalize(x)) == normalize(x)` holds for
//! every input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One or more `<hex>-` segments at the start of an identifier
static HEX_DASH_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:[0-9a-f]+-)+").expect("hex-dash prefix pattern"));

/// Fixed-width hex account prefix without a separator
static HEX_FIXED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[0-9a-f]{8}").expect("hex prefix pattern"));

/// A single decoration-stripping rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRule {
    /// Keep everything before the first whitespace (platform suffix removal)
    TruncateAtWhitespace,
    /// Remove leading `^([0-9a-f]+-)+` account prefixes
    StripHexDashPrefix,
    /// Remove an 8-digit hex prefix that has no dash, when a name follows it
    StripHexPrefix,
}

impl NameRule {
    fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            NameRule::TruncateAtWhitespace => value.split_whitespace().next().unwrap_or(""),
            NameRule::StripHexDashPrefix => match HEX_DASH_PREFIX.find(value) {
                Some(m) => &value[m.end()..],
                None => value,
            },
            NameRule::StripHexPrefix => match HEX_FIXED_PREFIX.find(value) {
                Some(m) => {
                    let rest = &value[m.end()..];
                    if rest.trim().is_empty() || rest.starts_with('-') {
                        value
                    } else {
                        rest
                    }
                }
                None => value,
            },
        }
    }
}

/// Ordered set of rules used by one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamePolicy {
    rules: Vec<NameRule>,
}

impl NamePolicy {
    /// Build a policy from rules applied in the given order
    pub fn new(rules: impl Into<Vec<NameRule>>) -> Self {
        Self {
            rules: rules.into(),
        }
    }

    /// Rules in application order
    pub fn rules(&self) -> &[NameRule] {
        &self.rules
    }

    /// Canonicalize a raw identifier. Returns an empty string for unknown players.
    pub fn normalize(&self, raw: &str) -> String {
        normalize_name(raw, &self.rules)
    }

    /// Canonicalize a raw identifier, dropping names that normalize to nothing
    pub fn normalize_opt(&self, raw: &str) -> Option<String> {
        let name = self.normalize(raw);
        (!name.is_empty()).then_some(name)
    }

    /// Normalize every entry, dropping unknown players and keeping order
    pub fn normalize_all<'a, I>(&self, raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        raw.into_iter()
            .filter_map(|name| self.normalize_opt(name))
            .collect()
    }
}

/// Apply `rules` to `raw` until a fixpoint is reached.
///
/// Falls back to the trimmed input when no rule matches.
pub fn normalize_name(raw: &str, rules: &[NameRule]) -> String {
    let mut current = raw.trim();

    // Every rule yields a substring, so each productive pass shrinks the value.
    loop {
        let next = rules
            .iter()
            .fold(current, |value, rule| rule.apply(value).trim());
        if next == current {
            break;
        }
        current = next;
    }

    current.to_string()
}
