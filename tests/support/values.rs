use std::convert::Infallible;
use std::str::FromStr;

use tzshift::scope::ScopeKind;

/// Removes one pair of enclosing double quotes, keeping any quotes inside.
fn unquote(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Quoted text supplied via a step.
#[derive(Clone, Debug)]
pub struct StepText(String);

impl FromStr for StepText {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(unquote(input).to_owned()))
    }
}

impl StepText {
    /// Consumes the step value, yielding the unquoted string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Quoted, comma-separated list supplied via a step.
///
/// Entries are kept verbatim apart from surrounding whitespace so that
/// duplicates and sentinel spellings reach the engine untouched.
#[derive(Clone, Debug)]
pub struct StepList(Vec<String>);

impl FromStr for StepList {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let inner = unquote(input);
        if inner.is_empty() {
            return Ok(Self(Vec::new()));
        }
        Ok(Self(inner.split(',').map(|entry| entry.trim().to_owned()).collect()))
    }
}

impl StepList {
    /// Consumes the step value, yielding the entries.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Scope name supplied via a step.
#[derive(Clone, Copy, Debug)]
pub struct StepScope(ScopeKind);

impl FromStr for StepScope {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "function" => Ok(Self(ScopeKind::Function)),
            "suite" => Ok(Self(ScopeKind::Suite)),
            "module" => Ok(Self(ScopeKind::Module)),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

impl StepScope {
    /// Consumes the step value, yielding the scope kind.
    pub const fn into_inner(self) -> ScopeKind {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"UTC\"", "UTC")]
    #[case("UTC", "UTC")]
    #[case(
        "\"tzshift: ignoring unavailable locales: 'Nonexistent'\"",
        "tzshift: ignoring unavailable locales: 'Nonexistent'"
    )]
    #[case("\"'quoted'\"", "'quoted'")]
    fn strips_one_enclosing_pair(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unquote(input), expected);
    }
}
