//! Per-scope overrides attached to tests.
//!
//! A test sits inside nested scopes: the function itself, an enclosing suite
//! and the containing module. Each scope may carry [`Directive`]s that replace
//! the session's candidate lists or switch parametrisation off. A
//! [`TestNode`] records those scopes innermost first, which is the order
//! [`collect_overrides`] folds them in.

use std::fmt;

/// Where a directive was attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The test function itself.
    Function,
    /// A group of tests, such as a suite or a `mod tests` block.
    Suite,
    /// The containing module or test binary.
    Module,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => formatter.write_str("function"),
            Self::Suite => formatter.write_str("suite"),
            Self::Module => formatter.write_str("module"),
        }
    }
}

/// Override attached to one scope.
///
/// # Examples
///
/// ```
/// use tzshift::scope::Directive;
///
/// let directive = Directive::new().timezones(["UTC"]).locales(["C", "SYSTEM"]);
/// assert_eq!(directive.timezone_override(), Some(&["UTC".to_owned()][..]));
/// assert!(!directive.is_disable());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directive {
    timezones: Option<Vec<String>>,
    locales: Option<Vec<String>>,
    disable: bool,
}

impl Directive {
    /// Creates a directive that overrides nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directive that switches parametrisation off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disable: true,
            ..Self::default()
        }
    }

    /// Replaces the time-zone candidates for this scope.
    #[must_use]
    pub fn timezones<I>(mut self, timezones: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.timezones = Some(timezones.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the locale candidates for this scope.
    #[must_use]
    pub fn locales<I>(mut self, locales: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    /// Sets or clears the disable flag.
    #[must_use]
    pub const fn disable(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    /// The time-zone override, if any.
    #[must_use]
    pub fn timezone_override(&self) -> Option<&[String]> {
        self.timezones.as_deref()
    }

    /// The locale override, if any.
    #[must_use]
    pub fn locale_override(&self) -> Option<&[String]> {
        self.locales.as_deref()
    }

    /// Whether this directive disables parametrisation.
    #[must_use]
    pub const fn is_disable(&self) -> bool {
        self.disable
    }
}

/// One scope enclosing a test, with its directives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    kind: ScopeKind,
    directives: Vec<Directive>,
}

impl Scope {
    /// Creates a scope of `kind` carrying `directives`.
    #[must_use]
    pub const fn new(kind: ScopeKind, directives: Vec<Directive>) -> Self {
        Self { kind, directives }
    }

    /// The kind of scope.
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Directives attached to this scope, in declaration order.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

/// A collected test and the scopes around it, innermost first.
///
/// # Examples
///
/// ```
/// use tzshift::scope::{Directive, ScopeKind, TestNode};
///
/// let node = TestNode::new("formats_dates")
///     .with_directive(ScopeKind::Function, Directive::new().timezones(["UTC"]))
///     .with_directive(ScopeKind::Module, Directive::new().timezones(["Asia/Tokyo"]));
/// assert_eq!(node.directives().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestNode {
    name: String,
    scopes: Vec<Scope>,
}

impl TestNode {
    /// Creates a node with no directives.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: Vec::new(),
        }
    }

    /// Attaches `directive` to the scope of `kind`, creating it if needed.
    ///
    /// Scopes are kept ordered function, suite, module regardless of the
    /// order in which directives are attached.
    #[must_use]
    pub fn with_directive(mut self, kind: ScopeKind, directive: Directive) -> Self {
        if let Some(scope) = self.scopes.iter_mut().find(|scope| scope.kind == kind) {
            scope.directives.push(directive);
        } else {
            self.scopes.push(Scope::new(kind, vec![directive]));
            self.scopes.sort_by_key(|scope| nesting_depth(scope.kind));
        }
        self
    }

    /// The test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scopes around the test, innermost first.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Every directive, innermost scope first.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.scopes.iter().flat_map(|scope| scope.directives.iter())
    }
}

const fn nesting_depth(kind: ScopeKind) -> u8 {
    match kind {
        ScopeKind::Function => 0,
        ScopeKind::Suite => 1,
        ScopeKind::Module => 2,
    }
}

/// Result of folding a test's directives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Whether any scope disabled parametrisation.
    pub disable: bool,
    /// Innermost time-zone override, if any.
    pub timezones: Option<Vec<String>>,
    /// Innermost locale override, if any.
    pub locales: Option<Vec<String>>,
}

/// Folds directives given innermost first.
///
/// The first override seen for each dimension wins; outer values for that
/// dimension are ignored. A disable anywhere sets [`Overrides::disable`].
pub fn collect_overrides<'a, I>(directives: I) -> Overrides
where
    I: IntoIterator<Item = &'a Directive>,
{
    directives
        .into_iter()
        .fold(Overrides::default(), |mut folded, directive| {
            folded.disable |= directive.disable;
            if folded.timezones.is_none() {
                folded.timezones.clone_from(&directive.timezones);
            }
            if folded.locales.is_none() {
                folded.locales.clone_from(&directive.locales);
            }
            folded
        })
}
