//! Label trie over a home FQDN and its partner domains.
//!
//! Built once per Home-SP through [`DomainMatcherBuilder`] and frozen into a
//! [`DomainMatcher`] that only offers read access, so one matcher can serve
//! concurrent lookups.

use std::collections::HashMap;
use std::fmt;

/// Classification of a domain against a Home-SP's domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainMatch {
    None,
    /// The home FQDN
    Primary,
    /// One of the other home partners
    Secondary,
}

/// Trie node: the classification of the path ending here, and its child labels
#[derive(Debug, Clone, Default)]
struct Label {
    class: Option<DomainMatch>,
    children: HashMap<String, Label>,
}

impl Label {
    fn insert(&mut self, labels: &[String], class: DomainMatch) {
        match labels.split_first() {
            Some((name, rest)) => self
                .children
                .entry(name.clone())
                .or_default()
                .insert(rest, class),
            None => self.class = Some(class),
        }
    }

    fn fmt_children(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.children.keys().collect();
        names.sort();
        write!(f, "{{")?;
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
            let child = &self.children[name];
            if let Some(class) = child.class {
                write!(f, "={:?}", class)?;
            }
            if !child.children.is_empty() {
                write!(f, ".")?;
                child.fmt_children(f)?;
            }
        }
        write!(f, "}}")
    }
}

/// Mutable form of the trie, used while a profile is being loaded
#[derive(Debug, Clone, Default)]
pub struct DomainMatcherBuilder {
    root: Label,
}

impl DomainMatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label path; its classification replaces whatever was there.
    ///
    /// Paths sharing a prefix share nodes, and an entry never hides a longer one.
    pub fn insert(&mut self, labels: &[String], class: DomainMatch) -> &mut Self {
        if !labels.is_empty() {
            self.root.insert(labels, class);
        }
        self
    }

    pub fn build(self) -> DomainMatcher {
        DomainMatcher { root: self.root }
    }
}

/// Immutable domain trie
#[derive(Debug, Clone, Default)]
pub struct DomainMatcher {
    root: Label,
}

impl DomainMatcher {
    /// Build a matcher from label paths.
    ///
    /// Secondaries go in first so the primary overwrites an equally
    /// specific secondary entry.
    pub fn new(primary: &[String], secondaries: &[Vec<String>]) -> Self {
        let mut builder = DomainMatcherBuilder::new();
        for secondary in secondaries {
            builder.insert(secondary, DomainMatch::Secondary);
        }
        builder.insert(primary, DomainMatch::Primary);
        builder.build()
    }

    /// Build a matcher from domain names
    pub fn from_domains<S: AsRef<str>>(primary: &str, secondaries: &[S]) -> Self {
        let secondaries: Vec<Vec<String>> = secondaries
            .iter()
            .map(|d| super::split_domain(d.as_ref()))
            .collect();
        Self::new(&super::split_domain(primary), &secondaries)
    }

    /// Walk the trie along `labels`.
    ///
    /// Only a walk that consumes every label and ends on an inserted entry
    /// matches. A missing label, running out of labels early, or labels left
    /// over past an entry is no match.
    pub fn is_sub_domain<S: AsRef<str>>(&self, labels: &[S]) -> DomainMatch {
        let mut node = &self.root;
        for label in labels {
            match node.children.get(label.as_ref()) {
                Some(next) => node = next,
                None => return DomainMatch::None,
            }
        }
        node.class.unwrap_or(DomainMatch::None)
    }

    /// [`is_sub_domain`](Self::is_sub_domain) on an unsplit domain name
    pub fn matches(&self, domain: &str) -> DomainMatch {
        self.is_sub_domain(&super::split_domain(domain))
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

impl fmt::Display for DomainMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainMatcher")?;
        self.root.fmt_children(f)
    }
}
