use serde::{Deserialize, Serialize};

use crate::check_kind::CheckKind;
use crate::rule::Rule;

/// Ordered set of rules making up one batch job.
///
/// Order is significant: the reviewer lists and runs checks in document
/// order, which is the order of the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJobDocument {
    rules: Vec<Rule>,
}

impl BatchJobDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules per check kind, in catalog order.
    pub fn kind_counts(&self) -> Vec<(CheckKind, usize)> {
        CheckKind::ALL
            .into_iter()
            .map(|kind| (kind, self.rules.iter().filter(|r| r.kind() == kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

impl FromIterator<Rule> for BatchJobDocument {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BatchJobDocument {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
