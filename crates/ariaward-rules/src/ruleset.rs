//! The ordered rule set.

use std::sync::Arc;

use tracing::debug;

use crate::global::{DialogRule, LandmarkRule, StickyHeaderRule, TabIndexRule, TabListRule};
use crate::local::{ClickableRule, DropdownRule, FormLabelRule, IconLabelRule, SliderRule};
use crate::rule::{EnhancementRule, RuleScope};

/// Rules in registration order. Order is the execution order within a pass.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn EnhancementRule>>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rules.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(IconLabelRule)
            .with_rule(ClickableRule)
            .with_rule(FormLabelRule)
            .with_rule(DropdownRule)
            .with_rule(SliderRule)
            .with_rule(LandmarkRule)
            .with_rule(TabListRule)
            .with_rule(DialogRule)
            .with_rule(StickyHeaderRule)
            .with_rule(TabIndexRule)
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: impl EnhancementRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Drop rules by name. Unknown names are ignored.
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.rules.retain(|rule| {
            let keep = !names.iter().any(|n| n.as_ref() == rule.name());
            if !keep {
                debug!(rule = rule.name(), "Rule disabled");
            }
            keep
        });
        self
    }

    /// Local rules, in order.
    pub fn local(&self) -> impl Iterator<Item = &Arc<dyn EnhancementRule>> {
        self.scoped(RuleScope::Local)
    }

    /// Global rules, in order.
    pub fn global(&self) -> impl Iterator<Item = &Arc<dyn EnhancementRule>> {
        self.scoped(RuleScope::Global)
    }

    fn scoped(&self, scope: RuleScope) -> impl Iterator<Item = &Arc<dyn EnhancementRule>> {
        self.rules.iter().filter(move |rule| rule.scope() == scope)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet").field("rules", &self.names()).finish()
    }
}
