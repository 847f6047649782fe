//! Ordered rule tables.
//!
//! Priorities, tags, action labels and achievements are all expressed as
//! small tables of `(predicate, outcome)` pairs evaluated top to bottom, so the
//! ordering can be read and tested rule by rule.

/// A single named predicate with the outcome it yields when it holds.
pub struct Rule<I, O> {
    pub name: &'static str,
    pub when: fn(&I) -> bool,
    pub then: O,
}

/// Returns the outcome of the first rule whose predicate holds.
pub fn first_match<'a, I, O>(rules: &'a [Rule<I, O>], input: &I) -> Option<&'a O> {
    let rule = rules.iter().find(|rule| (rule.when)(input))?;
    log::trace!("rule `{}` matched", rule.name);
    Some(&rule.then)
}

/// Returns the outcomes of every rule whose predicate holds, in table order.
pub fn all_matches<'a, I, O>(
    rules: &'a [Rule<I, O>],
    input: &'a I,
) -> impl Iterator<Item = &'a O> + 'a {
    rules
        .iter()
        .filter(move |rule| (rule.when)(input))
        .map(|rule| &rule.then)
}

/// Matches when every keyword occurs in an already lower-cased text.
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub label: &'static str,
}

impl KeywordRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().all(|keyword| lowered.contains(keyword))
    }
}

/// Label of the first keyword rule matching `lowered`.
pub fn first_keyword_match(rules: &[KeywordRule], lowered: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| rule.matches(lowered))
        .map(|rule| rule.label)
}
