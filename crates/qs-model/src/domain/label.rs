use std::collections::BTreeSet;

/// A single `key:value` dimension string, as advertised by a bot or requested by a task.
pub type Label = String;

/// Ordered set of labels.
///
/// A `BTreeSet` keeps iteration deterministic, which keeps digests and test output stable.
pub type LabelSet = BTreeSet<Label>;
