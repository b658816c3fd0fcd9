use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::parse::operation::HttpMethod;
use crate::parse::spec::SwaggerSpec;

/// Identity of an operation inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationRef {
    pub url: String,
    pub method: HttpMethod,
}

impl OperationRef {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
        }
    }
}

/// Operations keyed by tag, in first-seen tag order.
pub type GroupedOperations = IndexMap<String, Vec<OperationRef>>;

/// Partition operations by tag, walking paths and methods in document order.
///
/// An operation with several tags lands in each of their groups. Untagged
/// operations are left out entirely.
pub fn group_by_tag(spec: &SwaggerSpec) -> GroupedOperations {
    let mut groups = GroupedOperations::new();

    for (url, item) in &spec.paths {
        for (method, op) in &item.operations {
            if op.tags.is_empty() {
                debug!("skipping untagged operation {method} {url}");
                continue;
            }
            for tag in &op.tags {
                let group = groups.entry(tag.clone()).or_default();
                let op_ref = OperationRef::new(url.as_str(), *method);
                // A tag listed twice on one operation still yields one entry.
                if group.last() != Some(&op_ref) {
                    group.push(op_ref);
                }
            }
        }
    }

    groups
}

/// Total number of operation references across all groups.
pub fn operation_count(groups: &GroupedOperations) -> usize {
    groups.values().map(Vec::len).sum()
}
