//! Side-channel data that travels with an expression through the algebra.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaintainedKey {
    HardConstraint,
    SoftConstraint,
    HoboVarDict,
    HoboConstraint,
}

impl MaintainedKey {
    pub const ALL: [MaintainedKey; 4] = [
        MaintainedKey::HardConstraint,
        MaintainedKey::SoftConstraint,
        MaintainedKey::HoboVarDict,
        MaintainedKey::HoboConstraint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaintainedKey::HardConstraint => "hard_constraint",
            MaintainedKey::SoftConstraint => "soft_constraint",
            MaintainedKey::HoboVarDict => "hobo_var_dict",
            MaintainedKey::HoboConstraint => "hobo_constraint",
        }
    }
}

pub type Annotations = BTreeMap<MaintainedKey, BTreeMap<String, serde_json::Value>>;

/// Left entries first, right entries override on a name clash.
pub(crate) fn merge(left: &Option<Annotations>, right: &Option<Annotations>) -> Option<Annotations> {
    match (left, right) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(left), Some(right)) => {
            let mut merged = left.clone();
            for (key, entries) in right {
                merged
                    .entry(*key)
                    .or_default()
                    .extend(entries.iter().map(|(name, value)| (name.clone(), value.clone())));
            }
            Some(merged)
        }
    }
}
