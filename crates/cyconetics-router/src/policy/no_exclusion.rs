//! "No exclusion" invariant for non-stimulation topics.
//!
//! Documentation-class requests at or under the risk ceiling must not be
//! denied because of an object-level validator issue. The violation is still
//! reported; only `allowed` changes.

use cyconetics_core::ksr::NormalizedScore;
use cyconetics_core::protocol::TopicType;

use super::PolicyLimits;

pub struct NoExclusionPolicy<'a> {
    limits: &'a PolicyLimits,
}

impl<'a> NoExclusionPolicy<'a> {
    pub fn new(limits: &'a PolicyLimits) -> Self {
        Self { limits }
    }

    pub fn force_allow(&self, topic: TopicType, normalized_risk: NormalizedScore) -> bool {
        match topic {
            TopicType::NonStimulationDocs => !self.limits.exceeds_ceiling(normalized_risk),
            TopicType::Other => false,
        }
    }
}
