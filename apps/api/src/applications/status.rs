use crate::models::application::ApplicationStatus;

/// Status changes a recruiter may make but that usually indicate a mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusualTransition {
    LeavesAbsorbing,
    LeavesHired,
    Backwards,
}

impl UnusualTransition {
    pub fn describe(self) -> &'static str {
        match self {
            UnusualTransition::LeavesAbsorbing => "reopens a closed application",
            UnusualTransition::LeavesHired => "moves a hired applicant out of HIRED",
            UnusualTransition::Backwards => "moves backwards in the pipeline",
        }
    }
}

/// Every transition is allowed; this only classifies the odd ones.
pub fn classify(from: ApplicationStatus, to: ApplicationStatus) -> Option<UnusualTransition> {
    if from == to {
        return None;
    }
    if from.is_absorbing() {
        return Some(UnusualTransition::LeavesAbsorbing);
    }
    if from == ApplicationStatus::Hired {
        return Some(UnusualTransition::LeavesHired);
    }
    match (from.stage(), to.stage()) {
        (Some(a), Some(b)) if b < a => Some(UnusualTransition::Backwards),
        _ => None,
    }
}
