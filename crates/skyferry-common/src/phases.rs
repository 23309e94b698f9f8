//! Ferry flight workflow phases.
//!
//! A flight moves through seven phases in a fixed order. Each phase owns a
//! small set of status strings; the status stored on a flight is always a
//! member of exactly one phase.
//!
//! ```text
//! documentation → inspection → faa_review → permit_approval → scheduled → in_flight → completed
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FerryError;

/// A phase of the ferry flight workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Documentation,
    Inspection,
    FaaReview,
    PermitApproval,
    Scheduled,
    InFlight,
    Completed,
}

impl Phase {
    /// All phases in workflow order.
    pub const ALL: [Phase; 7] = [
        Phase::Documentation,
        Phase::Inspection,
        Phase::FaaReview,
        Phase::PermitApproval,
        Phase::Scheduled,
        Phase::InFlight,
        Phase::Completed,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Phase::Documentation => "documentation",
            Phase::Inspection => "inspection",
            Phase::FaaReview => "faa_review",
            Phase::PermitApproval => "permit_approval",
            Phase::Scheduled => "scheduled",
            Phase::InFlight => "in_flight",
            Phase::Completed => "completed",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Documentation => "Documentation",
            Phase::Inspection => "Inspection",
            Phase::FaaReview => "FAA Review",
            Phase::PermitApproval => "Permit Approval",
            Phase::Scheduled => "Scheduled",
            Phase::InFlight => "In Flight",
            Phase::Completed => "Completed",
        }
    }

    /// 1-based position in the workflow.
    pub fn index(self) -> usize {
        self as usize + 1
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.index()).copied()
    }

    /// Statuses owned by this phase, in the order a flight normally visits them.
    pub fn statuses(self) -> &'static [FlightStatus] {
        use FlightStatus::*;
        match self {
            Phase::Documentation => &[Draft, PendingDocuments, DocumentsComplete],
            Phase::Inspection => &[PendingInspection, InspectionScheduled, InspectionComplete],
            Phase::FaaReview => &[PendingFaa, FaaSubmitted, FaaQuestions],
            Phase::PermitApproval => &[FaaApproved, PermitIssued],
            Phase::Scheduled => &[Scheduled, ReadyForDeparture],
            Phase::InFlight => &[InFlight],
            Phase::Completed => &[Completed],
        }
    }

    /// The status a flight lands in when it first enters this phase.
    pub fn entry_status(self) -> FlightStatus {
        self.statuses()[0]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Phase {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| FerryError::Validation {
                message: format!("Unknown phase '{s}'"),
            })
    }
}

/// Every status a ferry flight can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Draft,
    PendingDocuments,
    DocumentsComplete,
    PendingInspection,
    InspectionScheduled,
    InspectionComplete,
    PendingFaa,
    FaaSubmitted,
    FaaQuestions,
    FaaApproved,
    PermitIssued,
    Scheduled,
    ReadyForDeparture,
    InFlight,
    Completed,
}

impl FlightStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightStatus::Draft => "draft",
            FlightStatus::PendingDocuments => "pending_documents",
            FlightStatus::DocumentsComplete => "documents_complete",
            FlightStatus::PendingInspection => "pending_inspection",
            FlightStatus::InspectionScheduled => "inspection_scheduled",
            FlightStatus::InspectionComplete => "inspection_complete",
            FlightStatus::PendingFaa => "pending_faa",
            FlightStatus::FaaSubmitted => "faa_submitted",
            FlightStatus::FaaQuestions => "faa_questions",
            FlightStatus::FaaApproved => "faa_approved",
            FlightStatus::PermitIssued => "permit_issued",
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::ReadyForDeparture => "ready_for_departure",
            FlightStatus::InFlight => "in_flight",
            FlightStatus::Completed => "completed",
        }
    }

    /// The phase that owns this status.
    pub fn phase(self) -> Phase {
        Phase::ALL
            .into_iter()
            .find(|p| p.statuses().contains(&self))
            .unwrap_or(Phase::Documentation)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .flat_map(|p| p.statuses().iter().copied())
            .find(|st| st.as_str() == s)
            .ok_or_else(|| FerryError::Validation {
                message: format!("Unknown flight status '{s}'"),
            })
    }
}

/// Look up the phase a raw status string belongs to.
pub fn phase_for_status(status: &str) -> Option<Phase> {
    status.parse::<FlightStatus>().ok().map(FlightStatus::phase)
}

/// Where a flight sits in the workflow, for progress displays.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub label: &'static str,
    pub index: usize,
    pub total: usize,
    pub percent: u8,
}

/// Compute progress for a status string. Unknown statuses yield `None`.
pub fn progress(status: &str) -> Option<PhaseProgress> {
    let phase = phase_for_status(status)?;
    let total = Phase::ALL.len();
    let percent = if phase == Phase::Completed {
        100
    } else {
        ((phase.index() - 1) * 100 / (total - 1)) as u8
    };
    Some(PhaseProgress {
        phase,
        label: phase.label(),
        index: phase.index(),
        total,
        percent,
    })
}

/// Validate a status change.
///
/// Completed flights are terminal. Otherwise a flight may move to any status
/// in an earlier phase, its current phase, or the immediately following phase.
pub fn check_transition(from: FlightStatus, to: FlightStatus) -> Result<(), FerryError> {
    let reject = || FerryError::InvalidTransition {
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
    };

    if from == to {
        return Err(reject());
    }

    let current = from.phase();
    if current == Phase::Completed {
        return Err(reject());
    }

    let target = to.phase();
    if target <= current || current.next() == Some(target) {
        Ok(())
    } else {
        Err(reject())
    }
}

/// Serializable view of one row of the phase table.
#[derive(Debug, Serialize)]
pub struct PhaseDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub index: usize,
    pub statuses: Vec<&'static str>,
}

/// The full phase table, in workflow order.
pub fn definitions() -> Vec<PhaseDefinition> {
    Phase::ALL
        .into_iter()
        .map(|p| PhaseDefinition {
            key: p.key(),
            label: p.label(),
            index: p.index(),
            statuses: p.statuses().iter().map(|s| s.as_str()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seven_phases_in_order() {
        assert_eq!(Phase::ALL.len(), 7);
        for (i, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i + 1);
        }
        assert_eq!(Phase::Documentation.next(), Some(Phase::Inspection));
        assert_eq!(Phase::InFlight.next(), Some(Phase::Completed));
        assert_eq!(Phase::Completed.next(), None);
    }

    #[test]
    fn every_status_belongs_to_exactly_one_phase() {
        let mut seen = HashSet::new();
        for phase in Phase::ALL {
            for status in phase.statuses() {
                assert!(seen.insert(*status), "{status} listed twice");
                assert_eq!(status.phase(), phase);
            }
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn lookup_by_string() {
        assert_eq!(phase_for_status("draft"), Some(Phase::Documentation));
        assert_eq!(phase_for_status("faa_questions"), Some(Phase::FaaReview));
        assert_eq!(phase_for_status("permit_issued"), Some(Phase::PermitApproval));
        assert_eq!(phase_for_status("in_flight"), Some(Phase::InFlight));
        assert_eq!(phase_for_status("cancelled"), None);
        assert_eq!(phase_for_status(""), None);
    }

    #[test]
    fn status_strings_round_trip_through_serde() {
        let json = serde_json::to_string(&FlightStatus::ReadyForDeparture).unwrap();
        assert_eq!(json, "\"ready_for_departure\"");
        assert_eq!(
            "ready_for_departure".parse::<FlightStatus>().unwrap(),
            FlightStatus::ReadyForDeparture
        );
    }

    #[test]
    fn labels() {
        assert_eq!(Phase::FaaReview.label(), "FAA Review");
        assert_eq!("permit_approval".parse::<Phase>().unwrap(), Phase::PermitApproval);
        assert!("takeoff".parse::<Phase>().is_err());
    }

    #[test]
    fn progress_percentages() {
        let start = progress("draft").unwrap();
        assert_eq!(start.index, 1);
        assert_eq!(start.percent, 0);

        let review = progress("faa_submitted").unwrap();
        assert_eq!(review.index, 3);
        assert_eq!(review.percent, 33);

        assert_eq!(progress("completed").unwrap().percent, 100);
        assert!(progress("bogus").is_none());
    }

    #[test]
    fn forward_by_one_phase_is_allowed() {
        use FlightStatus::*;
        assert!(check_transition(Draft, PendingDocuments).is_ok());
        assert!(check_transition(DocumentsComplete, PendingInspection).is_ok());
        assert!(check_transition(PermitIssued, Scheduled).is_ok());
        assert!(check_transition(InFlight, Completed).is_ok());
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        use FlightStatus::*;
        assert!(check_transition(Draft, PendingFaa).is_err());
        assert!(check_transition(InspectionComplete, Scheduled).is_err());
        assert!(check_transition(Scheduled, Completed).is_err());
    }

    #[test]
    fn moving_back_is_allowed() {
        use FlightStatus::*;
        assert!(check_transition(FaaQuestions, PendingDocuments).is_ok());
        assert!(check_transition(Scheduled, PendingInspection).is_ok());
    }

    #[test]
    fn completed_is_terminal() {
        use FlightStatus::*;
        assert!(check_transition(Completed, InFlight).is_err());
        assert!(check_transition(Completed, Draft).is_err());
    }

    #[test]
    fn same_status_is_rejected() {
        assert!(check_transition(FlightStatus::Draft, FlightStatus::Draft).is_err());
    }

    #[test]
    fn definitions_cover_all_statuses() {
        let defs = definitions();
        assert_eq!(defs.len(), 7);
        assert_eq!(defs[3].key, "permit_approval");
        assert_eq!(defs.iter().map(|d| d.statuses.len()).sum::<usize>(), 15);
    }
}
