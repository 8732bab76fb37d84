use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Lifecycle: upcoming may become completed or cancelled; both of those
    /// are terminal. Re-asserting the current status is accepted as a no-op.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self == next || self == AppointmentStatus::Upcoming
    }
}

/// Delivery channel for a consultation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentKind {
    Video,
    Phone,
    InPerson,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub kind: AppointmentKind,
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: AppointmentKind,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl InsertAppointment {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.patient_id == self.doctor_id {
            return Err(ModelError::Validation(
                "patient and doctor must be distinct users".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions() {
        use AppointmentStatus::*;
        assert!(Upcoming.can_transition_to(Completed));
        assert!(Upcoming.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Upcoming));
        assert!(!Cancelled.can_transition_to(Completed));
    }

    #[test]
    fn kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentKind::InPerson).unwrap(),
            "\"in-person\""
        );
        assert_eq!(serde_json::to_string(&AppointmentKind::Video).unwrap(), "\"video\"");
    }

    #[test]
    fn rejects_self_appointment() {
        let input = InsertAppointment {
            patient_id: 7,
            doctor_id: 7,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            kind: AppointmentKind::Video,
            specialty: None,
            location: None,
        };
        assert!(input.validate().is_err());
    }
}
