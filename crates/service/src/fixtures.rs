//! Demo fixture data for local runs: one doctor, three patients, and the
//! appointments the demo front end expects (two upcoming, one completed).

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use models::appointment::{AppointmentKind, AppointmentStatus, InsertAppointment};
use models::document::InsertDocument;
use models::message::InsertMessage;
use models::user::{InsertUser, UserRole};

use crate::errors::ServiceError;
use crate::storage::Storage;

pub async fn seed_demo(storage: &dyn Storage) -> Result<(), ServiceError> {
    if storage.get_user_by_email("sarah.morgan@example.com").await.is_some() {
        info!("demo data already seeded");
        return Ok(());
    }

    let doctor = storage
        .create_user(InsertUser {
            email: "sarah.morgan@example.com".into(),
            name: "Dr. Sarah Morgan".into(),
            role: UserRole::Doctor,
            specialty: Some("General Medicine".into()),
        })
        .await?;
    let john = storage
        .create_user(InsertUser {
            email: "john.smith@example.com".into(),
            name: "John Smith".into(),
            role: UserRole::Patient,
            specialty: None,
        })
        .await?;
    let mary = storage
        .create_user(InsertUser {
            email: "mary.johnson@example.com".into(),
            name: "Mary Johnson".into(),
            role: UserRole::Patient,
            specialty: None,
        })
        .await?;
    let robert = storage
        .create_user(InsertUser {
            email: "robert.brown@example.com".into(),
            name: "Robert Brown".into(),
            role: UserRole::Patient,
            specialty: None,
        })
        .await?;

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("fixture date");
    let time = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("fixture time");

    storage
        .create_appointment(InsertAppointment {
            patient_id: john.id,
            doctor_id: doctor.id,
            date: date(2024, 1, 15),
            time: time(10, 0),
            kind: AppointmentKind::Video,
            specialty: Some("General Medicine".into()),
            location: None,
        })
        .await?;
    storage
        .create_appointment(InsertAppointment {
            patient_id: mary.id,
            doctor_id: doctor.id,
            date: date(2024, 1, 15),
            time: time(14, 30),
            kind: AppointmentKind::Video,
            specialty: Some("Cardiology".into()),
            location: None,
        })
        .await?;
    let past = storage
        .create_appointment(InsertAppointment {
            patient_id: robert.id,
            doctor_id: doctor.id,
            date: date(2024, 1, 10),
            time: time(9, 0),
            kind: AppointmentKind::Video,
            specialty: Some("General Medicine".into()),
            location: None,
        })
        .await?;
    storage.update_appointment_status(past.id, AppointmentStatus::Completed).await?;

    storage
        .create_message(InsertMessage {
            sender_id: doctor.id,
            recipient_id: robert.id,
            body: "Thanks for coming in. Your results look good.".into(),
        })
        .await?;
    storage
        .create_message(InsertMessage {
            sender_id: robert.id,
            recipient_id: doctor.id,
            body: "Great, thank you doctor!".into(),
        })
        .await?;
    storage
        .create_document(InsertDocument {
            owner_id: robert.id,
            title: "Visit summary 2024-01-10".into(),
            file_name: "visit-summary.pdf".into(),
            content_type: "application/pdf".into(),
            size_bytes: Some(102_400),
        })
        .await?;

    info!("demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FileSessionStore;
    use crate::storage::MemStorage;

    #[tokio::test]
    async fn seeding_is_idempotent() -> anyhow::Result<()> {
        let path =
            std::env::temp_dir().join(format!("doctaba_seed_{}.json", uuid::Uuid::new_v4()));
        let sessions = FileSessionStore::new(&path, 3600).await?;
        let storage = MemStorage::new(sessions);

        seed_demo(storage.as_ref()).await?;
        seed_demo(storage.as_ref()).await?;

        assert_eq!(storage.all_users().await.len(), 4);
        let doctor = storage.get_user_by_email("sarah.morgan@example.com").await.unwrap();
        let listed = storage.appointments_for(doctor.id, UserRole::Doctor).await;
        assert_eq!(listed.len(), 3);
        assert_eq!(
            listed.iter().filter(|a| a.status == AppointmentStatus::Upcoming).count(),
            2
        );

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
