use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use models::appointment::{Appointment, AppointmentStatus, InsertAppointment};
use models::document::{Document, InsertDocument};
use models::message::{InsertMessage, Message};
use models::user::{InsertUser, UpsertUser, User, UserRole};

use crate::errors::ServiceError;
use crate::session::FileSessionStore;
use crate::storage::Storage;

/// In-memory storage adapter. All entity maps and id counters live behind a
/// single lock, so every operation completes without interleaving mutations.
pub struct MemStorage {
    state: RwLock<MemState>,
    sessions: Arc<FileSessionStore>,
}

#[derive(Default)]
struct MemState {
    users: HashMap<i64, User>,
    appointments: HashMap<i64, Appointment>,
    messages: HashMap<i64, Message>,
    documents: HashMap<i64, Document>,
    user_seq: i64,
    appointment_seq: i64,
    message_seq: i64,
    document_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl MemStorage {
    pub fn new(sessions: Arc<FileSessionStore>) -> Arc<Self> {
        Arc::new(Self { state: RwLock::new(MemState::default()), sessions })
    }
}

#[async_trait::async_trait]
impl Storage for MemStorage {
    fn session_store(&self) -> Arc<FileSessionStore> {
        Arc::clone(&self.sessions)
    }

    async fn get_user(&self, id: i64) -> Option<User> {
        let state = self.state.read().await;
        state.users.get(&id).cloned()
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let state = self.state.read().await;
        state.users.values().find(|u| u.email == email).cloned()
    }

    async fn all_users(&self) -> Vec<User> {
        let state = self.state.read().await;
        state.users.values().cloned().collect()
    }

    async fn create_user(&self, input: InsertUser) -> Result<User, ServiceError> {
        input.validate()?;
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(ServiceError::Validation("email already registered".into()));
        }
        let now = Utc::now();
        let id = next_id(&mut state.user_seq);
        let user = User {
            id,
            email: input.email,
            name: input.name,
            role: input.role,
            specialty: input.specialty,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());
        debug!(user_id = id, "user created");
        Ok(user)
    }

    async fn upsert_user(&self, input: UpsertUser) -> Result<User, ServiceError> {
        input.validate()?;
        let mut state = self.state.write().await;
        let existing_id =
            state.users.values().find(|u| u.email == input.email).map(|u| u.id);
        let user = match existing_id {
            Some(id) => {
                let user = state.users.get_mut(&id).expect("id resolved under lock");
                user.name = input.name;
                if let Some(role) = input.role {
                    user.role = role;
                }
                if input.specialty.is_some() {
                    user.specialty = input.specialty;
                }
                user.updated_at = Utc::now();
                user.clone()
            }
            None => {
                let now = Utc::now();
                let id = next_id(&mut state.user_seq);
                let user = User {
                    id,
                    email: input.email,
                    name: input.name,
                    role: input.role.unwrap_or(UserRole::Patient),
                    specialty: input.specialty,
                    created_at: now,
                    updated_at: now,
                };
                state.users.insert(id, user.clone());
                user
            }
        };
        Ok(user)
    }

    async fn appointments_for(&self, user_id: i64, role: UserRole) -> Vec<Appointment> {
        let state = self.state.read().await;
        let mut found: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| match role {
                UserRole::Doctor => a.doctor_id == user_id,
                UserRole::Patient => a.patient_id == user_id,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.date, a.time, a.id).cmp(&(b.date, b.time, b.id)));
        found
    }

    async fn get_appointment(&self, id: i64) -> Option<Appointment> {
        let state = self.state.read().await;
        state.appointments.get(&id).cloned()
    }

    async fn create_appointment(
        &self,
        input: InsertAppointment,
    ) -> Result<Appointment, ServiceError> {
        input.validate()?;
        let mut state = self.state.write().await;
        let id = next_id(&mut state.appointment_seq);
        let appointment = Appointment {
            id,
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            date: input.date,
            time: input.time,
            status: AppointmentStatus::Upcoming,
            kind: input.kind,
            specialty: input.specialty,
            location: input.location,
            created_at: Utc::now(),
        };
        state.appointments.insert(id, appointment.clone());
        debug!(appointment_id = id, "appointment created");
        Ok(appointment)
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, ServiceError> {
        let mut state = self.state.write().await;
        let Some(appointment) = state.appointments.get_mut(&id) else {
            return Ok(None);
        };
        if !appointment.status.can_transition_to(status) {
            return Err(ServiceError::Validation(format!(
                "cannot move appointment from {:?} to {:?}",
                appointment.status, status
            )));
        }
        appointment.status = status;
        Ok(Some(appointment.clone()))
    }

    async fn messages_for(&self, user_id: i64) -> Vec<Message> {
        let state = self.state.read().await;
        let mut found: Vec<Message> = state
            .messages
            .values()
            .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.sent_at, m.id));
        found
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> Vec<Message> {
        let state = self.state.read().await;
        let mut found: Vec<Message> = state
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == user_a && m.recipient_id == user_b)
                    || (m.sender_id == user_b && m.recipient_id == user_a)
            })
            .cloned()
            .collect();
        // Chronological; ties broken by id so the order is stable and
        // symmetric in the arguments.
        found.sort_by_key(|m| (m.sent_at, m.id));
        found
    }

    async fn create_message(&self, input: InsertMessage) -> Result<Message, ServiceError> {
        input.validate()?;
        let mut state = self.state.write().await;
        let id = next_id(&mut state.message_seq);
        let message = Message {
            id,
            sender_id: input.sender_id,
            recipient_id: input.recipient_id,
            body: input.body,
            read: false,
            sent_at: Utc::now(),
        };
        state.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn mark_message_read(&self, id: i64) {
        let mut state = self.state.write().await;
        // Unknown id is a silent no-op.
        if let Some(message) = state.messages.get_mut(&id) {
            message.read = true;
        }
    }

    async fn documents_for(&self, user_id: i64) -> Vec<Document> {
        let state = self.state.read().await;
        let mut found: Vec<Document> = state
            .documents
            .values()
            .filter(|d| d.owner_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|d| d.id);
        found
    }

    async fn create_document(&self, input: InsertDocument) -> Result<Document, ServiceError> {
        input.validate()?;
        let mut state = self.state.write().await;
        let id = next_id(&mut state.document_seq);
        let document = Document {
            id,
            owner_id: input.owner_id,
            title: input.title,
            file_name: input.file_name,
            content_type: input.content_type,
            size_bytes: input.size_bytes,
            uploaded_at: Utc::now(),
        };
        state.documents.insert(id, document.clone());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use models::appointment::AppointmentKind;

    async fn storage() -> Arc<MemStorage> {
        let path =
            std::env::temp_dir().join(format!("doctaba_sessions_{}.json", uuid::Uuid::new_v4()));
        let sessions = FileSessionStore::new(&path, 3600).await.expect("session store");
        MemStorage::new(sessions)
    }

    fn doctor() -> InsertUser {
        InsertUser {
            email: "sarah.morgan@example.com".into(),
            name: "Dr. Sarah Morgan".into(),
            role: UserRole::Doctor,
            specialty: Some("General Medicine".into()),
        }
    }

    fn patient(email: &str, name: &str) -> InsertUser {
        InsertUser { email: email.into(), name: name.into(), role: UserRole::Patient, specialty: None }
    }

    fn consultation(patient_id: i64, doctor_id: i64) -> InsertAppointment {
        InsertAppointment {
            patient_id,
            doctor_id,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            kind: AppointmentKind::Video,
            specialty: Some("General Medicine".into()),
            location: None,
        }
    }

    #[tokio::test]
    async fn created_users_round_trip_and_unknown_ids_are_absent() {
        let store = storage().await;
        let created = store.create_user(doctor()).await.expect("create");
        assert_eq!(store.get_user(created.id).await, Some(created.clone()));
        assert_eq!(
            store.get_user_by_email("sarah.morgan@example.com").await,
            Some(created)
        );
        assert_eq!(store.get_user(9999).await, None);
        assert_eq!(store.get_user_by_email("nobody@example.com").await, None);
    }

    #[tokio::test]
    async fn ids_are_monotonic_per_entity() {
        let store = storage().await;
        let a = store.create_user(doctor()).await.unwrap();
        let b = store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        // Appointment ids count independently of user ids.
        let appt = store.create_appointment(consultation(b.id, a.id)).await.unwrap();
        assert_eq!(appt.id, 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = storage().await;
        let first = store.create_user(doctor()).await.expect("first create");
        let err = store
            .create_user(InsertUser { name: "Impostor".into(), ..doctor() })
            .await
            .expect_err("duplicate must be rejected");
        assert!(matches!(err, ServiceError::Validation(_)));
        // The original record is untouched.
        assert_eq!(store.get_user(first.id).await.unwrap().name, "Dr. Sarah Morgan");
    }

    #[tokio::test]
    async fn upsert_matches_on_email_and_preserves_identity() {
        let store = storage().await;
        let created = store.create_user(doctor()).await.unwrap();

        let updated = store
            .upsert_user(UpsertUser {
                email: "sarah.morgan@example.com".into(),
                name: "Sarah Morgan, MD".into(),
                role: None,
                specialty: Some("Cardiology".into()),
            })
            .await
            .expect("upsert existing");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.role, UserRole::Doctor);
        assert_eq!(updated.name, "Sarah Morgan, MD");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.all_users().await.len(), 1);

        let inserted = store
            .upsert_user(UpsertUser {
                email: "mary.johnson@example.com".into(),
                name: "Mary Johnson".into(),
                role: None,
                specialty: None,
            })
            .await
            .expect("upsert new");
        assert_eq!(inserted.role, UserRole::Patient);
        assert_eq!(store.all_users().await.len(), 2);
    }

    #[tokio::test]
    async fn appointments_filter_by_participant_role() {
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat_a =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let pat_b =
            store.create_user(patient("mary.johnson@example.com", "Mary Johnson")).await.unwrap();

        let for_a = store.create_appointment(consultation(pat_a.id, doc.id)).await.unwrap();
        let for_b = store.create_appointment(consultation(pat_b.id, doc.id)).await.unwrap();

        let doc_list = store.appointments_for(doc.id, UserRole::Doctor).await;
        assert_eq!(doc_list.len(), 2);

        let a_list = store.appointments_for(pat_a.id, UserRole::Patient).await;
        assert_eq!(a_list, vec![for_a]);
        let b_list = store.appointments_for(pat_b.id, UserRole::Patient).await;
        assert_eq!(b_list, vec![for_b]);

        // Participating in the other role yields nothing.
        assert!(store.appointments_for(pat_a.id, UserRole::Doctor).await.is_empty());
    }

    #[tokio::test]
    async fn status_update_mutates_only_status() {
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let before = store.create_appointment(consultation(pat.id, doc.id)).await.unwrap();

        let after = store
            .update_appointment_status(before.id, AppointmentStatus::Completed)
            .await
            .expect("valid transition")
            .expect("known id");
        assert_eq!(after.status, AppointmentStatus::Completed);
        assert_eq!(
            Appointment { status: before.status, ..after.clone() },
            before,
            "only the status field may change"
        );

        // Unknown id: absent, no side effects.
        let missing = store
            .update_appointment_status(9999, AppointmentStatus::Cancelled)
            .await
            .expect("unknown id is not an error");
        assert!(missing.is_none());
        assert_eq!(store.get_appointment(before.id).await.unwrap(), after);
    }

    #[tokio::test]
    async fn terminal_status_transitions_are_rejected() {
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let appt = store.create_appointment(consultation(pat.id, doc.id)).await.unwrap();

        store
            .update_appointment_status(appt.id, AppointmentStatus::Cancelled)
            .await
            .unwrap();
        let err = store
            .update_appointment_status(appt.id, AppointmentStatus::Upcoming)
            .await
            .expect_err("cancelled is terminal");
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(
            store.get_appointment(appt.id).await.unwrap().status,
            AppointmentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn conversation_is_symmetric_and_chronological() {
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let other =
            store.create_user(patient("mary.johnson@example.com", "Mary Johnson")).await.unwrap();

        for body in ["How are you feeling?", "Much better, thanks", "Glad to hear it"] {
            let (from, to) = if body.starts_with("Much") { (pat.id, doc.id) } else { (doc.id, pat.id) };
            store
                .create_message(InsertMessage { sender_id: from, recipient_id: to, body: body.into() })
                .await
                .unwrap();
        }
        // Noise from an unrelated pair must not leak in.
        store
            .create_message(InsertMessage {
                sender_id: other.id,
                recipient_id: doc.id,
                body: "Can I reschedule?".into(),
            })
            .await
            .unwrap();

        let ab = store.conversation(doc.id, pat.id).await;
        let ba = store.conversation(pat.id, doc.id).await;
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 3);
        assert!(ab.windows(2).all(|w| (w[0].sent_at, w[0].id) <= (w[1].sent_at, w[1].id)));

        // messages_for sees both conversations for the doctor.
        assert_eq!(store.messages_for(doc.id).await.len(), 4);
        assert_eq!(store.messages_for(other.id).await.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_sets_flag_and_ignores_unknown_ids() {
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let msg = store
            .create_message(InsertMessage {
                sender_id: doc.id,
                recipient_id: pat.id,
                body: "Your results are in".into(),
            })
            .await
            .unwrap();
        assert!(!msg.read);

        store.mark_message_read(msg.id).await;
        assert!(store.messages_for(pat.id).await[0].read);

        // No panic, no effect.
        store.mark_message_read(424242).await;
    }

    #[tokio::test]
    async fn documents_are_scoped_to_their_owner() {
        let store = storage().await;
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        let created = store
            .create_document(InsertDocument {
                owner_id: pat.id,
                title: "Blood panel".into(),
                file_name: "panel.pdf".into(),
                content_type: "application/pdf".into(),
                size_bytes: Some(48_213),
            })
            .await
            .unwrap();
        assert_eq!(store.documents_for(pat.id).await, vec![created]);
        assert!(store.documents_for(pat.id + 1).await.is_empty());
    }

    #[tokio::test]
    async fn doctor_completes_a_linked_appointment() {
        // spec scenario: doctor + patient + upcoming appointment, then complete.
        let store = storage().await;
        let doc = store.create_user(doctor()).await.unwrap();
        let pat =
            store.create_user(patient("john.smith@example.com", "John Smith")).await.unwrap();
        assert_eq!((doc.id, pat.id), (1, 2));

        let appt = store.create_appointment(consultation(pat.id, doc.id)).await.unwrap();
        assert_eq!(appt.id, 1);
        assert_eq!(appt.status, AppointmentStatus::Upcoming);

        store
            .update_appointment_status(appt.id, AppointmentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(
            store.get_appointment(appt.id).await.unwrap().status,
            AppointmentStatus::Completed
        );
        let listed = store.appointments_for(doc.id, UserRole::Doctor).await;
        assert!(listed.iter().any(|a| a.id == appt.id));
    }
}
