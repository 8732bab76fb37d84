//! Storage capability for the scheduling domain.
//!
//! Lookups express absence as `Option`/empty `Vec`; only mutations can fail,
//! and only with validation errors. `MemStorage` is the sole adapter today.

pub mod memory;

use std::sync::Arc;

use models::appointment::{Appointment, AppointmentStatus, InsertAppointment};
use models::document::{Document, InsertDocument};
use models::message::{InsertMessage, Message};
use models::user::{InsertUser, UpsertUser, User, UserRole};

use crate::errors::ServiceError;
use crate::session::FileSessionStore;

pub use memory::MemStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Handle to the session-persistence object owned by this store. Session
    /// middleware internals are an external collaborator; we only hold it.
    fn session_store(&self) -> Arc<FileSessionStore>;

    // Users
    async fn get_user(&self, id: i64) -> Option<User>;
    async fn get_user_by_email(&self, email: &str) -> Option<User>;
    async fn all_users(&self) -> Vec<User>;
    async fn create_user(&self, input: InsertUser) -> Result<User, ServiceError>;
    async fn upsert_user(&self, input: UpsertUser) -> Result<User, ServiceError>;

    // Appointments
    async fn appointments_for(&self, user_id: i64, role: UserRole) -> Vec<Appointment>;
    async fn get_appointment(&self, id: i64) -> Option<Appointment>;
    async fn create_appointment(
        &self,
        input: InsertAppointment,
    ) -> Result<Appointment, ServiceError>;
    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, ServiceError>;

    // Messages
    async fn messages_for(&self, user_id: i64) -> Vec<Message>;
    async fn conversation(&self, user_a: i64, user_b: i64) -> Vec<Message>;
    async fn create_message(&self, input: InsertMessage) -> Result<Message, ServiceError>;
    async fn mark_message_read(&self, id: i64);

    // Documents
    async fn documents_for(&self, user_id: i64) -> Vec<Document>;
    async fn create_document(&self, input: InsertDocument) -> Result<Document, ServiceError>;
}
