use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct InsertUserDoc {
    pub email: String,
    /// "doctor" or "patient"
    pub role: String,
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(ToSchema)]
pub struct UpsertUserDoc {
    pub email: String,
    pub name: String,
    pub role: Option<String>,
    pub specialty: Option<String>,
}

#[derive(ToSchema)]
pub struct InsertAppointmentDoc {
    pub patient_id: i64,
    pub doctor_id: i64,
    /// ISO date, e.g. "2024-01-15"
    pub date: String,
    /// Time of day, e.g. "10:00:00"
    pub time: String,
    /// "video", "phone" or "in-person"
    pub kind: String,
    pub specialty: Option<String>,
    pub location: Option<String>,
}

#[derive(ToSchema)]
pub struct StatusUpdateDoc {
    /// "upcoming", "completed" or "cancelled"
    pub status: String,
}

#[derive(ToSchema)]
pub struct InsertMessageDoc {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
}

#[derive(ToSchema)]
pub struct InsertDocumentDoc {
    pub owner_id: i64,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: Option<u64>,
}

#[derive(ToSchema)]
pub struct NotesDoc {
    pub notes: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list,
        crate::routes::users::get_by_id,
        crate::routes::users::create,
        crate::routes::users::upsert,
        crate::routes::appointments::list,
        crate::routes::appointments::get_by_id,
        crate::routes::appointments::create,
        crate::routes::appointments::update_status,
        crate::routes::calls::join,
        crate::routes::calls::status,
        crate::routes::calls::set_notes,
        crate::routes::calls::end,
        crate::routes::messages::list,
        crate::routes::messages::conversation,
        crate::routes::messages::create,
        crate::routes::messages::mark_read,
        crate::routes::documents::list,
        crate::routes::documents::create,
    ),
    components(
        schemas(
            HealthResponse,
            InsertUserDoc,
            UpsertUserDoc,
            InsertAppointmentDoc,
            StatusUpdateDoc,
            InsertMessageDoc,
            InsertDocumentDoc,
            NotesDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "appointments"),
        (name = "calls"),
        (name = "messages"),
        (name = "documents")
    )
)]
pub struct ApiDoc;
