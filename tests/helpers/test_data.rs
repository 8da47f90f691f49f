//! Test data helpers
//!
//! JSON fixtures shaped like the backend's responses, plus request builders.

use serde_json::{json, Value};
use siorma::client::Attachment;
use siorma::models::RegistrationRequest;

pub const ADMIN_TOKEN: &str = "admin-token-123";
pub const USER_TOKEN: &str = "user-token-456";

pub fn admin_user() -> Value {
    json!({
        "id": 1,
        "name": "Admin SIORMA",
        "email": "admin@siorma.test",
        "role": "admin",
        "created_at": "2025-01-10T08:00:00.000000Z"
    })
}

pub fn student_user() -> Value {
    json!({
        "id": "7",
        "fullname": "Budi Santoso",
        "email": "budi@student.telkomuniversity.ac.id",
        "role": "user"
    })
}

pub fn ormawa_list() -> Value {
    json!([
        {
            "id": 4,
            "name": "Motion Laboratorium",
            "type_ormawa": "Laboratorium",
            "category_ormawa": "Teknologi",
            "status_oprec": "BUKA",
            "photo_path": "ormawa/motion.png"
        },
        {
            "ormawaID": "5",
            "name": "Volley Telkom",
            "type_ormawa": "UKM",
            "category_ormawa": "Olahraga",
            "status_oprec": "TUTUP",
            "photoPath": "/uploads/volley.jpg"
        }
    ])
}

pub fn post_list() -> Value {
    json!([
        {
            "postID": 31,
            "title": "Open Recruitment Asisten Motion Lab",
            "description": "Dicari asisten praktikum robotika.",
            "status": "published",
            "ormawaID": 4,
            "poster_path": "posters/motion.jpg"
        },
        {
            "id": 32,
            "title": "Seleksi Tim Volley",
            "status": "draft",
            "ormawaID": "5",
            "poster_url": "https://cdn.siorma.test/volley.jpg"
        }
    ])
}

pub fn registration_list() -> Value {
    json!([
        { "id": 1, "post_id": 31, "full_name": "Budi Santoso", "nim": "1301210001", "email": "budi@student.telkomuniversity.ac.id", "status": "pending", "cv_path": "cv/budi.pdf" },
        { "id": 2, "post_id": 31, "full_name": "Siti Aminah", "nim": "1301210002", "email": "siti@student.telkomuniversity.ac.id", "status": "approved" },
        { "id": 3, "post_id": 32, "full_name": "Andi Wijaya", "nim": "1301210003", "email": "andi@student.telkomuniversity.ac.id", "status": "rejected" }
    ])
}

pub fn registration_request(cv: Option<Attachment>) -> RegistrationRequest {
    RegistrationRequest {
        full_name: "Budi Santoso".to_string(),
        nim: "1301210001".to_string(),
        email: "budi@student.telkomuniversity.ac.id".to_string(),
        phone: "081234567890".to_string(),
        organization: Some("".to_string()),
        reason: Some("Saya ingin belajar robotika dan membantu praktikum.".to_string()),
        cv,
    }
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n%test cv\n".to_vec()
}

pub fn logo() -> Attachment {
    Attachment::new("logo.png", vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a])
}
