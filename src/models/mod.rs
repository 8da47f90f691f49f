//! Data models module
//!
//! This module contains the resources exchanged with the SIORMA backend

pub mod user;
pub mod ormawa;
pub mod post;
pub mod registration;

// Re-export commonly used models
pub use user::{User, UserDirectory, LoginRequest, RegisterRequest, NewUser, UserUpdate, ROLE_ADMIN};
pub use ormawa::{Ormawa, OrmawaForm, RecruitmentStatus};
pub use post::{Post, PostForm, PostStatus};
pub use registration::{Registration, RegistrationRequest, RegistrationStatus, RegistrationStats, MIN_REASON_CHARS};
