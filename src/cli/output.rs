//! Plain-text rendering of command results

use std::fmt::Write;

use crate::models::{Ormawa, Post, Registration, User};
use crate::utils::helpers::{format_timestamp, truncate_text};

const TITLE_WIDTH: usize = 40;

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn ormawa_table(items: &[Ormawa]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<32} {:<14} {:<14} {}", "ID", "NAMA", "JENIS", "KATEGORI", "OPREC");
    for ormawa in items {
        let _ = writeln!(
            out,
            "{:>5}  {:<32} {:<14} {:<14} {}",
            id_cell(ormawa.key()),
            truncate_text(&ormawa.name, 32),
            truncate_text(or_dash(ormawa.type_ormawa.as_deref()), 14),
            truncate_text(or_dash(ormawa.category_ormawa.as_deref()), 14),
            ormawa.status_oprec
        );
    }
    out
}

pub fn ormawa_detail(ormawa: &Ormawa, origin: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", ormawa.name, id_cell(ormawa.key()));
    let _ = writeln!(out, "  Jenis     : {}", or_dash(ormawa.type_ormawa.as_deref()));
    let _ = writeln!(out, "  Kategori  : {}", or_dash(ormawa.category_ormawa.as_deref()));
    let _ = writeln!(out, "  Oprec     : {}", ormawa.status_oprec);
    let _ = writeln!(out, "  Foto      : {}", or_dash(ormawa.photo_url(origin).as_deref()));
    if let Some(created) = ormawa.created_at {
        let _ = writeln!(out, "  Dibuat    : {}", format_timestamp(created));
    }
    if let Some(description) = ormawa.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "\n{}", description.trim());
    }
    out
}

pub fn post_table(items: &[Post], origin: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<40} {:<10} {:>7}  {}", "ID", "JUDUL", "STATUS", "ORMAWA", "POSTER");
    for post in items {
        let _ = writeln!(
            out,
            "{:>5}  {:<40} {:<10} {:>7}  {}",
            id_cell(post.key()),
            truncate_text(&post.title, TITLE_WIDTH),
            post.status,
            id_cell(post.ormawa_id),
            or_dash(post.poster_url(origin).as_deref())
        );
    }
    out
}

pub fn registration_table(items: &[Registration]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<28} {:<12} {:<32} {:<9} {}", "ID", "NAMA", "NIM", "EMAIL", "STATUS", "CV");
    for registration in items {
        let _ = writeln!(
            out,
            "{:>5}  {:<28} {:<12} {:<32} {:<9} {}",
            id_cell(registration.id),
            truncate_text(&registration.full_name, 28),
            registration.nim,
            truncate_text(&registration.email, 32),
            registration.status,
            if registration.cv_path.is_some() { "ya" } else { "-" }
        );
    }
    out
}

pub fn user_table(items: &[User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<28} {:<32} {}", "ID", "NAMA", "EMAIL", "ROLE");
    for user in items {
        let _ = writeln!(
            out,
            "{:>5}  {:<28} {:<32} {}",
            id_cell(user.id),
            truncate_text(user.display_name(), 28),
            truncate_text(&user.email, 32),
            or_dash(Some(user.role.as_str()))
        );
    }
    out
}
