use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::contacts;
use crate::models::listing::Listing;

pub const CONTACT_KINDS: [&str; 3] = ["phone", "email", "name"];

pub fn is_valid_kind(kind: &str) -> bool {
    CONTACT_KINDS.contains(&kind)
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Listing))]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Contact {
    pub id: i32,
    pub listing_id: i32,
    pub kind: String,
    pub value: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contacts)]
pub struct InsertableContact {
    pub listing_id: i32,
    pub kind: String,
    pub value: String,
}
