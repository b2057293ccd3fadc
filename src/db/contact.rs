use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;

use super::{establish_connection, schema::contacts};
use crate::config::Config;
use crate::models::contact::{Contact, InsertableContact};
use crate::models::listing::Listing;

pub fn insert(config: &Arc<Config>, contact: InsertableContact) -> Result<Contact> {
    let conn = &mut establish_connection(config)?;

    let created = diesel::insert_into(contacts::table)
        .values(&contact)
        .returning(Contact::as_returning())
        .get_result(conn)?;

    Ok(created)
}

pub fn insert_many(config: &Arc<Config>, new_contacts: Vec<InsertableContact>) -> Result<usize> {
    if new_contacts.is_empty() {
        return Ok(0);
    }

    let conn = &mut establish_connection(config)?;

    let inserted = diesel::insert_into(contacts::table)
        .values(&new_contacts)
        .execute(conn)?;

    Ok(inserted)
}

pub fn for_listing(config: &Arc<Config>, listing_id: i32) -> Result<Vec<Contact>> {
    let conn = &mut establish_connection(config)?;

    let rows = contacts::table
        .filter(contacts::listing_id.eq(listing_id))
        .order(contacts::id.asc())
        .select(Contact::as_select())
        .load(conn)?;

    Ok(rows)
}

/// Child rows for a batch of listings, grouped in the same order as the
/// input slice.
pub fn for_listings(config: &Arc<Config>, parents: &[Listing]) -> Result<Vec<Vec<Contact>>> {
    let conn = &mut establish_connection(config)?;

    let rows = Contact::belonging_to(parents)
        .order(contacts::id.asc())
        .select(Contact::as_select())
        .load(conn)?;

    Ok(rows.grouped_by(parents))
}

pub fn delete(config: &Arc<Config>, contact_id: i32) -> Result<bool> {
    let conn = &mut establish_connection(config)?;

    let deleted =
        diesel::delete(contacts::table.filter(contacts::id.eq(contact_id))).execute(conn)?;

    Ok(deleted > 0)
}

pub fn delete_for_listing(config: &Arc<Config>, listing_id: i32) -> Result<usize> {
    let conn = &mut establish_connection(config)?;

    let deleted = diesel::delete(contacts::table.filter(contacts::listing_id.eq(listing_id)))
        .execute(conn)?;

    Ok(deleted)
}
