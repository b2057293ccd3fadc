use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;
use log::info;

use super::{establish_connection, schema::listings};
use crate::config::Config;
use crate::models::listing::{InsertableListing, Listing, ListingChanges};

/// Filters that can be pushed down to the store as a conjunctive predicate.
/// The cost-range and distance bounds are derived values and stay in memory.
#[derive(Debug, Default, Clone)]
pub struct ListingFilters {
    pub housing_type: Option<String>,
    pub room_type: Option<String>,
    pub contacted: Option<bool>,
    pub replied: Option<bool>,
    pub has_parking: Option<bool>,
    pub location_search: Option<String>,
}

pub fn insert(config: &Arc<Config>, listing: InsertableListing) -> Result<Listing> {
    let conn = &mut establish_connection(config)?;

    let created: Listing = diesel::insert_into(listings::table)
        .values(&listing)
        .returning(Listing::as_returning())
        .get_result(conn)?;

    info!("inserted listing {} ({})", created.id, created.location_name);
    Ok(created)
}

pub fn get(config: &Arc<Config>, listing_id: i32) -> Result<Option<Listing>> {
    let conn = &mut establish_connection(config)?;

    let listing = listings::table
        .filter(listings::id.eq(listing_id))
        .select(Listing::as_select())
        .first(conn)
        .optional()?;

    Ok(listing)
}

pub fn get_all(config: &Arc<Config>) -> Result<Vec<Listing>> {
    let conn = &mut establish_connection(config)?;

    let rows = listings::table
        .order(listings::id.asc())
        .select(Listing::as_select())
        .load(conn)?;

    Ok(rows)
}

/// Rows come back in insertion order so that the in-memory stages have a
/// well-defined "original order" for tie-breaking.
pub fn list_filtered(config: &Arc<Config>, filters: &ListingFilters) -> Result<Vec<Listing>> {
    let conn = &mut establish_connection(config)?;

    let mut query = listings::table
        .select(Listing::as_select())
        .into_boxed();

    if let Some(ref housing_type) = filters.housing_type {
        query = query.filter(listings::housing_type.eq(housing_type.clone()));
    }
    if let Some(ref room_type) = filters.room_type {
        query = query.filter(listings::room_type.eq(room_type.clone()));
    }
    if let Some(contacted) = filters.contacted {
        query = query.filter(listings::contacted.eq(contacted));
    }
    if let Some(replied) = filters.replied {
        query = query.filter(listings::replied.eq(replied));
    }
    if let Some(has_parking) = filters.has_parking {
        query = query.filter(listings::has_parking.eq(has_parking));
    }
    if let Some(ref search) = filters.location_search {
        query = query.filter(listings::location_name.like(format!("%{}%", search)));
    }

    let rows = query.order(listings::id.asc()).load(conn)?;

    Ok(rows)
}

pub fn update(
    config: &Arc<Config>,
    listing_id: i32,
    changes: &ListingChanges,
) -> Result<Option<Listing>> {
    let conn = &mut establish_connection(config)?;

    let updated = diesel::update(listings::table.filter(listings::id.eq(listing_id)))
        .set(changes)
        .returning(Listing::as_returning())
        .get_result(conn)
        .optional()?;

    Ok(updated)
}

/// Contact rows go with the listing through the FK cascade, so this stays a
/// single statement.
pub fn delete(config: &Arc<Config>, listing_id: i32) -> Result<bool> {
    let conn = &mut establish_connection(config)?;

    let deleted =
        diesel::delete(listings::table.filter(listings::id.eq(listing_id))).execute(conn)?;

    if deleted > 0 {
        info!("deleted listing {}", listing_id);
    }
    Ok(deleted > 0)
}
