use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::config::Config;
use crate::db::{self, listing::ListingFilters};
use crate::geo::distance::{fallback_transit_minutes, walking_minutes, Coordinates};
use crate::models::contact::{self, InsertableContact};
use crate::models::listing::{
    InsertableListing, Listing, ListingChanges, ListingWithContacts,
};

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Cost,
    Location,
    CreatedAt,
    AvailableFrom,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Full query contract: pushdown filters plus the in-memory stages
/// (cost range on the derived sum, distance bounds, stable sort).
#[derive(Debug, Default, Clone)]
pub struct ListingQuery {
    pub filters: ListingFilters,
    pub min_cost: Option<i32>,
    pub max_cost: Option<i32>,
    pub max_walking_minutes: Option<i64>,
    pub max_transit_minutes: Option<i64>,
    pub destination: Option<Coordinates>,
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

pub fn list(config: &Arc<Config>, query: &ListingQuery) -> Result<Vec<ListingWithContacts>> {
    let rows = db::listing::list_filtered(config, &query.filters)?;
    let grouped_contacts = db::contact::for_listings(config, &rows)?;

    let joined = rows
        .into_iter()
        .zip(grouped_contacts)
        .map(|(listing, contacts)| ListingWithContacts { listing, contacts })
        .collect();

    Ok(apply_memory_stages(joined, query))
}

/// In-memory tail of the pipeline over the materialized result set. Pure,
/// so the ordering and tie-break behavior can be checked without a store.
pub fn apply_memory_stages(
    mut items: Vec<ListingWithContacts>,
    query: &ListingQuery,
) -> Vec<ListingWithContacts> {
    if query.min_cost.is_some() || query.max_cost.is_some() {
        let within_range = cost_range_predicate(query.min_cost, query.max_cost);
        items.retain(|item| within_range(&item.listing));
    }

    if let (Some(max_minutes), Some(destination)) =
        (query.max_walking_minutes, query.destination)
    {
        let within_walk = walking_bound_predicate(destination, max_minutes);
        items.retain(|item| within_walk(&item.listing));
    }

    if let (Some(max_minutes), Some(destination)) =
        (query.max_transit_minutes, query.destination)
    {
        let within_transit = transit_bound_predicate(destination, max_minutes);
        items.retain(|item| within_transit(&item.listing));
    }

    if let Some(key) = query.sort_by {
        let order = query.sort_order;
        items.sort_by(|a, b| {
            let ordering = compare_by(key, &a.listing, &b.listing);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    items
}

/// Inclusive at both bounds, absent cost components counted as zero.
pub fn cost_range_predicate(
    min_cost: Option<i32>,
    max_cost: Option<i32>,
) -> impl Fn(&Listing) -> bool {
    move |listing| {
        let total = listing.cost_sum();
        min_cost.map_or(true, |min| total >= min) && max_cost.map_or(true, |max| total <= max)
    }
}

/// Listings without coordinates never satisfy a distance bound.
pub fn walking_bound_predicate(
    destination: Coordinates,
    max_minutes: i64,
) -> impl Fn(&Listing) -> bool {
    move |listing| match listing.coordinates() {
        Some(origin) => walking_minutes(origin, destination) <= max_minutes,
        None => false,
    }
}

/// The list-level transit bound uses the offline formula; live routing is
/// only consulted for single-listing estimates.
pub fn transit_bound_predicate(
    destination: Coordinates,
    max_minutes: i64,
) -> impl Fn(&Listing) -> bool {
    move |listing| match listing.coordinates() {
        Some(origin) => fallback_transit_minutes(origin, destination) <= max_minutes,
        None => false,
    }
}

pub fn compare_by(key: SortKey, a: &Listing, b: &Listing) -> Ordering {
    match key {
        SortKey::Cost => a.cost_sum().cmp(&b.cost_sum()),
        SortKey::Location => a.location_name.cmp(&b.location_name),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::AvailableFrom => a.available_from.cmp(&b.available_from),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingPayload {
    pub location_name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub housing_type: String,
    pub room_type: Option<String>,
    pub room_count: Option<i32>,
    pub rent_cost: Option<i32>,
    pub utilities_cost: Option<i32>,
    pub other_cost: Option<i32>,
    pub available_from: Option<String>,
    #[serde(default)]
    pub has_parking: bool,
    pub reference_url: Option<String>,
    #[serde(default)]
    pub contacted: bool,
    #[serde(default)]
    pub replied: bool,
    pub notes: Option<String>,
    #[serde(default)]
    pub contacts: Vec<NewContact>,
}

/// Partial update payload. A field that is absent stays untouched; an
/// explicit null clears the column. `contacts`, when present, replaces the
/// whole contact set.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ListingUpdate {
    pub location_name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    pub housing_type: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub room_type: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub room_count: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option")]
    pub rent_cost: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option")]
    pub utilities_cost: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option")]
    pub other_cost: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option")]
    pub available_from: Option<Option<String>>,
    pub has_parking: Option<bool>,
    #[serde(deserialize_with = "double_option")]
    pub reference_url: Option<Option<String>>,
    pub contacted: Option<bool>,
    pub replied: Option<bool>,
    #[serde(deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub contacts: Option<Vec<NewContact>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub fn validate_payload(payload: &ListingPayload) -> Result<(), String> {
    if payload.location_name.trim().is_empty() {
        return Err("location_name must not be empty".to_string());
    }
    if payload.housing_type.trim().is_empty() {
        return Err("housing_type must not be empty".to_string());
    }
    validate_room_count(payload.room_count)?;
    validate_costs(&[
        ("rent_cost", payload.rent_cost),
        ("utilities_cost", payload.utilities_cost),
        ("other_cost", payload.other_cost),
    ])?;
    validate_reference_url(payload.reference_url.as_deref())?;
    for new_contact in &payload.contacts {
        validate_contact(&new_contact.kind, &new_contact.value)?;
    }
    Ok(())
}

pub fn validate_update(update: &ListingUpdate) -> Result<(), String> {
    if let Some(ref location_name) = update.location_name {
        if location_name.trim().is_empty() {
            return Err("location_name must not be empty".to_string());
        }
    }
    if let Some(ref housing_type) = update.housing_type {
        if housing_type.trim().is_empty() {
            return Err("housing_type must not be empty".to_string());
        }
    }
    validate_room_count(update.room_count.flatten())?;
    validate_costs(&[
        ("rent_cost", update.rent_cost.flatten()),
        ("utilities_cost", update.utilities_cost.flatten()),
        ("other_cost", update.other_cost.flatten()),
    ])?;
    if let Some(Some(ref url)) = update.reference_url {
        validate_reference_url(Some(url))?;
    }
    if let Some(ref new_contacts) = update.contacts {
        for new_contact in new_contacts {
            validate_contact(&new_contact.kind, &new_contact.value)?;
        }
    }
    Ok(())
}

pub fn validate_contact(kind: &str, value: &str) -> Result<(), String> {
    if !contact::is_valid_kind(kind) {
        return Err(format!(
            "unknown contact kind '{kind}', expected one of {:?}",
            contact::CONTACT_KINDS
        ));
    }
    if value.trim().is_empty() {
        return Err("contact value must not be empty".to_string());
    }
    Ok(())
}

fn validate_room_count(room_count: Option<i32>) -> Result<(), String> {
    match room_count {
        Some(n) if n <= 0 => Err("room_count must be positive".to_string()),
        _ => Ok(()),
    }
}

fn validate_costs(components: &[(&str, Option<i32>)]) -> Result<(), String> {
    for (label, value) in components {
        if let Some(v) = value {
            if *v < 0 {
                return Err(format!("{label} must be non-negative"));
            }
        }
    }
    Ok(())
}

fn validate_reference_url(reference_url: Option<&str>) -> Result<(), String> {
    match reference_url {
        Some(url) if !url.is_empty() && !URL_PATTERN.is_match(url) => {
            Err("reference_url must be a http(s) URL".to_string())
        }
        _ => Ok(()),
    }
}

pub fn get(config: &Arc<Config>, listing_id: i32) -> Result<Option<ListingWithContacts>> {
    let Some(listing) = db::listing::get(config, listing_id)? else {
        return Ok(None);
    };
    let contacts = db::contact::for_listing(config, listing_id)?;
    Ok(Some(ListingWithContacts { listing, contacts }))
}

pub fn create(config: &Arc<Config>, payload: ListingPayload) -> Result<ListingWithContacts> {
    let created = db::listing::insert(config, to_insertable(&payload))?;

    if !payload.contacts.is_empty() {
        let rows = payload
            .contacts
            .iter()
            .map(|c| InsertableContact {
                listing_id: created.id,
                kind: c.kind.clone(),
                value: c.value.clone(),
            })
            .collect();
        db::contact::insert_many(config, rows)?;
    }

    let contacts = db::contact::for_listing(config, created.id)?;
    Ok(ListingWithContacts {
        listing: created,
        contacts,
    })
}

pub fn update(
    config: &Arc<Config>,
    listing_id: i32,
    update: ListingUpdate,
) -> Result<Option<ListingWithContacts>> {
    let changes = to_changes(&update);
    let Some(updated) = db::listing::update(config, listing_id, &changes)? else {
        return Ok(None);
    };

    if let Some(new_contacts) = update.contacts {
        db::contact::delete_for_listing(config, listing_id)?;
        let rows = new_contacts
            .into_iter()
            .map(|c| InsertableContact {
                listing_id,
                kind: c.kind,
                value: c.value,
            })
            .collect();
        db::contact::insert_many(config, rows)?;
    }

    let contacts = db::contact::for_listing(config, listing_id)?;
    Ok(Some(ListingWithContacts {
        listing: updated,
        contacts,
    }))
}

pub fn delete(config: &Arc<Config>, listing_id: i32) -> Result<bool> {
    db::listing::delete(config, listing_id)
}

pub fn add_contact(
    config: &Arc<Config>,
    listing_id: i32,
    new_contact: NewContact,
) -> Result<Option<crate::models::contact::Contact>> {
    if db::listing::get(config, listing_id)?.is_none() {
        return Ok(None);
    }
    let created = db::contact::insert(
        config,
        InsertableContact {
            listing_id,
            kind: new_contact.kind,
            value: new_contact.value,
        },
    )?;
    Ok(Some(created))
}

pub fn remove_contact(config: &Arc<Config>, contact_id: i32) -> Result<bool> {
    db::contact::delete(config, contact_id)
}

fn to_insertable(payload: &ListingPayload) -> InsertableListing {
    InsertableListing {
        location_name: payload.location_name.clone(),
        address: payload.address.clone(),
        latitude: payload.latitude,
        longitude: payload.longitude,
        housing_type: payload.housing_type.clone(),
        room_type: payload.room_type.clone(),
        room_count: payload.room_count,
        rent_cost: payload.rent_cost,
        utilities_cost: payload.utilities_cost,
        other_cost: payload.other_cost,
        available_from: payload.available_from.clone(),
        has_parking: payload.has_parking,
        reference_url: normalize_reference_url(payload.reference_url.clone()),
        contacted: payload.contacted,
        replied: payload.replied,
        notes: payload.notes.clone(),
    }
}

fn to_changes(update: &ListingUpdate) -> ListingChanges {
    ListingChanges {
        location_name: update.location_name.clone(),
        address: update.address.clone(),
        latitude: update.latitude,
        longitude: update.longitude,
        housing_type: update.housing_type.clone(),
        room_type: update.room_type.clone(),
        room_count: update.room_count,
        rent_cost: update.rent_cost,
        utilities_cost: update.utilities_cost,
        other_cost: update.other_cost,
        available_from: update.available_from.clone(),
        has_parking: update.has_parking,
        reference_url: update
            .reference_url
            .clone()
            .map(normalize_reference_url),
        contacted: update.contacted,
        replied: update.replied,
        notes: update.notes.clone(),
        updated_at: Some(Utc::now().naive_utc()),
    }
}

// An empty reference URL from a cleared form field means "no URL".
fn normalize_reference_url(reference_url: Option<String>) -> Option<String> {
    reference_url.filter(|url| !url.is_empty())
}
