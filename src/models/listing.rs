use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::listings;
use crate::geo::distance::Coordinates;
use crate::models::contact::Contact;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Listing {
    pub id: i32,
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
    pub has_parking: bool,
    pub reference_url: Option<String>,
    pub contacted: bool,
    pub replied: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Listing {
    /// Sum of the three cost components, absent components counted as zero.
    pub fn cost_sum(&self) -> i32 {
        self.rent_cost.unwrap_or(0) + self.utilities_cost.unwrap_or(0) + self.other_cost.unwrap_or(0)
    }

    pub fn has_any_cost(&self) -> bool {
        self.rent_cost.is_some() || self.utilities_cost.is_some() || self.other_cost.is_some()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Display-only: a listing with N rooms implies N-1 potential roommates.
    pub fn potential_roommates(&self) -> Option<i32> {
        self.room_count.map(|rooms| (rooms - 1).max(0))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = listings)]
pub struct InsertableListing {
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
    pub has_parking: bool,
    pub reference_url: Option<String>,
    pub contacted: bool,
    pub replied: bool,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves a column untouched; `Some(None)` clears a
/// nullable column.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = listings)]
pub struct ListingChanges {
    pub location_name: Option<String>,
    pub address: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub housing_type: Option<String>,
    pub room_type: Option<Option<String>>,
    pub room_count: Option<Option<i32>>,
    pub rent_cost: Option<Option<i32>>,
    pub utilities_cost: Option<Option<i32>>,
    pub other_cost: Option<Option<i32>>,
    pub available_from: Option<Option<String>>,
    pub has_parking: Option<bool>,
    pub reference_url: Option<Option<String>>,
    pub contacted: Option<bool>,
    pub replied: Option<bool>,
    pub notes: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingWithContacts {
    #[serde(flatten)]
    pub listing: Listing,
    pub contacts: Vec<Contact>,
}
