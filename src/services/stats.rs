use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::db;
use crate::models::listing::Listing;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageCosts {
    pub rent: i64,
    pub utilities: i64,
    pub other: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub contacted: usize,
    pub replied: usize,
    pub contacted_percentage: i64,
    pub replied_percentage: i64,
    pub average_costs: AverageCosts,
    pub by_neighborhood: BTreeMap<String, usize>,
    pub by_housing_type: BTreeMap<String, usize>,
    pub by_room_type: BTreeMap<String, usize>,
}

pub fn fetch(config: &Arc<Config>) -> Result<ListingStats> {
    let all_listings = db::listing::get_all(config)?;
    Ok(compute(&all_listings))
}

/// Full O(n) recomputation on every call. An empty listing set comes back
/// as all zeroes, never a division error.
pub fn compute(listings: &[Listing]) -> ListingStats {
    let total = listings.len();
    let contacted = listings.iter().filter(|l| l.contacted).count();
    let replied = listings.iter().filter(|l| l.replied).count();

    let with_cost: Vec<&Listing> = listings.iter().filter(|l| l.has_any_cost()).collect();
    let average_rent = average(&with_cost, |l| l.rent_cost);
    let average_utilities = average(&with_cost, |l| l.utilities_cost);
    let average_other = average(&with_cost, |l| l.other_cost);

    let mut by_neighborhood: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_housing_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_room_type: BTreeMap<String, usize> = BTreeMap::new();
    for listing in listings {
        *by_neighborhood
            .entry(listing.location_name.clone())
            .or_default() += 1;
        *by_housing_type
            .entry(listing.housing_type.clone())
            .or_default() += 1;
        if let Some(ref room_type) = listing.room_type {
            *by_room_type.entry(room_type.clone()).or_default() += 1;
        }
    }

    ListingStats {
        total,
        contacted,
        replied,
        contacted_percentage: percentage(contacted, total),
        replied_percentage: percentage(replied, total),
        average_costs: AverageCosts {
            rent: average_rent,
            utilities: average_utilities,
            other: average_other,
            total: average_rent + average_utilities + average_other,
        },
        by_neighborhood,
        by_housing_type,
        by_room_type,
    }
}

fn percentage(part: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as i64
}

/// Averaged over listings that carry at least one cost component, with the
/// missing components of those listings counted as zero.
fn average(with_cost: &[&Listing], component: impl Fn(&Listing) -> Option<i32>) -> i64 {
    if with_cost.is_empty() {
        return 0;
    }
    let sum: i64 = with_cost
        .iter()
        .map(|l| i64::from(component(l).unwrap_or(0)))
        .sum();
    (sum as f64 / with_cost.len() as f64).round() as i64
}
