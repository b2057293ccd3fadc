#[cfg(test)]
mod query_pipeline {
    use alloggio::geo::distance::Coordinates;
    use alloggio::models::listing::{Listing, ListingWithContacts};
    use alloggio::services::listings::{
        apply_memory_stages, cost_range_predicate, ListingQuery, SortKey, SortOrder,
    };
    use chrono::{DateTime, NaiveDateTime};

    fn ts(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn listing(id: i32, rent: Option<i32>) -> Listing {
        Listing {
            id,
            location_name: format!("Quartiere {id}"),
            address: None,
            latitude: None,
            longitude: None,
            housing_type: "apartment".to_string(),
            room_type: None,
            room_count: None,
            rent_cost: rent,
            utilities_cost: None,
            other_cost: None,
            available_from: None,
            has_parking: false,
            reference_url: None,
            contacted: false,
            replied: false,
            notes: None,
            created_at: ts(1_700_000_000 + i64::from(id)),
            updated_at: ts(1_700_000_000 + i64::from(id)),
        }
    }

    fn with_contacts(listings: Vec<Listing>) -> Vec<ListingWithContacts> {
        listings
            .into_iter()
            .map(|listing| ListingWithContacts {
                listing,
                contacts: vec![],
            })
            .collect()
    }

    fn ids(items: &[ListingWithContacts]) -> Vec<i32> {
        items.iter().map(|item| item.listing.id).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_original_order() {
        let items = with_contacts(vec![listing(1, Some(400)), listing(2, Some(300))]);
        let result = apply_memory_stages(items, &ListingQuery::default());
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn cost_range_is_inclusive_at_both_bounds() {
        let items = with_contacts(vec![
            listing(1, Some(250)),
            listing(2, Some(300)),
            listing(3, Some(350)),
            listing(4, Some(450)),
        ]);
        let query = ListingQuery {
            min_cost: Some(300),
            max_cost: Some(400),
            ..Default::default()
        };
        let result = apply_memory_stages(items, &query);
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn cost_range_sums_all_three_components_with_nulls_as_zero() {
        let mut expensive = listing(1, Some(300));
        expensive.utilities_cost = Some(80);
        expensive.other_cost = Some(40);
        let cheap = listing(2, None);

        let within = cost_range_predicate(Some(100), Some(500));
        assert!(within(&expensive)); // 420
        assert!(!within(&cheap)); // 0

        let open_below = cost_range_predicate(None, Some(500));
        assert!(open_below(&cheap));
    }

    #[test]
    fn cost_range_filter_is_idempotent() {
        let items = with_contacts(vec![
            listing(1, Some(250)),
            listing(2, Some(300)),
            listing(3, Some(350)),
            listing(4, Some(450)),
        ]);
        let query = ListingQuery {
            min_cost: Some(300),
            max_cost: Some(400),
            ..Default::default()
        };
        let once = apply_memory_stages(items, &query);
        let twice = apply_memory_stages(once.clone(), &query);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn walking_bound_drops_listings_without_coordinates() {
        let mut near = listing(1, None);
        near.latitude = Some(46.0700);
        near.longitude = Some(11.1200);
        let uncoordinated = listing(2, None);

        let destination = Coordinates {
            latitude: 46.0679,
            longitude: 11.1211,
        };
        let query = ListingQuery {
            max_walking_minutes: Some(10),
            destination: Some(destination),
            ..Default::default()
        };
        let result = apply_memory_stages(with_contacts(vec![near, uncoordinated]), &query);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn walking_bound_without_destination_is_ignored() {
        let items = with_contacts(vec![listing(1, None), listing(2, None)]);
        let query = ListingQuery {
            max_walking_minutes: Some(10),
            ..Default::default()
        };
        let result = apply_memory_stages(items, &query);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn transit_bound_uses_offline_formula() {
        let mut near = listing(1, None);
        near.latitude = Some(46.0700);
        near.longitude = Some(11.1200);
        let mut far = listing(2, None);
        far.latitude = Some(45.4642);
        far.longitude = Some(9.1900);

        let destination = Coordinates {
            latitude: 46.0679,
            longitude: 11.1211,
        };
        let query = ListingQuery {
            max_transit_minutes: Some(15),
            destination: Some(destination),
            ..Default::default()
        };
        let result = apply_memory_stages(with_contacts(vec![near, far]), &query);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn sort_by_cost_descending_reverses_ascending_for_distinct_keys() {
        let items = with_contacts(vec![
            listing(1, Some(400)),
            listing(2, Some(250)),
            listing(3, Some(700)),
        ]);
        let ascending = ListingQuery {
            sort_by: Some(SortKey::Cost),
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let descending = ListingQuery {
            sort_by: Some(SortKey::Cost),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };

        let asc = apply_memory_stages(items.clone(), &ascending);
        let desc = apply_memory_stages(items, &descending);

        assert_eq!(ids(&asc), vec![2, 1, 3]);
        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut a = listing(1, Some(300));
        a.location_name = "Centro".to_string();
        let mut b = listing(2, Some(300));
        b.location_name = "Centro".to_string();
        let mut c = listing(3, Some(300));
        c.location_name = "Bolghera".to_string();

        let query = ListingQuery {
            sort_by: Some(SortKey::Location),
            ..Default::default()
        };
        let result = apply_memory_stages(with_contacts(vec![a, b, c]), &query);
        // ties between 1 and 2 keep their original order
        assert_eq!(ids(&result), vec![3, 1, 2]);
    }

    #[test]
    fn sort_by_creation_time() {
        let items = with_contacts(vec![
            listing(3, None),
            listing(1, None),
            listing(2, None),
        ]);
        let query = ListingQuery {
            sort_by: Some(SortKey::CreatedAt),
            ..Default::default()
        };
        let result = apply_memory_stages(items, &query);
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn sort_by_availability_text_puts_unset_first() {
        let mut a = listing(1, None);
        a.available_from = Some("2026-09-01".to_string());
        let b = listing(2, None);
        let mut c = listing(3, None);
        c.available_from = Some("2026-03-15".to_string());

        let query = ListingQuery {
            sort_by: Some(SortKey::AvailableFrom),
            ..Default::default()
        };
        let result = apply_memory_stages(with_contacts(vec![a, b, c]), &query);
        assert_eq!(ids(&result), vec![2, 3, 1]);
    }

    #[test]
    fn filters_compose_before_sorting() {
        let items = with_contacts(vec![
            listing(1, Some(450)),
            listing(2, Some(350)),
            listing(3, Some(320)),
            listing(4, Some(250)),
        ]);
        let query = ListingQuery {
            min_cost: Some(300),
            max_cost: Some(400),
            sort_by: Some(SortKey::Cost),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let result = apply_memory_stages(items, &query);
        assert_eq!(ids(&result), vec![2, 3]);
    }
}
