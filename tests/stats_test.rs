#[cfg(test)]
mod statistics {
    use alloggio::models::listing::Listing;
    use alloggio::services::stats::compute;
    use chrono::{DateTime, NaiveDateTime};

    fn ts(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn listing(id: i32, neighborhood: &str, housing_type: &str) -> Listing {
        Listing {
            id,
            location_name: neighborhood.to_string(),
            address: None,
            latitude: None,
            longitude: None,
            housing_type: housing_type.to_string(),
            room_type: None,
            room_count: None,
            rent_cost: None,
            utilities_cost: None,
            other_cost: None,
            available_from: None,
            has_parking: false,
            reference_url: None,
            contacted: false,
            replied: false,
            notes: None,
            created_at: ts(1_700_000_000),
            updated_at: ts(1_700_000_000),
        }
    }

    #[test]
    fn empty_set_yields_all_zeroes() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.contacted, 0);
        assert_eq!(stats.replied, 0);
        assert_eq!(stats.contacted_percentage, 0);
        assert_eq!(stats.replied_percentage, 0);
        assert_eq!(stats.average_costs.rent, 0);
        assert_eq!(stats.average_costs.utilities, 0);
        assert_eq!(stats.average_costs.other, 0);
        assert_eq!(stats.average_costs.total, 0);
        assert!(stats.by_neighborhood.is_empty());
        assert!(stats.by_housing_type.is_empty());
        assert!(stats.by_room_type.is_empty());
    }

    #[test]
    fn counts_and_percentages() {
        let mut a = listing(1, "Centro", "apartment");
        a.contacted = true;
        a.replied = true;
        let mut b = listing(2, "Centro", "apartment");
        b.contacted = true;
        let c = listing(3, "Bolghera", "room");
        let d = listing(4, "Povo", "room");

        let stats = compute(&[a, b, c, d]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.contacted, 2);
        assert_eq!(stats.replied, 1);
        assert_eq!(stats.contacted_percentage, 50);
        assert_eq!(stats.replied_percentage, 25);
    }

    #[test]
    fn percentages_are_rounded() {
        let mut a = listing(1, "Centro", "apartment");
        a.contacted = true;
        let b = listing(2, "Centro", "apartment");
        let c = listing(3, "Centro", "apartment");

        let stats = compute(&[a, b, c]);
        // 1 of 3 contacted
        assert_eq!(stats.contacted_percentage, 33);
    }

    #[test]
    fn cost_averages_skip_listings_without_any_cost() {
        let mut a = listing(1, "Centro", "apartment");
        a.rent_cost = Some(500);
        a.utilities_cost = Some(50);
        let mut b = listing(2, "Centro", "apartment");
        b.rent_cost = Some(600);
        b.other_cost = Some(100);
        let c = listing(3, "Bolghera", "room"); // no cost data at all
        let mut d = listing(4, "Povo", "room");
        d.rent_cost = Some(400);
        d.utilities_cost = Some(100);
        d.other_cost = Some(50);

        let stats = compute(&[a, b, c, d]);
        assert_eq!(stats.average_costs.rent, 500);
        assert_eq!(stats.average_costs.utilities, 50);
        assert_eq!(stats.average_costs.other, 50);
        assert_eq!(stats.average_costs.total, 600);
    }

    #[test]
    fn frequency_distributions() {
        let mut a = listing(1, "Centro", "apartment");
        a.room_type = Some("single".to_string());
        let mut b = listing(2, "Centro", "room");
        b.room_type = Some("double".to_string());
        let mut c = listing(3, "Bolghera", "room");
        c.room_type = Some("single".to_string());
        let d = listing(4, "Centro", "apartment");

        let stats = compute(&[a, b, c, d]);
        assert_eq!(stats.by_neighborhood.get("Centro"), Some(&3));
        assert_eq!(stats.by_neighborhood.get("Bolghera"), Some(&1));
        assert_eq!(stats.by_housing_type.get("apartment"), Some(&2));
        assert_eq!(stats.by_housing_type.get("room"), Some(&2));
        // listings without a room type are not counted in that distribution
        assert_eq!(stats.by_room_type.get("single"), Some(&2));
        assert_eq!(stats.by_room_type.get("double"), Some(&1));
        assert_eq!(stats.by_room_type.values().sum::<usize>(), 3);
    }
}
