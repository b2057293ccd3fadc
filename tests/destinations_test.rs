#[cfg(test)]
mod recent_destinations {
    use alloggio::destinations::{Destination, RecentDestinations, RECENT_CAPACITY};

    fn destination(name: &str, latitude: f64, longitude: f64) -> Destination {
        Destination {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn newest_entry_is_first() {
        let mut recent = RecentDestinations::new();
        recent.record(destination("University", 46.0664, 11.1503));
        recent.record(destination("Station", 46.0722, 11.1193));

        let names: Vec<&str> = recent.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Station", "University"]);
    }

    #[test]
    fn capped_at_capacity_with_oldest_evicted() {
        let mut recent = RecentDestinations::new();
        for i in 0..7 {
            recent.record(destination(&format!("place-{i}"), 46.0 + f64::from(i), 11.0));
        }

        assert_eq!(recent.len(), RECENT_CAPACITY);
        let names: Vec<&str> = recent.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["place-6", "place-5", "place-4", "place-3", "place-2"]
        );
    }

    #[test]
    fn re_recording_same_coordinates_moves_to_front_without_duplicating() {
        let mut recent = RecentDestinations::new();
        recent.record(destination("University", 46.0664, 11.1503));
        recent.record(destination("Station", 46.0722, 11.1193));
        // same coordinate pair, updated label
        recent.record(destination("Campus", 46.0664, 11.1503));

        assert_eq!(recent.len(), 2);
        let names: Vec<&str> = recent.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Campus", "Station"]);
    }

    #[test]
    fn identity_is_the_coordinate_pair_not_the_name() {
        let mut recent = RecentDestinations::new();
        recent.record(destination("Gym", 46.0700, 11.1200));
        recent.record(destination("Gym", 46.0701, 11.1200));

        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn storage_payload_round_trips() {
        let mut recent = RecentDestinations::new();
        recent.record(destination("University", 46.0664, 11.1503));
        recent.record(destination("Station", 46.0722, 11.1193));

        let payload = serde_json::to_string(&recent).unwrap();
        let restored: RecentDestinations = serde_json::from_str(&payload).unwrap();
        assert_eq!(restored, recent);
    }
}
