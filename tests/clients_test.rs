#[cfg(test)]
mod routing_fallback {
    use alloggio::geo::distance::Coordinates;
    use alloggio::geo::routing::RoutingClient;

    fn listing_coords() -> Coordinates {
        Coordinates {
            latitude: 46.0700,
            longitude: 11.1200,
        }
    }

    fn destination_coords() -> Coordinates {
        Coordinates {
            latitude: 46.0679,
            longitude: 11.1211,
        }
    }

    #[tokio::test]
    async fn missing_credential_degrades_to_approximate_estimate() {
        let client = RoutingClient::new(None);
        let estimate = client
            .transit_estimate(listing_coords(), destination_coords())
            .await;

        assert!(estimate.approximate);
        assert_eq!(estimate.minutes, 5);
        assert!(estimate
            .message
            .as_deref()
            .unwrap()
            .contains("not configured"));
    }

    #[tokio::test]
    async fn approximate_estimate_reports_haversine_distance() {
        let client = RoutingClient::new(None);
        let estimate = client
            .transit_estimate(listing_coords(), destination_coords())
            .await;

        assert_eq!(estimate.distance_meters, 248);
    }
}

#[cfg(test)]
mod geocoding_unconfigured {
    use alloggio::config::create_test_config;
    use alloggio::geo::geocoding::GeocodeClient;

    #[tokio::test]
    async fn missing_credential_yields_negative_result_not_error() {
        let client = GeocodeClient::new(&create_test_config());
        let result = client.geocode("Via Roma 1").await;

        assert!(!result.success);
        assert_eq!(result.latitude, None);
        assert_eq!(result.longitude, None);
        assert!(result.message.unwrap().contains("not configured"));
    }
}
