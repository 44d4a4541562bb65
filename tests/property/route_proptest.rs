//! Property-based tests for path normalization and route parsing

use finboard::shared::routes::normalize_path;
use finboard::shared::{AppConfig, Route};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalize_is_idempotent(path in "/[a-z/]{0,20}(\\?[a-z=&]{0,10})?") {
        let once = normalize_path(&path);
        prop_assert_eq!(normalize_path(once), once);
        prop_assert!(once == "/" || !once.ends_with('/'));
        prop_assert!(!once.contains('?'));
    }

    #[test]
    fn test_parsed_route_path_parses_back(path in "/[a-z0-9/]{0,20}") {
        let route = Route::parse(&path);
        prop_assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn test_default_public_pages_are_login_and_register(path in "/(login|register|accounts|history)/?(\\?x=1)?") {
        let public = AppConfig::default().is_public(&path);
        prop_assert_eq!(public, matches!(Route::parse(&path), Route::Login | Route::Register));
    }
}
