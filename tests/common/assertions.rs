//! Custom assertion macros
//!
//! Shorter failures for the shapes the session tests check over and over.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error, optionally of a given shape
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert the store's status
#[macro_export]
macro_rules! assert_status {
    ($store:expr, $status:ident) => {
        assert_eq!(
            $store.status(),
            finboard::shared::SessionStatus::$status,
            "unexpected session: {:?}",
            $store.snapshot()
        );
    };
}

/// Assert the exact list of forced redirects a navigator has seen
#[macro_export]
macro_rules! assert_redirects {
    ($navigator:expr) => {
        assert!(
            $navigator.redirects().is_empty(),
            "Expected no redirect, got {:?}",
            $navigator.redirects()
        );
    };
    ($navigator:expr, $($path:expr),+) => {
        assert_eq!(
            $navigator.redirects(),
            vec![$($path.to_string()),+],
            "unexpected redirects"
        );
    };
}
