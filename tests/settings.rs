use parcelctl::config::Settings;
use std::time::Duration;

// Environment variables are process-wide, so everything touching them lives in this one test.
#[test]
fn environment_values_reach_settings_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("PARCEL_CONFIG", dir.path().join("missing.toml"));
    std::env::set_var("PARCEL_CREDENTIALS__CLIENT_ID", "007");
    std::env::set_var("PARCEL_CREDENTIALS__CLIENT_SECRET", "12e4");
    std::env::set_var("PARCEL_API__TIMEOUT_SECS", "5");
    std::env::set_var("PARCEL_API__BASE_URL", "http://localhost:8080/dpi");

    let settings = Settings::load().unwrap();

    assert_eq!(settings.credentials.client_id, "007");
    assert_eq!(settings.credentials.client_secret, "12e4");
    assert_eq!(settings.credentials.client_credentials().client_id(), "007");
    assert_eq!(settings.api.client_config().timeout, Duration::from_secs(5));
    assert_eq!(settings.api.base_url.as_str(), "http://localhost:8080/dpi");
}
