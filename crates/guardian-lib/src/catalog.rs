//! Fixed catalog of app profiles

use crate::error::{GuardianError, Result};
use crate::models::{AppProfile, Intent};

/// The six built-in app profiles, in display order
pub fn sample_catalog() -> Vec<AppProfile> {
    vec![
        AppProfile::new("YouTube", 35.0, 400.0, 55.0, 0.2, Intent::Performance),
        AppProfile::new("Instagram", 28.0, 250.0, 50.0, 0.1, Intent::Performance),
        AppProfile::new("BGMI / Gaming", 55.0, 120.0, 60.0, 0.4, Intent::Performance),
        AppProfile::new("Maps / Navigation", 30.0, 80.0, 50.0, 0.9, Intent::Performance),
        AppProfile::new("Chrome / Reading", 12.0, 60.0, 40.0, 0.1, Intent::Eco),
        AppProfile::new("WhatsApp", 6.0, 20.0, 25.0, 0.0, Intent::Eco),
    ]
}

/// Look up a profile by name, ignoring ASCII case
pub fn find_profile(name: &str) -> Result<AppProfile> {
    let wanted = name.trim();
    sample_catalog()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| GuardianError::UnknownProfile(name.to_string()))
}
