//! Nominatim / OpenStreetMap postcode lookup.
//!
//! Lookups query by postcode alone, without restricting the country, so
//! that a postcode which exists in several countries returns candidates
//! from all of them and the verifier can tell the user where it actually
//! is. The public instance allows **1 request per second** at most.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use itad_address::GeoCandidate;
use serde_json::Value;

use crate::{GeocodeError, GeocoderConfig};

/// Looks up every place filed under `postcode`.
///
/// The caller is responsible for rate limiting (see `rate_limit_ms` in the
/// service TOML configuration).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails,
/// or [`GeocodeError::RateLimited`] on HTTP 429.
pub async fn search_postcode(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    postcode: &str,
) -> Result<Vec<GeoCandidate>, GeocodeError> {
    let limit = config.limit.to_string();

    let resp = client
        .get(&config.base_url)
        .query(&[
            ("postalcode", postcode.trim()),
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("limit", limit.as_str()),
            ("accept-language", config.accept_language.as_str()),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let resp = resp.error_for_status()?;
    let body: Value = resp.json().await?;
    let candidates = parse_response(&body)?;

    log::debug!(
        "{}: {} candidate(s) for postcode {postcode:?}",
        config.id,
        candidates.len()
    );

    Ok(candidates)
}

/// Parses a Nominatim `jsonv2` response with `addressdetails=1`.
///
/// Rows without usable coordinates are skipped rather than failing the
/// whole response.
///
/// # Errors
///
/// Returns [`GeocodeError::Parse`] if the body is not a JSON array.
pub fn parse_response(body: &Value) -> Result<Vec<GeoCandidate>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let mut candidates = Vec::with_capacity(results.len());
    for (i, row) in results.iter().enumerate() {
        match parse_row(row) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => log::warn!("Skipping Nominatim result {i}: {e}"),
        }
    }

    Ok(candidates)
}

fn parse_row(row: &Value) -> Result<GeoCandidate, GeocodeError> {
    let lat = coordinate(row, "lat")?;
    let lng = coordinate(row, "lon")?;

    let address = &row["address"];
    let field = |key: &str| {
        address[key]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    Ok(GeoCandidate {
        display_name: row["display_name"].as_str().unwrap_or_default().to_string(),
        lat,
        lng,
        road: field("road"),
        city: field("city"),
        town: field("town"),
        village: field("village"),
        municipality: field("municipality"),
        locality: field("locality"),
        suburb: field("suburb"),
        neighbourhood: field("neighbourhood"),
        post_town: field("post_town"),
        county: field("county"),
        state: field("state"),
        region: field("region"),
        province: field("province"),
        postcode: field("postcode"),
        country_name: field("country"),
        country_code: field("country_code"),
    })
}

/// Nominatim returns coordinates as strings; some proxies return numbers.
fn coordinate(row: &Value, key: &str) -> Result<f64, GeocodeError> {
    let value = &row[key];
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing {key} in Nominatim response"),
        })
}
