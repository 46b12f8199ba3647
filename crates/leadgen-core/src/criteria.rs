//! Search criteria for a single pipeline run.

use crate::CoreError;

/// Maximum search radius accepted from callers, in miles.
const MAX_RADIUS_MILES: f64 = 100.0;

/// Parameters for one business search. Constructed once per run and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Free-text location, e.g. `"Nashville, TN"`.
    pub location_query: String,
    /// Free-text category or industry term, e.g. `"restaurants"`.
    pub category_query: String,
    /// Search radius in miles. Validated to `(0, 100]`.
    pub radius_miles: f64,
    /// Hard cap on the number of listings returned by the search phase.
    pub max_results: usize,
}

impl SearchCriteria {
    /// Validates and builds search criteria.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyField`] if the location or category is blank.
    /// - [`CoreError::InvalidRadius`] if the radius is non-positive or
    ///   exceeds 100 miles.
    /// - [`CoreError::InvalidMaxResults`] if `max_results` is zero.
    pub fn new(
        location_query: impl Into<String>,
        category_query: impl Into<String>,
        radius_miles: f64,
        max_results: usize,
    ) -> Result<Self, CoreError> {
        let location_query = location_query.into();
        let category_query = category_query.into();

        if location_query.trim().is_empty() {
            return Err(CoreError::EmptyField("location"));
        }
        if category_query.trim().is_empty() {
            return Err(CoreError::EmptyField("category"));
        }
        if !radius_miles.is_finite() || radius_miles <= 0.0 || radius_miles > MAX_RADIUS_MILES {
            return Err(CoreError::InvalidRadius(radius_miles));
        }
        if max_results == 0 {
            return Err(CoreError::InvalidMaxResults);
        }

        Ok(Self {
            location_query,
            category_query,
            radius_miles,
            max_results,
        })
    }
}

/// Converts a radius in miles to whole meters, the unit the directory
/// API expects: `round(miles * 1609.34)`.
#[must_use]
pub fn miles_to_meters(miles: f64) -> u32 {
    let meters = (miles * 1609.34).round();
    if meters <= 0.0 {
        return 0;
    }
    // Radius is capped at 100 miles upstream, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        meters as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_criteria() {
        let c = SearchCriteria::new("Nashville, TN", "restaurants", 5.0, 3)
            .expect("criteria should validate");
        assert_eq!(c.location_query, "Nashville, TN");
        assert_eq!(c.max_results, 3);
    }

    #[test]
    fn rejects_blank_location() {
        let result = SearchCriteria::new("  ", "restaurants", 5.0, 3);
        assert!(matches!(result, Err(CoreError::EmptyField("location"))));
    }

    #[test]
    fn rejects_blank_category() {
        let result = SearchCriteria::new("Austin, TX", "", 5.0, 3);
        assert!(matches!(result, Err(CoreError::EmptyField("category"))));
    }

    #[test]
    fn rejects_zero_radius() {
        let result = SearchCriteria::new("Austin, TX", "retail", 0.0, 3);
        assert!(matches!(result, Err(CoreError::InvalidRadius(_))));
    }

    #[test]
    fn rejects_oversized_radius() {
        let result = SearchCriteria::new("Austin, TX", "retail", 250.0, 3);
        assert!(matches!(result, Err(CoreError::InvalidRadius(_))));
    }

    #[test]
    fn rejects_zero_max_results() {
        let result = SearchCriteria::new("Austin, TX", "retail", 5.0, 0);
        assert!(matches!(result, Err(CoreError::InvalidMaxResults)));
    }

    #[test]
    fn miles_to_meters_rounds_to_nearest() {
        assert_eq!(miles_to_meters(5.0), 8047); // 8046.7 rounds up
        assert_eq!(miles_to_meters(1.0), 1609);
        assert_eq!(miles_to_meters(25.0), 40234); // 40233.5 rounds up
    }
}
