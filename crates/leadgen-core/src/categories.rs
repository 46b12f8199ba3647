//! Mapping from human-friendly category names to the directory API's
//! category slugs.

/// Known alias pairs. Unlisted inputs pass through unchanged so callers
/// can supply raw directory-API slugs directly.
const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("restaurants", "restaurants"),
    ("retail", "shopping"),
    ("beauty", "beautysvc"),
    ("fitness", "fitness"),
    ("healthcare", "health"),
    ("automotive", "auto"),
    ("professional", "professional"),
    ("entertainment", "arts"),
    ("real_estate", "realestate"),
    ("legal", "lawyers"),
    ("financial", "financialservices"),
    ("education", "education"),
    ("home_services", "homeservices"),
    ("hotels", "hotelstravel"),
    ("nightlife", "nightlife"),
    ("pets", "pets"),
    ("religious", "religiousorgs"),
    ("local_services", "localservices"),
];

/// Resolves a human-friendly category name to the directory API slug.
/// Case-insensitive; unknown names are returned as given.
#[must_use]
pub fn resolve_category_alias(category: &str) -> String {
    let lowered = category.to_lowercase();
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map_or(category.to_string(), |(_, slug)| (*slug).to_string())
}
