//! Merges a raw directory listing with the optional cross-reference
//! record (and optional postal verification) into one verified record.

use leadgen_core::{BusinessStatus, ConfidenceLevel, VerifiedBusiness};
use leadgen_directory::Listing;
use leadgen_places::{CacheStats, CrossReferenceClient, PlaceRecord};
use leadgen_verify::{AddressVerifier, VerificationStatus};
use thiserror::Error;

/// Per-item reconciliation failure. Malformed upstream data, never a
/// transport problem; those degrade inside the collaborating clients.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("listing is missing required field \"{0}\"")]
    MissingField(&'static str),
}

/// Conflict-resolution engine: the directory listing is the primary
/// source, the cross-reference corroborates or contradicts it, and the
/// postal verifier (when configured) canonicalizes the address.
pub struct ReconciliationEngine {
    crossref: CrossReferenceClient,
    verifier: Option<AddressVerifier>,
}

impl ReconciliationEngine {
    #[must_use]
    pub fn new(crossref: CrossReferenceClient, verifier: Option<AddressVerifier>) -> Self {
        Self { crossref, verifier }
    }

    /// Produces the verified record for one listing.
    ///
    /// Defaults are confidence `Medium` and status `Unknown`; only a
    /// positive contradiction from the cross-reference (an explicit
    /// closure signal) upgrades confidence to `High`.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::MissingField`] when the listing has a blank id
    /// or name.
    pub async fn reconcile(&self, listing: &Listing) -> Result<VerifiedBusiness, ReconcileError> {
        if listing.id.trim().is_empty() {
            return Err(ReconcileError::MissingField("id"));
        }
        if listing.name.trim().is_empty() {
            return Err(ReconcileError::MissingField("name"));
        }

        let street = listing.street_address();
        let record = self.crossref.lookup(&listing.name, &street).await;

        let mut confidence = ConfidenceLevel::Medium;
        let mut status = BusinessStatus::Unknown;
        let mut discrepancy_note = None;
        let mut phone = listing.phone_or_empty().to_string();

        if let Some(record) = &record {
            if record.is_permanently_closed() {
                status = BusinessStatus::Closed;
                confidence = ConfidenceLevel::High;
                discrepancy_note =
                    Some("cross-reference reports the business permanently closed".to_string());
            }
            if phone.is_empty() {
                phone = backfill_phone(record);
            }
        }

        let mut address = street;
        let mut city = field(&listing.location.city);
        let mut state = field(&listing.location.state);
        let mut zip_code = field(&listing.location.zip_code);

        if let Some(verifier) = &self.verifier {
            // Partial addresses are skipped outright, not verified.
            if !address.is_empty() && !city.is_empty() && !state.is_empty() && !zip_code.is_empty()
            {
                let result = verifier.verify(&address, &city, &state, &zip_code).await;
                match result.status {
                    VerificationStatus::Verified => {
                        if let Some(line) = result.verified_street {
                            address = line;
                        }
                        if let Some(v) = result.verified_city {
                            city = v;
                        }
                        if let Some(v) = result.verified_state {
                            state = v;
                        }
                        if let Some(v) = result.verified_zip {
                            zip_code = v;
                        }
                    }
                    VerificationStatus::Invalid => {
                        let reason = result
                            .error
                            .unwrap_or_else(|| "address not deliverable".to_string());
                        discrepancy_note = Some(match discrepancy_note {
                            Some(existing) => format!("{existing}; {reason}"),
                            None => reason,
                        });
                    }
                    VerificationStatus::Error | VerificationStatus::Pending => {
                        tracing::warn!(
                            business = %listing.name,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "address verification unavailable"
                        );
                    }
                }
            }
        }

        Ok(VerifiedBusiness {
            external_id: listing.id.clone(),
            name: listing.name.clone(),
            address,
            city,
            state,
            zip_code,
            phone,
            source: format!("directory+crossref_{confidence}"),
            confidence,
            status,
            discrepancy_note,
            rating: listing.rating,
            review_count: listing.review_count,
        })
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.crossref.cache_stats()
    }

    /// Clears the cross-reference cache so each run starts cold.
    pub fn reset_cache(&self) {
        self.crossref.reset_cache();
    }
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn backfill_phone(record: &PlaceRecord) -> String {
    record
        .formatted_phone_number
        .clone()
        .unwrap_or_default()
}
