//! The approved-city directory and user submissions to it.

use std::sync::Arc;

use serde::Deserialize;
use village_store::city::{ApprovedCity, CityStore, CitySubmission, SubmissionStatus};
use village_store::UniqueKey;
use village_types::{AccountId, CityId, SubmissionId, Timestamp};

use crate::error::CommunityError;
use crate::profile::non_blank;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const MAX_SEARCH_LIMIT: usize = 500;

/// An approved city listed in the daemon configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CitySeed {
    pub city_name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default)]
    pub usage_count: u64,
}

fn default_tier() -> u8 {
    3
}

pub struct CityService {
    cities: Arc<dyn CityStore + Send + Sync>,
}

impl CityService {
    pub fn new(cities: Arc<dyn CityStore + Send + Sync>) -> Self {
        Self { cities }
    }

    /// Approved cities whose name, country or region contains `search`
    /// (case-insensitive), most prominent first.
    pub fn search(
        &self,
        search: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<ApprovedCity>, CommunityError> {
        let limit = clamp_limit(limit);
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut cities: Vec<ApprovedCity> = self
            .cities
            .iter_cities()?
            .into_iter()
            .filter(|c| match &needle {
                Some(n) => matches_search(c, n),
                None => true,
            })
            .collect();
        cities.sort_by(|a, b| {
            a.tier
                .cmp(&b.tier)
                .then_with(|| b.usage_count.cmp(&a.usage_count))
                .then_with(|| a.city_name.cmp(&b.city_name))
        });
        cities.truncate(limit);
        Ok(cities)
    }

    /// Queue a city for manual approval.
    pub fn submit(
        &self,
        user: &AccountId,
        city_name: &str,
        country: &str,
        region: Option<String>,
        now: Timestamp,
    ) -> Result<CitySubmission, CommunityError> {
        let city_name = city_name.trim();
        let country = country.trim();
        if city_name.is_empty() || country.is_empty() {
            return Err(CommunityError::rejected(
                "City name and country are required",
            ));
        }
        if self.cities.find_city_by_name(city_name)?.is_some() {
            return Err(CommunityError::rejected(
                "This city already exists in our database",
            ));
        }
        if self.cities.pending_submission(city_name)?.is_some() {
            return Err(CommunityError::rejected(
                "This city has already been submitted and is awaiting approval",
            ));
        }

        let submission = CitySubmission {
            id: SubmissionId::generate(),
            city_name: city_name.to_string(),
            country: country.to_string(),
            region: non_blank(region),
            submitted_by: user.clone(),
            status: SubmissionStatus::Pending,
            created_at: now,
        };
        self.cities.put_submission(&submission)?;
        tracing::info!(city = %submission.city_name, user = %user, "city submitted for approval");
        Ok(submission)
    }

    /// Insert each seed whose name is not yet approved. Returns how many were added.
    pub fn seed(&self, seeds: &[CitySeed]) -> Result<usize, CommunityError> {
        let mut added = 0;
        for seed in seeds {
            let name = seed.city_name.trim();
            if name.is_empty() || self.cities.find_city_by_name(name)?.is_some() {
                continue;
            }
            let city = ApprovedCity {
                id: CityId::generate(),
                city_name: name.to_string(),
                country: seed.country.trim().to_string(),
                region: non_blank(seed.region.clone()),
                tier: seed.tier,
                usage_count: seed.usage_count,
            };
            match self.cities.insert_city(&city) {
                Ok(()) => added += 1,
                Err(e) if e.duplicate_key() == Some(UniqueKey::CityName) => {}
                Err(e) => return Err(e.into()),
            }
        }
        if added > 0 {
            tracing::info!(added, "seeded approved cities");
        }
        Ok(added)
    }
}

fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(n) => n.clamp(1, MAX_SEARCH_LIMIT as i64) as usize,
        None => DEFAULT_SEARCH_LIMIT,
    }
}

fn matches_search(city: &ApprovedCity, needle: &str) -> bool {
    city.city_name.to_lowercase().contains(needle)
        || city.country.to_lowercase().contains(needle)
        || city
            .region
            .as_deref()
            .is_some_and(|r| r.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_nullables::NullStore;

    fn seed(name: &str, country: &str, region: Option<&str>, tier: u8, usage: u64) -> CitySeed {
        CitySeed {
            city_name: name.into(),
            country: country.into(),
            region: region.map(Into::into),
            tier,
            usage_count: usage,
        }
    }

    fn service() -> (Arc<NullStore>, CityService) {
        let store = Arc::new(NullStore::new());
        let service = CityService::new(store.clone());
        service
            .seed(&[
                seed("San Francisco", "USA", Some("California"), 1, 50),
                seed("New York", "USA", Some("New York"), 1, 80),
                seed("Toronto", "Canada", Some("Ontario"), 2, 10),
                seed("Oakland", "USA", Some("California"), 2, 10),
                seed("Lagos", "Nigeria", None, 3, 0),
            ])
            .unwrap();
        (store, service)
    }

    fn names(cities: &[ApprovedCity]) -> Vec<&str> {
        cities.iter().map(|c| c.city_name.as_str()).collect()
    }

    #[test]
    fn search_orders_by_tier_usage_then_name() {
        let (_store, service) = service();
        let all = service.search(None, None).unwrap();
        assert_eq!(
            names(&all),
            vec!["New York", "San Francisco", "Oakland", "Toronto", "Lagos"]
        );
    }

    #[test]
    fn search_matches_name_country_or_region() {
        let (_store, service) = service();
        assert_eq!(names(&service.search(Some("CALIF"), None).unwrap()), vec!["San Francisco", "Oakland"]);
        assert_eq!(names(&service.search(Some("canada"), None).unwrap()), vec!["Toronto"]);
        assert_eq!(names(&service.search(Some("ago"), None).unwrap()), vec!["Lagos"]);
        assert_eq!(service.search(Some("  "), None).unwrap().len(), 5);
    }

    #[test]
    fn limit_is_clamped() {
        let (_store, service) = service();
        assert_eq!(service.search(None, Some(2)).unwrap().len(), 2);
        assert_eq!(service.search(None, Some(0)).unwrap().len(), 1);
        assert_eq!(service.search(None, Some(-7)).unwrap().len(), 1);
        assert_eq!(service.search(None, Some(10_000)).unwrap().len(), 5);
        assert_eq!(clamp_limit(Some(10_000)), MAX_SEARCH_LIMIT);
        assert_eq!(clamp_limit(None), DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn seeding_is_idempotent() {
        let (store, service) = service();
        let again = service
            .seed(&[seed("Toronto", "Canada", None, 2, 0), seed("Austin", "USA", None, 2, 0)])
            .unwrap();
        assert_eq!(again, 1);
        assert_eq!(store.iter_cities().unwrap().len(), 6);
    }

    #[test]
    fn submit_trims_and_stores_pending() {
        let (_store, service) = service();
        let user = AccountId::new("u1");
        let sub = service
            .submit(&user, "  Denver ", " USA ", Some(" ".into()), Timestamp::new(5))
            .unwrap();
        assert_eq!(sub.city_name, "Denver");
        assert_eq!(sub.country, "USA");
        assert_eq!(sub.region, None);
        assert_eq!(sub.status, SubmissionStatus::Pending);

        let err = service
            .submit(&user, "Denver", "USA", None, Timestamp::new(6))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This city has already been submitted and is awaiting approval"
        );
    }

    #[test]
    fn submit_rejects_missing_fields_and_known_cities() {
        let (_store, service) = service();
        let user = AccountId::new("u1");
        let err = service
            .submit(&user, "Denver", "  ", None, Timestamp::new(5))
            .unwrap_err();
        assert_eq!(err.to_string(), "City name and country are required");

        let err = service
            .submit(&user, "Toronto", "Canada", None, Timestamp::new(5))
            .unwrap_err();
        assert_eq!(err.to_string(), "This city already exists in our database");
    }

    #[test]
    fn seed_config_defaults() {
        let parsed: CitySeed =
            serde_json::from_str(r#"{"city_name":"Austin","country":"USA"}"#).unwrap();
        assert_eq!(parsed.tier, 3);
        assert_eq!(parsed.usage_count, 0);
        assert_eq!(parsed.region, None);
    }
}
