use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

lazy_static! {
    static ref ISO_COUNTRY_RE: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
}

/// Partial profile update; every field is optional and unsupplied fields are
/// left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 240))]
    pub bio: Option<String>,
    pub website: Option<String>,
    pub languages: Option<Vec<String>>,
    #[validate(length(max = 5, message = "at most 5 skills"))]
    pub skills: Option<Vec<String>>,
    pub address: Option<String>,
    pub region: Option<String>,
    #[validate(regex = "ISO_COUNTRY_RE")]
    pub country: Option<String>,
    #[validate(range(min = 0, max = 600))]
    pub service_radius_km: Option<i32>,
}

impl UpdateProfileRequest {
    /// Trim entries, drop blanks, dedup while keeping first occurrence. The
    /// sets are order-irrelevant but a stable storage order keeps responses
    /// deterministic.
    pub fn normalize(&mut self) {
        for list in [&mut self.languages, &mut self.skills] {
            if let Some(values) = list {
                let mut seen = std::collections::HashSet::new();
                values.retain_mut(|v| {
                    *v = v.trim().to_string();
                    !v.is_empty() && seen.insert(v.clone())
                });
            }
        }
        if let Some(website) = &mut self.website {
            *website = website.trim().to_string();
            if website.is_empty() {
                self.website = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_full_valid_update() {
        let req: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "bio": "Private chef in Rome",
            "website": "https://example.com",
            "languages": ["it", "en"],
            "skills": ["pasta", "pastry"],
            "address": "Via Roma 1",
            "region": "Lazio",
            "country": "IT",
            "serviceRadiusKm": 50,
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_long_bio_and_too_many_skills() {
        let req = UpdateProfileRequest {
            bio: Some("x".repeat(241)),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            skills: Some((0..6).map(|i| format!("skill-{i}")).collect()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_radius_and_bad_country() {
        let req = UpdateProfileRequest {
            service_radius_km: Some(601),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            service_radius_km: Some(-1),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            country: Some("Italy".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn normalize_trims_dedups_and_drops_blanks() {
        let mut req = UpdateProfileRequest {
            languages: Some(vec![
                " it ".into(),
                "en".into(),
                "it".into(),
                "  ".into(),
            ]),
            website: Some("   ".into()),
            ..Default::default()
        };
        req.normalize();
        assert_eq!(req.languages, Some(vec!["it".to_string(), "en".to_string()]));
        assert_eq!(req.website, None);
    }
}
