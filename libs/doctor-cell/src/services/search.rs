use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{Doctor, DoctorFacets, DoctorFilters, SortKey};

fn active(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn matches(
    doctor: &Doctor,
    search: Option<&str>,
    specialty: Option<&str>,
    location: Option<&str>,
    available_today: bool,
) -> bool {
    if let Some(term) = search {
        let hit = doctor.name.to_lowercase().contains(term)
            || doctor.specialty.to_lowercase().contains(term)
            || doctor.hospital.to_lowercase().contains(term);
        if !hit {
            return false;
        }
    }

    if let Some(specialty) = specialty {
        if doctor.specialty.to_lowercase() != specialty {
            return false;
        }
    }

    if let Some(location) = location {
        if !doctor.location.to_lowercase().contains(location) {
            return false;
        }
    }

    !available_today || doctor.available_today
}

/// Filters and sorts a doctor list. The input order is kept among equal sort keys.
pub fn filter_doctors(doctors: &[Doctor], filters: &DoctorFilters) -> Vec<Doctor> {
    let search = active(&filters.search);
    let specialty = active(&filters.specialty);
    let location = active(&filters.location);

    let mut result: Vec<Doctor> = doctors
        .iter()
        .filter(|d| {
            matches(
                d,
                search.as_deref(),
                specialty.as_deref(),
                location.as_deref(),
                filters.available_today,
            )
        })
        .cloned()
        .collect();

    if let Some(key) = filters.sort_by {
        sort_doctors(&mut result, key);
    }

    result
}

pub fn sort_doctors(doctors: &mut [Doctor], key: SortKey) {
    // sort_by is stable
    match key {
        SortKey::Rating => doctors.sort_by(|a, b| {
            b.rating_or_zero()
                .partial_cmp(&a.rating_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Experience => doctors.sort_by(|a, b| b.experience_or_zero().cmp(&a.experience_or_zero())),
        SortKey::Fee => doctors.sort_by(|a, b| {
            a.fee_or_zero()
                .partial_cmp(&b.fee_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
    }
}

pub fn facets(doctors: &[Doctor]) -> DoctorFacets {
    let specialties: BTreeSet<&str> = doctors
        .iter()
        .map(|d| d.specialty.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    let locations: BTreeSet<&str> = doctors
        .iter()
        .map(|d| d.location.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    DoctorFacets {
        specialties: specialties.into_iter().map(String::from).collect(),
        locations: locations.into_iter().map(String::from).collect(),
    }
}

pub fn top_rated(doctors: &[Doctor], limit: usize) -> Vec<Doctor> {
    let mut ranked = doctors.to_vec();
    sort_doctors(&mut ranked, SortKey::Rating);
    ranked.truncate(limit);
    ranked
}

pub fn available_today(doctors: &[Doctor]) -> Vec<Doctor> {
    doctors.iter().filter(|d| d.available_today).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::test_utils::MockBackendResponses;

    fn fixture() -> Vec<Doctor> {
        serde_json::from_value(MockBackendResponses::doctors()).unwrap()
    }

    fn filters() -> DoctorFilters {
        DoctorFilters::default()
    }

    fn names(doctors: &[Doctor]) -> Vec<&str> {
        doctors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let all = fixture();
        assert_eq!(filter_doctors(&all, &filters()), all);
    }

    #[test]
    fn test_search_matches_specialty_case_insensitively() {
        let result = filter_doctors(
            &fixture(),
            &DoctorFilters {
                search: Some("cardiology".into()),
                ..filters()
            },
        );
        assert_eq!(names(&result), vec!["Dr. Sarah Smith"]);
    }

    #[test]
    fn test_search_matches_hospital_and_name() {
        let by_hospital = filter_doctors(
            &fixture(),
            &DoctorFilters {
                search: Some("children".into()),
                ..filters()
            },
        );
        assert_eq!(names(&by_hospital), vec!["Dr. Emily Johnson"]);

        let by_name = filter_doctors(
            &fixture(),
            &DoctorFilters {
                search: Some("DAVIS".into()),
                ..filters()
            },
        );
        assert_eq!(names(&by_name), vec!["Dr. John Davis"]);
    }

    #[test]
    fn test_specialty_is_exact_not_substring() {
        let partial = filter_doctors(
            &fixture(),
            &DoctorFilters {
                specialty: Some("Cardio".into()),
                ..filters()
            },
        );
        assert!(partial.is_empty());

        let exact = filter_doctors(
            &fixture(),
            &DoctorFilters {
                specialty: Some("pediatrics".into()),
                ..filters()
            },
        );
        assert_eq!(names(&exact), vec!["Dr. Emily Johnson"]);
    }

    #[test]
    fn test_filters_are_conjunctive_and_subset() {
        let all = fixture();
        let f = DoctorFilters {
            location: Some("new york".into()),
            available_today: true,
            search: Some("dr.".into()),
            ..filters()
        };
        let result = filter_doctors(&all, &f);

        assert_eq!(names(&result), vec!["Dr. Sarah Smith", "Dr. Emily Johnson"]);
        for doctor in &result {
            assert!(all.contains(doctor));
            assert!(doctor.available_today);
            assert!(doctor.location.to_lowercase().contains("new york"));
        }
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let f = DoctorFilters {
            search: Some("   ".into()),
            specialty: Some(String::new()),
            ..filters()
        };
        assert_eq!(filter_doctors(&fixture(), &f).len(), 3);
    }

    #[test]
    fn test_sort_orders() {
        let all = fixture();
        let by = |key| {
            filter_doctors(
                &all,
                &DoctorFilters {
                    sort_by: Some(key),
                    ..filters()
                },
            )
        };

        assert_eq!(names(&by(SortKey::Rating)), vec!["Dr. Emily Johnson", "Dr. Sarah Smith", "Dr. John Davis"]);
        assert_eq!(names(&by(SortKey::Experience)), vec!["Dr. Sarah Smith", "Dr. Emily Johnson", "Dr. John Davis"]);
        assert_eq!(names(&by(SortKey::Fee)), vec!["Dr. Emily Johnson", "Dr. John Davis", "Dr. Sarah Smith"]);
    }

    #[test]
    fn test_sort_is_stable_and_missing_values_sort_as_zero() {
        let mut doctors = fixture();
        doctors.push(Doctor {
            id: "4".into(),
            name: "Dr. Unrated".into(),
            ..Doctor::default()
        });
        doctors[1].rating = Some(4.8);

        let sorted = filter_doctors(
            &doctors,
            &DoctorFilters {
                sort_by: Some(SortKey::Rating),
                ..filters()
            },
        );
        assert_eq!(
            names(&sorted),
            vec!["Dr. Emily Johnson", "Dr. Sarah Smith", "Dr. John Davis", "Dr. Unrated"]
        );

        let by_fee = filter_doctors(
            &doctors,
            &DoctorFilters {
                sort_by: Some(SortKey::Fee),
                ..filters()
            },
        );
        assert_eq!(by_fee[0].name, "Dr. Unrated");
    }

    #[test]
    fn test_facets_are_sorted_and_unique() {
        let facets = facets(&fixture());
        assert_eq!(facets.specialties, vec!["Cardiology", "Orthopedics", "Pediatrics"]);
        assert_eq!(facets.locations, vec!["Los Angeles, CA", "New York, NY"]);
    }

    #[test]
    fn test_top_rated_and_available_today() {
        assert_eq!(names(&top_rated(&fixture(), 2)), vec!["Dr. Emily Johnson", "Dr. Sarah Smith"]);
        assert_eq!(available_today(&fixture()).len(), 2);
    }
}
