//! Read-side projections over the patient's records.

use std::cmp::Reverse;

use serde::Serialize;

use crate::models::{record_day, LabTest, Prescription, Vital};

pub const ALL_CATEGORIES: &str = "all";
const RECENT_LABS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsPoint {
    pub label: String,
    pub date: String,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub heart_rate: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VitalsView {
    pub latest: Option<Vital>,
    pub chart: Vec<VitalsPoint>,
    pub vitals: Vec<Vital>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabsView {
    pub categories: Vec<String>,
    pub selected: String,
    pub labs: Vec<LabTest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrescriptionsView {
    pub active: Vec<Prescription>,
    pub prescriptions: Vec<Prescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordsOverview {
    pub latest_vital: Option<Vital>,
    pub recent_labs: Vec<LabTest>,
    pub active_prescriptions: Vec<Prescription>,
}

/// The most recent reading; the first one listed wins a tie.
pub fn latest_vital(vitals: &[Vital]) -> Option<&Vital> {
    let mut latest: Option<&Vital> = None;
    for vital in vitals {
        match latest {
            Some(current) if record_day(&vital.date) <= record_day(&current.date) => {}
            _ => latest = Some(vital),
        }
    }
    latest
}

pub fn lab_categories(labs: &[LabTest]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for lab in labs {
        if !categories.iter().any(|c| c == &lab.category) {
            categories.push(lab.category.clone());
        }
    }
    categories
}

pub fn filter_labs(labs: &[LabTest], category: &str) -> Vec<LabTest> {
    if category == ALL_CATEGORIES {
        return labs.to_vec();
    }
    labs.iter().filter(|lab| lab.category == category).cloned().collect()
}

/// Chart series in ascending date order.
pub fn vitals_chart(vitals: &[Vital]) -> Vec<VitalsPoint> {
    let mut ordered: Vec<&Vital> = vitals.iter().collect();
    ordered.sort_by_key(|v| record_day(&v.date));

    ordered
        .into_iter()
        .map(|v| VitalsPoint {
            label: record_day(&v.date)
                .map(|d| d.format("%b %-d").to_string())
                .unwrap_or_else(|| v.date.clone()),
            date: v.date.clone(),
            systolic: v.blood_pressure.systolic,
            diastolic: v.blood_pressure.diastolic,
            heart_rate: v.heart_rate,
            blood_sugar: v.blood_sugar,
            weight: v.weight,
        })
        .collect()
}

pub fn active_prescriptions(prescriptions: &[Prescription]) -> Vec<Prescription> {
    prescriptions.iter().filter(|p| p.is_active()).cloned().collect()
}

pub fn recent_labs(labs: &[LabTest], limit: usize) -> Vec<LabTest> {
    let mut ordered: Vec<&LabTest> = labs.iter().collect();
    ordered.sort_by_key(|lab| Reverse(record_day(&lab.date)));
    ordered.into_iter().take(limit).cloned().collect()
}

pub fn vitals_view(vitals: Vec<Vital>) -> VitalsView {
    VitalsView {
        latest: latest_vital(&vitals).cloned(),
        chart: vitals_chart(&vitals),
        vitals,
    }
}

pub fn labs_view(labs: Vec<LabTest>, category: Option<&str>) -> LabsView {
    let selected = category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(ALL_CATEGORIES)
        .to_string();

    LabsView {
        categories: lab_categories(&labs),
        labs: filter_labs(&labs, &selected),
        selected,
    }
}

pub fn prescriptions_view(prescriptions: Vec<Prescription>) -> PrescriptionsView {
    PrescriptionsView {
        active: active_prescriptions(&prescriptions),
        prescriptions,
    }
}

pub fn overview(vitals: &[Vital], labs: &[LabTest], prescriptions: &[Prescription]) -> RecordsOverview {
    RecordsOverview {
        latest_vital: latest_vital(vitals).cloned(),
        recent_labs: recent_labs(labs, RECENT_LABS),
        active_prescriptions: active_prescriptions(prescriptions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodPressure;

    fn vital(id: &str, date: &str, systolic: f64) -> Vital {
        Vital {
            id: id.to_string(),
            date: date.to_string(),
            blood_pressure: BloodPressure {
                systolic: Some(systolic),
                diastolic: Some(80.0),
            },
            heart_rate: Some(72.0),
            ..Default::default()
        }
    }

    fn lab(id: &str, date: &str, category: &str) -> LabTest {
        LabTest {
            id: id.to_string(),
            date: date.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    fn prescription(id: &str, status: &str) -> Prescription {
        Prescription {
            id: id.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_latest_vital_by_date() {
        let vitals = vec![
            vital("a", "2026-01-15", 118.0),
            vital("b", "2026-02-01", 120.0),
            vital("c", "2025-12-01", 125.0),
        ];
        assert_eq!(latest_vital(&vitals).map(|v| v.id.as_str()), Some("b"));
        assert!(latest_vital(&[]).is_none());
    }

    #[test]
    fn test_latest_vital_tie_keeps_first() {
        let vitals = vec![vital("a", "2026-02-01", 118.0), vital("b", "2026-02-01", 120.0)];
        assert_eq!(latest_vital(&vitals).map(|v| v.id.as_str()), Some("a"));
    }

    #[test]
    fn test_lab_categories_in_first_appearance_order() {
        let labs = vec![
            lab("1", "2026-01-20", "Blood Test"),
            lab("2", "2026-01-10", "Imaging"),
            lab("3", "2025-12-05", "Blood Test"),
            lab("4", "2025-11-01", "Lab Test"),
        ];
        assert_eq!(lab_categories(&labs), vec!["all", "Blood Test", "Imaging", "Lab Test"]);
        assert_eq!(filter_labs(&labs, "Blood Test").len(), 2);
        assert_eq!(filter_labs(&labs, "all").len(), 4);
        assert!(filter_labs(&labs, "Genetics").is_empty());
    }

    #[test]
    fn test_chart_is_ascending_with_short_labels() {
        let vitals = vec![vital("b", "2026-02-01", 120.0), vital("a", "2026-01-05", 118.0)];
        let chart = vitals_chart(&vitals);

        assert_eq!(chart[0].label, "Jan 5");
        assert_eq!(chart[0].systolic, Some(118.0));
        assert_eq!(chart[1].label, "Feb 1");
        assert_eq!(chart[1].heart_rate, Some(72.0));
    }

    #[test]
    fn test_overview() {
        let vitals = vec![vital("v1", "2026-02-01", 120.0)];
        let labs = vec![
            lab("1", "2025-11-01", "Lab Test"),
            lab("2", "2026-01-20", "Blood Test"),
            lab("3", "2026-01-10", "Imaging"),
            lab("4", "2025-12-05", "Blood Test"),
        ];
        let prescriptions = vec![prescription("p1", "active"), prescription("p2", "completed")];

        let summary = overview(&vitals, &labs, &prescriptions);

        assert_eq!(summary.latest_vital.map(|v| v.id), Some("v1".to_string()));
        let ids: Vec<_> = summary.recent_labs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
        assert_eq!(summary.active_prescriptions.len(), 1);
    }

    #[test]
    fn test_labs_view_defaults_to_all() {
        let labs = vec![lab("1", "2026-01-20", "Blood Test"), lab("2", "2026-01-10", "Imaging")];

        let view = labs_view(labs.clone(), None);
        assert_eq!(view.selected, "all");
        assert_eq!(view.labs.len(), 2);

        let view = labs_view(labs, Some("Imaging"));
        assert_eq!(view.labs.len(), 1);
        assert_eq!(view.categories.len(), 3);
    }
}
