use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use shared_models::auth::User;

use crate::models::{Appointment, AppointmentStatus};
use crate::services::partition;

const UPCOMING_PREVIEW: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthTip {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub static HEALTH_TIPS: [HealthTip; 4] = [
    HealthTip {
        title: "Stay Hydrated",
        description: "Drink at least 8 glasses of water daily to maintain optimal health.",
        category: "Wellness",
    },
    HealthTip {
        title: "Regular Exercise",
        description: "Aim for 30 minutes of moderate exercise most days of the week.",
        category: "Fitness",
    },
    HealthTip {
        title: "Quality Sleep",
        description: "Get 7-9 hours of quality sleep each night for better health.",
        category: "Lifestyle",
    },
    HealthTip {
        title: "Balanced Diet",
        description: "Include fruits, vegetables, and whole grains in your daily meals.",
        category: "Nutrition",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct NextAppointment {
    pub appointment: Appointment,
    pub when: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub greeting: String,
    pub next_appointment: Option<NextAppointment>,
    pub upcoming_count: usize,
    pub completed_count: usize,
    pub upcoming_preview: Vec<Appointment>,
    pub health_tips: &'static [HealthTip],
}

pub fn greeting(now: NaiveDateTime) -> &'static str {
    match now.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// "Today", "Tomorrow", "in N days" within a week, otherwise "on Mon D".
pub fn days_until(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        days @ 2..=6 => format!("in {} days", days),
        _ => format!("on {}", date.format("%b %-d")),
    }
}

pub fn build_summary(user: &User, appointments: &[Appointment], now: NaiveDateTime) -> DashboardSummary {
    let today = now.date();
    let upcoming = partition::partition(appointments, today).upcoming;

    let completed_count = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .count();

    let next_appointment = upcoming.first().map(|appointment| NextAppointment {
        when: appointment
            .day()
            .map(|day| days_until(day, today))
            .unwrap_or_default(),
        appointment: appointment.clone(),
    });

    let first_name = user.name.split_whitespace().next().unwrap_or_default();
    let salutation = if first_name.is_empty() {
        greeting(now).to_string()
    } else {
        format!("{}, {}", greeting(now), first_name)
    };

    DashboardSummary {
        greeting: salutation,
        next_appointment,
        upcoming_count: upcoming.len(),
        completed_count,
        upcoming_preview: upcoming.into_iter().take(UPCOMING_PREVIEW).collect(),
        health_tips: &HEALTH_TIPS,
    }
}
