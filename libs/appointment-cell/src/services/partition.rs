use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentLists, AppointmentStatus};

/// Not cancelled and dated today or later.
pub fn is_upcoming(appointment: &Appointment, today: NaiveDate) -> bool {
    appointment.status != AppointmentStatus::Cancelled && appointment.day().is_some_and(|day| day >= today)
}

/// Dated before today, or completed regardless of date.
pub fn is_past(appointment: &Appointment, today: NaiveDate) -> bool {
    appointment.status == AppointmentStatus::Completed || appointment.day().is_some_and(|day| day < today)
}

/// Splits appointments into upcoming (soonest first) and past (latest first).
///
/// The two predicates overlap: a completed visit dated today lands in both
/// lists, and a cancelled future visit lands in neither.
pub fn partition(appointments: &[Appointment], today: NaiveDate) -> AppointmentLists {
    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|a| is_upcoming(a, today))
        .cloned()
        .collect();
    upcoming.sort_by_key(|a| a.day());

    let mut past: Vec<Appointment> = appointments
        .iter()
        .filter(|a| is_past(a, today))
        .cloned()
        .collect();
    past.sort_by(|a, b| b.day().cmp(&a.day()));

    AppointmentLists { upcoming, past }
}
