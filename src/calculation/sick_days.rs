//! Sickness sequences and graduated payment percentages.
//!
//! Statutory sick pay is graduated over consecutive sick days: the first
//! day of a sequence pays nothing, days two and three pay half, and from
//! day four on the full rate applies. A gap of more than one civil day
//! starts a new sequence.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Assigns each sick date its 1-based position within its sequence.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use wage_engine::calculation::sick_days::sick_day_numbers;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// let numbers = sick_day_numbers(&[d(10), d(11), d(12), d(20)]);
/// assert_eq!(numbers[&d(10)], 1);
/// assert_eq!(numbers[&d(12)], 3);
/// assert_eq!(numbers[&d(20)], 1); // gap resets the sequence
/// ```
pub fn sick_day_numbers(dates: &[NaiveDate]) -> HashMap<NaiveDate, u32> {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut numbers = HashMap::with_capacity(sorted.len());
    let mut day_in_sequence = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for date in sorted {
        day_in_sequence = match prev {
            Some(p) if (date - p).num_days() == 1 => day_in_sequence + 1,
            _ => 1,
        };
        numbers.insert(date, day_in_sequence);
        prev = Some(date);
    }
    numbers
}

/// The fraction of the hourly wage paid on the given sick-sequence day.
///
/// Day 1 pays 0%, days 2–3 pay 50%, day 4 onward pays 100%.
pub fn sick_payment_fraction(day_number: u32) -> Decimal {
    match day_number {
        0 | 1 => Decimal::ZERO,
        2 | 3 => Decimal::new(5, 1),
        _ => Decimal::ONE,
    }
}
