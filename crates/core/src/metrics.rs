//! Derived clinical values.
//!
//! Everything here is a pure function of its inputs. Derived values are never accepted from a
//! caller; they are recomputed whenever one of their inputs changes.

use crate::constants::BMI_DECIMALS;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Body-mass index from weight (kg) and height (cm), rounded to one decimal place.
///
/// Returns `None` when either input is absent, zero, negative, or not finite.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = positive(weight_kg?)?;
    let height_m = positive(height_cm?)? / 100.0;

    let bmi = weight / (height_m * height_m);
    if !bmi.is_finite() {
        return None;
    }
    Some(round_to(bmi, BMI_DECIMALS))
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// WHO adult BMI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    ObesityClassI,
    ObesityClassII,
    ObesityClassIII,
}

pub fn bmi_class(bmi: f64) -> Option<BmiClass> {
    if !bmi.is_finite() || bmi <= 0.0 {
        return None;
    }
    let class = match bmi {
        b if b < 18.5 => BmiClass::Underweight,
        b if b < 25.0 => BmiClass::Normal,
        b if b < 30.0 => BmiClass::Overweight,
        b if b < 35.0 => BmiClass::ObesityClassI,
        b if b < 40.0 => BmiClass::ObesityClassII,
        _ => BmiClass::ObesityClassIII,
    };
    Some(class)
}

/// Completed years of age on `day`, or `None` if `day` precedes the birth date.
pub fn age_on(birth_date: NaiveDate, day: NaiveDate) -> Option<u32> {
    if day < birth_date {
        return None;
    }
    let mut years = day.year() - birth_date.year();
    if (day.month(), day.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
