//! Example varieties loaded at startup

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{NewVariety, Variety, DATE_FORMAT};

use crate::error::{AppError, AppResult};

/// (crop, variety, yield kg, sowing date, harvest days, health rating)
const SAMPLE_VARIETIES: [(&str, &str, &str, &str, u32, u8); 12] = [
    ("Tomato", "Cherry", "25.5", "2025-03-15", 70, 4),
    ("Lettuce", "Butterhead", "12.3", "2025-04-01", 45, 5),
    ("Cucumber", "Marketmore", "30.0", "2025-04-10", 60, 3),
    ("Spinach", "Bloomsdale", "8.7", "2025-03-20", 40, 4),
    ("Basil", "Sweet Basil", "5.2", "2025-04-05", 30, 5),
    ("Capsicum", "California Wonder", "18.5", "2025-03-25", 80, 3),
    ("Carrot", "Nantes", "15.0", "2025-04-15", 70, 4),
    ("Onion", "Red Creole", "22.3", "2025-03-10", 90, 2),
    ("Potato", "Yukon Gold", "40.0", "2025-04-20", 100, 5),
    ("Broccoli", "Calabrese", "14.8", "2025-04-05", 85, 3),
    ("Kale", "Curly Kale", "10.5", "2025-03-30", 50, 4),
    ("Beans", "Kentucky Wonder", "20.0", "2025-04-25", 55, 4),
];

/// The twelve example varieties with ids "1" through "12"
pub fn sample_varieties() -> AppResult<Vec<Variety>> {
    SAMPLE_VARIETIES
        .iter()
        .enumerate()
        .map(|(index, &(crop, variety, yield_kg, sowing, days, rating))| -> AppResult<Variety> {
            let input = NewVariety {
                crop_name: crop.to_string(),
                variety_name: variety.to_string(),
                expected_yield: Decimal::from_str(yield_kg)
                    .map_err(|e| AppError::Internal(format!("bad sample yield {}: {}", yield_kg, e)))?,
                sowing_date: NaiveDate::parse_from_str(sowing, DATE_FORMAT)
                    .map_err(|e| AppError::Internal(format!("bad sample date {}: {}", sowing, e)))?,
                expected_harvest_days: days,
                health_rating: rating,
                estimated_harvest_date: None,
            };

            Ok(Variety::from_new((index + 1).to_string(), input)?)
        })
        .collect()
}
