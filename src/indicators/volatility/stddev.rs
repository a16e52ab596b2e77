//! Close-price standard deviation

use crate::common::math;
use crate::models::indicators::VolatilityIndicator;

/// Population standard deviation of the last `period` closes
pub fn calculate_volatility(closes: &[f64], period: u32) -> Option<VolatilityIndicator> {
    let std_dev = math::standard_deviation(closes, period as usize)?;
    Some(VolatilityIndicator { std_dev, period })
}
