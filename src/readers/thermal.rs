use crate::common::units::MILLI;

/// Convert a millidegree reading to degrees Celsius. Unreadable reads as zero.
pub fn temperature_c(millidegrees: Option<i64>) -> f32 {
    millidegrees.unwrap_or(0) as f32 / MILLI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millidegrees() {
        assert_eq!(temperature_c(Some(45500)), 45.5);
        assert_eq!(temperature_c(Some(-2000)), -2.0);
        assert_eq!(temperature_c(None), 0.0);
    }
}
