/// Memory controller utilization in percent, clamped to `[0, 100]`.
///
/// `None` means the source is unavailable or could not be read; it is never
/// folded into a zero reading.
pub fn emc_util(raw: Option<i64>) -> Option<f32> {
    raw.map(|v| (v as f32).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped() {
        assert_eq!(emc_util(Some(42)), Some(42.0));
        assert_eq!(emc_util(Some(250)), Some(100.0));
        assert_eq!(emc_util(Some(-1)), Some(0.0));
        assert_eq!(emc_util(Some(0)), Some(0.0));
    }

    #[test]
    fn unavailable() {
        assert_eq!(emc_util(None), None);
    }
}
