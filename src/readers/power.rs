use crate::common::units::MILLI;

/// One power rail reading. Power is derived here, at sample time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RailReading {
    pub voltage_mv: u32,
    pub current_ma: u32,
    pub power_mw: f32,
}

/// Combine a voltage (mV) and current (mA) read into a rail reading, with
/// power in mW. Unreadable or negative values read as zero.
pub fn rail_reading(voltage_mv: Option<i64>, current_ma: Option<i64>) -> RailReading {
    let voltage_mv = voltage_mv.and_then(|v| u32::try_from(v).ok()).unwrap_or(0);
    let current_ma = current_ma.and_then(|v| u32::try_from(v).ok()).unwrap_or(0);

    RailReading {
        voltage_mv,
        current_ma,
        power_mw: voltage_mv as f32 * current_ma as f32 / MILLI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_is_derived() {
        let reading = rail_reading(Some(5000), Some(1200));
        assert_eq!(reading.voltage_mv, 5000);
        assert_eq!(reading.current_ma, 1200);
        assert_eq!(reading.power_mw, 6000.0);
    }

    #[test]
    fn degraded_reads() {
        assert_eq!(rail_reading(None, Some(100)).power_mw, 0.0);
        assert_eq!(rail_reading(Some(-5), Some(100)), RailReading {
            voltage_mv: 0,
            current_ma: 100,
            power_mw: 0.0,
        });
    }
}
