/// Memory usage in kilobytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used_kb: u64,
    pub available_kb: u64,
}

/// Parse `/proc/meminfo`. Used memory is `MemTotal - MemAvailable`, floored at
/// zero. Missing fields read as zero.
pub fn parse_meminfo(data: &str) -> MemoryUsage {
    let mut total: Option<u64> = None;
    let mut available: Option<u64> = None;

    for line in data.lines() {
        let mut parts = line.split_whitespace();

        let field = match parts.next() {
            Some("MemTotal:") => &mut total,
            Some("MemAvailable:") => &mut available,
            _ => continue,
        };

        *field = parts.next().and_then(|v| v.parse::<u64>().ok());

        if total.is_some() && available.is_some() {
            break;
        }
    }

    let total = total.unwrap_or(0);
    let available = available.unwrap_or(0);

    MemoryUsage {
        used_kb: total.saturating_sub(available),
        available_kb: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meminfo() {
        let data = "MemTotal:       64349376 kB\n\
                    MemFree:        35131272 kB\n\
                    MemAvailable:   57722372 kB\n\
                    Buffers:          123456 kB\n";
        let usage = parse_meminfo(data);
        assert_eq!(usage.available_kb, 57722372);
        assert_eq!(usage.used_kb, 64349376 - 57722372);
    }

    #[test]
    fn available_exceeding_total() {
        let data = "MemTotal: 100 kB\nMemAvailable: 150 kB\n";
        let usage = parse_meminfo(data);
        assert_eq!(usage.used_kb, 0);
        assert_eq!(usage.available_kb, 150);
    }

    #[test]
    fn field_order_and_spacing() {
        let data = "MemFree:\t1 kB\nMemAvailable:\t\t300 kB\nCached: 5 kB\nMemTotal:  1000 kB\n";
        let usage = parse_meminfo(data);
        assert_eq!(usage.used_kb, 700);
        assert_eq!(usage.available_kb, 300);
    }

    #[test]
    fn missing_fields() {
        assert_eq!(parse_meminfo(""), MemoryUsage::default());
        let usage = parse_meminfo("MemTotal: 2048 kB\nMemFree: garbage\n");
        assert_eq!(usage.used_kb, 2048);
        assert_eq!(usage.available_kb, 0);
    }
}
