pub fn format_count(count: u64) -> String {
    let s = count.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn format_range(low: f64, high: f64, nbins: usize, log_spaced: bool) -> String {
    let spacing = if log_spaced { "log" } else { "lin" };
    format!("[{:.4e}, {:.4e}] x{} {}", low, high, nbins, spacing)
}

pub fn format_total(total: f64) -> String {
    if total.fract() == 0.0 && total.abs() < u64::MAX as f64 {
        let sign = if total < 0.0 { "-" } else { "" };
        format!("{}{}", sign, format_count(total.abs() as u64))
    } else {
        format!("{:.6e}", total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn totals_and_ranges() {
        assert_eq!(format_total(4200.0), "4,200");
        assert_eq!(format_total(-4200.0), "-4,200");
        assert_eq!(format_total(-0.0), "0");
        assert_eq!(format_total(0.5), "5.000000e-1");
        assert_eq!(format_range(0.1, 10.0, 4, true), "[1.0000e-1, 1.0000e1] x4 log");
    }
}
