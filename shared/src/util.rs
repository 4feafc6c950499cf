/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format an amount for customer-facing messages.
///
/// # Examples
///
/// ```
/// use shared::util::format_price;
///
/// assert_eq!(format_price(12.5), "$12.50");
/// assert_eq!(format_price(0.0), "$0.00");
/// ```
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(8.0), "$8.00");
        assert_eq!(format_price(10.995), "$11.00");
    }

    #[test]
    fn test_now_millis_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }
}
