/// Split an amount into whole rupees and paise, rounding to the nearest paisa
pub(super) fn split_paise(amount: f64) -> (bool, u64, u64) {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    (negative && cents > 0, cents / 100, cents % 100)
}

/// Group digits the Indian way: last three, then pairs (`12,34,567`)
pub fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Format an amount as Indian rupees, e.g. `₹12,34,567.89` or `-₹50.00`
pub fn format_inr(amount: f64) -> String {
    let (negative, rupees, paise) = split_paise(amount);
    format!(
        "{}₹{}.{:02}",
        if negative { "-" } else { "" },
        group_indian(rupees),
        paise
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1000), "1,000");
        assert_eq!(group_indian(123456), "1,23,456");
        assert_eq!(group_indian(1234567), "12,34,567");
        assert_eq!(group_indian(123456789), "12,34,56,789");
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(1234567.891), "₹12,34,567.89");
        assert_eq!(format_inr(25000.5), "₹25,000.50");
        assert_eq!(format_inr(-50.0), "-₹50.00");
        assert_eq!(format_inr(-0.001), "₹0.00");
    }

    #[test]
    fn test_rounding_carries_into_rupees() {
        assert_eq!(format_inr(999.999), "₹1,000.00");
    }
}
