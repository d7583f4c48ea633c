use super::currency::split_paise;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

/// Spell out a whole number in the Indian system (Crore, Lakh, Thousand,
/// Hundred), e.g. `123456` -> `One Lakh Twenty Three Thousand Four Hundred Fifty Six`
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    // Anything past 99 crore is counted in crores ("One Hundred Crore")
    if rest >= CRORE {
        parts.push(format!("{} Crore", number_to_words(rest / CRORE)));
        rest %= CRORE;
    }
    for (size, label) in [(LAKH, "Lakh"), (THOUSAND, "Thousand")] {
        if rest >= size {
            parts.push(format!("{} {}", below_hundred(rest / size), label));
            rest %= size;
        }
    }
    if rest >= 100 {
        parts.push(format!("{} Hundred", ONES[(rest / 100) as usize]));
        rest %= 100;
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }

    parts.join(" ")
}

/// Spell out a rupee amount: `Rupees Five Thousand and Fifty Paise Only`
pub fn amount_in_words(amount: f64) -> String {
    let (negative, rupees, paise) = split_paise(amount);
    let mut text = String::new();
    if negative {
        text.push_str("Minus ");
    }
    text.push_str("Rupees ");
    text.push_str(&number_to_words(rupees));
    if paise > 0 {
        text.push_str(" and ");
        text.push_str(&below_hundred(paise));
        text.push_str(" Paise");
    }
    text.push_str(" Only");
    text
}
