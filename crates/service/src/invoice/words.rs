//! Rupee amounts spelled out with Indian grouping (crore, lakh, thousand).

use rust_decimal::{prelude::ToPrimitive, Decimal};

use models::validate::round_money;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven", "Twelve",
    "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = ["", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety"];

fn below_hundred(n: u64) -> String {
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

fn below_thousand(n: u64) -> String {
    let (h, rest) = (n / 100, n % 100);
    match (h, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

/// Whole number in words; zero is "Zero".
pub fn number_in_words(mut n: u64) -> String {
    if n == 0 {
        return "Zero".into();
    }
    let mut parts = Vec::new();
    let crore = n / 10_000_000;
    n %= 10_000_000;
    if crore > 0 {
        // crores above 99 are themselves grouped
        parts.push(format!("{} Crore", number_in_words(crore)));
    }
    for (unit, name) in [(100_000u64, "Lakh"), (1_000, "Thousand")] {
        let q = n / unit;
        n %= unit;
        if q > 0 {
            parts.push(format!("{} {}", below_hundred(q), name));
        }
    }
    if n > 0 {
        parts.push(below_thousand(n));
    }
    parts.join(" ")
}

/// "Rupees Five Hundred Ten and Fifty Paise Only".
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = round_money(amount.abs());
    let rupees = amount.trunc().to_u64().unwrap_or(0);
    let paise = ((amount - amount.trunc()) * Decimal::new(100, 0)).to_u64().unwrap_or(0);
    if paise == 0 {
        format!("Rupees {} Only", number_in_words(rupees))
    } else {
        format!("Rupees {} and {} Paise Only", number_in_words(rupees), below_hundred(paise))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(number_in_words(0), "Zero");
        assert_eq!(number_in_words(7), "Seven");
        assert_eq!(number_in_words(15), "Fifteen");
        assert_eq!(number_in_words(40), "Forty");
        assert_eq!(number_in_words(99), "Ninety Nine");
        assert_eq!(number_in_words(100), "One Hundred");
        assert_eq!(number_in_words(305), "Three Hundred Five");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(number_in_words(1_000), "One Thousand");
        assert_eq!(number_in_words(12_345), "Twelve Thousand Three Hundred Forty Five");
        assert_eq!(number_in_words(1_00_000), "One Lakh");
        assert_eq!(number_in_words(2_50_075), "Two Lakh Fifty Thousand Seventy Five");
        assert_eq!(number_in_words(1_00_00_000), "One Crore");
        assert_eq!(
            number_in_words(12_34_56_789),
            "Twelve Crore Thirty Four Lakh Fifty Six Thousand Seven Hundred Eighty Nine"
        );
        assert_eq!(number_in_words(150_00_00_000), "One Hundred Fifty Crore");
    }

    #[test]
    fn rupees_and_paise() {
        assert_eq!(amount_in_words(Decimal::new(510, 0)), "Rupees Five Hundred Ten Only");
        assert_eq!(amount_in_words(Decimal::new(105050, 2)), "Rupees One Thousand Fifty and Fifty Paise Only");
        assert_eq!(amount_in_words(Decimal::new(5, 2)), "Rupees Zero and Five Paise Only");
        assert_eq!(amount_in_words(Decimal::new(99999, 3)), "Rupees One Hundred Only");
    }
}
