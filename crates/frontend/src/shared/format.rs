//! Форматирование чисел и дат для виджетов

/// Вставляет пробел каждые 3 цифры целой части
fn group_thousands(integer_part: &str) -> String {
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(' ');
        }
        result.push(c);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Число с разделителем тысяч и заданным количеством знаков после точки
pub fn format_number_with_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value, prec = decimals);
    match formatted.split_once('.') {
        Some((integer, fraction)) => format!("{}.{}", group_thousands(integer), fraction),
        None => group_thousands(&formatted),
    }
}

/// KPI/gauge value: integers without decimals, everything else with two
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 {
        format_number_with_decimals(value, 0)
    } else {
        format_number_with_decimals(value, 2)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// RFC 3339 → "dd.mm.yyyy HH:MM" (local time); unparsable input is returned as is
pub fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%d.%m.%Y %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_with_decimals() {
        assert_eq!(format_number_with_decimals(1234.567, 0), "1 235");
        assert_eq!(format_number_with_decimals(1234.567, 2), "1 234.57");
        assert_eq!(format_number_with_decimals(-1234567.0, 0), "-1 234 567");
        assert_eq!(format_number_with_decimals(12.0, 1), "12.0");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(480.0), "480");
        assert_eq!(format_value(125000.0), "125 000");
        assert_eq!(format_value(10.5), "10.50");
        assert_eq!(format_value(-0.25), "-0.25");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(33.333), "33.3%");
    }

    #[test]
    fn test_format_timestamp_fallback() {
        assert_eq!(format_timestamp("not a date"), "not a date");
        assert!(!format_timestamp("2024-03-01T10:15:00Z").is_empty());
    }
}
