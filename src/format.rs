//! Presentation formatting helpers.
//!
//! All user-facing text on the console is Vietnamese; numbers use vi-VN
//! grouping (dot thousands separator, comma decimal separator).

use jiff::Timestamp;

/// Escape text for insertion into an HTML fragment.
///
/// Applied to every user-entered field before it is rendered into a row or
/// option, so names and descriptions cannot inject markup.
///
/// # Examples
///
/// ```
/// use gem_console::format::escape_html;
///
/// assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Group an integer with vi-VN thousands separators.
///
/// # Examples
///
/// ```
/// use gem_console::format::format_number;
///
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(-4500), "-4.500");
/// ```
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Accuracy percentage with one decimal, e.g. `97.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Price in Vietnamese đồng: grouped integer part, comma decimals only when
/// the value is fractional, `VNĐ` suffix.
///
/// # Examples
///
/// ```
/// use gem_console::format::format_price;
///
/// assert_eq!(format_price(15000.0), "15.000 VNĐ");
/// assert_eq!(format_price(15000.5), "15.000,50 VNĐ");
/// ```
pub fn format_price(value: f64) -> String {
    let whole = value.trunc() as i64;
    let fract = (value.fract().abs() * 100.0).round() as i64;
    if fract == 0 {
        format!("{} VNĐ", format_number(whole))
    } else {
        format!("{},{fract:02} VNĐ", format_number(whole))
    }
}

/// Relative "time since" label for an ISO 8601 timestamp.
///
/// Mirrors the list column behavior: days, then hours, then minutes, with a
/// floor of one second so a just-updated row reads "vừa xong". Unparseable
/// or missing timestamps render as "-".
pub fn time_ago(iso: &str, now: Timestamp) -> String {
    let Ok(then) = iso.parse::<Timestamp>() else {
        return "-".to_string();
    };
    let delta = (now.as_second() - then.as_second()).max(1);
    let minutes = delta / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{days} ngày trước")
    } else if hours > 0 {
        format!("{hours} giờ trước")
    } else if minutes > 0 {
        format!("{minutes} phút trước")
    } else {
        "vừa xong".to_string()
    }
}

/// Absolute creation date, `dd/mm/yyyy hh:mm`, or "—" when unparseable.
pub fn format_datetime(iso: &str) -> String {
    match iso.parse::<Timestamp>() {
        Ok(t) => t.strftime("%d/%m/%Y %H:%M").to_string(),
        Err(_) => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(iso: &str) -> Timestamp {
        iso.parse().unwrap()
    }

    #[test]
    fn test_escape_html_passthrough() {
        assert_eq!(escape_html("Trà sữa 100%"), "Trà sữa 100%");
    }

    #[test]
    fn test_escape_html_script() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_format_number_groups() {
        assert_eq!(format_number(1), "1");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1.234");
        assert_eq!(format_number(12345), "12.345");
        assert_eq!(format_number(123456789), "123.456.789");
    }

    #[test]
    fn test_format_percent_one_decimal() {
        assert_eq!(format_percent(97.46), "97.5%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = at("2026-03-01T12:00:00Z");
        assert_eq!(time_ago("2026-03-01T11:59:59Z", now), "vừa xong");
        assert_eq!(time_ago("2026-03-01T11:55:00Z", now), "5 phút trước");
        assert_eq!(time_ago("2026-03-01T09:00:00Z", now), "3 giờ trước");
        assert_eq!(time_ago("2026-02-27T12:00:00Z", now), "2 ngày trước");
    }

    #[test]
    fn test_time_ago_future_floors_to_just_now() {
        let now = at("2026-03-01T12:00:00Z");
        assert_eq!(time_ago("2026-03-01T12:05:00Z", now), "vừa xong");
    }

    #[test]
    fn test_time_ago_invalid() {
        let now = at("2026-03-01T12:00:00Z");
        assert_eq!(time_ago("not-a-date", now), "-");
        assert_eq!(time_ago("", now), "-");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2026-03-01T05:04:00Z"), "01/03/2026 05:04");
        assert_eq!(format_datetime("garbage"), "—");
    }
}
