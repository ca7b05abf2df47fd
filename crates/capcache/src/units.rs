//! Human-readable size normalization.
//!
//! Capacity strings are stored exactly as the remote tool printed them and
//! only turned into numbers when something needs to compare them.

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;
const PIB: f64 = TIB * 1024.0;

/// Convert a capacity string such as `"1.2 TiB"` or `"500M"` into bytes.
///
/// Units are binary and case-insensitive: `B`, `K`/`KB`/`KiB`, `M`/`MB`/`MiB`,
/// `G`/`GB`/`GiB`, `T`/`TB`/`TiB`, `P`/`PB`/`PiB`. An unrecognized unit counts
/// as bytes. Empty or unparseable input yields 0, which callers treat as
/// "unknown". The result is rounded to the nearest byte.
pub fn normalize(input: &str) -> u64 {
    let (number, unit) = split_number(input.trim());

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };

    let bytes = (value * unit_factor(unit)).round();
    if bytes.is_finite() && bytes > 0.0 {
        // `as` saturates at u64::MAX
        bytes as u64
    } else {
        0
    }
}

/// Split `"12.5 GiB"` into `("12.5", "GiB")`, tolerating a missing space.
pub(crate) fn split_number(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(input.len(), |(i, _)| i);
    (&input[..end], input[end..].trim())
}

fn unit_factor(unit: &str) -> f64 {
    // "1 TiB (1099511627776 Byte)" carries its unit in the first word
    let unit = unit.split_whitespace().next().unwrap_or("");
    match unit.to_ascii_lowercase().as_str() {
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => MIB,
        "g" | "gb" | "gib" => GIB,
        "t" | "tb" | "tib" => TIB,
        "p" | "pb" | "pib" => PIB,
        // "", "b", "byte", "bytes" and anything unrecognized
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(normalize(""), 0);
        assert_eq!(normalize("   "), 0);
    }

    #[test]
    fn test_unknown_unit_is_bytes() {
        assert_eq!(normalize("5 XYZ"), 5);
        assert_eq!(normalize("5"), 5);
        assert_eq!(normalize("5 B"), 5);
        assert_eq!(normalize("5 Byte"), 5);
    }

    #[test]
    fn test_binary_units() {
        assert_eq!(normalize("1 KiB"), 1024);
        assert_eq!(normalize("1 MiB"), 1024 * 1024);
        assert_eq!(normalize("1 GiB"), 1024 * normalize("1 MiB"));
        assert_eq!(normalize("1 TiB"), 1024 * normalize("1 GiB"));
        assert_eq!(normalize("1 PiB"), 1024 * normalize("1 TiB"));
    }

    #[test]
    fn test_unit_aliases() {
        let gib = normalize("2 GiB");
        assert_eq!(normalize("2 G"), gib);
        assert_eq!(normalize("2 GB"), gib);
        assert_eq!(normalize("2 gib"), gib);
        assert_eq!(normalize("2GiB"), gib);
        assert_eq!(normalize("2g"), gib);
        assert_eq!(normalize("2 GiB (2147483648 Byte)"), gib);
    }

    #[test]
    fn test_fractional_values_round() {
        assert_eq!(normalize("1.5 KiB"), 1536);
        assert_eq!(normalize("1.2 TiB"), (1.2 * TIB).round() as u64);
        assert_eq!(normalize("2.5 B"), 3);
        assert_eq!(normalize("0.4 B"), 0);
    }

    #[test]
    fn test_monotonic_for_fixed_unit() {
        let values = ["0.1", "0.5", "1", "1.05", "12.3", "100", "1023.9"];
        for unit in ["B", "KiB", "MiB", "GiB", "TiB"] {
            let bytes: Vec<u64> = values
                .iter()
                .map(|v| normalize(&format!("{v} {unit}")))
                .collect();
            assert!(bytes.windows(2).all(|w| w[0] <= w[1]), "{unit}: {bytes:?}");
        }
    }

    #[test]
    fn test_garbage_never_panics() {
        assert_eq!(normalize("abc"), 0);
        assert_eq!(normalize("GiB"), 0);
        assert_eq!(normalize("1.2.3 GiB"), 0);
        assert_eq!(normalize("-3 GiB"), 0);
        assert_eq!(normalize("off"), 0);
        assert_eq!(normalize("∞ GiB"), 0);
    }

    #[test]
    fn test_split_number() {
        assert_eq!(split_number("12.5 GiB"), ("12.5", "GiB"));
        assert_eq!(split_number("12.5GiB"), ("12.5", "GiB"));
        assert_eq!(split_number("7"), ("7", ""));
        assert_eq!(split_number("GiB"), ("", "GiB"));
    }
}
