use crate::error::{ConversionError, Result};
use crate::utils::constants::{
    SEXAGESIMAL_FRACTION_DIGITS, SEXAGESIMAL_FRACTION_SCALE, DECODE_DECIMAL_SCALE,
};

/// Convert decimal degrees to the compact sexagesimal form `DDDMMSS.sssss`.
///
/// Minutes and whole seconds are zero-padded to two digits, fractional seconds
/// to five. The degree field keeps its natural width. Rounding happens once, at
/// the fifth fractional-second digit, half away from zero, and carries into
/// minutes and degrees.
///
/// # Examples
/// ```
/// use track_datum::utils::coordinates::encode_sexagesimal;
///
/// assert_eq!(encode_sexagesimal(35.5).unwrap(), "353000.00000");
/// assert_eq!(encode_sexagesimal(139.0).unwrap(), "1390000.00000");
/// ```
pub fn encode_sexagesimal(decimal: f64) -> Result<String> {
    if !decimal.is_finite() || decimal.abs() > 180.0 {
        return Err(ConversionError::Format(format!(
            "Decimal degrees out of range: {}",
            decimal
        )));
    }

    let sign = if decimal < 0.0 { "-" } else { "" };

    // Work in units of 1e-5 arc seconds so the carry is exact.
    let units_per_second = SEXAGESIMAL_FRACTION_SCALE;
    let units_per_minute = units_per_second * 60;
    let units_per_degree = units_per_minute * 60;

    let total_units = (decimal.abs() * 3600.0 * units_per_second as f64).round() as u64;

    let degrees = total_units / units_per_degree;
    let minutes = (total_units % units_per_degree) / units_per_minute;
    let second_units = total_units % units_per_minute;
    let seconds = second_units / units_per_second;
    let fraction = second_units % units_per_second;

    Ok(format!(
        "{}{}{:02}{:02}.{:0width$}",
        sign,
        degrees,
        minutes,
        seconds,
        fraction,
        width = SEXAGESIMAL_FRACTION_DIGITS
    ))
}

/// Convert compact sexagesimal text (`DDDMMSS.sssss`) back to decimal degrees,
/// rounded to eight decimal places.
///
/// # Examples
/// ```
/// use track_datum::utils::coordinates::decode_sexagesimal;
///
/// let decimal = decode_sexagesimal("354122.12345").unwrap();
/// assert!((decimal - 35.68947874).abs() < 1e-9);
/// ```
pub fn decode_sexagesimal(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let (is_negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (int_part, frac_part) = body.split_once('.').ok_or_else(|| {
        ConversionError::Format(format!("Missing decimal separator in '{}'", text))
    })?;

    if int_part.len() < 4 {
        return Err(ConversionError::Format(format!(
            "Expected at least 4 integer digits in '{}'",
            text
        )));
    }

    if frac_part.is_empty() {
        return Err(ConversionError::Format(format!(
            "Missing fractional seconds in '{}'",
            text
        )));
    }

    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ConversionError::Format(format!(
            "Non-numeric segment in '{}'",
            text
        )));
    }

    let (degree_digits, rest) = int_part.split_at(int_part.len() - 4);
    let (minute_digits, second_digits) = rest.split_at(2);

    let degrees = if degree_digits.is_empty() {
        0.0
    } else {
        degree_digits.parse::<f64>().map_err(|_| {
            ConversionError::Format(format!("Invalid degrees value: '{}'", degree_digits))
        })?
    };

    let minutes = minute_digits.parse::<f64>().map_err(|_| {
        ConversionError::Format(format!("Invalid minutes value: '{}'", minute_digits))
    })?;

    let seconds = format!("{}.{}", second_digits, frac_part)
        .parse::<f64>()
        .map_err(|_| {
            ConversionError::Format(format!(
                "Invalid seconds value: '{}.{}'",
                second_digits, frac_part
            ))
        })?;

    // Validate ranges
    if !(0.0..60.0).contains(&minutes) {
        return Err(ConversionError::Format(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(ConversionError::Format(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees + minutes / 60.0 + seconds / 3600.0;
    let rounded = (decimal_value * DECODE_DECIMAL_SCALE).round() / DECODE_DECIMAL_SCALE;

    if is_negative {
        Ok(-rounded)
    } else {
        Ok(rounded)
    }
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_half_degree() {
        assert_eq!(encode_sexagesimal(35.5).unwrap(), "353000.00000");
    }

    #[test]
    fn test_encode_whole_degrees_pads_zeros() {
        assert_eq!(encode_sexagesimal(35.0).unwrap(), "350000.00000");
        assert_eq!(encode_sexagesimal(0.0).unwrap(), "00000.00000");
        assert_eq!(encode_sexagesimal(139.0).unwrap(), "1390000.00000");
    }

    #[test]
    fn test_encode_minute_second_carry() {
        // 0.6883333 deg = 41' 17.99988"
        assert_eq!(encode_sexagesimal(35.6883333).unwrap(), "354117.99988");
    }

    #[test]
    fn test_encode_rounds_up_into_next_minute() {
        // 59.999999" rounds to 60.00000" and must carry
        let value = 35.0 + 41.0 / 60.0 + 59.999999 / 3600.0;
        assert_eq!(encode_sexagesimal(value).unwrap(), "354200.00000");
    }

    #[test]
    fn test_encode_variable_degree_width() {
        assert_eq!(encode_sexagesimal(5.25).unwrap(), "51500.00000");
        assert_eq!(encode_sexagesimal(139.75).unwrap(), "1394500.00000");
    }

    #[test]
    fn test_encode_negative() {
        assert_eq!(encode_sexagesimal(-0.1275).unwrap(), "-00739.00000");
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(encode_sexagesimal(f64::NAN).is_err());
        assert!(encode_sexagesimal(181.0).is_err());
    }

    #[test]
    fn test_decode_reference_value() {
        let decoded = decode_sexagesimal("354122.12345").unwrap();
        let expected = 35.0 + 41.0 / 60.0 + 22.12345 / 3600.0;
        assert!((decoded - expected).abs() < 1e-8);
        assert!((decoded - 35.68947874).abs() < 1e-9);
    }

    #[test]
    fn test_decode_degree_widths() {
        assert!((decode_sexagesimal("51500.00000").unwrap() - 5.25).abs() < 1e-9);
        assert!((decode_sexagesimal("1394500.00000").unwrap() - 139.75).abs() < 1e-9);
        assert!((decode_sexagesimal("3000.00000").unwrap() - 0.5).abs() < 1e-9);
        assert!((decode_sexagesimal("-00739.00000").unwrap() - -0.1275).abs() < 1e-9);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(decode_sexagesimal("354122").is_err()); // no separator
        assert!(decode_sexagesimal("122.12345").is_err()); // too few integer digits
        assert!(decode_sexagesimal("35a122.12345").is_err());
        assert!(decode_sexagesimal("354122.").is_err());
        assert!(decode_sexagesimal("356122.00000").is_err()); // invalid minutes
        assert!(decode_sexagesimal("354172.00000").is_err()); // invalid seconds
        assert!(decode_sexagesimal("").is_err());
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let samples = [
            0.0, 0.000001, 1.23456789, 35.6883333, 35.68947874, 89.9999, 139.76712345,
            179.99999, -33.8688, -151.2093, 45.1234567,
        ];
        for value in samples {
            let encoded = encode_sexagesimal(value).unwrap();
            let decoded = decode_sexagesimal(&encoded).unwrap();
            assert!(
                (decoded - value).abs() < 1e-5,
                "{} -> {} -> {}",
                value,
                encoded,
                decoded
            );
        }
    }

    #[test]
    fn test_haversine_distance() {
        // Tokyo Station to Yokohama Station
        let distance = haversine_distance(35.6812, 139.7671, 35.4657, 139.6223);
        assert!((distance - 27.3).abs() < 1.5);
    }
}
