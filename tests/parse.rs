use anyhow::Result;
use ironbrc::parse::{parse_line, parse_measurement, parse_tenths, split_line};
use ironbrc::Error;

#[test]
fn splits_at_first_delimiter() -> Result<()> {
    let (station, value) = split_line(b"Hamburg;12.0")?;
    assert_eq!(station, b"Hamburg");
    assert_eq!(value, b"12.0");

    // Everything after the first `;` is value text and fails value parsing.
    let (station, value) = split_line(b"a;b;1.0")?;
    assert_eq!(station, b"a");
    assert_eq!(value, b"b;1.0");
    assert!(matches!(
        parse_line(b"a;b;1.0"),
        Err(Error::MalformedValue { .. })
    ));
    Ok(())
}

#[test]
fn missing_delimiter_is_malformed_line() {
    for line in [&b"Hamburg 12.0"[..], b"", b"12.0"] {
        assert!(
            matches!(split_line(line), Err(Error::MalformedLine { .. })),
            "{:?}",
            String::from_utf8_lossy(line)
        );
    }
}

#[test]
fn empty_station_is_malformed_line() {
    let err = parse_line(b";12.0").unwrap_err();
    assert!(matches!(err, Error::MalformedLine { reason: "empty station name", .. }));
    assert!(err.is_input_error());
}

#[test]
fn non_utf8_station_is_malformed_line() {
    assert!(matches!(
        parse_line(b"\xff\xfe;1.0"),
        Err(Error::MalformedLine { .. })
    ));
}

#[test]
fn parses_fixed_point_values() -> Result<()> {
    assert_eq!(parse_tenths(b"12.3")?, 123);
    assert_eq!(parse_tenths(b"-12.3")?, -123);
    assert_eq!(parse_tenths(b"0.0")?, 0);
    assert_eq!(parse_tenths(b"-0.5")?, -5);
    assert_eq!(parse_tenths(b"007.1")?, 71);
    assert_eq!(parse_tenths(b"-99.9")?, -999);

    assert_eq!(parse_measurement(b"-3.5")?, -3.5);
    assert_eq!(parse_measurement(b"3.5")?, 3.5);
    Ok(())
}

#[test]
fn negative_values_keep_sign_on_fraction() -> Result<()> {
    // -3.5 is -(3 + 0.5), not -3 + 0.5.
    assert_eq!(parse_measurement(b"-3.5")?, -3.5);
    assert_eq!(parse_measurement(b"-0.1")?, -0.1);
    Ok(())
}

#[test]
fn rejects_values_outside_the_format() {
    let cases: [&[u8]; 12] = [
        b"12",     // no decimal point
        b"12.",    // no fractional digit
        b"12.34",  // two fractional digits
        b".5",     // no integer digits
        b"-.5",    // no integer digits
        b"1e3",    // exponent
        b"1.5e3",  // exponent after fraction
        b"1,000.0", // thousands separator
        b"+1.0",   // explicit plus
        b"--1.0",  // double sign
        b"1.a",    // non-digit fraction
        b"",       // empty
    ];
    for value in cases {
        assert!(
            matches!(parse_measurement(value), Err(Error::MalformedValue { .. })),
            "{:?} should be rejected",
            String::from_utf8_lossy(value)
        );
    }
}

#[test]
fn long_values_parse_like_std() -> Result<()> {
    for text in [
        "99999999999999999999.0",
        "1000000000000000.0",
        "-1000000000000000.5",
        "900719925474099.1",
        "900719925474099.9",
        "123456789012345678901234567890.7",
    ] {
        let fast = parse_measurement(text.as_bytes())?;
        let slow: f64 = text.parse()?;
        assert_eq!(fast, slow, "{text}");
    }
    Ok(())
}

#[test]
fn tenths_stop_at_exact_range() -> Result<()> {
    assert_eq!(parse_tenths(b"900719925474098.9")?, 9_007_199_254_740_989);
    assert!(matches!(
        parse_tenths(b"1000000000000000.0"),
        Err(Error::MalformedValue { reason: "value out of range", .. })
    ));
    Ok(())
}

#[test]
fn long_values_are_still_validated() {
    for text in [&b"10000000000000000x.0"[..], b"1000000000000000000.00", b"-10000000000000000000"] {
        assert!(
            matches!(parse_measurement(text), Err(Error::MalformedValue { .. })),
            "{:?}",
            String::from_utf8_lossy(text)
        );
    }
}

/// The fixed-point parser agrees with the standard float parser on every
/// value with up to three integer digits.
#[test]
fn matches_std_parser_for_all_short_values() -> Result<()> {
    for tenths in -9999i32..=9999 {
        let text = format!(
            "{}{}.{}",
            if tenths < 0 { "-" } else { "" },
            tenths.abs() / 10,
            tenths.abs() % 10
        );
        let fast = parse_measurement(text.as_bytes())?;
        let slow: f64 = text.parse()?;
        assert_eq!(fast, slow, "{text}");
    }
    Ok(())
}

#[test]
fn matches_std_parser_for_long_values() -> Result<()> {
    for text in ["123456789.9", "-900719925474.0", "4503599627370.5", "-0.0"] {
        let fast = parse_measurement(text.as_bytes())?;
        let slow: f64 = text.parse()?;
        assert_eq!(fast, slow, "{text}");
    }
    Ok(())
}

#[test]
fn error_messages_echo_truncated_input() {
    let long = format!("{};1.0", "x".repeat(200)).replace(';', " ");
    let msg = parse_line(long.as_bytes()).unwrap_err().to_string();
    assert!(msg.starts_with("malformed line"));
    assert!(msg.contains("..."));
    assert!(msg.len() < 150);
}
