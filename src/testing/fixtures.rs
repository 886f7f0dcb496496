//! Station list and small hand-checked inputs.

/// Weather stations with their long-run mean temperature.
pub const STATIONS: &[(&str, f64)] = &[
    ("Abha", 18.0),
    ("Abidjan", 26.0),
    ("Adelaide", 17.3),
    ("Bridgetown", 27.0),
    ("Bulawayo", 18.9),
    ("Conakry", 26.4),
    ("Cracow", 8.6),
    ("Dikson", -11.1),
    ("Hamburg", 9.7),
    ("Istanbul", 13.9),
    ("Oslo", 5.7),
    ("Palembang", 27.3),
    ("Petropavlovsk-Kamchatsky", 1.9),
    ("Roseau", 26.2),
    ("St. John's", 5.0),
    ("Yellowknife", -4.3),
    ("Zürich", 9.3),
    ("İzmir", 17.9),
    ("Ürümqi", 7.4),
];

/// Two stations, four lines; the report is
/// `{Hamburg=8.0/10.0/12.0, Oslo=3.5/3.5/3.5}`.
pub const HAMBURG_OSLO: &str = "Hamburg;12.0\nHamburg;8.0\nOslo;3.5\nOslo;3.5\n";

/// Rendered report of [`HAMBURG_OSLO`].
pub const HAMBURG_OSLO_REPORT: &str = "{Hamburg=8.0/10.0/12.0, Oslo=3.5/3.5/3.5}";

/// Negative values, a one-digit integer part and a station seen once.
pub const MIXED_SIGNS: &str = "\
Dikson;-3.5
Dikson;-0.5
Dikson;1.0
Abha;0.0
Yellowknife;-22.1
";
