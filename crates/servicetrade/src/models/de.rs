//! Lenient field deserializers.
//!
//! The API is not consistent about scalar types: ids and timestamps
//! sometimes arrive as strings, booleans as `"true"`/`"1"`.

use serde::de;
use serde::{Deserialize, Deserializer};

// Helper to deserialize an integer that may arrive as a string
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntVisitor;

    impl<'de> de::Visitor<'de> for IntVisitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer or numeric string")
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("integer {} out of range", v)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.fract() == 0.0 {
                Ok(Some(v as i64))
            } else {
                Err(E::custom(format!("expected an integer, got {}", v)))
            }
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("expected an integer, got {:?}", v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IntVisitor)
}

// Helper to deserialize bools, "true"/"false" strings, or 0/1
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl<'de> de::Visitor<'de> for BoolVisitor {
        type Value = Option<bool>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a boolean, 0/1, or string 'true'/'false'")
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v != 0))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v != 0))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            match v.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Some(true)),
                "" => Ok(None),
                _ => Ok(Some(false)),
            }
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

// Helper to deserialize a float that may arrive as a string
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FloatVisitor;

    impl<'de> de::Visitor<'de> for FloatVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got {:?}", v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(FloatVisitor)
}

/// One polygon coordinate; a number or numeric string, never blank.
struct Coordinate(f64);

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_f64(deserializer)?
            .map(Coordinate)
            .ok_or_else(|| de::Error::custom("missing coordinate"))
    }
}

// Helper to deserialize `[lat, lon]` pairs whose values may be strings
pub(crate) fn lenient_points<'de, D>(deserializer: D) -> Result<Option<Vec<[f64; 2]>>, D::Error>
where
    D: Deserializer<'de>,
{
    let points: Option<Vec<[Coordinate; 2]>> = Option::deserialize(deserializer)?;
    Ok(points.map(|points| {
        points
            .into_iter()
            .map(|[lat, lon]| [lat.0, lon.0])
            .collect()
    }))
}

// Helper to deserialize string or number as Option<String>
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::lenient_i64")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "super::lenient_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "super::string_or_number")]
        number: Option<String>,
        #[serde(default, deserialize_with = "super::lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "super::lenient_points")]
        points: Option<Vec<[f64; 2]>>,
    }

    fn parse(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).expect("sample should parse")
    }

    #[test]
    fn test_lenient_i64() {
        assert_eq!(parse(json!({"id": 5})).id, Some(5));
        assert_eq!(parse(json!({"id": "42"})).id, Some(42));
        assert_eq!(parse(json!({"id": null})).id, None);
        assert_eq!(parse(json!({})).id, None);
        assert!(serde_json::from_value::<Sample>(json!({"id": "abc"})).is_err());
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(parse(json!({"price": 125.5})).price, Some(125.5));
        assert_eq!(parse(json!({"price": 80})).price, Some(80.0));
        assert_eq!(parse(json!({"price": "125.50"})).price, Some(125.5));
        assert_eq!(parse(json!({"price": " "})).price, None);
        assert_eq!(parse(json!({"price": null})).price, None);
        assert!(serde_json::from_value::<Sample>(json!({"price": "cheap"})).is_err());
    }

    #[test]
    fn test_lenient_points() {
        let sample = parse(json!({"points": [[35.5, "-78.25"], ["36", -79]]}));
        assert_eq!(sample.points, Some(vec![[35.5, -78.25], [36.0, -79.0]]));
        assert_eq!(parse(json!({"points": null})).points, None);
        assert!(serde_json::from_value::<Sample>(json!({"points": [[1.0, null]]})).is_err());
    }

    #[test]
    fn test_lenient_bool() {
        assert_eq!(parse(json!({"flag": true})).flag, Some(true));
        assert_eq!(parse(json!({"flag": "True"})).flag, Some(true));
        assert_eq!(parse(json!({"flag": 0})).flag, Some(false));
        assert_eq!(parse(json!({"flag": "false"})).flag, Some(false));
        assert_eq!(parse(json!({})).flag, None);
    }

    #[test]
    fn test_string_or_number() {
        assert_eq!(parse(json!({"number": 1234})).number.as_deref(), Some("1234"));
        assert_eq!(parse(json!({"number": "A-1"})).number.as_deref(), Some("A-1"));
        assert_eq!(parse(json!({"number": ""})).number, None);
    }
}
