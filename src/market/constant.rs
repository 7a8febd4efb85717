//! General constant enums and fixed value sets used in the charting client.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Symbols offered in the selector, in display order.
pub const SYMBOLS: [&str; 5] = ["/ES=F", "/BTC=F", "/NQ=F", "/CL=F", "TSLA"];

/// Symbol selected when the app starts.
pub const DEFAULT_SYMBOL: &str = "/ES=F";

/// Timeframe selected when the app starts.
pub const DEFAULT_TIMEFRAME: Timeframe = Timeframe::Minute5;

/// Check whether a symbol is one of the fixed set offered to the user.
pub fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOLS.contains(&symbol)
}

/// Candle bucket width offered in the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    /// 1 minute
    Minute,
    /// 5 minutes
    Minute5,
    /// 15 minutes
    Minute15,
    /// 1 hour
    Hour,
    /// Daily
    Daily,
    /// Weekly
    Weekly,
}

impl Timeframe {
    /// Get the wire value understood by the backend.
    pub fn value(&self) -> &'static str {
        match self {
            Timeframe::Minute => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour => "1h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1wk",
        }
    }

    /// Get display name for the selector.
    pub fn display_name(&self) -> &'static str {
        match self {
            Timeframe::Minute => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour => "1h",
            Timeframe::Daily => "D",
            Timeframe::Weekly => "W",
        }
    }

    /// Parse a wire value back into a timeframe.
    pub fn from_value(value: &str) -> Option<Timeframe> {
        match value {
            "1m" => Some(Timeframe::Minute),
            "5m" => Some(Timeframe::Minute5),
            "15m" => Some(Timeframe::Minute15),
            "1h" => Some(Timeframe::Hour),
            "1d" => Some(Timeframe::Daily),
            "1wk" => Some(Timeframe::Weekly),
            _ => None,
        }
    }

    /// Get all timeframes for UI selection.
    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::Minute,
            Timeframe::Minute5,
            Timeframe::Minute15,
            Timeframe::Hour,
            Timeframe::Daily,
            Timeframe::Weekly,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

// On the wire the timeframe travels as its value string ("5m", "1wk", ...).
impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeframeVisitor;

        impl Visitor<'_> for TimeframeVisitor {
            type Value = Timeframe;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a timeframe string such as \"5m\" or \"1wk\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timeframe, E> {
                Timeframe::from_value(v)
                    .ok_or_else(|| E::custom(format!("unknown timeframe: {}", v)))
            }
        }

        deserializer.deserialize_str(TimeframeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_values_round_trip() {
        for tf in Timeframe::all() {
            assert_eq!(Timeframe::from_value(tf.value()), Some(tf));
        }
        assert_eq!(Timeframe::from_value("3m"), None);
    }

    #[test]
    fn test_timeframe_serde() {
        let json = serde_json::to_string(&Timeframe::Weekly).unwrap();
        assert_eq!(json, "\"1wk\"");

        let tf: Timeframe = serde_json::from_str("\"5m\"").unwrap();
        assert_eq!(tf, Timeframe::Minute5);

        assert!(serde_json::from_str::<Timeframe>("\"2h\"").is_err());
    }

    #[test]
    fn test_symbol_set() {
        assert!(is_valid_symbol(DEFAULT_SYMBOL));
        assert!(is_valid_symbol("TSLA"));
        assert!(!is_valid_symbol("AAPL"));
    }
}
