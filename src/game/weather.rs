//! Weather and its damage modifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current weather over the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rainy,
    Sunny,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rainy, Weather::Sunny];
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weather::Clear => "Clear",
            Weather::Rainy => "Rainy",
            Weather::Sunny => "Sunny",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rainy" | "rain" => Ok(Weather::Rainy),
            "sunny" | "sun" => Ok(Weather::Sunny),
            _ => Err(format!("unknown weather '{s}' (expected: clear, rainy, sunny)")),
        }
    }
}

/// Additive damage delta for `weather`
///
/// Rain dampens combat damage, sun strengthens direct (effect) damage.
/// Callers clamp the final amount at 0.
pub fn damage_modifier(weather: Weather, is_direct_damage: bool) -> i32 {
    match (weather, is_direct_damage) {
        (Weather::Rainy, false) => -1,
        (Weather::Sunny, true) => 1,
        _ => 0,
    }
}

/// Holds the session's weather
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSystem {
    current: Weather,
}

impl WeatherSystem {
    pub fn new(initial: Weather) -> Self {
        WeatherSystem { current: initial }
    }

    pub fn current(&self) -> Weather {
        self.current
    }

    /// Change the weather, returning the previous value if it changed
    pub fn set_weather(&mut self, weather: Weather) -> Option<Weather> {
        if weather == self.current {
            return None;
        }
        let previous = self.current;
        self.current = weather;
        Some(previous)
    }

    pub fn damage_modifier(&self, is_direct_damage: bool) -> i32 {
        damage_modifier(self.current, is_direct_damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        for weather in Weather::ALL {
            for direct in [false, true] {
                let expected = match (weather, direct) {
                    (Weather::Rainy, false) => -1,
                    (Weather::Sunny, true) => 1,
                    _ => 0,
                };
                assert_eq!(damage_modifier(weather, direct), expected, "{weather} direct={direct}");
                // Repeated calls agree
                assert_eq!(damage_modifier(weather, direct), expected);
            }
        }
    }

    #[test]
    fn test_set_weather_reports_change_once() {
        let mut system = WeatherSystem::default();
        assert_eq!(system.current(), Weather::Clear);

        assert_eq!(system.set_weather(Weather::Sunny), Some(Weather::Clear));
        assert_eq!(system.set_weather(Weather::Sunny), None);
        assert_eq!(system.set_weather(Weather::Rainy), Some(Weather::Sunny));
        assert_eq!(system.damage_modifier(false), -1);
    }

    #[test]
    fn test_parse_weather() {
        assert_eq!("Rainy".parse::<Weather>(), Ok(Weather::Rainy));
        assert_eq!("sun".parse::<Weather>(), Ok(Weather::Sunny));
        assert!("foggy".parse::<Weather>().is_err());
    }
}
