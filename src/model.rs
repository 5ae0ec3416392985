use anyhow::Error;
use chrono::NaiveDate;
use itertools::Itertools;

use crate::args;
use crate::error::ArgsError;

pub mod offer;
pub mod query;

pub use offer::{Offer, PriceGraphEntry, PriceRange};
pub use query::{OfferQuery, OfferQueryBuilder, PriceGraphQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trip_length: u32,
    pub route: Route,
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn uses_airport_codes(&self) -> bool {
        self.route.kind == LocationKind::Airport
    }
}

impl TryFrom<args::Search> for SearchRequest {
    type Error = Error;

    fn try_from(input: args::Search) -> Result<Self, Self::Error> {
        let args::Search {
            start_date,
            end_date,
            trip_length,
            origins: args::Locations(origins),
            destinations: args::Locations(destinations),
            travelers,
            cabin_class,
            trip_type,
            stops,
            currency,
            language,
            ..
        } = input;

        let route = Route::try_from((origins, destinations))?;

        let preset = SearchOptions::default();

        let travelers = travelers.unwrap_or(preset.travelers);
        if travelers == 0 {
            return Err(ArgsError::NoTravelers.into());
        }

        let options = SearchOptions {
            travelers,
            cabin_class: match cabin_class {
                args::Preset::Default => preset.cabin_class,
                args::Preset::Value(code) => CabinClass::from_code(code),
            },
            trip_type: TripType::from_literal(&trip_type),
            stops: match stops {
                args::Preset::Default => preset.stops,
                args::Preset::Value(code) => Stops::from_code(code),
            },
            currency,
            language,
        };

        Ok(Self {
            start_date,
            end_date,
            trip_length,
            route,
            options,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    City,
    Airport,
}

/// Origin and destination lists, either all city names or all IATA codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub kind: LocationKind,
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
}

impl Route {
    pub fn airports(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::Airport,
            origins: vec![origin.into()],
            destinations: vec![destination.into()],
        }
    }
}

impl TryFrom<(Vec<String>, Vec<String>)> for Route {
    type Error = ArgsError;

    fn try_from((origins, destinations): (Vec<String>, Vec<String>)) -> Result<Self, Self::Error> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(ArgsError::MissingLocations);
        }

        // Once a code has been seen every following token must be a code too.
        // Tokens before the first code are not revisited.
        let mut airports = false;
        for token in origins.iter().chain(destinations.iter()) {
            if is_iata_code(token) {
                airports = true;
            } else if airports {
                return Err(ArgsError::MixedLocations);
            }
        }

        let kind = if airports {
            LocationKind::Airport
        } else {
            LocationKind::City
        };

        Ok(Self {
            kind,
            origins,
            destinations,
        })
    }
}

/// Three characters that are already uppercase, ie `SFO`.
pub fn is_iata_code(token: &str) -> bool {
    token.chars().count() == 3 && token.to_uppercase() == token
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub travelers: u32,
    pub cabin_class: CabinClass,
    pub trip_type: TripType,
    pub stops: Stops,
    pub currency: String,
    pub language: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            travelers: 1,
            cabin_class: CabinClass::Economy,
            trip_type: TripType::RoundTrip,
            stops: Stops::AnyStops,
            currency: "USD".into(),
            language: "en".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinClass {
    Economy = 1,
    PremiumEconomy = 2,
    Business = 3,
    First = 4,
}

impl CabinClass {
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Unknown codes fall back to economy.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => CabinClass::PremiumEconomy,
            3 => CabinClass::Business,
            4 => CabinClass::First,
            _ => CabinClass::Economy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripType {
    RoundTrip = 1,
    OneWay = 2,
}

impl TripType {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "OneWay" => TripType::OneWay,
            _ => TripType::RoundTrip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stops {
    AnyStops = 0,
    Nonstop = 1,
    OneStop = 2,
    TwoStops = 3,
}

impl Stops {
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Unknown codes fall back to any number of stops.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Stops::Nonstop,
            2 => Stops::OneStop,
            3 => Stops::TwoStops,
            _ => Stops::AnyStops,
        }
    }
}

pub fn join_locations(locations: &[String]) -> String {
    locations.iter().join(",")
}


#[cfg(test)]
pub mod test {
    use super::*;

    use crate::args::case::try_parse;

    fn route(origins: &[&str], destinations: &[&str]) -> Result<Route, ArgsError> {
        Route::try_from((
            origins.iter().map(|s| s.to_string()).collect_vec(),
            destinations.iter().map(|s| s.to_string()).collect_vec(),
        ))
    }

    fn request(positional: &[&str]) -> anyhow::Result<SearchRequest> {
        SearchRequest::try_from(try_parse(positional).unwrap())
    }

    #[test]
    fn defaults_applied() {
        let request = case::sfo_jfk();

        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2024, 7, 11).unwrap());
        assert_eq!(request.trip_length, 7);
        assert_eq!(request.route, Route::airports("SFO", "JFK"));
        assert!(request.uses_airport_codes());
        assert_eq!(request.options, SearchOptions::default());
    }

    #[test]
    fn city_names_stay_cities() {
        let request = case::paris_rome();

        assert_eq!(request.route.kind, LocationKind::City);
        assert_eq!(request.route.origins, vec!["Paris".to_string()]);
        assert_eq!(
            request.route.destinations,
            vec!["Rome".to_string(), "Milan".to_string()]
        );
    }

    #[test]
    fn iata_heuristic() {
        assert!(is_iata_code("SFO"));
        assert!(is_iata_code("123"));
        assert!(!is_iata_code("Sfo"));
        assert!(!is_iata_code("SFOO"));
        assert!(!is_iata_code("NY"));
    }

    #[test]
    fn mixed_tokens_after_a_code_fail() {
        assert_eq!(route(&["SFO", "Oakland"], &["JFK"]), Err(ArgsError::MixedLocations));
        assert_eq!(route(&["SFO"], &["New York"]), Err(ArgsError::MixedLocations));
        assert_eq!(route(&["SFO"], &["JFK", "Newark"]), Err(ArgsError::MixedLocations));
    }

    #[test]
    fn city_before_first_code_is_not_revisited() {
        let route = route(&["Oakland", "SFO"], &["JFK"]).unwrap();

        assert_eq!(route.kind, LocationKind::Airport);
        assert_eq!(route.origins, vec!["Oakland".to_string(), "SFO".to_string()]);
    }

    #[test]
    fn empty_list_fails() {
        assert_eq!(route(&[], &["JFK"]), Err(ArgsError::MissingLocations));
        assert_eq!(route(&["SFO"], &[]), Err(ArgsError::MissingLocations));
    }

    #[test]
    fn option_codes_are_mapped() {
        let request = request(&[
            "07-04-2024",
            "07-11-2024",
            "7",
            "SFO",
            "JFK",
            "3",
            "2",
            "OneWay",
            "1",
        ])
        .unwrap();

        assert_eq!(request.options.travelers, 3);
        assert_eq!(request.options.cabin_class, CabinClass::PremiumEconomy);
        assert_eq!(request.options.trip_type, TripType::OneWay);
        assert_eq!(request.options.stops, Stops::Nonstop);
    }

    #[test]
    fn unknown_codes_fall_back() {
        let request = request(&[
            "07-04-2024",
            "07-11-2024",
            "7",
            "SFO",
            "JFK",
            "default",
            "9",
            "oneway",
            "7",
        ])
        .unwrap();

        assert_eq!(request.options.cabin_class, CabinClass::Economy);
        assert_eq!(request.options.trip_type, TripType::RoundTrip);
        assert_eq!(request.options.stops, Stops::AnyStops);
    }

    #[test]
    fn zero_travelers_fail() {
        let error = request(&["07-04-2024", "07-11-2024", "7", "SFO", "JFK", "0"]).unwrap_err();

        assert_eq!(
            error.downcast_ref::<ArgsError>(),
            Some(&ArgsError::NoTravelers)
        );
    }

    #[test]
    fn code_tables_are_stable() {
        assert_eq!(CabinClass::Economy.code(), 1);
        assert_eq!(CabinClass::First.code(), 4);
        assert_eq!(Stops::AnyStops.code(), 0);
        assert_eq!(Stops::TwoStops.code(), 3);
        assert_eq!(TripType::OneWay.code(), 2);

        for code in 1..=4 {
            assert_eq!(CabinClass::from_code(code).code(), code);
        }
        for code in 0..=3 {
            assert_eq!(Stops::from_code(code).code(), code);
        }
    }
}
