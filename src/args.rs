use chrono::NaiveDate;
use clap::Parser;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8741/";

/// Positional layout:
/// START_DATE END_DATE DURATION ORIGINS DESTINATIONS [TRAVELERS] [CLASS] [TRIP_TYPE] [STOPS]
///
/// Every optional slot accepts the literal `default`.
#[derive(Parser, Debug)]
#[clap(version, about = "Print trips whose best fare is under the historical low")]
pub struct Search {
    /// First departure date, mm-dd-yyyy
    #[clap(value_name = "START_DATE", value_parser = parser::parse_date)]
    pub start_date: NaiveDate,

    /// Last departure date, mm-dd-yyyy
    #[clap(value_name = "END_DATE", value_parser = parser::parse_date)]
    pub end_date: NaiveDate,

    /// Trip length in days
    #[clap(value_name = "DURATION", value_parser = parser::parse_duration)]
    pub trip_length: u32,

    /// Origin cities or IATA codes joined by `-`, ie SFO-OAK
    #[clap(value_name = "ORIGINS", value_parser = parser::parse_locations)]
    pub origins: Locations,

    /// Destination cities or IATA codes joined by `-`
    #[clap(value_name = "DESTINATIONS", value_parser = parser::parse_locations)]
    pub destinations: Locations,

    /// Number of adult travelers
    #[clap(
        value_name = "TRAVELERS",
        value_parser = parser::parse_travelers,
        default_value = "default"
    )]
    pub travelers: Preset<u32>,

    /// Cabin class code: 1 economy, 2 premium economy, 3 business, 4 first
    #[clap(
        value_name = "CLASS",
        value_parser = parser::parse_cabin_class,
        default_value = "default"
    )]
    pub cabin_class: Preset<i64>,

    /// `OneWay` for one way trips, anything else for round trips
    #[clap(value_name = "TRIP_TYPE", value_parser, default_value = "default")]
    pub trip_type: String,

    /// Stops code: 0 any, 1 nonstop, 2 one stop, 3 two stops
    #[clap(
        value_name = "STOPS",
        value_parser = parser::parse_stops,
        default_value = "default"
    )]
    pub stops: Preset<i64>,

    /// ISO currency for prices
    #[clap(long, value_parser = parser::parse_currency, default_value = "USD")]
    pub currency: String,

    /// Language of the results
    #[clap(long = "lang", value_parser, default_value = "en")]
    pub language: String,

    /// Base URL of the flight-data service
    #[clap(long, value_parser = parser::parse_endpoint, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Per-request timeout in seconds
    #[clap(long, value_parser, default_value_t = 30)]
    pub timeout: u64,

    /// Log every calendar entry and query
    #[clap(short, long, action)]
    pub verbose: bool,
}

/// A slot that may hold the literal `default` instead of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset<T> {
    Default,
    Value(T),
}

impl<T> Preset<T> {
    pub fn unwrap_or(self, preset: T) -> T {
        match self {
            Preset::Default => preset,
            Preset::Value(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations(pub Vec<String>);

pub mod parser {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use itertools::Itertools;
    use url::Url;

    use crate::args::{Locations, Preset};
    use crate::error::ArgsError;

    pub const DATE_FORMAT: &str = "%m-%d-%Y";
    pub const DEFAULT_SENTINEL: &str = "default";
    pub const LOCATION_DELIMITER: char = '-';

    pub fn parse_date(input: &str) -> Result<NaiveDate, ArgsError> {
        NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ArgsError::InvalidDate)
    }

    pub fn parse_duration(input: &str) -> Result<u32, ArgsError> {
        input.parse().map_err(|_| ArgsError::InvalidNumber {
            field: "duration",
            value: input.to_string(),
        })
    }

    pub fn parse_locations(input: &str) -> Result<Locations, ArgsError> {
        let tokens = input
            .split(LOCATION_DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect_vec();

        if tokens.is_empty() {
            return Err(ArgsError::MissingLocations);
        }

        Ok(Locations(tokens))
    }

    pub fn parse_travelers(input: &str) -> Result<Preset<u32>, ArgsError> {
        parse_preset("travelers", input)
    }

    pub fn parse_cabin_class(input: &str) -> Result<Preset<i64>, ArgsError> {
        parse_preset("class", input)
    }

    pub fn parse_stops(input: &str) -> Result<Preset<i64>, ArgsError> {
        parse_preset("stops", input)
    }

    pub fn parse_currency(input: &str) -> Result<String, ArgsError> {
        if input.len() == 3 && input.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(input.to_string())
        } else {
            Err(ArgsError::InvalidCurrency(input.to_string()))
        }
    }

    pub fn parse_endpoint(input: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(input)?;

        // `Url::join` drops the last segment unless the path ends with a slash
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    fn parse_preset<T: FromStr>(field: &'static str, input: &str) -> Result<Preset<T>, ArgsError> {
        if input == DEFAULT_SENTINEL {
            return Ok(Preset::Default);
        }

        input
            .parse()
            .map(Preset::Value)
            .map_err(|_| ArgsError::InvalidNumber {
                field,
                value: input.to_string(),
            })
    }
}
