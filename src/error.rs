use thiserror::Error;

/// Validation failures raised while turning raw arguments into a search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unable to process date fields | mm-dd-yyyy")]
    InvalidDate,

    #[error("parse {field} `{value}` fail: expected an integer or `default`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("need a start and destination city")]
    MissingLocations,

    #[error("must be all airports in IATA formatting, ie SFO")]
    MixedLocations,

    #[error("currency `{0}` is not a 3-letter ISO code, ie USD")]
    InvalidCurrency(String),

    #[error("need at least one traveler")]
    NoTravelers,
}
