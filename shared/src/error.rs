use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market data payload malformed: {0}")]
    MarketData(String),

    #[error("flow page contains no table element")]
    MissingTable,

    #[error("flow table schema mismatch: expected columns {expected:?}, found {found:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("column {column:?}: cannot parse {token:?} as a flow amount")]
    Number { column: String, token: String },

    #[error("cannot parse {token:?} as a date")]
    Date { token: String },

    #[error("no flow rows inside the requested window")]
    EmptyWindow,

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, Error>;
