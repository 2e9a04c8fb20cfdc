/// Columns a price frame must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Symbol,
    Timeframe,
    Date,
    Close,
}

impl PriceColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Timeframe => "timeframe",
            Self::Date => "date",
            Self::Close => "close",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Symbol, Self::Timeframe, Self::Date, Self::Close]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Symbol => vec!["symbol", "Symbol", "SYMBOL", "ticker", "Ticker"],
            Self::Timeframe => vec!["timeframe", "Timeframe", "TIMEFRAME", "interval", "tf"],
            Self::Date => vec!["date", "Date", "DATE", "datetime", "time", "timestamp"],
            Self::Close => vec!["close", "Close", "CLOSE", "c"],
        }
    }
}
