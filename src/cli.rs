use tradechart::chart::PRESET_SLOTS;
use tradechart::types::{IndicatorKind, Timeframe};

/// One `--indicator` request: a kind and optional colon-delimited params.
#[derive(Debug, Clone)]
pub struct IndicatorArg {
    pub kind: IndicatorKind,
    pub params: Option<String>,
}

/// Command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub prices: std::path::PathBuf,
    pub symbol: String,
    pub timeframe: Option<Timeframe>,
    pub config: Option<std::path::PathBuf>,
    pub indicators: Vec<IndicatorArg>,
    pub user: Option<String>,
    pub save_preset: Option<usize>,
    pub load_preset: Option<usize>,
}

impl Args {
    pub fn parse() -> Self {
        let matches = clap::Command::new("tradechart")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Compute cached chart indicators over a price CSV")
            .arg(
                clap::Arg::new("prices")
                    .short('p')
                    .long("prices")
                    .help("CSV with symbol, timeframe, date and close columns")
                    .required(true)
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("symbol")
                    .short('s')
                    .long("symbol")
                    .help("Symbol to chart")
                    .required(true)
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("timeframe")
                    .short('t')
                    .long("timeframe")
                    .help("Chart timeframe (5m, 15m, 1h, 1d); defaults to the configured one")
                    .num_args(1)
                    .value_parser(clap::builder::ValueParser::new(parse_timeframe)),
            )
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("TOML configuration file")
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("indicator")
                    .short('i')
                    .long("indicator")
                    .help("KIND or KIND=color:period[:stdDevMultiplier]:width, repeatable")
                    .action(clap::ArgAction::Append)
                    .value_parser(clap::builder::ValueParser::new(parse_indicator)),
            )
            .arg(
                clap::Arg::new("user")
                    .short('u')
                    .long("user")
                    .help("Owner of the presets")
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("save-preset")
                    .long("save-preset")
                    .help("Store the active indicators into preset slot N")
                    .num_args(1)
                    .requires("user")
                    .value_parser(clap::builder::ValueParser::new(parse_slot)),
            )
            .arg(
                clap::Arg::new("load-preset")
                    .long("load-preset")
                    .help("Add the indicators of preset slot N before any --indicator")
                    .num_args(1)
                    .requires("user")
                    .value_parser(clap::builder::ValueParser::new(parse_slot)),
            )
            .get_matches();

        Args {
            prices: matches
                .get_one::<String>("prices")
                .map(std::path::PathBuf::from)
                .unwrap_or_default(),
            symbol: matches.get_one::<String>("symbol").cloned().unwrap_or_default(),
            timeframe: matches.get_one::<Timeframe>("timeframe").copied(),
            config: matches.get_one::<String>("config").map(std::path::PathBuf::from),
            indicators: matches
                .get_many::<IndicatorArg>("indicator")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            user: matches.get_one::<String>("user").cloned(),
            save_preset: matches.get_one::<usize>("save-preset").copied(),
            load_preset: matches.get_one::<usize>("load-preset").copied(),
        }
    }
}

fn parse_timeframe(value: &str) -> Result<Timeframe, String> {
    value.parse().map_err(|e| format!("{}", e))
}

fn parse_indicator(value: &str) -> Result<IndicatorArg, String> {
    let (kind, params) = match value.split_once('=') {
        Some((kind, params)) => (kind, Some(params.to_string())),
        None => (value, None),
    };
    // stored names are exact; the command line accepts any case
    let kind = kind.to_ascii_uppercase().parse().map_err(|e| format!("{}", e))?;
    Ok(IndicatorArg { kind, params })
}

fn parse_slot(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(slot) if (1..=PRESET_SLOTS).contains(&slot) => Ok(slot),
        _ => Err(format!("Slot must be between 1 and {}", PRESET_SLOTS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_indicator() {
        let arg = parse_indicator("bollinger_bands=1:20:2.0:1.0").unwrap();
        assert_eq!(arg.kind, IndicatorKind::BollingerBands);
        assert_eq!(arg.params.as_deref(), Some("1:20:2.0:1.0"));

        let arg = parse_indicator("ema").unwrap();
        assert_eq!(arg.kind, IndicatorKind::Ema);
        assert!(arg.params.is_none());
        assert!(parse_indicator("MACD=1:2:3").is_err());
    }

    #[test]
    fn test_parse_slot() {
        assert_eq!(parse_slot("5"), Ok(5));
        assert!(parse_slot("0").is_err());
        assert!(parse_slot("six").is_err());
    }
}
