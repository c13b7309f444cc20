//! Ticker extraction from newline-delimited market data

/// Separator used when listing tickers in the report heading
pub const TICKER_SEPARATOR: &str = ", ";

/// Leading CSV field of every `\n`-delimited line, untrimmed
///
/// Every line contributes exactly one entry, so blank lines yield empty
/// strings.
pub fn extract_tickers(data: &str) -> Vec<&str> {
    data.split('\n')
        .map(|line| line.split(',').next().unwrap_or_default())
        .collect()
}

/// Comma-joined ticker list used in the report heading
pub fn ticker_list(data: &str) -> String {
    extract_tickers(data).join(TICKER_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_field_per_line() {
        assert_eq!(ticker_list("AAPL,100\nMSFT,200"), "AAPL, MSFT");
    }

    #[test]
    fn test_line_without_comma_is_kept_whole() {
        assert_eq!(extract_tickers("TSLA"), vec!["TSLA"]);
        assert_eq!(ticker_list("TSLA\nNVDA,1,2,3"), "TSLA, NVDA");
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        assert_eq!(extract_tickers(" AAPL ,1\r\nMSFT"), vec![" AAPL ", "MSFT"]);
    }

    #[test]
    fn test_blank_lines_yield_empty_entries() {
        assert_eq!(extract_tickers("AAPL,1\n\nMSFT,2"), vec!["AAPL", "", "MSFT"]);
        assert_eq!(ticker_list(""), "");
    }
}
