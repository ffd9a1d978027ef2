//! Sector to SPDR sector ETF lookup

const SECTOR_ETFS: &[(&str, &str)] = &[
    ("Technology", "XLK"),
    ("Healthcare", "XLV"),
    ("Financial Services", "XLF"),
    ("Financials", "XLF"),
    ("Consumer Cyclical", "XLY"),
    ("Consumer Defensive", "XLP"),
    ("Energy", "XLE"),
    ("Industrials", "XLI"),
    ("Basic Materials", "XLB"),
    ("Materials", "XLB"),
    ("Real Estate", "XLRE"),
    ("Utilities", "XLU"),
    ("Communication Services", "XLC"),
];

/// ETF tracking `sector`, matched case-insensitively
pub fn sector_etf(sector: &str) -> Option<&'static str> {
    let sector = sector.trim();
    SECTOR_ETFS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sector))
        .map(|(_, etf)| *etf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sectors() {
        assert_eq!(sector_etf("Technology"), Some("XLK"));
        assert_eq!(sector_etf("financials"), Some("XLF"));
        assert_eq!(sector_etf("Financial Services"), Some("XLF"));
        assert_eq!(sector_etf(" Real Estate "), Some("XLRE"));
    }

    #[test]
    fn test_unknown_sector() {
        assert_eq!(sector_etf("Crypto"), None);
        assert_eq!(sector_etf(""), None);
    }
}
