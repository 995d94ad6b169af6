/// Poll cadence for the active tab's holdings quotes.
pub const HOLDINGS_POLL_INTERVAL_SECS: u64 = 60;

/// Poll cadence for watchlist quotes.
pub const WATCHLIST_POLL_INTERVAL_SECS: u64 = 30;

/// Display currency used when none is configured.
pub const DEFAULT_DISPLAY_CURRENCY: &str = "USD";

/// Name given to the tab auto-created for a caller with none.
pub const DEFAULT_TAB_NAME: &str = "Main";

/// Decimal precision for percentage figures.
pub const PERCENT_DECIMAL_PRECISION: u32 = 4;

/// Decimal precision for display amounts.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
