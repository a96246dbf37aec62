// Market Cap Comparison - Core Library
// "On {date}, {subject} market cap is $X, or the {item}..."
// Exposes all modules for use in the CLI, the API server, and tests

pub mod bracket;
pub mod table;
pub mod market;
pub mod session;
pub mod format;
pub mod view;
pub mod config;

#[cfg(feature = "tui")]
pub mod ui;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use bracket::{
    evaluate, position_of, select_bracket, window_around,
    LiveValue, NonFiniteValue, SelectionResult, WindowSpec, DEFAULT_AFTER, DEFAULT_BEFORE,
};
pub use table::{
    load_table_csv, parse_table, parse_table_str, parse_value,
    LoadReport, ReferenceEntry, ReferenceTable, RowError, TableError,
};
pub use market::{
    fetch_live_value, fetch_table, parse_market_response,
    FetchError, MarketResponse, Sources, TableSource, DEFAULT_MARKET_URL,
};
pub use session::{Change, ComparisonState};
pub use view::{render_html, render_text, ComparisonView, StripItem};
pub use config::{init_logging, LogArgs, SourceArgs};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
