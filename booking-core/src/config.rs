use crate::booking::PriceTable;
use crate::calendar::NavigationBounds;
use crate::slot::OPERATING_HOURS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Operating parameters of the arena. Plain data so a deployment can swap
/// in its own values; the defaults are the production ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub arena_name: String,
    /// Hour rows rendered in the week grid, in display order.
    pub hours: Vec<String>,
    pub court_price: u32,
    pub gourmet_price: u32,
    pub ball_price: u32,
    /// First bookable day (season launch).
    pub window_lower: NaiveDate,
    /// Last year navigation may reach.
    pub final_year: i32,
    /// Spreadsheet cell value that means "free"; anything else non-empty
    /// means busy.
    pub free_marker: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            arena_name: "Arena Pé na Areia".to_string(),
            hours: OPERATING_HOURS.iter().map(|h| h.to_string()).collect(),
            court_price: 80,
            gourmet_price: 120,
            ball_price: 25,
            window_lower: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap_or(NaiveDate::MIN),
            final_year: 2026,
            free_marker: "L".to_string(),
        }
    }
}

impl ArenaConfig {
    pub fn price_table(&self) -> PriceTable {
        PriceTable {
            court: self.court_price,
            gourmet: self.gourmet_price,
            ball: self.ball_price,
        }
    }

    pub fn navigation_bounds(&self) -> NavigationBounds {
        NavigationBounds {
            lower: self.window_lower,
            final_year: self.final_year,
        }
    }
}
