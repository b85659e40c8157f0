use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration, one section per concern.
///
/// Every field has a default so a partial (or missing) config file still
/// yields a usable configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub policy: PricePolicy,
    pub filters: FilterConfig,
    pub execution: ExecutionConfig,
    pub panel: PanelConfig,
}

/// How the stop-loss value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMode {
    /// Distance from the reference price, in pips.
    #[default]
    Points,
    /// Absolute price level.
    Level,
    /// Keep whatever stop-loss the item already has.
    Unchanged,
}

/// How the take-profit value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeProfitMode {
    /// Distance from the reference price, in pips.
    #[default]
    Points,
    /// Absolute price level.
    Level,
    /// Percentage of the stop-loss distance.
    Percentage,
    /// Keep whatever take-profit the item already has.
    Unchanged,
}

/// Price the pip offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceReference {
    /// The item's own entry (position) or target (pending order) price.
    #[default]
    Open,
    /// Current bid for buys, current ask for sells.
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopLossConfig {
    pub value: Decimal,
    pub mode: StopLossMode,
    pub overwrite_existing: bool,
}

impl Default for StopLossConfig {
    fn default() -> Self {
        Self {
            value: Decimal::from(200),
            mode: StopLossMode::Points,
            overwrite_existing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeProfitConfig {
    pub value: Decimal,
    pub mode: TakeProfitMode,
    pub overwrite_existing: bool,
}

impl Default for TakeProfitConfig {
    fn default() -> Self {
        Self {
            value: Decimal::from(400),
            mode: TakeProfitMode::Points,
            overwrite_existing: false,
        }
    }
}

/// SL/TP pricing policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricePolicy {
    pub stop_loss: StopLossConfig,
    pub take_profit: TakeProfitConfig,
    pub price_reference: PriceReference,
}

/// Which trade directions the manager applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionFilter {
    #[default]
    All,
    Buy,
    Sell,
}

/// Filters an item must pass before the manager touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub current_symbol_only: bool,
    pub direction: DirectionFilter,
    pub only_magic_number: bool,
    /// Matched as a substring of the item label.
    pub magic_number: i64,
    pub only_with_comment: bool,
    pub matching_comment: String,
    pub apply_to_pending: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            current_symbol_only: true,
            direction: DirectionFilter::All,
            only_magic_number: false,
            magic_number: 0,
            only_with_comment: false,
            matching_comment: String::new(),
            apply_to_pending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Symbol of the chart the manager is attached to.
    #[serde(default = "default_chart_symbol")]
    pub chart_symbol: String,
    /// Remember modified items and never touch them again while they live.
    #[serde(default = "default_process_once")]
    pub process_once: bool,
    /// Poll period (seconds).
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// Initial state of the enable flag.
    #[serde(default)]
    pub enabled: bool,
}

fn default_chart_symbol() -> String {
    "EURUSD".to_string()
}

const fn default_process_once() -> bool {
    true
}

const fn default_check_interval() -> u64 {
    1
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            chart_symbol: default_chart_symbol(),
            process_once: default_process_once(),
            check_interval_secs: default_check_interval(),
            enabled: false,
        }
    }
}

/// Longest accepted poll period (one day).
pub const MAX_CHECK_INTERVAL_SECS: u64 = 86_400;

impl ExecutionConfig {
    /// Poll period, clamped to between one second and one day.
    #[must_use]
    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.check_interval_secs.clamp(1, MAX_CHECK_INTERVAL_SECS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalCorner {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalCorner {
    #[default]
    Left,
    Center,
    Right,
}

/// On-chart status panel presentation. Has no effect on trading logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub show: bool,
    /// Prefix for the panel's chart object names.
    pub name: String,
    pub x_offset: i32,
    pub y_offset: i32,
    pub vertical: VerticalCorner,
    pub horizontal: HorizontalCorner,
    pub font_size: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            show: true,
            name: "SLTP".to_string(),
            x_offset: 20,
            y_offset: 20,
            vertical: VerticalCorner::Top,
            horizontal: HorizontalCorner::Left,
            font_size: 10,
        }
    }
}
