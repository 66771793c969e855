//! Up-front validation of configuration files, before any data is touched.

use chrono::NaiveDate;

use crate::domain::error::LowtideError;
use crate::ports::config_port::ConfigPort;

fn invalid(section: &str, key: &str, reason: &str) -> LowtideError {
    LowtideError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn parse_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, LowtideError> {
    match config.get_string(section, key) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(section, key, "invalid date format (expected YYYY-MM-DD)")),
        None => Ok(None),
    }
}

/// Validate the `[data]` and `[backtest]` sections.
pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), LowtideError> {
    if config.get_string("data", "path").is_none() {
        return Err(LowtideError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        });
    }

    let initial_cash = config.get_float("backtest", "initial_cash", 1000.0);
    if !initial_cash.is_finite() || initial_cash <= 0.0 {
        return Err(invalid("backtest", "initial_cash", "must be positive"));
    }

    let commission_pct = config.get_float("backtest", "commission_pct", 0.0);
    if !commission_pct.is_finite() || commission_pct < 0.0 {
        return Err(invalid("backtest", "commission_pct", "must be >= 0"));
    }

    let position_size = config.get_float("backtest", "position_size", 100.0);
    if !position_size.is_finite() || position_size <= 0.0 || position_size > 100.0 {
        return Err(invalid(
            "backtest",
            "position_size",
            "must be in (0, 100]",
        ));
    }

    let start_date = parse_date(config, "backtest", "start_date")?;
    let end_date = parse_date(config, "backtest", "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(invalid("backtest", "end_date", "end_date before start_date"));
        }
    }

    Ok(())
}

/// Validate the `[strategy]` section.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), LowtideError> {
    if let Some(raw) = config.get_string("strategy", "period") {
        let period: i64 = raw
            .trim()
            .parse()
            .map_err(|_| invalid("strategy", "period", "must be an integer"))?;
        if period < 1 {
            return Err(invalid("strategy", "period", "must be >= 1"));
        }
    }

    Ok(())
}
