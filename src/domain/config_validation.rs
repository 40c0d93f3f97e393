//! Configuration validation.
//!
//! Validates strategy and selection config before a replay runs.

use crate::domain::error::AlphaLegionError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    validate_initial_cash(config)?;
    validate_dates(config)?;
    validate_fundamentals_path(config)?;
    Ok(())
}

pub fn validate_selection_config(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    validate_countries(config)?;
    validate_market_cap(config)?;
    validate_ratio_bounds(config)?;
    validate_growth_floors(config)?;
    validate_caps(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let value = config.get_double("strategy", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let start_str = config.get_string("strategy", "start_date");
    let end_str = config.get_string("strategy", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, AlphaLegionError> {
    match value {
        None => Err(AlphaLegionError::ConfigMissing {
            section: "strategy".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            AlphaLegionError::ConfigInvalid {
                section: "strategy".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_fundamentals_path(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    match config.get_string("data", "fundamentals") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(AlphaLegionError::ConfigMissing {
            section: "data".to_string(),
            key: "fundamentals".to_string(),
        }),
    }
}

fn validate_countries(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    if let Some(countries) = config.get_string("selection", "countries") {
        if countries.split(',').all(|c| c.trim().is_empty()) {
            return Err(AlphaLegionError::ConfigInvalid {
                section: "selection".to_string(),
                key: "countries".to_string(),
                reason: "countries must list at least one country code".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_market_cap(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let value = config.get_double("selection", "min_market_cap", 2_000_000_000.0);
    if value < 0.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "min_market_cap".to_string(),
            reason: "min_market_cap must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_ratio_bounds(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let max_pe = config.get_double("selection", "max_pe_ratio", 25.0);
    if max_pe <= 0.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "max_pe_ratio".to_string(),
            reason: "max_pe_ratio must be positive".to_string(),
        });
    }
    let max_ev = config.get_double("selection", "max_ev_to_ebitda", 25.0);
    if max_ev <= 0.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "max_ev_to_ebitda".to_string(),
            reason: "max_ev_to_ebitda must be positive".to_string(),
        });
    }
    let limit = config.get_double("selection", "net_debt_ebitda_limit", 3.5);
    if limit <= 0.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "net_debt_ebitda_limit".to_string(),
            reason: "net_debt_ebitda_limit must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_growth_floors(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let revenue = config.get_double("selection", "min_revenue_growth", 0.07);
    if revenue < -1.0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "min_revenue_growth".to_string(),
            reason: "min_revenue_growth must be at least -1".to_string(),
        });
    }
    Ok(())
}

fn validate_caps(config: &dyn ConfigPort) -> Result<(), AlphaLegionError> {
    let max_selection = config.get_int("selection", "max_selection", 20);
    if max_selection <= 0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "max_selection".to_string(),
            reason: "max_selection must be positive".to_string(),
        });
    }
    let sector_cap = config.get_int("selection", "sector_cap", 6);
    if sector_cap < 0 {
        return Err(AlphaLegionError::ConfigInvalid {
            section: "selection".to_string(),
            key: "sector_cap".to_string(),
            reason: "sector_cap must be non-negative".to_string(),
        });
    }
    Ok(())
}
