// src/services/calculations.rs
use anyhow::{bail, Result};

use crate::models::GoalInput;

pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Annualized compound return (in percent) required to grow the current
/// amount into the target amount over the horizon, rounded to 2 decimals:
/// ((target / current) ^ (1 / years) - 1) * 100
pub fn required_annual_return(input: &GoalInput) -> Result<f64> {
    validate_goal(input)?;

    let ratio = input.target_amount / input.current_amount;
    let rate = (ratio.powf(1.0 / input.time_horizon_years as f64) - 1.0) * 100.0;
    Ok((rate * 100.0).round() / 100.0)
}

/// Invariants: currentAmount > 0, targetAmount strictly greater, horizon
/// within [1, 50] years. Anything else is a client error and must not reach
/// the upstream.
pub fn validate_goal(input: &GoalInput) -> Result<()> {
    if !input.current_amount.is_finite() || input.current_amount <= 0.0 {
        bail!("currentAmount must be a positive number");
    }
    if !input.target_amount.is_finite() || input.target_amount <= input.current_amount {
        bail!("targetAmount must be greater than currentAmount");
    }
    if input.time_horizon_years < MIN_HORIZON_YEARS || input.time_horizon_years > MAX_HORIZON_YEARS {
        bail!(
            "timeHorizon must be between {} and {} years",
            MIN_HORIZON_YEARS,
            MAX_HORIZON_YEARS
        );
    }
    Ok(())
}
