//! Per-iteration SOTP valuation.
//!
//! ```text
//! pv_fcf   = Σ_j fcf_j / (1 + r)^(j + 1)
//! tv       = fcf_last * (1 + g) / (r - g)
//! dcf_ev   = pv_fcf + tv / (1 + r)^n - net_debt
//! price    = (1 - h) * (dcf_ev + ebit_b * m_b + ebit_c * m_c + fixed_ev) / shares
//! ```
//!
//! Draws that make the formula meaningless are rejected, not treated as errors.

use crate::domain::{DistributionMode, DivisionPolicy, IterationDraw, ValuationParameters};

/// Why a draw produced no price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// `g >= r`: the perpetuity is undefined or divergent.
    GrowthAtOrAboveDiscount,
    NegativeMultipleB,
    NegativeMultipleC,
    NegativeHoldingDiscount,
    /// Arithmetic overflowed or divided by zero (e.g. `r == -1`).
    NonFinite,
}

impl Rejection {
    pub const COUNT: usize = 5;

    pub const ALL: [Rejection; Self::COUNT] = [
        Rejection::GrowthAtOrAboveDiscount,
        Rejection::NegativeMultipleB,
        Rejection::NegativeMultipleC,
        Rejection::NegativeHoldingDiscount,
        Rejection::NonFinite,
    ];

    pub fn index(self) -> usize {
        match self {
            Rejection::GrowthAtOrAboveDiscount => 0,
            Rejection::NegativeMultipleB => 1,
            Rejection::NegativeMultipleC => 2,
            Rejection::NegativeHoldingDiscount => 3,
            Rejection::NonFinite => 4,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Rejection::GrowthAtOrAboveDiscount => "growth >= discount",
            Rejection::NegativeMultipleB => "multiple_b < 0",
            Rejection::NegativeMultipleC => "multiple_c < 0",
            Rejection::NegativeHoldingDiscount => "holding_discount < 0",
            Rejection::NonFinite => "non-finite value",
        }
    }
}

/// Outcome of evaluating one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Valuation {
    Price(f64),
    Rejected(Rejection),
}

/// Intermediate DCF figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcfBreakdown {
    pub pv_fcf: f64,
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    /// PV of FCFs plus PV of terminal value, less net debt.
    pub enterprise_value: f64,
}

/// Evaluates draws against one fixed set of parameters.
#[derive(Debug, Clone, Copy)]
pub struct ValuationEngine<'a> {
    params: &'a ValuationParameters,
    mode: DistributionMode,
    division: DivisionPolicy,
}

impl<'a> ValuationEngine<'a> {
    pub fn new(params: &'a ValuationParameters, mode: DistributionMode, division: DivisionPolicy) -> Self {
        Self { params, mode, division }
    }

    pub fn compute(&self, draw: &IterationDraw) -> Valuation {
        compute(draw, self.params, self.mode, self.division)
    }
}

/// Value one draw, or say why it was rejected.
pub fn compute(
    draw: &IterationDraw,
    params: &ValuationParameters,
    mode: DistributionMode,
    division: DivisionPolicy,
) -> Valuation {
    if let Some(reason) = gate(draw, mode) {
        return Valuation::Rejected(reason);
    }

    let dcf = dcf_breakdown(&params.fcf_projections, params.total_net_debt, draw.discount_rate, draw.growth_rate);
    let unit_b_ev = params.unit_b_ebit * draw.multiple_b;
    let unit_c_ev = params.unit_c_ebit * draw.multiple_c;
    let total_ev = dcf.enterprise_value + unit_b_ev + unit_c_ev + params.fixed_unit_ev;

    let equity = (1.0 - draw.holding_discount) * total_ev;
    let price = match division {
        DivisionPolicy::True => equity / params.shares_outstanding,
        DivisionPolicy::LegacyFloor => (equity / params.shares_outstanding).floor(),
    };

    if price.is_finite() {
        Valuation::Price(price)
    } else {
        Valuation::Rejected(Rejection::NonFinite)
    }
}

/// Validity gate. Equality of `g` and `r` counts as invalid.
fn gate(draw: &IterationDraw, mode: DistributionMode) -> Option<Rejection> {
    // Written as a negated `<` so NaN draws are rejected too.
    if !(draw.growth_rate < draw.discount_rate) {
        return Some(Rejection::GrowthAtOrAboveDiscount);
    }
    if mode == DistributionMode::Normal {
        if draw.multiple_b < 0.0 {
            return Some(Rejection::NegativeMultipleB);
        }
        if draw.multiple_c < 0.0 {
            return Some(Rejection::NegativeMultipleC);
        }
        if draw.holding_discount < 0.0 {
            return Some(Rejection::NegativeHoldingDiscount);
        }
    }
    None
}

/// Two-stage DCF. Callers must ensure `growth_rate < discount_rate`.
pub fn dcf_breakdown(fcf: &[f64], net_debt: f64, discount_rate: f64, growth_rate: f64) -> DcfBreakdown {
    let base = 1.0 + discount_rate;

    let pv_fcf: f64 = fcf
        .iter()
        .enumerate()
        .map(|(j, cf)| cf / base.powi(j as i32 + 1))
        .sum();

    let last = fcf.last().copied().unwrap_or(0.0);
    let terminal_value = last * (1.0 + growth_rate) / (discount_rate - growth_rate);
    let pv_terminal_value = terminal_value / base.powi(fcf.len() as i32);

    DcfBreakdown {
        pv_fcf,
        terminal_value,
        pv_terminal_value,
        enterprise_value: pv_fcf + pv_terminal_value - net_debt,
    }
}
