use analysis_core::Fundamentals;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A fundamentals field as reported by the provider, or the "N/A" marker
#[derive(Debug, Clone, PartialEq)]
pub enum RatioValue {
    Available(Value),
    NotAvailable,
}

impl RatioValue {
    /// Looks `key` up in the snapshot. JSON `null` counts as missing.
    pub fn lookup(fundamentals: &Fundamentals, key: &str) -> Self {
        match fundamentals.get(key) {
            Some(Value::Null) | None => RatioValue::NotAvailable,
            Some(value) => RatioValue::Available(value.clone()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RatioValue::Available(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RatioValue::Available(value) => value.as_f64(),
            RatioValue::NotAvailable => None,
        }
    }
}

impl Serialize for RatioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatioValue::Available(value) => value.serialize(serializer),
            RatioValue::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    #[serde(rename = "Trailing P/E")]
    pub trailing_pe: RatioValue,
    #[serde(rename = "Forward P/E")]
    pub forward_pe: RatioValue,
    #[serde(rename = "PEG Ratio")]
    pub peg_ratio: RatioValue,
    #[serde(rename = "Price/Book")]
    pub price_to_book: RatioValue,
    #[serde(rename = "Price/Sales")]
    pub price_to_sales: RatioValue,
    #[serde(rename = "Enterprise Value/EBITDA")]
    pub ev_to_ebitda: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profitability {
    #[serde(rename = "Profit Margin")]
    pub profit_margin: RatioValue,
    #[serde(rename = "Operating Margin")]
    pub operating_margin: RatioValue,
    #[serde(rename = "Return on Assets")]
    pub return_on_assets: RatioValue,
    #[serde(rename = "Return on Equity")]
    pub return_on_equity: RatioValue,
    #[serde(rename = "EBITDA Margins")]
    pub ebitda_margins: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityDebt {
    #[serde(rename = "Current Ratio")]
    pub current_ratio: RatioValue,
    #[serde(rename = "Quick Ratio")]
    pub quick_ratio: RatioValue,
    #[serde(rename = "Debt/Equity")]
    pub debt_to_equity: RatioValue,
    #[serde(rename = "Total Cash")]
    pub total_cash: RatioValue,
    #[serde(rename = "Total Debt")]
    pub total_debt: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Growth {
    #[serde(rename = "Revenue Growth")]
    pub revenue_growth: RatioValue,
    #[serde(rename = "Earnings Growth")]
    pub earnings_growth: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dividends {
    #[serde(rename = "Dividend Rate")]
    pub dividend_rate: RatioValue,
    #[serde(rename = "Dividend Yield")]
    pub dividend_yield: RatioValue,
    #[serde(rename = "Payout Ratio")]
    pub payout_ratio: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct General {
    #[serde(rename = "Market Cap")]
    pub market_cap: RatioValue,
    #[serde(rename = "Beta")]
    pub beta: RatioValue,
    #[serde(rename = "Employees")]
    pub employees: RatioValue,
    #[serde(rename = "Sector")]
    pub sector: RatioValue,
    #[serde(rename = "Industry")]
    pub industry: RatioValue,
}

/// Fundamental ratios grouped the way the dashboard tables show them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioSnapshot {
    #[serde(rename = "Valuation")]
    pub valuation: Valuation,
    #[serde(rename = "Profitability")]
    pub profitability: Profitability,
    #[serde(rename = "Liquidity & Debt")]
    pub liquidity_debt: LiquidityDebt,
    #[serde(rename = "Growth")]
    pub growth: Growth,
    #[serde(rename = "Dividends")]
    pub dividends: Dividends,
    #[serde(rename = "General")]
    pub general: General,
}

/// Builds the ratio tables. Never fails; absent fields become "N/A".
pub fn extract(fundamentals: &Fundamentals) -> RatioSnapshot {
    let g = |key: &str| RatioValue::lookup(fundamentals, key);

    RatioSnapshot {
        valuation: Valuation {
            trailing_pe: g("trailingPE"),
            forward_pe: g("forwardPE"),
            peg_ratio: g("pegRatio"),
            price_to_book: g("priceToBook"),
            price_to_sales: g("priceToSalesTrailing12Months"),
            ev_to_ebitda: g("enterpriseToEbitda"),
        },
        profitability: Profitability {
            profit_margin: g("profitMargins"),
            operating_margin: g("operatingMargins"),
            return_on_assets: g("returnOnAssets"),
            return_on_equity: g("returnOnEquity"),
            ebitda_margins: g("ebitdaMargins"),
        },
        liquidity_debt: LiquidityDebt {
            current_ratio: g("currentRatio"),
            quick_ratio: g("quickRatio"),
            debt_to_equity: g("debtToEquity"),
            total_cash: g("totalCash"),
            total_debt: g("totalDebt"),
        },
        growth: Growth {
            revenue_growth: g("revenueGrowth"),
            earnings_growth: g("earningsGrowth"),
        },
        dividends: Dividends {
            dividend_rate: g("dividendRate"),
            dividend_yield: g("dividendYield"),
            payout_ratio: g("payoutRatio"),
        },
        general: General {
            market_cap: g("marketCap"),
            beta: g("beta"),
            employees: g("fullTimeEmployees"),
            sector: g("sector"),
            industry: g("industry"),
        },
    }
}
