use std::collections::BTreeMap;

use analysis_core::{AnalysisError, Bar, Fundamentals, HistoryRequest, MonthlyRequest, SymbolMatch};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use serde_json::Value;

/// quoteSummary modules merged into one fundamentals snapshot
pub const SUMMARY_MODULES: &[&str] = &[
    "assetProfile",
    "summaryProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "price",
    "quoteType",
];

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// `period1`/`period2` covering `[from, to]`; period2 is exclusive upstream
fn window_params(from: NaiveDate, to: NaiveDate) -> [(&'static str, String); 2] {
    [
        ("period1", unix_midnight(from).to_string()),
        ("period2", unix_midnight(to + Duration::days(1)).to_string()),
    ]
}

/// Chart query parameters for a daily history request
pub fn history_query(request: &HistoryRequest) -> Vec<(&'static str, String)> {
    let mut query = match request.window {
        Some(window) => window_params(window.start, window.end).to_vec(),
        None => vec![("range", request.period.clone())],
    };
    query.push(("interval", request.interval.clone()));
    query.push(("includeAdjustedClose", "true".to_string()));
    query
}

/// Chart query parameters for a monthly series request
pub fn monthly_query(request: MonthlyRequest) -> Vec<(&'static str, String)> {
    let mut query = match request {
        MonthlyRequest::Range { from, to } => window_params(from, to).to_vec(),
        MonthlyRequest::Max => vec![("range", "max".to_string())],
    };
    query.push(("interval", "1mo".to_string()));
    query.push(("includeAdjustedClose", "true".to_string()));
    query
}

fn column<'a>(value: &'a Value, name: &str) -> &'a [Value] {
    value
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_not_found(error: &Value) -> bool {
    let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
    code.eq_ignore_ascii_case("Not Found")
}

fn error_message(error: &Value) -> String {
    error
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Decode a `/v8/finance/chart` body into ascending, de-duplicated bars.
///
/// Timestamps shift by the exchange `gmtoffset` before taking the calendar
/// date. Rows with any null OHLC field are dropped. When `adjclose` is
/// present every price is scaled by `adjclose / close`. A "Not Found" chart
/// error is an empty history.
pub fn parse_chart(body: &Value) -> Result<Vec<Bar>, AnalysisError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| AnalysisError::ApiError("chart response missing 'chart'".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        if is_not_found(error) {
            return Ok(Vec::new());
        }
        return Err(AnalysisError::ApiError(error_message(error)));
    }

    let result = match chart.get("result").and_then(Value::as_array).and_then(|r| r.first()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };

    let gmtoffset = result
        .get("meta")
        .and_then(|m| m.get("gmtoffset"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let timestamps = column(result, "timestamp");
    let indicators = result.get("indicators").cloned().unwrap_or(Value::Null);
    let quote = indicators
        .get("quote")
        .and_then(Value::as_array)
        .and_then(|q| q.first())
        .cloned()
        .unwrap_or(Value::Null);
    let adjclose = indicators
        .get("adjclose")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .map(|a| column(a, "adjclose"))
        .unwrap_or(&[]);

    let (opens, highs, lows, closes, volumes) = (
        column(&quote, "open"),
        column(&quote, "high"),
        column(&quote, "low"),
        column(&quote, "close"),
        column(&quote, "volume"),
    );
    let at = |series: &[Value], i: usize| series.get(i).and_then(Value::as_f64);

    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(ts) = ts.as_i64() else { continue };
        let (Some(open), Some(high), Some(low), Some(close)) =
            (at(opens, i), at(highs, i), at(lows, i), at(closes, i))
        else {
            continue;
        };
        let Some(local) = DateTime::from_timestamp(ts + gmtoffset, 0) else {
            continue;
        };

        let factor = match at(adjclose, i) {
            Some(adj) if close != 0.0 => adj / close,
            _ => 1.0,
        };

        let date = local.date_naive();
        by_date.insert(
            date,
            Bar {
                date,
                open: open * factor,
                high: high * factor,
                low: low * factor,
                close: close * factor,
                volume: at(volumes, i).unwrap_or(0.0),
            },
        );
    }

    Ok(by_date.into_values().collect())
}

/// Normalize `/v1/finance/search` quotes; `shortname` falls back to `longname`
pub fn parse_search(body: &Value) -> Vec<SymbolMatch> {
    let text = |quote: &Value, key: &str| quote.get(key).and_then(Value::as_str).map(str::to_string);

    column(body, "quotes")
        .iter()
        .map(|quote| SymbolMatch {
            symbol: text(quote, "symbol"),
            shortname: text(quote, "shortname").or_else(|| text(quote, "longname")),
            quote_type: text(quote, "quoteType"),
            exchange: text(quote, "exchange"),
        })
        .collect()
}

/// Merge quoteSummary modules into one flat map, unwrapping `{raw, fmt}`
/// values to `raw`. The first module to define a key wins.
pub fn flatten_quote_summary(body: &Value) -> Result<Fundamentals, AnalysisError> {
    let summary = body.get("quoteSummary").ok_or_else(|| {
        AnalysisError::ApiError("quoteSummary response missing 'quoteSummary'".to_string())
    })?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        if is_not_found(error) {
            return Err(AnalysisError::NotFound(error_message(error)));
        }
        return Err(AnalysisError::ApiError(error_message(error)));
    }

    let mut flat = Fundamentals::new();
    let Some(result) = summary.get("result").and_then(Value::as_array).and_then(|r| r.first()) else {
        return Ok(flat);
    };
    let Some(modules) = result.as_object() else {
        return Ok(flat);
    };

    for module in SUMMARY_MODULES.iter().filter_map(|name| modules.get(*name)) {
        let Some(fields) = module.as_object() else { continue };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            let unwrapped = match value {
                Value::Object(inner) if inner.contains_key("raw") => inner["raw"].clone(),
                // `{}` is how the endpoint spells an absent value
                Value::Object(inner) if inner.is_empty() => continue,
                other => other.clone(),
            };
            flat.entry(key.clone()).or_insert(unwrapped);
        }
    }

    Ok(flat)
}
