use anyhow::Result;
use chrono::{DateTime, Utc};
use pricemath_core::{IndicatorConfig, PriceSeries};
use pricemath_indicators::{
    convert_to_changes, quantile, smas, Ema, IndicatorKind, Rsi, SeriesIndicator, Sma, Steep,
};
use serde::Serialize;
use std::fmt;

/// How many rolling SMA values to include, most recent first.
const SMA_TRAIL: usize = 5;

/// One evaluated indicator.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorValue {
    pub kind: IndicatorKind,
    pub period: usize,
    pub min_len: usize,
    pub value: Option<f64>,
}

/// Everything the CLI prints for one price series.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReport {
    pub symbol: String,
    pub as_of: Option<DateTime<Utc>>,
    pub observations: usize,
    pub latest_close: Option<f64>,
    pub indicators: Vec<IndicatorValue>,
    pub sma_trail: Vec<f64>,
    pub change_period: usize,
    pub latest_change: Option<f64>,
    pub quantile_fraction: f64,
    pub quantile: Option<f64>,
}

/// Build the configured indicators, SMA, EMA, RSI and steepness in that order.
pub fn configured_indicators(config: &IndicatorConfig) -> Result<Vec<Box<dyn SeriesIndicator>>> {
    let indicators: Vec<Box<dyn SeriesIndicator>> = vec![
        Box::new(Sma::new(config.sma_period)?),
        Box::new(Ema::new(config.ema_period)?),
        Box::new(Rsi::new(config.rsi_period)?),
        Box::new(Steep::new(config.steep_period)?),
    ];
    Ok(indicators)
}

pub fn build_report(config: &IndicatorConfig, series: &PriceSeries) -> Result<IndicatorReport> {
    let closes = series.closes();

    let indicators = configured_indicators(config)?
        .iter()
        .map(|ind| {
            let value = ind.compute(closes);
            match value {
                Some(v) => tracing::debug!(
                    kind = %ind.kind(),
                    period = ind.period(),
                    value = v,
                    "Computed indicator"
                ),
                None => tracing::warn!(
                    kind = %ind.kind(),
                    period = ind.period(),
                    needed = ind.min_len(),
                    have = closes.len(),
                    "Not enough closes for indicator"
                ),
            }
            IndicatorValue {
                kind: ind.kind(),
                period: ind.period(),
                min_len: ind.min_len(),
                value,
            }
        })
        .collect();

    let mut sma_trail = smas(config.sma_period, closes);
    sma_trail.truncate(SMA_TRAIL);

    Ok(IndicatorReport {
        symbol: series.symbol.clone(),
        as_of: series.as_of,
        observations: closes.len(),
        latest_close: series.latest(),
        indicators,
        sma_trail,
        change_period: config.change_period,
        latest_change: convert_to_changes(config.change_period, closes).first().copied(),
        quantile_fraction: config.quantile,
        quantile: quantile(config.quantile, closes),
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

impl fmt::Display for IndicatorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = "=".repeat(60);
        writeln!(f, "\n{sep}")?;
        writeln!(f, "  INDICATOR REPORT")?;
        writeln!(f, "{sep}")?;
        writeln!(f, "  Symbol:          {}", self.symbol)?;
        if let Some(as_of) = self.as_of {
            writeln!(f, "  As of:           {}", as_of.format("%Y-%m-%d %H:%M"))?;
        }
        writeln!(f, "  Observations:    {}", self.observations)?;
        writeln!(f, "  Latest Close:    {}", fmt_opt(self.latest_close))?;
        for ind in &self.indicators {
            let label = format!("{}({})", ind.kind, ind.period);
            match ind.value {
                Some(v) => writeln!(f, "  {label:<16} {v:.4}")?,
                None => writeln!(f, "  {label:<16} n/a (needs {} closes)", ind.min_len)?,
            }
        }
        let trail: Vec<String> = self.sma_trail.iter().map(|v| format!("{v:.2}")).collect();
        writeln!(f, "  SMA trail:       [{}]", trail.join(", "))?;
        if let Some(change) = self.latest_change {
            writeln!(f, "  Change({}):       {:.2}%", self.change_period, change * 100.0)?;
        } else {
            writeln!(f, "  Change({}):       n/a", self.change_period)?;
        }
        writeln!(f, "  Quantile({}):   {}", self.quantile_fraction, fmt_opt(self.quantile))?;
        write!(f, "{sep}")
    }
}
