use super::model::{PlotRecord, SQFT_PER_SQMT, SQFT_PER_SQYD};

/// Marker rendered for a missing or unparsable sub-value.
pub const NOT_AVAILABLE: &str = "n/a";

// ---------------------------------------------------------------------------
// AreaBreakdown – one area field in all three unit systems
// ---------------------------------------------------------------------------

/// One area field expressed in all three unit systems, at full precision.
/// Rounding to two decimals happens only in [`format_area`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaBreakdown {
    pub sqft: Option<f64>,
    pub sqmt: Option<f64>,
    pub sqyd: Option<f64>,
}

impl AreaBreakdown {
    /// Derive m² and yd² from a square-feet value with the fixed divisors.
    pub fn from_sqft(sqft: Option<f64>) -> Self {
        AreaBreakdown {
            sqft,
            sqmt: sqft.map(|v| v / SQFT_PER_SQMT),
            sqyd: sqft.map(|v| v / SQFT_PER_SQYD),
        }
    }
}

// ---------------------------------------------------------------------------
// PlotDetail – the derived per-plot view
// ---------------------------------------------------------------------------

/// Everything the detail view needs for one plot, derived from stored
/// fields only. Missing inputs stay `None` per sub-value; a partially
/// parsable record still renders its other fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotDetail {
    pub id: String,
    pub status: String,
    pub net: AreaBreakdown,
    pub built_up: AreaBreakdown,
    pub total: AreaBreakdown,
    pub rate: Option<f64>,
    pub discounted_rate: Option<f64>,
}

/// Compute the display view for a single plot. Pure and infallible.
pub fn derive_detail(plot: &PlotRecord) -> PlotDetail {
    PlotDetail {
        id: plot.id.clone(),
        status: plot.status.clone(),
        net: AreaBreakdown::from_sqft(plot.net_area_sqft),
        built_up: AreaBreakdown::from_sqft(plot.built_area_sqft),
        total: AreaBreakdown::from_sqft(plot.total_area_sqft),
        rate: plot.rate,
        discounted_rate: plot.discounted_rate,
    }
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Format an area sub-value at two decimals, or the "n/a" marker.
pub fn format_area(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a price as non-negative currency: thousands separators, no
/// decimals. Missing, negative, or non-finite values render as "n/a".
pub fn format_currency(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => return NOT_AVAILABLE.to_string(),
    };
    let digits = (v.round() as u64).to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("₹{}", grouped.chars().rev().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousand_square_feet_breakdown() {
        let breakdown = AreaBreakdown::from_sqft(Some(1_000.0));
        assert_eq!(format_area(breakdown.sqmt), "92.90");
        assert_eq!(format_area(breakdown.sqyd), "111.11");
        assert_eq!(format_area(breakdown.sqft), "1000.00");
    }

    #[test]
    fn conversions_round_trip_at_full_precision() {
        let breakdown = AreaBreakdown::from_sqft(Some(1_234.56));
        let sqmt = breakdown.sqmt.unwrap();
        let sqyd = breakdown.sqyd.unwrap();
        assert!((sqmt * SQFT_PER_SQMT - 1_234.56).abs() < 1e-9);
        assert!((sqyd * SQFT_PER_SQYD - 1_234.56).abs() < 1e-9);
    }

    #[test]
    fn missing_sub_values_do_not_fail_the_record() {
        let plot = PlotRecord {
            id: "9".into(),
            total_area_sqft: Some(1_000.0),
            discounted_rate: Some(591_500.0),
            status: "Available".into(),
            ..Default::default()
        };
        let detail = derive_detail(&plot);

        assert_eq!(detail.net.sqmt, None);
        assert_eq!(format_area(detail.net.sqmt), NOT_AVAILABLE);
        assert_eq!(format_area(detail.total.sqft), "1000.00");
        assert_eq!(format_currency(detail.rate), NOT_AVAILABLE);
        assert_eq!(format_currency(detail.discounted_rate), "₹591,500");
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(Some(650_000.0)), "₹650,000");
        assert_eq!(format_currency(Some(0.0)), "₹0");
        assert_eq!(format_currency(Some(1_234_567.4)), "₹1,234,567");
        assert_eq!(format_currency(Some(999.6)), "₹1,000");
        assert_eq!(format_currency(None), NOT_AVAILABLE);
        assert_eq!(format_currency(Some(-5.0)), NOT_AVAILABLE);
        assert_eq!(format_currency(Some(f64::NAN)), NOT_AVAILABLE);
    }
}
