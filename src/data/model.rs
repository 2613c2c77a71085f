use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Unit conversion constants
// ---------------------------------------------------------------------------

/// Square feet per square metre.
pub const SQFT_PER_SQMT: f64 = 10.7639;
/// Square feet per square yard.
pub const SQFT_PER_SQYD: f64 = 9.0;

/// The one status value that is unconditionally excluded from filter
/// results. Matched case-insensitively after trimming.
pub const SOLD_OUT: &str = "sold out";

// ---------------------------------------------------------------------------
// PlotRecord – one row of the catalog
// ---------------------------------------------------------------------------

/// A single plot (one row of the source table).
///
/// Numeric fields are `None` when the source cell was empty or unparsable.
/// Such a field never matches a numeric constraint and renders as "n/a" in
/// detail views; the rest of the record is unaffected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotRecord {
    /// Plot number (`NO` column). Lookup key; not guaranteed unique.
    pub id: String,
    pub net_area_sqft: Option<f64>,
    pub built_area_sqft: Option<f64>,
    pub total_area_sqft: Option<f64>,
    /// Total area in m²: the precomputed source column when supplied,
    /// otherwise derived from square feet.
    pub total_area_sqmt: Option<f64>,
    /// Total area in yd², same sourcing rule as `total_area_sqmt`.
    pub total_area_sqyd: Option<f64>,
    /// Base price.
    pub rate: Option<f64>,
    /// Stored 9%-off price, never recomputed.
    pub discounted_rate: Option<f64>,
    /// Free-text sales status.
    pub status: String,
}

impl PlotRecord {
    /// Whether this plot is sold out.
    pub fn is_sold_out(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(SOLD_OUT)
    }
}

// ---------------------------------------------------------------------------
// PlotDataset – the complete loaded catalog
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed lookup and legend indices.
/// Held immutably for the session; replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct PlotDataset {
    /// All plots (rows), in source order.
    pub plots: Vec<PlotRecord>,
    /// Unique plot ids in first-seen order (the multiselect options).
    pub plot_ids: Vec<String>,
    /// Unique status values: lowercased key → first-seen display casing.
    pub statuses: BTreeMap<String, String>,
}

impl PlotDataset {
    /// Build the id and status indices from the loaded plots.
    pub fn from_plots(plots: Vec<PlotRecord>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut plot_ids = Vec::new();
        let mut statuses = BTreeMap::new();

        for plot in &plots {
            if !plot.id.is_empty() && seen.insert(plot.id.as_str()) {
                plot_ids.push(plot.id.clone());
            }
            let status = plot.status.trim();
            if !status.is_empty() {
                statuses
                    .entry(status.to_lowercase())
                    .or_insert_with(|| status.to_string());
            }
        }

        PlotDataset {
            plot_ids,
            statuses,
            plots,
        }
    }

    /// Number of plots.
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(id: &str, status: &str) -> PlotRecord {
        PlotRecord {
            id: id.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn sold_out_matching_is_case_insensitive() {
        assert!(plot("1", "Sold Out").is_sold_out());
        assert!(plot("1", "  SOLD OUT ").is_sold_out());
        assert!(!plot("1", "Available").is_sold_out());
        assert!(!plot("1", "sold").is_sold_out());
    }

    #[test]
    fn from_plots_indexes_ids_and_statuses() {
        let ds = PlotDataset::from_plots(vec![
            plot("12", "Available"),
            plot("7", "Sold Out"),
            plot("12", "available"),
            plot("", "Reserved"),
        ]);
        // ids deduplicated in first-seen order; blank ids skipped
        assert_eq!(ds.plot_ids, vec!["12", "7"]);
        // statuses keyed case-insensitively, display casing from first sight
        assert_eq!(ds.statuses.len(), 3);
        assert_eq!(ds.statuses.get("available"), Some(&"Available".to_string()));
        assert_eq!(ds.len(), 4);
        assert!(!ds.is_empty());
    }
}
