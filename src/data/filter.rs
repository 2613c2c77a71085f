use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{PlotDataset, PlotRecord};

// ---------------------------------------------------------------------------
// Declarative constraint specification
// ---------------------------------------------------------------------------

/// An inclusive numeric range constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub fn new(min: f64, max: f64) -> Self {
        RangeFilter { min, max }
    }

    /// A range is usable only when `max` strictly exceeds `min`.
    pub fn is_valid(&self) -> bool {
        self.max > self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The unit systems a range constraint can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterField {
    /// Compared against the base rate, never the discounted rate.
    Budget,
    /// Total plot area in square metres.
    AreaSqmt,
    /// Total plot area in square yards.
    AreaSqyd,
    /// Total plot area in square feet.
    AreaSqft,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Budget,
        FilterField::AreaSqmt,
        FilterField::AreaSqyd,
        FilterField::AreaSqft,
    ];

    /// Short label used in filter headers and warnings.
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Budget => "Budget (₹)",
            FilterField::AreaSqmt => "Area (m²)",
            FilterField::AreaSqyd => "Area (yd²)",
            FilterField::AreaSqft => "Area (ft²)",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active constraints per unit system. An absent field imposes no
/// constraint.
pub type FilterSpec = BTreeMap<FilterField, RangeFilter>;

// ---------------------------------------------------------------------------
// Filter outcome
// ---------------------------------------------------------------------------

/// An active constraint whose range was unusable (max ≤ min). The
/// constraint is skipped; everything else still applies.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeWarning {
    pub field: FilterField,
    pub range: RangeFilter,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: max ({}) must be larger than min ({}); filter ignored",
            self.field, self.range.max, self.range.min
        )
    }
}

/// Matching indices plus any per-constraint warnings.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub indices: Vec<usize>,
    pub warnings: Vec<RangeWarning>,
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of plots that pass all usable constraints.
///
/// A plot passes when:
/// * its status is not "sold out" (always enforced), and
/// * for every valid active constraint, the compared field is present and
///   inside the range. A missing field fails that constraint only.
///
/// Invalid ranges are reported in `warnings` and skipped, so one bad range
/// never blocks the remaining filters. Result order is source order.
pub fn filtered_indices(dataset: &PlotDataset, spec: &FilterSpec) -> FilterOutcome {
    let mut warnings = Vec::new();
    let mut active: Vec<(FilterField, RangeFilter)> = Vec::new();
    for (&field, &range) in spec {
        if range.is_valid() {
            active.push((field, range));
        } else {
            warnings.push(RangeWarning { field, range });
        }
    }

    let indices = dataset
        .plots
        .iter()
        .enumerate()
        .filter(|(_, plot)| {
            if plot.is_sold_out() {
                return false;
            }
            active
                .iter()
                .all(|&(field, range)| field_value(plot, field).is_some_and(|v| range.contains(v)))
        })
        .map(|(i, _)| i)
        .collect();

    FilterOutcome { indices, warnings }
}

/// The field a constraint compares against. Area constraints always target
/// the *total* plot area in the matching unit.
fn field_value(plot: &PlotRecord, field: FilterField) -> Option<f64> {
    match field {
        FilterField::Budget => plot.rate,
        FilterField::AreaSqmt => plot.total_area_sqmt,
        FilterField::AreaSqyd => plot.total_area_sqyd,
        FilterField::AreaSqft => plot.total_area_sqft,
    }
}

// ---------------------------------------------------------------------------
// Plot lookup
// ---------------------------------------------------------------------------

/// Indices of every plot whose id is in `ids`, in source order.
///
/// Duplicate plot numbers all match; ids not present in the catalog are
/// skipped silently.
pub fn lookup_indices(dataset: &PlotDataset, ids: &BTreeSet<String>) -> Vec<usize> {
    if ids.is_empty() {
        return Vec::new();
    }
    dataset
        .plots
        .iter()
        .enumerate()
        .filter(|(_, plot)| ids.contains(&plot.id))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SQFT_PER_SQMT, SQFT_PER_SQYD};

    fn plot(id: &str, rate: f64, total_sqft: f64, status: &str) -> PlotRecord {
        PlotRecord {
            id: id.into(),
            total_area_sqft: Some(total_sqft),
            total_area_sqmt: Some(total_sqft / SQFT_PER_SQMT),
            total_area_sqyd: Some(total_sqft / SQFT_PER_SQYD),
            rate: Some(rate),
            status: status.into(),
            ..Default::default()
        }
    }

    fn catalog() -> PlotDataset {
        PlotDataset::from_plots(vec![
            plot("1", 650_000.0, 1_000.0, "Available"),
            plot("2", 750_000.0, 1_200.0, "Sold Out"),
            plot("3", 900_000.0, 2_000.0, "Reserved"),
            plot("4", 1_200_000.0, 3_500.0, "Available"),
        ])
    }

    fn spec(entries: &[(FilterField, f64, f64)]) -> FilterSpec {
        entries
            .iter()
            .map(|&(field, min, max)| (field, RangeFilter::new(min, max)))
            .collect()
    }

    #[test]
    fn budget_range_matches_concrete_scenario() {
        let outcome =
            filtered_indices(&catalog(), &spec(&[(FilterField::Budget, 600_000.0, 700_000.0)]));
        assert_eq!(outcome.indices, vec![0]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn invalid_range_warns_and_falls_back_to_status_filtered_set() {
        let outcome = filtered_indices(&catalog(), &spec(&[(FilterField::Budget, 0.0, 0.0)]));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, FilterField::Budget);
        // NO=2 is still excluded by status.
        assert_eq!(outcome.indices, vec![0, 2, 3]);
    }

    #[test]
    fn status_exclusion_is_absolute() {
        // Only NO=2 is in this budget range, and it is sold out.
        let outcome =
            filtered_indices(&catalog(), &spec(&[(FilterField::Budget, 700_000.0, 800_000.0)]));
        assert!(outcome.indices.is_empty());
    }

    #[test]
    fn no_active_filters_returns_status_filtered_set() {
        let outcome = filtered_indices(&catalog(), &FilterSpec::new());
        assert_eq!(outcome.indices, vec![0, 2, 3]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn composition_is_conjunctive() {
        let ds = catalog();
        let budget = (FilterField::Budget, 600_000.0, 1_000_000.0);
        let area = (FilterField::AreaSqft, 1_500.0, 4_000.0);

        let both = filtered_indices(&ds, &spec(&[budget, area])).indices;
        let a = filtered_indices(&ds, &spec(&[budget])).indices;
        let b = filtered_indices(&ds, &spec(&[area])).indices;
        let intersection: Vec<usize> = a.iter().copied().filter(|i| b.contains(i)).collect();

        assert_eq!(both, intersection);
        assert_eq!(both, vec![2]);
    }

    #[test]
    fn invalid_range_does_not_disturb_other_constraints() {
        let outcome = filtered_indices(
            &catalog(),
            &spec(&[
                (FilterField::AreaSqmt, 100.0, 50.0), // invalid, skipped
                (FilterField::Budget, 600_000.0, 700_000.0),
            ]),
        );
        assert_eq!(outcome.indices, vec![0]);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, FilterField::AreaSqmt);
    }

    #[test]
    fn budget_compares_base_rate_not_discounted() {
        let mut discounted = plot("5", 800_000.0, 1_000.0, "Available");
        discounted.discounted_rate = Some(650_000.0);
        let ds = PlotDataset::from_plots(vec![discounted]);

        let outcome =
            filtered_indices(&ds, &spec(&[(FilterField::Budget, 600_000.0, 700_000.0)]));
        assert!(outcome.indices.is_empty());
    }

    #[test]
    fn missing_field_fails_only_that_constraint() {
        let mut unpriced = plot("6", 0.0, 1_000.0, "Available");
        unpriced.rate = None;
        let ds = PlotDataset::from_plots(vec![unpriced]);

        // No budget constraint active: the record is included.
        let by_area = filtered_indices(&ds, &spec(&[(FilterField::AreaSqft, 500.0, 1_500.0)]));
        assert_eq!(by_area.indices, vec![0]);

        // Budget constraint active: the unpriced record cannot match it.
        let by_budget = filtered_indices(&ds, &spec(&[(FilterField::Budget, 0.0, 9_999_999.0)]));
        assert!(by_budget.indices.is_empty());
    }

    #[test]
    fn area_constraints_target_converted_totals() {
        // 1000 ft² ≈ 92.90 m² ≈ 111.11 yd²
        let ds = catalog();
        let sqmt = filtered_indices(&ds, &spec(&[(FilterField::AreaSqmt, 90.0, 95.0)]));
        assert_eq!(sqmt.indices, vec![0]);
        let sqyd = filtered_indices(&ds, &spec(&[(FilterField::AreaSqyd, 110.0, 112.0)]));
        assert_eq!(sqyd.indices, vec![0]);
    }

    #[test]
    fn lookup_returns_every_match_in_source_order() {
        let ds = PlotDataset::from_plots(vec![
            plot("1", 1.0, 1.0, "Available"),
            plot("2", 1.0, 1.0, "Available"),
            plot("1", 1.0, 1.0, "Sold Out"), // duplicate id, still returned
        ]);
        let ids: BTreeSet<String> = ["1".to_string()].into();
        assert_eq!(lookup_indices(&ds, &ids), vec![0, 2]);
    }

    #[test]
    fn lookup_skips_unknown_ids_silently() {
        let ds = catalog();
        let ids: BTreeSet<String> = ["3".to_string(), "99".to_string()].into();
        assert_eq!(lookup_indices(&ds, &ids), vec![2]);
        assert!(lookup_indices(&ds, &BTreeSet::new()).is_empty());
    }
}
