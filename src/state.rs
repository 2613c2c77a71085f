use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::color::StatusColors;
use crate::data::filter::{
    FilterField, FilterSpec, RangeFilter, RangeWarning, filtered_indices, lookup_indices,
};
use crate::data::loader::{self, LoadError};
use crate::data::model::PlotDataset;

// ---------------------------------------------------------------------------
// Catalog source
// ---------------------------------------------------------------------------

/// Where the current catalog came from. The identity string keys the
/// session cache and names the source in log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    pub fn identity(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
        }
    }

    fn load(&self) -> Result<PlotDataset, LoadError> {
        match self {
            Source::Path(path) => loader::load_path(path),
            Source::Url(url) => loader::load_url(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter controls
// ---------------------------------------------------------------------------

/// UI state for one range filter: the toggle plus the retained min/max
/// values (kept even while disabled, like number inputs that remember
/// their last value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeControl {
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
}

impl RangeControl {
    fn new(enabled: bool, min: f64, max: f64) -> Self {
        RangeControl { enabled, min, max }
    }
}

/// One control per unit system, with the catalog's default limits.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    controls: BTreeMap<FilterField, RangeControl>,
}

impl Default for FilterControls {
    fn default() -> Self {
        let mut controls = BTreeMap::new();
        controls.insert(FilterField::Budget, RangeControl::new(true, 0.0, 10_000_000.0));
        controls.insert(FilterField::AreaSqmt, RangeControl::new(false, 0.0, 5_000.0));
        controls.insert(FilterField::AreaSqyd, RangeControl::new(false, 0.0, 6_000.0));
        controls.insert(FilterField::AreaSqft, RangeControl::new(false, 0.0, 50_000.0));
        FilterControls { controls }
    }
}

impl FilterControls {
    pub fn get_mut(&mut self, field: FilterField) -> &mut RangeControl {
        self.controls
            .entry(field)
            .or_insert_with(|| RangeControl::new(false, 0.0, 0.0))
    }

    /// The declarative constraint spec for the filter engine: enabled
    /// controls only.
    pub fn to_spec(&self) -> FilterSpec {
        self.controls
            .iter()
            .filter(|(_, control)| control.enabled)
            .map(|(&field, control)| (field, RangeFilter::new(control.min, control.max)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded catalog (None until a source is opened).
    pub dataset: Option<PlotDataset>,
    /// Identity of the loaded source.
    pub source: Option<Source>,
    /// Session cache: source identity → previously loaded catalog.
    cache: BTreeMap<String, PlotDataset>,
    /// Per-unit-system filter controls.
    pub filters: FilterControls,
    /// Indices of plots passing the current filters (cached).
    pub visible_indices: Vec<usize>,
    /// Invalid-range warnings from the last filter pass.
    pub warnings: Vec<RangeWarning>,
    /// Plot numbers selected for the detail panel.
    pub selected_ids: BTreeSet<String>,
    /// Indices of the selected plots (cached, source order).
    pub detail_indices: Vec<usize>,
    /// Colour map over the catalog's status values.
    pub status_colors: Option<StatusColors>,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
    /// URL typed into the Open URL field.
    pub url_input: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            cache: BTreeMap::new(),
            filters: FilterControls::default(),
            visible_indices: Vec::new(),
            warnings: Vec::new(),
            selected_ids: BTreeSet::new(),
            detail_indices: Vec::new(),
            status_colors: None,
            status_message: None,
            url_input: String::new(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded catalog; reset the selection, keep the filter
    /// limits the user already typed.
    pub fn set_dataset(&mut self, dataset: PlotDataset) {
        self.status_colors = Some(StatusColors::new(&dataset.statuses));
        self.selected_ids.clear();
        self.detail_indices.clear();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Load through the session cache: an identical source identity reuses
    /// the previously loaded catalog instead of re-reading it.
    pub fn load_source(&mut self, source: Source) -> Result<(), LoadError> {
        let identity = source.identity();
        let dataset = match self.cache.get(&identity) {
            Some(cached) => {
                log::info!("reusing cached catalog for {identity}");
                cached.clone()
            }
            None => {
                let dataset = source.load()?;
                log::info!("loaded {} plot(s) from {identity}", dataset.len());
                self.cache.insert(identity, dataset.clone());
                dataset
            }
        };
        self.source = Some(source);
        self.set_dataset(dataset);
        Ok(())
    }

    /// Drop the cache entry for the current source and load it again.
    pub fn reload_current(&mut self) -> Result<(), LoadError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        self.cache.remove(&source.identity());
        self.load_source(source)
    }

    /// Recompute `visible_indices` and warnings after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let outcome = filtered_indices(ds, &self.filters.to_spec());
            self.visible_indices = outcome.indices;
            self.warnings = outcome.warnings;
        }
    }

    /// Recompute `detail_indices` after a selection change.
    pub fn relookup(&mut self) {
        if let Some(ds) = &self.dataset {
            self.detail_indices = lookup_indices(ds, &self.selected_ids);
        }
    }

    /// Toggle one plot number in the detail selection.
    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected_ids.remove(id) {
            self.selected_ids.insert(id.to_string());
        }
        self.relookup();
    }

    /// Select every plot number for the detail panel.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_ids = ds.plot_ids.iter().cloned().collect();
        }
        self.relookup();
    }

    /// Clear the detail selection.
    pub fn select_none(&mut self) {
        self.selected_ids.clear();
        self.relookup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PlotRecord;

    fn dataset() -> PlotDataset {
        PlotDataset::from_plots(vec![
            PlotRecord {
                id: "1".into(),
                rate: Some(650_000.0),
                total_area_sqft: Some(1_000.0),
                status: "Available".into(),
                ..Default::default()
            },
            PlotRecord {
                id: "2".into(),
                rate: Some(750_000.0),
                total_area_sqft: Some(1_200.0),
                status: "Sold Out".into(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn to_spec_includes_only_enabled_controls() {
        let mut controls = FilterControls::default();
        let spec = controls.to_spec();
        // budget is on by default
        assert_eq!(spec.len(), 1);
        assert!(spec.contains_key(&FilterField::Budget));

        controls.get_mut(FilterField::AreaSqft).enabled = true;
        assert_eq!(controls.to_spec().len(), 2);
    }

    #[test]
    fn set_dataset_filters_with_the_default_controls() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        // the default budget range is 0..10M, so only the sold-out plot drops
        assert_eq!(state.visible_indices, vec![0]);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn selection_toggling_updates_detail_indices() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.toggle_selected("2");
        assert_eq!(state.detail_indices, vec![1]);
        state.toggle_selected("2");
        assert!(state.detail_indices.is_empty());

        state.select_all();
        assert_eq!(state.detail_indices, vec![0, 1]);
        state.select_none();
        assert!(state.detail_indices.is_empty());
    }
}
