use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use super::loader::{
    COL_BUILT_SQFT, COL_DISCOUNT, COL_NET_SQFT, COL_PLOT_NO, COL_RATE, COL_STATUS, COL_TOTAL_SQFT,
    COL_TOTAL_SQMT, COL_TOTAL_SQYD,
};
use super::model::{PlotDataset, PlotRecord};

// ---------------------------------------------------------------------------
// Export blobs – consumed by the UI save action
// ---------------------------------------------------------------------------

/// Why an export failed. Export never touches the filesystem; callers get
/// bytes and decide where they go.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Columns written by both exporters, in catalog order.
const EXPORT_COLUMNS: [&str; 9] = [
    COL_PLOT_NO,
    COL_NET_SQFT,
    COL_BUILT_SQFT,
    COL_TOTAL_SQFT,
    COL_TOTAL_SQMT,
    COL_TOTAL_SQYD,
    COL_RATE,
    COL_DISCOUNT,
    COL_STATUS,
];

/// The numeric cells between the id and status columns, in export order.
fn numeric_fields(plot: &PlotRecord) -> [Option<f64>; 7] {
    [
        plot.net_area_sqft,
        plot.built_area_sqft,
        plot.total_area_sqft,
        plot.total_area_sqmt,
        plot.total_area_sqyd,
        plot.rate,
        plot.discounted_rate,
    ]
}

/// Render the given rows to an XLSX workbook blob. Missing cells stay
/// blank; numeric cells are written as numbers.
pub fn to_xlsx(dataset: &PlotDataset, indices: &[usize]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, name) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string(0, c as u16, *name)?;
    }

    for (r, &idx) in indices.iter().enumerate() {
        let Some(plot) = dataset.plots.get(idx) else {
            continue;
        };
        let row = (r + 1) as u32;
        sheet.write_string(row, 0, plot.id.as_str())?;
        for (c, value) in numeric_fields(plot).iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(row, (c + 1) as u16, *v)?;
            }
        }
        sheet.write_string(row, (EXPORT_COLUMNS.len() - 1) as u16, plot.status.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render the given rows to CSV bytes (same columns as the XLSX export).
pub fn to_csv(dataset: &PlotDataset, indices: &[usize]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(EXPORT_COLUMNS)?;
        for &idx in indices {
            let Some(plot) = dataset.plots.get(idx) else {
                continue;
            };
            let mut record = Vec::with_capacity(EXPORT_COLUMNS.len());
            record.push(plot.id.clone());
            for value in numeric_fields(plot) {
                record.push(value.map(|v| v.to_string()).unwrap_or_default());
            }
            record.push(plot.status.clone());
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> PlotDataset {
        PlotDataset::from_plots(vec![
            PlotRecord {
                id: "1".into(),
                net_area_sqft: Some(600.0),
                built_area_sqft: Some(400.0),
                total_area_sqft: Some(1_000.0),
                total_area_sqmt: Some(92.9),
                total_area_sqyd: Some(111.11),
                rate: Some(650_000.0),
                discounted_rate: Some(591_500.0),
                status: "Available".into(),
            },
            PlotRecord {
                id: "2".into(),
                status: "Sold Out".into(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn csv_export_writes_the_selected_subset() {
        let bytes = to_csv(&dataset(), &[0]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("NO,NET PLOT AREA IN SQ.FEET"));
        assert_eq!(
            lines.next().unwrap(),
            "1,600,400,1000,92.9,111.11,650000,591500,Available"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_export_leaves_missing_cells_blank() {
        let bytes = to_csv(&dataset(), &[1]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "2,,,,,,,,Sold Out");
    }

    #[test]
    fn xlsx_export_is_a_zip_container() {
        let bytes = to_xlsx(&dataset(), &[0, 1]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
