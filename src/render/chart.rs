//! Companion scatter chart for a rendered worksheet.
//!
//! The chart is positional: column A holds the categories (years), column B
//! the first series and column C the second. Column meaning is not consulted.

use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartFormat, ChartLine, ChartMarker, ChartMarkerType, ChartSolidFill,
    ChartType, Color, ColNum, RowNum,
};

const FIRST_DATA_ROW: RowNum = 1;
const CATEGORY_COL: ColNum = 0;
const MARKER_SIZE: u8 = 5;

/// One plotted column of the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeriesSpec {
    pub col: ColNum,
    pub color: Color,
}

/// Series plotted for a sheet with `column_count` columns.
///
/// Column B is always plotted; column C only when the sheet has one.
pub(crate) fn series_for(column_count: usize) -> Vec<SeriesSpec> {
    let mut series = vec![SeriesSpec {
        col: 1,
        color: Color::Black,
    }];
    if column_count >= 3 {
        series.push(SeriesSpec {
            col: 2,
            color: Color::Green,
        });
    }
    series
}

/// Last worksheet row the chart covers, given the complete data rows.
///
/// With no data the range collapses to the first data row.
pub(crate) fn last_chart_row(data_rows: u32) -> RowNum {
    data_rows.max(FIRST_DATA_ROW)
}

/// Build the smoothed scatter chart for `sheet_name`.
pub(crate) fn build_chart(
    sheet_name: &str,
    workbook_title: &str,
    column_count: usize,
    data_rows: u32,
    style: u8,
) -> Chart {
    let last_row = last_chart_row(data_rows);
    let mut chart = Chart::new(ChartType::ScatterSmoothWithMarkers);

    for series in series_for(column_count) {
        let line = ChartLine::new().set_color(series.color).clone();
        let fill = ChartSolidFill::new().set_color(series.color).clone();

        chart
            .add_series()
            .set_name((sheet_name, 0, series.col))
            .set_categories((sheet_name, FIRST_DATA_ROW, CATEGORY_COL, last_row, CATEGORY_COL))
            .set_values((sheet_name, FIRST_DATA_ROW, series.col, last_row, series.col))
            .set_format(ChartFormat::new().set_line(&line))
            .set_marker(
                ChartMarker::new()
                    .set_type(ChartMarkerType::Circle)
                    .set_size(MARKER_SIZE)
                    .set_format(ChartFormat::new().set_border(&line).set_solid_fill(&fill)),
            )
            .set_data_label(ChartDataLabel::new().show_legend_key());
    }

    let title = format!("{} Salary Trend", workbook_title);
    chart.title().set_name(title.as_str());
    chart.x_axis().set_name("Years");
    chart.y_axis().set_name("Dollars");
    chart.set_style(style);

    chart
}
