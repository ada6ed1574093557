//! End-to-end checks on the XLSX packages produced by the renderer.
//!
//! Workbooks are rendered to memory (or a temp dir) and their parts read back
//! with `zip` so the tests assert on what Excel will actually open.

use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::{Cursor, Read};
use ssa_earnings::model::{CellValue, Row, SheetSpec, WorkbookRequest};
use ssa_earnings::render::{render_to_buffer, LocalZone, RenderOptions};
use ssa_earnings::{convert_file, parse_statement, statement_request, Error};

const STATEMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osss:OnlineSocialSecurityStatementData xmlns:osss="http://ssa.gov/osss/schemas/2.0">
  <osss:UserInformation>
    <osss:Name>Jane A. Doe</osss:Name>
  </osss:UserInformation>
  <osss:EarningsRecord>
    <osss:Earnings startYear="2020" endYear="2020">
      <osss:FicaEarnings>50000</osss:FicaEarnings>
      <osss:MedicareEarnings>50000</osss:MedicareEarnings>
    </osss:Earnings>
    <osss:Earnings startYear="2021" endYear="2021">
      <osss:FicaEarnings>52000</osss:FicaEarnings>
      <osss:MedicareEarnings>52000</osss:MedicareEarnings>
    </osss:Earnings>
  </osss:EarningsRecord>
</osss:OnlineSocialSecurityStatementData>"#;

/// Read one part of an XLSX package as text.
fn part(xlsx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {}", name));
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

fn has_part(xlsx: &[u8], name: &str) -> bool {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let found = archive.by_name(name).is_ok();
    found
}

fn row_count(sheet_xml: &str) -> usize {
    sheet_xml.matches("<row ").count()
}

fn timestamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 2, 15, 4, 0)
        .unwrap()
}

fn options() -> RenderOptions {
    RenderOptions::new().with_local_zone(LocalZone::from_hours(0).unwrap())
}

fn row(pairs: &[(&str, CellValue)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn earnings_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let amount = 40000 + i as i64 * 1000;
            row(&[
                ("Year", CellValue::text((2000 + i).to_string())),
                ("Fica Earnings", CellValue::Integer(amount)),
                ("Medicare Earnings", CellValue::text(amount.to_string())),
            ])
        })
        .collect()
}

fn earnings_sheet(name: &str, rows: Vec<Row>) -> SheetSpec {
    SheetSpec::new(name, ["Year", "Fica Earnings", "Medicare Earnings"]).with_rows(rows)
}

#[test]
fn statement_file_to_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Statement.xml");
    let output = dir.path().join("Statement.xlsx");
    std::fs::write(&input, STATEMENT).unwrap();

    let report = convert_file(&input, &output, &options()).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.sheets.len(), 1);
    assert_eq!(report.sheets[0].name, "Earnings History");
    assert_eq!(report.sheets[0].total_rows, 4);

    let xlsx = std::fs::read(&output).unwrap();

    let core = part(&xlsx, "docProps/core.xml");
    assert!(core.contains("<dc:title>Jane A Doe</dc:title>"));

    let workbook = part(&xlsx, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="Earnings History""#));
    assert!(workbook.contains(r#"name="Chart1""#));

    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert_eq!(row_count(&sheet), 4);
    assert!(sheet.contains("<v>50000</v>"));
    assert!(sheet.contains("<v>52000</v>"));

    assert!(has_part(&xlsx, "xl/chartsheets/sheet1.xml"));
    let chart = part(&xlsx, "xl/charts/chart1.xml");
    assert!(chart.contains("Jane A Doe Salary Trend"));
    assert!(chart.contains("Years"));
    assert!(chart.contains("Dollars"));
    assert!(chart.contains("<c:scatterChart>"));
    assert_eq!(chart.matches("<c:ser>").count(), 2);
    assert!(chart.contains("$B$2:$B$3"));
    assert!(chart.contains("$C$2:$C$3"));
    assert!(chart.contains("$A$2:$A$3"));
}

#[test]
fn header_and_footer_text() {
    let statement = parse_statement_from_str(STATEMENT);
    let request = statement_request(&statement).with_timestamp(timestamp());
    let (xlsx, _) = render_to_buffer(&request, &options()).unwrap();

    let strings = part(&xlsx, "xl/sharedStrings.xml");
    assert!(strings.contains("Fica Earnings"));
    assert!(strings.contains("Medicare Earnings"));
    assert!(strings.contains("Prepared 02 Jan 2024 03:04 PM +00:00"));
    // years stay text, exactly as extracted
    assert!(strings.contains("2020"));

    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"showGridLines="0""#));
    assert!(sheet.contains("CConfidential"));
    assert!(sheet.contains("<mergeCell ref=\"A4:C4\"/>"));

    let styles = part(&xlsx, "xl/styles.xml");
    assert!(styles.contains(r##"formatCode="#,###""##));
}

#[test]
fn row_count_is_records_plus_two() {
    for n in [1, 5, 40] {
        let request = WorkbookRequest::new("Rows", vec![earnings_sheet("Data", earnings_rows(n))])
            .with_timestamp(timestamp());
        let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();

        assert_eq!(report.sheets[0].total_rows as usize, n + 2);
        assert_eq!(row_count(&part(&xlsx, "xl/worksheets/sheet1.xml")), n + 2);
    }
}

#[test]
fn empty_sheet_still_gets_header_footer_and_chart() {
    let request = WorkbookRequest::new("Nobody", vec![earnings_sheet("Empty", Vec::new())])
        .with_timestamp(timestamp());
    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.sheets[0].total_rows, 2);
    assert_eq!(row_count(&part(&xlsx, "xl/worksheets/sheet1.xml")), 2);

    let chart = part(&xlsx, "xl/charts/chart1.xml");
    assert!(chart.contains("Nobody Salary Trend"));
    // a one-row range is written as a single cell reference
    assert!(chart.contains("Empty!$B$2</c:f>"));
    assert!(chart.contains("Empty!$A$2</c:f>"));
}

#[test]
fn partly_written_row_is_not_counted() {
    let mut rows = earnings_rows(3);
    rows.push(row(&[
        ("Year", CellValue::text("2003")),
        ("Fica Earnings", CellValue::text("n/a")),
        ("Medicare Earnings", CellValue::text("1")),
    ]));
    let request = WorkbookRequest::new("Partial", vec![earnings_sheet("Partial", rows)])
        .with_timestamp(timestamp());

    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();

    let outcome = &report.sheets[0];
    assert!(outcome.error.is_some());
    assert_eq!(outcome.data_rows, 3);
    assert_eq!(outcome.total_rows, 4);

    // header, three complete rows and the year cell of the failed row
    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert_eq!(row_count(&sheet), 5);

    let chart = part(&xlsx, "xl/charts/chart1.xml");
    assert!(chart.contains("Partial!$B$2:$B$4"));
}

#[test]
fn zoned_dates_are_written_in_local_zone() {
    let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
    let spec = SheetSpec::new("Dates", ["Year", "paid_date"]).with_rows(vec![row(&[
        ("Year", CellValue::text("2024")),
        (
            "paid_date",
            CellValue::DateTime(eastern.with_ymd_and_hms(2024, 2, 1, 13, 0, 0).unwrap()),
        ),
    ])]);
    let request = WorkbookRequest::new("Dates", vec![spec]).with_timestamp(timestamp());

    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();
    assert!(report.is_complete());

    // 2024-02-01 18:00 at +00:00 is serial 45323.75; the zone itself is dropped
    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<v>45323.75</v>"), "{}", sheet);
    assert!(!sheet.contains("<v>45323.54"));
}

#[test]
fn failing_sheet_does_not_stop_workbook() {
    let bad = earnings_sheet(
        "Broken",
        vec![row(&[
            ("Year", CellValue::text("2020")),
            ("Fica Earnings", CellValue::text("not a number")),
            ("Medicare Earnings", CellValue::text("1")),
        ])],
    );
    let good = earnings_sheet("Fine", earnings_rows(3));
    let request = WorkbookRequest::new("Mixed", vec![bad, good]).with_timestamp(timestamp());

    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();

    assert!(!report.is_complete());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "Broken");
    assert!(failures[0].error.as_deref().unwrap().contains("not an integer"));
    assert_eq!(report.sheets[1].total_rows, 5);

    // both worksheets and both chart sheets are present
    let workbook = part(&xlsx, "xl/workbook.xml");
    for name in ["Broken", "Chart1", "Fine", "Chart2"] {
        assert!(workbook.contains(&format!(r#"name="{}""#, name)), "{}", name);
    }
    assert!(has_part(&xlsx, "xl/charts/chart2.xml"));
}

#[test]
fn label_overrides_and_long_names() {
    let spec = SheetSpec::new(
        "Earnings History for Jane A Doe since 1990",
        ["year", "fica_earnings", "medicare_earnings"],
    )
    .with_label_override("year", "Tax Year")
    .with_rows(vec![row(&[
        ("year", CellValue::text("1990")),
        ("fica_earnings", CellValue::Integer(1200)),
        ("medicare_earnings", CellValue::Number(1200.75)),
    ])]);
    let request = WorkbookRequest::new("Overrides", vec![spec]).with_timestamp(timestamp());

    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.sheets[0].name, "Earnings History for Jane A Do");

    let workbook = part(&xlsx, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="Earnings History for Jane A Do""#));

    let strings = part(&xlsx, "xl/sharedStrings.xml");
    assert!(strings.contains("Tax Year"));
    // keys without an override keep their raw spelling once any override exists
    assert!(strings.contains("fica_earnings"));

    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<v>1200</v>"));
}

#[test]
fn single_value_column_plots_one_series() {
    let spec = SheetSpec::new("Solo", ["Year", "Total Earnings"]).with_rows(vec![row(&[
        ("Year", CellValue::text("2019")),
        ("Total Earnings", CellValue::Integer(10)),
    ])]);
    let request = WorkbookRequest::new("Solo", vec![spec]).with_timestamp(timestamp());

    let (xlsx, _) = render_to_buffer(&request, &options()).unwrap();
    let chart = part(&xlsx, "xl/charts/chart1.xml");
    assert_eq!(chart.matches("<c:ser>").count(), 1);
}

#[test]
fn duplicate_sheet_names_are_fatal() {
    let request = WorkbookRequest::new(
        "Dupes",
        vec![
            earnings_sheet("Earnings History, first half 2020", Vec::new()),
            earnings_sheet("Earnings History, first half 2021", Vec::new()),
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dupes.xlsx");
    let err = ssa_earnings::render::render_to_path(&request, &options(), &output).unwrap_err();

    assert!(matches!(err, Error::InvalidData(_)));
    assert!(!output.exists());
}

#[test]
fn json_request_renders() {
    let json = r#"{
        "title": "Inventory",
        "timestamp": "2024-01-02T15:04:00Z",
        "sheets": [{
            "sheet_name": "Stock",
            "column_order": ["item_name", "Unit Earnings", "Total Earnings", "restock_date"],
            "column_formats": {"item_name": {"bold": true, "border": true}},
            "data": [
                {"item_name": "Widget", "Unit Earnings": 3, "Total Earnings": "300", "restock_date": "2024-02-01T09:00:00"},
                {"item_name": "A gadget with a rather long descriptive name", "Unit Earnings": 4.9, "Total Earnings": 40, "restock_date": null}
            ]
        }]
    }"#;
    let request = WorkbookRequest::from_json(json).unwrap();

    let (xlsx, report) = render_to_buffer(&request, &options()).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.sheets[0].total_rows, 4);

    let strings = part(&xlsx, "xl/sharedStrings.xml");
    assert!(strings.contains("Item Name"));
    assert!(strings.contains("Restock Date"));

    let sheet = part(&xlsx, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<v>4</v>"));

    // the long item name (44 columns wide) widens its column to 49
    let widths = column_widths(&sheet);
    assert!(widths.iter().any(|w| (49.0..50.0).contains(w)), "{:?}", widths);
    assert!(widths.iter().all(|w| *w >= 20.0), "{:?}", widths);
}

/// `width` attributes of the `<col>` elements in a worksheet part.
fn column_widths(sheet_xml: &str) -> Vec<f64> {
    sheet_xml
        .split("<col ")
        .skip(1)
        .filter_map(|col| {
            let start = col.find("width=\"")? + "width=\"".len();
            let end = col[start..].find('"')? + start;
            col[start..end].parse().ok()
        })
        .collect()
}

#[test]
fn missing_structure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.xml");
    std::fs::write(&input, "<OnlineSocialSecurityStatementData/>").unwrap();

    let err = parse_statement(&input).unwrap_err();
    assert!(matches!(err, Error::MissingComponent(_)));

    let output = dir.path().join("bad.xlsx");
    assert!(convert_file(&input, &output, &options()).is_err());
    assert!(!output.exists());
}

fn parse_statement_from_str(xml: &str) -> ssa_earnings::Statement {
    ssa_earnings::statement::StatementParser::from_xml(xml)
        .parse()
        .unwrap()
}
