//! Multi-sheet spreadsheet report generation.
//!
//! Serializes one analysis run into a single downloadable `.xlsx`
//! artifact with four sheets:
//!
//! | Sheet            | Content                        | Row index |
//! |------------------|--------------------------------|-----------|
//! | `전체이수자`     | canonical roster               | 1-based   |
//! | `1학년이수자`    | first-year subset              | 1-based   |
//! | `개설분반리스트` | section catalog                | none      |
//! | `통계분석`       | summary incl. totals row       | none      |
//!
//! The artifact is produced as an in-memory byte buffer; nothing is
//! written to disk unless the caller asks for it.

use crate::analysis::AnalysisResult;
use crate::error::ExportResult;
use crate::models::{EnrollmentRecord, ReportConfig, SummaryRow};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Sheet name: full canonical roster.
pub const SHEET_ROSTER: &str = "전체이수자";
/// Sheet name: first-year subset of the roster.
pub const SHEET_FRESHMEN: &str = "1학년이수자";
/// Sheet name: distinct offered sections.
pub const SHEET_SECTIONS: &str = "개설분반리스트";
/// Sheet name: per-subject summary with totals row.
pub const SHEET_SUMMARY: &str = "통계분석";

/// Summary sheet column headers (after-dedup wording kept from the
/// original report).
pub const SUMMARY_HEADERS: [&str; 3] = [
    "개설분반수",
    "전체수강생(중복자제거후)",
    "일학년수강생(중복자제거후)",
];

/// Default artifact file name.
pub const REPORT_FILE_NAME: &str = "enrollment_report.xlsx";

/// MIME type of the artifact.
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build the 4-sheet workbook and return it as bytes.
pub fn write_report(result: &AnalysisResult, config: &ReportConfig) -> ExportResult<Vec<u8>> {
    let mut workbook = build_workbook(result, config)?;
    Ok(workbook.save_to_buffer()?)
}

/// Build the workbook and save it to a file.
pub fn write_report_file(
    result: &AnalysisResult,
    config: &ReportConfig,
    path: &Path,
) -> ExportResult<()> {
    let mut workbook = build_workbook(result, config)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(result: &AnalysisResult, config: &ReportConfig) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();

    let roster_sheet = workbook.add_worksheet();
    roster_sheet.set_name(SHEET_ROSTER)?;
    write_roster_sheet(roster_sheet, &result.roster, config)?;

    let freshmen_sheet = workbook.add_worksheet();
    freshmen_sheet.set_name(SHEET_FRESHMEN)?;
    write_roster_sheet(freshmen_sheet, &result.freshmen, config)?;

    let sections_sheet = workbook.add_worksheet();
    sections_sheet.set_name(SHEET_SECTIONS)?;
    let cols = &config.columns;
    sections_sheet.write_string(0, 0, &cols.subject)?;
    sections_sheet.write_string(0, 1, &cols.semester)?;
    sections_sheet.write_string(0, 2, &cols.section)?;
    for (i, section) in result.sections.iter().enumerate() {
        let row = (i + 1) as u32;
        sections_sheet.write_string(row, 0, &section.subject)?;
        sections_sheet.write_string(row, 1, &section.semester)?;
        sections_sheet.write_string(row, 2, &section.section)?;
    }

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name(SHEET_SUMMARY)?;
    summary_sheet.write_string(0, 0, &cols.subject)?;
    for (i, header) in SUMMARY_HEADERS.iter().enumerate() {
        summary_sheet.write_string(0, (i + 1) as u16, *header)?;
    }
    for (i, row) in result.summary.rows.iter().enumerate() {
        write_summary_row(summary_sheet, (i + 1) as u32, row)?;
    }
    // Totals row last, sentinel label in the subject column
    write_summary_row(
        summary_sheet,
        (result.summary.rows.len() + 1) as u32,
        &result.summary.totals,
    )?;

    Ok(workbook)
}

/// Roster sheets carry a 1-based row index ahead of the data columns.
fn write_roster_sheet(
    sheet: &mut Worksheet,
    records: &[EnrollmentRecord],
    config: &ReportConfig,
) -> ExportResult<()> {
    let cols = &config.columns;
    sheet.write_string(0, 1, &cols.student_id)?;
    sheet.write_string(0, 2, &cols.grade)?;
    sheet.write_string(0, 3, &cols.subject)?;
    sheet.write_string(0, 4, &cols.section)?;
    sheet.write_string(0, 5, &cols.semester)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, (i + 1) as f64)?;
        sheet.write_string(row, 1, &record.student_id)?;
        sheet.write_number(row, 2, record.grade as f64)?;
        sheet.write_string(row, 3, &record.subject)?;
        sheet.write_string(row, 4, &record.section)?;
        sheet.write_string(row, 5, &record.semester)?;
    }
    Ok(())
}

fn write_summary_row(sheet: &mut Worksheet, row: u32, data: &SummaryRow) -> ExportResult<()> {
    sheet.write_string(row, 0, &data.subject)?;
    sheet.write_number(row, 1, data.sections as f64)?;
    sheet.write_number(row, 2, data.total as f64)?;
    sheet.write_number(row, 3, data.freshmen as f64)?;
    Ok(())
}
