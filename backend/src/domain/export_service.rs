//! # Daily Summary Export
//!
//! Builds the end-of-day OPD summary: totals for the clinic day and a log of
//! every patient registered, rendered as an A4 PDF with builtin Helvetica
//! fonts. The table continues on further pages when it does not fit.

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;
use tracing::info;

use crate::domain::access::{authorize_admin, CallerRole};
use crate::domain::clock::ClinicClock;
use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::models::appointment::{Appointment, AppointmentStatus};
use crate::domain::models::workload::DailySummary;
use crate::storage::AppointmentRepository;

pub const SUMMARY_FILE_NAME: &str = "OPD_Daily_Summary.pdf";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LEFT_MARGIN: f32 = 20.0;
const BOTTOM_MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 6.0;
/// Top of the table on the first page, below the title block
const FIRST_TABLE_TOP: f32 = 242.0;
const CONTINUATION_TABLE_TOP: f32 = 280.0;

/// Column offsets from the left margin, in mm
const COLUMNS: [(&str, f32); 5] = [
    ("Token", 0.0),
    ("Patient Name", 20.0),
    ("Age", 80.0),
    ("Doctor", 95.0),
    ("Status", 150.0),
];
const MAX_NAME_CHARS: usize = 30;

#[derive(Clone)]
pub struct ExportService {
    appointments: AppointmentRepository,
    clock: ClinicClock,
    report_title: String,
}

impl ExportService {
    pub fn new(appointments: AppointmentRepository, clock: ClinicClock, report_title: String) -> Self {
        Self {
            appointments,
            clock,
            report_title,
        }
    }

    /// Totals and the full patient log for today. Administrators only.
    pub async fn daily_summary(&self, role: CallerRole) -> QueueResult<DailySummary> {
        authorize_admin(role).require("Daily summary export is restricted to administrators")?;

        let day = self.clock.today();
        let rows = self.appointments.list_for_day(day).await?;
        Ok(summarize(day, rows))
    }

    /// Today's summary as PDF bytes
    pub async fn export_daily_summary(&self, role: CallerRole) -> QueueResult<Vec<u8>> {
        let summary = self.daily_summary(role).await?;
        let bytes = render_summary_pdf(&self.report_title, &summary)?;
        info!(
            "Exported daily summary for {}: {} patients, {} bytes",
            summary.day,
            summary.total_count,
            bytes.len()
        );
        Ok(bytes)
    }
}

pub fn summarize(day: NaiveDate, rows: Vec<Appointment>) -> DailySummary {
    DailySummary {
        day,
        total_count: rows.len(),
        emergency_count: rows.iter().filter(|a| a.is_emergency).count(),
        consulted_count: rows
            .iter()
            .filter(|a| a.status == AppointmentStatus::Consulted)
            .count(),
        rows,
    }
}

fn rows_fitting(table_top: f32) -> usize {
    // The header line takes the first row slot
    (((table_top - BOTTOM_MARGIN) / ROW_HEIGHT) as usize).saturating_sub(1).max(1)
}

/// Split the patient log into per-page chunks
pub fn paginate(rows: &[Appointment]) -> Vec<&[Appointment]> {
    let first = rows_fitting(FIRST_TABLE_TOP).min(rows.len());
    let mut pages = vec![&rows[..first]];
    let mut rest = &rows[first..];
    while !rest.is_empty() {
        let take = rows_fitting(CONTINUATION_TABLE_TOP).min(rest.len());
        pages.push(&rest[..take]);
        rest = &rest[take..];
    }
    pages
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_NAME_CHARS {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX_NAME_CHARS - 3).collect();
        cut.push_str("...");
        cut
    }
}

fn row_cells(appointment: &Appointment) -> [String; 5] {
    [
        format!("#{}", appointment.token_number),
        truncate(&appointment.patient_name),
        appointment.age.to_string(),
        truncate(&format!("Dr. {}", appointment.doctor_name)),
        appointment.status.to_string(),
    ]
}

fn draw_table(
    layer: &PdfLayerReference,
    rows: &[Appointment],
    top: f32,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let mut y = top;
    for (label, offset) in COLUMNS {
        layer.use_text(label, 10.0, Mm(LEFT_MARGIN + offset), Mm(y), bold);
    }
    for appointment in rows {
        y -= ROW_HEIGHT;
        for (cell, (_, offset)) in row_cells(appointment).iter().zip(COLUMNS) {
            layer.use_text(cell.as_str(), 9.0, Mm(LEFT_MARGIN + offset), Mm(y), font);
        }
    }
}

/// Render the summary as an A4 PDF
pub fn render_summary_pdf(title: &str, summary: &DailySummary) -> QueueResult<Vec<u8>> {
    let (doc, page1, layer1) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| QueueError::Export(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| QueueError::Export(format!("PDF font error: {e}")))?;

    let layer = doc.get_page(page1).get_layer(layer1);
    layer.use_text(title, 16.0, Mm(LEFT_MARGIN), Mm(280.0), &bold);
    layer.use_text(
        format!("Date: {}", summary.day.format("%d %B, %Y")),
        10.0,
        Mm(LEFT_MARGIN),
        Mm(272.0),
        &font,
    );
    layer.use_text(
        format!(
            "Total Patients: {}     Emergencies: {}     Consulted: {}",
            summary.total_count, summary.emergency_count, summary.consulted_count
        ),
        11.0,
        Mm(LEFT_MARGIN),
        Mm(262.0),
        &bold,
    );
    layer.use_text("Complete Patient Log (Today):", 12.0, Mm(LEFT_MARGIN), Mm(250.0), &bold);

    let pages = paginate(&summary.rows);
    let page_count = pages.len();
    for (index, rows) in pages.into_iter().enumerate() {
        let continuation;
        let (layer, top) = if index == 0 {
            (&layer, FIRST_TABLE_TOP)
        } else {
            let (page, page_layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            continuation = doc.get_page(page).get_layer(page_layer);
            (&continuation, CONTINUATION_TABLE_TOP)
        };
        draw_table(layer, rows, top, &font, &bold);
        if page_count > 1 {
            layer.use_text(
                format!("Page {} of {}", index + 1, page_count),
                8.0,
                Mm(LEFT_MARGIN),
                Mm(10.0),
                &font,
            );
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| QueueError::Export(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| QueueError::Export(format!("PDF buffer error: {e}")))
}
