// CSV transfer format for bulk event management
//
// Column order and header text are fixed; exported files are consumed by
// external tooling and must round-trip through import.
//
// Import is best effort: rows with too few fields are skipped and fields that
// fail to parse degrade to zero values. Only a missing header is fatal.

use tracing::{debug, warn};

use crate::error::{CelebrationError, Result};
use crate::event::{Event, EventType, NotificationChannel};

/// Header row written on export and discarded on import
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Day",
    "Month",
    "Year",
    "Type",
    "IsImportant",
    "Channel",
    "Contact",
];

/// Minimum number of fields for a data row to be imported
pub const CSV_COLUMNS: usize = CSV_HEADER.len();

/// Serialize events to CSV, one row per event in the given order.
pub fn export_events(events: &[Event]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for event in events {
        writer.write_record([
            event.id.to_string().as_str(),
            event.name.as_str(),
            event.day.to_string().as_str(),
            event.month.to_string().as_str(),
            event.year.to_string().as_str(),
            event.event_type.as_str(),
            if event.is_important { "true" } else { "false" },
            event.preferred_channel.as_str(),
            event.contact_destination.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| CelebrationError::csv(e.to_string()))
}

/// Start reading a CSV import.
///
/// The header row is consumed here; failing to read it is an error. The
/// returned iterator yields one unsaved event (`id == 0`) per usable row.
pub fn import_rows(data: &[u8]) -> Result<ImportRows<'_>> {
    let mut records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data)
        .into_records();

    match records.next() {
        Some(Ok(_header)) => {}
        Some(Err(e)) => return Err(CelebrationError::csv(format!("invalid header row: {}", e))),
        None => return Err(CelebrationError::csv("missing header row")),
    }

    Ok(ImportRows {
        records,
        skipped: 0,
    })
}

/// Iterator over the data rows of a CSV import
pub struct ImportRows<'a> {
    records: csv::StringRecordsIntoIter<&'a [u8]>,
    skipped: usize,
}

impl ImportRows<'_> {
    /// Rows skipped so far (too few fields or undecodable)
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for ImportRows<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            match self.records.next()? {
                Ok(record) if record.len() < CSV_COLUMNS => {
                    debug!(fields = record.len(), "Skipping short CSV row");
                    self.skipped += 1;
                }
                Ok(record) => return Some(event_from_record(&record)),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable CSV row");
                    self.skipped += 1;
                }
            }
        }
    }
}

fn event_from_record(record: &csv::StringRecord) -> Event {
    Event::new(
        &record[1],
        parse_or_zero(&record[2]),
        parse_or_zero(&record[3]),
        EventType::from(&record[5]),
    )
    .with_year(parse_or_zero(&record[4]))
    .important(parse_bool(&record[6]))
    .with_channel(NotificationChannel::from(&record[7]), &record[8])
}

fn parse_or_zero<T: std::str::FromStr + Default>(field: &str) -> T {
    field.parse().unwrap_or_default()
}

/// Accepts 1/t/T/TRUE/true/True; everything else is false.
fn parse_bool(field: &str) -> bool {
    matches!(field, "1" | "t" | "T" | "TRUE" | "true" | "True")
}
