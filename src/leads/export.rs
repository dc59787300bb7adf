use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{LeadField, LeadRecord};

pub const CSV_FILENAME: &str = "leads_export.csv";
const HEADER_LINE: &str = "Timestamp,Name,Email,Phone,Level,Email Status\n";

/// Render leads as CSV in fetch order. Every data field is quoted.
pub fn leads_to_csv(leads: &[LeadRecord]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(HEADER_LINE.as_bytes().to_vec());

    for lead in leads {
        let text = |field| lead.resolve(field).unwrap_or_default();
        writer.write_record([
            text(LeadField::Timestamp),
            text(LeadField::Name),
            text(LeadField::Email),
            text(LeadField::Phone),
            text(LeadField::Level),
            lead.value_or_default(LeadField::EmailStatus),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
