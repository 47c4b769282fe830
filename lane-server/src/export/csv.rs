//! CSV serialization of output rows.

use super::rows::OutputRow;

/// Serialize rows to CSV bytes with the board's header line.
///
/// Quoting (commas, quotes, newlines in comments or commodities) is
/// handled by the writer per the CSV standard.
pub fn write_csv(rows: &[OutputRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(comment: &str) -> OutputRow {
        OutputRow {
            pickup_earliest: "09/14/2026".to_string(),
            pickup_latest: "09/15/2026".to_string(),
            length_ft: 53,
            weight_lbs: 44_000,
            full_partial: "F".to_string(),
            equipment: "V".to_string(),
            contact_method: "Email".to_string(),
            origin_city: "Chicago".to_string(),
            origin_state: "IL".to_string(),
            origin_zip: "60601".to_string(),
            dest_city: "Atlanta".to_string(),
            dest_state: "GA".to_string(),
            dest_zip: String::new(),
            comment: comment.to_string(),
            commodity: "Produce".to_string(),
            reference_id: "RR14213".to_string(),
        }
    }

    #[test]
    fn header_order_matches_board_schema() {
        let bytes = write_csv(&[row("")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();

        assert_eq!(
            header,
            "Pickup Earliest*,Pickup Latest,Length (ft)*,Weight (lbs)*,\
             Full/Partial*,Equipment*,Contact Method*,Origin City*,Origin State*,\
             Origin Postal Code,Destination City*,Destination State*,\
             Destination Postal Code,Comment,Commodity,Reference ID"
        );
    }

    #[test]
    fn values_with_commas_are_quoted() {
        let bytes = write_csv(&[row("team load, no pets")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"team load, no pets\""));
    }

    #[test]
    fn one_line_per_row_plus_header() {
        let rows = vec![row(""), row(""), row("")];
        let bytes = write_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn empty_input_yields_no_output() {
        // Header only appears once a record is serialized
        let bytes = write_csv(&[]).unwrap();
        assert!(bytes.is_empty());
    }
}
