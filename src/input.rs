use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::AccessionRecord;
use crate::error::KiraError;

pub const ACCESSION_COLUMN: &str = "accession";
pub const ID_COLUMN: &str = "id";

pub fn load_records(path: &Path) -> Result<Vec<AccessionRecord>, KiraError> {
    let file = File::open(path).map_err(|_| KiraError::InputRead(path.to_path_buf()))?;
    let records = parse_records(file)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded accession records");
    Ok(records)
}

/// Header-driven parse. Rows with an empty accession or id are dropped.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<AccessionRecord>, KiraError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| KiraError::InputParse(err.to_string()))?
        .clone();
    let accession_idx = column_index(&headers, ACCESSION_COLUMN)?;
    let id_idx = column_index(&headers, ID_COLUMN)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(|err| KiraError::InputParse(err.to_string()))?;
        let accession = row.get(accession_idx).unwrap_or("");
        let identifier = row.get(id_idx).unwrap_or("");
        match AccessionRecord::new(accession, identifier) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "skipped rows with empty accession or id");
    }
    Ok(records)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, KiraError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| KiraError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn columns_in_any_order_with_extras() {
        let csv = "note,id,accession\nfoo,New York 1,MN908947.3\nbar,sample/A:1,NC_045512.2\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].output_filename(), "MN908947.3_New_York_1.fasta");
        assert_eq!(records[1].output_filename(), "NC_045512.2_sample-A-1.fasta");
    }

    #[test]
    fn blank_and_short_rows_are_skipped() {
        let csv = "accession,id\nA1,x\n,y\nA2,\n  ,  \nA3\n\nA4,z\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        let accessions: Vec<&str> = records.iter().map(|r| r.accession()).collect();
        assert_eq!(accessions, vec!["A1", "A4"]);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = parse_records("accession,name\nA1,x\n".as_bytes()).unwrap_err();
        assert_matches!(err, KiraError::MissingColumn(ref column) if column == "id");
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_records(&temp.path().join("absent.csv")).unwrap_err();
        assert_matches!(err, KiraError::InputRead(_));
    }
}
