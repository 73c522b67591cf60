use std::{collections::HashSet, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::error::BatchError;

/// Ordered column names taken from the first row of the input.
///
/// Cloning is cheap: every `Record` of a run shares the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderList(Arc<[String]>);

impl HeaderList {
    /// Builds a header list, rejecting empty rows and duplicated column names.
    ///
    /// A duplicated name is an error rather than letting the last column win,
    /// so every key of an emitted object maps to exactly one column.
    pub fn new(names: Vec<String>) -> Result<Self, BatchError> {
        if names.is_empty() {
            return Err(BatchError::MalformedInput(
                "header row is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(BatchError::MalformedInput(format!(
                    "duplicate column name {name:?} in header row"
                )));
            }
        }

        Ok(HeaderList(names.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|header| header == name)
    }
}

/// One data row, mapping every column name to its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: HeaderList,
    values: Vec<String>,
}

impl Record {
    /// Pairs a parsed row with the header list.
    ///
    /// Fails with [`BatchError::RowSkip`] when the row does not have exactly
    /// one cell per column.
    pub fn from_fields(headers: &HeaderList, values: Vec<String>) -> Result<Self, BatchError> {
        if values.len() != headers.len() {
            return Err(BatchError::RowSkip(format!(
                "line does not match headers format ({} fields, expected {}), skipping",
                values.len(),
                headers.len()
            )));
        }

        Ok(Record {
            headers: headers.clone(),
            values,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .position(name)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    /// Column/value pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{HeaderList, Record};
    use crate::error::BatchError;

    fn headers(names: &[&str]) -> HeaderList {
        HeaderList::new(names.iter().map(|name| name.to_string()).collect()).unwrap()
    }

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn record_maps_each_header_to_its_cell() {
        let headers = headers(&["COL1", "COL2", "COL3"]);
        let record = Record::from_fields(&headers, fields(&["1", "2", "3"])).unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("COL1"), Some("1"));
        assert_eq!(record.get("COL3"), Some("3"));
        assert_eq!(record.get("COL4"), None);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["COL1", "COL2", "COL3"]);
    }

    #[test]
    fn row_with_wrong_field_count_is_skipped() {
        let headers = headers(&["COL1", "COL2", "COL3"]);

        let short = Record::from_fields(&headers, fields(&["1", "2"]));
        assert!(matches!(short, Err(BatchError::RowSkip(_))));

        let long = Record::from_fields(&headers, fields(&["1", "2", "3", "4"]));
        assert!(matches!(long, Err(BatchError::RowSkip(_))));
    }

    #[test]
    fn header_list_rejects_empty_and_duplicates() {
        assert!(matches!(
            HeaderList::new(Vec::new()),
            Err(BatchError::MalformedInput(_))
        ));
        assert!(matches!(
            HeaderList::new(fields(&["id", "name", "id"])),
            Err(BatchError::MalformedInput(_))
        ));
    }

    #[test]
    fn serializes_keys_in_header_order() {
        let headers = headers(&["zeta", "alpha", "mid"]);
        let record = Record::from_fields(&headers, fields(&["z", "a", "m"])).unwrap();

        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(json, r#"{"zeta":"z","alpha":"a","mid":"m"}"#);
    }
}
