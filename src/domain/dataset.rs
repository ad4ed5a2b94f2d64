use super::aggregate::{AggregateTable, Reduction};
use super::record::{Field, SalesRecord};

/// The full, read-only set of sales records.
///
/// Loaded once and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Dataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Every record.
    pub fn all(&self) -> Rows<'_> {
        Rows {
            rows: self.records.iter().collect(),
        }
    }

    /// Records matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Rows<'_>
    where
        P: Fn(&SalesRecord) -> bool,
    {
        Rows {
            rows: self.records.iter().filter(|r| predicate(*r)).collect(),
        }
    }

    /// First and last year present.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let first = self.records.iter().map(|r| r.year).min()?;
        let last = self.records.iter().map(|r| r.year).max()?;
        Some((first, last))
    }
}

impl FromIterator<SalesRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

/// A filtered view borrowing from a [`Dataset`].
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    rows: Vec<&'a SalesRecord>,
}

impl<'a> Rows<'a> {
    pub fn filter<P>(&self, predicate: P) -> Rows<'a>
    where
        P: Fn(&SalesRecord) -> bool,
    {
        Rows {
            rows: self.rows.iter().copied().filter(|r| predicate(*r)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn group_by(&self, keys: &[Field], value: Field, reduction: Reduction) -> AggregateTable {
        let table = AggregateTable::from_records(self.iter(), keys, value, reduction);
        log::debug!(
            "{} {} by {:?}: {} rows -> {} groups",
            reduction,
            value,
            keys,
            self.len(),
            table.len()
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::KeyValue;
    use crate::domain::record::record;

    fn dataset() -> Dataset {
        vec![
            record(1980, "Jan", true, "Car", 10.0, 100.0, 7.0),
            record(1980, "Feb", false, "Truck", 5.0, 50.0, 6.0),
            record(1981, "Jan", true, "Car", 20.0, 200.0, 7.5),
            record(1982, "Mar", false, "Car", 40.0, 400.0, 5.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn filter_then_refine() {
        let data = dataset();
        let recession = data.filter(|r| r.recession);
        assert_eq!(recession.len(), 2);
        assert!(recession.iter().all(|r| r.recession));

        let recession_1981 = recession.filter(|r| r.year == 1981);
        assert_eq!(recession_1981.len(), 1);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn group_by_over_view() {
        let data = dataset();
        let table = data
            .all()
            .group_by(&[Field::Year], Field::AutomobileSales, Reduction::Mean);
        assert_eq!(table.get(&[Some(KeyValue::Int(1980))]), Some(Some(7.5)));
        assert_eq!(table.get(&[Some(KeyValue::Int(1982))]), Some(Some(40.0)));
    }

    #[test]
    fn empty_view_gives_empty_table() {
        let data = dataset();
        let table = data
            .filter(|r| r.year == 1975)
            .group_by(&[Field::VehicleType], Field::AutomobileSales, Reduction::Mean);
        assert!(table.is_empty());
    }

    #[test]
    fn year_span_bounds() {
        let data = dataset();
        assert_eq!(data.year_span(), Some((1980, 1982)));
        assert_eq!(Dataset::default().year_span(), None);
    }
}
