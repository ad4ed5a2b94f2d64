//! Grouped reductions over sales records.
//!
//! An [`AggregateTable`] is the data source of one chart: records grouped by
//! one or two key fields, with a mean or sum of a numeric field per group.

use super::record::{Field, SalesRecord};
use schemars::JsonSchema;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Value of a grouping key.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Int(_) => 0,
            KeyValue::Float(_) => 1,
            KeyValue::Text(_) => 2,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Float(a), KeyValue::Float(b)) => a.total_cmp(b),
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Text(s.to_string())
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{v}"),
            KeyValue::Float(v) => write!(f, "{v}"),
            KeyValue::Text(s) => f.write_str(s),
        }
    }
}

/// How a group's values collapse into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Mean,
    Sum,
}

impl Reduction {
    /// Missing and non-finite values are skipped before reducing. The mean
    /// of nothing is undefined, the sum of nothing is zero.
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        match self {
            Reduction::Mean if finite.is_empty() => None,
            Reduction::Mean => Some(finite.iter().sum::<f64>() / finite.len() as f64),
            Reduction::Sum => Some(finite.iter().sum()),
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Mean => f.write_str("mean"),
            Reduction::Sum => f.write_str("sum"),
        }
    }
}

/// Row order for tables grouped by month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthOrder {
    /// Plain label order, so "Apr" comes before "Jan".
    #[default]
    Lexical,
    /// Jan..Dec, with labels that aren't month names after December.
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AggregateRow {
    /// One entry per key field; `null` is the group of missing values
    pub key: Vec<Option<KeyValue>>,
    /// Reduced value, `null` when the group had no values to average
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AggregateTable {
    pub keys: Vec<Field>,
    pub value: Field,
    pub reduction: Reduction,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Group `records` by `keys` and reduce `value` in each group.
    ///
    /// Rows come out in ascending key order.
    pub fn from_records<'a, I>(records: I, keys: &[Field], value: Field, reduction: Reduction) -> Self
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let mut groups: BTreeMap<Vec<Option<KeyValue>>, Vec<f64>> = BTreeMap::new();
        for record in records {
            let key = keys.iter().map(|field| record.key(*field)).collect();
            let values = groups.entry(key).or_default();
            if let Some(v) = record.number(value) {
                values.push(v);
            }
        }

        let rows = groups
            .into_iter()
            .map(|(key, values)| AggregateRow {
                key,
                value: reduction.apply(&values),
            })
            .collect();

        AggregateTable {
            keys: keys.to_vec(),
            value,
            reduction,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reduced value of the group with exactly this key.
    #[cfg(test)]
    pub fn get(&self, key: &[Option<KeyValue>]) -> Option<Option<f64>> {
        self.rows
            .iter()
            .find(|row| row.key.as_slice() == key)
            .map(|row| row.value)
    }

    /// Reorder rows by their `Month` key. No-op for tables without one.
    pub fn order_months(&mut self, order: MonthOrder) {
        let Some(idx) = self.keys.iter().position(|f| *f == Field::Month) else {
            return;
        };
        if order == MonthOrder::Calendar {
            // stable, so unknown labels keep their lexical order
            self.rows
                .sort_by_key(|row| calendar_rank(row.key.get(idx).and_then(Option::as_ref)));
        }
    }
}

fn calendar_rank(key: Option<&KeyValue>) -> u32 {
    match key {
        None => 0,
        Some(KeyValue::Text(label)) => label
            .trim()
            .parse::<chrono::Month>()
            .map_or(13, |m| m.number_from_month()),
        Some(_) => 13,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::record;

    fn text(s: &str) -> Option<KeyValue> {
        Some(KeyValue::from(s))
    }

    #[test]
    fn mean_skips_missing_values() {
        assert_eq!(Reduction::Mean.apply(&[10.0, 20.0]), Some(15.0));
        assert_eq!(Reduction::Mean.apply(&[]), None);
        assert_eq!(Reduction::Sum.apply(&[]), Some(0.0));
        assert_eq!(Reduction::Sum.apply(&[1.5, 2.5]), Some(4.0));
    }

    #[test]
    fn non_finite_values_are_skipped() {
        assert_eq!(Reduction::Mean.apply(&[10.0, f64::NAN]), Some(10.0));
        assert_eq!(Reduction::Mean.apply(&[f64::NAN]), None);
        assert_eq!(Reduction::Sum.apply(&[f64::INFINITY, 2.0]), Some(2.0));

        let mut poisoned = record(1980, "Jan", true, "Car", 10.0, 1.0, 5.0);
        poisoned.automobile_sales = Some(f64::NAN);
        let records = vec![record(1980, "Feb", true, "Car", 30.0, 1.0, 5.0), poisoned];
        let table = AggregateTable::from_records(
            &records,
            &[Field::VehicleType],
            Field::AutomobileSales,
            Reduction::Mean,
        );
        assert_eq!(table.get(&[text("Car")]), Some(Some(30.0)));
    }

    #[test]
    fn float_keys_order_numerically() {
        let mut keys = vec![
            KeyValue::Float(10.5),
            KeyValue::Float(2.0),
            KeyValue::Float(-1.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                KeyValue::Float(-1.0),
                KeyValue::Float(2.0),
                KeyValue::Float(10.5)
            ]
        );
    }

    #[test]
    fn groups_sorted_by_key() {
        let records = vec![
            record(1990, "Jan", false, "Truck", 5.0, 1.0, 3.0),
            record(1990, "Jan", false, "Car", 10.0, 2.0, 3.0),
            record(1990, "Jan", false, "Car", 20.0, 4.0, 3.0),
        ];
        let table = AggregateTable::from_records(
            &records,
            &[Field::VehicleType],
            Field::AutomobileSales,
            Reduction::Mean,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].key, vec![text("Car")]);
        assert_eq!(table.get(&[text("Car")]), Some(Some(15.0)));
        assert_eq!(table.get(&[text("Truck")]), Some(Some(5.0)));
        assert_eq!(table.get(&[text("Bus")]), None);
    }

    #[test]
    fn missing_labels_form_their_own_group() {
        let mut unlabeled = record(1990, "Jan", false, "Car", 7.0, 1.0, 3.0);
        unlabeled.vehicle_type = None;
        let records = vec![record(1990, "Jan", false, "Car", 3.0, 1.0, 3.0), unlabeled];

        let table = AggregateTable::from_records(
            &records,
            &[Field::VehicleType],
            Field::AutomobileSales,
            Reduction::Sum,
        );
        assert_eq!(table.rows[0].key, vec![None]);
        assert_eq!(table.get(&[None]), Some(Some(7.0)));
        assert_eq!(table.get(&[text("Car")]), Some(Some(3.0)));
    }

    #[test]
    fn group_without_values_has_no_mean() {
        let mut r = record(1990, "Jan", false, "Car", 0.0, 1.0, 3.0);
        r.automobile_sales = None;
        let table = AggregateTable::from_records(
            [&r],
            &[Field::VehicleType],
            Field::AutomobileSales,
            Reduction::Mean,
        );
        assert_eq!(table.get(&[text("Car")]), Some(None));
    }

    #[test]
    fn two_key_grouping() {
        let records = vec![
            record(1990, "Jan", true, "Car", 10.0, 1.0, 5.5),
            record(1990, "Feb", true, "Truck", 4.0, 1.0, 5.5),
            record(1990, "Mar", true, "Car", 30.0, 1.0, 5.5),
            record(1991, "Jan", true, "Car", 2.0, 1.0, 3.0),
        ];
        let table = AggregateTable::from_records(
            &records,
            &[Field::UnemploymentRate, Field::VehicleType],
            Field::AutomobileSales,
            Reduction::Mean,
        );
        let keys: Vec<_> = table.rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec![Some(KeyValue::Float(3.0)), text("Car")],
                vec![Some(KeyValue::Float(5.5)), text("Car")],
                vec![Some(KeyValue::Float(5.5)), text("Truck")],
            ]
        );
        assert_eq!(table.get(&[Some(KeyValue::Float(5.5)), text("Car")]), Some(Some(20.0)));
    }

    #[test]
    fn months_lexical_by_default() {
        let records = vec![
            record(1990, "Jan", false, "Car", 1.0, 1.0, 3.0),
            record(1990, "Feb", false, "Car", 2.0, 1.0, 3.0),
            record(1990, "Dec", false, "Car", 3.0, 1.0, 3.0),
            record(1990, "Apr", false, "Car", 4.0, 1.0, 3.0),
        ];
        let mut table =
            AggregateTable::from_records(&records, &[Field::Month], Field::AutomobileSales, Reduction::Sum);
        table.order_months(MonthOrder::Lexical);
        let months: Vec<_> = table.rows.iter().map(|r| r.key[0].clone()).collect();
        assert_eq!(months, vec![text("Apr"), text("Dec"), text("Feb"), text("Jan")]);

        table.order_months(MonthOrder::Calendar);
        let months: Vec<_> = table.rows.iter().map(|r| r.key[0].clone()).collect();
        assert_eq!(months, vec![text("Jan"), text("Feb"), text("Apr"), text("Dec")]);
    }

    #[test]
    fn calendar_order_puts_unknown_labels_last() {
        let records = vec![
            record(1990, "Q1", false, "Car", 1.0, 1.0, 3.0),
            record(1990, "March", false, "Car", 1.0, 1.0, 3.0),
            record(1990, "jan", false, "Car", 1.0, 1.0, 3.0),
        ];
        let mut table =
            AggregateTable::from_records(&records, &[Field::Month], Field::AutomobileSales, Reduction::Sum);
        table.order_months(MonthOrder::Calendar);
        let months: Vec<_> = table.rows.iter().map(|r| r.key[0].clone()).collect();
        assert_eq!(months, vec![text("jan"), text("March"), text("Q1")]);
    }
}
