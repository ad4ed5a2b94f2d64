use super::aggregate::AggregateTable;
use super::record::Field;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
            ChartKind::Pie => f.write_str("pie"),
        }
    }
}

/// Which table columns feed which visual channel.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encoding {
    Cartesian {
        x: Field,
        y: Field,
        /// Splits the marks into one series per value of this field
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Field>,
    },
    Pie {
        names: Field,
        values: Field,
    },
}

/// Rendering-independent description of one chart and its data.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub title: String,
    pub encoding: Encoding,
    /// Display names overriding raw column names
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<Field, String>,
    pub table: AggregateTable,
}

impl ChartDescriptor {
    pub fn line(title: impl Into<String>, x: Field, y: Field, table: AggregateTable) -> Self {
        Self::cartesian(ChartKind::Line, title.into(), x, y, table)
    }

    pub fn bar(title: impl Into<String>, x: Field, y: Field, table: AggregateTable) -> Self {
        Self::cartesian(ChartKind::Bar, title.into(), x, y, table)
    }

    pub fn pie(title: impl Into<String>, names: Field, values: Field, table: AggregateTable) -> Self {
        ChartDescriptor {
            kind: ChartKind::Pie,
            title: title.into(),
            encoding: Encoding::Pie { names, values },
            labels: BTreeMap::new(),
            table,
        }
    }

    fn cartesian(kind: ChartKind, title: String, x: Field, y: Field, table: AggregateTable) -> Self {
        ChartDescriptor {
            kind,
            title,
            encoding: Encoding::Cartesian { x, y, color: None },
            labels: BTreeMap::new(),
            table,
        }
    }

    /// Colour marks by `field`. Ignored for pie charts.
    pub fn colored_by(mut self, field: Field) -> Self {
        if let Encoding::Cartesian { color, .. } = &mut self.encoding {
            *color = Some(field);
        }
        self
    }

    pub fn with_label(mut self, field: Field, label: impl Into<String>) -> Self {
        self.labels.insert(field, label.into());
        self
    }

    /// Display name for `field`, falling back to the column name.
    pub fn label(&self, field: Field) -> &str {
        self.labels
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.column())
    }
}
