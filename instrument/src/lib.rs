//! Collects `tracing` events into column tables, one table per event target.
//!
//! Each INFO (or more severe) event becomes a row; each field becomes a
//! typed column. Columns are created the first time a field shows up and
//! padded with defaults for rows that don't carry it, so every column in a
//! table has exactly `rows` entries.
//!
//! ```ignore
//! // In library code:
//! tracing::info!(target: "allocation", premium_booked, economy_booked);
//!
//! // In a test:
//! let (result, recorder) = instrument::capture(|| optimize(3, 3, &offers));
//! let table = &recorder.tables["allocation"];
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Level, Metadata, Subscriber};

// === COLUMNS & TABLES ===

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::U64(v) => v.len(),
            Column::I64(v) => v.len(),
            Column::F64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_u64(&self) -> Option<&[u64]> {
        match self {
            Column::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            Column::Str(v) => Some(v),
            _ => None,
        }
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        match self {
            Column::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            Column::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            Column::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }
}

/// Event rows for one tracing target.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: BTreeMap<String, Column>,
    pub rows: usize,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Convenience for the common case of unsigned counter fields.
    pub fn u64s(&self, name: &str) -> Option<&[u64]> {
        self.column(name).and_then(Column::as_u64)
    }

    fn align(&mut self) {
        let rows = self.rows;
        for column in self.columns.values_mut() {
            column.pad_to(rows);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: BTreeMap<String, Table>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&Table> {
        self.tables.get(target)
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

// === FIELD VISITOR ===

/// Appends one event's fields to the row currently being written.
struct RowWriter<'a> {
    table: &'a mut Table,
}

impl RowWriter<'_> {
    /// Push `value` into the named column, creating it (padded for earlier
    /// rows) on first sight. A field whose type changes between events keeps
    /// the first type and drops the mismatched value; the row is padded later.
    fn push<T>(
        &mut self,
        field: &Field,
        value: T,
        empty: impl FnOnce() -> Column,
        slot: impl FnOnce(&mut Column) -> Option<&mut Vec<T>>,
    ) {
        let rows = self.table.rows;
        let column = self
            .table
            .columns
            .entry(field.name().to_string())
            .or_insert_with(|| {
                let mut column = empty();
                column.pad_to(rows);
                column
            });
        if let Some(values) = slot(column) {
            values.push(value);
        }
    }
}

impl Visit for RowWriter<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value, || Column::U64(Vec::new()), |c| match c {
            Column::U64(v) => Some(v),
            _ => None,
        });
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value, || Column::I64(Vec::new()), |c| match c {
            Column::I64(v) => Some(v),
            _ => None,
        });
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value, || Column::F64(Vec::new()), |c| match c {
            Column::F64(v) => Some(v),
            _ => None,
        });
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value, || Column::Bool(Vec::new()), |c| match c {
            Column::Bool(v) => Some(v),
            _ => None,
        });
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string(), || Column::Str(Vec::new()), |c| match c {
            Column::Str(v) => Some(v),
            _ => None,
        });
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}

// === SUBSCRIBER ===

/// Records INFO-and-above events into the thread-local [`Recorder`].
/// Spans are accepted but not tracked.
pub struct RecordingSubscriber;

impl Subscriber for RecordingSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();

        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target).or_default();

            event.record(&mut RowWriter {
                table: &mut *table,
            });
            table.rows += 1;
            table.align();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install [`RecordingSubscriber`] as the global default. Later calls are no-ops.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(RecordingSubscriber);
}

/// Take everything recorded on this thread so far.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

/// Run `f` with a scoped [`RecordingSubscriber`] and return its output together
/// with the events it emitted. Safe to use from parallel tests.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Recorder) {
    clear();
    let out = tracing::subscriber::with_default(RecordingSubscriber, f);
    (out, drain())
}

// === POLARS ===

use polars::prelude::{Column as FrameColumn, DataFrame, NamedFrom, PolarsResult};

impl Column {
    fn to_frame_column(&self, name: &str) -> FrameColumn {
        match self {
            Column::U64(v) => FrameColumn::new(name.into(), v),
            Column::I64(v) => FrameColumn::new(name.into(), v),
            Column::F64(v) => FrameColumn::new(name.into(), v),
            Column::Bool(v) => FrameColumn::new(name.into(), v),
            Column::Str(v) => FrameColumn::new(name.into(), v),
        }
    }
}

impl Table {
    /// One frame column per recorded field, one row per event. Fails only if
    /// the columns disagree in length, which `align` prevents.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(
            self.columns
                .iter()
                .map(|(name, column)| column.to_frame_column(name))
                .collect(),
        )
    }
}
