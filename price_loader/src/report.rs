//! Per-symbol tallies and the end-of-run summary.

use std::fmt;

use indexmap::IndexMap;

use crate::upsert::UpsertOutcome;

/// Row counters for one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolTally {
    /// Rows written.
    pub inserted: usize,
    /// Rows already present under the same `(symbol, date)`.
    pub conflicted: usize,
    /// Rows dropped by validation.
    pub invalid: usize,
    /// Rows the store rejected.
    pub errored: usize,
}

impl SymbolTally {
    /// Rows not written without an error: conflicts plus invalid rows.
    pub fn skipped(&self) -> usize {
        self.conflicted + self.invalid
    }

    /// Counts one upsert outcome.
    pub fn record(&mut self, outcome: &UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Conflicted => self.conflicted += 1,
            UpsertOutcome::Failed(_) => self.errored += 1,
        }
    }
}

/// How a symbol ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolStatus {
    /// Rows were fetched and attempted.
    Processed,
    /// The provider returned no data.
    Empty,
    /// The symbol was abandoned; nothing was kept.
    Failed(String),
}

/// Outcome of one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolReport {
    /// The symbol as processed.
    pub symbol: String,
    /// Final classification.
    pub status: SymbolStatus,
    /// Row counters; all zero unless `status` is `Processed`.
    pub tally: SymbolTally,
}

impl SymbolReport {
    /// A processed symbol with its counters.
    pub fn processed(symbol: impl Into<String>, tally: SymbolTally) -> Self {
        Self {
            symbol: symbol.into(),
            status: SymbolStatus::Processed,
            tally,
        }
    }

    /// A symbol for which the provider had no data.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            status: SymbolStatus::Empty,
            tally: SymbolTally::default(),
        }
    }

    /// A symbol abandoned because of `reason`.
    pub fn failed(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            status: SymbolStatus::Failed(reason.into()),
            tally: SymbolTally::default(),
        }
    }
}

impl fmt::Display for SymbolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.tally;
        match &self.status {
            SymbolStatus::Processed => write!(
                f,
                "{}: inserted {}, skipped {} (conflict {}, invalid {}), errored {}",
                self.symbol,
                t.inserted,
                t.skipped(),
                t.conflicted,
                t.invalid,
                t.errored
            ),
            SymbolStatus::Empty => write!(f, "{}: no historical data found, skipped", self.symbol),
            SymbolStatus::Failed(reason) => write!(f, "{}: failed: {reason}", self.symbol),
        }
    }
}

/// Reports for every symbol of a run, in the order they were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    symbols: IndexMap<String, SymbolReport>,
}

impl RunReport {
    /// Adds (or replaces) the report for `report.symbol`.
    pub fn push(&mut self, report: SymbolReport) {
        self.symbols.insert(report.symbol.clone(), report);
    }

    /// The report for `symbol`, if it was processed.
    pub fn get(&self, symbol: &str) -> Option<&SymbolReport> {
        self.symbols.get(symbol)
    }

    /// All reports in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolReport> {
        self.symbols.values()
    }

    /// Number of symbols reported.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// `true` when no symbol was reported.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Counters summed over all symbols.
    pub fn totals(&self) -> SymbolTally {
        self.iter().fold(SymbolTally::default(), |mut acc, r| {
            acc.inserted += r.tally.inserted;
            acc.conflicted += r.tally.conflicted;
            acc.invalid += r.tally.invalid;
            acc.errored += r.tally.errored;
            acc
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in self.iter() {
            writeln!(f, "{report}")?;
        }
        let totals = self.totals();
        writeln!(
            f,
            "Total: inserted {}, skipped {}, errored {} across {} symbols",
            totals.inserted,
            totals.skipped(),
            totals.errored,
            self.len()
        )?;
        write!(f, "All symbols processed.")
    }
}
