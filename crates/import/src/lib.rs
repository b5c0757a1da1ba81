pub mod classifier;
pub mod statement;

pub use classifier::{Classifier, FallbackPolicy, Rule, RuleSet, RulesError};
pub use statement::{LineError, StatementEntry, StatementLayout, StatementReader};

pub mod import {
    use std::io::Read;

    use bolso_core::TransactionRecord;

    use crate::classifier::Classifier;
    use crate::statement::{StatementLayout, StatementReader};

    /// Parse one statement document and classify every entry that survives
    /// normalization. Lazy and single-pass: entries stream straight from
    /// the reader through the classifier. Malformed lines are logged and
    /// skipped inside the reader; the caller only ever sees good records.
    pub fn classify_statement<'a, R: Read + 'a>(
        data: R,
        layout: StatementLayout,
        classifier: &'a Classifier,
    ) -> impl Iterator<Item = TransactionRecord> + 'a {
        StatementReader::new(data, layout).map(move |entry| classifier.classify_entry(entry))
    }
}
