//! Importing transactions from a bank's CSV export.

use chrono::NaiveDate;
use std::io::Read;
use tracing::{info, instrument};

use budget_types::{
    AccountId, Amount, CounterPart, CounterpartId, CsvField, EntityKind, Iban, Identifier,
    MappingId, TaggedItem, Transaction, TransactionCsvMapping, TransactionId, TransactionRecord,
};

use crate::error::RepoError;
use crate::project::Project;

/// What an import added to the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: Vec<TransactionId>,
    /// Counterparts created because no existing one had the imported name
    pub created_counterparts: Vec<CounterpartId>,
}

/// One CSV row, checked but not yet applied.
struct ParsedRow {
    date: Option<NaiveDate>,
    amount: Amount,
    counterpart: Option<String>,
    account: Option<AccountId>,
    note: String,
}

impl Project {
    /// Imports every data row of a headed CSV using the column layout of `mapping`.
    ///
    /// All rows are checked before anything is inserted, so a bad row leaves the
    /// project untouched. Counterparts are matched by name and created when
    /// missing; accounts are matched by name or IBAN and must exist. Rows
    /// without an account column go to the first account, like new transactions.
    #[instrument(skip(self, reader), fields(project = %self.id()))]
    pub fn import_csv<R: Read>(
        &mut self,
        mapping: MappingId,
        reader: R,
    ) -> Result<ImportSummary, RepoError> {
        let mapping = self
            .csv_mappings()
            .get(mapping)
            .cloned()
            .ok_or(RepoError::KeyNotFound {
                kind: EntityKind::CsvMapping,
                identifier: mapping.index(),
            })?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            rows.push(self.parse_row(&mapping, &record?, index + 1)?);
        }

        let mut summary = ImportSummary::default();
        for row in rows {
            let counterpart = match row.counterpart {
                Some(name) => Some(self.counterpart_named(&name, &mut summary)?),
                None => None,
            };

            let id = self.transactions().get_new_identifier();
            let record = TransactionRecord {
                identifier: id,
                date: row
                    .date
                    .unwrap_or_else(|| chrono::Local::now().date_naive())
                    .format("%Y-%m-%d")
                    .to_string(),
                counterpart,
                amount: row.amount.to_string(),
                account: row.account.or_else(|| self.bank_accounts().keys().next()),
                category: None,
                note: row.note,
            };
            self.create::<Transaction>(Some(id), Some(record))?;
            summary.transactions.push(id);
        }

        info!(
            mapping = %mapping.name,
            transactions = summary.transactions.len(),
            counterparts = summary.created_counterparts.len(),
            "Imported CSV"
        );
        Ok(summary)
    }

    fn parse_row(
        &self,
        mapping: &TransactionCsvMapping,
        record: &csv::StringRecord,
        row: usize,
    ) -> Result<ParsedRow, RepoError> {
        let fail = |reason: String| RepoError::Import { row, reason };
        let cell = |field: CsvField| match mapping.column(field) {
            None => Ok(None),
            Some(column) => record
                .get(column)
                .map(Some)
                .ok_or_else(|| fail(format!("no column {column} for {field}"))),
        };
        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

        let date = cell(CsvField::Date)?
            .map(|value| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|e| fail(format!("invalid date '{value}': {e}")))
            })
            .transpose()?;

        let amount = match cell(CsvField::Amount)? {
            Some(value) => Amount::parse_input(value).map_err(|e| fail(e.to_string()))?,
            None => Amount::ZERO,
        };

        let account = match non_empty(cell(CsvField::Account)?) {
            Some(value) => Some(
                self.account_matching(&value)
                    .ok_or_else(|| fail(format!("unknown account '{value}'")))?,
            ),
            None => None,
        };

        Ok(ParsedRow {
            date,
            amount,
            counterpart: non_empty(cell(CsvField::Counterpart)?),
            account,
            note: cell(CsvField::Note)?.unwrap_or_default().to_string(),
        })
    }

    /// Account whose name or IBAN equals `value`.
    fn account_matching(&self, value: &str) -> Option<AccountId> {
        let iban = Iban::parse(value).ok();
        self.bank_accounts()
            .values()
            .find(|account| {
                account.name == value || (iban.is_some() && account.iban == iban)
            })
            .map(|account| account.id())
    }

    fn counterpart_named(
        &mut self,
        name: &str,
        summary: &mut ImportSummary,
    ) -> Result<CounterpartId, RepoError> {
        if let Some(existing) = self.counterparts().values().find(|c| c.name == name) {
            return Ok(existing.id());
        }
        let created = self.create::<CounterPart>(None, None)?;
        created.name = name.to_string();
        let id = created.id();
        summary.created_counterparts.push(id);
        Ok(id)
    }
}
