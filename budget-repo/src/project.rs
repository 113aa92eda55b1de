//! A project: one store per entity kind, backed by `<directory>/project.json`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use budget_types::{
    AccountId, Amount, BankAccount, CategoryId, CounterPart, CounterpartId, EntityLookup,
    Identifier, ProjectId, TaggedItem, Transaction, TransactionCategory, TransactionCsvMapping,
};

use crate::document::{PROJECT_FILE, ProjectDocument, Section, parse_section, section_of};
use crate::error::RepoError;
use crate::store::TaggedItems;

/// An open budget project.
///
/// Owns exactly one store per entity kind. Cross-store references are plain
/// identifiers; the project is what resolves them.
#[derive(Debug, Clone)]
pub struct Project {
    id: ProjectId,
    directory: PathBuf,
    transaction_categories: TaggedItems<TransactionCategory>,
    bank_accounts: TaggedItems<BankAccount>,
    counterparts: TaggedItems<CounterPart>,
    transactions: TaggedItems<Transaction>,
    csv_mappings: TaggedItems<TransactionCsvMapping>,
}

/// Lookup over the stores that are not being mutated.
///
/// A store being mutated is `None`, so lookups into it report nothing.
/// Only transactions consult a lookup, and their store is never one of these.
#[derive(Debug, Clone, Copy, Default)]
pub struct Siblings<'a> {
    accounts: Option<&'a TaggedItems<BankAccount>>,
    counterparts: Option<&'a TaggedItems<CounterPart>>,
    categories: Option<&'a TaggedItems<TransactionCategory>>,
}

impl EntityLookup for Siblings<'_> {
    fn contains_account(&self, id: AccountId) -> bool {
        self.accounts.is_some_and(|store| store.contains(id))
    }

    fn contains_counterpart(&self, id: CounterpartId) -> bool {
        self.counterparts.is_some_and(|store| store.contains(id))
    }

    fn contains_category(&self, id: CategoryId) -> bool {
        self.categories.is_some_and(|store| store.contains(id))
    }

    fn first_account(&self) -> Option<AccountId> {
        self.accounts.and_then(|store| store.keys().next())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-kind store access
// ─────────────────────────────────────────────────────────────────────────────

/// Entity kinds a project holds a store for.
pub trait ProjectItem: TaggedItem {
    fn store(project: &Project) -> &TaggedItems<Self>;

    /// This kind's store, plus a lookup over the other stores.
    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>);

    /// Number of transactions referencing `id`. Deletion is refused while non-zero.
    fn referencing_transactions(_project: &Project, _id: Self::Id) -> usize {
        0
    }
}

impl ProjectItem for TransactionCategory {
    fn store(project: &Project) -> &TaggedItems<Self> {
        &project.transaction_categories
    }

    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>) {
        let siblings = Siblings {
            accounts: Some(&project.bank_accounts),
            counterparts: Some(&project.counterparts),
            categories: None,
        };
        (&mut project.transaction_categories, siblings)
    }

    fn referencing_transactions(project: &Project, id: CategoryId) -> usize {
        project
            .transactions
            .values()
            .filter(|tx| tx.category() == Some(id))
            .count()
    }
}

impl ProjectItem for BankAccount {
    fn store(project: &Project) -> &TaggedItems<Self> {
        &project.bank_accounts
    }

    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>) {
        let siblings = Siblings {
            accounts: None,
            counterparts: Some(&project.counterparts),
            categories: Some(&project.transaction_categories),
        };
        (&mut project.bank_accounts, siblings)
    }

    fn referencing_transactions(project: &Project, id: AccountId) -> usize {
        project
            .transactions
            .values()
            .filter(|tx| tx.account() == Some(id))
            .count()
    }
}

impl ProjectItem for CounterPart {
    fn store(project: &Project) -> &TaggedItems<Self> {
        &project.counterparts
    }

    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>) {
        let siblings = Siblings {
            accounts: Some(&project.bank_accounts),
            counterparts: None,
            categories: Some(&project.transaction_categories),
        };
        (&mut project.counterparts, siblings)
    }

    fn referencing_transactions(project: &Project, id: CounterpartId) -> usize {
        project
            .transactions
            .values()
            .filter(|tx| tx.counterpart() == Some(id))
            .count()
    }
}

impl ProjectItem for Transaction {
    fn store(project: &Project) -> &TaggedItems<Self> {
        &project.transactions
    }

    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>) {
        let siblings = Siblings {
            accounts: Some(&project.bank_accounts),
            counterparts: Some(&project.counterparts),
            categories: Some(&project.transaction_categories),
        };
        (&mut project.transactions, siblings)
    }
}

impl ProjectItem for TransactionCsvMapping {
    fn store(project: &Project) -> &TaggedItems<Self> {
        &project.csv_mappings
    }

    fn split(project: &mut Project) -> (&mut TaggedItems<Self>, Siblings<'_>) {
        let siblings = Siblings {
            accounts: Some(&project.bank_accounts),
            counterparts: Some(&project.counterparts),
            categories: Some(&project.transaction_categories),
        };
        (&mut project.csv_mappings, siblings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project
// ─────────────────────────────────────────────────────────────────────────────

impl Project {
    /// Creates an empty project for `directory`. Nothing is read or written.
    pub fn new(id: ProjectId, directory: impl Into<PathBuf>) -> Self {
        Self {
            id,
            directory: directory.into(),
            transaction_categories: TaggedItems::new(),
            bank_accounts: TaggedItems::new(),
            counterparts: TaggedItems::new(),
            transactions: TaggedItems::new(),
            csv_mappings: TaggedItems::new(),
        }
    }

    /// Creates a project and loads it from its directory.
    pub fn open(id: ProjectId, directory: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let mut project = Self::new(id, directory);
        let directory = project.directory.clone();
        project.load(&directory)?;
        Ok(project)
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Last path segment of the project directory, for display.
    pub fn folder_name(&self) -> String {
        self.directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.directory.display().to_string())
    }

    /// Lookup over all reference targets of this project.
    pub fn siblings(&self) -> Siblings<'_> {
        Siblings {
            accounts: Some(&self.bank_accounts),
            counterparts: Some(&self.counterparts),
            categories: Some(&self.transaction_categories),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_categories.is_empty()
            && self.bank_accounts.is_empty()
            && self.counterparts.is_empty()
            && self.transactions.is_empty()
            && self.csv_mappings.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Store access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn bank_accounts(&self) -> &TaggedItems<BankAccount> {
        &self.bank_accounts
    }

    pub fn counterparts(&self) -> &TaggedItems<CounterPart> {
        &self.counterparts
    }

    pub fn transaction_categories(&self) -> &TaggedItems<TransactionCategory> {
        &self.transaction_categories
    }

    pub fn transactions(&self) -> &TaggedItems<Transaction> {
        &self.transactions
    }

    pub fn csv_mappings(&self) -> &TaggedItems<TransactionCsvMapping> {
        &self.csv_mappings
    }

    /// The store of any kind, e.g. `project.items::<BankAccount>()`.
    pub fn items<T: ProjectItem>(&self) -> &TaggedItems<T> {
        T::store(self)
    }

    pub fn get<T: ProjectItem>(&self, id: T::Id) -> Option<&T> {
        T::store(self).get(id)
    }

    /// Mutable access for plain field edits (names, notes, dates, amounts).
    pub fn get_mut<T: ProjectItem>(&mut self, id: T::Id) -> Option<&mut T> {
        let (store, _) = T::split(self);
        store.get_mut(id)
    }

    /// Runs `edit` on one entity with a lookup over the other stores,
    /// for edits that have to check references.
    pub fn update<T: ProjectItem, R>(
        &mut self,
        id: T::Id,
        edit: impl FnOnce(&mut T, &dyn EntityLookup) -> R,
    ) -> Result<R, RepoError> {
        let (store, siblings) = T::split(self);
        let item = store.get_mut(id).ok_or(RepoError::KeyNotFound {
            kind: T::KIND,
            identifier: id.index(),
        })?;
        Ok(edit(item, &siblings))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create / copy / delete
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates an entity with defaults, or from `fields` when given.
    ///
    /// # Panics
    /// If `id` is given and already taken.
    pub fn create<T: ProjectItem>(
        &mut self,
        id: Option<T::Id>,
        fields: Option<T::Record>,
    ) -> Result<&mut T, RepoError> {
        let (store, siblings) = T::split(self);
        let id = id.unwrap_or_else(|| store.get_new_identifier());
        store
            .create_new_item(Some(id), fields, &siblings)
            .map_err(|source| RepoError::Record {
                kind: T::KIND,
                identifier: id.index(),
                source,
            })
    }

    /// Duplicates an entity under a fresh identifier.
    pub fn copy<T: ProjectItem>(&mut self, id: T::Id) -> Result<&mut T, RepoError> {
        let (store, siblings) = T::split(self);
        store.copy_item(id, &siblings)
    }

    /// Removes an entity. Accounts, counterparts and categories still
    /// referenced by a transaction are kept and `ItemInUse` is returned.
    pub fn delete<T: ProjectItem>(&mut self, id: T::Id) -> Result<T, RepoError> {
        let transactions = T::referencing_transactions(self, id);
        if transactions > 0 {
            return Err(RepoError::ItemInUse {
                kind: T::KIND,
                identifier: id.index(),
                transactions,
            });
        }
        let (store, _) = T::split(self);
        store.pop(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reference resolution
    // ─────────────────────────────────────────────────────────────────────────

    pub fn account_of(&self, tx: &Transaction) -> Option<&BankAccount> {
        tx.account().and_then(|id| self.bank_accounts.get(id))
    }

    pub fn counterpart_of(&self, tx: &Transaction) -> Option<&CounterPart> {
        tx.counterpart().and_then(|id| self.counterparts.get(id))
    }

    pub fn category_of(&self, tx: &Transaction) -> Option<&TransactionCategory> {
        tx.category().and_then(|id| self.transaction_categories.get(id))
    }

    /// Sum of all transaction amounts booked on `account`, `None` on overflow.
    pub fn balance(&self, account: AccountId) -> Option<Amount> {
        self.transactions
            .values()
            .filter(|tx| tx.account() == Some(account))
            .try_fold(Amount::ZERO, |total, tx| total.checked_add(tx.amount))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialized form of the whole project; empty stores are left out.
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            transaction_categories: section_of(&self.transaction_categories),
            bank_accounts: section_of(&self.bank_accounts),
            counterparts: section_of(&self.counterparts),
            transactions: section_of(&self.transactions),
            transaction_csv_mappings: section_of(&self.csv_mappings),
        }
    }

    /// Replaces the project contents with `document`.
    ///
    /// Sections are loaded categories, accounts, counterparts, then
    /// transactions, then CSV mappings. On error the project is unchanged.
    pub fn apply_document(&mut self, document: ProjectDocument) -> Result<(), RepoError> {
        let mut staged = Project::new(self.id, self.directory.clone());
        staged.load_section::<TransactionCategory>(document.transaction_categories)?;
        staged.load_section::<BankAccount>(document.bank_accounts)?;
        staged.load_section::<CounterPart>(document.counterparts)?;
        staged.load_section::<Transaction>(document.transactions)?;
        staged.load_section::<TransactionCsvMapping>(document.transaction_csv_mappings)?;
        *self = staged;
        Ok(())
    }

    fn load_section<T: ProjectItem>(
        &mut self,
        section: Option<Section<T::Record>>,
    ) -> Result<(), RepoError> {
        let Some(section) = section else {
            return Ok(());
        };
        let records = parse_section::<T>(section)?;
        debug!(kind = %T::KIND, count = records.len(), "Loading section");
        let (store, siblings) = T::split(self);
        store.load(records, &siblings)
    }

    /// Loads `<directory>/project.json`, replacing the current contents.
    ///
    /// A missing file empties the project: a new project has no file yet.
    #[instrument(skip(self), fields(project = %self.id))]
    pub fn load(&mut self, directory: &Path) -> Result<(), RepoError> {
        let path = directory.join(PROJECT_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "No project file, starting empty");
            *self = Project::new(self.id, self.directory.clone());
            return Ok(());
        }

        let text = fs::read_to_string(&path).map_err(RepoError::io(&path))?;
        let document: ProjectDocument = serde_json::from_str(&text)?;
        self.apply_document(document)?;

        info!(
            accounts = self.bank_accounts.len(),
            counterparts = self.counterparts.len(),
            categories = self.transaction_categories.len(),
            transactions = self.transactions.len(),
            "Loaded project from {}",
            path.display()
        );
        Ok(())
    }

    /// Writes `<directory>/project.json`.
    ///
    /// The document goes to a temporary file in the same directory first and
    /// is then renamed over the old file, so a failed save leaves the
    /// previous file intact.
    #[instrument(skip(self), fields(project = %self.id))]
    pub fn save(&self, directory: &Path) -> Result<(), RepoError> {
        let path = directory.join(PROJECT_FILE);
        let body = self.to_document().to_pretty_json()?;

        let mut file = NamedTempFile::new_in(directory).map_err(RepoError::io(directory))?;
        file.write_all(&body).map_err(RepoError::io(file.path()))?;
        file.as_file().sync_all().map_err(RepoError::io(file.path()))?;
        file.persist(&path)
            .map_err(|err| RepoError::io(&path)(err.error))?;

        info!("Saved project to {}", path.display());
        Ok(())
    }
}

impl EntityLookup for Project {
    fn contains_account(&self, id: AccountId) -> bool {
        self.bank_accounts.contains(id)
    }

    fn contains_counterpart(&self, id: CounterpartId) -> bool {
        self.counterparts.contains(id)
    }

    fn contains_category(&self, id: CategoryId) -> bool {
        self.transaction_categories.contains(id)
    }

    fn first_account(&self) -> Option<AccountId> {
        self.bank_accounts.keys().next()
    }
}
