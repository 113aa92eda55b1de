//! On-disk tests for `Project` and `Projects`.

use std::fs;
use std::path::Path;

use budget_types::{
    AccountId, Amount, BankAccount, CategoryId, CounterPart, CounterpartId, CsvField, EntityKind,
    Iban, MappingId, ProjectId, RecordError, TaggedItem, Transaction, TransactionCategory,
    TransactionCsvMapping, TransactionId,
};
use serde_json::Value;
use tempfile::tempdir;

use crate::{PROJECT_FILE, Project, Projects, RepoError};

fn write_project(dir: &Path, json: &str) {
    fs::write(dir.join(PROJECT_FILE), json).unwrap();
}

fn read_project(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(PROJECT_FILE)).unwrap()).unwrap()
}

fn transaction_on_account(account: u32) -> String {
    format!(
        r#"{{
            "identifier": 0,
            "date": "2024-03-01",
            "counterpart": null,
            "amount": "-12.50",
            "account": {account},
            "category": null,
            "note": "Groceries"
        }}"#
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_resolves_references_to_earlier_sections() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        &format!(
            r#"{{
                "transactions": {{ "0": {} }},
                "bank_accounts": {{
                    "2": {{ "identifier": 2, "name": "Checking", "note": "", "iban": null }}
                }}
            }}"#,
            transaction_on_account(2)
        ),
    );

    let project = Project::open(ProjectId::new(0), dir.path()).unwrap();
    let tx = &project.transactions()[TransactionId::new(0)];
    assert_eq!(tx.account(), Some(AccountId::new(2)));
    assert_eq!(tx.amount, Amount::from_cents(-1250));
    assert_eq!(project.account_of(tx).unwrap().name, "Checking");
}

#[test]
fn test_load_fails_without_referenced_account() {
    let without_section = format!(r#"{{ "transactions": {{ "0": {} }} }}"#, transaction_on_account(2));
    let without_key = format!(
        r#"{{
            "bank_accounts": {{ "0": {{ "identifier": 0, "name": "Cash" }} }},
            "transactions": {{ "0": {} }}
        }}"#,
        transaction_on_account(2)
    );

    for json in [without_section, without_key] {
        let dir = tempdir().unwrap();
        write_project(dir.path(), &json);
        let result = Project::open(ProjectId::new(0), dir.path());
        assert!(
            matches!(
                result,
                Err(RepoError::Record {
                    kind: EntityKind::Transaction,
                    identifier: 0,
                    source: RecordError::MissingReference {
                        kind: EntityKind::Account,
                        identifier: 2,
                    },
                })
            ),
            "{result:?}"
        );
    }
}

#[test]
fn test_load_rejects_malformed_values() {
    let cases = [
        r#"{"transactions": {"0": {"identifier": 0, "date": "2024-03-01", "amount": "1.234",
            "counterpart": null, "account": null, "category": null}}}"#,
        r#"{"transactions": {"0": {"identifier": 0, "date": "01.03.2024", "amount": "1.00",
            "counterpart": null, "account": null, "category": null}}}"#,
    ];
    for json in cases {
        let dir = tempdir().unwrap();
        write_project(dir.path(), json);
        assert!(matches!(
            Project::open(ProjectId::new(0), dir.path()),
            Err(RepoError::Record {
                kind: EntityKind::Transaction,
                ..
            })
        ));
    }

    let dir = tempdir().unwrap();
    write_project(dir.path(), r#"{"bank_accounts": {"x": {"identifier": 0, "name": "A"}}}"#);
    assert!(matches!(
        Project::open(ProjectId::new(0), dir.path()),
        Err(RepoError::InvalidIdentifier { .. })
    ));

    let dir = tempdir().unwrap();
    write_project(dir.path(), "{ not json");
    assert!(matches!(
        Project::open(ProjectId::new(0), dir.path()),
        Err(RepoError::Json(_))
    ));
}

#[test]
fn test_missing_project_file_gives_empty_project() {
    let dir = tempdir().unwrap();
    let project = Project::open(ProjectId::new(0), dir.path()).unwrap();
    assert!(project.is_empty());
}

#[test]
fn test_failed_load_leaves_project_unchanged() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());
    project.create::<BankAccount>(None, None).unwrap().name = "Kept".into();

    write_project(
        dir.path(),
        &format!(r#"{{ "transactions": {{ "0": {} }} }}"#, transaction_on_account(9)),
    );
    assert!(project.load(dir.path()).is_err());

    assert_eq!(project.bank_accounts().len(), 1);
    assert_eq!(project.bank_accounts()[AccountId::new(0)].name, "Kept");
    assert!(project.transactions().is_empty());
}

#[test]
fn test_load_rejects_numeric_amount() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        r#"{"transactions": {"0": {"identifier": 0, "date": "2024-03-01", "amount": 12.5,
            "counterpart": null, "account": null, "category": null}}}"#,
    );
    assert!(matches!(
        Project::open(ProjectId::new(0), dir.path()),
        Err(RepoError::Json(_))
    ));
}

#[test]
fn test_load_rejects_record_identifier_other_than_key() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        r#"{"transaction_categories": {"4": {"identifier": 5, "name": "Rent"}}}"#,
    );
    let result = Project::open(ProjectId::new(0), dir.path());
    assert!(
        matches!(
            &result,
            Err(RepoError::InvalidIdentifier {
                kind: EntityKind::Category,
                key,
            }) if key == "4"
        ),
        "{result:?}"
    );
}

#[test]
fn test_load_without_file_empties_project() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());
    project.create::<BankAccount>(None, None).unwrap();
    project.create::<Transaction>(None, None).unwrap();

    project.load(dir.path()).unwrap();
    assert!(project.is_empty());
    assert_eq!(project.directory(), dir.path());
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_writes_only_non_empty_sections() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());
    project.create::<Transaction>(None, None).unwrap();
    project.create::<Transaction>(None, None).unwrap();
    project.save(dir.path()).unwrap();

    let json = read_project(dir.path());
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["transactions".to_string()]);
    assert_eq!(json["transactions"].as_object().unwrap().len(), 2);
    assert_eq!(json["transactions"]["1"]["account"], Value::Null);
}

#[test]
fn test_save_is_indented_and_deterministic() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());
    project.create::<TransactionCategory>(None, None).unwrap();
    project.create::<BankAccount>(None, None).unwrap();
    project.create::<CounterPart>(None, None).unwrap();
    project.create::<Transaction>(None, None).unwrap();
    project.create::<TransactionCsvMapping>(None, None).unwrap();

    project.save(dir.path()).unwrap();
    let first = fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    project.save(dir.path()).unwrap();
    let second = fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with("{\n    \"transaction_categories\": {\n        \"0\": {"));

    let positions: Vec<_> = [
        "transaction_categories",
        "bank_accounts",
        "counterparts",
        "\"transactions\"",
        "transaction_csv_mappings",
    ]
    .iter()
    .map(|key| first.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    let project = Project::new(ProjectId::new(0), dir.path());
    project.save(dir.path()).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![PROJECT_FILE.to_string()]);
    assert_eq!(read_project(dir.path()), serde_json::json!({}));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("gone");
    let project = Project::new(ProjectId::new(0), &gone);
    assert!(matches!(
        project.save(&gone),
        Err(RepoError::Io { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_new_transaction_roundtrip_keeps_default_account() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());
    let account = project.create::<BankAccount>(None, None).unwrap().id();
    assert_eq!(account, AccountId::new(0));
    let tx = project.create::<Transaction>(None, None).unwrap().id();
    assert_eq!(project.transactions()[tx].account(), Some(account));
    project.save(dir.path()).unwrap();

    let reloaded = Project::open(ProjectId::new(1), dir.path()).unwrap();
    let loaded_tx = &reloaded.transactions()[tx];
    assert_eq!(
        reloaded.account_of(loaded_tx),
        Some(&project.bank_accounts()[account])
    );
    assert_eq!(loaded_tx, &project.transactions()[tx]);
}

#[test]
fn test_full_project_roundtrip() {
    let dir = tempdir().unwrap();
    let mut project = Project::new(ProjectId::new(0), dir.path());

    let category = project.create::<TransactionCategory>(None, None).unwrap();
    category.name = "Food".into();
    let category = category.id();

    let account = project.create::<BankAccount>(None, None).unwrap();
    account.name = "Checking".into();
    account.iban = Some(Iban::parse("DE89 3704 0044 0532 0130 00").unwrap());
    let account = account.id();

    let counterpart = project.create::<CounterPart>(None, None).unwrap().id();

    let tx = project.create::<Transaction>(None, None).unwrap().id();
    project
        .update::<Transaction, _>(tx, |tx, lookup| -> Result<(), RecordError> {
            tx.amount = Amount::parse_input("-42.005").unwrap();
            tx.note = "Market".into();
            tx.set_category(Some(category), lookup)?;
            tx.set_counterpart(Some(counterpart), lookup)
        })
        .unwrap()
        .unwrap();

    let mapping = project.create::<TransactionCsvMapping>(None, None).unwrap();
    mapping.set_column(CsvField::Amount, Some(3));

    project.save(dir.path()).unwrap();
    let reloaded = Project::open(ProjectId::new(0), dir.path()).unwrap();

    assert_eq!(reloaded.to_document(), project.to_document());
    let loaded_tx = &reloaded.transactions()[tx];
    assert_eq!(loaded_tx.amount.to_string(), "-42.01");
    assert_eq!(reloaded.category_of(loaded_tx).unwrap().name, "Food");
    assert_eq!(reloaded.counterpart_of(loaded_tx).unwrap().id(), counterpart);
    assert_eq!(
        reloaded.bank_accounts()[account].iban.as_ref().unwrap().as_str(),
        "DE89370400440532013000"
    );
    assert_eq!(
        reloaded.csv_mappings()[MappingId::new(0)].column(CsvField::Amount),
        Some(3)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Editing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_copy_then_rename_leaves_original() {
    let mut project = Project::new(ProjectId::new(0), "unused");
    project.create::<CounterPart>(None, None).unwrap().name = "Landlord".into();

    let copy = project.copy::<CounterPart>(CounterpartId::new(0)).unwrap();
    assert_eq!(copy.id(), CounterpartId::new(1));
    copy.name = "Landlady".into();

    assert_eq!(project.counterparts()[CounterpartId::new(0)].name, "Landlord");
    assert_eq!(project.counterparts()[CounterpartId::new(1)].name, "Landlady");
}

#[test]
fn test_copied_transaction_keeps_references() {
    let mut project = Project::new(ProjectId::new(0), "unused");
    project.create::<BankAccount>(None, None).unwrap();
    project.create::<Transaction>(None, None).unwrap();

    let copy = project.copy::<Transaction>(TransactionId::new(0)).unwrap();
    copy.note = "copy".into();
    let copy = copy.id();

    assert_eq!(
        project.transactions()[copy].account(),
        Some(AccountId::new(0))
    );
    assert_eq!(project.transactions()[TransactionId::new(0)].note, "");
}

#[test]
fn test_setter_rejects_unknown_reference() {
    let mut project = Project::new(ProjectId::new(0), "unused");
    let tx = project.create::<Transaction>(None, None).unwrap().id();

    let result = project
        .update::<Transaction, _>(tx, |tx, lookup| tx.set_category(Some(CategoryId::new(4)), lookup))
        .unwrap();
    assert!(matches!(
        result,
        Err(RecordError::MissingReference {
            kind: EntityKind::Category,
            identifier: 4,
        })
    ));
    assert_eq!(project.transactions()[tx].category(), None);

    assert!(matches!(
        project.update::<Transaction, _>(TransactionId::new(8), |_, _| ()),
        Err(RepoError::KeyNotFound {
            kind: EntityKind::Transaction,
            identifier: 8,
        })
    ));
}

#[test]
fn test_delete_refuses_referenced_items() {
    let mut project = Project::new(ProjectId::new(0), "unused");
    let account = project.create::<BankAccount>(None, None).unwrap().id();
    let tx = project.create::<Transaction>(None, None).unwrap().id();

    assert!(matches!(
        project.delete::<BankAccount>(account),
        Err(RepoError::ItemInUse {
            kind: EntityKind::Account,
            transactions: 1,
            ..
        })
    ));
    assert!(project.bank_accounts().contains(account));

    project.delete::<Transaction>(tx).unwrap();
    let removed = project.delete::<BankAccount>(account).unwrap();
    assert_eq!(removed.id(), account);
    assert!(project.is_empty());

    assert!(matches!(
        project.delete::<BankAccount>(account),
        Err(RepoError::KeyNotFound { .. })
    ));
}

#[test]
fn test_balance_sums_account_transactions() {
    let mut project = Project::new(ProjectId::new(0), "unused");
    let checking = project.create::<BankAccount>(None, None).unwrap().id();
    let savings = project.create::<BankAccount>(None, None).unwrap().id();

    for cents in [10_000, -2_550] {
        project.create::<Transaction>(None, None).unwrap().amount = Amount::from_cents(cents);
    }
    let moved = project.create::<Transaction>(None, None).unwrap().id();
    project
        .update::<Transaction, _>(moved, |tx, lookup| {
            tx.amount = Amount::from_cents(500);
            tx.set_account(Some(savings), lookup)
        })
        .unwrap()
        .unwrap();

    assert_eq!(project.balance(checking), Some(Amount::from_cents(7_450)));
    assert_eq!(project.balance(savings), Some(Amount::from_cents(500)));
    assert_eq!(project.balance(AccountId::new(9)), Some(Amount::ZERO));
}

#[test]
fn test_folder_name() {
    let project = Project::new(ProjectId::new(0), "/home/me/budgets/household");
    assert_eq!(project.folder_name(), "household");
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV import
// ─────────────────────────────────────────────────────────────────────────────

fn import_project() -> (Project, MappingId) {
    let mut project = Project::new(ProjectId::new(0), "unused");
    project.create::<BankAccount>(None, None).unwrap().name = "Checking".into();
    let savings = project.create::<BankAccount>(None, None).unwrap();
    savings.name = "Savings".into();
    savings.iban = Some(Iban::parse("GB82WEST12345698765432").unwrap());
    project.create::<CounterPart>(None, None).unwrap().name = "Bakery".into();

    let mapping = project.create::<TransactionCsvMapping>(None, None).unwrap();
    mapping.set_column(CsvField::Date, Some(0));
    mapping.set_column(CsvField::Amount, Some(1));
    mapping.set_column(CsvField::Counterpart, Some(2));
    mapping.set_column(CsvField::Account, Some(3));
    mapping.set_column(CsvField::Note, Some(4));
    let mapping = mapping.id();
    (project, mapping)
}

#[test]
fn test_import_csv() {
    let (mut project, mapping) = import_project();
    let csv = "date,amount,payee,account,memo\n\
               2024-05-02,-3.205,Bakery,Checking,bread\n\
               2024-05-03,1200,Employer,GB82 WEST 1234 5698 7654 32,salary\n\
               2024-05-04,-9.99,,,\n";

    let summary = project.import_csv(mapping, csv.as_bytes()).unwrap();
    assert_eq!(summary.transactions, [0, 1, 2].map(TransactionId::new));
    assert_eq!(summary.created_counterparts, vec![CounterpartId::new(1)]);
    assert_eq!(project.counterparts()[CounterpartId::new(1)].name, "Employer");

    let bread = &project.transactions()[TransactionId::new(0)];
    assert_eq!(bread.amount.to_string(), "-3.21");
    assert_eq!(bread.date.to_string(), "2024-05-02");
    assert_eq!(bread.counterpart(), Some(CounterpartId::new(0)));
    assert_eq!(bread.account(), Some(AccountId::new(0)));
    assert_eq!(bread.note, "bread");

    let salary = &project.transactions()[TransactionId::new(1)];
    assert_eq!(salary.account(), Some(AccountId::new(1)));
    assert_eq!(salary.amount, Amount::from_cents(120_000));

    let bare = &project.transactions()[TransactionId::new(2)];
    assert_eq!(bare.counterpart(), None);
    assert_eq!(bare.account(), Some(AccountId::new(0)));
}

#[test]
fn test_import_csv_is_all_or_nothing() {
    let (mut project, mapping) = import_project();
    let before = project.to_document();
    let csv = "date,amount,payee,account,memo\n\
               2024-05-02,-3.20,NewShop,Checking,ok\n\
               2024-05-03,abc,Bakery,Checking,bad\n";

    let result = project.import_csv(mapping, csv.as_bytes());
    assert!(matches!(result, Err(RepoError::Import { row: 2, .. })), "{result:?}");
    assert_eq!(project.to_document(), before);

    let csv = "date,amount,payee,account,memo\n2024-05-02,1.00,Bakery,Brokerage,x\n";
    assert!(matches!(
        project.import_csv(mapping, csv.as_bytes()),
        Err(RepoError::Import { row: 1, .. })
    ));
    assert!(matches!(
        project.import_csv(MappingId::new(7), csv.as_bytes()),
        Err(RepoError::KeyNotFound {
            kind: EntityKind::CsvMapping,
            ..
        })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_registry_rejects_missing_directory() {
    let dir = tempdir().unwrap();
    let mut projects = Projects::new();
    let result = projects.create_new_project(dir.path().join("nope"), true);
    assert!(matches!(result, Err(RepoError::NotADirectory(_))));
    assert!(!projects.has_open_projects());
}

#[test]
fn test_registry_allocates_lowest_free_identifier() {
    let dirs: Vec<_> = (0..3).map(|_| tempdir().unwrap()).collect();
    let mut projects = Projects::new();
    for dir in &dirs {
        projects.create_new_project(dir.path(), false).unwrap();
    }
    assert_eq!(projects.n_projects(), 3);

    let closed = projects.pop(ProjectId::new(1)).unwrap();
    assert_eq!(closed.directory(), dirs[1].path());
    assert!(matches!(
        projects.pop(ProjectId::new(1)),
        Err(RepoError::ProjectNotFound(_))
    ));

    let reopened = projects.create_new_project(dirs[1].path(), false).unwrap();
    assert_eq!(reopened.id(), ProjectId::new(1));
    assert_eq!(
        projects.keys().collect::<Vec<_>>(),
        [0, 2, 1].map(ProjectId::new)
    );
}

#[test]
fn test_registry_failed_load_registers_nothing() {
    let good = tempdir().unwrap();
    let bad = tempdir().unwrap();
    write_project(bad.path(), r#"{"transactions": {"0": {"identifier": 0}}}"#);

    let mut projects = Projects::new();
    projects.create_new_project(good.path(), true).unwrap();
    assert!(projects.create_new_project(bad.path(), true).is_err());

    assert_eq!(projects.n_projects(), 1);
    assert!(projects.get(ProjectId::new(1)).is_none());
}

#[test]
fn test_registry_projects_are_independent() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let mut projects = Projects::new();
    let a = projects.create_new_project(first.path(), true).unwrap().id();
    let b = projects.create_new_project(second.path(), true).unwrap().id();

    projects
        .get_mut(a)
        .unwrap()
        .create::<BankAccount>(None, None)
        .unwrap();

    assert_eq!(projects.get(a).unwrap().bank_accounts().len(), 1);
    assert!(projects.get(b).unwrap().is_empty());
}
