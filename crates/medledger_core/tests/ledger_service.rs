use medledger_core::db::open_db_in_memory;
use medledger_core::{
    LedgerOperation, LedgerService, LedgerStore, MedicationRecord, MedicationRef, OutcomeKind,
    RegisterInput, RepoError, RepoResult, ScheduleAgendaInput, SqliteLedgerStore,
};

#[test]
fn register_persists_and_list_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap());

    let registered = service.execute("user-1", &register_op("aspirin", "8"));
    assert_eq!(registered.kind, OutcomeKind::Success);

    let listed = service.execute("user-1", &LedgerOperation::ListAll);
    assert_eq!(listed.kind, OutcomeKind::Success);
    assert_eq!(listed.message, "Your registered medications are: aspirin.");
}

#[test]
fn duplicate_register_does_not_change_stored_record() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap());

    service.execute("user-1", &register_op("aspirin", "8"));
    let duplicate = service.execute("user-1", &register_op("aspirin", "12"));

    assert_eq!(duplicate.kind, OutcomeKind::AlreadyRegistered);
    let stored = service.snapshot("user-1").unwrap();
    assert_eq!(stored.medications().len(), 1);
    assert_eq!(stored.medications()[0].time_interval_hours, "8");
}

#[test]
fn mark_taken_increments_persisted_counter() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap());
    service.execute("user-1", &register_op("aspirin", "8"));

    let taken = LedgerOperation::MarkTaken(MedicationRef::new("aspirin").unwrap());
    service.execute("user-1", &taken);
    service.execute("user-1", &taken);

    let stored = service.snapshot("user-1").unwrap();
    assert_eq!(stored.medications()[0].times_taken_today, 2);
    let listed = service.execute("user-1", &LedgerOperation::ListTaken);
    assert_eq!(listed.message, "Your medications taken today are: aspirin (2)");
}

#[test]
fn users_have_independent_ledgers() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap());
    service.execute("user-1", &register_op("aspirin", "8"));

    let other = service.execute("user-2", &LedgerOperation::ListAll);
    assert_eq!(other.kind, OutcomeKind::EmptyList);
}

#[test]
fn schedule_agenda_persists_entry() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap());
    let op = LedgerOperation::ScheduleAgenda(
        ScheduleAgendaInput::new("aspirin", "10", "monday").unwrap(),
    );

    assert_eq!(service.execute("user-1", &op).kind, OutcomeKind::Success);
    assert_eq!(
        service.execute("user-1", &op).kind,
        OutcomeKind::AlreadyScheduled
    );
    assert_eq!(service.snapshot("user-1").unwrap().agenda_entries().len(), 1);
}

#[test]
fn load_failure_becomes_storage_failure_outcome() {
    let service = LedgerService::new(BrokenStore);

    let outcome = service.execute("user-1", &LedgerOperation::ListAll);
    assert_eq!(outcome.kind, OutcomeKind::StorageFailure);
    assert!(outcome.record.is_none());
    assert!(!outcome.message.is_empty());
}

#[test]
fn save_failure_becomes_storage_failure_and_keeps_previous_record() {
    let conn = open_db_in_memory().unwrap();
    let healthy = SqliteLedgerStore::try_new(&conn).unwrap();
    LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap())
        .execute("user-1", &register_op("aspirin", "8"));

    let service = LedgerService::new(ReadOnlyStore {
        inner: SqliteLedgerStore::try_new(&conn).unwrap(),
    });
    let outcome = service.execute("user-1", &register_op("ibuprofen", "6"));

    assert_eq!(outcome.kind, OutcomeKind::StorageFailure);
    assert!(outcome.record.is_none());
    let stored = healthy.load("user-1").unwrap();
    assert_eq!(stored.medications().len(), 1);
    assert_eq!(stored.medications()[0].name, "aspirin");
}

#[test]
fn queries_do_not_write() {
    let service = LedgerService::new(ReadOnlyStoreOverDefault);

    let outcome = service.execute("user-1", &LedgerOperation::ListDetailed);
    assert_eq!(outcome.kind, OutcomeKind::EmptyList);
}

fn register_op(name: &str, interval: &str) -> LedgerOperation {
    LedgerOperation::Register(RegisterInput::new(name, interval).unwrap())
}

struct BrokenStore;

impl LedgerStore for BrokenStore {
    fn load(&self, _user_id: &str) -> RepoResult<MedicationRecord> {
        Err(RepoError::InvalidData("unreachable backend".to_string()))
    }

    fn save(&self, _user_id: &str, _record: &MedicationRecord) -> RepoResult<()> {
        Err(RepoError::InvalidData("unreachable backend".to_string()))
    }
}

struct ReadOnlyStore<'conn> {
    inner: SqliteLedgerStore<'conn>,
}

impl LedgerStore for ReadOnlyStore<'_> {
    fn load(&self, user_id: &str) -> RepoResult<MedicationRecord> {
        self.inner.load(user_id)
    }

    fn save(&self, _user_id: &str, _record: &MedicationRecord) -> RepoResult<()> {
        Err(RepoError::InvalidData("read-only store".to_string()))
    }
}

struct ReadOnlyStoreOverDefault;

impl LedgerStore for ReadOnlyStoreOverDefault {
    fn load(&self, _user_id: &str) -> RepoResult<MedicationRecord> {
        Ok(MedicationRecord::default())
    }

    fn save(&self, _user_id: &str, _record: &MedicationRecord) -> RepoResult<()> {
        panic!("query operations must not save");
    }
}
