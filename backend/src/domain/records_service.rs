//! Services for the simple record kinds: complaints, payments, mess menu.
//!
//! Each operation is one role check followed by one store mutation; the
//! shared [`RecordStore`] capability keeps the adapters generic.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ApiResult;
use crate::domain::account::AccountId;
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, RecordStore, RecordStoreError,
};
use crate::domain::records::{
    Complaint, ComplaintCategory, ComplaintStatus, MealType, MenuDay, MessMenu, Payment,
    PaymentStatus, PaymentType,
};

fn map_record_store_error(error: RecordStoreError) -> Error {
    match error {
        RecordStoreError::Missing => Error::not_found("record not found"),
        RecordStoreError::Storage { message } => {
            Error::internal(format!("record store error: {message}"))
        }
    }
}

fn map_account_repo_error(error: AccountRepositoryError) -> Error {
    Error::internal(format!("account store error: {error}"))
}

fn require_text(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// New-complaint payload accepted from a student.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Category.
    pub category: ComplaintCategory,
}

/// Service implementing the complaint workflow.
#[derive(Clone)]
pub struct ComplaintService {
    store: Arc<dyn RecordStore<Complaint>>,
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl ComplaintService {
    /// Create the service over its storage capabilities.
    pub fn new(
        store: Arc<dyn RecordStore<Complaint>>,
        accounts: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            accounts,
            clock,
        }
    }

    /// File a complaint for the calling student's current room.
    pub async fn file(&self, identity: &Identity, payload: NewComplaint) -> ApiResult<Complaint> {
        identity.require_student()?;

        let title = require_text(&payload.title, "title")?;
        let description = require_text(&payload.description, "description")?;

        let account = self
            .accounts
            .find_by_id(&identity.subject_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::unauthenticated("account no longer exists"))?;
        let room_number = account.assigned_room.ok_or_else(|| {
            Error::precondition_failed("a room assignment is required before filing a complaint")
        })?;

        let complaint = Complaint {
            id: Uuid::new_v4(),
            student_id: account.id,
            student_name: account.display_name.as_ref().to_owned(),
            room_number,
            title,
            description,
            category: payload.category,
            status: ComplaintStatus::Pending,
            created_at: self.clock.utc(),
            resolved_at: None,
        };
        self.store
            .insert(&complaint)
            .await
            .map_err(map_record_store_error)?;
        Ok(complaint)
    }

    /// List complaints: every complaint for admins, own for students.
    pub async fn list(&self, identity: &Identity) -> ApiResult<Vec<Complaint>> {
        let mut complaints = self.store.list().await.map_err(map_record_store_error)?;
        if !identity.is_admin() {
            complaints.retain(|complaint| complaint.student_id == identity.subject_id);
        }
        Ok(complaints)
    }

    /// Move a complaint's status (admin only); `resolved` stamps the
    /// resolution time.
    pub async fn update_status(
        &self,
        identity: &Identity,
        complaint_id: &Uuid,
        status: ComplaintStatus,
    ) -> ApiResult<Complaint> {
        identity.require_admin()?;

        let mut complaint = self
            .store
            .get(complaint_id)
            .await
            .map_err(map_record_store_error)?
            .ok_or_else(|| Error::not_found("complaint not found"))?;
        complaint.status = status;
        if status == ComplaintStatus::Resolved {
            complaint.resolved_at = Some(self.clock.utc());
        }
        self.store
            .update(&complaint)
            .await
            .map_err(map_record_store_error)?;
        Ok(complaint)
    }
}

/// New-payment payload accepted from an admin.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Billed student.
    pub student_id: AccountId,
    /// Amount due.
    pub amount: f64,
    /// Billing month label.
    pub month: String,
    /// Billing year label.
    pub year: String,
    /// Fee category.
    pub payment_type: PaymentType,
    /// Due date.
    pub due_date: NaiveDate,
}

/// Service implementing fee-payment records.
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn RecordStore<Payment>>,
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create the service over its storage capabilities.
    pub fn new(
        store: Arc<dyn RecordStore<Payment>>,
        accounts: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            accounts,
            clock,
        }
    }

    /// Record a fee due from a student (admin only).
    pub async fn create(&self, identity: &Identity, payload: NewPayment) -> ApiResult<Payment> {
        identity.require_admin()?;

        if payload.amount <= 0.0 {
            return Err(Error::invalid_request("amount must be positive"));
        }
        let student = self
            .accounts
            .find_by_id(&payload.student_id)
            .await
            .map_err(map_account_repo_error)?
            .filter(crate::domain::account::Account::is_student)
            .ok_or_else(|| Error::not_found("student not found"))?;

        let payment = Payment {
            id: Uuid::new_v4(),
            student_id: student.id,
            student_name: student.display_name.as_ref().to_owned(),
            amount: payload.amount,
            month: require_text(&payload.month, "month")?,
            year: require_text(&payload.year, "year")?,
            payment_type: payload.payment_type,
            status: PaymentStatus::Pending,
            due_date: payload.due_date,
            paid_date: None,
            created_at: self.clock.utc(),
        };
        self.store
            .insert(&payment)
            .await
            .map_err(map_record_store_error)?;
        Ok(payment)
    }

    /// List payments: every record for admins, own for students.
    pub async fn list(&self, identity: &Identity) -> ApiResult<Vec<Payment>> {
        let mut payments = self.store.list().await.map_err(map_record_store_error)?;
        if !identity.is_admin() {
            payments.retain(|payment| payment.student_id == identity.subject_id);
        }
        Ok(payments)
    }

    /// Mark a payment as settled (admin only); stamps the paid date.
    pub async fn mark_paid(&self, identity: &Identity, payment_id: &Uuid) -> ApiResult<Payment> {
        identity.require_admin()?;

        let mut payment = self
            .store
            .get(payment_id)
            .await
            .map_err(map_record_store_error)?
            .ok_or_else(|| Error::not_found("payment not found"))?;
        payment.status = PaymentStatus::Paid;
        payment.paid_date = Some(self.clock.utc());
        self.store
            .update(&payment)
            .await
            .map_err(map_record_store_error)?;
        Ok(payment)
    }
}

/// Service implementing the published mess menu.
#[derive(Clone)]
pub struct MessMenuService {
    store: Arc<dyn RecordStore<MessMenu>>,
    clock: Arc<dyn Clock>,
}

impl MessMenuService {
    /// Create the service over its storage capability.
    pub fn new(store: Arc<dyn RecordStore<MessMenu>>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// List the published menu. Any authenticated caller may read it.
    pub async fn list(&self, _identity: &Identity) -> ApiResult<Vec<MessMenu>> {
        self.store.list().await.map_err(map_record_store_error)
    }

    /// Publish or replace the entry for `(day, meal_type)` (admin only).
    pub async fn upsert(
        &self,
        identity: &Identity,
        day: MenuDay,
        meal_type: MealType,
        items: Vec<String>,
    ) -> ApiResult<MessMenu> {
        identity.require_admin()?;

        let items: Vec<String> = items
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return Err(Error::invalid_request("menu items must not be empty"));
        }

        let existing = self
            .store
            .list()
            .await
            .map_err(map_record_store_error)?
            .into_iter()
            .find(|entry| entry.day == day && entry.meal_type == meal_type);

        let menu = match existing {
            Some(mut entry) => {
                entry.items = items;
                entry.updated_at = Some(self.clock.utc());
                self.store
                    .update(&entry)
                    .await
                    .map_err(map_record_store_error)?;
                entry
            }
            None => {
                let entry = MessMenu {
                    id: Uuid::new_v4(),
                    day,
                    meal_type,
                    items,
                    created_at: self.clock.utc(),
                    updated_at: None,
                };
                self.store
                    .insert(&entry)
                    .await
                    .map_err(map_record_store_error)?;
                entry
            }
        };
        Ok(menu)
    }

    /// Delete a menu entry by id (admin only).
    pub async fn delete(&self, identity: &Identity, menu_id: &Uuid) -> ApiResult<()> {
        identity.require_admin()?;
        let deleted = self
            .store
            .delete(menu_id)
            .await
            .map_err(map_record_store_error)?;
        if !deleted {
            return Err(Error::not_found("menu entry not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeZone, Utc};

    use super::*;
    use crate::domain::account::{Account, DisplayName, Email};
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockAccountRepository;
    use crate::domain::records::Record;
    use crate::domain::role::Role;
    use crate::domain::room::RoomNumber;

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn fixture_clock() -> Arc<dyn Clock> {
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        })
    }

    /// Map-backed store double, simpler than mocking the generic trait.
    struct MapStore<T> {
        records: Mutex<HashMap<Uuid, T>>,
    }

    impl<T> MapStore<T> {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(HashMap::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl<T: Record> RecordStore<T> for MapStore<T> {
        async fn insert(&self, record: &T) -> Result<(), RecordStoreError> {
            self.records
                .lock()
                .expect("store lock")
                .insert(record.record_id(), record.clone());
            Ok(())
        }

        async fn get(&self, id: &Uuid) -> Result<Option<T>, RecordStoreError> {
            Ok(self.records.lock().expect("store lock").get(id).cloned())
        }

        async fn update(&self, record: &T) -> Result<(), RecordStoreError> {
            let mut records = self.records.lock().expect("store lock");
            if !records.contains_key(&record.record_id()) {
                return Err(RecordStoreError::Missing);
            }
            records.insert(record.record_id(), record.clone());
            Ok(())
        }

        async fn delete(&self, id: &Uuid) -> Result<bool, RecordStoreError> {
            Ok(self.records.lock().expect("store lock").remove(id).is_some())
        }

        async fn list(&self) -> Result<Vec<T>, RecordStoreError> {
            Ok(self
                .records
                .lock()
                .expect("store lock")
                .values()
                .cloned()
                .collect())
        }
    }

    fn student(id: AccountId, room: Option<&str>) -> Account {
        Account {
            id,
            email: Email::new("student@example.com").expect("valid email"),
            credential_hash: "$argon2id$stored".to_owned(),
            display_name: DisplayName::new("Meena Iyer").expect("valid name"),
            role: Role::Student,
            assigned_room: room.map(|r| RoomNumber::new(r).expect("valid room number")),
            phone: None,
            created_at: fixture_timestamp(),
        }
    }

    fn accounts_with(account: Account) -> Arc<MockAccountRepository> {
        let mut accounts = MockAccountRepository::new();
        let expected = account.id;
        accounts.expect_find_by_id().returning(move |id| {
            if *id == expected {
                Ok(Some(account.clone()))
            } else {
                Ok(None)
            }
        });
        Arc::new(accounts)
    }

    fn complaint_payload() -> NewComplaint {
        NewComplaint {
            title: "Leaking tap".to_owned(),
            description: "The bathroom tap has been dripping all week.".to_owned(),
            category: ComplaintCategory::Plumbing,
        }
    }

    #[tokio::test]
    async fn complaint_snapshots_name_and_room() {
        let student_id = AccountId::random();
        let identity = Identity::new(student_id, Role::Student);
        let store = MapStore::empty();
        let svc = ComplaintService::new(
            store.clone(),
            accounts_with(student(student_id, Some("A101"))),
            fixture_clock(),
        );

        let complaint = svc
            .file(&identity, complaint_payload())
            .await
            .expect("complaint filed");
        assert_eq!(complaint.student_name, "Meena Iyer");
        assert_eq!(complaint.room_number.as_ref(), "A101");
        assert_eq!(complaint.status, ComplaintStatus::Pending);
        assert_eq!(store.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn complaint_requires_a_room() {
        let student_id = AccountId::random();
        let identity = Identity::new(student_id, Role::Student);
        let svc = ComplaintService::new(
            MapStore::empty(),
            accounts_with(student(student_id, None)),
            fixture_clock(),
        );

        let err = svc
            .file(&identity, complaint_payload())
            .await
            .expect_err("no room assignment");
        assert_eq!(err.code(), ErrorCode::PreconditionFailed);
    }

    #[tokio::test]
    async fn complaint_rejects_blank_title() {
        let student_id = AccountId::random();
        let identity = Identity::new(student_id, Role::Student);
        let svc = ComplaintService::new(
            MapStore::empty(),
            accounts_with(student(student_id, Some("A101"))),
            fixture_clock(),
        );

        let mut payload = complaint_payload();
        payload.title = "   ".to_owned();
        let err = svc.file(&identity, payload).await.expect_err("blank title");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn complaint_listing_is_role_scoped() {
        let student_id = AccountId::random();
        let store = MapStore::empty();
        let svc = ComplaintService::new(
            store.clone(),
            accounts_with(student(student_id, Some("A101"))),
            fixture_clock(),
        );
        svc.file(&Identity::new(student_id, Role::Student), complaint_payload())
            .await
            .expect("complaint filed");

        let mut foreign = svc
            .list(&Identity::new(student_id, Role::Student))
            .await
            .expect("own list")
            .remove(0);
        foreign.id = Uuid::new_v4();
        foreign.student_id = AccountId::random();
        store.insert(&foreign).await.expect("seed foreign complaint");

        let own = svc
            .list(&Identity::new(student_id, Role::Student))
            .await
            .expect("student list");
        assert_eq!(own.len(), 1);
        let all = svc
            .list(&Identity::new(AccountId::random(), Role::Admin))
            .await
            .expect("admin list");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn resolving_a_complaint_stamps_the_time() {
        let student_id = AccountId::random();
        let store = MapStore::empty();
        let svc = ComplaintService::new(
            store,
            accounts_with(student(student_id, Some("A101"))),
            fixture_clock(),
        );
        let complaint = svc
            .file(&Identity::new(student_id, Role::Student), complaint_payload())
            .await
            .expect("complaint filed");

        let admin = Identity::new(AccountId::random(), Role::Admin);
        let resolved = svc
            .update_status(&admin, &complaint.id, ComplaintStatus::Resolved)
            .await
            .expect("status updated");
        assert_eq!(resolved.resolved_at, Some(fixture_timestamp()));

        let err = svc
            .update_status(
                &Identity::new(student_id, Role::Student),
                &complaint.id,
                ComplaintStatus::Resolved,
            )
            .await
            .expect_err("students cannot update status");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    fn payment_payload(student_id: AccountId) -> NewPayment {
        NewPayment {
            student_id,
            amount: 4500.0,
            month: "July".to_owned(),
            year: "2026".to_owned(),
            payment_type: PaymentType::HostelFee,
            due_date: NaiveDate::from_ymd_opt(2026, 7, 10).expect("valid due date"),
        }
    }

    #[tokio::test]
    async fn payment_creation_is_admin_only_and_checks_the_student() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let student_id = AccountId::random();
        let svc = PaymentService::new(
            MapStore::empty(),
            accounts_with(student(student_id, None)),
            fixture_clock(),
        );

        let payment = svc
            .create(&admin, payment_payload(student_id))
            .await
            .expect("payment created");
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.student_name, "Meena Iyer");

        let err = svc
            .create(&admin, payment_payload(AccountId::random()))
            .await
            .expect_err("unknown student");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = svc
            .create(
                &Identity::new(student_id, Role::Student),
                payment_payload(student_id),
            )
            .await
            .expect_err("students cannot bill");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn payment_rejects_non_positive_amounts() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let student_id = AccountId::random();
        let svc = PaymentService::new(
            MapStore::empty(),
            accounts_with(student(student_id, None)),
            fixture_clock(),
        );

        let mut payload = payment_payload(student_id);
        payload.amount = 0.0;
        let err = svc
            .create(&admin, payload)
            .await
            .expect_err("zero amount");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn marking_paid_stamps_the_paid_date() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let student_id = AccountId::random();
        let svc = PaymentService::new(
            MapStore::empty(),
            accounts_with(student(student_id, None)),
            fixture_clock(),
        );
        let payment = svc
            .create(&admin, payment_payload(student_id))
            .await
            .expect("payment created");

        let paid = svc
            .mark_paid(&admin, &payment.id)
            .await
            .expect("marked paid");
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.paid_date, Some(fixture_timestamp()));
    }

    #[tokio::test]
    async fn menu_upsert_replaces_the_same_slot() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let svc = MessMenuService::new(MapStore::empty(), fixture_clock());

        let first = svc
            .upsert(
                &admin,
                MenuDay::Monday,
                MealType::Breakfast,
                vec!["Idli".to_owned(), "Sambar".to_owned()],
            )
            .await
            .expect("menu published");
        assert!(first.updated_at.is_none());

        let replaced = svc
            .upsert(
                &admin,
                MenuDay::Monday,
                MealType::Breakfast,
                vec!["Poha".to_owned()],
            )
            .await
            .expect("menu replaced");
        assert_eq!(replaced.id, first.id);
        assert_eq!(replaced.items, vec!["Poha".to_owned()]);
        assert!(replaced.updated_at.is_some());

        let listed = svc
            .list(&Identity::new(AccountId::random(), Role::Student))
            .await
            .expect("menu listed");
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn menu_upsert_rejects_empty_items() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let svc = MessMenuService::new(MapStore::empty(), fixture_clock());
        let err = svc
            .upsert(
                &admin,
                MenuDay::Friday,
                MealType::Dinner,
                vec!["   ".to_owned()],
            )
            .await
            .expect_err("blank items");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn menu_delete_requires_admin_and_an_existing_entry() {
        let admin = Identity::new(AccountId::random(), Role::Admin);
        let svc = MessMenuService::new(MapStore::empty(), fixture_clock());
        let entry = svc
            .upsert(
                &admin,
                MenuDay::Sunday,
                MealType::Lunch,
                vec!["Biryani".to_owned()],
            )
            .await
            .expect("menu published");

        let err = svc
            .delete(&Identity::new(AccountId::random(), Role::Student), &entry.id)
            .await
            .expect_err("students cannot delete");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        svc.delete(&admin, &entry.id).await.expect("entry deleted");
        let err = svc
            .delete(&admin, &entry.id)
            .await
            .expect_err("already deleted");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
