//! Position/permission resolution: "what can this user do right now".

use crate::core::permissions::{Module, ModuleSet, permissions_for};
use crate::core::store::PositionStore;
use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use crate::models::lodge_position::{LodgePosition, PositionHistoryEntry};
use crate::models::position_type::PositionType;
use crate::utils::cache::TtlCache;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const ACTIVE_POSITIONS: &str = "active_positions";

/// Identities that bypass position data entirely.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    master_admin_emails: Vec<String>,
}

impl AccessPolicy {
    pub fn new<I, T>(master_admin_emails: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            master_admin_emails: master_admin_emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_master_admin(&self, identity: &Identity) -> bool {
        identity.email.as_ref().is_some_and(|email| {
            let email = email.trim().to_lowercase();
            self.master_admin_emails.contains(&email)
        })
    }

    /// Admin role or master admin.
    pub fn is_privileged(&self, identity: &Identity) -> bool {
        identity.is_admin() || self.is_master_admin(identity)
    }
}

/// Resolves offices and module permissions from the active position set.
///
/// The active set is a cached snapshot of the store. It is replaced only after
/// a write has been confirmed, so a failed write leaves it untouched.
pub struct PositionResolver<S> {
    store: S,
    policy: AccessPolicy,
    cache: TtlCache<&'static str, Vec<LodgePosition>>,
}

impl<S: PositionStore> PositionResolver<S> {
    pub fn new(store: S, policy: AccessPolicy, ttl: Duration) -> Self {
        Self {
            store,
            policy,
            cache: TtlCache::new(ttl),
        }
    }

    /// Build a resolver and fetch the active positions once.
    pub fn load(store: S, policy: AccessPolicy, ttl: Duration) -> AppResult<Self> {
        let mut resolver = Self::new(store, policy, ttl);
        resolver.refresh()?;
        Ok(resolver)
    }

    pub fn refresh(&mut self) -> AppResult<()> {
        let active = self.store.load_active_positions()?;
        debug!(count = active.len(), "loaded active lodge positions");
        self.cache.insert(ACTIVE_POSITIONS, active);
        Ok(())
    }

    /// Refetch only when the cached snapshot is older than the TTL.
    /// Returns whether a fetch happened.
    pub fn refresh_if_stale(&mut self) -> AppResult<bool> {
        if self.cache.is_fresh(&ACTIVE_POSITIONS) {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn active_positions(&self) -> &[LodgePosition] {
        self.cache
            .peek(&ACTIVE_POSITIONS)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Office held by `user_id` on `as_of`.
    pub fn current_position(&self, user_id: Uuid, as_of: NaiveDate) -> Option<PositionType> {
        self.current_record(user_id, as_of).map(|p| p.position_type)
    }

    /// Tenure record behind [`current_position`](Self::current_position).
    ///
    /// Several matches mean inconsistent data: the highest office in the
    /// hierarchy wins, then the latest start date, then the smallest id.
    pub fn current_record(&self, user_id: Uuid, as_of: NaiveDate) -> Option<&LodgePosition> {
        let mut matches: Vec<&LodgePosition> = self
            .active_positions()
            .iter()
            .filter(|p| p.is_held_by(user_id) && p.covers(as_of))
            .collect();

        matches.sort_by_key(|p| (p.position_type, Reverse(p.start_date), p.id));

        if matches.len() > 1 {
            warn!(
                %user_id,
                %as_of,
                candidates = ?matches.iter().map(|p| p.position_type.code()).collect::<Vec<_>>(),
                chosen = matches[0].position_type.code(),
                "user holds more than one position on the same date"
            );
        }

        matches.first().copied()
    }

    pub fn permissions(&self, user_id: Uuid, as_of: NaiveDate) -> ModuleSet {
        match self.current_position(user_id, as_of) {
            Some(position) => permissions_for(position),
            None => ModuleSet::empty(),
        }
    }

    pub fn has_permission(&self, user_id: Uuid, module: Module, as_of: NaiveDate) -> bool {
        self.permissions(user_id, as_of).contains(module)
    }

    /// Privileged identities first, then position data.
    pub fn can_access(&self, identity: &Identity, module: Module, as_of: NaiveDate) -> bool {
        if self.policy.is_privileged(identity) {
            return true;
        }
        identity
            .user_id
            .is_some_and(|user_id| self.has_permission(user_id, module, as_of))
    }

    pub fn require(&self, identity: &Identity, module: Module, as_of: NaiveDate) -> AppResult<()> {
        if self.can_access(identity, module, as_of) {
            Ok(())
        } else {
            Err(AppError::Forbidden(module.code().to_string()))
        }
    }

    /// Record holding `position_type` on `as_of`, latest start date first.
    pub fn holder(&self, position_type: PositionType, as_of: NaiveDate) -> Option<&LodgePosition> {
        let mut matches: Vec<&LodgePosition> = self
            .active_positions()
            .iter()
            .filter(|p| p.position_type == position_type && p.covers(as_of))
            .collect();

        matches.sort_by_key(|p| (Reverse(p.start_date), p.id));

        if matches.len() > 1 {
            warn!(
                position = position_type.code(),
                %as_of,
                count = matches.len(),
                "more than one active record covers the same date"
            );
        }

        matches.first().copied()
    }

    /// Offices with more than one record covering `as_of`.
    pub fn conflicts(&self, as_of: NaiveDate) -> Vec<PositionType> {
        PositionType::ALL
            .into_iter()
            .filter(|pt| {
                self.active_positions()
                    .iter()
                    .filter(|p| p.position_type == *pt && p.covers(as_of))
                    .count()
                    > 1
            })
            .collect()
    }

    /// Archived tenures, newest first.
    pub fn history(&mut self) -> AppResult<Vec<PositionHistoryEntry>> {
        let mut entries = self.store.load_position_history()?;
        entries.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(entries)
    }

    /// Give `position_type` to `user_id`, archiving whoever held it.
    pub fn assign_position(
        &mut self,
        position_type: PositionType,
        user_id: Option<Uuid>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<LodgePosition> {
        if end_date < start_date {
            return Err(AppError::InvalidDate(format!(
                "end date {end_date} precedes start date {start_date}"
            )));
        }

        let new = LodgePosition::new(position_type, user_id, start_date, end_date);

        let archived = self.store.assign_position(&new).inspect_err(|e| {
            warn!(position = position_type.code(), error = %e, "position assignment failed");
        })?;

        let mut active: Vec<LodgePosition> = self
            .active_positions()
            .iter()
            .filter(|p| p.position_type != position_type)
            .cloned()
            .collect();
        active.push(new.clone());
        self.cache.insert(ACTIVE_POSITIONS, active);

        info!(
            position = position_type.code(),
            archived = archived.len(),
            "position assigned"
        );
        Ok(new)
    }

    pub fn remove_position(&mut self, position_id: Uuid) -> AppResult<LodgePosition> {
        let removed = self
            .store
            .remove_position(position_id)
            .inspect_err(|e| warn!(%position_id, error = %e, "position removal failed"))?
            .ok_or_else(|| AppError::NotFound(format!("Position {position_id}")))?;

        let active: Vec<LodgePosition> = self
            .active_positions()
            .iter()
            .filter(|p| p.id != position_id)
            .cloned()
            .collect();
        self.cache.insert(ACTIVE_POSITIONS, active);

        info!(position = removed.position_type.code(), "position removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::db::store::SqliteStore;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn resolver() -> PositionResolver<SqliteStore> {
        let store = SqliteStore::new(DbPool::in_memory().expect("open db")).expect("migrate");
        PositionResolver::load(
            store,
            AccessPolicy::new(["master@loja.org"]),
            Duration::from_secs(300),
        )
        .expect("load")
    }

    /// Store that refuses every write.
    struct FailingStore {
        active: Vec<LodgePosition>,
    }

    impl PositionStore for FailingStore {
        fn load_active_positions(&mut self) -> AppResult<Vec<LodgePosition>> {
            Ok(self.active.clone())
        }

        fn load_position_history(&mut self) -> AppResult<Vec<PositionHistoryEntry>> {
            Ok(Vec::new())
        }

        fn assign_position(&mut self, _new: &LodgePosition) -> AppResult<Vec<LodgePosition>> {
            Err(AppError::Persistence(rusqlite::Error::QueryReturnedNoRows))
        }

        fn remove_position(&mut self, _id: Uuid) -> AppResult<Option<LodgePosition>> {
            Err(AppError::Persistence(rusqlite::Error::QueryReturnedNoRows))
        }
    }

    #[test]
    fn current_position_only_within_date_range() {
        let mut r = resolver();
        let user = Uuid::new_v4();
        r.assign_position(PositionType::Secretario, Some(user), d("2025-01-01"), d("2025-12-31"))
            .unwrap();

        assert_eq!(r.current_position(user, d("2025-06-15")), Some(PositionType::Secretario));
        assert_eq!(r.current_position(user, d("2026-01-01")), None);
        assert_eq!(r.current_position(Uuid::new_v4(), d("2025-06-15")), None);
    }

    #[test]
    fn overlapping_offices_resolve_by_hierarchy() {
        let user = Uuid::new_v4();
        let store = FailingStore {
            active: vec![
                LodgePosition::new(PositionType::Tesoureiro, Some(user), d("2025-01-01"), d("2025-12-31")),
                LodgePosition::new(PositionType::Orador, Some(user), d("2025-01-01"), d("2025-12-31")),
            ],
        };
        let r = PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(60)).unwrap();

        assert_eq!(r.current_position(user, d("2025-03-01")), Some(PositionType::Orador));
    }

    #[test]
    fn wildcard_office_grants_every_module() {
        let mut r = resolver();
        let user = Uuid::new_v4();
        let today = crate::utils::date::today();
        r.assign_position(PositionType::VeneravelMestre, Some(user), today, today)
            .unwrap();

        for m in Module::ALL {
            assert!(r.has_permission(user, m, today), "{m:?}");
        }
    }

    #[test]
    fn no_position_means_no_permissions() {
        let r = resolver();
        let user = Uuid::new_v4();
        assert!(r.permissions(user, d("2025-01-01")).is_empty());
        assert!(!r.has_permission(user, Module::Dashboard, d("2025-01-01")));
    }

    #[test]
    fn reassignment_archives_previous_holder() {
        let mut r = resolver();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        r.assign_position(PositionType::Tesoureiro, Some(a), d("2024-01-01"), d("2024-12-31"))
            .unwrap();
        r.assign_position(PositionType::Tesoureiro, Some(b), d("2025-01-01"), d("2025-12-31"))
            .unwrap();

        let treasurers: Vec<_> = r
            .active_positions()
            .iter()
            .filter(|p| p.position_type == PositionType::Tesoureiro)
            .collect();
        assert_eq!(treasurers.len(), 1);
        assert_eq!(treasurers[0].user_id, Some(b));

        let history = r.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, Some(a));
        assert_eq!(history[0].start_date, d("2024-01-01"));
        assert_eq!(history[0].end_date, d("2024-12-31"));

        // Stored state agrees with the cache.
        r.refresh().unwrap();
        assert_eq!(r.active_positions().len(), 1);
    }

    #[test]
    fn remove_position_archives_and_deletes() {
        let mut r = resolver();
        let user = Uuid::new_v4();
        let p = r
            .assign_position(PositionType::Chanceler, Some(user), d("2025-01-01"), d("2025-12-31"))
            .unwrap();

        let removed = r.remove_position(p.id).unwrap();
        assert_eq!(removed.id, p.id);
        assert!(r.active_positions().is_empty());
        assert_eq!(r.history().unwrap().len(), 1);

        assert!(matches!(r.remove_position(p.id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn failed_write_leaves_cache_unchanged() {
        let user = Uuid::new_v4();
        let existing =
            LodgePosition::new(PositionType::Tesoureiro, Some(user), d("2025-01-01"), d("2025-12-31"));
        let store = FailingStore {
            active: vec![existing.clone()],
        };
        let mut r =
            PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(60)).unwrap();

        let err = r
            .assign_position(PositionType::Tesoureiro, Some(Uuid::new_v4()), d("2025-02-01"), d("2025-12-31"))
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(r.active_positions(), &[existing.clone()]);

        assert!(r.remove_position(existing.id).is_err());
        assert_eq!(r.active_positions(), &[existing]);
    }

    #[test]
    fn inverted_dates_are_rejected_before_writing() {
        let mut r = resolver();
        let err = r
            .assign_position(PositionType::Orador, None, d("2025-12-31"), d("2025-01-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
        assert!(r.active_positions().is_empty());
    }

    #[test]
    fn privileged_identities_bypass_positions() {
        let r = resolver();
        let day = d("2025-05-05");

        let admin = Identity::new(Some(Uuid::new_v4()), None, true);
        assert!(r.can_access(&admin, Module::Cargos, day));

        let master = Identity::new(None, Some(" Master@Loja.org ".into()), false);
        assert!(r.can_access(&master, Module::Tesouraria, day));

        let nobody = Identity::new(Some(Uuid::new_v4()), Some("irmao@loja.org".into()), false);
        assert!(!r.can_access(&nobody, Module::Dashboard, day));
        assert!(matches!(
            r.require(&nobody, Module::Chancelaria, day),
            Err(AppError::Forbidden(m)) if m == "chancelaria"
        ));
    }

    #[test]
    fn conflicts_report_overlapping_records() {
        let store = FailingStore {
            active: vec![
                LodgePosition::new(PositionType::Orador, Some(Uuid::new_v4()), d("2025-01-01"), d("2025-12-31")),
                LodgePosition::new(PositionType::Orador, Some(Uuid::new_v4()), d("2025-06-01"), d("2026-05-31")),
            ],
        };
        let r = PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(60)).unwrap();

        assert_eq!(r.conflicts(d("2025-07-01")), vec![PositionType::Orador]);
        assert!(r.conflicts(d("2025-03-01")).is_empty());
        let holder = r.holder(PositionType::Orador, d("2025-07-01")).unwrap();
        assert_eq!(holder.start_date, d("2025-06-01"));
    }

    #[test]
    fn same_office_twice_prefers_latest_start() {
        let user = Uuid::new_v4();
        let store = FailingStore {
            active: vec![
                LodgePosition::new(PositionType::Orador, Some(user), d("2025-01-01"), d("2025-12-31")),
                LodgePosition::new(PositionType::Orador, Some(user), d("2025-05-01"), d("2025-12-31")),
            ],
        };
        let r = PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(60)).unwrap();

        let chosen = r.current_record(user, d("2025-06-01")).unwrap();
        assert_eq!(chosen.start_date, d("2025-05-01"));
        assert_eq!(r.current_position(user, d("2025-06-01")), Some(PositionType::Orador));
    }

    #[test]
    fn same_office_same_start_prefers_smallest_id() {
        let user = Uuid::new_v4();
        let record = |id: u128| LodgePosition {
            id: Uuid::from_u128(id),
            ..LodgePosition::new(PositionType::Orador, Some(user), d("2025-01-01"), d("2025-12-31"))
        };
        let store = FailingStore {
            active: vec![record(9), record(2), record(5)],
        };
        let r = PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(60)).unwrap();

        let chosen = r.current_record(user, d("2025-06-01")).unwrap();
        assert_eq!(chosen.id, Uuid::from_u128(2));
    }

    #[test]
    fn stale_snapshot_is_refetched() {
        let store = FailingStore { active: Vec::new() };
        let mut r = PositionResolver::load(store, AccessPolicy::default(), Duration::ZERO).unwrap();
        assert!(r.refresh_if_stale().unwrap());

        let store = FailingStore { active: Vec::new() };
        let mut r =
            PositionResolver::load(store, AccessPolicy::default(), Duration::from_secs(300)).unwrap();
        assert!(!r.refresh_if_stale().unwrap());
    }
}
