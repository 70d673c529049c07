use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    FlowType, GateState, MonthKey, Profile, Session, Theme, Totals, Transaction, TransactionId,
    compute_balance, compute_totals, dedupe_by_id, filter_by_month, parse_amount,
};
use crate::storage::{KeyValueStore, PROFILE_KEY, SESSION_KEY, THEME_KEY, TRANSACTIONS_KEY};

use super::{LedgerError, Report, ReportOptions, format_report};

/// Owns the ledger state and keeps it in sync with a key-value store.
///
/// This is the primary interface for any shell (CLI, TUI, web view). Every
/// mutating call writes the full updated record to the store before it
/// returns, and in-memory state only changes once that write succeeded.
pub struct LedgerStore<S> {
    store: S,
    profile: Option<Profile>,
    transactions: Vec<Transaction>,
    session: Option<Session>,
    theme: Theme,
}

/// Dashboard view of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: MonthKey,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
    pub balance: Decimal,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Load all state from `store`.
    ///
    /// Missing keys give an empty ledger. Values that fail to decode are
    /// logged and treated as missing; only store I/O failures are errors.
    pub async fn initialize(store: S) -> Result<Self, LedgerError> {
        let profile = load::<Profile, _>(&store, PROFILE_KEY)
            .await?
            .filter(|p| valid_or_warn(p.is_valid(), PROFILE_KEY));

        let transactions = load_transactions(&store).await?;

        let session = load::<Session, _>(&store, SESSION_KEY)
            .await?
            .filter(|s| valid_or_warn(s.is_valid(), SESSION_KEY));

        let theme = load::<Theme, _>(&store, THEME_KEY)
            .await?
            .unwrap_or_default();

        debug!(
            transactions = transactions.len(),
            has_profile = profile.is_some(),
            has_session = session.is_some(),
            "ledger loaded"
        );

        Ok(Self {
            store,
            profile,
            transactions,
            session,
            theme,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the underlying store back, e.g. to re-initialize from it.
    pub fn into_store(self) -> S {
        self.store
    }

    // ========================
    // Profile & gate
    // ========================

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Replace the business profile. Calling again overwrites it.
    pub async fn set_profile(&mut self, name: &str, category: &str) -> Result<&Profile, LedgerError> {
        let profile = Profile::new(name, category)?;
        self.persist(PROFILE_KEY, &profile).await?;
        info!(name = %profile.name, category = %profile.category, "profile saved");
        Ok(&*self.profile.insert(profile))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Record a login stub for `email`.
    pub async fn login(&mut self, email: &str) -> Result<&Session, LedgerError> {
        let session = Session::new(email)?;
        self.persist(SESSION_KEY, &session).await?;
        info!(email = %session.email, "logged in");
        Ok(&*self.session.insert(session))
    }

    /// Forget the session. Ledger data is kept.
    pub async fn logout(&mut self) -> Result<(), LedgerError> {
        self.store.remove(SESSION_KEY).await?;
        self.session = None;
        info!("logged out");
        Ok(())
    }

    pub fn gate_state(&self) -> GateState {
        GateState::resolve(self.session.as_ref(), self.profile.as_ref())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<(), LedgerError> {
        self.persist(THEME_KEY, &theme).await?;
        self.theme = theme;
        Ok(())
    }

    // ========================
    // Transactions
    // ========================

    /// All transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Record a transaction dated now.
    pub async fn add_transaction(
        &mut self,
        amount: &str,
        note: Option<&str>,
        flow: FlowType,
    ) -> Result<Transaction, LedgerError> {
        self.add_transaction_at(amount, note, flow, Utc::now()).await
    }

    /// Record a transaction with an explicit date.
    ///
    /// The amount is parsed here; empty, non-numeric, zero or negative input is
    /// rejected before anything is written.
    pub async fn add_transaction_at(
        &mut self,
        amount: &str,
        note: Option<&str>,
        flow: FlowType,
        date: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let amount = parse_amount(amount)?;

        let mut transaction = Transaction::new(amount, flow, date);
        if let Some(note) = note {
            transaction = transaction.with_note(note);
        }
        while self.find_transaction(transaction.id).is_some() {
            transaction.id = Uuid::new_v4();
        }

        let mut updated = Vec::with_capacity(self.transactions.len() + 1);
        updated.push(transaction.clone());
        updated.extend(self.transactions.iter().cloned());

        self.persist(TRANSACTIONS_KEY, &updated).await?;
        self.transactions = updated;

        info!(
            id = %transaction.id,
            flow = %transaction.flow,
            amount = %transaction.amount,
            "transaction recorded"
        );
        Ok(transaction)
    }

    pub fn find_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Remove a transaction by id.
    /// Returns `None` (and writes nothing) when the id is unknown.
    pub async fn delete_transaction(
        &mut self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, LedgerError> {
        let Some(index) = self.transactions.iter().position(|t| t.id == id) else {
            debug!(%id, "delete ignored, no such transaction");
            return Ok(None);
        };

        let mut updated = self.transactions.clone();
        let removed = updated.remove(index);

        self.persist(TRANSACTIONS_KEY, &updated).await?;
        self.transactions = updated;

        info!(%id, "transaction deleted");
        Ok(Some(removed))
    }

    // ========================
    // Queries
    // ========================

    /// Transactions dated in `month`, newest first.
    pub fn filter_by_month(&self, month: MonthKey) -> Vec<Transaction> {
        filter_by_month(&self.transactions, month)
    }

    pub fn month_summary(&self, month: MonthKey) -> MonthSummary {
        let transactions = self.filter_by_month(month);
        let totals = compute_totals(&transactions);
        let balance = compute_balance(&transactions);

        MonthSummary {
            month,
            transactions,
            totals,
            balance,
        }
    }

    /// Render the plain-text report for `month` from the same rows the history view shows.
    pub fn report(&self, month: MonthKey, options: &ReportOptions) -> Report {
        let transactions = self.filter_by_month(month);
        let name = self.profile.as_ref().map(|p| p.name.as_str());
        format_report(name, month, &transactions, options)
    }

    // ========================
    // Reset
    // ========================

    /// Clear every persisted key and start over with an empty ledger.
    pub async fn reset(&mut self) -> Result<(), LedgerError> {
        self.store.clear().await?;
        self.profile = None;
        self.transactions.clear();
        self.session = None;
        self.theme = Theme::default();
        warn!("all ledger data cleared");
        Ok(())
    }

    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), LedgerError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json).await?;
        Ok(())
    }
}

/// Read and decode one key. Undecodable values (including JSON `null`) count as absent.
async fn load<T, S>(store: &S, key: &str) -> Result<Option<T>, LedgerError>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "discarding malformed stored value");
            Ok(None)
        }
    }
}

/// Decode the stored list one record at a time. A record that does not decode,
/// or repeats an earlier id, is dropped on its own; the rest of the history loads.
async fn load_transactions<S: KeyValueStore>(store: &S) -> Result<Vec<Transaction>, LedgerError> {
    let Some(records) = load::<Vec<serde_json::Value>, _>(store, TRANSACTIONS_KEY).await? else {
        return Ok(Vec::new());
    };

    let mut transactions: Vec<Transaction> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(transaction) => Some(transaction),
            Err(e) => {
                warn!(index, error = %e, "discarding malformed stored transaction");
                None
            }
        })
        .collect();

    let duplicates = dedupe_by_id(&mut transactions);
    if duplicates > 0 {
        warn!(duplicates, "discarding stored transactions with repeated ids");
    }
    Ok(transactions)
}

fn valid_or_warn(valid: bool, key: &str) -> bool {
    if !valid {
        warn!(key, "discarding stored value that breaks ledger invariants");
    }
    valid
}
