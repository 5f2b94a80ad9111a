//! Scripted [`TransactionSource`] for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::{Deposit, P2pOrder, PayTransaction};
use crate::error::{Error, Result};
use crate::port::TransactionSource;

/// Lower bounds passed to each method, in call order.
#[derive(Debug, Clone, Default)]
pub struct SourceCalls {
    pub p2p: Vec<Option<DateTime<Utc>>>,
    pub pay: Vec<Option<DateTime<Utc>>>,
    pub deposits: Vec<Option<DateTime<Utc>>>,
}

#[derive(Default)]
struct Script<T> {
    items: Vec<T>,
    failure: Option<String>,
}

impl<T: Clone> Script<T> {
    fn answer(&self) -> Result<Vec<T>> {
        match &self.failure {
            Some(reason) => Err(Error::Connection(reason.clone())),
            None => Ok(self.items.clone()),
        }
    }
}

/// A source that returns the same canned transactions on every call.
///
/// The bound is recorded but not applied, like an upstream that ignores it;
/// the fetchers' own window filter still runs. Data and failures can be
/// changed between cycles.
#[derive(Default)]
pub struct ScriptedSource {
    p2p: Mutex<Script<P2pOrder>>,
    pay: Mutex<Script<PayTransaction>>,
    deposits: Mutex<Script<Deposit>>,
    calls: Mutex<SourceCalls>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_p2p(self, orders: Vec<P2pOrder>) -> Self {
        self.p2p.lock().items = orders;
        self
    }

    pub fn with_pay(self, transactions: Vec<PayTransaction>) -> Self {
        self.pay.lock().items = transactions;
        self
    }

    pub fn with_deposits(self, deposits: Vec<Deposit>) -> Self {
        self.deposits.lock().items = deposits;
        self
    }

    pub fn fail_p2p(self, reason: impl Into<String>) -> Self {
        self.p2p.lock().failure = Some(reason.into());
        self
    }

    pub fn fail_pay(self, reason: impl Into<String>) -> Self {
        self.pay.lock().failure = Some(reason.into());
        self
    }

    pub fn fail_deposits(self, reason: impl Into<String>) -> Self {
        self.deposits.lock().failure = Some(reason.into());
        self
    }

    /// Replace the P2P orders returned from the next call on.
    pub fn set_p2p(&self, orders: Vec<P2pOrder>) {
        self.p2p.lock().items = orders;
    }

    /// Append deposits returned from the next call on.
    pub fn push_deposits(&self, deposits: Vec<Deposit>) {
        self.deposits.lock().items.extend(deposits);
    }

    /// Clear every scripted failure.
    pub fn recover(&self) {
        self.p2p.lock().failure = None;
        self.pay.lock().failure = None;
        self.deposits.lock().failure = None;
    }

    pub fn calls(&self) -> SourceCalls {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TransactionSource for ScriptedSource {
    async fn p2p_orders(&self, since: Option<DateTime<Utc>>) -> Result<Vec<P2pOrder>> {
        self.calls.lock().p2p.push(since);
        self.p2p.lock().answer()
    }

    async fn deposits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Deposit>> {
        self.calls.lock().deposits.push(since);
        self.deposits.lock().answer()
    }

    async fn pay_transactions(&self, since: Option<DateTime<Utc>>) -> Result<Vec<PayTransaction>> {
        self.calls.lock().pay.push(since);
        self.pay.lock().answer()
    }

    fn exchange_name(&self) -> &'static str {
        "scripted"
    }
}
