//! Raw upstream transaction shapes.
//!
//! These mirror the JSON returned by the exchange and are deliberately loose:
//! amounts stay as strings and most descriptive fields are optional. All
//! interpretation happens in the normalizers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three upstream transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Peer-to-peer trade.
    P2p,
    /// Pay transfer.
    Pay,
    /// On-chain deposit.
    Deposit,
}

impl TransactionKind {
    /// All kinds in fetch order.
    pub const ALL: [TransactionKind; 3] = [Self::P2p, Self::Pay, Self::Deposit];

    /// Lower-case name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P2p => "p2p",
            Self::Pay => "pay",
            Self::Deposit => "deposit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A P2P order from the C2C order history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P2pOrder {
    pub order_number: String,
    pub trade_type: String,
    pub asset: String,
    pub fiat: String,
    /// Crypto leg.
    pub amount: String,
    /// Fiat leg.
    #[serde(default, alias = "fiatAmount")]
    pub total_price: Option<String>,
    #[serde(default)]
    pub unit_price: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub create_time: i64,
    #[serde(default)]
    pub counter_part_nick_name: Option<String>,
    #[serde(default)]
    pub commission: Option<String>,
}

/// A deposit from the capital deposit history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "asset")]
    pub coin: String,
    pub amount: String,
    pub tx_id: String,
    /// Milliseconds since the Unix epoch.
    pub insert_time: i64,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
}

/// Identity of one side of a Pay transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayParty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PayParty {
    /// Display name, falling back to email, then to `Unknown`.
    ///
    /// Blank strings count as absent.
    #[must_use]
    pub fn display(party: Option<&PayParty>) -> &str {
        fn present(value: Option<&String>) -> Option<&str> {
            value.map(|s| s.trim()).filter(|s| !s.is_empty())
        }

        party
            .and_then(|p| present(p.name.as_ref()).or_else(|| present(p.email.as_ref())))
            .unwrap_or("Unknown")
    }
}

/// A Pay transaction. The amount is signed: outgoing transfers start with `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayTransaction {
    pub transaction_id: String,
    pub amount: String,
    pub currency: String,
    /// Milliseconds since the Unix epoch.
    pub transaction_time: i64,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub payer_info: Option<PayParty>,
    #[serde(default)]
    pub receiver_info: Option<PayParty>,
}
