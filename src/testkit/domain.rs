//! Builders for domain primitives.

use crate::domain::{Deposit, Direction, ExternalId, P2pOrder, PayTransaction, Record};

/// A USDT/EUR P2P order with no status and no fiat total.
pub fn p2p_order(order_number: &str, trade_type: &str, amount: &str, create_time: i64) -> P2pOrder {
    P2pOrder {
        order_number: order_number.to_string(),
        trade_type: trade_type.to_string(),
        asset: "USDT".to_string(),
        fiat: "EUR".to_string(),
        amount: amount.to_string(),
        create_time,
        ..Default::default()
    }
}

/// A deposit with the given transaction id.
pub fn deposit(tx_id: &str, coin: &str, amount: &str, insert_time: i64) -> Deposit {
    Deposit {
        coin: coin.to_string(),
        amount: amount.to_string(),
        tx_id: tx_id.to_string(),
        insert_time,
        status: Some(1),
        ..Default::default()
    }
}

/// A Pay transaction with no counterparty info.
pub fn pay_transaction(
    transaction_id: &str,
    amount: &str,
    currency: &str,
    transaction_time: i64,
) -> PayTransaction {
    PayTransaction {
        transaction_id: transaction_id.to_string(),
        amount: amount.to_string(),
        currency: currency.to_string(),
        transaction_time,
        ..Default::default()
    }
}

/// A minimal incoming USD record with the given external id.
pub fn record(external_id: &str, date_millis: i64) -> Record {
    Record::builder()
        .amount_minor(100u64)
        .direction(Direction::In)
        .currency("USD")
        .description("test record")
        .external_id(ExternalId::from(external_id))
        .date_millis(date_millis)
        .build()
        .expect("valid test record")
}
