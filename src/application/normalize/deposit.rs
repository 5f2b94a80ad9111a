use crate::domain::{Deposit, Direction, ExternalId, NormalizeError, Record, TransactionKind};

/// Map a deposit into a record. Deposits are always incoming.
pub fn normalize_deposit(deposit: &Deposit) -> Result<Record, NormalizeError> {
    Record::builder()
        .amount_str(deposit.amount.as_str())
        .direction(Direction::In)
        .currency(deposit.coin.as_str())
        .description(format!(
            "Deposit {} to Binance",
            deposit.coin.trim().to_ascii_uppercase()
        ))
        .external_id(ExternalId::prefixed(
            ExternalId::BINANCE_PREFIX,
            &deposit.tx_id,
        ))
        .date_millis(deposit.insert_time)
        .build()
        .map_err(|e| NormalizeError::invalid(TransactionKind::Deposit, &deposit.tx_id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::deposit;

    #[test]
    fn deposit_is_always_incoming() {
        let record = normalize_deposit(&deposit("0xabc", "usdt", "25.5", 1_000)).unwrap();

        assert_eq!(record.direction(), Direction::In);
        assert_eq!(record.amount().get(), 2550);
        assert_eq!(record.currency(), "USDT");
        assert_eq!(record.description(), "Deposit USDT to Binance");
        assert_eq!(record.external_id().unwrap().as_str(), "BN-0xabc");
        assert!(record.secondary_amount().is_none());
    }

    #[test]
    fn rounds_at_cent_boundary() {
        let record = normalize_deposit(&deposit("t", "USDT", "12.345", 0)).unwrap();
        assert_eq!(record.amount().get(), 1235);
    }

    #[test]
    fn negative_deposit_amount_is_rejected() {
        let err = normalize_deposit(&deposit("t", "USDT", "-1", 0)).unwrap_err();
        assert_eq!(err.kind(), TransactionKind::Deposit);
    }
}
