use crate::domain::money::parse_decimal;
use crate::domain::{
    Direction, ExternalId, NormalizeError, PayParty, PayTransaction, Record, TransactionKind,
};

/// Map a Pay transfer into a record.
///
/// A leading `-` marks an outgoing transfer; the stored amount is the absolute
/// value. The counterparty is the receiver for outgoing transfers and the payer
/// for incoming ones. Zero and unparsable amounts are rejected.
pub fn normalize_pay_transaction(tx: &PayTransaction) -> Result<Record, NormalizeError> {
    let invalid = |e| NormalizeError::invalid(TransactionKind::Pay, &tx.transaction_id, e);

    let raw = tx.amount.trim();
    let value = parse_decimal(raw).map_err(invalid)?;
    if value.is_zero() {
        return Err(NormalizeError::ZeroAmount {
            kind: TransactionKind::Pay,
            id: tx.transaction_id.clone(),
        });
    }

    let (direction, description) = if raw.starts_with('-') {
        (
            Direction::Out,
            format!(
                "Binance Pay to {}",
                PayParty::display(tx.receiver_info.as_ref())
            ),
        )
    } else {
        (
            Direction::In,
            format!(
                "Binance Pay from {}",
                PayParty::display(tx.payer_info.as_ref())
            ),
        )
    };

    Record::builder()
        .amount(value.abs())
        .direction(direction)
        .currency(tx.currency.as_str())
        .description(description)
        .external_id(ExternalId::prefixed(
            ExternalId::PAY_PREFIX,
            &tx.transaction_id,
        ))
        .date_millis(tx.transaction_time)
        .build()
        .map_err(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::pay_transaction;

    fn party(name: Option<&str>, email: Option<&str>) -> Option<PayParty> {
        Some(PayParty {
            name: name.map(String::from),
            email: email.map(String::from),
        })
    }

    #[test]
    fn negative_amount_is_outgoing_to_receiver() {
        let tx = PayTransaction {
            receiver_info: party(Some("Carol"), Some("carol@example.com")),
            payer_info: party(Some("Me"), None),
            ..pay_transaction("55", "-12.345", "usdt", 1_000)
        };

        let record = normalize_pay_transaction(&tx).unwrap();

        assert_eq!(record.direction(), Direction::Out);
        assert_eq!(record.amount().get(), 1235);
        assert_eq!(record.currency(), "USDT");
        assert_eq!(record.description(), "Binance Pay to Carol");
        assert_eq!(record.external_id().unwrap().as_str(), "PAY-55");
    }

    #[test]
    fn positive_amount_is_incoming_from_payer_email() {
        let tx = PayTransaction {
            payer_info: party(None, Some("dave@example.com")),
            ..pay_transaction("56", "7", "USDT", 1_000)
        };

        let record = normalize_pay_transaction(&tx).unwrap();

        assert_eq!(record.direction(), Direction::In);
        assert_eq!(record.amount().get(), 700);
        assert_eq!(record.description(), "Binance Pay from dave@example.com");
    }

    #[test]
    fn missing_counterparty_is_unknown() {
        let record = normalize_pay_transaction(&pay_transaction("57", "-1", "USDT", 0)).unwrap();
        assert_eq!(record.description(), "Binance Pay to Unknown");
    }

    #[test]
    fn zero_amount_is_rejected() {
        for zero in ["0", "0.00", "-0"] {
            let err = normalize_pay_transaction(&pay_transaction("58", zero, "USDT", 0)).unwrap_err();
            assert!(matches!(err, NormalizeError::ZeroAmount { .. }), "{zero}");
        }
    }

    #[test]
    fn unparsable_amount_is_rejected() {
        let err = normalize_pay_transaction(&pay_transaction("59", "1,5", "USDT", 0)).unwrap_err();

        assert!(matches!(err, NormalizeError::Invalid { .. }));
        assert_eq!(err.transaction_id(), "59");
    }
}
