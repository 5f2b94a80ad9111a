use crate::domain::{Direction, ExternalId, NormalizeError, P2pOrder, Record, TransactionKind};

/// Map a P2P order into a record.
///
/// `BUY` is incoming, anything else outgoing. The crypto leg becomes the
/// primary amount; the fiat total, when present, becomes the secondary leg.
pub fn normalize_p2p_order(order: &P2pOrder) -> Result<Record, NormalizeError> {
    let direction = if order.trade_type.trim().eq_ignore_ascii_case("BUY") {
        Direction::In
    } else {
        Direction::Out
    };

    let mut builder = Record::builder()
        .amount_str(order.amount.as_str())
        .direction(direction)
        .currency(order.asset.as_str())
        .description(format!(
            "P2P {} {} for {}",
            order.trade_type.trim().to_ascii_uppercase(),
            order.asset.trim().to_ascii_uppercase(),
            order.fiat.trim().to_ascii_uppercase()
        ))
        .external_id(ExternalId::prefixed(
            ExternalId::BINANCE_PREFIX,
            &order.order_number,
        ))
        .date_millis(order.create_time);

    if let Some(fiat_total) = order.total_price.as_deref() {
        builder = builder.secondary_str(fiat_total, order.fiat.as_str());
    }

    builder
        .build()
        .map_err(|e| NormalizeError::invalid(TransactionKind::P2p, &order.order_number, e))
}
