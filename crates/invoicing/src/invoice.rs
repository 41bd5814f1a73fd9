use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, Entity, EntityId, Money, UserId};
use ledgerly_customers::CustomerId;

use crate::line_item::InvoiceItem;
use crate::number::InvoiceNumber;
use crate::status::InvoiceStatus;

/// Invoice identifier (user-scoped via the entity's `user_id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub EntityId);

impl InvoiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice record: an ordered, non-empty set of priced lines and their total.
///
/// Invariant: `total` equals the exact decimal sum of the items' line totals
/// at all times. Items travel with the invoice; removing the invoice removes
/// them in the same operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    user_id: UserId,
    customer_id: CustomerId,
    number: InvoiceNumber,
    status: InvoiceStatus,
    due_date: DateTime<Utc>,
    total: Money,
    items: Vec<InvoiceItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Assemble a new invoice from already-built items. Initial status is
    /// always `Draft`.
    pub fn create(
        id: InvoiceId,
        user_id: UserId,
        customer_id: CustomerId,
        number: InvoiceNumber,
        due_date: DateTime<Utc>,
        items: Vec<InvoiceItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total = total_of(&items)?;
        Ok(Self {
            id,
            user_id,
            customer_id,
            number,
            status: InvoiceStatus::Draft,
            due_date,
            total,
            items,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the full item set, recomputing the total. Draft invoices only.
    pub fn replace_items(
        &mut self,
        items: Vec<InvoiceItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status != InvoiceStatus::Draft {
            return Err(DomainError::conflict(
                "only draft invoices can have their items edited",
            ));
        }
        self.total = total_of(&items)?;
        self.items = items;
        self.updated_at = now;
        Ok(())
    }

    /// Perform a status transition through the gate.
    pub fn transition(&mut self, to: InvoiceStatus, now: DateTime<Utc>) -> DomainResult<()> {
        self.status.check_transition(to)?;
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn number(&self) -> &InvoiceNumber {
        &self.number
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Invariant check: the stored total matches the items.
    pub fn total_matches_items(&self) -> bool {
        total_of(&self.items).map(|t| t == self.total).unwrap_or(false)
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn total_of(items: &[InvoiceItem]) -> DomainResult<Money> {
    if items.is_empty() {
        return Err(DomainError::validation(
            "items",
            "at least one line item is required",
        ));
    }
    Money::sum(items.iter().map(|item| item.line_total()))
}

/// Parse a caller-supplied due date.
///
/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_due_date(value: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            DomainError::validation(
                "due_date",
                "must be an RFC 3339 timestamp or a YYYY-MM-DD date",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{InvoiceItemId, LineItemDraft};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn test_user_id() -> UserId {
        UserId::new()
    }

    fn test_customer_id() -> CustomerId {
        CustomerId::new(EntityId::new())
    }

    fn test_invoice_id() -> InvoiceId {
        InvoiceId::new(EntityId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn item(description: &str, quantity: u32, unit_price: Decimal) -> InvoiceItem {
        InvoiceItem::build(
            InvoiceItemId::new(EntityId::new()),
            &LineItemDraft {
                product_id: None,
                description: Some(description.to_string()),
                quantity,
                unit_price: Some(unit_price),
            },
            None,
        )
        .unwrap()
    }

    fn draft_invoice(items: Vec<InvoiceItem>) -> Invoice {
        Invoice::create(
            test_invoice_id(),
            test_user_id(),
            test_customer_id(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            items,
            test_time(),
        )
        .unwrap()
    }

    #[test]
    fn create_totals_items_and_starts_as_draft() {
        let invoice = draft_invoice(vec![
            item("Consulting", 3, dec!(19.99)),
            item("Travel", 1, dec!(120.00)),
        ]);

        assert_eq!(invoice.status(), InvoiceStatus::Draft);
        assert_eq!(invoice.total().amount(), dec!(179.97));
        assert!(invoice.total_matches_items());
    }

    #[test]
    fn create_rejects_empty_item_list() {
        let err = Invoice::create(
            test_invoice_id(),
            test_user_id(),
            test_customer_id(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            vec![],
            test_time(),
        )
        .unwrap_err();

        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "items"),
            _ => panic!("Expected Validation error for empty items"),
        }
    }

    #[test]
    fn replace_items_recomputes_total() {
        let mut invoice = draft_invoice(vec![item("Consulting", 3, dec!(19.99))]);
        invoice
            .replace_items(vec![item("Consulting", 1, dec!(19.99))], test_time())
            .unwrap();

        assert_eq!(invoice.total().amount(), dec!(19.99));
        assert!(invoice.total_matches_items());
    }

    #[test]
    fn replace_items_is_refused_once_sent() {
        let mut invoice = draft_invoice(vec![item("Consulting", 1, dec!(10.00))]);
        invoice.transition(InvoiceStatus::Sent, test_time()).unwrap();

        let err = invoice
            .replace_items(vec![item("Other", 1, dec!(5.00))], test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(invoice.total().amount(), dec!(10.00));
    }

    #[test]
    fn transition_walks_the_gate() {
        let mut invoice = draft_invoice(vec![item("Consulting", 1, dec!(10.00))]);

        let err = invoice
            .transition(InvoiceStatus::Paid, test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(invoice.status(), InvoiceStatus::Draft);

        invoice.transition(InvoiceStatus::Sent, test_time()).unwrap();
        invoice.transition(InvoiceStatus::Paid, test_time()).unwrap();
        assert_eq!(invoice.status(), InvoiceStatus::Paid);

        let err = invoice
            .transition(InvoiceStatus::Overdue, test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn parse_due_date_accepts_both_formats() {
        assert!(parse_due_date("2026-09-30").is_ok());
        assert!(parse_due_date("2026-09-30T12:00:00Z").is_ok());

        let err = parse_due_date("next tuesday").unwrap_err();
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "due_date"),
            _ => panic!("Expected Validation error for unparseable due date"),
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_item() -> impl Strategy<Value = (u32, Decimal)> {
            // quantity 1..50, cent-denominated price up to 9,999.99
            (1u32..50, 0u64..1_000_000u64).prop_map(|(q, cents)| (q, Decimal::new(cents as i64, 2)))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: the invoice total is independent of item order.
            #[test]
            fn total_is_order_independent(
                inputs in proptest::collection::vec(arb_item(), 1..12),
                rotation in 0usize..12,
            ) {
                let items: Vec<InvoiceItem> = inputs
                    .iter()
                    .map(|(q, price)| item("Line", *q, *price))
                    .collect();
                let mut rotated = items.clone();
                let k = rotation % rotated.len();
                rotated.rotate_left(k);

                let a = draft_invoice(items);
                let b = draft_invoice(rotated);
                prop_assert_eq!(a.total(), b.total());
            }

            /// Property: every line total is exactly quantity x unit price.
            #[test]
            fn line_totals_are_exact((quantity, price) in arb_item()) {
                let line = item("Line", quantity, price);
                let expected = price * Decimal::from(quantity);
                prop_assert_eq!(line.line_total().amount(), expected);
            }
        }
    }
}
