//! Black-box tests over the application services with the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use ledgerly_ai::{DraftProvider, EmailDraft, MockProvider};
use ledgerly_core::{DomainError, UserId};
use ledgerly_customers::{CustomerDraft, CustomerId};
use ledgerly_invoicing::{InvoiceStatus, LineItemDraft};
use ledgerly_mailer::{MailSender, MemoryMailer};
use ledgerly_products::ProductDraft;
use ledgerly_services::{
    CreateInvoice, CustomerService, InMemoryStore, InvoiceEmailService, InvoiceService,
    ProductService,
};

fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

fn customer_draft(name: &str, email: Option<&str>) -> CustomerDraft {
    CustomerDraft {
        name: name.to_string(),
        email: email.map(str::to_string),
        ..CustomerDraft::default()
    }
}

fn consulting_items() -> Vec<LineItemDraft> {
    vec![LineItemDraft {
        product_id: None,
        description: Some("Consulting".to_string()),
        quantity: 3,
        unit_price: Some(dec!(19.99)),
    }]
}

fn invoice_input(customer_id: CustomerId) -> CreateInvoice {
    CreateInvoice {
        customer_id,
        due_date: Utc::now() + Duration::days(30),
        items: consulting_items(),
    }
}

fn fenced_draft_reply() -> &'static str {
    "```json\n{\"subject\": \"Your invoice\", \"text\": \"Dear customer, please pay.\"}\n```"
}

#[test]
fn customer_email_uniqueness_is_per_user() -> Result<()> {
    let store = store();
    let service = CustomerService::new(store);
    let alice = UserId::new();
    let bob = UserId::new();

    service.create(alice, customer_draft("Acme Ltd", Some("billing@acme.test")))?;
    // Same email under a different user is fine.
    service.create(bob, customer_draft("Acme Ltd", Some("billing@acme.test")))?;

    let err = service
        .create(alice, customer_draft("Acme Clone", Some("billing@acme.test")))
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    Ok(())
}

#[test]
fn updating_customer_onto_taken_email_conflicts() -> Result<()> {
    let store = store();
    let service = CustomerService::new(store);
    let user = UserId::new();

    service.create(user, customer_draft("First", Some("one@acme.test")))?;
    let second = service.create(user, customer_draft("Second", Some("two@acme.test")))?;

    let err = service
        .update(
            user,
            second.id_typed(),
            customer_draft("Second", Some("one@acme.test")),
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Re-saving with its own email is not a collision.
    service.update(
        user,
        second.id_typed(),
        customer_draft("Second Renamed", Some("two@acme.test")),
    )?;
    Ok(())
}

#[test]
fn customer_delete_is_guarded_by_invoice_references() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let err = customers.delete(user, customer.id_typed()).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Removing the invoice (and with it, its items) frees the customer.
    invoices.delete(user, invoice.id_typed())?;
    customers.delete(user, customer.id_typed())?;
    Ok(())
}

#[test]
fn product_sku_is_unique_per_user() -> Result<()> {
    let store = store();
    let service = ProductService::new(store);
    let user = UserId::new();

    service.create(
        user,
        ProductDraft {
            name: "Widget".to_string(),
            sku: "WID-001".to_string(),
            description: None,
            unit_price: dec!(4.25),
            stock_quantity: 10,
        },
    )?;

    let err = service
        .create(
            user,
            ProductDraft {
                name: "Widget Clone".to_string(),
                sku: "WID-001".to_string(),
                description: None,
                unit_price: dec!(5.00),
                stock_quantity: 3,
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    Ok(())
}

#[test]
fn invoice_numbers_follow_the_user_sequence() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;

    let first = invoices.create(user, invoice_input(customer.id_typed()))?;
    assert_eq!(first.number().as_str(), "INV-0001");

    for _ in 0..22 {
        invoices.create(user, invoice_input(customer.id_typed()))?;
    }
    let twenty_fourth = invoices.create(user, invoice_input(customer.id_typed()))?;
    assert_eq!(twenty_fourth.number().as_str(), "INV-0024");

    // A fresh user starts over at 1.
    let other = UserId::new();
    let other_customer = customers.create(other, customer_draft("Other Ltd", None))?;
    let other_first = invoices.create(other, invoice_input(other_customer.id_typed()))?;
    assert_eq!(other_first.number().as_str(), "INV-0001");
    Ok(())
}

#[test]
fn listings_are_newest_first() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let first = customers.create(user, customer_draft("First", None))?;
    let second = customers.create(user, customer_draft("Second", None))?;
    let third = customers.create(user, customer_draft("Third", None))?;

    let listed = customers.list(user)?;
    let names: Vec<&str> = listed.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    invoices.create(user, invoice_input(first.id_typed()))?;
    invoices.create(user, invoice_input(second.id_typed()))?;
    invoices.create(user, invoice_input(third.id_typed()))?;

    let listed = invoices.list(user)?;
    let numbers: Vec<&str> = listed.iter().map(|i| i.number().as_str()).collect();
    assert_eq!(numbers, vec!["INV-0003", "INV-0002", "INV-0001"]);
    Ok(())
}

#[test]
fn foreign_customer_reference_is_not_found() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);

    let owner = UserId::new();
    let stranger = UserId::new();
    let customer = customers.create(owner, customer_draft("Acme Ltd", None))?;

    let err = invoices
        .create(stranger, invoice_input(customer.id_typed()))
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
    Ok(())
}

#[test]
fn empty_item_list_is_rejected() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;
    let err = invoices
        .create(
            user,
            CreateInvoice {
                customer_id: customer.id_typed(),
                due_date: Utc::now(),
                items: vec![],
            },
        )
        .unwrap_err();

    match err {
        DomainError::Validation { field, .. } => assert_eq!(field, "items"),
        other => panic!("Expected Validation error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn product_backed_lines_default_from_the_catalog() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let products = ProductService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;
    let widget = products.create(
        user,
        ProductDraft {
            name: "Widget".to_string(),
            sku: "WID-001".to_string(),
            description: None,
            unit_price: dec!(4.25),
            stock_quantity: 10,
        },
    )?;

    let invoice = invoices.create(
        user,
        CreateInvoice {
            customer_id: customer.id_typed(),
            due_date: Utc::now() + Duration::days(14),
            items: vec![
                LineItemDraft {
                    product_id: Some(widget.id_typed()),
                    description: None,
                    quantity: 2,
                    unit_price: None,
                },
                LineItemDraft {
                    product_id: None,
                    description: Some("Consulting".to_string()),
                    quantity: 3,
                    unit_price: Some(dec!(19.99)),
                },
            ],
        },
    )?;

    assert_eq!(invoice.items().len(), 2);
    assert_eq!(invoice.items()[0].description(), "Widget");
    assert_eq!(invoice.items()[0].line_total().amount(), dec!(8.50));
    assert_eq!(invoice.items()[1].line_total().amount(), dec!(59.97));
    assert_eq!(invoice.total().amount(), dec!(68.47));
    assert!(invoice.total_matches_items());
    Ok(())
}

#[test]
fn concurrent_creators_never_share_invoice_numbers() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store);
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;
    let input = invoice_input(customer.id_typed());

    let numbers: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..3)
                        .map(|_| {
                            invoices
                                .create(user, input.clone())
                                .expect("concurrent create failed")
                                .number()
                                .to_string()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("creator thread panicked"))
            .collect()
    });

    let unique: HashSet<&String> = numbers.iter().collect();
    assert_eq!(numbers.len(), 24);
    assert_eq!(unique.len(), 24, "duplicate invoice numbers: {numbers:?}");
    Ok(())
}

#[test]
fn replace_items_recomputes_total_for_drafts_only() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("a@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let updated = invoices.replace_items(
        user,
        invoice.id_typed(),
        vec![LineItemDraft {
            product_id: None,
            description: Some("Consulting".to_string()),
            quantity: 1,
            unit_price: Some(dec!(19.99)),
        }],
    )?;
    assert_eq!(updated.total().amount(), dec!(19.99));

    // After sending, the invoice is locked.
    send(&store, user, &invoice)?;
    let err = invoices
        .replace_items(user, invoice.id_typed(), consulting_items())
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    Ok(())
}

#[test]
fn paid_and_overdue_require_sent_first() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("a@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let err = invoices.mark_paid(user, invoice.id_typed()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition(_)));

    send(&store, user, &invoice)?;
    let paid = invoices.mark_paid(user, invoice.id_typed())?;
    assert_eq!(paid.status(), InvoiceStatus::Paid);

    // Paid is terminal.
    let err = invoices.mark_overdue(user, invoice.id_typed()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition(_)));
    Ok(())
}

#[tokio::test]
async fn send_email_transitions_to_sent_only_after_delivery() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("billing@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let mailer = Arc::new(MemoryMailer::new());
    let service = InvoiceEmailService::new(
        store,
        Arc::new(MockProvider::replying(fenced_draft_reply())),
        mailer.clone(),
    );

    let draft = service.draft_email(user, invoice.id_typed()).await?;
    assert_eq!(draft.subject, "Your invoice");

    // Drafting alone must not move the status.
    assert_eq!(
        invoices.get(user, invoice.id_typed())?.status(),
        InvoiceStatus::Draft
    );

    let sent = service.send_email(user, invoice.id_typed(), &draft).await?;
    assert_eq!(sent.status(), InvoiceStatus::Sent);

    let delivered = mailer.sent();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to_email, "billing@acme.test");
    Ok(())
}

#[tokio::test]
async fn delivery_failure_leaves_the_invoice_draft() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("billing@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let service = InvoiceEmailService::new(
        store,
        Arc::new(MockProvider::replying(fenced_draft_reply())),
        Arc::new(MemoryMailer::failing()),
    );

    let draft = EmailDraft {
        subject: "Your invoice".to_string(),
        text: "Dear customer, please pay.".to_string(),
    };
    let err = service
        .send_email(user, invoice.id_typed(), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Upstream { .. }));

    // No partial transition.
    assert_eq!(
        invoices.get(user, invoice.id_typed())?.status(),
        InvoiceStatus::Draft
    );
    Ok(())
}

#[tokio::test]
async fn generation_failure_is_upstream_and_touches_nothing() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("billing@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let service = InvoiceEmailService::new(
        store,
        Arc::new(MockProvider::failing()),
        Arc::new(MemoryMailer::new()),
    );

    let err = service
        .draft_email(user, invoice.id_typed())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Upstream { .. }));
    assert_eq!(
        invoices.get(user, invoice.id_typed())?.status(),
        InvoiceStatus::Draft
    );
    Ok(())
}

#[tokio::test]
async fn an_invoice_cannot_be_sent_twice() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", Some("billing@acme.test")))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let mailer = Arc::new(MemoryMailer::new());
    let service = InvoiceEmailService::new(
        store,
        Arc::new(MockProvider::replying(fenced_draft_reply())),
        mailer.clone(),
    );

    let draft = service.draft_email(user, invoice.id_typed()).await?;
    service.send_email(user, invoice.id_typed(), &draft).await?;

    let err = service
        .send_email(user, invoice.id_typed(), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition(_)));
    // The second attempt must not even reach the transport.
    assert_eq!(mailer.sent().len(), 1);
    Ok(())
}

#[tokio::test]
async fn sending_requires_a_customer_email_address() -> Result<()> {
    let store = store();
    let customers = CustomerService::new(store.clone());
    let invoices = InvoiceService::new(store.clone());
    let user = UserId::new();

    let customer = customers.create(user, customer_draft("Acme Ltd", None))?;
    let invoice = invoices.create(user, invoice_input(customer.id_typed()))?;

    let service = InvoiceEmailService::new(
        store,
        Arc::new(MockProvider::replying(fenced_draft_reply())),
        Arc::new(MemoryMailer::new()),
    );

    let draft = EmailDraft {
        subject: "Your invoice".to_string(),
        text: "Dear customer, please pay.".to_string(),
    };
    let err = service
        .send_email(user, invoice.id_typed(), &draft)
        .await
        .unwrap_err();
    match err {
        DomainError::Validation { field, .. } => assert_eq!(field, "email"),
        other => panic!("Expected Validation error, got {other:?}"),
    }
    Ok(())
}

/// Walk an invoice to SENT through the email flow with always-green doubles.
fn send(
    store: &Arc<InMemoryStore>,
    user: UserId,
    invoice: &ledgerly_invoicing::Invoice,
) -> Result<()> {
    let drafter: Arc<dyn DraftProvider> = Arc::new(MockProvider::replying(fenced_draft_reply()));
    let mailer: Arc<dyn MailSender> = Arc::new(MemoryMailer::new());
    let service = InvoiceEmailService::new(store.clone(), drafter, mailer);

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let draft = runtime.block_on(service.draft_email(user, invoice.id_typed()))?;
    runtime.block_on(service.send_email(user, invoice.id_typed(), &draft))?;
    Ok(())
}
