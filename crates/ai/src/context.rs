//! Snapshots the prompt is built from.

use serde::{Deserialize, Serialize};

/// One invoice line, pre-rendered for prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSummary {
    pub description: String,
    pub quantity: u32,
    /// Already-formatted decimal amount, e.g. `"19.99"`.
    pub unit_price: String,
}

/// Snapshot of the customer and invoice an email is about.
///
/// Amounts and dates arrive pre-formatted so this crate never touches money
/// arithmetic or timezone handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContext {
    pub customer_name: String,
    pub invoice_number: String,
    pub due_date: String,
    pub total_amount: String,
    pub lines: Vec<LineSummary>,
}

impl EmailContext {
    /// Render the drafting prompt.
    pub fn prompt(&self) -> String {
        let items_list = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "- {} (Quantity: {}, Unit Price: ${})",
                    line.description, line.quantity, line.unit_price
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Create a customer email for {customer} regarding their invoice. \
The invoice number is {number}, due on {due}, with a total amount of ${total}. \
The invoice includes the following items:\n{items}\n\
Write the email in a professional tone.\n\n\
Address the customer politely and include a call to action for payment.\n\n\
Return JSON with separate fields for \"subject\" and \"text\" content:\n\n\
{{\n    \"subject\": \"string\",\n    \"text\": \"string\"\n}}\n",
            customer = self.customer_name,
            number = self.invoice_number,
            due = self.due_date,
            total = self.total_amount,
            items = items_list,
        )
    }
}
