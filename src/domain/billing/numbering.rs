use super::entities::Invoice;
use super::value_objects::{InvoiceNumber, ValueObjectError};

/// Next invoice number for `year`, given the invoices that exist now.
///
/// Without deletions this is the count of the year's invoices plus one. The
/// highest sequence already in use also bounds it from below, so a number
/// that still belongs to a surviving invoice is never handed out again.
pub fn next_invoice_number(
  existing: &[Invoice],
  year: i32,
) -> Result<InvoiceNumber, ValueObjectError> {
  let of_year = existing.iter().filter(|inv| inv.issue_year() == year);

  let (count, highest) = of_year.fold((0u32, 0u32), |(count, highest), inv| {
    let seq = if inv.number.year() == year {
      inv.number.sequence()
    } else {
      0
    };
    (count + 1, highest.max(seq))
  });

  InvoiceNumber::new(year, count.max(highest) + 1)
}
