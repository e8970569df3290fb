//! Pure aggregation over work lines: pending lines per customer and totals.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::entities::WorkLine;

/// Pending amount of one customer, for the issuance customer picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSummary {
  pub customer_id: Uuid,
  pub line_count: usize,
  pub total: Decimal,
}

/// Groups unbilled lines by customer, keeping the input order inside each
/// group.
pub fn compute_pending_by_customer(lines: &[WorkLine]) -> BTreeMap<Uuid, Vec<WorkLine>> {
  lines
    .iter()
    .filter(|l| !l.is_invoiced())
    .fold(BTreeMap::new(), |mut acc, line| {
      acc
        .entry(line.customer_id)
        .or_insert_with(Vec::new)
        .push(line.clone());
      acc
    })
}

/// Sum of quantity × price. Zero for no lines.
pub fn compute_total<'a, I>(lines: I) -> Decimal
where
  I: IntoIterator<Item = &'a WorkLine>,
{
  lines
    .into_iter()
    .fold(Decimal::ZERO, |acc, line| acc + line.amount())
}

pub fn compute_pending_summaries(lines: &[WorkLine]) -> Vec<PendingSummary> {
  compute_pending_by_customer(lines)
    .into_iter()
    .map(|(customer_id, pending)| PendingSummary {
      customer_id,
      line_count: pending.len(),
      total: compute_total(&pending),
    })
    .collect()
}

/// Lines of one customer, or all of them when no customer is given.
pub fn filter_lines(lines: &[WorkLine], customer_id: Option<Uuid>) -> Vec<WorkLine> {
  lines
    .iter()
    .filter(|l| customer_id.is_none_or(|id| l.customer_id == id))
    .cloned()
    .collect()
}

/// Amount still to be invoiced among `lines`.
pub fn pending_total(lines: &[WorkLine]) -> Decimal {
  compute_total(lines.iter().filter(|l| !l.is_invoiced()))
}

/// Restores the canonical order: work date, then creation time.
pub fn sort_canonical(lines: &mut [WorkLine]) {
  lines.sort_by(WorkLine::canonical_cmp);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::billing::value_objects::{Price, Quantity};
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  fn line(customer_id: Uuid, qty: Decimal, price: Decimal, day: u32) -> WorkLine {
    WorkLine::new(
      customer_id,
      Uuid::new_v4(),
      Quantity::new(qty).unwrap(),
      Price::new(price).unwrap(),
      None,
      NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
    )
  }

  #[test]
  fn test_total_of_empty_is_zero() {
    assert_eq!(compute_total(&Vec::<WorkLine>::new()), Decimal::ZERO);
  }

  #[test]
  fn test_total_is_exact() {
    let c = Uuid::new_v4();
    let lines = vec![
      line(c, dec!(2), dec!(10.00), 1),
      line(c, dec!(1), dec!(5.50), 2),
      line(c, dec!(3), dec!(0.1), 3),
    ];
    assert_eq!(compute_total(&lines), dec!(25.80));

    // 0.1 + 0.2 style sums must not drift
    let drift = vec![line(c, dec!(1), dec!(0.1), 1), line(c, dec!(1), dec!(0.2), 1)];
    assert_eq!(compute_total(&drift), dec!(0.3));
  }

  #[test]
  fn test_pending_excludes_invoiced_lines() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut claimed = line(a, dec!(1), dec!(1), 1);
    claimed.claim(Uuid::new_v4()).unwrap();
    let lines = vec![
      claimed.clone(),
      line(a, dec!(1), dec!(2), 2),
      line(b, dec!(1), dec!(3), 3),
      line(a, dec!(1), dec!(4), 4),
    ];

    let pending = compute_pending_by_customer(&lines);

    assert_eq!(pending.len(), 2);
    assert!(pending.values().flatten().all(|l| !l.is_invoiced()));
    assert!(pending.values().flatten().all(|l| l.id != claimed.id));

    let total_lines: usize = pending.values().map(Vec::len).sum();
    assert_eq!(total_lines, 3);

    let a_ids: Vec<Uuid> = pending[&a].iter().map(|l| l.id).collect();
    assert_eq!(a_ids, vec![lines[1].id, lines[3].id]);
    assert_eq!(pending[&b][0].customer_id, b);
  }

  #[test]
  fn test_pending_summaries() {
    let a = Uuid::new_v4();
    let lines = vec![line(a, dec!(2), dec!(10.00), 1), line(a, dec!(1), dec!(5.50), 2)];

    let summaries = compute_pending_summaries(&lines);

    assert_eq!(
      summaries,
      vec![PendingSummary {
        customer_id: a,
        line_count: 2,
        total: dec!(25.50),
      }]
    );
  }

  #[test]
  fn test_filter_and_pending_total() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut claimed = line(a, dec!(1), dec!(100), 1);
    claimed.claim(Uuid::new_v4()).unwrap();
    let lines = vec![claimed, line(a, dec!(1), dec!(7), 2), line(b, dec!(1), dec!(9), 3)];

    assert_eq!(filter_lines(&lines, None).len(), 3);
    let only_a = filter_lines(&lines, Some(a));
    assert_eq!(only_a.len(), 2);
    assert_eq!(pending_total(&only_a), dec!(7));
    assert_eq!(pending_total(&lines), dec!(16));
  }

  #[test]
  fn test_sort_canonical() {
    let c = Uuid::new_v4();
    let mut lines = vec![line(c, dec!(1), dec!(1), 9), line(c, dec!(1), dec!(1), 3)];
    sort_canonical(&mut lines);
    assert!(lines[0].work_date < lines[1].work_date);
  }
}
