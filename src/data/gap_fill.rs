use crate::error::{DemandError, Result};
use crate::types::{DailyObservation, DailySeries};

/// Reindex observations onto every calendar day between their first and last date.
///
/// Days without a row get zero quantity and value. `item_price` is carried
/// forward from the most recent known price; before the first known price it
/// stays `None`.
///
/// # Arguments
/// * `item` - Item name for the resulting series
/// * `observations` - Rows with strictly increasing dates, gaps allowed
pub fn fill_time_series(item: &str, observations: &[DailyObservation]) -> Result<DailySeries> {
    let (first, last) = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => {
            return Err(DemandError::InvalidInput(format!(
                "Cannot fill an empty series for '{}'",
                item
            )))
        }
    };

    for pair in observations.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DemandError::InvalidInput(format!(
                "Observations for '{}' must have strictly increasing dates: {} followed by {}",
                item, pair[0].date, pair[1].date
            )));
        }
    }

    let span = (last - first).num_days() as usize + 1;
    let mut filled = Vec::with_capacity(span);
    let mut last_price: Option<f64> = None;
    let mut rows = observations.iter().peekable();

    for date in first.iter_days().take(span) {
        let row = match rows.next_if(|o| o.date == date) {
            Some(observed) => {
                let price = observed.item_price.or(last_price);
                DailyObservation::new(date, observed.sales_qty, observed.sales_value, price)
            }
            None => DailyObservation::no_sale(date, last_price),
        };
        last_price = row.item_price;
        filled.push(row);
    }

    let inserted = span - observations.len();
    if inserted > 0 {
        log::debug!(
            "Filled {} missing days for '{}' between {} and {}",
            inserted,
            item,
            first,
            last
        );
    }

    DailySeries::new(item, filled)
}
