use crate::domain::{SeatIndex, Table};

/// Места по кругу, начиная со следующего за `start` (сам `start` – последним).
pub fn seats_after(start: SeatIndex, max_seats: usize) -> impl Iterator<Item = SeatIndex> {
    let start = start as usize;
    (1..=max_seats).map(move |k| ((start + k) % max_seats) as SeatIndex)
}

/// Найти следующее место по кругу после `start`, удовлетворяющее `pred`.
pub fn next_seat_where<F>(start: SeatIndex, max_seats: usize, pred: F) -> Option<SeatIndex>
where
    F: Fn(SeatIndex) -> bool,
{
    if max_seats == 0 {
        return None;
    }
    seats_after(start, max_seats).find(|&s| pred(s))
}

/// Предложить позицию дилера для новой раздачи:
/// - если была кнопка – следующее место, которое получит карты;
/// - если нет – первое такое место с 0.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    let max = table.seats.len();
    let dealable = |s: SeatIndex| {
        table
            .seats
            .get(s as usize)
            .and_then(|p| p.as_ref())
            .map(|p| p.can_be_dealt_in())
            .unwrap_or(false)
    };

    match table.dealer_button {
        Some(button) => next_seat_where(button, max, dealable),
        // Ищем первый подходящий seat с 0: "после" последнего места идёт 0.
        None if max > 0 => next_seat_where((max - 1) as SeatIndex, max, dealable),
        None => None,
    }
}

/// Упорядочить места по часовой стрелке, начиная с первого слева от кнопки.
pub fn clockwise_from_button(seats: &[SeatIndex], button: SeatIndex, max_seats: usize) -> Vec<SeatIndex> {
    let mut ordered = seats.to_vec();
    let max = max_seats.max(1);
    ordered.sort_by_key(|&s| (s as usize + max - button as usize - 1) % max);
    ordered
}
