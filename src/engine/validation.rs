use crate::domain::chips::Chips;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::NextSeatAction;
use crate::engine::errors::EngineError;

/// Проверка, входит ли действие в список легальных для текущего игрока.
///
/// Список строит `HandState::prepare_next_action`; здесь только сверка
/// типа действия и суммы с диапазоном.
pub fn validate_action(next: &NextSeatAction, action: &PlayerActionKind) -> Result<(), EngineError> {
    match action {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if next.can_check() {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => match next.call_amount() {
            Some(_) => Ok(()),
            None => Err(EngineError::CannotCall),
        },

        PlayerActionKind::Bet(amount) => {
            let (min, max) = next
                .bet_range()
                .ok_or(EngineError::IllegalAction(*action))?;
            check_range(*amount, min, max)
        }

        PlayerActionKind::Raise(total_bet) => {
            let (min, max) = next
                .raise_range()
                .ok_or(EngineError::IllegalAction(*action))?;
            check_range(*total_bet, min, max)
        }

        PlayerActionKind::AllIn => next
            .all_in_amount()
            .map(|_| ())
            .ok_or(EngineError::IllegalAction(*action)),

        PlayerActionKind::Straddle => next
            .straddle_amount()
            .map(|_| ())
            .ok_or(EngineError::IllegalAction(*action)),
    }
}

fn check_range(amount: Chips, min: Chips, max: Chips) -> Result<(), EngineError> {
    if amount < min {
        return Err(EngineError::RaiseTooSmall { amount, min });
    }
    if amount > max {
        return Err(EngineError::RaiseTooLarge { amount, max });
    }
    Ok(())
}
