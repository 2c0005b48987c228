//! Lifecycle state machine for the trust
//! INIT -> RUN -> CLOSE, with INIT/RUN -> CANCEL as a one-way exit

use anchor_lang::prelude::*;

use crate::error::DatError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatPhase {
  /// Raising toward the init goal
  Init,
  /// Operating; sells follow the bonding curve
  Run,
  /// Terminal; holders redeem the reserve pro-rata
  Cancel,
  /// Terminal; beneficiary exited and the reserve was disbursed
  Close,
}

impl DatPhase {
  pub fn can_transition_to(self, next: DatPhase) -> bool {
    matches!(
      (self, next),
      (DatPhase::Init, DatPhase::Run)
        | (DatPhase::Init, DatPhase::Cancel)
        | (DatPhase::Run, DatPhase::Cancel)
        | (DatPhase::Run, DatPhase::Close)
    )
  }

  /// Total transition function; anything outside the four allowed edges fails
  pub fn transition(self, next: DatPhase) -> Result<DatPhase> {
    require!(self.can_transition_to(next), DatError::InvalidStateTransition);
    Ok(next)
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, DatPhase::Cancel | DatPhase::Close)
  }

  pub fn accepts_buys(self) -> bool {
    matches!(self, DatPhase::Init | DatPhase::Run)
  }

  pub fn accepts_sells(self) -> bool {
    matches!(self, DatPhase::Run | DatPhase::Cancel)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [DatPhase; 4] = [DatPhase::Init, DatPhase::Run, DatPhase::Cancel, DatPhase::Close];

  #[test]
  fn test_allowed_edges() {
    assert_eq!(DatPhase::Init.transition(DatPhase::Run).unwrap(), DatPhase::Run);
    assert_eq!(DatPhase::Init.transition(DatPhase::Cancel).unwrap(), DatPhase::Cancel);
    assert_eq!(DatPhase::Run.transition(DatPhase::Cancel).unwrap(), DatPhase::Cancel);
    assert_eq!(DatPhase::Run.transition(DatPhase::Close).unwrap(), DatPhase::Close);
  }

  #[test]
  fn test_transition_table_is_total() {
    let mut allowed = 0;
    for from in ALL {
      for to in ALL {
        match from.transition(to) {
          Ok(next) => {
            assert_eq!(next, to);
            allowed += 1;
          }
          Err(err) => assert_eq!(err, anchor_lang::error::Error::from(DatError::InvalidStateTransition)),
        }
      }
    }
    assert_eq!(allowed, 4);
  }

  #[test]
  fn test_terminal_phases_have_no_exit() {
    for from in [DatPhase::Cancel, DatPhase::Close] {
      assert!(from.is_terminal());
      for to in ALL {
        assert!(!from.can_transition_to(to));
      }
    }
  }

  #[test]
  fn test_close_only_from_run() {
    assert!(DatPhase::Init.transition(DatPhase::Close).is_err());
    assert!(DatPhase::Run.transition(DatPhase::Init).is_err());
  }

  #[test]
  fn test_phase_capabilities() {
    assert!(DatPhase::Init.accepts_buys() && !DatPhase::Init.accepts_sells());
    assert!(DatPhase::Run.accepts_buys() && DatPhase::Run.accepts_sells());
    assert!(!DatPhase::Cancel.accepts_buys() && DatPhase::Cancel.accepts_sells());
    assert!(!DatPhase::Close.accepts_buys() && !DatPhase::Close.accepts_sells());
  }
}
