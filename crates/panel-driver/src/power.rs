//! Power sequencing controller
//!
//! Owns the panel's rails for its whole lifetime. Rails come up in
//! declaration order and go down in reverse. Rail status is never cached:
//! every call goes to the regulator.

use panel_hal::Regulator;

use crate::error::{RailError, RailFailures, ResourceError};

/// Named rail handle
pub struct PowerRail<R> {
    /// Supply name from the descriptor.
    pub name: &'static str,
    /// Regulator or GPIO enable.
    pub handle: R,
}

/// Ordered rail set with rollback
pub struct PowerSequencer<R, const N: usize> {
    rails: [PowerRail<R>; N],
}

impl<R: Regulator, const N: usize> PowerSequencer<R, N> {
    /// Pair `names` with `handles` in order.
    pub fn new(names: &[&'static str], handles: [R; N]) -> Result<Self, ResourceError> {
        if names.len() != N {
            return Err(ResourceError::RailCount {
                expected: names.len(),
                found: N,
            });
        }
        let mut names = names.iter().copied();
        let rails = handles.map(|handle| PowerRail {
            name: names.next().unwrap_or("rail"),
            handle,
        });
        Ok(Self { rails })
    }

    /// Rail names in power-up order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rails.iter().map(|r| r.name)
    }

    /// Enable every rail in order.
    ///
    /// On the first failure every rail enabled so far is disabled again in
    /// reverse order and the originating error is returned. Rollback failures
    /// are logged, not returned.
    pub async fn enable_all(&mut self) -> Result<(), RailError<R::Error>> {
        for index in 0..N {
            let Some(rail) = self.rails.get_mut(index) else {
                break;
            };
            debug!("enabling rail {}", rail.name);
            if let Err(cause) = rail.handle.enable().await {
                let name = rail.name;
                warn!("rail {} failed to enable, rolling back {} rail(s)", name, index);
                self.roll_back(index).await;
                return Err(RailError {
                    rail: name,
                    index,
                    cause,
                });
            }
        }
        Ok(())
    }

    async fn roll_back(&mut self, enabled: usize) {
        for rail in self.rails.iter_mut().take(enabled).rev() {
            if rail.handle.disable().await.is_err() {
                error!("rail {} failed to disable during rollback", rail.name);
            }
        }
    }

    /// Disable every rail in reverse order.
    ///
    /// A failing rail does not stop the walk; all failures are collected.
    pub async fn disable_all(&mut self) -> Result<(), RailFailures<R::Error, N>> {
        let mut failures = heapless::Vec::new();
        for (index, rail) in self.rails.iter_mut().enumerate().rev() {
            debug!("disabling rail {}", rail.name);
            if let Err(cause) = rail.handle.disable().await {
                warn!("rail {} failed to disable", rail.name);
                // At most one failure per rail, so this never overflows.
                let _ = failures.push(RailError {
                    rail: rail.name,
                    index,
                    cause,
                });
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(RailFailures::new(failures))
        }
    }

    /// Give the handles back in declaration order.
    pub fn into_handles(self) -> [R; N] {
        self.rails.map(|r| r.handle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use panel_hal::mocks::{Event, Journal, MockError, MockRegulator};

    fn rails(journal: &Journal) -> [MockRegulator; 3] {
        ["vddp", "iovcc", "dcdc-en"].map(|n| MockRegulator::new(n, journal))
    }

    #[tokio::test]
    async fn enables_in_declaration_order() {
        let journal = Journal::new();
        let mut seq = PowerSequencer::new(&["vddp", "iovcc", "dcdc-en"], rails(&journal)).unwrap();
        seq.enable_all().await.unwrap();
        assert_eq!(journal.enabled_rails(), vec!["vddp", "iovcc", "dcdc-en"]);
    }

    #[tokio::test]
    async fn failure_rolls_back_in_reverse() {
        let journal = Journal::new();
        let handles = rails(&journal);
        handles[2].enable_fault().arm();
        let mut seq = PowerSequencer::new(&["vddp", "iovcc", "dcdc-en"], handles).unwrap();

        let err = seq.enable_all().await.unwrap_err();
        assert_eq!(err.rail, "dcdc-en");
        assert_eq!(err.index, 2);
        assert_eq!(err.cause, MockError::Injected);
        assert_eq!(
            journal.events(),
            vec![
                Event::RailEnabled("vddp"),
                Event::RailEnabled("iovcc"),
                Event::RailFailed("dcdc-en"),
                Event::RailDisabled("iovcc"),
                Event::RailDisabled("vddp"),
            ]
        );
        assert!(journal.enabled_rails().is_empty());
    }

    #[tokio::test]
    async fn first_rail_failure_touches_nothing_else() {
        let journal = Journal::new();
        let handles = rails(&journal);
        handles[0].enable_fault().arm();
        let mut seq = PowerSequencer::new(&["vddp", "iovcc", "dcdc-en"], handles).unwrap();
        assert!(seq.enable_all().await.is_err());
        assert_eq!(journal.events(), vec![Event::RailFailed("vddp")]);
    }

    #[tokio::test]
    async fn disable_attempts_every_rail() {
        let journal = Journal::new();
        let handles = rails(&journal);
        handles[1].disable_fault().arm();
        let mut seq = PowerSequencer::new(&["vddp", "iovcc", "dcdc-en"], handles).unwrap();
        seq.enable_all().await.unwrap();
        journal.clear();

        let failures = seq.disable_all().await.unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.iter().next().map(|f| f.rail), Some("iovcc"));
        assert_eq!(
            journal.events(),
            vec![
                Event::RailDisabled("dcdc-en"),
                Event::RailFailed("iovcc"),
                Event::RailDisabled("vddp"),
            ]
        );
    }

    #[test]
    fn rejects_name_count_mismatch() {
        let journal = Journal::new();
        let err = PowerSequencer::new(&["vddp"], rails(&journal)).err();
        assert_eq!(
            err,
            Some(ResourceError::RailCount {
                expected: 1,
                found: 3
            })
        );
    }
}
