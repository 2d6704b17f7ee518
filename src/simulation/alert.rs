//! Base alerts: enemy soldiers inside a base's vision trigger a team-wide warning

use crate::core::types::{CellPos, SimTime, SoldierId};
use crate::entity::base::Base;
use crate::entity::team::RosterLookup;
use crate::simulation::notify::{Notification, NotificationChannel, NotificationKind};

#[derive(Debug, Clone, Copy)]
pub struct BaseAlertSystem {
    cooldown: SimTime,
}

impl BaseAlertSystem {
    pub fn new(cooldown: SimTime) -> Self {
        Self { cooldown }
    }

    /// Look for intruders around `base` and warn its team
    ///
    /// `positions` are the soldiers to consider (normally the alive ones).
    /// Returns true if an alert went out.
    pub fn scan<R: RosterLookup + ?Sized>(
        &self,
        base: &mut Base,
        positions: &[(SoldierId, CellPos)],
        roster: &R,
        channel: &mut NotificationChannel,
        now: SimTime,
    ) -> bool {
        if !base.is_active() {
            return false;
        }
        if let Some(last) = base.last_alert {
            if now - last < self.cooldown {
                return false;
            }
        }

        let intruder = positions.iter().find(|(soldier, pos)| {
            base.position.within(pos, base.vision_range)
                && roster.team_of(*soldier).is_some_and(|team| team != base.team)
        });
        let Some((intruder, at)) = intruder else {
            return false;
        };

        let notification = Notification {
            kind: NotificationKind::BaseUnderAttack,
            position: base.position,
            from: Some(*intruder),
            time: now,
            message: format!("Enemy {} spotted near our base at {}", intruder, at),
        };
        channel.broadcast(roster.members(base.team), &notification);
        base.last_alert = Some(now);
        tracing::debug!(team = %base.team, intruder = %intruder, %at, "Base alert raised");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BaseConfig;
    use crate::core::types::{DamageKind, TeamId};
    use crate::entity::team::Roster;

    fn setup() -> (Base, Roster, NotificationChannel) {
        let base = Base::new(TeamId(0), CellPos::new(5, 5), &BaseConfig::default());
        let mut roster = Roster::new();
        roster.enlist(SoldierId(0), TeamId(0));
        roster.enlist(SoldierId(1), TeamId(0));
        roster.enlist(SoldierId(2), TeamId(1));
        (base, roster, NotificationChannel::new())
    }

    #[test]
    fn test_enemy_in_range_alerts_whole_team() {
        let (mut base, roster, mut channel) = setup();
        let alerts = BaseAlertSystem::new(10.0);
        let positions = [(SoldierId(2), CellPos::new(7, 7))];

        assert!(alerts.scan(&mut base, &positions, &roster, &mut channel, 0.0));
        assert_eq!(channel.pending(SoldierId(0)), 1);
        assert_eq!(channel.pending(SoldierId(1)), 1);
        assert_eq!(channel.pending(SoldierId(2)), 0);
    }

    #[test]
    fn test_cooldown_suppresses_repeat() {
        let (mut base, roster, mut channel) = setup();
        let alerts = BaseAlertSystem::new(10.0);
        let positions = [(SoldierId(2), CellPos::new(5, 6))];

        assert!(alerts.scan(&mut base, &positions, &roster, &mut channel, 0.0));
        assert!(!alerts.scan(&mut base, &positions, &roster, &mut channel, 9.5));
        assert!(alerts.scan(&mut base, &positions, &roster, &mut channel, 10.0));
        assert_eq!(channel.pending(SoldierId(0)), 2);
    }

    #[test]
    fn test_allies_and_distant_enemies_ignored() {
        let (mut base, roster, mut channel) = setup();
        let alerts = BaseAlertSystem::new(10.0);
        // (8, 8) is ~4.24 away, outside vision 4
        let positions = [(SoldierId(1), CellPos::new(5, 6)), (SoldierId(2), CellPos::new(8, 8))];
        assert!(!alerts.scan(&mut base, &positions, &roster, &mut channel, 0.0));
        assert_eq!(channel.pending(SoldierId(0)), 0);
    }

    #[test]
    fn test_inactive_base_is_silent() {
        let (mut base, roster, mut channel) = setup();
        base.take_damage(500, DamageKind::Normal);
        let alerts = BaseAlertSystem::new(10.0);
        let positions = [(SoldierId(2), CellPos::new(5, 6))];
        assert!(!alerts.scan(&mut base, &positions, &roster, &mut channel, 0.0));
    }
}
