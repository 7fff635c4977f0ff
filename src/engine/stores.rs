//! The shared leaf stores every handler works against.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::board::{Battlefield, UnitInstance};
use crate::catalog::{CardCatalog, CardDef, Keyword};
use crate::combat::{CombatStateStore, DamageResolver, UnitStatusStore};
use crate::core::{InstanceId, InstanceIdGen, MatchRng, PlayerId, PlayerMap, TeamId};
use crate::diplomacy::SharedReactionRegistry;
use crate::error::{EngineError, Result};
use crate::events::{DeterministicEventBus, EventType, GameEvent, ReactionHost};
use crate::player::PlayerState;

use super::clock::{GameMode, GamePhase, MatchStatus, TurnClock};

/// Ledger view handed to listeners while the bus drains.
///
/// Borrows only the player map, so the bus itself stays free to
/// dispatch while reactions move supply around.
pub(crate) struct LedgerHost<'a> {
    pub players: &'a mut PlayerMap<PlayerState>,
}

impl ReactionHost for LedgerHost<'_> {
    fn player_ids(&self) -> Vec<PlayerId> {
        self.players.player_ids().collect()
    }

    fn current_supply(&self, player: PlayerId) -> i32 {
        self.players.get(player).current_supply()
    }

    fn grant_supply(&mut self, player: PlayerId, amount: i32) {
        self.players.get_mut(player).grant_supply(amount);
    }

    fn consume_supply(&mut self, player: PlayerId, amount: i32) -> bool {
        self.players.get_mut(player).consume_supply(amount)
    }
}

/// Every store a match owns. Handlers borrow this mutably for the
/// duration of one operation; nothing here is shared across matches
/// except the immutable catalog.
pub struct MatchStores {
    pub catalog: Arc<CardCatalog>,
    pub mode: GameMode,
    pub players: PlayerMap<PlayerState>,
    pub teams: PlayerMap<TeamId>,
    pub battlefield: Battlefield,
    pub combat: CombatStateStore,
    pub statuses: UnitStatusStore,
    pub bus: DeterministicEventBus,
    pub clock: TurnClock,
    pub diplomacy: SharedReactionRegistry,
    pub resolver: DamageResolver,
    pub attackers_used: FxHashSet<InstanceId>,
    pub instance_ids: InstanceIdGen,
    pub rng: MatchRng,
}

impl MatchStores {
    /// The seat currently holding the turn.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.clock.active_player()
    }

    /// An event stamped with the current turn context.
    #[must_use]
    pub fn new_event(&self, event_type: EventType) -> GameEvent {
        GameEvent::new(
            event_type,
            self.clock.global_turn,
            self.clock.round,
            self.active_player(),
        )
    }

    /// Publish one event and drain the queue to completion.
    ///
    /// Everything listeners publish while handling this event is
    /// processed before `emit` returns, so nested cascades resolve
    /// depth-first relative to this call site.
    pub fn emit(&mut self, event: GameEvent) {
        self.bus.publish(event);
        self.drain_events();
    }

    /// Drain whatever is queued without publishing anything new.
    pub fn drain_events(&mut self) {
        let mut host = LedgerHost {
            players: &mut self.players,
        };
        self.bus.process_queue(&mut host);
    }

    /// Look up a unit's card definition through the catalog.
    pub fn def_of(&self, unit: UnitInstance) -> Result<&CardDef> {
        self.catalog.require(unit.card_id)
    }

    /// Whether a unit's card carries a keyword.
    #[must_use]
    pub fn unit_has_keyword(&self, unit: UnitInstance, keyword: Keyword) -> bool {
        self.catalog.has_keyword(unit.card_id, keyword)
    }

    /// The team a seat plays for.
    #[must_use]
    pub fn team_of(&self, player: PlayerId) -> TeamId {
        *self.teams.get(player)
    }

    /// Whether two seats oppose each other. A seat never opposes itself;
    /// in team mode only cross-team seats are opponents.
    #[must_use]
    pub fn are_opponents(&self, a: PlayerId, b: PlayerId) -> bool {
        if a == b {
            return false;
        }
        if self.mode.is_team_mode() {
            self.team_of(a) != self.team_of(b)
        } else {
            true
        }
    }

    /// Every seat on the same team as `player`, including itself.
    #[must_use]
    pub fn allies_of(&self, player: PlayerId) -> Vec<PlayerId> {
        let team = self.team_of(player);
        self.players
            .player_ids()
            .filter(|&p| self.team_of(p) == team)
            .collect()
    }

    /// Every seat opposing `player`.
    #[must_use]
    pub fn opponents_of(&self, player: PlayerId) -> Vec<PlayerId> {
        self.players
            .player_ids()
            .filter(|&p| self.are_opponents(player, p))
            .collect()
    }

    pub(crate) fn ensure_running(&self) -> Result<()> {
        if self.clock.status != MatchStatus::Running {
            return Err(EngineError::WrongStatus {
                required: MatchStatus::Running,
                actual: self.clock.status,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_phase(&self, expected: GamePhase) -> Result<()> {
        if self.clock.phase != expected {
            return Err(EngineError::WrongPhase {
                actual: self.clock.phase,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_active(&self, player: PlayerId) -> Result<()> {
        if self.active_player() != player {
            return Err(EngineError::NotActivePlayer { player });
        }
        Ok(())
    }
}
