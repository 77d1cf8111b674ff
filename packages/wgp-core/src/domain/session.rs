//! Whole-round orchestration.
//!
//! `GameSession` is the only entry point callers use. Each mutation works on
//! clones of the pieces it touches and commits only on success, so a failed
//! action never leaves a half-applied transition behind. Every hole keeps the
//! log of actions it accepted; edits rebuild the session by replaying those
//! logs from the original roster.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::course::Course;
use crate::config::game_rules::GameRules;
use crate::domain::betting::{mark_carry_over, BettingState, CarryOver, CloseReason, SoloVariant};
use crate::domain::hole::{BallProgress, BettingAction, HoleAction, HoleStart, HoleState, HoleStatus};
use crate::domain::phase::{base_wager_for, derive_phase, hitting_order, Phase, PhaseInfo};
use crate::domain::roster::{PlayerId, PlayerSpec, Roster, Standings};
use crate::domain::scoring::{score_hole, HoleOutcome, PointDeltas};
use crate::domain::snapshot::{HoleLog, HoleView, SessionSnapshot, SessionView, SNAPSHOT_VERSION};
use crate::domain::teams::{FormationEvent, Formation};
use crate::errors::domain::{GameError, RuleKind, ValidationKind};

/// Result of completing a hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleSummary {
    pub number: u8,
    pub status: HoleStatus,
    pub outcome: HoleOutcome,
    pub current_wager: u64,
    pub deltas: PointDeltas,
    pub carry_over: Option<CarryOver>,
}

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOutcome {
    pub hole: u8,
    /// Later holes dropped because they no longer replay; the first of them
    /// is the next hole to start.
    pub invalidated: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    rules: GameRules,
    course: Course,
    initial_players: Vec<PlayerSpec>,
    roster: Roster,
    history: Vec<HoleState>,
    current: Option<HoleState>,
    carry_over: Option<CarryOver>,
}

impl GameSession {
    pub fn new(rules: GameRules, course: Course, players: &[PlayerSpec]) -> Result<Self, GameError> {
        rules.validate()?;
        course.validate()?;
        let roster = Roster::new(players)?;
        rules.windows_for(roster.len())?;
        Ok(Self {
            rules,
            course,
            initial_players: roster.specs(),
            roster,
            history: Vec::new(),
            current: None,
            carry_over: None,
        })
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[cfg(test)]
    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn standings(&self) -> Standings {
        self.roster.standings()
    }

    pub fn history(&self) -> &[HoleState] {
        &self.history
    }

    pub fn current_hole(&self) -> Option<&HoleState> {
        self.current.as_ref()
    }

    pub fn carry_over(&self) -> Option<CarryOver> {
        self.carry_over
    }

    /// Number of the open hole, or of the next hole to start.
    pub fn hole_number(&self) -> Result<u8, GameError> {
        u8::try_from(self.history.len() + 1)
            .map_err(|_| GameError::consistency("hole counter overflow"))
    }

    /// Phase of the open hole, or the phase the next hole would start in.
    pub fn phase(&self) -> Result<PhaseInfo, GameError> {
        if let Some(hole) = &self.current {
            return Ok(PhaseInfo {
                phase: hole.phase,
                order_chooser: hole.order_chooser,
            });
        }
        derive_phase(self.hole_number()?, &self.standings(), &self.rules)
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none() && self.history.len() >= self.rules.total_holes as usize
    }

    fn require_current(&self) -> Result<&HoleState, GameError> {
        self.current
            .as_ref()
            .ok_or_else(|| GameError::rule(RuleKind::HoleNotOpen, "no hole is open"))
    }

    pub fn start_hole(&mut self, start: HoleStart) -> Result<(), GameError> {
        if let Some(hole) = &self.current {
            return Err(GameError::rule(
                RuleKind::HoleAlreadyOpen,
                format!("hole {} is still open", hole.number),
            ));
        }
        let number = self.hole_number()?;
        let standings = self.standings();
        let info = derive_phase(number, &standings, &self.rules)?;
        if info.phase == Phase::Complete {
            return Err(GameError::rule(
                RuleKind::GameComplete,
                format!("all {} holes have been played", self.rules.total_holes),
            ));
        }
        let spec = self.course.hole(number)?;
        let rotation = self.roster.rotation_for_hole(number);
        let order = hitting_order(&rotation, &info, start.hitting_position)?;
        let formation = Formation::new(order)?;
        let captain = formation.captain;

        let mut betting = BettingState::open(base_wager_for(info.phase, &self.rules)?);
        if let Some(carry) = self.carry_over {
            betting.apply_carry_over(carry)?;
        }
        if standings.is_strictly_trailing(captain) {
            betting.offer_option(captain);
        }

        let balls = formation
            .order
            .iter()
            .map(|p| (*p, BallProgress::default()))
            .collect();

        info!(
            hole = number,
            captain,
            phase = ?info.phase,
            wager = betting.current_wager,
            carry_over = self.carry_over.is_some(),
            "Hole started"
        );

        self.current = Some(HoleState {
            number,
            par: spec.par,
            stroke_index: spec.stroke_index,
            phase: info.phase,
            order_chooser: info.order_chooser,
            start,
            formation,
            betting,
            balls,
            gross_scores: None,
            net_scores: None,
            conceded_by: None,
            status: HoleStatus::Open,
            outcome: None,
            deltas: None,
            actions: Vec::new(),
        });
        self.carry_over = None;
        Ok(())
    }

    /// Apply one caller action to the open hole.
    pub fn apply(&mut self, action: HoleAction) -> Result<(), GameError> {
        let mut hole = self.require_current()?.clone();
        let mut roster = self.roster.clone();
        if let Err(err) = dispatch(&self.rules, &mut roster, &mut hole, &action) {
            warn!(hole = hole.number, ?action, error = %err, "Action rejected");
            return Err(err);
        }
        debug!(
            hole = hole.number,
            ?action,
            wager = hole.betting.current_wager,
            "Action applied"
        );
        hole.actions.push(action);
        self.roster = roster;
        self.current = Some(hole);
        Ok(())
    }

    /// Score the open hole, archive it and rotate to the next one.
    pub fn complete_hole(&mut self) -> Result<HoleSummary, GameError> {
        let mut hole = self.require_current()?.clone();
        hole.require_teams()?;
        if let Some(offer) = hole.betting.pending_double() {
            return Err(GameError::rule(
                RuleKind::DoubleOffer,
                format!("double offered by player {} is unanswered", offer.by),
            ));
        }
        if !hole.formation.all_placed() {
            return Err(GameError::consistency(format!(
                "hole {} has players without a side",
                hole.number
            )));
        }
        let outcome = hole.decide_outcome()?;
        let standings = self.standings();
        let deltas = score_hole(&hole.formation.teams, &hole.betting, outcome, &standings)?;

        let mut roster = self.roster.clone();
        for (id, delta) in &deltas {
            let side = hole.formation.teams.side_of(*id);
            let player = roster.require_mut(*id)?;
            player.points = player.points.checked_add(*delta)?;
            match outcome {
                HoleOutcome::Halved => player.holes_halved += 1,
                HoleOutcome::Won { winner, .. } if side == Some(winner) => player.holes_won += 1,
                HoleOutcome::Won { .. } => player.holes_lost += 1,
            }
        }
        if let Some(solo) = hole.formation.teams.lone_player() {
            roster.require_mut(solo)?.solo_count += 1;
        }

        if hole.status == HoleStatus::Open {
            hole.status = HoleStatus::Completed;
        }
        hole.outcome = Some(outcome);
        hole.deltas = Some(deltas);
        let summary = self
            .summarize(&hole)
            .ok_or_else(|| GameError::consistency("completed hole has no outcome"))?;
        let carry_over = summary.carry_over;
        info!(
            hole = hole.number,
            ?outcome,
            wager = hole.betting.current_wager,
            carry_over = carry_over.is_some(),
            "Hole completed"
        );

        self.roster = roster;
        self.history.push(hole);
        self.current = None;
        self.carry_over = carry_over;
        Ok(summary)
    }

    /// Replace an archived hole's action log and recompute every later hole.
    ///
    /// The edit is rejected, leaving the session untouched, if the edited hole
    /// itself no longer replays. A later hole that no longer replays (for
    /// example because the trailing player, and so the hitting order, changed)
    /// is invalidated together with everything after it; the session resumes
    /// before that hole, ready to start it under the recomputed standings.
    pub fn edit_hole(
        &mut self,
        number: u8,
        actions: Vec<HoleAction>,
    ) -> Result<EditOutcome, GameError> {
        if number == 0 || number as usize > self.history.len() {
            return Err(GameError::rule(
                RuleKind::Edit,
                format!("hole {number} has not been completed"),
            ));
        }
        let mut logs = self.logs();
        if let Some(log) = logs.iter_mut().find(|l| l.number == number) {
            log.actions = actions;
        }
        let (rebuilt, failure) = Self::replay_prefix(
            self.rules.clone(),
            self.course.clone(),
            &self.initial_players,
            &logs,
        )
        .map_err(|err| GameError::rule(RuleKind::Edit, format!("session does not rebuild: {err}")))?;

        let invalidated = match failure {
            None => Vec::new(),
            Some((hole, err)) if hole <= number => {
                return Err(GameError::rule(
                    RuleKind::Edit,
                    format!("edited hole {number} does not replay: {err}"),
                ));
            }
            Some((hole, err)) => {
                let dropped: Vec<u8> = logs
                    .iter()
                    .map(|l| l.number)
                    .filter(|n| *n >= hole)
                    .collect();
                warn!(
                    hole = number,
                    ?dropped,
                    error = %err,
                    "Edit invalidated later holes"
                );
                dropped
            }
        };
        info!(
            hole = number,
            holes_replayed = logs.len() - invalidated.len(),
            "Hole edited and downstream holes recomputed"
        );
        *self = rebuilt;
        Ok(EditOutcome {
            hole: number,
            invalidated,
        })
    }

    /// Action logs for every archived hole plus the open one.
    pub fn logs(&self) -> Vec<HoleLog> {
        self.history
            .iter()
            .map(|h| HoleLog::from_hole(h, true))
            .chain(self.current.iter().map(|h| HoleLog::from_hole(h, false)))
            .collect()
    }

    fn replay(
        rules: GameRules,
        course: Course,
        players: &[PlayerSpec],
        logs: &[HoleLog],
    ) -> Result<Self, (u8, GameError)> {
        match Self::replay_prefix(rules, course, players, logs) {
            Ok((session, None)) => Ok(session),
            Ok((_, Some(failure))) => Err(failure),
            Err(err) => Err((0, err)),
        }
    }

    /// Replay logs in order, stopping at the first hole that fails. Returns
    /// the session as it stood before that hole plus the failure.
    fn replay_prefix(
        rules: GameRules,
        course: Course,
        players: &[PlayerSpec],
        logs: &[HoleLog],
    ) -> Result<(Self, Option<(u8, GameError)>), GameError> {
        let mut session = Self::new(rules, course, players)?;
        for log in logs {
            let mut next = session.clone();
            if let Err(err) = next.replay_hole(log) {
                return Ok((session, Some((log.number, err))));
            }
            session = next;
        }
        Ok((session, None))
    }

    fn replay_hole(&mut self, log: &HoleLog) -> Result<(), GameError> {
        let expected = self.hole_number()?;
        if log.number != expected {
            return Err(GameError::validation(
                ValidationKind::Snapshot,
                format!("hole log out of sequence: expected hole {expected}"),
            ));
        }
        self.start_hole(log.start)?;
        for action in &log.actions {
            self.apply(action.clone())?;
        }
        if log.completed {
            self.complete_hole()?;
        }
        Ok(())
    }

    fn summarize(&self, hole: &HoleState) -> Option<HoleSummary> {
        let outcome = hole.outcome?;
        Some(HoleSummary {
            number: hole.number,
            status: hole.status,
            outcome,
            current_wager: hole.betting.current_wager,
            deltas: hole.deltas.clone()?,
            carry_over: mark_carry_over(
                hole.number,
                outcome == HoleOutcome::Halved && hole.conceded_by.is_none(),
                &self.rules,
            ),
        })
    }

    pub fn view(&self) -> Result<SessionView, GameError> {
        let info = self.phase()?;
        Ok(SessionView {
            players: self.roster.players().to_vec(),
            phase: info.phase,
            order_chooser: info.order_chooser,
            hole_number: self.hole_number()?,
            holes_completed: self.history.len() as u8,
            current_hole: self.current.as_ref().map(HoleView::from_hole),
            carry_over: self.carry_over,
            history: self
                .history
                .iter()
                .filter_map(|h| self.summarize(h))
                .collect(),
        })
    }

    pub fn serialize(&self) -> Result<SessionSnapshot, GameError> {
        Ok(SessionSnapshot {
            version: SNAPSHOT_VERSION,
            rules: self.rules.clone(),
            course: self.course.clone(),
            players: self.initial_players.clone(),
            log: self.logs(),
            view: self.view()?,
        })
    }

    /// Rebuild a session from a snapshot and check it against the stored view.
    pub fn reconstruct(snapshot: &SessionSnapshot) -> Result<Self, GameError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GameError::validation(
                ValidationKind::Snapshot,
                format!(
                    "snapshot version {} is not supported (expected {SNAPSHOT_VERSION})",
                    snapshot.version
                ),
            ));
        }
        let session = Self::replay(
            snapshot.rules.clone(),
            snapshot.course.clone(),
            &snapshot.players,
            &snapshot.log,
        )
        .map_err(|(hole, err)| {
            GameError::validation(
                ValidationKind::Snapshot,
                format!("snapshot does not replay at hole {hole}: {err}"),
            )
        })?;
        if session.view()? != snapshot.view {
            return Err(GameError::validation(
                ValidationKind::Snapshot,
                "snapshot state disagrees with its action log",
            ));
        }
        Ok(session)
    }
}

/// The single place every action kind is routed.
fn dispatch(
    rules: &GameRules,
    roster: &mut Roster,
    hole: &mut HoleState,
    action: &HoleAction,
) -> Result<(), GameError> {
    hole.require_open()?;
    match action {
        HoleAction::RecordShot {
            player,
            distance_remaining,
            lie,
        } => {
            roster.require(*player)?;
            if hole.record_shot(*player, *distance_remaining, *lie)? {
                close_wagering(hole, CloseReason::BallHoled)?;
            }
        }
        HoleAction::RequestPartnership { captain, candidate } => {
            require_wagering_open(hole)?;
            roster.require(*captain)?;
            roster.require(*candidate)?;
            let balls = &hole.balls;
            hole.formation.request_partnership(*captain, *candidate, |p| {
                balls.get(&p).is_some_and(|b| b.shots > 0)
            })?;
        }
        HoleAction::RespondPartnership { candidate, accept } => {
            require_wagering_open(hole)?;
            let event = hole.formation.respond_partnership(*candidate, *accept)?;
            after_formation(hole, event)?;
        }
        HoleAction::WithdrawPartnership { captain } => {
            hole.formation.withdraw_offer(*captain)?;
        }
        HoleAction::GoSolo { captain } => {
            require_wagering_open(hole)?;
            let event = hole.formation.go_solo(*captain)?;
            after_formation(hole, event)?;
        }
        HoleAction::AardvarkRequestJoin { aardvark, team } => {
            require_wagering_open(hole)?;
            hole.formation.aardvark_request_join(*aardvark, *team)?;
        }
        HoleAction::AardvarkRespond {
            aardvark,
            by,
            accept,
        } => {
            require_wagering_open(hole)?;
            if let FormationEvent::AardvarkTossed { aardvark, by_team } =
                hole.formation.aardvark_respond(*aardvark, *by, *accept)?
            {
                hole.betting.record_toss(aardvark, by_team)?;
            }
        }
        HoleAction::AardvarkGoSolo { aardvark } => {
            require_wagering_open(hole)?;
            let event = hole.formation.aardvark_go_solo(*aardvark)?;
            after_formation(hole, event)?;
        }
        HoleAction::Betting(betting) => dispatch_betting(rules, roster, hole, betting)?,
        HoleAction::Concede { by } => {
            if hole.gross_scores.is_some() {
                return Err(GameError::rule(
                    RuleKind::HoleNotOpen,
                    "scores are already entered; the hole cannot be conceded",
                ));
            }
            let side = hole.require_side(*by)?;
            hole.conceded_by = Some(side);
            hole.status = HoleStatus::Conceded;
            close_wagering(hole, CloseReason::Conceded)?;
        }
        HoleAction::EnterScores { scores } => {
            if let Some(offer) = hole.betting.pending_double() {
                return Err(GameError::rule(
                    RuleKind::DoubleOffer,
                    format!("double offered by player {} is unanswered", offer.by),
                ));
            }
            hole.enter_scores(scores, roster, rules.max_gross_score)?;
            close_wagering(hole, CloseReason::ScoresEntered)?;
        }
    }
    Ok(())
}

fn dispatch_betting(
    rules: &GameRules,
    roster: &mut Roster,
    hole: &mut HoleState,
    action: &BettingAction,
) -> Result<(), GameError> {
    match action {
        BettingAction::Double { by } => {
            let side = hole.require_side(*by)?;
            hole.betting.double(*by, side)?;
        }
        BettingAction::OfferDouble { by } => {
            let side = hole.require_side(*by)?;
            hole.betting.offer_double(*by, side)?;
        }
        BettingAction::RespondDouble { by, accept } => {
            let side = hole.require_side(*by)?;
            hole.betting.respond_double(*by, side, *accept)?;
            if !accept {
                hole.conceded_by = Some(side);
                hole.status = HoleStatus::Conceded;
                close_wagering(hole, CloseReason::DoubleDeclined)?;
            }
        }
        BettingAction::Float { by } => {
            let already_used = roster.require(*by)?.float_used;
            let captain = hole.captain();
            hole.betting.float(*by, captain, already_used)?;
            roster.require_mut(*by)?.float_used = true;
        }
        BettingAction::ApplyOption { captain } => {
            require_captain(hole, *captain)?;
            hole.betting.apply_option(*captain)?;
        }
        BettingAction::DisableOption { captain } => {
            require_captain(hole, *captain)?;
            hole.betting.disable_option(*captain)?;
        }
        BettingAction::SoloMultiplier { player } => {
            require_wagering_open(hole)?;
            let (event, variant) = if *player == hole.captain() {
                (hole.formation.go_solo(*player)?, SoloVariant::Duncan)
            } else if hole.formation.is_aardvark(*player) {
                (
                    hole.formation.aardvark_go_solo(*player)?,
                    SoloVariant::Tunkarri,
                )
            } else {
                return Err(GameError::rule(
                    RuleKind::SoloMultiplier,
                    format!("player {player} is neither the Captain nor an aardvark"),
                ));
            };
            hole.betting.invoke_solo_multiplier(*player, variant)?;
            after_formation(hole, event)?;
        }
        BettingAction::FixedValue { by, value } => {
            roster.require(*by)?;
            if hole.formation.teams.is_formed() {
                return Err(GameError::rule(
                    RuleKind::FixedValue,
                    "the hole value must be fixed before teams form",
                ));
            }
            hole.betting
                .set_fixed_value(*by, *value, hole.phase, hole.order_chooser, rules)?;
        }
    }
    Ok(())
}

fn require_captain(hole: &HoleState, player: PlayerId) -> Result<(), GameError> {
    if player != hole.captain() {
        return Err(GameError::rule(
            RuleKind::NotCaptain,
            format!("player {player} is not the Captain"),
        ));
    }
    Ok(())
}

fn require_wagering_open(hole: &HoleState) -> Result<(), GameError> {
    if hole.betting.is_closed() {
        return Err(GameError::rule(
            RuleKind::WageringClosed,
            "wagering is closed for this hole",
        ));
    }
    Ok(())
}

fn after_formation(hole: &mut HoleState, event: FormationEvent) -> Result<(), GameError> {
    let captain = hole.captain();
    if event.formed_teams() && hole.betting.on_teams_formed(captain)? {
        debug!(
            hole = hole.number,
            captain,
            wager = hole.betting.current_wager,
            "Option applied as teams formed"
        );
    }
    Ok(())
}

fn close_wagering(hole: &mut HoleState, reason: CloseReason) -> Result<(), GameError> {
    if let Some(event) = hole.formation.default_captain_solo()? {
        warn!(
            hole = hole.number,
            captain = hole.captain(),
            ?reason,
            "Wagering closed before teams formed; Captain plays alone"
        );
        after_formation(hole, event)?;
    }
    let placed = hole.formation.resolve_unplaced_aardvarks()?;
    if !placed.is_empty() {
        warn!(
            hole = hole.number,
            ?placed,
            "Undecided aardvarks placed against the Captain"
        );
    }
    hole.betting.close(reason);
    Ok(())
}
