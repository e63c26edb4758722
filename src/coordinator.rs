//! Step-end burn checks and switch-driven net reconfiguration.

use crate::bus::{
    self, BurnTracker, BusHandler, ConnectedBusHandler, HandlerId, HandlerKind, HandlerTable,
    SingleBusHandler,
};
use crate::config::BusConfig;
use crate::error::BurnError;
use crate::net::NetId;
use crate::netlist::Netlist;
use crate::switch::SwitchId;
use crate::value::PullResistor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Events delivered by the simulation scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelEvent {
    /// A step has settled.
    Step,
    /// A step was requested but nothing needed an update.
    CheckBurn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    pub steps_flushed: u64,
    pub checks_performed: u64,
    /// Burns that had healed by the end of their step.
    pub transient_burns: u64,
    pub fatal_burns: u64,
    pub rebuilds: u64,
}

/// Per-model owner of the closed-switch set and the pending burn checks.
#[derive(Debug)]
pub struct Coordinator {
    config: BusConfig,
    version: u64,
    pending: Vec<HandlerId>,
    closed: BTreeSet<SwitchId>,
    stats: CoordinatorStats,
}

impl Coordinator {
    pub fn new(config: BusConfig) -> Self {
        Self {
            config,
            version: 0,
            pending: Vec::new(),
            closed: BTreeSet::new(),
            stats: CoordinatorStats::default(),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Incremented once per flushed step; only used to dedup pending checks.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn pending(&self) -> &[HandlerId] {
        &self.pending
    }

    pub fn is_closed(&self, switch: SwitchId) -> bool {
        self.closed.contains(&switch)
    }

    pub fn closed_switches(&self) -> impl Iterator<Item = SwitchId> + '_ {
        self.closed.iter().copied()
    }

    pub fn stats(&self) -> &CoordinatorStats {
        &self.stats
    }

    /// Queues a burning handler for the step-end check, once per version.
    pub(crate) fn register_burn(&mut self, handler: HandlerId, tracker: &mut BurnTracker) {
        if tracker.mark_added(self.version) {
            self.pending.push(handler);
        }
    }

    /// Runs the deferred burn checks at the end of a step.
    ///
    /// Every pending handler is checked and the first failure is returned.
    /// Handlers still burning are queued again for the next step, so a
    /// short keeps failing steps until it is resolved.
    pub fn handle_event(
        &mut self,
        event: ModelEvent,
        netlist: &Netlist,
        handlers: &mut HandlerTable,
    ) -> Result<(), BurnError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending);
        self.version += 1;
        self.stats.steps_flushed += 1;

        let mut first_error = None;
        for id in pending {
            let Some(handler) = handlers.get_mut(id) else {
                continue;
            };
            self.stats.checks_performed += 1;
            match handler.check_burn(netlist) {
                Ok(()) => self.stats.transient_burns += 1,
                Err(e) => {
                    self.stats.fatal_burns += 1;
                    warn!(?event, error = %e, "burn condition survived the step");
                    self.register_burn(id, handler.tracker_mut());
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Opens or closes a switch and rebuilds the merged nets.
    ///
    /// This is the only way switch state changes. Both endpoint nets and
    /// every rebuilt group are recomputed before returning.
    pub fn set_closed(
        &mut self,
        switch: SwitchId,
        closed: bool,
        netlist: &mut Netlist,
        handlers: &mut HandlerTable,
    ) {
        let endpoints = netlist.switch(switch).endpoints();
        if closed {
            self.closed.insert(switch);
        } else {
            self.closed.remove(&switch);
            for net in endpoints {
                reset_handler(net, netlist, handlers);
            }
        }

        let mut recalc = self.reconfigure_nets(netlist, handlers);
        self.pending.retain(|&h| handlers.get(h).is_some());
        for net in endpoints {
            let handler = netlist.net(net).handler();
            if !recalc.contains(&handler) {
                recalc.push(handler);
            }
        }
        self.stats.rebuilds += 1;
        debug!(?switch, closed, recalculated = recalc.len(), "nets reconfigured");

        let mut changed = Vec::new();
        for handler in recalc {
            changed.extend(bus::recalculate(handler, netlist, handlers, self));
        }
        bus::propagate(changed, netlist, handlers, self);
    }

    /// Rebuilds every merged group from the closed-switch set.
    ///
    /// Returns the handlers that were created.
    fn reconfigure_nets(
        &mut self,
        netlist: &mut Netlist,
        handlers: &mut HandlerTable,
    ) -> Vec<HandlerId> {
        let stale = handlers.ids_of_kind(HandlerKind::Connected);
        self.pending.retain(|h| !stale.contains(h));

        let mut net_map: HashMap<NetId, HandlerId> = HashMap::new();
        let mut created: Vec<HandlerId> = Vec::new();

        for &switch in &self.closed {
            let switch = netlist.switch(switch);
            let (left, right) = (switch.left(), switch.right());
            let owner = match (net_map.get(&left).copied(), net_map.get(&right).copied()) {
                (None, None) => {
                    let mut group = ConnectedBusHandler::new(netlist.net(left).width());
                    group.add_net(netlist.net(left));
                    group.add_net(netlist.net(right));
                    let id = handlers.insert(BusHandler::Connected(group));
                    created.push(id);
                    id
                }
                (Some(id), None) | (None, Some(id)) => {
                    let other = if net_map.contains_key(&left) { right } else { left };
                    if let Some(group) = handlers.connected_mut(id) {
                        group.add_net(netlist.net(other));
                    }
                    id
                }
                (Some(keep), Some(absorbed)) if keep != absorbed => {
                    if let Some(BusHandler::Connected(other)) = handlers.remove(absorbed) {
                        for &net in other.nets() {
                            net_map.insert(net, keep);
                        }
                        if let Some(group) = handlers.connected_mut(keep) {
                            group.merge(other);
                        }
                    }
                    created.retain(|&h| h != absorbed);
                    keep
                }
                (Some(id), Some(_)) => id,
            };
            if let Some(group) = handlers.connected_mut(owner) {
                group.add_excludes(switch.terminals());
            }
            net_map.insert(left, owner);
            net_map.insert(right, owner);
        }

        for &id in &created {
            let Some(group) = handlers.connected_mut(id) else {
                continue;
            };
            group.remove_excludes();
            if group.resistor() == PullResistor::Both {
                warn!(
                    handler = ?id,
                    policy = ?self.config.pull_conflict,
                    "pull-up and pull-down joined by a switch"
                );
            }
            let nets = group.nets().to_vec();
            for net in nets {
                let previous = netlist.net(net).handler();
                if matches!(handlers.get(previous), Some(BusHandler::Single(_))) {
                    handlers.remove(previous);
                    self.pending.retain(|&h| h != previous);
                }
                netlist.net_mut(net).install_handler(id);
            }
        }

        // Nets left on a superseded group fall back to their own handler.
        for id in stale {
            if let Some(old) = handlers.remove(id) {
                for &net in old.nets() {
                    if netlist.net(net).handler() == id {
                        let fresh = reset_handler(net, netlist, handlers);
                        created.push(fresh);
                    }
                }
            }
        }

        created
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

/// Installs a fresh single handler on `net`, dropping the previous one
/// unless it is shared with other nets.
fn reset_handler(net: NetId, netlist: &mut Netlist, handlers: &mut HandlerTable) -> HandlerId {
    let previous = netlist.net(net).handler();
    if matches!(handlers.get(previous), Some(BusHandler::Single(_))) {
        handlers.remove(previous);
    }
    let id = handlers.insert(BusHandler::Single(SingleBusHandler::new(netlist.net(net))));
    netlist.net_mut(net).install_handler(id);
    id
}
