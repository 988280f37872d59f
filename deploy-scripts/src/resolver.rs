//! Derives a valid deployment order from a rollout plan.
//!
//! A component must be deployed after every component its arguments
//! reference. The resolver validates the plan's reference graph and produces
//! a topological order over it; ties are broken by declaration order so the
//! derived schedule is identical on every run.

use std::collections::HashMap;

use deploy_common::types::{ArgTemplate, Plan};

use crate::errors::ScriptError;

/// Validate `plan` and produce its component deployment order.
///
/// Fails with [`ScriptError::DuplicateComponent`],
/// [`ScriptError::UnknownReference`], or [`ScriptError::DependencyCycle`];
/// no remote call is ever made against a plan that fails here.
pub fn resolve(plan: &Plan) -> Result<Vec<String>, ScriptError> {
    let mut positions = HashMap::new();
    for (position, component) in plan.components.iter().enumerate() {
        if positions.insert(component.id.as_str(), position).is_some() {
            return Err(ScriptError::DuplicateComponent(component.id.clone()));
        }
    }

    // deps[i] holds the positions of the components referenced by component i
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); plan.components.len()];
    for (position, component) in plan.components.iter().enumerate() {
        for arg in &component.args {
            if let ArgTemplate::Reference(target) = arg {
                let target_position = *positions.get(target.as_str()).ok_or_else(|| {
                    ScriptError::UnknownReference {
                        component: component.id.clone(),
                        missing: target.clone(),
                    }
                })?;
                deps[position].push(target_position);
            }
        }
    }

    // Wiring calls execute after all deployments, so they impose no ordering
    // edges, but their targets and references must still exist in the plan
    for call in &plan.wiring {
        if !positions.contains_key(call.target.as_str()) {
            return Err(ScriptError::UnknownReference {
                component: format!("wiring call {}", call.method),
                missing: call.target.clone(),
            });
        }
        for arg in &call.args {
            if let ArgTemplate::Reference(target) = arg {
                if !positions.contains_key(target.as_str()) {
                    return Err(ScriptError::UnknownReference {
                        component: format!("wiring call {}", call.method),
                        missing: target.clone(),
                    });
                }
            }
        }
    }

    // Repeatedly place the first (in declaration order) component whose
    // references are all placed; failure to make progress means a cycle
    let total = plan.components.len();
    let mut placed = vec![false; total];
    let mut order = Vec::with_capacity(total);
    while order.len() < total {
        let next = (0..total)
            .find(|&position| !placed[position] && deps[position].iter().all(|&dep| placed[dep]));
        match next {
            Some(position) => {
                placed[position] = true;
                order.push(plan.components[position].id.clone());
            }
            None => return Err(ScriptError::DependencyCycle(find_cycle(plan, &deps, &placed))),
        }
    }

    Ok(order)
}

/// Recover one concrete cycle from the unresolved remainder of the graph.
///
/// Every unplaced component has at least one unplaced reference, so walking
/// unplaced references from any unplaced start must revisit a component.
fn find_cycle(plan: &Plan, deps: &[Vec<usize>], placed: &[bool]) -> Vec<String> {
    let mut path: Vec<usize> = Vec::new();
    let mut visited_at: HashMap<usize, usize> = HashMap::new();
    let mut current = match (0..placed.len()).find(|&position| !placed[position]) {
        Some(position) => position,
        None => return Vec::new(),
    };

    loop {
        if let Some(&start) = visited_at.get(&current) {
            return path[start..]
                .iter()
                .map(|&position| plan.components[position].id.clone())
                .collect();
        }
        visited_at.insert(current, path.len());
        path.push(current);

        match deps[current].iter().find(|&&dep| !placed[dep]) {
            Some(&dep) => current = dep,
            // Unreachable when the caller's invariant holds; report the path
            None => {
                return path
                    .iter()
                    .map(|&position| plan.components[position].id.clone())
                    .collect()
            }
        }
    }
}
