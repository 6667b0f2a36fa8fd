//! Import/export views over the directed exchange table.
//!
//! Only one row is stored per flow, oriented however the source reported it.
//! The sign carries the direction: `A -> B` with a negative value is a flow
//! from B to A. Both views below normalize the orientation so every returned
//! edge has a positive value and points in the direction of the flow.

use crate::observation::Exchange;
use crate::query::filter_by_window;
use crate::time::TimeWindow;

/// Flows into `resource_id`, oriented `counterpart -> resource_id`, positive values.
pub fn imports(resource_id: &str, edges: &[Exchange], window: &TimeWindow) -> Vec<Exchange> {
    let oriented = edges.iter().filter_map(|edge| {
        if edge.resource_to_id == resource_id && edge.value > 0.0 {
            Some(edge.clone())
        } else if edge.resource_from_id == resource_id && edge.value < 0.0 {
            Some(edge.reversed())
        } else {
            None
        }
    });
    finish(oriented.collect(), window, |edge| &edge.resource_from_id)
}

/// Flows out of `resource_id`, oriented `resource_id -> counterpart`, positive values.
pub fn exports(resource_id: &str, edges: &[Exchange], window: &TimeWindow) -> Vec<Exchange> {
    let oriented = edges.iter().filter_map(|edge| {
        if edge.resource_from_id == resource_id && edge.value > 0.0 {
            Some(edge.clone())
        } else if edge.resource_to_id == resource_id && edge.value < 0.0 {
            Some(edge.reversed())
        } else {
            None
        }
    });
    finish(oriented.collect(), window, |edge| &edge.resource_to_id)
}

fn finish<F>(edges: Vec<Exchange>, window: &TimeWindow, counterpart: F) -> Vec<Exchange>
where
    F: Fn(&Exchange) -> &String,
{
    let mut kept = filter_by_window(edges, window);
    kept.sort_by(|a, b| {
        a.bucket
            .cmp(&b.bucket)
            .then_with(|| counterpart(a).cmp(counterpart(b)))
    });
    kept
}
