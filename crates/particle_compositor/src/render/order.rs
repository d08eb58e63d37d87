//! Draw order resolution for emitters sharing a canvas
//!
//! Emitters are ordered by a layered comparator chain. The first rule that
//! tells two emitters apart decides:
//!
//! 1. Missing material: emitters without a resolvable material go last.
//! 2. Material identity, ascending (only when sorting by material).
//! 3. Render queue, sorting layer value, sorting order, all ascending.
//! 4. View depth (local Z in the view transform plus sorting fudge),
//!    descending, compared with a tolerance.
//! 5. Original index, ascending.
//!
//! Every key is captured once per emitter before sorting, including the
//! original index, so each comparison is O(1).

use std::cmp::Ordering;

use crate::foundation::math::{approximately, Transform};

use super::emitter::{MaterialRef, ParticleEmitter};

/// Comparison key derived from one emitter at sort time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderKey {
    /// Resolved material (primary, else trail)
    pub material: Option<MaterialRef>,
    /// Sorting layer value
    pub sorting_layer_value: i32,
    /// Sorting order
    pub sorting_order: i32,
    /// Local Z in the view transform plus sorting fudge
    pub view_depth: f32,
    /// Position in the input sequence
    pub index: usize,
}

impl OrderKey {
    /// Capture the key for `emitter` at input position `index`
    pub fn capture<E: ParticleEmitter>(emitter: &E, view: &Transform, index: usize) -> Self {
        let local = view.inverse_transform_point(&emitter.world_position());
        Self {
            material: emitter.resolved_material(),
            sorting_layer_value: emitter.sorting_layer_value(),
            sorting_order: emitter.sorting_order(),
            view_depth: local.z + emitter.sorting_fudge(),
            index,
        }
    }
}

/// Compare two keys with the draw-order chain.
///
/// `Less` means `a` is drawn before `b`.
pub fn compare_order_keys(a: &OrderKey, b: &OrderKey, sort_by_material: bool) -> Ordering {
    let (a_material, b_material) = match (a.material, b.material) {
        // Neither can be batched or queued: keep input order
        (None, None) => return a.index.cmp(&b.index),
        // `a` lacks a material: it sinks behind `b`
        (None, Some(_)) => return Ordering::Greater,
        // `b` lacks a material: `a` stays ahead of it
        (Some(_), None) => return Ordering::Less,
        (Some(a_material), Some(b_material)) => (a_material, b_material),
    };

    if sort_by_material {
        return a_material
            .id
            .cmp(&b_material.id)
            .then_with(|| a.index.cmp(&b.index));
    }

    a_material
        .render_queue
        .cmp(&b_material.render_queue)
        .then_with(|| a.sorting_layer_value.cmp(&b.sorting_layer_value))
        .then_with(|| a.sorting_order.cmp(&b.sorting_order))
        .then_with(|| compare_depth_descending(a.view_depth, b.view_depth))
        .then_with(|| a.index.cmp(&b.index))
}

/// Larger depth first; approximately equal depths tie.
fn compare_depth_descending(a: f32, b: f32) -> Ordering {
    if approximately(a, b) {
        return Ordering::Equal;
    }
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sorts emitter sequences into draw order.
///
/// Owns its working arrays so steady-state sorting does not allocate.
/// Not reentrant: one sort at a time per resolver.
#[derive(Debug, Default)]
pub struct RenderOrderResolver {
    keys: Vec<OrderKey>,
    order: Vec<usize>,
    merge_scratch: Vec<usize>,
}

impl RenderOrderResolver {
    /// Create a resolver with empty working arrays
    pub fn new() -> Self {
        Self::default()
    }

    /// Reorder `emitters` in place into draw order.
    ///
    /// Stable: emitters with equal keys keep their relative input order.
    /// Emitter contents are never modified.
    pub fn sort<E: ParticleEmitter>(
        &mut self,
        emitters: &mut [E],
        view: &Transform,
        sort_by_material: bool,
    ) {
        if emitters.len() < 2 {
            return;
        }

        self.keys.clear();
        self.keys.extend(
            emitters
                .iter()
                .enumerate()
                .map(|(index, emitter)| OrderKey::capture(emitter, view, index)),
        );

        self.order.clear();
        self.order.extend(0..emitters.len());

        let keys = &self.keys;
        merge_sort_by(&mut self.order, &mut self.merge_scratch, |&a, &b| {
            compare_order_keys(&keys[a], &keys[b], sort_by_material)
        });

        apply_permutation(emitters, &mut self.order);
        log::trace!("Sorted {} emitters (by material: {})", emitters.len(), sort_by_material);
    }

    /// Keys captured by the last sort, in input order
    pub fn last_keys(&self) -> &[OrderKey] {
        &self.keys
    }
}

/// Sort `emitters` into draw order with a temporary resolver
pub fn sort_for_rendering<E: ParticleEmitter>(
    emitters: &mut [E],
    view: &Transform,
    sort_by_material: bool,
) {
    RenderOrderResolver::new().sort(emitters, view, sort_by_material);
}

/// Bottom-up stable merge sort.
///
/// Tolerates comparators that are not strictly transitive (approximate
/// depth equality) without panicking; it always yields a permutation.
fn merge_sort_by<F>(data: &mut [usize], scratch: &mut Vec<usize>, mut compare: F)
where
    F: FnMut(&usize, &usize) -> Ordering,
{
    let len = data.len();
    if len < 2 {
        return;
    }
    scratch.clear();
    scratch.resize(len, 0);

    let mut width = 1;
    let mut result_in_data = true;
    while width < len {
        if result_in_data {
            merge_pass(data, scratch, width, &mut compare);
        } else {
            merge_pass(scratch, data, width, &mut compare);
        }
        result_in_data = !result_in_data;
        width *= 2;
    }

    if !result_in_data {
        data.copy_from_slice(scratch);
    }
}

fn merge_pass<F>(src: &[usize], dst: &mut [usize], width: usize, compare: &mut F)
where
    F: FnMut(&usize, &usize) -> Ordering,
{
    let len = src.len();
    let mut start = 0;
    while start < len {
        let mid = (start + width).min(len);
        let end = (start + 2 * width).min(len);
        let (mut left, mut right, mut out) = (start, mid, start);

        while left < mid && right < end {
            // Take from the right run only when strictly smaller
            if compare(&src[right], &src[left]) == Ordering::Less {
                dst[out] = src[right];
                right += 1;
            } else {
                dst[out] = src[left];
                left += 1;
            }
            out += 1;
        }

        let rest = mid - left;
        dst[out..out + rest].copy_from_slice(&src[left..mid]);
        out += rest;
        dst[out..end].copy_from_slice(&src[right..end]);

        start = end;
    }
}

/// Move `items[order[i]]` to position `i` for every `i`, following cycles.
///
/// `order` is consumed (left as the identity permutation).
fn apply_permutation<T>(items: &mut [T], order: &mut [usize]) {
    for start in 0..order.len() {
        if order[start] == start {
            continue;
        }
        let mut current = start;
        loop {
            let source = order[current];
            order[current] = current;
            if source == start {
                break;
            }
            items.swap(current, source);
            current = source;
        }
    }
}
