//! Scene: an ordered, immutable collection of elements.
//!
//! Every mutation returns a new [`Scene`]; the receiver is never touched.
//! Lookups go through ids so a caller holding an old element copy can never
//! alias the live one.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::geom::{Bounds, Point};
use crate::order::{OrderKey, key_between};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    elements: Vec<Element>,
}

impl Scene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene holding `elements` in the given order. Later duplicates of an
    /// id replace earlier ones.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        elements.into_iter().fold(Self::new(), |scene, el| scene.add_element(el))
    }

    // --- Queries ---

    /// Every element, including soft-deleted ones, in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by id, deleted or not.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Look up an element by id, only if it is not soft-deleted.
    #[must_use]
    pub fn active_element(&self, id: ElementId) -> Option<&Element> {
        self.element(id).filter(|el| el.is_active())
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Elements that are not soft-deleted, in insertion order.
    pub fn active_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| el.is_active())
    }

    /// Every element sorted by order key; unkeyed elements sort last and
    /// ties keep insertion order.
    #[must_use]
    pub fn ordered_elements(&self) -> Vec<&Element> {
        let mut out: Vec<&Element> = self.elements.iter().collect();
        out.sort_by(|a, b| match (&a.order_index, &b.order_index) {
            (Some(ka), Some(kb)) => ka.cmp(kb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        out
    }

    /// Active elements whose bounds contain `p`, topmost first.
    ///
    /// Bounding-box test only: an element's rotation is not compensated.
    #[must_use]
    pub fn elements_at_point(&self, p: Point) -> Vec<&Element> {
        let mut hits: Vec<&Element> = self
            .ordered_elements()
            .into_iter()
            .filter(|el| el.is_active() && el.bounds().contains_point(p))
            .collect();
        hits.reverse();
        hits
    }

    /// Topmost active element whose bounds contain `p`.
    #[must_use]
    pub fn element_at_point(&self, p: Point) -> Option<&Element> {
        self.elements_at_point(p).into_iter().next()
    }

    /// Active elements whose bounds lie entirely inside `area`.
    #[must_use]
    pub fn elements_in_bounds(&self, area: &Bounds) -> Vec<&Element> {
        self.active_elements().filter(|el| area.contains_bounds(&el.bounds())).collect()
    }

    /// Union of the rotated bounding boxes of the given active elements.
    #[must_use]
    pub fn union_bounds(&self, ids: &[ElementId]) -> Option<Bounds> {
        ids.iter()
            .filter_map(|id| self.active_element(*id))
            .map(Element::aabb)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Active text bound inside `container`.
    #[must_use]
    pub fn bound_text_of(&self, container: ElementId) -> Option<&Element> {
        self.active_elements().find(|el| el.container_id() == Some(container))
    }

    /// Active elements clipped to `frame`.
    #[must_use]
    pub fn frame_children(&self, frame: ElementId) -> Vec<&Element> {
        self.active_elements().filter(|el| el.frame_id == Some(frame)).collect()
    }

    /// Highest order key in the scene, if any element has one.
    #[must_use]
    pub fn max_order_key(&self) -> Option<&OrderKey> {
        self.elements.iter().filter_map(|el| el.order_index.as_ref()).max()
    }

    /// A key above every existing key.
    #[must_use]
    pub fn next_order_key(&self) -> Option<OrderKey> {
        key_between(self.max_order_key(), None)
    }

    // --- Mutations (all by copy) ---

    /// Insert `element`, replacing any element with the same id in place.
    #[must_use]
    pub fn add_element(&self, element: Element) -> Scene {
        let mut elements = self.elements.clone();
        match elements.iter_mut().find(|el| el.id == element.id) {
            Some(slot) => *slot = element,
            None => elements.push(element),
        }
        Scene { elements }
    }

    /// Store a new version of an existing element. The stored copy's
    /// version is always strictly greater than the one it replaces. Unknown
    /// ids leave the scene unchanged.
    #[must_use]
    pub fn update_element(&self, element: Element) -> Scene {
        self.update_elements(std::iter::once(element))
    }

    /// Batch form of [`Scene::update_element`].
    #[must_use]
    pub fn update_elements(&self, updates: impl IntoIterator<Item = Element>) -> Scene {
        let mut elements = self.elements.clone();
        for update in updates {
            if let Some(slot) = elements.iter_mut().find(|el| el.id == update.id) {
                let prior_version = slot.version;
                let mut next = update;
                if next.version <= prior_version {
                    next.version = prior_version;
                    next.bump_version();
                }
                *slot = next;
            }
        }
        Scene { elements }
    }

    /// Drop an element entirely.
    #[must_use]
    pub fn remove_element(&self, id: ElementId) -> Scene {
        Scene { elements: self.elements.iter().filter(|el| el.id != id).cloned().collect() }
    }

    /// Tombstone an element, bumping its version. Already-deleted or unknown
    /// ids leave the scene unchanged.
    #[must_use]
    pub fn soft_delete_element(&self, id: ElementId) -> Scene {
        let Some(current) = self.active_element(id) else {
            return self.clone();
        };
        let mut tomb = current.clone();
        tomb.is_deleted = true;
        tomb.bump_version();
        self.update_element(tomb)
    }
}
