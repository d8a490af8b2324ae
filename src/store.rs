// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sign state store.
//!
//! `SignStore` is the single owner of the `HoleSignState`. Every component
//! reads through `state()` and changes it only through the mutators below.
//! Listeners registered with `subscribe` run synchronously after each
//! mutation that actually changed something, so they always observe the
//! new state before the mutator returns.

use crate::models::{
    marker::{BasketMarker, BasketMarkerUpdate, MarkerId, Position, TeeMarker, TeeMarkerUpdate},
    sign::HoleSignState,
};

/// Callback invoked with the new state after a mutation.
pub type Listener = Box<dyn FnMut(&HoleSignState)>;

/// Owner of the sign state.
#[derive(Default)]
pub struct SignStore {
    state: HoleSignState,
    listeners: Vec<Listener>,
}

impl SignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &HoleSignState {
        &self.state
    }

    /// Register a listener that runs after every effective mutation.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    fn notify(&mut self) {
        let state = &self.state;
        for listener in self.listeners.iter_mut() {
            listener(state);
        }
    }

    /// Replace the hole number. Callers validate first.
    pub fn set_hole_number(&mut self, hole_number: u32) {
        self.state.hole_number = hole_number;
        self.notify();
    }

    /// Replace the course image reference. `None` returns to the upload screen.
    pub fn set_uploaded_image(&mut self, image: Option<String>) {
        self.state.uploaded_image = image;
        self.notify();
    }

    /// Replace the tee marker wholesale.
    pub fn set_tee_marker(&mut self, marker: Option<TeeMarker>) {
        self.state.tee_marker = marker;
        self.notify();
    }

    /// Merge a partial update into the tee marker, if one exists.
    pub fn update_tee_marker(&mut self, update: TeeMarkerUpdate) {
        match self.state.tee_marker.as_mut() {
            Some(tee) => {
                tee.apply(&update);
                self.notify();
            }
            None => log::debug!("Ignoring tee update, no tee placed"),
        }
    }

    /// Move the tee marker, keeping it on the image.
    pub fn move_tee_marker(&mut self, position: Position) {
        self.update_tee_marker(TeeMarkerUpdate {
            position: Some(Position::clamped(position.x, position.y)),
            ..Default::default()
        });
    }

    /// Append a basket marker. No cap or color check at this layer.
    pub fn add_basket_marker(&mut self, marker: BasketMarker) {
        self.state.basket_markers.push(marker);
        self.notify();
    }

    /// Merge a partial update into the basket with the given id.
    pub fn update_basket_marker(&mut self, id: MarkerId, update: BasketMarkerUpdate) {
        match self.state.basket_markers.iter_mut().find(|b| b.id == id) {
            Some(basket) => {
                basket.apply(&update);
                self.notify();
            }
            None => log::debug!("Ignoring update for unknown basket {}", id),
        }
    }

    /// Move a basket marker, keeping it on the image.
    pub fn move_basket_marker(&mut self, id: MarkerId, position: Position) {
        self.update_basket_marker(
            id,
            BasketMarkerUpdate {
                position: Some(Position::clamped(position.x, position.y)),
                ..Default::default()
            },
        );
    }

    /// Remove the basket with the given id, keeping the order of the rest.
    pub fn remove_basket_marker(&mut self, id: MarkerId) {
        let before = self.state.basket_markers.len();
        self.state.basket_markers.retain(|b| b.id != id);
        if self.state.basket_markers.len() != before {
            self.notify();
        }
    }

    /// Remove every marker. Hole number and image are kept.
    pub fn clear_markers(&mut self) {
        self.state.tee_marker = None;
        self.state.basket_markers.clear();
        self.notify();
    }

    /// Restore the initial state.
    pub fn reset(&mut self) {
        self.state = HoleSignState::default();
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marker::{BasketColor, Par};
    use std::cell::Cell;
    use std::rc::Rc;

    fn basket(color: BasketColor) -> BasketMarker {
        BasketMarker::new(color, Position::new(60.0, 60.0), Par::Three, 250)
    }

    #[test]
    fn test_initial_state() {
        let store = SignStore::new();
        assert_eq!(store.state(), &HoleSignState::default());
        assert_eq!(store.state().hole_number, 1);
        assert!(store.state().uploaded_image.is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = SignStore::new();
        store.set_hole_number(9);
        store.set_uploaded_image(Some("course.png".into()));
        store.set_tee_marker(Some(TeeMarker::new(Position::new(1.0, 2.0))));
        store.add_basket_marker(basket(BasketColor::Red));

        store.reset();

        let state = store.state();
        assert_eq!(state.hole_number, 1);
        assert!(state.uploaded_image.is_none());
        assert!(state.tee_marker.is_none());
        assert!(state.basket_markers.is_empty());
    }

    #[test]
    fn test_tee_marker_set_then_clear() {
        let mut store = SignStore::new();
        store.set_tee_marker(Some(TeeMarker::new(Position::new(50.0, 50.0))));
        assert!(store.state().tee_marker.is_some());
        store.set_tee_marker(None);
        assert!(store.state().tee_marker.is_none());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = SignStore::new();
        let a = basket(BasketColor::Red);
        let b = basket(BasketColor::White);
        let a_id = a.id;
        store.add_basket_marker(a);
        store.add_basket_marker(b.clone());

        store.remove_basket_marker(a_id);

        assert_eq!(store.state().basket_markers, vec![b]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = SignStore::new();
        store.add_basket_marker(basket(BasketColor::Blue));
        let before = store.state().clone();
        store.remove_basket_marker(MarkerId::new_v4());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_update_changes_only_par() {
        let mut store = SignStore::new();
        let original = basket(BasketColor::White);
        let id = original.id;
        store.add_basket_marker(original.clone());

        store.update_basket_marker(
            id,
            BasketMarkerUpdate {
                par: Some(Par::Four),
                ..Default::default()
            },
        );

        let updated = store.state().basket(id).unwrap();
        assert_eq!(updated.par, Par::Four);
        assert_eq!(updated.position, original.position);
        assert_eq!(updated.color, original.color);
        assert_eq!(updated.distance, original.distance);
        assert_eq!(updated.label, original.label);
    }

    #[test]
    fn test_update_unknown_id_leaves_state() {
        let mut store = SignStore::new();
        store.add_basket_marker(basket(BasketColor::Red));
        let before = store.state().clone();
        store.update_basket_marker(
            MarkerId::new_v4(),
            BasketMarkerUpdate {
                par: Some(Par::Five),
                ..Default::default()
            },
        );
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_clear_markers_keeps_hole_and_image() {
        let mut store = SignStore::new();
        store.set_hole_number(7);
        store.set_uploaded_image(Some("course.jpg".into()));
        store.set_tee_marker(Some(TeeMarker::new(Position::new(50.0, 50.0))));
        store.add_basket_marker(basket(BasketColor::Red));

        store.clear_markers();

        let state = store.state();
        assert!(state.tee_marker.is_none());
        assert!(state.basket_markers.is_empty());
        assert_eq!(state.hole_number, 7);
        assert_eq!(state.uploaded_image.as_deref(), Some("course.jpg"));
    }

    #[test]
    fn test_move_markers_clamps() {
        let mut store = SignStore::new();
        store.set_tee_marker(Some(TeeMarker::new(Position::new(50.0, 50.0))));
        let b = basket(BasketColor::Blue);
        let id = b.id;
        store.add_basket_marker(b);

        store.move_tee_marker(Position::new(120.0, -5.0));
        store.move_basket_marker(id, Position::new(33.0, 101.0));

        assert_eq!(store.state().tee_marker.as_ref().unwrap().position, Position::new(100.0, 0.0));
        assert_eq!(store.state().basket(id).unwrap().position, Position::new(33.0, 100.0));
    }

    #[test]
    fn test_update_tee_without_tee_is_noop() {
        let mut store = SignStore::new();
        store.update_tee_marker(TeeMarkerUpdate {
            rotation: Some(45),
            ..Default::default()
        });
        assert!(store.state().tee_marker.is_none());
    }

    #[test]
    fn test_listeners_see_new_state_synchronously() {
        let mut store = SignStore::new();
        let seen = Rc::new(Cell::new(0u32));
        let calls = Rc::new(Cell::new(0u32));
        let (seen_in, calls_in) = (Rc::clone(&seen), Rc::clone(&calls));
        store.subscribe(Box::new(move |state| {
            seen_in.set(state.hole_number);
            calls_in.set(calls_in.get() + 1);
        }));

        store.set_hole_number(12);
        assert_eq!(seen.get(), 12);
        assert_eq!(calls.get(), 1);

        // No-op mutations do not notify.
        store.update_basket_marker(MarkerId::new_v4(), BasketMarkerUpdate::default());
        store.remove_basket_marker(MarkerId::new_v4());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_independent_instances() {
        let mut first = SignStore::new();
        let second = SignStore::new();
        first.set_hole_number(18);
        assert_eq!(second.state().hole_number, 1);
    }
}
