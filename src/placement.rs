// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker placement state machine.
//!
//! The controller tracks which marker type, if any, the next canvas click
//! will create. A click inside the image commits the marker to the store
//! and returns to idle. A click outside the image returns to idle without
//! touching the store.

use crate::models::{
    marker::{BasketColor, BasketMarker, MarkerId, Par, TeeMarker},
    sign::HoleSignState,
};
use crate::store::SignStore;
use crate::util::geometry::pointer_to_position;

/// Maximum number of basket markers the placement flow allows.
pub const MAX_BASKETS: usize = 3;
pub const DEFAULT_PAR: Par = Par::Three;
pub const DEFAULT_DISTANCE: u32 = 200;

/// What the next canvas click will place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    #[default]
    Idle,
    PlacingTee,
    PlacingBasket(BasketColor),
}

/// Reasons a placement cannot start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("a tee marker is already placed")]
    TeeAlreadyPlaced,
    #[error("at most three basket markers can be placed")]
    BasketLimitReached,
    #[error("another placement is in progress ({0:?})")]
    PlacementInProgress(PlacementMode),
}

/// Marker committed by a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placed {
    Tee(MarkerId),
    Basket(MarkerId),
}

/// Drives placement mode transitions.
#[derive(Debug, Default)]
pub struct PlacementController {
    mode: PlacementMode,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn is_placing(&self) -> bool {
        self.mode != PlacementMode::Idle
    }

    /// Whether the tee placement action is currently available.
    pub fn can_begin_tee(&self, state: &HoleSignState) -> bool {
        self.check_tee(state).is_ok()
    }

    /// Whether the basket placement actions are currently available.
    pub fn can_begin_basket(&self, state: &HoleSignState) -> bool {
        self.check_basket(state).is_ok()
    }

    fn check_idle(&self) -> Result<(), PlacementError> {
        match self.mode {
            PlacementMode::Idle => Ok(()),
            mode => Err(PlacementError::PlacementInProgress(mode)),
        }
    }

    fn check_tee(&self, state: &HoleSignState) -> Result<(), PlacementError> {
        self.check_idle()?;
        if state.tee_marker.is_some() {
            return Err(PlacementError::TeeAlreadyPlaced);
        }
        Ok(())
    }

    fn check_basket(&self, state: &HoleSignState) -> Result<(), PlacementError> {
        self.check_idle()?;
        if state.basket_markers.len() >= MAX_BASKETS {
            return Err(PlacementError::BasketLimitReached);
        }
        Ok(())
    }

    /// Enter tee placement mode.
    pub fn begin_tee(&mut self, state: &HoleSignState) -> Result<(), PlacementError> {
        self.check_tee(state)?;
        self.mode = PlacementMode::PlacingTee;
        log::debug!("Placing tee marker");
        Ok(())
    }

    /// Enter basket placement mode for the given color.
    pub fn begin_basket(&mut self, color: BasketColor, state: &HoleSignState) -> Result<(), PlacementError> {
        self.check_basket(state)?;
        self.mode = PlacementMode::PlacingBasket(color);
        log::debug!("Placing {} basket marker", color.style().name);
        Ok(())
    }

    /// Leave placement mode without placing anything.
    pub fn cancel(&mut self) {
        self.mode = PlacementMode::Idle;
    }

    /// Handle a click on the canvas.
    ///
    /// `image_rect` is the on-screen rectangle of the rendered image. The
    /// controller always returns to idle after a click while placing.
    pub fn handle_click(
        &mut self,
        store: &mut SignStore,
        pointer: egui::Pos2,
        image_rect: egui::Rect,
    ) -> Option<Placed> {
        let mode = std::mem::take(&mut self.mode);
        if mode == PlacementMode::Idle {
            return None;
        }

        let Some(position) = pointer_to_position(pointer, image_rect) else {
            log::debug!("Discarded placement click outside the image");
            return None;
        };

        match mode {
            PlacementMode::Idle => None,
            PlacementMode::PlacingTee => {
                let tee = TeeMarker::new(position);
                let id = tee.id;
                store.set_tee_marker(Some(tee));
                log::info!("Placed tee marker at ({:.1}%, {:.1}%)", position.x, position.y);
                Some(Placed::Tee(id))
            }
            PlacementMode::PlacingBasket(color) => {
                let basket = BasketMarker::new(color, position, DEFAULT_PAR, DEFAULT_DISTANCE);
                let id = basket.id;
                store.add_basket_marker(basket);
                log::info!(
                    "Placed {} basket at ({:.1}%, {:.1}%), total: {}",
                    color.style().name,
                    position.x,
                    position.y,
                    store.state().basket_markers.len()
                );
                Some(Placed::Basket(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marker::{BasketMarkerUpdate, Position};
    use egui::{pos2, vec2, Rect};

    fn image_rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0))
    }

    #[test]
    fn test_tee_placement_commits_defaults() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();

        controller.begin_tee(store.state()).unwrap();
        assert_eq!(controller.mode(), PlacementMode::PlacingTee);

        let placed = controller.handle_click(&mut store, pos2(100.0, 50.0), image_rect());

        let tee = store.state().tee_marker.as_ref().unwrap();
        assert_eq!(placed, Some(Placed::Tee(tee.id)));
        assert_eq!(tee.position, Position::new(50.0, 50.0));
        assert_eq!((tee.rotation, tee.width, tee.height), (0, 60, 40));
        assert_eq!(controller.mode(), PlacementMode::Idle);
    }

    #[test]
    fn test_basket_placement_commits_defaults() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();

        controller.begin_basket(BasketColor::White, store.state()).unwrap();
        controller.handle_click(&mut store, pos2(20.0, 10.0), image_rect());

        let basket = &store.state().basket_markers[0];
        assert_eq!(basket.color, BasketColor::White);
        assert_eq!(basket.par, Par::Three);
        assert_eq!(basket.distance, 200);
        assert_eq!(basket.label, 'W');
        assert_eq!(basket.position, Position::new(10.0, 10.0));
    }

    #[test]
    fn test_click_outside_image_returns_to_idle() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();

        controller.begin_basket(BasketColor::Red, store.state()).unwrap();
        let placed = controller.handle_click(&mut store, pos2(250.0, 50.0), image_rect());

        assert_eq!(placed, None);
        assert!(store.state().basket_markers.is_empty());
        assert_eq!(controller.mode(), PlacementMode::Idle);
    }

    #[test]
    fn test_idle_click_does_nothing() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();
        assert_eq!(controller.handle_click(&mut store, pos2(10.0, 10.0), image_rect()), None);
        assert!(!store.state().has_markers());
    }

    #[test]
    fn test_second_tee_rejected() {
        let mut store = SignStore::new();
        store.set_tee_marker(Some(TeeMarker::new(Position::new(5.0, 5.0))));
        let mut controller = PlacementController::new();

        assert_eq!(controller.begin_tee(store.state()), Err(PlacementError::TeeAlreadyPlaced));
        assert!(!controller.can_begin_tee(store.state()));
        assert_eq!(controller.mode(), PlacementMode::Idle);
    }

    #[test]
    fn test_fourth_basket_rejected() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();
        for color in BasketColor::ALL {
            controller.begin_basket(color, store.state()).unwrap();
            controller.handle_click(&mut store, pos2(50.0, 50.0), image_rect());
        }
        assert_eq!(store.state().basket_markers.len(), 3);
        assert_eq!(
            controller.begin_basket(BasketColor::Red, store.state()),
            Err(PlacementError::BasketLimitReached)
        );
        assert!(!controller.can_begin_basket(store.state()));
    }

    #[test]
    fn test_duplicate_colors_allowed_under_cap() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();
        for _ in 0..2 {
            controller.begin_basket(BasketColor::Red, store.state()).unwrap();
            controller.handle_click(&mut store, pos2(50.0, 50.0), image_rect());
        }
        assert_eq!(store.state().basket_markers.len(), 2);
    }

    #[test]
    fn test_placements_are_exclusive() {
        let store = SignStore::new();
        let mut controller = PlacementController::new();
        controller.begin_tee(store.state()).unwrap();
        assert_eq!(
            controller.begin_basket(BasketColor::Blue, store.state()),
            Err(PlacementError::PlacementInProgress(PlacementMode::PlacingTee))
        );
        controller.cancel();
        assert!(!controller.is_placing());
        assert!(controller.begin_basket(BasketColor::Blue, store.state()).is_ok());
    }

    #[test]
    fn test_full_sign_scenario() {
        let mut store = SignStore::new();
        let mut controller = PlacementController::new();
        store.set_uploaded_image(Some("course.png".into()));

        controller.begin_tee(store.state()).unwrap();
        controller.handle_click(&mut store, pos2(100.0, 50.0), image_rect());

        controller.begin_basket(BasketColor::Red, store.state()).unwrap();
        let Some(Placed::Basket(id)) = controller.handle_click(&mut store, pos2(60.0, 70.0), image_rect()) else {
            panic!("expected a basket to be placed");
        };
        store.update_basket_marker(
            id,
            BasketMarkerUpdate {
                par: Some(Par::Three),
                distance: Some(250),
                label: Some('R'),
                ..Default::default()
            },
        );

        let state = store.state();
        assert_eq!(state.basket_markers.len(), 1);
        assert_eq!(state.basket_markers[0].position, Position::new(30.0, 70.0));
        assert_eq!(state.basket_markers[0].distance, 250);
        assert_eq!(state.tee_marker.as_ref().unwrap().position, Position::new(50.0, 50.0));

        store.clear_markers();
        assert!(store.state().tee_marker.is_none());
        assert!(store.state().basket_markers.is_empty());
        assert_eq!(store.state().uploaded_image.as_deref(), Some("course.png"));
    }
}
